//! Interactive login + menu shell.
//!
//! One blocking actor drives the store sequentially; every store access is
//! a single short-lived call, so no connection is held while waiting on
//! user input. A storage failure aborts the current menu action only — the
//! loop keeps running and the next action may retry.

use std::io::{stdin, stdout, Write};

use anyhow::{bail, Context, Result};
use sqlx::SqlitePool;

use mvi_auth::{AuthConfig, AuthService};
use mvi_db::{action, AuditOutcome, NewAuditEntry};
use mvi_index::InventoryIndex;
use mvi_schemas::{is_valid_engine_number, status as status_vocab};

use super::{audit, print_record, print_table, reconcile};

const LOGIN_ATTEMPTS: u32 = 3;
const AUDIT_VIEW_LIMIT: i64 = 50;

pub async fn run(auth_config: Option<String>) -> Result<()> {
    let config = match auth_config {
        Some(path) => AuthConfig::from_yaml_file(path)?,
        None => AuthConfig::builtin(),
    };
    let auth = AuthService::new(config);

    let pool = mvi_db::connect_from_env().await?;
    mvi_db::migrate(&pool).await?;

    println!("=== Engine Inventory System ===");
    let Some(user) = login(&auth)? else {
        println!("Exiting system.");
        return Ok(());
    };
    let is_admin = auth.is_admin(&user);
    println!("Login successful. Welcome, {user}!");

    // In-memory ordered index, replayed from the store at session start and
    // kept in step with every successful mutation.
    let mut index = mvi_runtime::load_index(&pool).await?;

    loop {
        print_menu(is_admin);
        let option = prompt("Select an option: ")?;
        let outcome = match option.trim() {
            "1" => add_stock(&pool, &mut index, &user).await,
            "2" => {
                if !is_admin {
                    println!("Access denied: Delete Stock is for Admins only.");
                    let entry = NewAuditEntry::new(&user, action::DELETE, AuditOutcome::Denied)
                        .details("Non-admin attempted delete");
                    mvi_db::record_audit(&pool, &entry).await;
                    Ok(())
                } else {
                    delete_stock(&pool, &mut index, &user).await
                }
            }
            "3" => search_stock(&pool).await,
            "4" => {
                display_inventory(&index);
                Ok(())
            }
            "5" => {
                println!("Goodbye!  {user}");
                return Ok(());
            }
            "6" => audit::print_recent(&pool, AUDIT_VIEW_LIMIT).await,
            "7" => run_reconciliation(&pool, &user).await,
            _ => {
                println!("Invalid option: Please enter a number between 1 and 7.");
                Ok(())
            }
        };

        if let Err(err) = outcome {
            println!("Operation failed. Please try again.");
            tracing::error!(error = %format!("{err:#}"), "menu action failed");
        }
    }
}

fn login(auth: &AuthService) -> Result<Option<String>> {
    for _ in 0..LOGIN_ATTEMPTS {
        let username = prompt("Username: ")?;
        let password = prompt("Password: ")?;
        if auth.authenticate(username.trim(), password.trim()) {
            return Ok(Some(username.trim().to_string()));
        }
        println!("Login failed. Please check your username and password then try again.");
    }
    println!("Too many failed login attempts. Access denied. Please restart the system to try again.");
    Ok(None)
}

fn print_menu(is_admin: bool) {
    println!("\n--- Main Menu ---");
    println!("1. Add Stock");
    println!("2. Delete Stock{}", if is_admin { "" } else { " (Admin only)" });
    println!("3. Search Inventory");
    println!("4. Display Inventory (Sorted)");
    println!("5. Exit");
    println!("6. View Audit Log");
    println!("7. Reconciliation & Exception Report\n");
}

async fn add_stock(pool: &SqlitePool, index: &mut InventoryIndex, user: &str) -> Result<()> {
    let mut engine_number = prompt("Enter Engine Number (10 digits): ")?;
    while !is_valid_engine_number(engine_number.trim()) {
        println!("Invalid engine number. Must be exactly 10 digits (e.g., 1234567890). Please try again");
        engine_number = prompt("Enter Engine Number (10 digits): ")?;
    }
    let engine_number = engine_number.trim().to_string();

    let mut brand = prompt("Enter Brand: ")?;
    while brand.trim().is_empty() {
        println!("Invalid input. Brand name cannot be empty. Please enter a valid brand.");
        brand = prompt("Enter Brand: ")?;
    }
    let brand = brand.trim().to_string();

    match mvi_runtime::add_stock(pool, user, &engine_number, &brand).await? {
        mvi_runtime::AddOutcome::Added(record) => {
            println!("Product added successfully:");
            print_record(&record);
            index.insert(record);
        }
        mvi_runtime::AddOutcome::Duplicate => {
            println!("Engine number already exists in inventory. Please enter a unique value.\n");
        }
    }
    Ok(())
}

async fn delete_stock(pool: &SqlitePool, index: &mut InventoryIndex, user: &str) -> Result<()> {
    loop {
        let input = prompt("Enter Engine Number to delete (or type CANCEL to return): ")?;
        let engine_number = input.trim();

        if engine_number.eq_ignore_ascii_case("CANCEL") {
            println!("Delete cancelled. Returning to main menu.");
            let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Cancel)
                .details("User cancelled");
            mvi_db::record_audit(pool, &entry).await;
            return Ok(());
        }
        if !is_valid_engine_number(engine_number) {
            println!("Invalid engine number: Must be exactly 10 digits (e.g., 1234567890). Please try again.");
            let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Rejected)
                .engine_number(engine_number)
                .details("Invalid engine number format");
            mvi_db::record_audit(pool, &entry).await;
            continue;
        }

        let Some(record) = mvi_db::find_by_engine_number(pool, engine_number).await? else {
            println!("No product found. Please verify the engine number and try again.");
            let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Rejected)
                .engine_number(engine_number)
                .details("Not found");
            mvi_db::record_audit(pool, &entry).await;
            return Ok(());
        };
        if !record.status.eq_ignore_ascii_case(status_vocab::ON_HAND) {
            println!("Product cannot be deleted. Status must be 'On-hand'.");
            let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Rejected)
                .engine_number(engine_number)
                .record_state(record.status.clone(), record.level.clone())
                .details("Invalid status for delete");
            mvi_db::record_audit(pool, &entry).await;
            return Ok(());
        }

        println!("Product to delete:");
        print_record(&record);

        let confirm_input =
            prompt("To confirm deletion, re-enter the Engine Number (or type CANCEL to abort): ")?;
        let confirm = confirm_input.trim();
        if confirm.eq_ignore_ascii_case("CANCEL") {
            println!("Deletion cancelled.");
            let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Cancel)
                .engine_number(engine_number)
                .record_state(record.status.clone(), record.level.clone())
                .details("User cancelled at confirm");
            mvi_db::record_audit(pool, &entry).await;
            return Ok(());
        }
        if !is_valid_engine_number(confirm) {
            println!("Invalid confirmation: Engine number must be exactly 10 digits. Deletion cancelled.");
            let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Rejected)
                .engine_number(engine_number)
                .record_state(record.status.clone(), record.level.clone())
                .details("Invalid confirm format");
            mvi_db::record_audit(pool, &entry).await;
            return Ok(());
        }

        if confirm == engine_number {
            match mvi_runtime::delete_stock(pool, user, engine_number).await? {
                mvi_runtime::DeleteOutcome::Deleted(terminal) => {
                    println!("Product deleted successfully:");
                    print_record(&terminal);
                    index.delete(engine_number);
                }
                // The record changed between display and confirm; nothing removed.
                mvi_runtime::DeleteOutcome::NotFound => {
                    println!("No product found. Please verify the engine number and try again.");
                }
                mvi_runtime::DeleteOutcome::NotOnHand(_) => {
                    println!("Product cannot be deleted. Status must be 'On-hand'.");
                }
            }
        } else {
            println!("Engine number mismatch. Deletion not confirmed and has been cancelled.");
            let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Rejected)
                .engine_number(engine_number)
                .record_state(record.status.clone(), record.level.clone())
                .details("Confirm mismatch");
            mvi_db::record_audit(pool, &entry).await;
        }
        return Ok(());
    }
}

async fn search_stock(pool: &SqlitePool) -> Result<()> {
    loop {
        let input = prompt("Enter Engine Number to search (or type CANCEL to return): ")?;
        let engine_number = input.trim();

        if engine_number.eq_ignore_ascii_case("CANCEL") {
            println!("Search cancelled. Returning to main menu.");
            return Ok(());
        }
        if !is_valid_engine_number(engine_number) {
            println!("Invalid engine number: Must be exactly 10 digits (e.g., 1234567890). Please try again.");
            continue;
        }

        match mvi_db::find_by_engine_number(pool, engine_number).await? {
            Some(record) => {
                println!("Product found:");
                print_record(&record);
            }
            None => {
                println!("No product found with the given engine number. Please check and try again.");
            }
        }
        return Ok(());
    }
}

fn display_inventory(index: &InventoryIndex) {
    println!("Displaying inventory records sorted by Engine Number:");
    print_table(&index.records_ascending());
}

async fn run_reconciliation(pool: &SqlitePool, user: &str) -> Result<()> {
    match mvi_runtime::run_reconciliation(pool, user).await {
        Ok(report) => {
            reconcile::print_report(&report);
            Ok(())
        }
        Err(err) => {
            println!("Reconciliation failed. See error log.");
            Err(err)
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    stdout().flush().context("flush prompt")?;
    let mut buf = String::new();
    let n = stdin().read_line(&mut buf).context("read input")?;
    if n == 0 {
        bail!("input stream closed");
    }
    Ok(buf)
}
