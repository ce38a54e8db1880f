//! `mvi reconcile` subcommand and the shared report rendering.

use anyhow::Result;
use mvi_reconcile::ReconcileReport;

pub async fn run_once(user: &str) -> Result<()> {
    let pool = mvi_db::connect_from_env().await?;
    mvi_db::migrate(&pool).await?;

    let report = mvi_runtime::run_reconciliation(&pool, user).await?;
    print_report(&report);
    Ok(())
}

pub fn print_report(report: &ReconcileReport) {
    println!("\n--- Reconciliation & Exception Report ---");
    println!("Records scanned: {}", report.scanned);
    println!("Issues found  : {}", report.issues.len());
    if report.is_clean() {
        println!("No inconsistencies detected.\n");
    } else {
        for issue in &report.issues {
            println!(" - {issue}");
        }
        println!();
    }
}
