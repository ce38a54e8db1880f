//! `mvi audit` subcommands and the shared audit-log rendering.

use anyhow::Result;
use sqlx::SqlitePool;

const TS_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub async fn recent(limit: i64) -> Result<()> {
    let pool = mvi_db::connect_from_env().await?;
    mvi_db::migrate(&pool).await?;
    print_recent(&pool, limit).await
}

/// Render the latest `limit` entries, newest first. Absent fields print as `-`.
pub async fn print_recent(pool: &SqlitePool, limit: i64) -> Result<()> {
    let entries = mvi_db::recent_audit_entries(pool, limit).await?;

    println!("\n--- Audit Log (latest {limit}) ---");
    if entries.is_empty() {
        println!("(no audit entries)\n");
        return Ok(());
    }
    for entry in entries {
        let when = entry
            .ts
            .map(|t| t.format(TS_FMT).to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{}] {:<10} u={:<10} eng={:<12} -> {:<8} {}",
            when,
            entry.action,
            entry.user.as_deref().unwrap_or("-"),
            entry.engine_number.as_deref().unwrap_or("-"),
            entry.outcome,
            entry.details.as_deref().unwrap_or(""),
        );
    }
    println!();
    Ok(())
}
