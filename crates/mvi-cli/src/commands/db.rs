//! `mvi db` subcommands.

use anyhow::Result;

pub async fn status() -> Result<()> {
    let pool = mvi_db::connect_from_env().await?;
    let s = mvi_db::status(&pool).await?;
    println!("db_ok={} has_inventory_table={}", s.ok, s.has_inventory_table);
    Ok(())
}

pub async fn migrate() -> Result<()> {
    let pool = mvi_db::connect_from_env().await?;
    mvi_db::migrate(&pool).await?;
    println!("migrations applied");
    Ok(())
}
