use mvi_schemas::InventoryRecord;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool(dir: &TempDir) -> SqlitePool {
    let url = format!("sqlite://{}/inventory.db", dir.path().display());
    let pool = mvi_db::connect(&url).await.expect("connect");
    mvi_db::migrate(&pool).await.expect("migrate");
    pool
}

#[tokio::test]
async fn scenario_empty_store_reconcile_writes_zero_summary() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    let report = mvi_runtime::run_reconciliation(&pool, "admin")
        .await
        .expect("reconcile");
    assert_eq!(report.scanned, 0);
    assert!(report.is_clean());

    // Exactly one audit entry, even with zero issues.
    let recent = mvi_db::recent_audit_entries(&pool, 50).await.expect("recent");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].action, "RECONCILE");
    assert_eq!(recent[0].outcome, "SUCCESS");
    assert_eq!(recent[0].details.as_deref(), Some("scanned=0, issues=0"));
}

#[tokio::test]
async fn scenario_dirty_store_reconcile_summarizes_and_repeats_identically() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    let mut dirty = InventoryRecord::new_stock("0000000001", "");
    dirty.status = "Broken".to_string();
    dirty.level = "Returned".to_string();
    mvi_db::insert_record(&pool, &dirty).await.expect("insert");
    mvi_db::insert_record(&pool, &InventoryRecord::new_stock("1234567890", "Toyota"))
        .await
        .expect("insert");

    let first = mvi_runtime::run_reconciliation(&pool, "admin")
        .await
        .expect("reconcile");
    assert_eq!(first.scanned, 2);
    assert_eq!(first.summary(), "scanned=2, issues=3");
    assert!(first.issues.iter().all(|i| i.engine_number == "0000000001"));

    // Idempotent: no mutation in between, identical report.
    let second = mvi_runtime::run_reconciliation(&pool, "admin")
        .await
        .expect("reconcile");
    assert_eq!(first, second);

    // One summary entry per run.
    let recent = mvi_db::recent_audit_entries(&pool, 50).await.expect("recent");
    let summaries: Vec<_> = recent.iter().filter(|r| r.action == "RECONCILE").collect();
    assert_eq!(summaries.len(), 2);
    assert!(summaries
        .iter()
        .all(|r| r.details.as_deref() == Some("scanned=2, issues=3")));
}

#[tokio::test]
async fn scenario_scan_failure_audited_as_error() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    // Drop the inventory table so the scan itself fails.
    sqlx::query("drop table inventory")
        .execute(&pool)
        .await
        .expect("drop");

    let err = mvi_runtime::run_reconciliation(&pool, "admin")
        .await
        .expect_err("scan must fail");
    assert!(err.to_string().contains("reconciliation scan failed"));

    let recent = mvi_db::recent_audit_entries(&pool, 50).await.expect("recent");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].action, "RECONCILE");
    assert_eq!(recent[0].outcome, "ERROR");
    let details = recent[0].details.as_deref().unwrap_or_default();
    assert!(details.starts_with("StorageFailure:"), "details = {details}");
}
