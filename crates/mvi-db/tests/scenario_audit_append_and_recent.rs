use mvi_db::{action, AuditOutcome, NewAuditEntry};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool(dir: &TempDir) -> SqlitePool {
    let url = format!("sqlite://{}/inventory.db", dir.path().display());
    let pool = mvi_db::connect(&url).await.expect("connect");
    mvi_db::migrate(&pool).await.expect("migrate");
    pool
}

#[tokio::test]
async fn scenario_recent_entries_newest_first() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    let first = NewAuditEntry::new("admin", action::ADD, AuditOutcome::Success)
        .engine_number("1234567890")
        .record_state("On-hand", "New");
    mvi_db::insert_audit_entry(&pool, &first).await.expect("append");

    let second = NewAuditEntry::new("admin", action::DELETE, AuditOutcome::Rejected)
        .engine_number("1234567890")
        .details("Not found");
    mvi_db::insert_audit_entry(&pool, &second).await.expect("append");

    let recent = mvi_db::recent_audit_entries(&pool, 50).await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].action, "DELETE");
    assert_eq!(recent[0].outcome, "REJECTED");
    assert_eq!(recent[0].details.as_deref(), Some("Not found"));
    assert_eq!(recent[1].action, "ADD");
    assert_eq!(recent[1].status.as_deref(), Some("On-hand"));
    assert!(recent[1].ts.is_some());

    let limited = mvi_db::recent_audit_entries(&pool, 1).await.expect("recent");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].action, "DELETE");
}

#[tokio::test]
async fn scenario_record_audit_swallows_failures() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    // Closing the pool makes the append fail; record_audit must not panic
    // or surface the error.
    pool.close().await;
    let entry = NewAuditEntry::new("admin", action::RECONCILE, AuditOutcome::Success);
    mvi_db::record_audit(&pool, &entry).await;
}
