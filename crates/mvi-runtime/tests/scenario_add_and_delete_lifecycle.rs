use mvi_runtime::{AddOutcome, DeleteOutcome};
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
async fn scenario_add_then_duplicate_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    let added = mvi_runtime::add_stock(&pool, "admin", "1234567890", "Toyota")
        .await
        .expect("add");
    let AddOutcome::Added(record) = added else {
        panic!("expected Added, got {added:?}");
    };
    assert_eq!(record.status, "On-hand");
    assert_eq!(record.level, "New");

    let dup = mvi_runtime::add_stock(&pool, "admin", "1234567890", "Honda")
        .await
        .expect("add");
    assert!(matches!(dup, AddOutcome::Duplicate));

    // The stored record is untouched by the rejected add.
    let stored = mvi_db::find_by_engine_number(&pool, "1234567890")
        .await
        .expect("find")
        .expect("present");
    assert_eq!(stored.brand, "Toyota");

    let recent = mvi_db::recent_audit_entries(&pool, 50).await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].outcome, "REJECTED");
    assert_eq!(recent[0].details.as_deref(), Some("Duplicate engine number"));
    assert_eq!(recent[1].outcome, "SUCCESS");
    assert_eq!(recent[1].status.as_deref(), Some("On-hand"));
}

#[tokio::test]
async fn scenario_delete_transitions_then_removes() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    mvi_runtime::add_stock(&pool, "admin", "1234567890", "Toyota")
        .await
        .expect("add");

    let deleted = mvi_runtime::delete_stock(&pool, "admin", "1234567890")
        .await
        .expect("delete");
    let DeleteOutcome::Deleted(record) = deleted else {
        panic!("expected Deleted, got {deleted:?}");
    };
    // Terminal state, visible only here and in the audit trail.
    assert_eq!(record.status, "Old");
    assert_eq!(record.level, "Sold");

    let gone = mvi_db::find_by_engine_number(&pool, "1234567890")
        .await
        .expect("find");
    assert!(gone.is_none());

    let recent = mvi_db::recent_audit_entries(&pool, 50).await.expect("recent");
    assert_eq!(recent[0].action, "DELETE");
    assert_eq!(recent[0].outcome, "SUCCESS");
    assert_eq!(recent[0].status.as_deref(), Some("Old"));
    assert_eq!(recent[0].level.as_deref(), Some("Sold"));
}

#[tokio::test]
async fn scenario_delete_rejections_audited() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    let missing = mvi_runtime::delete_stock(&pool, "admin", "0000000000")
        .await
        .expect("delete");
    assert!(matches!(missing, DeleteOutcome::NotFound));

    // A record that is not On-hand cannot be deleted.
    let mut old = InventoryRecord::new_stock("1234567890", "Toyota");
    old.status = "Old".to_string();
    old.level = "Sold".to_string();
    mvi_db::insert_record(&pool, &old).await.expect("insert");

    let blocked = mvi_runtime::delete_stock(&pool, "admin", "1234567890")
        .await
        .expect("delete");
    assert!(matches!(blocked, DeleteOutcome::NotOnHand(_)));

    let stored = mvi_db::find_by_engine_number(&pool, "1234567890")
        .await
        .expect("find");
    assert!(stored.is_some(), "rejected delete must not remove the row");

    let recent = mvi_db::recent_audit_entries(&pool, 50).await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].details.as_deref(), Some("Invalid status for delete"));
    assert_eq!(recent[1].details.as_deref(), Some("Not found"));
}

#[tokio::test]
async fn scenario_index_replay_matches_store_order() {
    let dir = TempDir::new().expect("tempdir");
    let pool = test_pool(&dir).await;

    for key in ["9999999999", "0000000001", "5550001111"] {
        mvi_runtime::add_stock(&pool, "admin", key, "Toyota")
            .await
            .expect("add");
    }

    let index = mvi_runtime::load_index(&pool).await.expect("replay");
    assert_eq!(index.len(), 3);
    let keys: Vec<&str> = index
        .records_ascending()
        .iter()
        .map(|r| r.engine_number.as_str())
        .collect();
    assert_eq!(keys, vec!["0000000001", "5550001111", "9999999999"]);
}
