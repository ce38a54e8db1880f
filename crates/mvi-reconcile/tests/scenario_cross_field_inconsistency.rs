use mvi_reconcile::reconcile;
use mvi_schemas::InventoryRecord;

#[test]
fn scenario_on_hand_cannot_be_sold_exact_text() {
    let mut record = InventoryRecord::new_stock("1234567890", "Toyota");
    record.level = "Sold".to_string();

    let report = reconcile(&[record]);
    assert_eq!(report.scanned, 1);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].engine_number, "1234567890");
    assert_eq!(report.issues[0].message, "inconsistent: On-hand cannot be Sold");
    assert_eq!(
        report.issues[0].to_string(),
        "1234567890 -> inconsistent: On-hand cannot be Sold"
    );
}

#[test]
fn scenario_old_cannot_be_new_exact_text() {
    let mut record = InventoryRecord::new_stock("1234567890", "Toyota");
    record.status = "Old".to_string();

    let report = reconcile(&[record]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].message, "inconsistent: Old cannot be New");
}

#[test]
fn scenario_terminal_state_is_consistent() {
    // Old/Sold is the pre-delete terminal state and must not be flagged.
    let mut record = InventoryRecord::new_stock("1234567890", "Toyota");
    record.status = "Old".to_string();
    record.level = "Sold".to_string();

    let report = reconcile(&[record]);
    assert!(report.is_clean());
}
