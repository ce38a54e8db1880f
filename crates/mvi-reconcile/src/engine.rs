use mvi_schemas::InventoryRecord;

use crate::rules::validate_record;
use crate::types::{Issue, ReconcileReport};

/// Full-snapshot scan. `records` is expected in ascending key order (the
/// repository's sorted listing or the index traversal); the engine preserves
/// that visitation order in the report and mutates nothing.
pub fn reconcile(records: &[InventoryRecord]) -> ReconcileReport {
    let mut issues = Vec::new();

    for record in records {
        for message in validate_record(record) {
            issues.push(Issue::new(record.engine_number.clone(), message));
        }
    }

    ReconcileReport {
        scanned: records.len(),
        issues,
    }
}
