use mvi_schemas::{is_valid_engine_number, level, status, InventoryRecord};

const ALLOWED_STATUS: [&str; 2] = [status::ON_HAND, status::OLD];
const ALLOWED_LEVEL: [&str; 2] = [level::NEW, level::SOLD];

/// Evaluate every rule against one record, in report order. Pure; a record
/// can accumulate several messages and no rule short-circuits the rest.
///
/// Rule order (stable, relied on by report consumers):
/// 1. engine number is exactly 10 decimal digits
/// 2. brand non-blank
/// 3. date_entered present
/// 4. status in {On-hand, Old} (exact match; message quotes the raw value)
/// 5. level in {New, Sold} (exact match)
/// 6. status On-hand with level Sold (case-insensitive)
/// 7. status Old with level New (case-insensitive)
pub fn validate_record(record: &InventoryRecord) -> Vec<String> {
    let mut messages = Vec::new();

    if !is_valid_engine_number(&record.engine_number) {
        messages.push("invalid engine number format".to_string());
    }
    if record.brand.trim().is_empty() {
        messages.push("missing brand".to_string());
    }
    if record.date_entered.is_none() {
        messages.push("missing date_entered".to_string());
    }
    if !ALLOWED_STATUS.contains(&record.status.as_str()) {
        messages.push(format!("invalid status '{}'", record.status));
    }
    if !ALLOWED_LEVEL.contains(&record.level.as_str()) {
        messages.push(format!("invalid level '{}'", record.level));
    }

    // Cross-field consistency, case-insensitive by contract.
    if record.status.eq_ignore_ascii_case(status::ON_HAND)
        && record.level.eq_ignore_ascii_case(level::SOLD)
    {
        messages.push("inconsistent: On-hand cannot be Sold".to_string());
    }
    if record.status.eq_ignore_ascii_case(status::OLD)
        && record.level.eq_ignore_ascii_case(level::NEW)
    {
        messages.push("inconsistent: Old cannot be New".to_string());
    }

    messages
}
