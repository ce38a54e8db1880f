//! Shared data shapes for the engine inventory tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engine numbers are exactly this many ASCII decimal digits.
pub const ENGINE_NUMBER_LEN: usize = 10;

/// Expected `status` vocabulary. Other values are stored as-is and flagged
/// by reconciliation, never rejected at write time.
pub mod status {
    pub const ON_HAND: &str = "On-hand";
    pub const OLD: &str = "Old";
}

/// Expected `level` vocabulary. Same relaxed-storage policy as `status`.
pub mod level {
    pub const NEW: &str = "New";
    pub const SOLD: &str = "Sold";
}

/// One inventory row. `engine_number` is the sole identity and sort key;
/// ordering is lexicographic over the digit string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub engine_number: String,
    pub brand: String,
    /// None only in invalid/legacy rows; flagged by reconciliation.
    pub date_entered: Option<DateTime<Utc>>,
    pub status: String,
    pub level: String,
}

impl InventoryRecord {
    /// A freshly added record: `On-hand` / `New`, stamped now.
    pub fn new_stock(engine_number: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            engine_number: engine_number.into(),
            brand: brand.into(),
            date_entered: Some(Utc::now()),
            status: status::ON_HAND.to_string(),
            level: level::NEW.to_string(),
        }
    }
}

/// True iff `value` is exactly [`ENGINE_NUMBER_LEN`] ASCII decimal digits.
pub fn is_valid_engine_number(value: &str) -> bool {
    value.len() == ENGINE_NUMBER_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_number_format() {
        assert!(is_valid_engine_number("1234567890"));
        assert!(is_valid_engine_number("0000000001"));
        assert!(!is_valid_engine_number("123456789"));
        assert!(!is_valid_engine_number("12345678901"));
        assert!(!is_valid_engine_number("12345678X0"));
        assert!(!is_valid_engine_number(""));
        assert!(!is_valid_engine_number("١٢٣٤٥٦٧٨٩٠")); // non-ASCII digits
    }

    #[test]
    fn new_stock_defaults() {
        let r = InventoryRecord::new_stock("1234567890", "Toyota");
        assert_eq!(r.status, status::ON_HAND);
        assert_eq!(r.level, level::NEW);
        assert!(r.date_entered.is_some());
    }
}
