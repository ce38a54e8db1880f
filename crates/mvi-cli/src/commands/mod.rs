//! Command handler modules for mvi-cli.
//!
//! Shared rendering helpers used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod audit;
pub mod db;
pub mod reconcile;
pub mod shell;

use mvi_schemas::InventoryRecord;

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

const DATE_FMT: &str = "%Y-%m-%d %H:%M";

fn header_line() -> String {
    format!(
        "{:<15} {:<12} {:<16} {:<10} {:<10}",
        "Brand", "Engine No.", "Date Entered", "Status", "Level"
    )
}

fn row_line(record: &InventoryRecord) -> String {
    let date = record
        .date_entered
        .map(|d| d.format(DATE_FMT).to_string())
        .unwrap_or_default();
    format!(
        "{:<15} {:<12} {:<16} {:<10} {:<10}",
        record.brand, record.engine_number, date, record.status, record.level
    )
}

/// Print records as a fixed-width table with an underlined header and a
/// trailing spacer line. Empty input prints `(no records)`.
pub fn print_table(records: &[&InventoryRecord]) {
    if records.is_empty() {
        println!("(no records)");
        return;
    }
    let header = header_line();
    println!("{header}");
    println!("{}", "-".repeat(header.len()));
    for record in records {
        println!("{}", row_line(record));
    }
    println!();
}

/// Print a single record using the same table formatting.
pub fn print_record(record: &InventoryRecord) {
    print_table(&[record]);
}
