//! mvi-reconcile
//!
//! Reconciliation & exception reporting over the inventory.
//!
//! Architectural decisions:
//! - Per-record rules run in a fixed order; all rules are evaluated, no
//!   short-circuit on first failure.
//! - Allowed-set checks on status/level are case-sensitive; cross-field
//!   consistency checks compare case-insensitively. The asymmetry is
//!   intentional and load-bearing for report compatibility.
//! - Deterministic, pure logic. No IO. Running twice over an unchanged
//!   snapshot yields byte-identical reports.

mod engine;
mod rules;
mod types;

pub use engine::reconcile;
pub use rules::validate_record;
pub use types::{Issue, ReconcileReport};
