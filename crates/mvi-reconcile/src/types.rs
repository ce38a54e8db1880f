use std::fmt;

use serde::{Deserialize, Serialize};

/// One rule violation tied to one record. `engine_number` carries the raw
/// stored key, even when the key itself is what failed validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub engine_number: String,
    pub message: String,
}

impl Issue {
    pub fn new(engine_number: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            engine_number: engine_number.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.engine_number, self.message)
    }
}

/// Full report: visitation order of records and within-record rule order
/// are preserved, so identical inputs produce identical reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub scanned: usize,
    pub issues: Vec<Issue>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Audit-trail summary line, written even when no issues were found.
    pub fn summary(&self) -> String {
        format!("scanned={}, issues={}", self.scanned, self.issues.len())
    }
}
