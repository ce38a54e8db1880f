//! Shell-facing inventory operations.
//!
//! Each operation runs to completion against the store, writes its audit
//! entries, and returns an explicit outcome. Storage failures abort the
//! current operation only (audited with outcome ERROR); the process keeps
//! running and the next user action may retry.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use mvi_db::{action, AuditOutcome, NewAuditEntry, RepoError};
use mvi_index::InventoryIndex;
use mvi_reconcile::ReconcileReport;
use mvi_schemas::{level, status, InventoryRecord};

#[derive(Debug)]
pub enum AddOutcome {
    Added(InventoryRecord),
    /// Key already present; nothing was written.
    Duplicate,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    /// The record after its terminal transition (Old / Sold), now removed
    /// from the store.
    Deleted(InventoryRecord),
    NotFound,
    /// Only On-hand stock may be deleted.
    NotOnHand(InventoryRecord),
}

/// Audit an aborted operation, then surface the failure upward.
async fn storage_failure(
    pool: &SqlitePool,
    user: &str,
    act: &str,
    engine_number: Option<&str>,
    err: RepoError,
) -> anyhow::Error {
    let mut entry = NewAuditEntry::new(user, act, AuditOutcome::Error)
        .details(format!("{}: {}", err.kind(), err));
    if let Some(key) = engine_number {
        entry = entry.engine_number(key);
    }
    mvi_db::record_audit(pool, &entry).await;
    anyhow::Error::new(err)
}

/// Add a new On-hand/New record. The caller has already validated the
/// engine-number format; a duplicate key is rejected and audited, not an
/// error.
pub async fn add_stock(
    pool: &SqlitePool,
    user: &str,
    engine_number: &str,
    brand: &str,
) -> Result<AddOutcome> {
    match mvi_db::find_by_engine_number(pool, engine_number).await {
        Ok(Some(_)) => {
            let entry = NewAuditEntry::new(user, action::ADD, AuditOutcome::Rejected)
                .engine_number(engine_number)
                .details("Duplicate engine number");
            mvi_db::record_audit(pool, &entry).await;
            return Ok(AddOutcome::Duplicate);
        }
        Ok(None) => {}
        Err(err) => {
            return Err(storage_failure(pool, user, action::ADD, Some(engine_number), err).await)
                .context("add stock failed");
        }
    }

    let record = InventoryRecord::new_stock(engine_number, brand);
    match mvi_db::insert_record(pool, &record).await {
        Ok(()) => {
            let entry = NewAuditEntry::new(user, action::ADD, AuditOutcome::Success)
                .engine_number(engine_number)
                .record_state(record.status.clone(), record.level.clone());
            mvi_db::record_audit(pool, &entry).await;
            Ok(AddOutcome::Added(record))
        }
        // Store-level uniqueness backstop behind the pre-check.
        Err(RepoError::Conflict(_)) => {
            let entry = NewAuditEntry::new(user, action::ADD, AuditOutcome::Rejected)
                .engine_number(engine_number)
                .details("Duplicate engine number");
            mvi_db::record_audit(pool, &entry).await;
            Ok(AddOutcome::Duplicate)
        }
        Err(err) => {
            Err(storage_failure(pool, user, action::ADD, Some(engine_number), err).await)
                .context("add stock failed")
        }
    }
}

/// Delete an On-hand record: transition it to Old/Sold, persist the terminal
/// state, then remove the row. Confirmation prompts belong to the shell.
pub async fn delete_stock(
    pool: &SqlitePool,
    user: &str,
    engine_number: &str,
) -> Result<DeleteOutcome> {
    let found = match mvi_db::find_by_engine_number(pool, engine_number).await {
        Ok(found) => found,
        Err(err) => {
            return Err(
                storage_failure(pool, user, action::DELETE, Some(engine_number), err).await,
            )
            .context("delete stock failed");
        }
    };

    let Some(mut record) = found else {
        let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Rejected)
            .engine_number(engine_number)
            .details("Not found");
        mvi_db::record_audit(pool, &entry).await;
        return Ok(DeleteOutcome::NotFound);
    };

    if !record.status.eq_ignore_ascii_case(status::ON_HAND) {
        let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Rejected)
            .engine_number(engine_number)
            .record_state(record.status.clone(), record.level.clone())
            .details("Invalid status for delete");
        mvi_db::record_audit(pool, &entry).await;
        return Ok(DeleteOutcome::NotOnHand(record));
    }

    // Terminal state is transient: it survives only in the audit trail and
    // the pre-delete display, never in the live store.
    record.status = status::OLD.to_string();
    record.level = level::SOLD.to_string();

    let removed = async {
        mvi_db::update_record(pool, &record).await?;
        mvi_db::delete_by_engine_number(pool, engine_number).await
    }
    .await;

    match removed {
        Ok(_) => {
            let entry = NewAuditEntry::new(user, action::DELETE, AuditOutcome::Success)
                .engine_number(engine_number)
                .record_state(record.status.clone(), record.level.clone());
            mvi_db::record_audit(pool, &entry).await;
            Ok(DeleteOutcome::Deleted(record))
        }
        Err(err) => {
            Err(storage_failure(pool, user, action::DELETE, Some(engine_number), err).await)
                .context("delete stock failed")
        }
    }
}

/// Full read-only scan of the store through the validation rules. Writes
/// exactly one audit summary per run: SUCCESS with `scanned=N, issues=M`
/// (even when M is 0), or ERROR when the scan itself fails.
pub async fn run_reconciliation(pool: &SqlitePool, user: &str) -> Result<ReconcileReport> {
    match mvi_db::list_all_sorted(pool).await {
        Ok(records) => {
            let report = mvi_reconcile::reconcile(&records);
            let entry = NewAuditEntry::new(user, action::RECONCILE, AuditOutcome::Success)
                .details(report.summary());
            mvi_db::record_audit(pool, &entry).await;
            Ok(report)
        }
        Err(err) => {
            Err(storage_failure(pool, user, action::RECONCILE, None, err).await)
                .context("reconciliation scan failed")
        }
    }
}

/// Rebuild the in-memory ordered index by replaying the store's sorted rows.
pub async fn load_index(pool: &SqlitePool) -> Result<InventoryIndex> {
    let records = mvi_db::list_all_sorted(pool)
        .await
        .context("index replay failed")?;
    Ok(records.into_iter().collect())
}
