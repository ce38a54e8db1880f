//! SQLite persistence for inventory rows and the audit trail.
//!
//! Connections are checked out of the pool per call and returned when the
//! call completes; no handle is held across user interaction steps.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use mvi_schemas::InventoryRecord;

pub const ENV_DB_URL: &str = "MVI_DATABASE_URL";
pub const DEFAULT_DB_URL: &str = "sqlite://data/inventory.db";

/// Repository failure taxonomy. `Conflict` is a rejection the caller can
/// message to the user; `Storage` unwinds the current operation only.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("engine number already exists: {0}")]
    Conflict(String),
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl RepoError {
    /// Stable classification string for audit `details`.
    pub fn kind(&self) -> &'static str {
        match self {
            RepoError::Conflict(_) => "Conflict",
            RepoError::Storage(_) => "StorageFailure",
        }
    }
}

/// Connect to a SQLite database URL, creating the file if missing.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid database url {url:?}"))?
        .create_if_missing(true);

    // One interactive actor drives the system; a single connection also
    // serializes SQLite writes without busy retries.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .with_context(|| format!("failed to open SQLite database {url:?}"))?;

    Ok(pool)
}

/// Connect using MVI_DATABASE_URL, defaulting to `sqlite://data/inventory.db`.
pub async fn connect_from_env() -> Result<SqlitePool> {
    let url = std::env::var(ENV_DB_URL).unwrap_or_else(|_| DEFAULT_DB_URL.to_string());
    if url == DEFAULT_DB_URL {
        std::fs::create_dir_all("data").context("create data directory")?;
    }
    connect(&url).await
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &SqlitePool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;
    let ok = one == 1;

    let (exists,): (i32,) = sqlx::query_as::<_, (i32,)>(
        r#"
        select exists (
            select 1 from sqlite_master
            where type = 'table' and name = 'inventory'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok,
        has_inventory_table: exists == 1,
    })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_inventory_table: bool,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        // SQLITE_CONSTRAINT_PRIMARYKEY / SQLITE_CONSTRAINT_UNIQUE
        matches!(db_err.code().as_deref(), Some("1555") | Some("2067"))
    } else {
        false
    }
}

fn millis_or_now(date_entered: Option<DateTime<Utc>>) -> i64 {
    date_entered.unwrap_or_else(Utc::now).timestamp_millis()
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<InventoryRecord, RepoError> {
    let millis: i64 = row.try_get("date_entered")?;
    Ok(InventoryRecord {
        engine_number: row.try_get("engine_number")?,
        brand: row.try_get("brand")?,
        // Out-of-range millis read back as absent and get flagged downstream.
        date_entered: DateTime::from_timestamp_millis(millis),
        status: row.try_get("status")?,
        level: row.try_get("level")?,
    })
}

/// Insert one inventory row. A duplicate key maps to [`RepoError::Conflict`];
/// no partial state change occurs.
pub async fn insert_record(pool: &SqlitePool, record: &InventoryRecord) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        insert into inventory (engine_number, brand, date_entered, status, level)
        values (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.engine_number)
    .bind(&record.brand)
    .bind(millis_or_now(record.date_entered))
    .bind(&record.status)
    .bind(&record.level)
    .execute(pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            RepoError::Conflict(record.engine_number.clone())
        } else {
            RepoError::Storage(err)
        }
    })?;

    Ok(())
}

/// Exact-key lookup. Absence is `Ok(None)`, never an error.
pub async fn find_by_engine_number(
    pool: &SqlitePool,
    engine_number: &str,
) -> Result<Option<InventoryRecord>, RepoError> {
    let row = sqlx::query(
        r#"
        select engine_number, brand, date_entered, status, level
        from inventory
        where engine_number = ?
        "#,
    )
    .bind(engine_number)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(record_from_row).transpose()
}

/// Update all mutable fields of an existing row. Returns whether a row matched.
pub async fn update_record(pool: &SqlitePool, record: &InventoryRecord) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        update inventory
        set brand = ?, date_entered = ?, status = ?, level = ?
        where engine_number = ?
        "#,
    )
    .bind(&record.brand)
    .bind(millis_or_now(record.date_entered))
    .bind(&record.status)
    .bind(&record.level)
    .bind(&record.engine_number)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete by key. Returns whether a row was removed; absence is a no-op.
pub async fn delete_by_engine_number(
    pool: &SqlitePool,
    engine_number: &str,
) -> Result<bool, RepoError> {
    let result = sqlx::query("delete from inventory where engine_number = ?")
        .bind(engine_number)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// All rows in ascending engine-number order (lexicographic over the text key).
pub async fn list_all_sorted(pool: &SqlitePool) -> Result<Vec<InventoryRecord>, RepoError> {
    let rows = sqlx::query(
        r#"
        select engine_number, brand, date_entered, status, level
        from inventory
        order by engine_number asc
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

/// Audit action names as they appear in the trail.
pub mod action {
    pub const ADD: &str = "ADD";
    pub const DELETE: &str = "DELETE";
    pub const RECONCILE: &str = "RECONCILE";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Success,
    Rejected,
    Denied,
    Cancel,
    Error,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "SUCCESS",
            AuditOutcome::Rejected => "REJECTED",
            AuditOutcome::Denied => "DENIED",
            AuditOutcome::Cancel => "CANCEL",
            AuditOutcome::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user: Option<String>,
    pub action: String,
    pub engine_number: Option<String>,
    pub status: Option<String>,
    pub level: Option<String>,
    pub outcome: AuditOutcome,
    pub details: Option<String>,
}

impl NewAuditEntry {
    pub fn new(user: &str, action: &str, outcome: AuditOutcome) -> Self {
        Self {
            user: Some(user.to_string()),
            action: action.to_string(),
            engine_number: None,
            status: None,
            level: None,
            outcome,
            details: None,
        }
    }

    pub fn engine_number(mut self, engine_number: impl Into<String>) -> Self {
        self.engine_number = Some(engine_number.into());
        self
    }

    pub fn record_state(mut self, status: impl Into<String>, level: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self.level = Some(level.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Insert one audit row (append-only semantics enforced at app layer).
pub async fn insert_audit_entry(pool: &SqlitePool, entry: &NewAuditEntry) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        insert into audit_log (ts, user, action, engine_number, status, level, outcome, details)
        values (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Utc::now().timestamp_millis())
    .bind(&entry.user)
    .bind(&entry.action)
    .bind(&entry.engine_number)
    .bind(&entry.status)
    .bind(&entry.level)
    .bind(entry.outcome.as_str())
    .bind(&entry.details)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fire-and-forget append: the audit sink must never raise into the caller.
/// Failures go to the diagnostic log only.
pub async fn record_audit(pool: &SqlitePool, entry: &NewAuditEntry) {
    if let Err(err) = insert_audit_entry(pool, entry).await {
        tracing::warn!(action = %entry.action, error = %err, "audit append failed");
    }
}

#[derive(Debug, Clone)]
pub struct AuditRow {
    pub id: i64,
    pub ts: Option<DateTime<Utc>>,
    pub user: Option<String>,
    pub action: String,
    pub engine_number: Option<String>,
    pub status: Option<String>,
    pub level: Option<String>,
    pub outcome: String,
    pub details: Option<String>,
}

/// Latest `limit` audit entries, newest first.
pub async fn recent_audit_entries(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<AuditRow>, RepoError> {
    let rows = sqlx::query(
        r#"
        select id, ts, user, action, engine_number, status, level, outcome, details
        from audit_log
        order by id desc
        limit ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let millis: i64 = row.try_get("ts")?;
            Ok(AuditRow {
                id: row.try_get("id")?,
                ts: DateTime::from_timestamp_millis(millis),
                user: row.try_get("user")?,
                action: row.try_get("action")?,
                engine_number: row.try_get("engine_number")?,
                status: row.try_get("status")?,
                level: row.try_get("level")?,
                outcome: row.try_get("outcome")?,
                details: row.try_get("details")?,
            })
        })
        .collect()
}
