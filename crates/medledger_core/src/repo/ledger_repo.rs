//! Ledger store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist one JSON-encoded `MedicationRecord` per user id.
//! - Reject connections that were not bootstrapped by `db::open_db*`.
//!
//! # Invariants
//! - `save` overwrites the whole record (last writer wins).
//! - Read paths reject corrupt or invariant-violating payloads instead of
//!   masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::medication::{MedicationRecord, RecordValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LEDGER_TABLE: &str = "ledger_records";
const REQUIRED_COLUMNS: &[&str] = &["user_id", "payload", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for ledger persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
    InvalidUserId,
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted ledger data: {message}"),
            Self::InvalidUserId => write!(f, "user id cannot be blank"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value contract for per-user ledger records.
///
/// User ids are opaque keys used exactly as given; only blank ids are rejected.
pub trait LedgerStore {
    /// Reads the record for `user_id`; returns the default record when none exists.
    fn load(&self, user_id: &str) -> RepoResult<MedicationRecord>;
    /// Overwrites the record for `user_id`.
    fn save(&self, user_id: &str, record: &MedicationRecord) -> RepoResult<()>;
}

/// SQLite-backed ledger store.
pub struct SqliteLedgerStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLedgerStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema is
    ///   not the one created by migrations.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_ledger_schema(conn)?;
        Ok(Self { conn })
    }
}

impl LedgerStore for SqliteLedgerStore<'_> {
    fn load(&self, user_id: &str) -> RepoResult<MedicationRecord> {
        let user_id = checked_user_id(user_id)?;
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM ledger_records WHERE user_id = ?1;",
                [user_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match payload {
            Some(payload) => parse_payload(&payload),
            None => Ok(MedicationRecord::default()),
        }
    }

    fn save(&self, user_id: &str, record: &MedicationRecord) -> RepoResult<()> {
        let user_id = checked_user_id(user_id)?;
        record.validate()?;
        let payload = serde_json::to_string(record)
            .map_err(|err| RepoError::InvalidData(format!("failed to encode record: {err}")))?;

        self.conn.execute(
            "INSERT INTO ledger_records (user_id, payload)
             VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![user_id, payload],
        )?;

        Ok(())
    }
}

fn parse_payload(payload: &str) -> RepoResult<MedicationRecord> {
    let record: MedicationRecord = serde_json::from_str(payload).map_err(|err| {
        RepoError::InvalidData(format!("undecodable payload in ledger_records.payload: {err}"))
    })?;
    record.validate()?;
    Ok(record)
}

fn checked_user_id(user_id: &str) -> RepoResult<&str> {
    if user_id.trim().is_empty() {
        return Err(RepoError::InvalidUserId);
    }
    Ok(user_id)
}

fn ensure_ledger_schema(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [LEDGER_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(LEDGER_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({LEDGER_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<HashSet<_>, _>>()?;
    for column in REQUIRED_COLUMNS.iter().copied() {
        if !columns.contains(column) {
            return Err(RepoError::MissingRequiredColumn {
                table: LEDGER_TABLE,
                column,
            });
        }
    }

    Ok(())
}
