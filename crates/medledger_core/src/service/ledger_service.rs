//! Ledger use-case service.
//!
//! # Responsibility
//! - Run exactly one ledger operation per call against a user's record.
//! - Persist the updated record after successful mutations.
//! - Convert store failures into `StorageFailure` outcomes.
//!
//! # Invariants
//! - `execute` never returns an error and never panics.
//! - A failed save leaves the previously stored record untouched.
//! - Log events carry operation metadata only, never names or user ids.

use crate::ledger::{self, LedgerOperation, LedgerOutcome, OutcomeKind};
use crate::model::medication::MedicationRecord;
use crate::repo::ledger_repo::{LedgerStore, RepoError, RepoResult};
use crate::speech;
use log::{error, info};
use std::time::Instant;

/// Use-case service wrapper over a ledger store.
pub struct LedgerService<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the record, applies `operation`, and saves the result when it
    /// is a successful mutation.
    pub fn execute(&self, user_id: &str, operation: &LedgerOperation) -> LedgerOutcome {
        let started_at = Instant::now();
        let op = operation.label();

        let record = match self.store.load(user_id) {
            Ok(record) => record,
            Err(err) => {
                error!(
                    "event=ledger_execute module=service status=error op={op} stage=load duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    error_code(&err)
                );
                return storage_failure();
            }
        };

        let outcome = ledger::apply(&record, operation);

        if operation.is_mutation() {
            if let Some(updated) = outcome.record.as_ref() {
                if let Err(err) = self.store.save(user_id, updated) {
                    error!(
                        "event=ledger_execute module=service status=error op={op} stage=save duration_ms={} error_code={}",
                        started_at.elapsed().as_millis(),
                        error_code(&err)
                    );
                    return storage_failure();
                }
            }
        }

        info!(
            "event=ledger_execute module=service status=ok op={op} kind={} persisted={} duration_ms={}",
            outcome.kind.as_str(),
            outcome.record.is_some(),
            started_at.elapsed().as_millis()
        );
        outcome
    }

    /// Returns the stored record without applying any operation.
    pub fn snapshot(&self, user_id: &str) -> RepoResult<MedicationRecord> {
        self.store.load(user_id)
    }
}

fn storage_failure() -> LedgerOutcome {
    LedgerOutcome::unchanged(OutcomeKind::StorageFailure, speech::storage_failure())
}

fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Validation(_) => "record_invalid",
        RepoError::Db(_) => "db_failed",
        RepoError::InvalidData(_) => "payload_invalid",
        RepoError::InvalidUserId => "user_id_invalid",
        RepoError::UninitializedConnection { .. }
        | RepoError::MissingRequiredTable(_)
        | RepoError::MissingRequiredColumn { .. } => "schema_invalid",
    }
}
