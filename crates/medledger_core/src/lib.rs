//! Core domain logic for the medication ledger.
//! This crate is the single source of truth for ledger invariants.

pub mod db;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod speech;

pub use ledger::{
    apply, InputError, LedgerOperation, LedgerOutcome, MedicationRef, OutcomeKind,
    RegisterInput, RescheduleInput, ScheduleAgendaInput,
};
pub use logging::{default_log_level, init_logging, logging_status, normalize_log_level};
pub use model::medication::{AgendaEntry, Medication, MedicationRecord, RecordValidationError};
pub use repo::ledger_repo::{LedgerStore, RepoError, RepoResult, SqliteLedgerStore};
pub use service::ledger_service::LedgerService;

/// Minimal health-check API for integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
