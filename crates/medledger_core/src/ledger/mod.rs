//! Pure medication ledger operations.
//!
//! # Responsibility
//! - Apply one operation to a `MedicationRecord` and describe the result.
//! - Keep every operation free of I/O so it can be tested in isolation.
//!
//! # Invariants
//! - Operations never panic and never return `Err`; failures are outcome kinds.
//! - `LedgerOutcome::record` is `Some` only for a successful mutation.
//! - The input record is never modified in place.

pub mod input;
mod ops;

pub use input::{InputError, MedicationRef, RegisterInput, RescheduleInput, ScheduleAgendaInput};
pub use ops::{
    daily_overview, find_interval_for, interval_for, list_all, list_detailed, list_remaining,
    list_taken, mark_taken, register, remove, reschedule, schedule_agenda,
};

use crate::model::medication::MedicationRecord;

/// Result category of one ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    AlreadyRegistered,
    NotFound,
    AlreadyScheduled,
    /// The medication list is absent or empty.
    EmptyList,
    /// The record could not be loaded or saved.
    StorageFailure,
}

impl OutcomeKind {
    /// Stable label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::AlreadyRegistered => "already_registered",
            Self::NotFound => "not_found",
            Self::AlreadyScheduled => "already_scheduled",
            Self::EmptyList => "empty_list",
            Self::StorageFailure => "storage_failure",
        }
    }
}

/// Structured result handed back to the request collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOutcome {
    pub kind: OutcomeKind,
    /// Updated record to persist; present only after a successful mutation.
    pub record: Option<MedicationRecord>,
    /// Human-readable message ready to be spoken.
    pub message: String,
}

impl LedgerOutcome {
    pub fn changed(record: MedicationRecord, message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Success,
            record: Some(record),
            message: message.into(),
        }
    }

    pub fn unchanged(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            record: None,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

/// One ledger operation together with its validated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOperation {
    Register(RegisterInput),
    Remove(MedicationRef),
    Reschedule(RescheduleInput),
    MarkTaken(MedicationRef),
    ListAll,
    ListTaken,
    ListRemaining,
    ListDetailed,
    DailyOverview,
    FindIntervalFor(MedicationRef),
    ScheduleAgenda(ScheduleAgendaInput),
}

impl LedgerOperation {
    /// Returns whether a successful run of this operation must be persisted.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Register(_)
                | Self::Remove(_)
                | Self::Reschedule(_)
                | Self::MarkTaken(_)
                | Self::ScheduleAgenda(_)
        )
    }

    /// Stable label used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::Remove(_) => "remove",
            Self::Reschedule(_) => "reschedule",
            Self::MarkTaken(_) => "mark_taken",
            Self::ListAll => "list_all",
            Self::ListTaken => "list_taken",
            Self::ListRemaining => "list_remaining",
            Self::ListDetailed => "list_detailed",
            Self::DailyOverview => "daily_overview",
            Self::FindIntervalFor(_) => "find_interval_for",
            Self::ScheduleAgenda(_) => "schedule_agenda",
        }
    }
}

/// Applies one operation to the current record.
pub fn apply(record: &MedicationRecord, operation: &LedgerOperation) -> LedgerOutcome {
    match operation {
        LedgerOperation::Register(input) => register(record, input),
        LedgerOperation::Remove(target) => remove(record, target),
        LedgerOperation::Reschedule(input) => reschedule(record, input),
        LedgerOperation::MarkTaken(target) => mark_taken(record, target),
        LedgerOperation::ListAll => list_all(record),
        LedgerOperation::ListTaken => list_taken(record),
        LedgerOperation::ListRemaining => list_remaining(record),
        LedgerOperation::ListDetailed => list_detailed(record),
        LedgerOperation::DailyOverview => daily_overview(record),
        LedgerOperation::FindIntervalFor(target) => find_interval_for(record, target),
        LedgerOperation::ScheduleAgenda(input) => schedule_agenda(record, input),
    }
}
