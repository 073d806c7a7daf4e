//! Medication record model.
//!
//! # Responsibility
//! - Define `MedicationRecord`, `Medication` and `AgendaEntry`.
//! - Keep the persisted JSON field names stable (`timeIntervalHours`,
//!   `timesTakenToday`).
//! - Validate uniqueness invariants before persistence and after reads.
//!
//! # Invariants
//! - `list` and `agenda` may be absent; absent is read as empty.
//! - No two medications share a `name`; no two agenda entries share a `name`.
//! - Name matching is exact and case-sensitive.
//! - `times_taken_today` only grows, one step per mark-taken, and is never
//!   reset by this crate.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One user's medication list plus the separate one-off agenda.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRecord {
    /// Registered medications in registration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<Medication>>,
    /// One-off agenda entries in booking order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<Vec<AgendaEntry>>,
}

/// A named reminder with a dosing interval and a taken counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    /// Free-form interval description, usually a number of hours.
    #[serde(deserialize_with = "deserialize_interval")]
    pub time_interval_hours: String,
    #[serde(default)]
    pub times_taken_today: u32,
}

/// A named one-off schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaEntry {
    pub name: String,
    pub time: String,
    pub day: String,
}

/// Record-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    BlankMedicationName,
    DuplicateMedication(String),
    BlankAgendaName,
    DuplicateAgendaEntry(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankMedicationName => write!(f, "medication name cannot be blank"),
            Self::DuplicateMedication(name) => {
                write!(f, "medication `{name}` appears more than once")
            }
            Self::BlankAgendaName => write!(f, "agenda entry name cannot be blank"),
            Self::DuplicateAgendaEntry(name) => {
                write!(f, "agenda entry `{name}` appears more than once")
            }
        }
    }
}

impl Error for RecordValidationError {}

impl Medication {
    /// Creates a freshly registered medication with a zero taken counter.
    pub fn new(name: impl Into<String>, time_interval_hours: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_interval_hours: time_interval_hours.into(),
            times_taken_today: 0,
        }
    }

    /// Returns whether this medication was marked as taken at least once.
    pub fn is_taken(&self) -> bool {
        self.times_taken_today > 0
    }
}

impl AgendaEntry {
    pub fn new(name: impl Into<String>, time: impl Into<String>, day: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time: time.into(),
            day: day.into(),
        }
    }
}

impl MedicationRecord {
    /// Medications in registration order; empty when `list` is absent.
    pub fn medications(&self) -> &[Medication] {
        self.list.as_deref().unwrap_or(&[])
    }

    /// Agenda entries in booking order; empty when `agenda` is absent.
    pub fn agenda_entries(&self) -> &[AgendaEntry] {
        self.agenda.as_deref().unwrap_or(&[])
    }

    /// Returns the first medication with exactly this name.
    pub fn find_medication(&self, name: &str) -> Option<&Medication> {
        self.medications().iter().find(|item| item.name == name)
    }

    /// Returns whether an agenda entry with exactly this name exists.
    pub fn has_agenda_entry(&self, name: &str) -> bool {
        self.agenda_entries().iter().any(|item| item.name == name)
    }

    /// Mutable access to `list`, creating it on first use.
    pub fn medications_mut(&mut self) -> &mut Vec<Medication> {
        self.list.get_or_insert_with(Vec::new)
    }

    /// Mutable access to `agenda`, creating it on first use.
    pub fn agenda_mut(&mut self) -> &mut Vec<AgendaEntry> {
        self.agenda.get_or_insert_with(Vec::new)
    }

    /// Validates record invariants.
    ///
    /// # Errors
    /// - Returns the first blank or duplicated medication name.
    /// - Returns the first blank or duplicated agenda name.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        let mut seen = HashSet::new();
        for item in self.medications() {
            if item.name.trim().is_empty() {
                return Err(RecordValidationError::BlankMedicationName);
            }
            if !seen.insert(item.name.as_str()) {
                return Err(RecordValidationError::DuplicateMedication(
                    item.name.clone(),
                ));
            }
        }

        let mut seen = HashSet::new();
        for item in self.agenda_entries() {
            if item.name.trim().is_empty() {
                return Err(RecordValidationError::BlankAgendaName);
            }
            if !seen.insert(item.name.as_str()) {
                return Err(RecordValidationError::DuplicateAgendaEntry(
                    item.name.clone(),
                ));
            }
        }

        Ok(())
    }
}

// Older payloads stored the interval as a JSON number.
fn deserialize_interval<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawInterval {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawInterval::deserialize(deserializer)? {
        RawInterval::Text(value) => value,
        RawInterval::Integer(value) => value.to_string(),
        RawInterval::Float(value) => value.to_string(),
    })
}
