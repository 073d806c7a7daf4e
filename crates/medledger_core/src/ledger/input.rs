//! Typed, validated inputs for ledger operations.
//!
//! Callers build these at the request boundary; the ledger never sees raw
//! slot maps.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected operation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A required field was empty after trimming.
    Blank(&'static str),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank(field) => write!(f, "`{field}` cannot be blank"),
        }
    }
}

impl Error for InputError {}

/// Input for registering a medication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterInput {
    pub name: String,
    pub interval_hours: String,
}

/// Reference to one medication by exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationRef {
    pub name: String,
}

/// Input for changing a medication interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleInput {
    pub name: String,
    pub new_interval_hours: String,
}

/// Input for booking a one-off agenda entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleAgendaInput {
    pub name: String,
    pub time: String,
    pub day: String,
}

impl RegisterInput {
    pub fn new(
        name: impl Into<String>,
        interval_hours: impl Into<String>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            name: required("name", name.into())?,
            interval_hours: required("interval_hours", interval_hours.into())?,
        })
    }
}

impl MedicationRef {
    pub fn new(name: impl Into<String>) -> Result<Self, InputError> {
        Ok(Self {
            name: required("name", name.into())?,
        })
    }
}

impl RescheduleInput {
    pub fn new(
        name: impl Into<String>,
        new_interval_hours: impl Into<String>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            name: required("name", name.into())?,
            new_interval_hours: required("new_interval_hours", new_interval_hours.into())?,
        })
    }
}

impl ScheduleAgendaInput {
    pub fn new(
        name: impl Into<String>,
        time: impl Into<String>,
        day: impl Into<String>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            name: required("name", name.into())?,
            time: required("time", time.into())?,
            day: required("day", day.into())?,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InputError::Blank(field));
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}
