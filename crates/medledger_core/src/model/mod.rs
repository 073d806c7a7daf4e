//! Domain model for one user's medication ledger.
//!
//! # Responsibility
//! - Define the persisted record shape shared by ledger operations and storage.
//! - Own record-level invariant checks.
//!
//! # Invariants
//! - One `MedicationRecord` per user; it is the unit of load/save.
//! - Medication and agenda names are unique within their own sequence.

pub mod medication;
