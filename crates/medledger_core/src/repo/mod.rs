//! Repository layer for ledger persistence.
//!
//! # Responsibility
//! - Define the load/save contract consumed by the ledger service.
//! - Isolate SQLite and JSON payload details from business orchestration.
//!
//! # Invariants
//! - Writes must pass `MedicationRecord::validate()` before persistence.
//! - A missing record reads as the empty default, never as an error.

pub mod ledger_repo;
