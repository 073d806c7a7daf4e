//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate load -> apply -> save for one request.
//! - Keep request collaborators decoupled from storage details.

pub mod ledger_service;
