//! Voice-skill boundary for the medication ledger.
//!
//! # Responsibility
//! - Decode platform request envelopes and route intents to the ledger.
//! - Resolve runtime configuration from the environment.
//!
//! # Invariants
//! - Public entry points never panic; every failure becomes a spoken response.

pub mod config;
pub mod envelope;
pub mod intent;
pub mod router;

pub use config::{ConfigError, SkillConfig};
pub use envelope::{EnvelopeError, RequestEnvelope, ResponseEnvelope};
pub use intent::{decode_intent, SkillIntent};
pub use router::{handle_request, SkillRouter};
