//! Request routing from decoded envelopes to spoken responses.
//!
//! # Responsibility
//! - Route launch, intent and session-ended requests.
//! - Run ledger intents through `LedgerService` for the requesting user.
//! - Turn every failure into a spoken response.
//!
//! # Invariants
//! - `handle_json` never panics and always returns a JSON response envelope.
//! - Exactly one ledger operation runs per request.

use crate::config::SkillConfig;
use crate::envelope::{RequestEnvelope, RequestKind, ResponseEnvelope};
use crate::intent::{
    decode_intent, SkillIntent, DAY_SLOT, HOURS_SLOT, MEDICATION_SLOT, TIME_SLOT,
};
use log::{info, warn};
use medledger_core::db::open_db;
use medledger_core::{LedgerService, LedgerStore, SqliteLedgerStore};

pub const LAUNCH_MESSAGE: &str = "Hello! How can I help with your medications?";
pub const HELP_MESSAGE: &str = "You can register a medication, mark one as taken, change its interval, or ask which medications you still need to take. How can I help?";
pub const GOODBYE_MESSAGE: &str = "Goodbye!";
pub const FALLBACK_MESSAGE: &str = "Sorry, I did not understand that. Could you repeat?";
pub const APOLOGY_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

// Serialized `ResponseEnvelope::speak_and_end(APOLOGY_MESSAGE)`.
const APOLOGY_JSON: &str = r#"{"version":"1.0","response":{"outputSpeech":{"type":"PlainText","text":"Sorry, something went wrong. Please try again."},"shouldEndSession":true}}"#;

/// Routes skill requests for one ledger store.
pub struct SkillRouter<S: LedgerStore> {
    service: LedgerService<S>,
}

impl<S: LedgerStore> SkillRouter<S> {
    pub fn new(service: LedgerService<S>) -> Self {
        Self { service }
    }

    /// Produces the response for one decoded request.
    pub fn handle(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        let kind = match envelope.kind() {
            Ok(kind) => kind,
            Err(err) => {
                warn!("event=skill_request module=router status=error error_code=envelope_invalid error={err}");
                return apology();
            }
        };

        match kind {
            RequestKind::Launch => ResponseEnvelope::speak_and_listen(LAUNCH_MESSAGE),
            RequestKind::SessionEnded => {
                info!("event=session_ended module=router status=ok");
                ResponseEnvelope::empty()
            }
            RequestKind::Unsupported(request_type) => {
                warn!("event=skill_request module=router status=error error_code=request_unsupported request_type={request_type}");
                apology()
            }
            RequestKind::Intent(intent) => self.handle_intent(envelope, decode_intent(intent)),
        }
    }

    /// Decodes, routes and encodes one raw JSON request.
    pub fn handle_json(&self, raw: &str) -> String {
        let response = match RequestEnvelope::from_json(raw) {
            Ok(envelope) => self.handle(&envelope),
            Err(err) => {
                warn!("event=skill_request module=router status=error error_code=envelope_invalid error={err}");
                apology()
            }
        };
        encode(&response)
    }

    fn handle_intent(&self, envelope: &RequestEnvelope, intent: SkillIntent) -> ResponseEnvelope {
        match intent {
            SkillIntent::Ledger(operation) => {
                let Some(user_id) = envelope.user_id() else {
                    warn!(
                        "event=skill_request module=router status=error op={} error_code=user_missing",
                        operation.label()
                    );
                    return apology();
                };
                let outcome = self.service.execute(user_id, &operation);
                ResponseEnvelope::speak_and_listen(outcome.message)
            }
            SkillIntent::Help => ResponseEnvelope::speak_and_listen(HELP_MESSAGE),
            SkillIntent::Stop => ResponseEnvelope::speak_and_end(GOODBYE_MESSAGE),
            SkillIntent::Fallback => ResponseEnvelope::speak_and_listen(FALLBACK_MESSAGE),
            SkillIntent::MissingSlot(slot) => {
                ResponseEnvelope::speak_and_listen(missing_slot_prompt(slot))
            }
            SkillIntent::Unknown(name) => {
                ResponseEnvelope::speak_and_end(format!("You just triggered {name}."))
            }
        }
    }
}

/// Handles one raw request against the ledger database named by `config`.
///
/// Opens a fresh connection per request; open failures become the generic
/// apology response.
pub fn handle_request(config: &SkillConfig, raw: &str) -> String {
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=skill_request module=router status=error error_code=db_open_failed error={err}");
            return APOLOGY_JSON.to_string();
        }
    };
    let store = match SqliteLedgerStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => {
            warn!("event=skill_request module=router status=error error_code=store_init_failed error={err}");
            return APOLOGY_JSON.to_string();
        }
    };
    SkillRouter::new(LedgerService::new(store)).handle_json(raw)
}

fn missing_slot_prompt(slot: &str) -> String {
    let label = match slot {
        MEDICATION_SLOT => "the medication name",
        HOURS_SLOT => "the interval in hours",
        TIME_SLOT => "the time",
        DAY_SLOT => "the day",
        other => other,
    };
    format!("Please tell me {label}.")
}

fn apology() -> ResponseEnvelope {
    ResponseEnvelope::speak_and_end(APOLOGY_MESSAGE)
}

fn encode(response: &ResponseEnvelope) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| APOLOGY_JSON.to_string())
}

#[cfg(test)]
mod tests {
    use super::{apology, encode, handle_request, SkillRouter, APOLOGY_JSON, LAUNCH_MESSAGE};
    use crate::config::SkillConfig;
    use medledger_core::db::open_db_in_memory;
    use medledger_core::{LedgerService, SqliteLedgerStore};
    use serde_json::{json, Value};

    fn intent_request(user_id: &str, name: &str, slots: Value) -> String {
        json!({
            "session": {"user": {"userId": user_id}},
            "request": {
                "type": "IntentRequest",
                "intent": {"name": name, "slots": slots}
            }
        })
        .to_string()
    }

    fn speech(raw_response: &str) -> String {
        let value: Value = serde_json::from_str(raw_response).unwrap();
        value["response"]["outputSpeech"]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn apology_constant_matches_encoded_response() {
        assert_eq!(encode(&apology()), APOLOGY_JSON);
    }

    #[test]
    fn launch_greets_and_keeps_session_open() {
        let conn = open_db_in_memory().unwrap();
        let router = SkillRouter::new(LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap()));

        let raw = router.handle_json(r#"{"request":{"type":"LaunchRequest"}}"#);
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["response"]["outputSpeech"]["text"], LAUNCH_MESSAGE);
        assert_eq!(value["response"]["shouldEndSession"], false);
    }

    #[test]
    fn register_then_list_through_intents() {
        let conn = open_db_in_memory().unwrap();
        let router = SkillRouter::new(LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap()));

        for (name, hours) in [("aspirin", "8"), ("ibuprofen", "6"), ("vitamin d", "24")] {
            router.handle_json(&intent_request(
                "user-1",
                "RegisterMedicationIntent",
                json!({"medication": {"value": name}, "hours": {"value": hours}}),
            ));
        }

        let listed = router.handle_json(&intent_request("user-1", "ListMedicationsIntent", json!({})));
        assert_eq!(
            speech(&listed),
            "Your registered medications are: aspirin, ibuprofen and vitamin d."
        );
    }

    #[test]
    fn duplicate_registration_is_spoken() {
        let conn = open_db_in_memory().unwrap();
        let router = SkillRouter::new(LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap()));
        let request = intent_request(
            "user-1",
            "RegisterMedicationIntent",
            json!({"medication": {"value": "aspirin"}, "hours": {"value": "8"}}),
        );

        router.handle_json(&request);
        let second = router.handle_json(&request);
        assert_eq!(speech(&second), "Oops! Medication aspirin was already registered.");
    }

    #[test]
    fn context_user_without_id_uses_session_user() {
        let conn = open_db_in_memory().unwrap();
        let router = SkillRouter::new(LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap()));

        let raw = router.handle_json(
            r#"{"session":{"user":{"userId":"u1"}},"context":{"System":{"user":{}}},"request":{"type":"IntentRequest","intent":{"name":"ListMedicationsIntent"}}}"#,
        );
        assert_eq!(speech(&raw), "You have no medications registered yet.");
    }

    #[test]
    fn missing_slot_prompts_instead_of_calling_ledger() {
        let conn = open_db_in_memory().unwrap();
        let router = SkillRouter::new(LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap()));

        let raw = router.handle_json(&intent_request("user-1", "MarkTakenIntent", json!({})));
        assert_eq!(speech(&raw), "Please tell me the medication name.");
    }

    #[test]
    fn ledger_intent_without_user_gets_apology() {
        let conn = open_db_in_memory().unwrap();
        let router = SkillRouter::new(LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap()));

        let raw = router.handle_json(
            r#"{"request":{"type":"IntentRequest","intent":{"name":"ListMedicationsIntent"}}}"#,
        );
        assert_eq!(raw, APOLOGY_JSON);
    }

    #[test]
    fn malformed_and_unsupported_requests_get_apology() {
        let conn = open_db_in_memory().unwrap();
        let router = SkillRouter::new(LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap()));

        assert_eq!(router.handle_json("not json"), APOLOGY_JSON);
        assert_eq!(
            router.handle_json(r#"{"request":{"type":"Display.ElementSelected"}}"#),
            APOLOGY_JSON
        );
    }

    #[test]
    fn session_end_stop_and_unknown_intents() {
        let conn = open_db_in_memory().unwrap();
        let router = SkillRouter::new(LedgerService::new(SqliteLedgerStore::try_new(&conn).unwrap()));

        let ended: Value = serde_json::from_str(
            &router.handle_json(r#"{"request":{"type":"SessionEndedRequest"}}"#),
        )
        .unwrap();
        assert!(ended["response"].get("outputSpeech").is_none());

        let stop = router.handle_json(&intent_request("user-1", "AMAZON.StopIntent", json!({})));
        assert_eq!(speech(&stop), "Goodbye!");

        let unknown = router.handle_json(&intent_request("user-1", "WeatherIntent", json!({})));
        assert_eq!(speech(&unknown), "You just triggered WeatherIntent.");
    }

    #[test]
    fn handle_request_persists_between_calls() {
        let dir = tempfile::tempdir().unwrap();
        let config = SkillConfig {
            db_path: dir.path().join("ledger.db"),
            log_level: "info".to_string(),
            log_dir: None,
        };

        handle_request(
            &config,
            &intent_request(
                "user-1",
                "RegisterMedicationIntent",
                json!({"medication": {"value": "aspirin"}, "hours": {"value": "8"}}),
            ),
        );
        handle_request(
            &config,
            &intent_request("user-1", "MarkTakenIntent", json!({"medication": {"value": "aspirin"}})),
        );

        let remaining = handle_request(
            &config,
            &intent_request("user-1", "ListRemainingIntent", json!({})),
        );
        assert_eq!(
            speech(&remaining),
            "You have taken all of your medications today."
        );
    }

    #[test]
    fn handle_request_with_unopenable_db_gets_apology() {
        let dir = tempfile::tempdir().unwrap();
        let config = SkillConfig {
            db_path: dir.path().join("missing-dir").join("ledger.db"),
            log_level: "info".to_string(),
            log_dir: None,
        };

        let raw = handle_request(&config, r#"{"request":{"type":"LaunchRequest"}}"#);
        assert_eq!(raw, APOLOGY_JSON);
    }
}
