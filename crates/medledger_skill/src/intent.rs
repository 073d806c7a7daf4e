//! Intent decoding into typed ledger operations.
//!
//! # Responsibility
//! - Map intent names to ledger operations or built-in conversational intents.
//! - Extract and normalize slot values into validated ledger inputs.
//!
//! # Invariants
//! - Slot values are trimmed and inner whitespace is collapsed to one space.
//! - A missing or blank required slot never reaches the ledger.

use crate::envelope::IntentPayload;
use medledger_core::{
    InputError, LedgerOperation, MedicationRef, RegisterInput, RescheduleInput,
    ScheduleAgendaInput,
};
use once_cell::sync::Lazy;
use regex::Regex;

pub const REGISTER_INTENT: &str = "RegisterMedicationIntent";
pub const REMOVE_INTENT: &str = "RemoveMedicationIntent";
pub const CHANGE_INTERVAL_INTENT: &str = "ChangeIntervalIntent";
pub const MARK_TAKEN_INTENT: &str = "MarkTakenIntent";
pub const LIST_INTENT: &str = "ListMedicationsIntent";
pub const LIST_TAKEN_INTENT: &str = "ListTakenIntent";
pub const LIST_REMAINING_INTENT: &str = "ListRemainingIntent";
pub const LIST_DETAILED_INTENT: &str = "ListDetailedIntent";
pub const DAILY_OVERVIEW_INTENT: &str = "DailyOverviewIntent";
pub const INTERVAL_INTENT: &str = "MedicationIntervalIntent";
pub const SCHEDULE_INTENT: &str = "ScheduleMedicationIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

pub const MEDICATION_SLOT: &str = "medication";
pub const HOURS_SLOT: &str = "hours";
pub const TIME_SLOT: &str = "time";
pub const DAY_SLOT: &str = "day";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Decoded intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillIntent {
    Ledger(LedgerOperation),
    Help,
    Stop,
    Fallback,
    /// A required slot was missing or blank.
    MissingSlot(&'static str),
    /// Intent name not handled by this skill.
    Unknown(String),
}

/// Decodes one intent payload.
pub fn decode_intent(intent: &IntentPayload) -> SkillIntent {
    let decoded = match intent.name.as_str() {
        REGISTER_INTENT => register(intent),
        REMOVE_INTENT => medication_ref(intent).map(LedgerOperation::Remove),
        CHANGE_INTERVAL_INTENT => reschedule(intent),
        MARK_TAKEN_INTENT => medication_ref(intent).map(LedgerOperation::MarkTaken),
        LIST_INTENT => Ok(LedgerOperation::ListAll),
        LIST_TAKEN_INTENT => Ok(LedgerOperation::ListTaken),
        LIST_REMAINING_INTENT => Ok(LedgerOperation::ListRemaining),
        LIST_DETAILED_INTENT => Ok(LedgerOperation::ListDetailed),
        DAILY_OVERVIEW_INTENT => Ok(LedgerOperation::DailyOverview),
        INTERVAL_INTENT => medication_ref(intent).map(LedgerOperation::FindIntervalFor),
        SCHEDULE_INTENT => schedule(intent),
        HELP_INTENT => return SkillIntent::Help,
        CANCEL_INTENT | STOP_INTENT => return SkillIntent::Stop,
        FALLBACK_INTENT => return SkillIntent::Fallback,
        other => return SkillIntent::Unknown(other.to_string()),
    };

    match decoded {
        Ok(operation) => SkillIntent::Ledger(operation),
        Err(slot) => SkillIntent::MissingSlot(slot),
    }
}

/// Returns the normalized value of `name`, or `None` when missing or blank.
pub fn slot_value(intent: &IntentPayload, name: &str) -> Option<String> {
    let raw = intent.slots.get(name)?.value.as_deref()?;
    let normalized = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.into_owned())
    }
}

fn register(intent: &IntentPayload) -> Result<LedgerOperation, &'static str> {
    let name = required(intent, MEDICATION_SLOT)?;
    let hours = required(intent, HOURS_SLOT)?;
    RegisterInput::new(name, hours)
        .map(LedgerOperation::Register)
        .map_err(slot_for)
}

fn reschedule(intent: &IntentPayload) -> Result<LedgerOperation, &'static str> {
    let name = required(intent, MEDICATION_SLOT)?;
    let hours = required(intent, HOURS_SLOT)?;
    RescheduleInput::new(name, hours)
        .map(LedgerOperation::Reschedule)
        .map_err(slot_for)
}

fn schedule(intent: &IntentPayload) -> Result<LedgerOperation, &'static str> {
    let name = required(intent, MEDICATION_SLOT)?;
    let time = required(intent, TIME_SLOT)?;
    let day = required(intent, DAY_SLOT)?;
    ScheduleAgendaInput::new(name, time, day)
        .map(LedgerOperation::ScheduleAgenda)
        .map_err(slot_for)
}

fn medication_ref(intent: &IntentPayload) -> Result<MedicationRef, &'static str> {
    MedicationRef::new(required(intent, MEDICATION_SLOT)?).map_err(slot_for)
}

fn required(intent: &IntentPayload, slot: &'static str) -> Result<String, &'static str> {
    slot_value(intent, slot).ok_or(slot)
}

fn slot_for(err: InputError) -> &'static str {
    match err {
        InputError::Blank("interval_hours" | "new_interval_hours") => HOURS_SLOT,
        InputError::Blank("time") => TIME_SLOT,
        InputError::Blank("day") => DAY_SLOT,
        InputError::Blank(_) => MEDICATION_SLOT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{IntentPayload, Slot};

    fn intent(name: &str, slots: &[(&str, &str)]) -> IntentPayload {
        IntentPayload {
            name: name.to_string(),
            slots: slots
                .iter()
                .map(|(key, value)| {
                    (
                        key.to_string(),
                        Slot {
                            value: Some(value.to_string()),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn register_intent_builds_trimmed_input() {
        let decoded = decode_intent(&intent(
            "RegisterMedicationIntent",
            &[("medication", "  vitamin   d "), ("hours", "24")],
        ));
        assert_eq!(
            decoded,
            SkillIntent::Ledger(LedgerOperation::Register(
                RegisterInput::new("vitamin d", "24").unwrap()
            ))
        );
    }

    #[test]
    fn missing_slot_is_reported_by_name() {
        let decoded = decode_intent(&intent("RegisterMedicationIntent", &[("medication", "x")]));
        assert_eq!(decoded, SkillIntent::MissingSlot("hours"));

        let blank = decode_intent(&intent("MarkTakenIntent", &[("medication", "   ")]));
        assert_eq!(blank, SkillIntent::MissingSlot("medication"));
    }

    #[test]
    fn schedule_intent_requires_time_and_day() {
        let decoded = decode_intent(&intent(
            "ScheduleMedicationIntent",
            &[("medication", "aspirin"), ("time", "10"), ("day", "monday")],
        ));
        assert_eq!(
            decoded,
            SkillIntent::Ledger(LedgerOperation::ScheduleAgenda(
                ScheduleAgendaInput::new("aspirin", "10", "monday").unwrap()
            ))
        );
        let missing_day = decode_intent(&intent(
            "ScheduleMedicationIntent",
            &[("medication", "aspirin"), ("time", "10")],
        ));
        assert_eq!(missing_day, SkillIntent::MissingSlot("day"));
    }

    #[test]
    fn builtin_and_unknown_intents() {
        assert_eq!(decode_intent(&intent("AMAZON.StopIntent", &[])), SkillIntent::Stop);
        assert_eq!(decode_intent(&intent("AMAZON.CancelIntent", &[])), SkillIntent::Stop);
        assert_eq!(decode_intent(&intent("AMAZON.HelpIntent", &[])), SkillIntent::Help);
        assert_eq!(
            decode_intent(&intent("WeatherIntent", &[])),
            SkillIntent::Unknown("WeatherIntent".to_string())
        );
    }

    #[test]
    fn every_intent_name_decodes_to_its_operation() {
        let full = [
            ("medication", "aspirin"),
            ("hours", "8"),
            ("time", "10"),
            ("day", "monday"),
        ];
        let aspirin = || MedicationRef::new("aspirin").unwrap();
        let cases = [
            (
                REGISTER_INTENT,
                SkillIntent::Ledger(LedgerOperation::Register(
                    RegisterInput::new("aspirin", "8").unwrap(),
                )),
            ),
            (REMOVE_INTENT, SkillIntent::Ledger(LedgerOperation::Remove(aspirin()))),
            (
                CHANGE_INTERVAL_INTENT,
                SkillIntent::Ledger(LedgerOperation::Reschedule(
                    RescheduleInput::new("aspirin", "8").unwrap(),
                )),
            ),
            (MARK_TAKEN_INTENT, SkillIntent::Ledger(LedgerOperation::MarkTaken(aspirin()))),
            (LIST_INTENT, SkillIntent::Ledger(LedgerOperation::ListAll)),
            (LIST_TAKEN_INTENT, SkillIntent::Ledger(LedgerOperation::ListTaken)),
            (LIST_REMAINING_INTENT, SkillIntent::Ledger(LedgerOperation::ListRemaining)),
            (LIST_DETAILED_INTENT, SkillIntent::Ledger(LedgerOperation::ListDetailed)),
            (DAILY_OVERVIEW_INTENT, SkillIntent::Ledger(LedgerOperation::DailyOverview)),
            (
                INTERVAL_INTENT,
                SkillIntent::Ledger(LedgerOperation::FindIntervalFor(aspirin())),
            ),
            (
                SCHEDULE_INTENT,
                SkillIntent::Ledger(LedgerOperation::ScheduleAgenda(
                    ScheduleAgendaInput::new("aspirin", "10", "monday").unwrap(),
                )),
            ),
            (HELP_INTENT, SkillIntent::Help),
            (CANCEL_INTENT, SkillIntent::Stop),
            (STOP_INTENT, SkillIntent::Stop),
            (FALLBACK_INTENT, SkillIntent::Fallback),
        ];

        for (name, expected) in cases {
            assert_eq!(decode_intent(&intent(name, &full)), expected, "intent {name}");
        }
    }

    #[test]
    fn slot_value_without_value_is_none() {
        let mut payload = intent("MarkTakenIntent", &[]);
        payload
            .slots
            .insert("medication".to_string(), Slot { value: None });
        assert_eq!(slot_value(&payload, "medication"), None);
    }
}
