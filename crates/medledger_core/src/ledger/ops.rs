//! Ledger operation implementations.

use super::input::{MedicationRef, RegisterInput, RescheduleInput, ScheduleAgendaInput};
use super::{LedgerOutcome, OutcomeKind};
use crate::model::medication::{AgendaEntry, Medication, MedicationRecord};
use crate::speech;

/// Appends a new medication unless the name is already registered.
pub fn register(record: &MedicationRecord, input: &RegisterInput) -> LedgerOutcome {
    if record.find_medication(&input.name).is_some() {
        return LedgerOutcome::unchanged(
            OutcomeKind::AlreadyRegistered,
            speech::already_registered(&input.name),
        );
    }

    let mut next = record.clone();
    next.medications_mut().push(Medication::new(
        input.name.clone(),
        input.interval_hours.clone(),
    ));
    LedgerOutcome::changed(next, speech::registered(&input.name, &input.interval_hours))
}

/// Deletes the first medication with a matching name.
pub fn remove(record: &MedicationRecord, target: &MedicationRef) -> LedgerOutcome {
    let Some(index) = position_of(record, &target.name) else {
        return not_found(&target.name);
    };

    let mut next = record.clone();
    next.medications_mut().remove(index);
    LedgerOutcome::changed(next, speech::removed(&target.name))
}

/// Replaces the interval of every medication with a matching name.
pub fn reschedule(record: &MedicationRecord, input: &RescheduleInput) -> LedgerOutcome {
    let Some(previous) = interval_for(record, &input.name) else {
        return not_found(&input.name);
    };
    let message = speech::rescheduled(&input.name, previous, &input.new_interval_hours);

    let mut next = record.clone();
    for item in next
        .medications_mut()
        .iter_mut()
        .filter(|item| item.name == input.name)
    {
        item.time_interval_hours = input.new_interval_hours.clone();
    }
    LedgerOutcome::changed(next, message)
}

/// Increments the taken counter of a medication by one.
pub fn mark_taken(record: &MedicationRecord, target: &MedicationRef) -> LedgerOutcome {
    let Some(index) = position_of(record, &target.name) else {
        return not_found(&target.name);
    };

    let mut next = record.clone();
    let item = &mut next.medications_mut()[index];
    item.times_taken_today = item.times_taken_today.saturating_add(1);
    LedgerOutcome::changed(next, speech::marked_taken(&target.name))
}

/// Enumerates every registered medication name.
pub fn list_all(record: &MedicationRecord) -> LedgerOutcome {
    let items = record.medications();
    if items.is_empty() {
        return empty_list();
    }
    let names = items.iter().map(|item| item.name.as_str()).collect::<Vec<_>>();
    LedgerOutcome::unchanged(OutcomeKind::Success, speech::registered_list(&names))
}

/// Enumerates medications taken at least once.
pub fn list_taken(record: &MedicationRecord) -> LedgerOutcome {
    let items = record.medications();
    if items.is_empty() {
        return empty_list();
    }
    let taken = items.iter().filter(|item| item.is_taken()).collect::<Vec<_>>();
    LedgerOutcome::unchanged(OutcomeKind::Success, speech::taken_list(&taken))
}

/// Enumerates medications not taken yet.
pub fn list_remaining(record: &MedicationRecord) -> LedgerOutcome {
    let items = record.medications();
    if items.is_empty() {
        return empty_list();
    }
    let remaining = items
        .iter()
        .filter(|item| !item.is_taken())
        .collect::<Vec<_>>();
    LedgerOutcome::unchanged(OutcomeKind::Success, speech::remaining_list(&remaining))
}

/// Describes interval and taken count of every medication.
pub fn list_detailed(record: &MedicationRecord) -> LedgerOutcome {
    let items = record.medications();
    if items.is_empty() {
        return empty_list();
    }
    LedgerOutcome::unchanged(OutcomeKind::Success, speech::detailed_list(items))
}

/// Enumerates every medication with its taken count.
pub fn daily_overview(record: &MedicationRecord) -> LedgerOutcome {
    let items = record.medications();
    if items.is_empty() {
        return empty_list();
    }
    LedgerOutcome::unchanged(OutcomeKind::Success, speech::daily_overview(items))
}

/// Speaks the interval registered for one medication.
pub fn find_interval_for(record: &MedicationRecord, target: &MedicationRef) -> LedgerOutcome {
    match interval_for(record, &target.name) {
        Some(interval) => LedgerOutcome::unchanged(
            OutcomeKind::Success,
            speech::interval_for(&target.name, interval),
        ),
        None => not_found(&target.name),
    }
}

/// Returns the raw interval registered for `name`.
pub fn interval_for<'a>(record: &'a MedicationRecord, name: &str) -> Option<&'a str> {
    record
        .find_medication(name)
        .map(|item| item.time_interval_hours.as_str())
}

/// Appends an agenda entry unless the name is already booked.
pub fn schedule_agenda(record: &MedicationRecord, input: &ScheduleAgendaInput) -> LedgerOutcome {
    if record.has_agenda_entry(&input.name) {
        return LedgerOutcome::unchanged(
            OutcomeKind::AlreadyScheduled,
            speech::already_scheduled(&input.name),
        );
    }

    let mut next = record.clone();
    next.agenda_mut().push(AgendaEntry::new(
        input.name.clone(),
        input.time.clone(),
        input.day.clone(),
    ));
    LedgerOutcome::changed(next, speech::scheduled(&input.name, &input.day, &input.time))
}

fn position_of(record: &MedicationRecord, name: &str) -> Option<usize> {
    record.medications().iter().position(|item| item.name == name)
}

fn not_found(name: &str) -> LedgerOutcome {
    LedgerOutcome::unchanged(OutcomeKind::NotFound, speech::not_found(name))
}

fn empty_list() -> LedgerOutcome {
    LedgerOutcome::unchanged(OutcomeKind::EmptyList, speech::no_medications())
}
