//! Spoken message text for ledger outcomes.
//!
//! # Responsibility
//! - Own every user-facing sentence produced by the core.
//! - Implement the spoken enumeration join rule.
//!
//! # Invariants
//! - Every message is built from an empty `String`; no branch appends to a
//!   partially initialized value.
//! - Medication names are rendered verbatim.

use crate::model::medication::Medication;

/// Joins items for speech: `A, B and C`, `A and B`, `A`.
///
/// Items before the second-to-last are followed by `", "`, the second-to-last
/// by `" and "`, and the last by nothing.
pub fn join_spoken<S: AsRef<str>>(items: &[S]) -> String {
    let count = items.len();
    let mut spoken = String::new();
    for (index, item) in items.iter().enumerate() {
        spoken.push_str(item.as_ref());
        if index + 2 < count {
            spoken.push_str(", ");
        } else if index + 2 == count {
            spoken.push_str(" and ");
        }
    }
    spoken
}

pub fn registered(name: &str, interval_hours: &str) -> String {
    format!("Medication {name} was registered to be taken every {interval_hours} hours.")
}

pub fn already_registered(name: &str) -> String {
    format!("Oops! Medication {name} was already registered.")
}

pub fn not_found(name: &str) -> String {
    format!("Oops! Medication {name} was not found in your medication list.")
}

pub fn removed(name: &str) -> String {
    format!("Medication {name} was removed.")
}

pub fn rescheduled(name: &str, previous: &str, next: &str) -> String {
    format!("Okay! Medication {name} was changed from every {previous} hours to every {next} hours.")
}

pub fn marked_taken(name: &str) -> String {
    format!("Okay! {name} was marked as taken.")
}

pub fn interval_for(name: &str, interval_hours: &str) -> String {
    format!("{name} is to be taken every {interval_hours} hours.")
}

pub fn scheduled(name: &str, day: &str, time: &str) -> String {
    format!("Medication {name} was scheduled for {day} at {time}.")
}

pub fn already_scheduled(name: &str) -> String {
    format!("Oops! Medication {name} was already scheduled.")
}

pub fn no_medications() -> String {
    "You have no medications registered yet.".to_string()
}

pub fn storage_failure() -> String {
    "Sorry, I could not reach your medication list right now. Please try again.".to_string()
}

/// `Your registered medications are: A, B and C.`
pub fn registered_list(names: &[&str]) -> String {
    let mut spoken = String::from("Your registered medications are: ");
    spoken.push_str(&join_spoken(names));
    spoken.push('.');
    spoken
}

/// Taken medications; the count is spoken only when greater than one.
pub fn taken_list(items: &[&Medication]) -> String {
    if items.is_empty() {
        return "You have not taken any medication today.".to_string();
    }
    let rendered = items
        .iter()
        .map(|item| {
            if item.times_taken_today > 1 {
                format!("{} ({})", item.name, item.times_taken_today)
            } else {
                item.name.clone()
            }
        })
        .collect::<Vec<_>>();
    let mut spoken = String::from("Your medications taken today are: ");
    spoken.push_str(&join_spoken(&rendered));
    spoken
}

pub fn remaining_list(items: &[&Medication]) -> String {
    if items.is_empty() {
        return "You have taken all of your medications today.".to_string();
    }
    let names = items.iter().map(|item| item.name.as_str()).collect::<Vec<_>>();
    let mut spoken = String::from("Your medications not yet taken today are: ");
    spoken.push_str(&join_spoken(&names));
    spoken
}

/// One sentence per medication, separated by a single space.
pub fn detailed_list(items: &[Medication]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} is to be taken every {} hours and was taken {} today.",
                item.name,
                item.time_interval_hours,
                times(item.times_taken_today)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn daily_overview(items: &[Medication]) -> String {
    let rendered = items
        .iter()
        .map(|item| format!("{} (taken {})", item.name, times(item.times_taken_today)))
        .collect::<Vec<_>>();
    let mut spoken = String::from("Your medications for today are: ");
    spoken.push_str(&join_spoken(&rendered));
    spoken
}

fn times(count: u32) -> String {
    if count == 1 {
        "1 time".to_string()
    } else {
        format!("{count} times")
    }
}
