//! Key dates pulled out of the extracted facts.

use std::sync::OnceLock;

use jiff::civil::Date;
use regex::Regex;

use crate::models::{Facts, TimelineEvent};

const EXTRACTED_DESCRIPTION: &str = "Event extracted from case facts.";

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"\d{4}").expect("year pattern is valid"))
}

/// Builds the case timeline from the facts map.
///
/// A fact counts as an event when its key mentions "date" or its value
/// contains a four-digit run. With no such fact, a single "CASE INITIATED"
/// event dated `today` is returned, so the timeline is never empty.
pub fn extract_events(facts: &Facts, today: Date) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> = facts
        .iter()
        .filter(|(key, value)| {
            key.to_lowercase().contains("date") || year_pattern().is_match(value)
        })
        .map(|(key, value)| TimelineEvent {
            title: key.replace('_', " ").to_uppercase(),
            date: value.clone(),
            description: EXTRACTED_DESCRIPTION.to_string(),
        })
        .collect();

    if events.is_empty() {
        events.push(TimelineEvent {
            title: "CASE INITIATED".to_string(),
            date: today.to_string(),
            description: "Initial consultation started.".to_string(),
        });
    }
    events
}
