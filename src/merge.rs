//! Merge and deduplicate app task events with Google Calendar events
//!
//! The dedup key is (title, calendar day of start, source). Time-of-day is
//! deliberately ignored: the product treats two same-titled, same-day
//! entries from one source as the same item. App events are concatenated
//! first, so they win ties against Google copies of themselves.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::types::{DisplayEvent, EventSource};

type DedupKey = (String, NaiveDate, EventSource);

/// Merge both lists, keeping only the first occurrence of each key.
///
/// Output order is input order (app events first); output length is never
/// greater than the combined input length.
pub fn merge_events(
    task_events: Vec<DisplayEvent>,
    google_events: Vec<DisplayEvent>,
) -> Vec<DisplayEvent> {
    let total = task_events.len() + google_events.len();
    let mut seen: HashSet<DedupKey> = HashSet::with_capacity(total);
    let mut merged = Vec::with_capacity(total);

    for event in task_events.into_iter().chain(google_events) {
        let key = (event.title.clone(), event.start.date(), event.source());
        if seen.insert(key) {
            merged.push(event);
        } else {
            log::debug!("deduplicated event: {} ({})", event.title, event.id);
        }
    }

    merged
}
