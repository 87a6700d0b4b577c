//! Event normalization: tasks and Google Calendar records into the unified
//! display shape
//!
//! Records with malformed or missing dates are silently excluded; the
//! calendar never fails on bad input, it just omits the item.

use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use regex::Regex;

use crate::range::{day_start, day_end};
use crate::types::{CalendarEvent, DisplayEvent, EventResource, Task, VisibleRange};

/// Fixed duration assumed for timed tasks (the backend stores no end time).
const DEFAULT_TASK_DURATION_HOURS: i64 = 1;

/// Convert tasks into display events.
///
/// Excluded: completed tasks, tasks without a parseable due date, and
/// tasks whose due date falls outside the visible range. A task with a
/// parseable `due_time` renders as a one-hour timed event; otherwise it
/// spans the whole day.
pub fn task_events(tasks: &[Task], range: &VisibleRange) -> Vec<DisplayEvent> {
    tasks
        .iter()
        .filter(|task| !task.is_completed)
        .filter_map(|task| {
            let date = parse_task_date(task.due_date.as_deref()?)?;
            if !range.contains(day_start(date)) {
                return None;
            }

            let time = task.due_time.as_deref().and_then(parse_task_time);
            let (start, end, all_day) = match time {
                Some(t) => {
                    let start = date.and_time(t);
                    (start, start + Duration::hours(DEFAULT_TASK_DURATION_HOURS), false)
                }
                None => (day_start(date), day_end(date), true),
            };

            Some(DisplayEvent {
                id: task.id.to_string(),
                title: task.title.clone(),
                start,
                end,
                all_day,
                resource: EventResource::App {
                    task_id: task.id,
                    priority: task.priority,
                    project: task.project.clone(),
                },
            })
        })
        .collect()
}

/// Convert Google Calendar events into display events.
///
/// All-day events span [00:00:00, 23:59:59] of their start date — the same
/// day, not the provider's next-day end, so they never stretch across a day
/// boundary in the grid. Timed events keep their source timestamps,
/// converted to user-local wall time. Titles are cleaned of embedded
/// "HH:MM" fragments.
pub fn google_events(events: &[CalendarEvent], range: &VisibleRange, tz: &Tz) -> Vec<DisplayEvent> {
    events
        .iter()
        .filter_map(|event| {
            let (start, end, all_day) = if event.is_all_day {
                let date = NaiveDate::parse_from_str(&event.start, "%Y-%m-%d").ok()?;
                let end = date.and_time(NaiveTime::from_hms_opt(23, 59, 59)?);
                (day_start(date), end, true)
            } else {
                let start = parse_event_datetime(&event.start, tz)?;
                let end = parse_event_datetime(&event.end, tz)?;
                (start, end, false)
            };

            if !range.contains(start) {
                return None;
            }

            Some(DisplayEvent {
                id: event.id.clone(),
                title: clean_title(&event.title),
                start,
                end,
                all_day,
                resource: EventResource::GoogleCalendar {
                    html_link: event.html_link.clone(),
                    color: event.color.clone(),
                    calendar_id: event.calendar_id.clone(),
                    description: event.description.clone(),
                },
            })
        })
        .collect()
}

/// Strip embedded time patterns from a Google event title.
///
/// Some calendars bake "14:00 - 15:00" into the summary; the grid already
/// renders times, so the duplicate text is removed. Falls back to the
/// original title when cleaning would empty it.
pub fn clean_title(title: &str) -> String {
    let cleaned = time_span_re().replace_all(title, "");
    let cleaned = leading_time_re().replace_all(&cleaned, "");
    let cleaned = trailing_time_re().replace_all(&cleaned, "");
    let cleaned = bare_time_re().replace_all(&cleaned, "");
    let cleaned = whitespace_re().replace_all(&cleaned, " ");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        title.to_string()
    } else {
        cleaned.to_string()
    }
}

// Compile-once regex patterns via OnceLock.

fn time_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}:\d{2}\s*[-–—]\s*\d{1,2}:\d{2}\s*").unwrap())
}

fn leading_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}:\d{2}\s*").unwrap())
}

fn trailing_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*[-–—]\s*\d{1,2}:\d{2}\s*$").unwrap())
}

fn bare_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}:\d{2}").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Parse a task due date: "YYYY-MM-DD", or a full ISO datetime from which
/// only the date matters.
fn parse_task_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Parse a task due time: "HH:MM:SS" or "HH:MM".
fn parse_task_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Parse a timed-event timestamp into user-local wall time.
///
/// RFC 3339 with offset is converted through the configured timezone; a
/// bare datetime is taken as already-local.
fn parse_event_datetime(raw: &str, tz: &Tz) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}
