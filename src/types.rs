use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A task record as mirrored from the TodoFast backend.
///
/// `due_date` and `due_time` stay as the raw strings the REST API sends
/// ("YYYY-MM-DD" or a full ISO datetime; "HH:MM[:SS]"). Parsing happens in
/// the normalizer so a malformed value degrades to "excluded from the
/// calendar" instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub due_time: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    /// Project name (the backend serializes the relation by name).
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_priority() -> u8 {
    4
}

/// A Google Calendar event as delivered by `/api/calendar/events/`.
///
/// Read-only from the core's perspective. `start`/`end` are "YYYY-MM-DD"
/// for all-day events and an ISO datetime otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub html_link: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub calendar_id: String,
    #[serde(default)]
    pub calendar_summary: String,
}

/// Which side of the merge an event came from. Part of the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    App,
    GoogleCalendar,
}

/// Source-specific metadata carried on a display event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EventResource {
    App {
        task_id: i64,
        priority: u8,
        project: Option<String>,
    },
    GoogleCalendar {
        html_link: String,
        color: Option<String>,
        calendar_id: String,
        description: String,
    },
}

impl EventResource {
    pub fn source(&self) -> EventSource {
        match self {
            EventResource::App { .. } => EventSource::App,
            EventResource::GoogleCalendar { .. } => EventSource::GoogleCalendar,
        }
    }
}

/// The unified shape the rendering surface consumes.
///
/// Constructed fresh on every recomputation; never persisted. Timestamps
/// are user-local wall time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub resource: EventResource,
}

impl DisplayEvent {
    pub fn source(&self) -> EventSource {
        self.resource.source()
    }
}

/// Calendar view granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Month,
    Week,
    Day,
    Agenda,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Month
    }
}

/// The date window currently rendered. Derived from (reference date,
/// view mode) and recomputed whenever either changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl VisibleRange {
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.start && t <= self.end
    }

    pub fn days(&self) -> (NaiveDate, NaiveDate) {
        (self.start.date(), self.end.date())
    }
}

/// Prefill payload handed to the task-creation modal after a slot
/// selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPrefill {
    /// "YYYY-MM-DD"
    pub due_date: String,
    /// "HH:MM"; None for all-day / month-view selections.
    pub due_time: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Navigation actions relayed from the calendar toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateAction {
    Previous,
    Next,
    Today,
}

/// What the host should do after the user selects an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSelection {
    /// Google event with a link: open it in a new context.
    OpenLink(String),
    /// App task: request the detail view.
    OpenTaskDetail(i64),
    /// Google event without a link: nothing to do.
    Ignore,
}

/// Inline style values for one rendered event. The renderer applies these
/// through its theming API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStyle {
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserializes_backend_payload() {
        let json = r#"{
            "id": 7,
            "title": "לקנות חלב",
            "due_date": "2024-03-15",
            "due_time": "14:30:00",
            "priority": 2,
            "project": "בית",
            "is_completed": false
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.due_date.as_deref(), Some("2024-03-15"));
        assert_eq!(task.priority, 2);
        assert!(!task.is_completed);
    }

    #[test]
    fn test_task_defaults_for_missing_fields() {
        let task: Task = serde_json::from_str(r#"{"id": 1, "title": "x"}"#).unwrap();
        assert_eq!(task.priority, 4);
        assert!(task.due_date.is_none());
        assert!(task.due_time.is_none());
    }

    #[test]
    fn test_event_resource_source_tag() {
        let resource = EventResource::GoogleCalendar {
            html_link: "https://calendar.google.com/event".to_string(),
            color: None,
            calendar_id: "primary".to_string(),
            description: String::new(),
        };
        assert_eq!(resource.source(), EventSource::GoogleCalendar);
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["source"], "google_calendar");
    }

    #[test]
    fn test_view_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ViewMode::Agenda).unwrap(), "\"agenda\"");
        let v: ViewMode = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(v, ViewMode::Month);
    }
}
