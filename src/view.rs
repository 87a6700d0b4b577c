//! View binder: the calendar's only persistent UI state
//!
//! View mode and reference date are the two stateful inputs; the range,
//! the event list, styles, and interaction outcomes are all pure
//! recomputations from them plus the externally supplied task/event
//! arrays. The last pipeline run is memoized per identical inputs, the
//! same way the frontend memoized its derived event list.

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use chrono_tz::Tz;

use crate::api::EventLoader;
use crate::config::Config;
use crate::merge::merge_events;
use crate::normalize::{google_events, task_events};
use crate::range::{load_window, visible_range};
use crate::types::{
    CalendarEvent, DisplayEvent, EventResource, EventSelection, EventStyle, NavigateAction, Task,
    TaskPrefill, ViewMode, VisibleRange,
};

/// Default span for a slot selection that carries no usable end.
const DEFAULT_SLOT_MINUTES: i64 = 30;

// Priority palette (matches the task list's chips).
const PRIORITY_HIGH: &str = "#FFD6D3";
const PRIORITY_MEDIUM_HIGH: &str = "#FBE7C3";
const PRIORITY_MEDIUM: &str = "#DDE6F9";
const PRIORITY_LOW: &str = "#F2EFED";
const TASK_TEXT: &str = "#202020";
const GOOGLE_TEXT: &str = "#333333";
const TRANSPARENT: &str = "transparent";

struct Memo {
    range: VisibleRange,
    tasks: Vec<Task>,
    events: Vec<CalendarEvent>,
    output: Vec<DisplayEvent>,
}

pub struct CalendarView {
    view: ViewMode,
    date: NaiveDate,
    tz: Tz,
    last_notified: Option<(String, String)>,
    memo: Option<Memo>,
}

impl CalendarView {
    pub fn new(config: &Config, today: NaiveDate) -> Self {
        Self {
            view: config.default_view,
            date: today,
            tz: config.tz(),
            last_notified: None,
            memo: None,
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn set_view(&mut self, view: ViewMode) {
        if self.view != view {
            self.view = view;
            self.memo = None;
        }
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        if self.date != date {
            self.date = date;
            self.memo = None;
        }
    }

    /// Step the reference date by one unit of the current view.
    pub fn navigate(&mut self, action: NavigateAction, today: NaiveDate) {
        let next = match action {
            NavigateAction::Today => today,
            NavigateAction::Previous => self.step(-1),
            NavigateAction::Next => self.step(1),
        };
        self.set_date(next);
    }

    fn step(&self, direction: i64) -> NaiveDate {
        match self.view {
            ViewMode::Month => {
                let months = Months::new(1);
                let shifted = if direction < 0 {
                    self.date.checked_sub_months(months)
                } else {
                    self.date.checked_add_months(months)
                };
                shifted.unwrap_or(self.date)
            }
            ViewMode::Week => self.date + Duration::days(7 * direction),
            ViewMode::Day => self.date + Duration::days(direction),
            ViewMode::Agenda => self.date + Duration::days(30 * direction),
        }
    }

    pub fn visible_range(&self) -> VisibleRange {
        visible_range(self.date, self.view)
    }

    /// Fire-and-forget lazy-load notification.
    ///
    /// Notifies the loader with the month-padded window whenever it
    /// differs from the last one sent. Loading state is the host's
    /// problem; the core only recomputes from whatever it is handed.
    pub fn sync_range(&mut self, loader: &dyn EventLoader) {
        let window = load_window(&self.visible_range());
        if self.last_notified.as_ref() != Some(&window) {
            loader.load_events_for_range(&window.0, &window.1);
            self.last_notified = Some(window);
        }
    }

    /// Run the full pipeline: filter, normalize, merge, dedup.
    ///
    /// Pure in its inputs; identical (range, tasks, events) return the
    /// memoized list from the previous call.
    pub fn display_events(
        &mut self,
        tasks: &[Task],
        events: &[CalendarEvent],
    ) -> Vec<DisplayEvent> {
        let range = self.visible_range();

        if let Some(memo) = &self.memo {
            if memo.range == range && memo.tasks == tasks && memo.events == events {
                return memo.output.clone();
            }
        }

        let from_tasks = task_events(tasks, &range);
        let from_google = google_events(events, &range, &self.tz);
        log::debug!(
            "calendar pipeline: {} task events + {} google events in {:?} view",
            from_tasks.len(),
            from_google.len(),
            self.view
        );
        let output = merge_events(from_tasks, from_google);

        self.memo = Some(Memo {
            range,
            tasks: tasks.to_vec(),
            events: events.to_vec(),
            output: output.clone(),
        });
        output
    }

    /// Per-event style: four fixed priority colors for app tasks,
    /// transparent chrome for Google events.
    pub fn event_style(&self, event: &DisplayEvent) -> EventStyle {
        match &event.resource {
            EventResource::GoogleCalendar { .. } => EventStyle {
                background_color: TRANSPARENT,
                border_color: TRANSPARENT,
                text_color: GOOGLE_TEXT,
            },
            EventResource::App { priority, .. } => {
                let color = match priority {
                    1 => PRIORITY_HIGH,
                    2 => PRIORITY_MEDIUM_HIGH,
                    3 => PRIORITY_MEDIUM,
                    _ => PRIORITY_LOW,
                };
                EventStyle {
                    background_color: color,
                    border_color: color,
                    text_color: TASK_TEXT,
                }
            }
        }
    }

    /// Interpret an event selection for the host.
    pub fn select_event(&self, event: &DisplayEvent) -> EventSelection {
        match &event.resource {
            EventResource::GoogleCalendar { html_link, .. } if !html_link.is_empty() => {
                EventSelection::OpenLink(html_link.clone())
            }
            EventResource::GoogleCalendar { .. } => EventSelection::Ignore,
            EventResource::App { task_id, .. } => EventSelection::OpenTaskDetail(*task_id),
        }
    }

    /// Turn an empty-slot selection into a task-creation prefill.
    ///
    /// Slots shorter than the default span get a 30-minute end. Month-view
    /// and midnight selections carry no time-of-day (all-day task).
    pub fn select_slot(&self, start: NaiveDateTime, end: Option<NaiveDateTime>) -> TaskPrefill {
        let default_end = start + Duration::minutes(DEFAULT_SLOT_MINUTES);
        let end_time = match end {
            Some(e) if e - start >= Duration::minutes(DEFAULT_SLOT_MINUTES) => e,
            _ => default_end,
        };

        let all_day =
            self.view == ViewMode::Month || (start.hour() == 0 && start.minute() == 0);

        TaskPrefill {
            due_date: start.date().format("%Y-%m-%d").to_string(),
            due_time: if all_day {
                None
            } else {
                Some(start.format("%H:%M").to_string())
            },
            start_time: start,
            end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_view(view: ViewMode, reference: NaiveDate) -> CalendarView {
        let mut calendar = CalendarView::new(&Config::default(), reference);
        calendar.set_view(view);
        calendar
    }

    fn make_task(id: i64, due_date: &str, due_time: Option<&str>, priority: u8) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: String::new(),
            due_date: Some(due_date.to_string()),
            due_time: due_time.map(str::to_string),
            priority,
            project: None,
            is_completed: false,
            updated_at: None,
        }
    }

    fn make_gcal_event(id: &str, title: &str) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: title.to_string(),
            start: "2024-03-10".to_string(),
            end: "2024-03-11".to_string(),
            is_all_day: true,
            description: String::new(),
            html_link: "https://calendar.google.com/e".to_string(),
            color: None,
            calendar_id: "primary".to_string(),
            calendar_summary: String::new(),
        }
    }

    /// Records every load notification.
    #[derive(Default)]
    struct RecordingLoader {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl EventLoader for RecordingLoader {
        fn load_events_for_range(&self, start_date: &str, end_date: &str) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((start_date.to_string(), end_date.to_string()));
            }
        }
    }

    #[test]
    fn test_navigate_month_steps() {
        let mut view = make_view(ViewMode::Month, date(2024, 3, 15));
        view.navigate(NavigateAction::Next, date(2024, 3, 15));
        assert_eq!(view.date(), date(2024, 4, 15));
        view.navigate(NavigateAction::Previous, date(2024, 3, 15));
        view.navigate(NavigateAction::Previous, date(2024, 3, 15));
        assert_eq!(view.date(), date(2024, 2, 15));
        view.navigate(NavigateAction::Today, date(2024, 3, 15));
        assert_eq!(view.date(), date(2024, 3, 15));
    }

    #[test]
    fn test_navigate_month_clamps_end_of_month() {
        let mut view = make_view(ViewMode::Month, date(2024, 1, 31));
        view.navigate(NavigateAction::Next, date(2024, 1, 31));
        assert_eq!(view.date(), date(2024, 2, 29));
    }

    #[test]
    fn test_navigate_week_and_day_steps() {
        let mut view = make_view(ViewMode::Week, date(2024, 3, 15));
        view.navigate(NavigateAction::Next, date(2024, 3, 15));
        assert_eq!(view.date(), date(2024, 3, 22));

        view.set_view(ViewMode::Day);
        view.navigate(NavigateAction::Previous, date(2024, 3, 22));
        assert_eq!(view.date(), date(2024, 3, 21));
    }

    #[test]
    fn test_sync_range_notifies_once_per_window() {
        let mut view = make_view(ViewMode::Month, date(2024, 3, 15));
        let loader = RecordingLoader::default();

        view.sync_range(&loader);
        view.sync_range(&loader);
        assert_eq!(loader.calls.lock().unwrap().len(), 1);
        assert_eq!(
            loader.calls.lock().unwrap()[0],
            ("2024-01-23".to_string(), "2024-05-07".to_string())
        );

        // Changing the reference date changes the window.
        view.navigate(NavigateAction::Next, date(2024, 3, 15));
        view.sync_range(&loader);
        assert_eq!(loader.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_display_events_merges_and_dedups() {
        let mut view = make_view(ViewMode::Month, date(2024, 3, 15));
        let tasks = vec![make_task(1, "2024-03-15", Some("10:00"), 1)];
        let events = vec![
            make_gcal_event("e1", "Standup"),
            make_gcal_event("e2", "Standup"),
        ];

        let display = view.display_events(&tasks, &events);
        assert_eq!(display.len(), 2);
        assert_eq!(display[0].id, "1");
        assert_eq!(display[1].title, "Standup");
    }

    #[test]
    fn test_display_events_idempotent_and_memoized() {
        let mut view = make_view(ViewMode::Month, date(2024, 3, 15));
        let tasks = vec![make_task(1, "2024-03-15", None, 2)];
        let events = vec![make_gcal_event("e1", "Sync")];

        let first = view.display_events(&tasks, &events);
        let second = view.display_events(&tasks, &events);
        assert_eq!(first, second);

        // A changed input invalidates the memo.
        let more_tasks = vec![
            make_task(1, "2024-03-15", None, 2),
            make_task(2, "2024-03-16", None, 2),
        ];
        let third = view.display_events(&more_tasks, &events);
        assert_eq!(third.len(), 3);
    }

    #[test]
    fn test_every_event_overlaps_producing_range() {
        let mut view = make_view(ViewMode::Week, date(2024, 3, 12));
        let tasks = vec![
            make_task(1, "2024-03-12", Some("09:00"), 1),
            make_task(2, "2024-05-01", None, 1),
        ];
        let range = view.visible_range();
        for event in view.display_events(&tasks, &[]) {
            assert!(event.start <= range.end && event.end >= range.start);
        }
    }

    #[test]
    fn test_priority_palette() {
        let view = make_view(ViewMode::Month, date(2024, 3, 15));
        let task_event = |priority: u8| DisplayEvent {
            id: "1".to_string(),
            title: "t".to_string(),
            start: date(2024, 3, 15).and_hms_opt(10, 0, 0).unwrap(),
            end: date(2024, 3, 15).and_hms_opt(11, 0, 0).unwrap(),
            all_day: false,
            resource: EventResource::App {
                task_id: 1,
                priority,
                project: None,
            },
        };

        assert_eq!(view.event_style(&task_event(1)).background_color, "#FFD6D3");
        assert_eq!(view.event_style(&task_event(2)).background_color, "#FBE7C3");
        assert_eq!(view.event_style(&task_event(3)).background_color, "#DDE6F9");
        assert_eq!(view.event_style(&task_event(4)).background_color, "#F2EFED");
        // Out-of-range priorities fall back to the low-priority chip.
        assert_eq!(view.event_style(&task_event(9)).background_color, "#F2EFED");
    }

    #[test]
    fn test_google_events_render_transparent() {
        let view = make_view(ViewMode::Month, date(2024, 3, 15));
        let event = DisplayEvent {
            id: "e".to_string(),
            title: "x".to_string(),
            start: date(2024, 3, 15).and_hms_opt(10, 0, 0).unwrap(),
            end: date(2024, 3, 15).and_hms_opt(11, 0, 0).unwrap(),
            all_day: false,
            resource: EventResource::GoogleCalendar {
                html_link: String::new(),
                color: None,
                calendar_id: "primary".to_string(),
                description: String::new(),
            },
        };
        let style = view.event_style(&event);
        assert_eq!(style.background_color, "transparent");
        assert_eq!(style.text_color, "#333333");
    }

    #[test]
    fn test_select_event_routing() {
        let view = make_view(ViewMode::Month, date(2024, 3, 15));
        let linked = DisplayEvent {
            id: "e".to_string(),
            title: "x".to_string(),
            start: date(2024, 3, 15).and_hms_opt(10, 0, 0).unwrap(),
            end: date(2024, 3, 15).and_hms_opt(11, 0, 0).unwrap(),
            all_day: false,
            resource: EventResource::GoogleCalendar {
                html_link: "https://calendar.google.com/e".to_string(),
                color: None,
                calendar_id: "primary".to_string(),
                description: String::new(),
            },
        };
        assert_eq!(
            view.select_event(&linked),
            EventSelection::OpenLink("https://calendar.google.com/e".to_string())
        );

        let task = DisplayEvent {
            resource: EventResource::App {
                task_id: 42,
                priority: 1,
                project: None,
            },
            ..linked.clone()
        };
        assert_eq!(view.select_event(&task), EventSelection::OpenTaskDetail(42));
    }

    #[test]
    fn test_select_slot_timed_in_week_view() {
        let view = make_view(ViewMode::Week, date(2024, 3, 15));
        let start = date(2024, 3, 12).and_hms_opt(14, 0, 0).unwrap();
        let prefill = view.select_slot(start, None);
        assert_eq!(prefill.due_date, "2024-03-12");
        assert_eq!(prefill.due_time.as_deref(), Some("14:00"));
        assert_eq!(prefill.end_time - prefill.start_time, Duration::minutes(30));
    }

    #[test]
    fn test_select_slot_short_end_extended() {
        let view = make_view(ViewMode::Week, date(2024, 3, 15));
        let start = date(2024, 3, 12).and_hms_opt(14, 0, 0).unwrap();
        let short_end = start + Duration::minutes(10);
        let prefill = view.select_slot(start, Some(short_end));
        assert_eq!(prefill.end_time - prefill.start_time, Duration::minutes(30));

        let long_end = start + Duration::hours(2);
        let prefill = view.select_slot(start, Some(long_end));
        assert_eq!(prefill.end_time, long_end);
    }

    #[test]
    fn test_select_slot_month_view_is_all_day() {
        let view = make_view(ViewMode::Month, date(2024, 3, 15));
        let start = date(2024, 3, 12).and_hms_opt(0, 0, 0).unwrap();
        let prefill = view.select_slot(start, None);
        assert_eq!(prefill.due_date, "2024-03-12");
        assert!(prefill.due_time.is_none());
    }
}
