//! Application state and optimistic updates
//!
//! Tasks and calendar events live behind mutexes and are mutated by one
//! writer at a time (the UI event handler). Optimistic mutations flip
//! local state first, then confirm against the backend; a failed
//! confirmation reverts exactly the record it touched. No lock is held
//! across an await.

use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

use crate::api::TaskApi;
use crate::config::Config;
use crate::error::ApiError;
use crate::types::{CalendarEvent, Task};

/// Shared application state.
pub struct AppState {
    pub tasks: Mutex<Vec<Task>>,
    pub calendar_events: Mutex<Vec<CalendarEvent>>,
    pub config: Mutex<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            calendar_events: Mutex::new(Vec::new()),
            config: Mutex::new(config),
        }
    }

    /// Replace the task mirror with a fresh backend payload.
    pub fn set_tasks(&self, tasks: Vec<Task>) {
        if let Ok(mut guard) = self.tasks.lock() {
            *guard = tasks;
        }
    }

    pub fn tasks_snapshot(&self) -> Vec<Task> {
        self.tasks
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn events_snapshot(&self) -> Vec<CalendarEvent> {
        self.calendar_events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn config_snapshot(&self) -> Config {
        self.config
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Append newly loaded Google events, skipping ids already present.
    ///
    /// Ranges overlap by a month of buffer, so refetches routinely carry
    /// events we already hold. Returns the number actually added.
    pub fn merge_loaded_events(&self, new_events: Vec<CalendarEvent>) -> usize {
        let Ok(mut guard) = self.calendar_events.lock() else {
            return 0;
        };
        let existing: std::collections::HashSet<String> =
            guard.iter().map(|e| e.id.clone()).collect();
        let before = guard.len();
        guard.extend(
            new_events
                .into_iter()
                .filter(|e| !existing.contains(&e.id)),
        );
        let added = guard.len() - before;
        log::debug!("merged {} new calendar events ({} held)", added, guard.len());
        added
    }
}

/// Toggle a task's completion optimistically.
///
/// Local state flips immediately; the backend confirms in the background
/// of the caller's task. On success the canonical record replaces the
/// local one. On failure the task's prior completion value is restored
/// and no other task is affected. No automatic retry.
pub async fn toggle_task_completion(
    state: &AppState,
    api: &dyn TaskApi,
    task_id: i64,
    completed: bool,
) -> Result<Task, ApiError> {
    let prior = {
        let mut guard = state
            .tasks
            .lock()
            .map_err(|_| ApiError::State("task state lock poisoned".to_string()))?;
        let task = guard
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ApiError::State(format!("unknown task id {}", task_id)))?;
        let prior = task.is_completed;
        task.is_completed = completed;
        prior
    };

    match api.update_task_completion(task_id, completed).await {
        Ok(canonical) => {
            if let Ok(mut guard) = state.tasks.lock() {
                if let Some(task) = guard.iter_mut().find(|t| t.id == task_id) {
                    *task = canonical.clone();
                }
            }
            Ok(canonical)
        }
        Err(err) => {
            if let Ok(mut guard) = state.tasks.lock() {
                if let Some(task) = guard.iter_mut().find(|t| t.id == task_id) {
                    task.is_completed = prior;
                }
            }
            log::warn!("completion sync failed for task {}, reverted: {}", task_id, err);
            Err(err)
        }
    }
}

/// Apply a task edit optimistically.
///
/// Unlike completion toggling, a failed sync keeps the local edit: the
/// next full reload resyncs with the backend. Returns the effective
/// record (canonical on success, local otherwise).
pub async fn apply_task_update(state: &AppState, api: &dyn TaskApi, mut updated: Task) -> Task {
    updated.updated_at = Some(Utc::now().to_rfc3339());

    if let Ok(mut guard) = state.tasks.lock() {
        if let Some(task) = guard.iter_mut().find(|t| t.id == updated.id) {
            *task = updated.clone();
        }
    }

    match api.update_task(&updated).await {
        Ok(canonical) => {
            if let Ok(mut guard) = state.tasks.lock() {
                if let Some(task) = guard.iter_mut().find(|t| t.id == canonical.id) {
                    *task = canonical.clone();
                }
            }
            canonical
        }
        Err(err) => {
            log::warn!(
                "update sync failed for task {}, keeping local edit: {}",
                updated.id,
                err
            );
            updated
        }
    }
}

/// Tracks which "YYYY-MM-DD" windows have already been fetched so the
/// host can skip redundant event loads.
#[derive(Debug, Default)]
pub struct RangeTracker {
    loaded: Vec<(NaiveDate, NaiveDate)>,
}

impl RangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the window is fully contained in an already-loaded one.
    pub fn is_loaded(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.loaded
            .iter()
            .any(|(s, e)| start >= *s && end <= *e)
    }

    /// Record a window after its fetch succeeded. A failed fetch is never
    /// recorded, so the same window is retried on the next navigation.
    pub fn mark_loaded(&mut self, start: NaiveDate, end: NaiveDate) {
        self.loaded.push((start, end));
    }

    /// Decide whether a requested window needs a fetch. Pure query: the
    /// host calls `mark_loaded` once the fetch actually succeeds.
    /// Unparseable bounds never fetch.
    pub fn request(&self, start_date: &str, end_date: &str) -> bool {
        let (Ok(start), Ok(end)) = (
            NaiveDate::parse_from_str(start_date, "%Y-%m-%d"),
            NaiveDate::parse_from_str(end_date, "%Y-%m-%d"),
        ) else {
            log::warn!("ignoring malformed load window {start_date}..{end_date}");
            return false;
        };

        if self.is_loaded(start, end) {
            log::debug!("window {start_date}..{end_date} already loaded");
            return false;
        }
        true
    }
}
