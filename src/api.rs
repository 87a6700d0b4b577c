//! REST client for the TodoFast backend
//!
//! The core only knows the collaborator traits; `HttpApi` is the real
//! implementation over reqwest. Session/CSRF handling lives on the host
//! side and is out of scope here.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::types::{CalendarEvent, Task};

/// Request timeout applied to every backend call.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Task mutations and reads against the backend.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// Confirm a completion toggle. Returns the canonical updated task.
    async fn update_task_completion(&self, task_id: i64, completed: bool)
        -> Result<Task, ApiError>;

    async fn update_task(&self, task: &Task) -> Result<Task, ApiError>;
}

/// Fetch Google Calendar events for a date window ("YYYY-MM-DD" bounds).
#[async_trait]
pub trait EventFetcher: Send + Sync {
    async fn fetch_events(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<CalendarEvent>, ApiError>;
}

/// Fire-and-forget lazy-load notification from the view binder.
///
/// The host decides whether the window is already covered and whether to
/// actually fetch; the core never awaits a result.
pub trait EventLoader: Send + Sync {
    fn load_events_for_range(&self, start_date: &str, end_date: &str);
}

/// HTTP implementation of the backend collaborators.
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Classify a transport error.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(REQUEST_TIMEOUT_SECS)
    } else if err.is_decode() {
        ApiError::Parse(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Turn a non-2xx response into a Rejected error with the body as message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// `/api/calendar/events/` envelope.
#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

#[async_trait]
impl TaskApi for HttpApi {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/tasks/"))
            .send()
            .await
            .map_err(map_request_error)?;
        check_status(response)
            .await?
            .json::<Vec<Task>>()
            .await
            .map_err(map_request_error)
    }

    async fn update_task_completion(
        &self,
        task_id: i64,
        completed: bool,
    ) -> Result<Task, ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("/api/tasks/{}/", task_id)))
            .json(&json!({ "is_completed": completed }))
            .send()
            .await
            .map_err(map_request_error)?;
        check_status(response)
            .await?
            .json::<Task>()
            .await
            .map_err(map_request_error)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/api/tasks/{}/", task.id)))
            .json(task)
            .send()
            .await
            .map_err(map_request_error)?;
        check_status(response)
            .await?
            .json::<Task>()
            .await
            .map_err(map_request_error)
    }
}

#[async_trait]
impl EventFetcher for HttpApi {
    async fn fetch_events(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<CalendarEvent>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/calendar/events/"))
            .query(&[("start_date", start_date), ("end_date", end_date)])
            .send()
            .await
            .map_err(map_request_error)?;
        let body: EventsResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(map_request_error)?;

        if !body.success {
            log::debug!("calendar events response without success flag; treating as empty");
            return Ok(Vec::new());
        }
        Ok(body.events)
    }
}
