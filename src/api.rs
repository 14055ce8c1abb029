//! Wire types shared by the HTTP server and the remote task service client.
//!
//! Error responses always carry a structured body of the shape
//! `{ "error": { "code", "message", "details" } }` so clients can react to
//! the code while showing the message.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stats::Snapshot;
use crate::task::Task;

/// Machine-readable error categories for the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    InvalidQueryParameter,
    ValidationError,
    NotFound,
    ReadOnly,
    Internal,
}

/// Structured error payload, nested under `"error"` in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        ApiError {
            code,
            message: message.into(),
            details,
        }
    }
}

/// Envelope for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ApiError,
}

/// Request metadata attached to task listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMeta {
    /// Tasks in the store before filtering.
    pub total: usize,
    /// Tasks remaining after filtering.
    pub filtered: usize,
    pub timestamp: String,
    /// True when the backing file existed but could not be read and the
    /// server is running on an empty store.
    #[serde(default)]
    pub degraded: bool,
}

/// Response for `GET /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
    /// Snapshot of the filtered sequence.
    pub stats: Snapshot,
    pub meta: ListMeta,
}

/// Response for `GET /api/tasks/stats` and `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub statistics: Snapshot,
    pub timestamp: String,
}

/// Response for `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        HealthResponse {
            status: "ok".to_string(),
            timestamp: now_rfc3339(),
        }
    }
}

/// Current time in the RFC 3339 form used by every timestamped response.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
