//! HTTP API over the task store.
//!
//! A thin axum service exposing the filter/statistics pipeline. The same
//! router serves two variants: the full one accepts the CRUD surface, the
//! read-only one rejects every mutation with a READ_ONLY error while still
//! serving tasks, statistics and the single-page fallback.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::api::{
    now_rfc3339, ApiError, ApiErrorCode, ErrorBody, HealthResponse, ListMeta, StatsResponse,
    TasksResponse,
};
use crate::fields::{Priority, Status};
use crate::filter::{self, Criteria};
use crate::stats;
use crate::store::Store;
use crate::task::{TaskDraft, TaskPatch};
use crate::validate;

/// Frontend entry document served for any route the API does not claim.
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared server state. The store lives behind a read/write lock; the JSON
/// file is rewritten after every successful mutation.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<Store>>,
    db_path: Arc<PathBuf>,
    read_only: bool,
}

impl AppState {
    pub fn new(store: Store, db_path: PathBuf, read_only: bool) -> Self {
        AppState {
            store: Arc::new(RwLock::new(store)),
            db_path: Arc::new(db_path),
            read_only,
        }
    }
}

/// An API error paired with the HTTP status it maps to.
#[derive(Debug)]
struct HttpError(StatusCode, ApiError);

impl HttpError {
    fn invalid_query(parameter: &str, value: &str, allowed: &str) -> Self {
        HttpError(
            StatusCode::BAD_REQUEST,
            ApiError::new(
                ApiErrorCode::InvalidQueryParameter,
                format!("Invalid {parameter} value. Must be one of: {allowed}"),
                json!({"parameter": parameter, "value": value}),
            ),
        )
    }

    fn validation(errors: Vec<String>) -> Self {
        HttpError(
            StatusCode::BAD_REQUEST,
            ApiError::new(
                ApiErrorCode::ValidationError,
                "Task validation failed",
                json!({"errors": errors}),
            ),
        )
    }

    fn not_found(id: u64) -> Self {
        HttpError(
            StatusCode::NOT_FOUND,
            ApiError::new(
                ApiErrorCode::NotFound,
                format!("Task {id} not found"),
                json!({"id": id}),
            ),
        )
    }

    fn read_only() -> Self {
        HttpError(
            StatusCode::FORBIDDEN,
            ApiError::new(
                ApiErrorCode::ReadOnly,
                "Server is running in read-only mode",
                json!({}),
            ),
        )
    }

    fn internal(message: &str) -> Self {
        HttpError(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new(ApiErrorCode::Internal, message, json!({})),
        )
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorBody { error: self.1 })).into_response()
    }
}

/// Build filter criteria from raw query parameters, rejecting unknown enum
/// values. Absent parameters and the literal "all" are wildcards.
fn criteria_from_query(params: &HashMap<String, String>) -> Result<Criteria, HttpError> {
    let mut criteria = Criteria::default();
    if let Some(raw) = params.get("status").filter(|v| v.as_str() != "all") {
        criteria.status = Some(
            Status::parse(raw)
                .ok_or_else(|| HttpError::invalid_query("status", raw, "todo, in-progress, done"))?,
        );
    }
    if let Some(raw) = params.get("priority").filter(|v| v.as_str() != "all") {
        criteria.priority = Some(
            Priority::parse(raw)
                .ok_or_else(|| HttpError::invalid_query("priority", raw, "low, medium, high"))?,
        );
    }
    if let Some(search) = params.get("search") {
        criteria.search = search.clone();
    }
    Ok(criteria)
}

async fn list_tasks_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TasksResponse>, HttpError> {
    let criteria = criteria_from_query(&params)?;
    let store = state.store.read().await;
    let filtered: Vec<_> = filter::apply(&store.tasks, &criteria)
        .into_iter()
        .cloned()
        .collect();
    let snapshot = stats::aggregate(&filtered);
    Ok(Json(TasksResponse {
        meta: ListMeta {
            total: store.tasks.len(),
            filtered: filtered.len(),
            timestamp: now_rfc3339(),
            degraded: store.degraded,
        },
        stats: snapshot,
        tasks: filtered,
    }))
}

async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.read().await;
    Json(StatsResponse {
        statistics: stats::aggregate(&store.tasks),
        timestamp: now_rfc3339(),
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

async fn create_task_handler(
    State(state): State<AppState>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Response), HttpError> {
    if state.read_only {
        return Err(HttpError::read_only());
    }
    let errors = validate::validate_draft(&draft);
    if !errors.is_empty() {
        return Err(HttpError::validation(errors));
    }
    let mut store = state.store.write().await;
    let task = store.create(draft);
    if let Err(e) = store.save(&state.db_path) {
        error!(error = %e, "failed to persist created task");
        store.remove(task.id);
        return Err(HttpError::internal("Failed to save task"));
    }
    info!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task).into_response()))
}

async fn update_task_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Response, HttpError> {
    if state.read_only {
        return Err(HttpError::read_only());
    }
    let errors = validate::validate_patch(&patch);
    if !errors.is_empty() {
        return Err(HttpError::validation(errors));
    }
    let mut store = state.store.write().await;
    let previous = store.get(id).cloned().ok_or_else(|| HttpError::not_found(id))?;
    let task = store.update(id, patch).ok_or_else(|| HttpError::not_found(id))?;
    if let Err(e) = store.save(&state.db_path) {
        error!(error = %e, id, "failed to persist updated task");
        if let Some(slot) = store.get_mut(id) {
            *slot = previous;
        }
        return Err(HttpError::internal("Failed to save task"));
    }
    info!(id, "task updated");
    Ok(Json(task).into_response())
}

async fn delete_task_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, HttpError> {
    if state.read_only {
        return Err(HttpError::read_only());
    }
    let mut store = state.store.write().await;
    let previous = store.get(id).cloned().ok_or_else(|| HttpError::not_found(id))?;
    store.remove(id);
    if let Err(e) = store.save(&state.db_path) {
        error!(error = %e, id, "failed to persist deletion");
        store.tasks.push(previous);
        return Err(HttpError::internal("Failed to save task"));
    }
    info!(id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Any route the API does not claim serves the frontend entry document.
async fn spa_fallback() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Build the router for the given state. Mutating handlers reject requests
/// with a READ_ONLY error when the state is read-only.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/api/tasks/{id}",
            axum::routing::put(update_task_handler).delete(delete_task_handler),
        )
        .route("/api/tasks/stats", get(stats_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/health", get(health_handler))
        .fallback(spa_fallback)
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn run(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let read_only = state.read_only;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, read_only, "taskflow server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
