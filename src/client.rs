//! The task service boundary.
//!
//! Every mutation the UI makes flows through `TaskService`, so the
//! coordination layer neither knows nor cares whether tasks live in a local
//! JSON file or behind a running TaskFlow server. Tests swap in a failing
//! fake to exercise the error paths.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::api::{ErrorBody, TasksResponse};
use crate::store::Store;
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::validate;

/// Failure categories surfaced by a task service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The payload failed validation; messages are user-facing.
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("task {0} not found")]
    NotFound(u64),
    /// The transport failed; the cause is retained for logging only.
    #[error("network error: {0}")]
    Transport(String),
    /// The backend answered with an error status.
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Snapshot of the task sequence plus the store's degraded flag.
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    pub degraded: bool,
}

/// The seam through which the UI reads and mutates tasks.
pub trait TaskService {
    fn load(&mut self) -> Result<LoadedTasks, ServiceError>;
    fn create(&mut self, draft: TaskDraft) -> Result<Task, ServiceError>;
    fn update(&mut self, id: u64, patch: TaskPatch) -> Result<Task, ServiceError>;
    fn delete(&mut self, id: u64) -> Result<(), ServiceError>;
}

/// Service over the local JSON store. Every mutation is validated, applied
/// in memory and persisted before it is reported successful.
pub struct FileService {
    path: PathBuf,
    store: Store,
}

impl FileService {
    pub fn new(path: PathBuf) -> Self {
        let store = Store::load(&path);
        FileService { path, store }
    }
}

impl TaskService for FileService {
    fn load(&mut self) -> Result<LoadedTasks, ServiceError> {
        self.store = Store::load(&self.path);
        Ok(LoadedTasks {
            tasks: self.store.tasks.clone(),
            degraded: self.store.degraded,
        })
    }

    fn create(&mut self, draft: TaskDraft) -> Result<Task, ServiceError> {
        let errors = validate::validate_draft(&draft);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let task = self.store.create(draft);
        match self.store.save(&self.path) {
            Ok(()) => Ok(task),
            Err(e) => {
                // Keep the in-memory store consistent with disk.
                self.store.remove(task.id);
                Err(ServiceError::Storage(e))
            }
        }
    }

    fn update(&mut self, id: u64, patch: TaskPatch) -> Result<Task, ServiceError> {
        let errors = validate::validate_patch(&patch);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let previous = self
            .store
            .get(id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))?;
        let task = self
            .store
            .update(id, patch)
            .ok_or(ServiceError::NotFound(id))?;
        match self.store.save(&self.path) {
            Ok(()) => Ok(task),
            Err(e) => {
                if let Some(slot) = self.store.get_mut(id) {
                    *slot = previous;
                }
                Err(ServiceError::Storage(e))
            }
        }
    }

    fn delete(&mut self, id: u64) -> Result<(), ServiceError> {
        let previous = self
            .store
            .get(id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))?;
        self.store.remove(id);
        match self.store.save(&self.path) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.store.tasks.push(previous);
                Err(ServiceError::Storage(e))
            }
        }
    }
}

/// Service talking to a running TaskFlow server over HTTP.
pub struct HttpService {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpService {
    pub fn new(base: impl Into<String>) -> Result<Self, ServiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(HttpService {
            base: base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Map a non-success response into the service error taxonomy, pulling
    /// the message out of the structured error body when present.
    fn error_from(response: reqwest::blocking::Response) -> ServiceError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .map(|b| b.error.message)
            .unwrap_or_else(|_| "Request failed".to_string());
        match status {
            400 | 422 => ServiceError::Validation(vec![message]),
            404 => ServiceError::Backend {
                status,
                message: "Task not found".to_string(),
            },
            _ => ServiceError::Backend { status, message },
        }
    }
}

impl TaskService for HttpService {
    fn load(&mut self) -> Result<LoadedTasks, ServiceError> {
        let response = self
            .client
            .get(self.url("/api/tasks"))
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        let body: TasksResponse = response
            .json()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        debug!(count = body.tasks.len(), "fetched tasks from server");
        Ok(LoadedTasks {
            tasks: body.tasks,
            degraded: body.meta.degraded,
        })
    }

    fn create(&mut self, draft: TaskDraft) -> Result<Task, ServiceError> {
        let response = self
            .client
            .post(self.url("/api/tasks"))
            .json(&draft)
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        response
            .json()
            .map_err(|e| ServiceError::Transport(e.to_string()))
    }

    fn update(&mut self, id: u64, patch: TaskPatch) -> Result<Task, ServiceError> {
        let response = self
            .client
            .put(self.url(&format!("/api/tasks/{id}")))
            .json(&patch)
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        response
            .json()
            .map_err(|e| ServiceError::Transport(e.to_string()))
    }

    fn delete(&mut self, id: u64) -> Result<(), ServiceError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/tasks/{id}")))
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, Status};
    use tempfile::tempdir;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: None,
            status: Status::Todo,
            priority: Priority::Medium,
            assignee: None,
            due: None,
        }
    }

    #[test]
    fn file_service_persists_creates_across_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut service = FileService::new(path.clone());
        let task = service.create(draft("Persisted")).unwrap();

        let mut reopened = FileService::new(path);
        let loaded = reopened.load().unwrap();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].id, task.id);
        assert!(!loaded.degraded);
    }

    #[test]
    fn file_service_rejects_invalid_drafts_without_side_effects() {
        let dir = tempdir().unwrap();
        let mut service = FileService::new(dir.path().join("tasks.json"));

        let err = service.create(draft("ab")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.load().unwrap().tasks.is_empty());
    }

    #[test]
    fn file_service_update_and_delete_report_missing_tasks() {
        let dir = tempdir().unwrap();
        let mut service = FileService::new(dir.path().join("tasks.json"));

        assert!(matches!(
            service.update(42, TaskPatch::status(Status::Done)),
            Err(ServiceError::NotFound(42))
        ));
        assert!(matches!(service.delete(42), Err(ServiceError::NotFound(42))));
    }

    #[test]
    fn file_service_round_trips_a_full_mutation_cycle() {
        let dir = tempdir().unwrap();
        let mut service = FileService::new(dir.path().join("tasks.json"));

        let task = service.create(draft("Cycle")).unwrap();
        let updated = service
            .update(task.id, TaskPatch::status(Status::Done))
            .unwrap();
        assert_eq!(updated.status, Status::Done);

        service.delete(task.id).unwrap();
        assert!(service.load().unwrap().tasks.is_empty());
    }
}
