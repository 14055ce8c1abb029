//! Task data structures.
//!
//! This module defines the core `Task` record plus the `TaskDraft` and
//! `TaskPatch` payloads that carry create and update intents through the
//! service boundary.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Status};

/// A unit of work with status, priority and optional assignee and due date.
///
/// The identifier is unique within a store and never changes for the lifetime
/// of the task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default, alias = "due_date")]
    pub due: Option<NaiveDate>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// Payload for creating a new task. The store assigns the id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default, alias = "due_date")]
    pub due: Option<NaiveDate>,
}

/// Partial update for an existing task. `None` fields are left untouched;
/// `clear_due` / `clear_assignee` explicitly drop the optional values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default, alias = "due_date")]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub clear_due: bool,
    #[serde(default)]
    pub clear_assignee: bool,
}

impl Task {
    /// Materialise a draft into a task with the given id, stamping both
    /// timestamps with the current time.
    pub fn from_draft(id: u64, draft: TaskDraft) -> Self {
        let now = Utc::now().timestamp();
        Task {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            assignee: draft.assignee,
            due: draft.due,
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    /// Apply a patch in place and bump the updated timestamp.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = Some(assignee);
        }
        if let Some(due) = patch.due {
            self.due = Some(due);
        }
        if patch.clear_due {
            self.due = None;
        }
        if patch.clear_assignee {
            self.assignee = None;
        }
        self.updated_at_utc = Utc::now().timestamp();
    }
}

impl TaskPatch {
    /// Patch that only changes the workflow status.
    pub fn status(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn from_draft_keeps_fields_and_stamps_timestamps() {
        let task = Task::from_draft(7, draft("Write docs"));
        assert_eq!(task.id, 7);
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.created_at_utc, task.updated_at_utc);
    }

    #[test]
    fn apply_patch_leaves_unset_fields_alone() {
        let mut task = Task::from_draft(1, draft("Initial"));
        task.due = NaiveDate::from_ymd_opt(2026, 9, 1);

        task.apply_patch(TaskPatch::status(Status::Done));
        assert_eq!(task.status, Status::Done);
        assert_eq!(task.title, "Initial");
        assert_eq!(task.due, NaiveDate::from_ymd_opt(2026, 9, 1));
    }

    #[test]
    fn apply_patch_clear_flags_drop_optionals() {
        let mut task = Task::from_draft(1, draft("Initial"));
        task.due = NaiveDate::from_ymd_opt(2026, 9, 1);
        task.assignee = Some("alice".to_string());

        task.apply_patch(TaskPatch {
            clear_due: true,
            clear_assignee: true,
            ..TaskPatch::default()
        });
        assert!(task.due.is_none());
        assert!(task.assignee.is_none());
    }
}
