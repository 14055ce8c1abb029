//! Filter criteria and the task-matching predicate.
//!
//! The predicate is a pure function over one task and the current criteria;
//! both the HTTP API and the TUI pipeline run every task through it.

use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Status};
use crate::task::Task;

/// The current filter selection. `None` status/priority means "all"; an empty
/// search string is unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub search: String,
}

impl Criteria {
    /// Number of restrictions currently in effect.
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.status.is_some() {
            count += 1;
        }
        if self.priority.is_some() {
            count += 1;
        }
        if !self.search.is_empty() {
            count += 1;
        }
        count
    }

    /// True when every field is unrestricted.
    pub fn is_unrestricted(&self) -> bool {
        self.active_count() == 0
    }
}

/// Decide whether a task passes the given criteria.
///
/// Status and priority must match exactly unless wildcarded. A non-empty
/// search term is lower-cased and looked up as a substring of the task's
/// title, description and assignee, with missing optionals treated as empty
/// strings. All three checks must pass.
pub fn matches(task: &Task, criteria: &Criteria) -> bool {
    if let Some(status) = criteria.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(priority) = criteria.priority {
        if task.priority != priority {
            return false;
        }
    }
    if !criteria.search.is_empty() {
        let term = criteria.search.to_lowercase();
        let haystack = format!(
            "{} {} {}",
            task.title,
            task.description.as_deref().unwrap_or(""),
            task.assignee.as_deref().unwrap_or("")
        )
        .to_lowercase();
        if !haystack.contains(&term) {
            return false;
        }
    }
    true
}

/// Filter a task sequence, preserving store order.
pub fn apply<'a>(tasks: &'a [Task], criteria: &Criteria) -> Vec<&'a Task> {
    tasks.iter().filter(|t| matches(t, criteria)).collect()
}
