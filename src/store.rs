//! The task store: a JSON-file-backed, in-memory ordered task sequence.
//!
//! The store is the single source of truth. Every other component works on
//! read-only views handed out per update pass, and mutations come back to the
//! store only through the service boundary.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::task::{Task, TaskDraft, TaskPatch};

/// In-memory store holding the ordered task sequence.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Store {
    pub tasks: Vec<Task>,
    /// Set when the backing file existed but could not be read or parsed and
    /// the store started empty instead. Not persisted; callers surface it.
    #[serde(skip)]
    pub degraded: bool,
}

impl Store {
    /// Load a store from a JSON file.
    ///
    /// A missing file is a fresh, empty store. An unreadable or unparsable
    /// file also yields an empty store, but with `degraded` set so callers
    /// can tell "no data yet" from "data lost"; the cause is logged.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Store::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str::<Vec<Task>>(&buf) {
                Ok(tasks) => {
                    info!(count = tasks.len(), path = %path.display(), "loaded task store");
                    Store {
                        tasks,
                        degraded: false,
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "task store unparsable, starting empty");
                    Store {
                        tasks: Vec::new(),
                        degraded: true,
                    }
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "task store unreadable, starting empty");
                Store {
                    tasks: Vec::new(),
                    degraded: true,
                }
            }
        }
    }

    /// Save the task sequence to a JSON file using an atomic write
    /// (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&self.tasks)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available task ID.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Append a new task built from the draft, returning a clone of it.
    pub fn create(&mut self, draft: TaskDraft) -> Task {
        let task = Task::from_draft(self.next_id(), draft);
        self.tasks.push(task.clone());
        task
    }

    /// Patch an existing task, returning a clone of the updated record.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> Option<Task> {
        let task = self.get_mut(id)?;
        task.apply_patch(patch);
        Some(task.clone())
    }

    /// Remove a task by ID. Returns false if no such task exists.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = (d - today).num_days();
            if delta == 0 {
                "today".into()
            } else if delta == 1 {
                "tomorrow".into()
            } else if delta > 1 {
                format!("in {delta}d")
            } else {
                format!("{}d late", -delta)
            }
        }
    }
}

/// Parse CLI due-date input: YYYY-MM-DD, "today" or "tomorrow".
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();
    match s.as_str() {
        "today" => Some(today),
        "tomorrow" => today.succ_opt(),
        _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok(),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
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
    fn missing_file_is_a_fresh_store_not_degraded() {
        let dir = tempdir().unwrap();
        let store = Store::load(&dir.path().join("tasks.json"));
        assert!(store.tasks.is_empty());
        assert!(!store.degraded);
    }

    #[test]
    fn unparsable_file_yields_empty_degraded_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "not json at all").unwrap();
        let store = Store::load(&path);
        assert!(store.tasks.is_empty());
        assert!(store.degraded);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = Store::default();
        store.create(draft("First"));
        store.create(draft("Second"));
        store.save(&path).unwrap();

        let loaded = Store::load(&path);
        assert_eq!(loaded.tasks.len(), 2);
        assert_eq!(loaded.tasks[0].title, "First");
        assert!(!loaded.degraded);
    }

    #[test]
    fn next_id_is_one_past_the_maximum() {
        let mut store = Store::default();
        assert_eq!(store.next_id(), 1);
        let a = store.create(draft("A"));
        let b = store.create(draft("B"));
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        store.remove(a.id);
        // IDs are never reused while a higher one exists.
        assert_eq!(store.next_id(), 3);
    }

    #[test]
    fn update_patches_in_place_and_remove_reports_missing() {
        let mut store = Store::default();
        let task = store.create(draft("Changeable"));

        let updated = store.update(task.id, TaskPatch::status(Status::Done)).unwrap();
        assert_eq!(updated.status, Status::Done);
        assert_eq!(store.get(task.id).unwrap().status, Status::Done);

        assert!(store.update(999, TaskPatch::default()).is_none());
        assert!(store.remove(task.id));
        assert!(!store.remove(task.id));
    }

    #[test]
    fn format_due_relative_cases() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(
            format_due_relative(today.succ_opt(), today),
            "tomorrow"
        );
        assert_eq!(
            format_due_relative(NaiveDate::from_ymd_opt(2026, 8, 28), today),
            "in 3d"
        );
        assert_eq!(
            format_due_relative(NaiveDate::from_ymd_opt(2026, 8, 23), today),
            "2d late"
        );
    }
}
