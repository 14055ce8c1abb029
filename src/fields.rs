//! Enumerations and field types for task management.
//!
//! This module defines the structured data types used to categorise tasks:
//! workflow status, priority level and due-date buckets.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task workflow status.
///
/// Serialised in kebab-case; `completed` is accepted as a legacy alias for
/// `done` (older exports used it interchangeably).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "Todo")]
    Todo,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "completed", alias = "Done")]
    Done,
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Due-date classification relative to "today" at local midnight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DueBucket {
    Overdue,
    Today,
    Week,
    None,
}

impl Status {
    /// All statuses in board-column order.
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    /// Wire value, matching the serde kebab-case representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }

    /// Parse a wire value. Unlike the serde path this never falls back to a
    /// default; unknown input is an error the caller must report.
    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "todo" => Some(Status::Todo),
            "in-progress" => Some(Status::InProgress),
            "done" | "completed" => Some(Status::Done),
            _ => None,
        }
    }
}

impl Priority {
    /// All priorities in ascending order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Wire value, matching the serde kebab-case representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a wire value; unknown input is an error the caller must report.
    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Todo => "To Do",
        Status::InProgress => "In Progress",
        Status::Done => "Done",
    }
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_wire_values_and_legacy_alias() {
        assert_eq!(Status::parse("todo"), Some(Status::Todo));
        assert_eq!(Status::parse("in-progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("done"), Some(Status::Done));
        assert_eq!(Status::parse("completed"), Some(Status::Done));
        assert_eq!(Status::parse("archived"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn priority_parse_rejects_unknown_values() {
        assert_eq!(Priority::parse("high"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn enums_round_trip_through_serde_in_kebab_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let back: Status = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, Status::Done);
    }
}
