//! Statistics aggregation over a task sequence.
//!
//! A `Snapshot` is derived state: it is recomputed from scratch on every
//! update rather than incrementally maintained. `aggregate_at` is pure so the
//! bucketing rules can be pinned down in tests with a fixed "today".

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::fields::{DueBucket, Priority, Status};
use crate::task::Task;

/// Per-status task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub todo: usize,
    #[serde(rename = "in-progress")]
    pub in_progress: usize,
    pub done: usize,
}

/// Per-priority task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Per-due-bucket task counts. Tasks due more than a week out fall into no
/// bucket at all, so these do not necessarily sum to the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueCounts {
    pub overdue: usize,
    pub today: usize,
    pub week: usize,
    pub none: usize,
}

/// A point-in-time aggregated view of a task sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    pub by_due: DueCounts,
    /// Done tasks as a rounded integer percentage of the total; 0 when empty.
    pub completion_rate: u32,
}

/// Classify a due date against the given "today".
pub fn bucket_due(due: Option<NaiveDate>, today: NaiveDate) -> Option<DueBucket> {
    let due = match due {
        None => return Some(DueBucket::None),
        Some(d) => d,
    };
    if due < today {
        Some(DueBucket::Overdue)
    } else if due == today {
        Some(DueBucket::Today)
    } else if due <= today + Duration::days(7) {
        Some(DueBucket::Week)
    } else {
        None
    }
}

/// Aggregate statistics with "today" fixed by the caller. Pure; calling it
/// twice on the same input yields identical snapshots.
pub fn aggregate_at(tasks: &[Task], today: NaiveDate) -> Snapshot {
    let mut snapshot = Snapshot {
        total: tasks.len(),
        ..Snapshot::default()
    };

    for task in tasks {
        match task.status {
            Status::Todo => snapshot.by_status.todo += 1,
            Status::InProgress => snapshot.by_status.in_progress += 1,
            Status::Done => snapshot.by_status.done += 1,
        }
        match task.priority {
            Priority::Low => snapshot.by_priority.low += 1,
            Priority::Medium => snapshot.by_priority.medium += 1,
            Priority::High => snapshot.by_priority.high += 1,
        }
        match bucket_due(task.due, today) {
            Some(DueBucket::Overdue) => snapshot.by_due.overdue += 1,
            Some(DueBucket::Today) => snapshot.by_due.today += 1,
            Some(DueBucket::Week) => snapshot.by_due.week += 1,
            Some(DueBucket::None) => snapshot.by_due.none += 1,
            None => {}
        }
    }

    if snapshot.total > 0 {
        let rate = snapshot.by_status.done as f64 / snapshot.total as f64 * 100.0;
        snapshot.completion_rate = rate.round() as u32;
    }
    snapshot
}

/// Aggregate statistics against today at local midnight.
pub fn aggregate(tasks: &[Task]) -> Snapshot {
    aggregate_at(tasks, Local::now().date_naive())
}

/// Human-readable observations derived from a snapshot, shown by the
/// statistics panel and the `stats` command.
pub fn insights(snapshot: &Snapshot) -> Vec<String> {
    let mut lines = Vec::new();

    if snapshot.completion_rate >= 80 {
        lines.push("Great job! You're completing most of your tasks.".to_string());
    } else if snapshot.completion_rate >= 50 {
        lines.push("Good progress! Keep pushing forward.".to_string());
    } else if snapshot.completion_rate > 0 {
        lines.push("You're making progress. Consider breaking down larger tasks.".to_string());
    }

    if snapshot.by_priority.high > snapshot.by_priority.medium + snapshot.by_priority.low {
        lines.push("Many high-priority tasks. Focus on the most critical ones first.".to_string());
    }
    if snapshot.by_due.overdue > 0 {
        lines.push(format!(
            "{} task(s) overdue. Consider addressing them soon.",
            snapshot.by_due.overdue
        ));
    }
    if snapshot.by_due.today > 0 {
        lines.push(format!(
            "{} task(s) due today. Stay focused!",
            snapshot.by_due.today
        ));
    }

    if lines.is_empty() {
        lines.push("Add some tasks to see productivity insights.".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;

    fn task(status: Status, priority: Priority, due: Option<NaiveDate>) -> Task {
        let mut t = Task::from_draft(
            1,
            TaskDraft {
                title: "Task".to_string(),
                description: None,
                status,
                priority,
                assignee: None,
                due: None,
            },
        );
        t.due = due;
        t
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    #[test]
    fn empty_input_yields_all_zero_snapshot() {
        let snapshot = aggregate_at(&[], today());
        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.completion_rate, 0);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let tasks = vec![
            task(Status::Done, Priority::High, Some(today())),
            task(Status::Todo, Priority::Low, None),
        ];
        assert_eq!(aggregate_at(&tasks, today()), aggregate_at(&tasks, today()));
    }

    #[test]
    fn one_done_of_three_rounds_to_thirty_three() {
        let tasks = vec![
            task(Status::Done, Priority::High, None),
            task(Status::Todo, Priority::Low, None),
            task(Status::InProgress, Priority::Medium, None),
        ];
        let snapshot = aggregate_at(&tasks, today());
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.by_status.todo, 1);
        assert_eq!(snapshot.by_status.in_progress, 1);
        assert_eq!(snapshot.by_status.done, 1);
        assert_eq!(snapshot.completion_rate, 33);
    }

    #[test]
    fn two_done_of_three_rounds_to_sixty_seven() {
        let tasks = vec![
            task(Status::Done, Priority::High, None),
            task(Status::Done, Priority::Low, None),
            task(Status::InProgress, Priority::Medium, None),
        ];
        assert_eq!(aggregate_at(&tasks, today()).completion_rate, 67);
    }

    #[test]
    fn due_bucket_boundaries() {
        let t = today();
        assert_eq!(bucket_due(None, t), Some(DueBucket::None));
        assert_eq!(
            bucket_due(Some(t - Duration::days(1)), t),
            Some(DueBucket::Overdue)
        );
        assert_eq!(bucket_due(Some(t), t), Some(DueBucket::Today));
        assert_eq!(
            bucket_due(Some(t + Duration::days(7)), t),
            Some(DueBucket::Week)
        );
        // Eight days out is uncategorised.
        assert_eq!(bucket_due(Some(t + Duration::days(8)), t), None);
    }

    #[test]
    fn uncategorised_tasks_are_counted_in_total_but_no_bucket() {
        let tasks = vec![task(
            Status::Todo,
            Priority::Low,
            Some(today() + Duration::days(8)),
        )];
        let snapshot = aggregate_at(&tasks, today());
        assert_eq!(snapshot.total, 1);
        assert_eq!(snapshot.by_due, DueCounts::default());
    }

    #[test]
    fn priority_counts_track_each_level() {
        let tasks = vec![
            task(Status::Todo, Priority::High, None),
            task(Status::Todo, Priority::High, None),
            task(Status::Todo, Priority::Medium, None),
        ];
        let snapshot = aggregate_at(&tasks, today());
        assert_eq!(snapshot.by_priority.high, 2);
        assert_eq!(snapshot.by_priority.medium, 1);
        assert_eq!(snapshot.by_priority.low, 0);
    }

    #[test]
    fn insights_mention_overdue_and_high_priority_skew() {
        let tasks = vec![
            task(Status::Todo, Priority::High, Some(today() - Duration::days(2))),
            task(Status::Todo, Priority::High, None),
        ];
        let lines = insights(&aggregate_at(&tasks, today()));
        assert!(lines.iter().any(|l| l.contains("overdue")));
        assert!(lines.iter().any(|l| l.contains("high-priority")));
    }

    #[test]
    fn insights_fall_back_when_nothing_stands_out() {
        let lines = insights(&Snapshot::default());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Add some tasks"));
    }
}
