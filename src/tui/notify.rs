//! Cross-cutting user feedback: toast notifications and loading scopes.
//!
//! Components never talk to a global singleton; the controller owns one
//! `Notifications` queue and passes it around as `&mut dyn Feedback`, so
//! tests can substitute a recording fake.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use ratatui::style::Color;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotifyKind {
    pub fn color(self) -> Color {
        match self {
            NotifyKind::Success => Color::Green,
            NotifyKind::Error => Color::Red,
            NotifyKind::Info => Color::Cyan,
            NotifyKind::Warning => Color::Yellow,
        }
    }
}

/// The feedback capability injected into the coordination layer.
pub trait Feedback {
    fn notify(&mut self, kind: NotifyKind, message: &str);
}

/// A single toast.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotifyKind,
    pub message: String,
    created: Instant,
}

/// Dismissable toast queue with automatic expiry.
pub struct Notifications {
    items: Vec<Notification>,
    ttl: Duration,
}

impl Notifications {
    /// Toasts linger for four seconds, matching the web client's default.
    pub fn new() -> Self {
        Notifications {
            items: Vec::new(),
            ttl: Duration::from_secs(4),
        }
    }

    /// Drop expired toasts. Called once per event-loop tick.
    pub fn tick(&mut self) {
        let ttl = self.ttl;
        self.items.retain(|n| n.created.elapsed() < ttl);
    }

    /// Most recent toast still alive, if any.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Dismiss every visible toast.
    pub fn dismiss(&mut self) {
        self.items.clear();
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Notifications::new()
    }
}

impl Feedback for Notifications {
    fn notify(&mut self, kind: NotifyKind, message: &str) {
        self.items.push(Notification {
            kind,
            message: message.to_string(),
            created: Instant::now(),
        });
    }
}

/// UI regions that can show a loading affordance independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadScope {
    Board,
    Form,
}

/// Set of regions currently waiting on an external call. Only the affected
/// region is blocked; the rest of the UI stays interactive.
#[derive(Default)]
pub struct Loading {
    active: HashSet<LoadScope>,
}

impl Loading {
    pub fn begin(&mut self, scope: LoadScope) {
        self.active.insert(scope);
    }

    pub fn end(&mut self, scope: LoadScope) {
        self.active.remove(&scope);
    }

    pub fn is_active(&self, scope: LoadScope) -> bool {
        self.active.contains(&scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_record_and_dismiss() {
        let mut notifications = Notifications::new();
        notifications.notify(NotifyKind::Success, "Task created successfully");
        notifications.notify(NotifyKind::Error, "Failed to delete task");

        let latest = notifications.latest().unwrap();
        assert_eq!(latest.kind, NotifyKind::Error);
        assert_eq!(latest.message, "Failed to delete task");

        notifications.dismiss();
        assert!(notifications.latest().is_none());
    }

    #[test]
    fn loading_scopes_are_independent() {
        let mut loading = Loading::default();
        loading.begin(LoadScope::Form);
        assert!(loading.is_active(LoadScope::Form));
        assert!(!loading.is_active(LoadScope::Board));
        loading.end(LoadScope::Form);
        assert!(!loading.is_active(LoadScope::Form));
    }
}
