//! Filter bar component: owns the current filter criteria.
//!
//! Status and priority changes apply immediately; free-text search is
//! debounced so the pipeline is not re-run on every keystroke, with Enter as
//! the immediate-flush path. Both entry points funnel through the same state
//! update, `apply_search`.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::fields::{format_priority, format_status, Priority, Status};
use crate::filter::Criteria;
use crate::tui::input::InputField;

/// Delay between the last search keystroke and the filter taking effect.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Owns the criteria; every other component sees read-only copies.
pub struct FilterBar {
    criteria: Criteria,
    search_input: InputField,
    /// Deadline at which pending search text is applied.
    pending_search: Option<Instant>,
    pub search_active: bool,
}

impl FilterBar {
    pub fn new() -> Self {
        FilterBar {
            criteria: Criteria::default(),
            search_input: InputField::new(),
            pending_search: None,
            search_active: false,
        }
    }

    /// Current criteria, as of the last applied update.
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Cycle the status filter: all -> todo -> in-progress -> done -> all.
    /// Returns the new criteria when the selection changed.
    pub fn cycle_status(&mut self) -> Option<Criteria> {
        self.criteria.status = match self.criteria.status {
            None => Some(Status::Todo),
            Some(Status::Todo) => Some(Status::InProgress),
            Some(Status::InProgress) => Some(Status::Done),
            Some(Status::Done) => None,
        };
        Some(self.criteria.clone())
    }

    /// Cycle the priority filter: all -> low -> medium -> high -> all.
    pub fn cycle_priority(&mut self) -> Option<Criteria> {
        self.criteria.priority = match self.criteria.priority {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::High),
            Some(Priority::High) => None,
        };
        Some(self.criteria.clone())
    }

    /// Set the status filter directly (quick actions).
    pub fn set_status(&mut self, status: Option<Status>) -> Option<Criteria> {
        if self.criteria.status == status {
            return None;
        }
        self.criteria.status = status;
        Some(self.criteria.clone())
    }

    /// Set the priority filter directly (quick actions).
    pub fn set_priority(&mut self, priority: Option<Priority>) -> Option<Criteria> {
        if self.criteria.priority == priority {
            return None;
        }
        self.criteria.priority = priority;
        Some(self.criteria.clone())
    }

    /// Reset every filter. Returns the new criteria when anything was set.
    pub fn clear_all(&mut self) -> Option<Criteria> {
        if self.criteria.is_unrestricted() && self.search_input.value.is_empty() {
            return None;
        }
        self.criteria = Criteria::default();
        self.search_input.clear();
        self.pending_search = None;
        Some(self.criteria.clone())
    }

    /// Route a key press while the search input has focus. Text edits arm
    /// the debounce timer instead of applying immediately.
    pub fn handle_search_key(&mut self, code: KeyCode) -> SearchKeyResult {
        match code {
            KeyCode::Enter => {
                self.search_active = false;
                SearchKeyResult::Changed(self.flush_search())
            }
            KeyCode::Esc => {
                self.search_active = false;
                SearchKeyResult::Changed(self.flush_search())
            }
            code => {
                if self.search_input.handle_key(code) {
                    self.pending_search = Some(Instant::now() + SEARCH_DEBOUNCE);
                }
                SearchKeyResult::Consumed
            }
        }
    }

    /// Apply pending search text once its debounce deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<Criteria> {
        match self.pending_search {
            Some(deadline) if now >= deadline => self.flush_search(),
            _ => None,
        }
    }

    /// Immediately apply whatever is in the search input.
    pub fn flush_search(&mut self) -> Option<Criteria> {
        self.pending_search = None;
        self.apply_search(self.search_input.value.trim().to_string())
    }

    /// The single state-update function behind both search entry points.
    fn apply_search(&mut self, term: String) -> Option<Criteria> {
        if self.criteria.search == term {
            return None;
        }
        self.criteria.search = term;
        Some(self.criteria.clone())
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let status = match self.criteria.status {
            None => "All".to_string(),
            Some(s) => format_status(s).to_string(),
        };
        let priority = match self.criteria.priority {
            None => "All".to_string(),
            Some(p) => format_priority(p).to_string(),
        };
        let active = self.criteria.active_count();
        let summary = if active == 0 {
            "no filters active".to_string()
        } else if active == 1 {
            "1 filter active".to_string()
        } else {
            format!("{active} filters active")
        };

        let search_display = if self.search_active {
            format!("{}_", self.search_input.value)
        } else if self.search_input.value.is_empty() {
            "(press / to search)".to_string()
        } else {
            self.search_input.value.clone()
        };

        let line = Line::from(vec![
            Span::styled(" Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(status, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("  Priority: ", Style::default().fg(Color::DarkGray)),
            Span::styled(priority, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("  Search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                search_display,
                if self.search_active {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                },
            ),
            Span::styled(format!("  [{summary}]"), Style::default().fg(Color::DarkGray)),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Filters (s: status, p: priority, /: search, c: clear) ");
        f.render_widget(Paragraph::new(line).block(block), area);
    }
}

/// Outcome of a key press routed to the search input.
pub enum SearchKeyResult {
    /// The key was absorbed; nothing to apply yet.
    Consumed,
    /// Focus left the input; carries new criteria if the term changed.
    Changed(Option<Criteria>),
}
