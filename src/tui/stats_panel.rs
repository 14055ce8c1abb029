//! Statistics panel component.
//!
//! Renders the snapshot of the currently filtered sequence: overview counts,
//! a completion gauge, priority and due-date breakdowns and derived insight
//! lines. Number keys emit quick-filter intents handled by the controller.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::stats::{insights, Snapshot};
use crate::tui::colors::{OVERDUE, PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_MEDIUM};

/// Quick-filter intents emitted by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    ShowOverdue,
    ShowHighPriority,
    ShowCompleted,
    ClearFilters,
}

/// Statistics panel state: just the latest snapshot and its insight lines.
pub struct StatsPanel {
    snapshot: Snapshot,
    insight_lines: Vec<String>,
}

impl StatsPanel {
    pub fn new() -> Self {
        StatsPanel {
            snapshot: Snapshot::default(),
            insight_lines: Vec::new(),
        }
    }

    /// Replace the displayed snapshot. Insights are derived here, once per
    /// update, not per frame.
    pub fn update(&mut self, snapshot: Snapshot) {
        self.insight_lines = insights(&snapshot);
        self.snapshot = snapshot;
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Map a number key to its quick action.
    pub fn quick_action_for(key: char) -> Option<QuickAction> {
        match key {
            '1' => Some(QuickAction::ShowOverdue),
            '2' => Some(QuickAction::ShowHighPriority),
            '3' => Some(QuickAction::ShowCompleted),
            '4' => Some(QuickAction::ClearFilters),
            _ => None,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Statistics ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .split(inner);

        let s = &self.snapshot;
        let overview = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("Total: {}", s.total),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "todo {}  in-progress {}  done {}",
                s.by_status.todo, s.by_status.in_progress, s.by_status.done
            )),
        ]);
        f.render_widget(overview, chunks[0]);

        let gauge = Gauge::default()
            .block(Block::default().title("Completion"))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(s.completion_rate.min(100) as u16)
            .label(format!("{}%", s.completion_rate));
        f.render_widget(gauge, chunks[1]);

        let priority = Paragraph::new(vec![
            Line::from(Span::styled("Priority", Style::default().fg(Color::DarkGray))),
            Line::from(vec![
                Span::styled(format!("high {}", s.by_priority.high), Style::default().fg(PRIORITY_HIGH)),
                Span::raw("  "),
                Span::styled(
                    format!("medium {}", s.by_priority.medium),
                    Style::default().fg(PRIORITY_MEDIUM),
                ),
                Span::raw("  "),
                Span::styled(format!("low {}", s.by_priority.low), Style::default().fg(PRIORITY_LOW)),
            ]),
        ]);
        f.render_widget(priority, chunks[2]);

        let due = Paragraph::new(vec![
            Line::from(Span::styled("Due dates", Style::default().fg(Color::DarkGray))),
            Line::from(vec![
                Span::styled(format!("overdue {}", s.by_due.overdue), Style::default().fg(OVERDUE)),
                Span::raw(format!("  today {}", s.by_due.today)),
            ]),
            Line::from(format!(
                "this week {}  no due date {}",
                s.by_due.week, s.by_due.none
            )),
        ]);
        f.render_widget(due, chunks[3]);

        let actions = Paragraph::new(vec![
            Line::from(Span::styled("Quick actions", Style::default().fg(Color::DarkGray))),
            Line::from("1 overdue  2 high priority"),
            Line::from("3 completed  4 all tasks"),
        ]);
        f.render_widget(actions, chunks[4]);

        let insight_text: Vec<Line> = self
            .insight_lines
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(Color::Cyan))))
            .collect();
        f.render_widget(
            Paragraph::new(insight_text).wrap(ratatui::widgets::Wrap { trim: true }),
            chunks[5],
        );
    }
}
