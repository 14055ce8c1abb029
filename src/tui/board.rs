//! Task board component: tasks grouped into status columns.
//!
//! The board holds task ids only; the filtered task slice is passed back in
//! on every render so the store stays the single source of truth.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::fields::{format_status, Priority, Status};
use crate::store::{format_due_relative, truncate};
use crate::task::Task;
use crate::tui::colors::{
    COLUMN_DONE, COLUMN_IN_PROGRESS, COLUMN_TODO, OVERDUE, PRIORITY_HIGH, PRIORITY_LOW,
    PRIORITY_MEDIUM,
};

/// Kanban board over the three status columns.
pub struct Board {
    columns: [Vec<u64>; 3],
    pub selected_column: usize,
    pub selected_card: usize,
    scroll: [usize; 3],
}

fn column_color(status: Status) -> Color {
    match status {
        Status::Todo => COLUMN_TODO,
        Status::InProgress => COLUMN_IN_PROGRESS,
        Status::Done => COLUMN_DONE,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => PRIORITY_LOW,
        Priority::Medium => PRIORITY_MEDIUM,
        Priority::High => PRIORITY_HIGH,
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            columns: Default::default(),
            selected_column: 0,
            selected_card: 0,
            scroll: [0; 3],
        }
    }

    /// Regroup the filtered sequence into columns, preserving order and
    /// clamping the selection to what is still visible.
    pub fn set_tasks(&mut self, tasks: &[Task]) {
        for column in &mut self.columns {
            column.clear();
        }
        for task in tasks {
            let idx = Status::ALL
                .iter()
                .position(|&s| s == task.status)
                .unwrap_or(0);
            self.columns[idx].push(task.id);
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.columns[self.selected_column].len();
        if self.selected_card >= len {
            self.selected_card = len.saturating_sub(1);
        }
    }

    /// Status of the currently selected column.
    pub fn selected_status(&self) -> Status {
        Status::ALL[self.selected_column]
    }

    /// Id of the selected card, if the column is non-empty.
    pub fn selected_id(&self) -> Option<u64> {
        self.columns[self.selected_column]
            .get(self.selected_card)
            .copied()
    }

    pub fn select_left(&mut self) {
        if self.selected_column > 0 {
            self.selected_column -= 1;
            self.clamp_selection();
        }
    }

    pub fn select_right(&mut self) {
        if self.selected_column + 1 < self.columns.len() {
            self.selected_column += 1;
            self.clamp_selection();
        }
    }

    pub fn select_up(&mut self) {
        if self.selected_card > 0 {
            self.selected_card -= 1;
        }
    }

    pub fn select_down(&mut self) {
        if self.selected_card + 1 < self.columns[self.selected_column].len() {
            self.selected_card += 1;
        }
    }

    /// Jump the selection to the first card matching the predicate.
    pub fn select_first_where(&mut self, tasks: &[Task], pred: impl Fn(&Task) -> bool) -> bool {
        for (col, ids) in self.columns.iter().enumerate() {
            for (row, id) in ids.iter().enumerate() {
                if let Some(task) = tasks.iter().find(|t| t.id == *id) {
                    if pred(task) {
                        self.selected_column = col;
                        self.selected_card = row;
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, tasks: &[Task]) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(area);

        for (idx, status) in Status::ALL.iter().enumerate() {
            self.render_column(f, chunks[idx], idx, *status, tasks);
        }
    }

    fn render_column(
        &mut self,
        f: &mut Frame,
        area: Rect,
        column_index: usize,
        status: Status,
        tasks: &[Task],
    ) {
        let ids = &self.columns[column_index];
        let is_selected_column = column_index == self.selected_column;
        let color = column_color(status);

        let title = format!(" {} ({}) ", format_status(status), ids.len());
        let border_style = if is_selected_column {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        // Three lines per card, plus a separator.
        let card_height = 3usize;
        let visible = (inner.height as usize / card_height).max(1);
        let scroll = &mut self.scroll[column_index];
        if is_selected_column {
            if self.selected_card < *scroll {
                *scroll = self.selected_card;
            } else if self.selected_card >= *scroll + visible {
                *scroll = self.selected_card + 1 - visible;
            }
        }

        let today = Local::now().date_naive();
        for (slot, (row, id)) in ids
            .iter()
            .enumerate()
            .skip(*scroll)
            .take(visible)
            .enumerate()
        {
            let Some(task) = tasks.iter().find(|t| t.id == *id) else {
                continue;
            };
            let card_area = Rect {
                x: inner.x,
                y: inner.y + (slot * card_height) as u16,
                width: inner.width,
                height: card_height.min(inner.height as usize - slot * card_height) as u16,
            };
            let selected = is_selected_column && row == self.selected_card;

            let title_style = if selected {
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let due_overdue = task.due.is_some_and(|d| d < today) && task.status != Status::Done;
            let due_style = if due_overdue {
                Style::default().fg(OVERDUE)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let width = inner.width.saturating_sub(2) as usize;
            let lines = vec![
                Line::from(Span::styled(
                    truncate(&format!("#{} {}", task.id, task.title), width),
                    title_style,
                )),
                Line::from(vec![
                    Span::styled(
                        format!("{:<6}", task.priority.as_str()),
                        Style::default().fg(priority_color(task.priority)),
                    ),
                    Span::styled(
                        format!(" due {}", format_due_relative(task.due, today)),
                        due_style,
                    ),
                    Span::styled(
                        format!(
                            " {}",
                            task.assignee.as_deref().map(|a| truncate(a, 12)).unwrap_or_default()
                        ),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ];
            f.render_widget(Paragraph::new(lines), card_area);
        }

        if ids.is_empty() && is_selected_column {
            let hint = Paragraph::new(Line::from(Span::styled(
                "empty (press n to add)",
                Style::default().fg(Color::DarkGray),
            )));
            f.render_widget(hint, inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;

    fn task(id: u64, status: Status) -> Task {
        let mut t = Task::from_draft(
            0,
            TaskDraft {
                title: format!("Task {id}"),
                description: None,
                status,
                priority: Priority::Medium,
                assignee: None,
                due: None,
            },
        );
        t.id = id;
        t
    }

    #[test]
    fn set_tasks_groups_by_status_in_order() {
        let mut board = Board::new();
        let tasks = vec![
            task(1, Status::Done),
            task(2, Status::Todo),
            task(3, Status::Todo),
            task(4, Status::InProgress),
        ];
        board.set_tasks(&tasks);
        assert_eq!(board.columns[0], vec![2, 3]);
        assert_eq!(board.columns[1], vec![4]);
        assert_eq!(board.columns[2], vec![1]);
    }

    #[test]
    fn selection_is_clamped_when_the_column_shrinks() {
        let mut board = Board::new();
        board.set_tasks(&[task(1, Status::Todo), task(2, Status::Todo)]);
        board.select_down();
        assert_eq!(board.selected_id(), Some(2));

        board.set_tasks(&[task(1, Status::Todo)]);
        assert_eq!(board.selected_id(), Some(1));

        board.set_tasks(&[]);
        assert_eq!(board.selected_id(), None);
    }

    #[test]
    fn select_first_where_finds_cards_across_columns() {
        let mut board = Board::new();
        let tasks = vec![task(1, Status::Todo), task(9, Status::Done)];
        board.set_tasks(&tasks);
        assert!(board.select_first_where(&tasks, |t| t.id == 9));
        assert_eq!(board.selected_status(), Status::Done);
        assert_eq!(board.selected_id(), Some(9));
        assert!(!board.select_first_where(&tasks, |t| t.id == 99));
    }
}
