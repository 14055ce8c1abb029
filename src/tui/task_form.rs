//! Task form component for creating and editing tasks.
//!
//! Validation runs per field on every change and again in aggregate on
//! submit; the submit action is withheld until every field passes.

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::fields::{format_priority, format_status, Priority, Status};
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::tui::input::InputField;
use crate::validate;

pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const ASSIGNEE_FIELD: usize = 2;
pub const DUE_FIELD: usize = 3;
pub const STATUS_FIELD: usize = 4;
pub const PRIORITY_FIELD: usize = 5;
pub const FIELD_COUNT: usize = 6;

/// What the controller should do after a key press in the form.
#[derive(Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

/// Modal create/edit form.
pub struct TaskForm {
    /// Id of the task being edited; `None` when creating.
    pub editing: Option<u64>,
    pub title: InputField,
    pub description: InputField,
    pub assignee: InputField,
    pub due: InputField,
    pub status_idx: usize,
    pub priority_idx: usize,
    pub current_field: usize,
    errors: [Option<String>; FIELD_COUNT],
}

impl TaskForm {
    /// Empty form for a new task, defaulting the status to the column the
    /// user was on and the priority to medium.
    pub fn new(default_status: Status) -> Self {
        TaskForm {
            editing: None,
            title: InputField::new(),
            description: InputField::new(),
            assignee: InputField::new(),
            due: InputField::new(),
            status_idx: Status::ALL.iter().position(|&s| s == default_status).unwrap_or(0),
            priority_idx: 1,
            current_field: TITLE_FIELD,
            errors: Default::default(),
        }
    }

    /// Pre-populated form for editing an existing task.
    pub fn from_task(task: &Task) -> Self {
        TaskForm {
            editing: Some(task.id),
            title: InputField::with_value(&task.title),
            description: InputField::with_value(task.description.as_deref().unwrap_or("")),
            assignee: InputField::with_value(task.assignee.as_deref().unwrap_or("")),
            due: InputField::with_value(
                &task.due.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            ),
            status_idx: Status::ALL.iter().position(|&s| s == task.status).unwrap_or(0),
            priority_idx: Priority::ALL
                .iter()
                .position(|&p| p == task.priority)
                .unwrap_or(1),
            current_field: TITLE_FIELD,
            errors: Default::default(),
        }
    }

    pub fn status(&self) -> Status {
        Status::ALL[self.status_idx]
    }

    pub fn priority(&self) -> Priority {
        Priority::ALL[self.priority_idx]
    }

    pub fn error(&self, field: usize) -> Option<&str> {
        self.errors.get(field).and_then(|e| e.as_deref())
    }

    /// Re-check one field, recording its error message.
    pub fn validate_field(&mut self, field: usize, today: NaiveDate) {
        let result = match field {
            TITLE_FIELD => validate::validate_title(&self.title.value),
            DESCRIPTION_FIELD => validate::validate_description(&self.description.value),
            DUE_FIELD => validate::parse_due_field(&self.due.value, today).map(|_| ()),
            // Assignee is free-form; status and priority are selectors and
            // can never hold an out-of-range value.
            _ => Ok(()),
        };
        self.errors[field] = result.err();
    }

    /// Re-check every field. Returns true when the form may be submitted.
    pub fn validate_all(&mut self, today: NaiveDate) -> bool {
        for field in 0..FIELD_COUNT {
            self.validate_field(field, today);
        }
        self.errors.iter().all(|e| e.is_none())
    }

    fn optional(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Build the create payload. Call only after `validate_all` passed.
    pub fn draft(&self, today: NaiveDate) -> Result<TaskDraft, String> {
        let due = validate::parse_due_field(&self.due.value, today)?;
        Ok(TaskDraft {
            title: self.title.value.trim().to_string(),
            description: Self::optional(&self.description.value),
            status: self.status(),
            priority: self.priority(),
            assignee: Self::optional(&self.assignee.value),
            due,
        })
    }

    /// Build the update payload for the task being edited. Fields emptied in
    /// the form clear the stored optionals.
    pub fn patch(&self, today: NaiveDate) -> Result<TaskPatch, String> {
        let due = validate::parse_due_field(&self.due.value, today)?;
        Ok(TaskPatch {
            title: Some(self.title.value.trim().to_string()),
            description: Self::optional(&self.description.value),
            status: Some(self.status()),
            priority: Some(self.priority()),
            assignee: Self::optional(&self.assignee.value),
            due,
            clear_due: due.is_none(),
            clear_assignee: Self::optional(&self.assignee.value).is_none(),
        })
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            ASSIGNEE_FIELD => Some(&mut self.assignee),
            DUE_FIELD => Some(&mut self.due),
            _ => None,
        }
    }

    /// Route a key press. Tab/arrows move between fields, left/right cycles
    /// the selector fields, Enter submits, Esc cancels.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let today = Local::now().date_naive();
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.current_field = (self.current_field + 1) % FIELD_COUNT;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
            }
            KeyCode::Left if self.current_field == STATUS_FIELD => {
                self.status_idx = (self.status_idx + Status::ALL.len() - 1) % Status::ALL.len();
            }
            KeyCode::Right if self.current_field == STATUS_FIELD => {
                self.status_idx = (self.status_idx + 1) % Status::ALL.len();
            }
            KeyCode::Left if self.current_field == PRIORITY_FIELD => {
                self.priority_idx =
                    (self.priority_idx + Priority::ALL.len() - 1) % Priority::ALL.len();
            }
            KeyCode::Right if self.current_field == PRIORITY_FIELD => {
                self.priority_idx = (self.priority_idx + 1) % Priority::ALL.len();
            }
            code => {
                let field = self.current_field;
                if let Some(input) = self.active_input() {
                    if input.handle_key(code) {
                        self.validate_field(field, today);
                    }
                }
            }
        }
        FormAction::None
    }

    pub fn render(&self, f: &mut Frame, area: Rect, submitting: bool) {
        f.render_widget(Clear, area);
        let title = if self.editing.is_some() {
            " Edit Task "
        } else {
            " Add New Task "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut lines = Vec::new();
        self.push_input_line(&mut lines, TITLE_FIELD, "Title*", &self.title);
        self.push_input_line(&mut lines, DESCRIPTION_FIELD, "Description", &self.description);
        self.push_input_line(&mut lines, ASSIGNEE_FIELD, "Assignee", &self.assignee);
        self.push_input_line(&mut lines, DUE_FIELD, "Due (YYYY-MM-DD)", &self.due);
        self.push_selector_line(&mut lines, STATUS_FIELD, "Status*", format_status(self.status()));
        self.push_selector_line(
            &mut lines,
            PRIORITY_FIELD,
            "Priority*",
            format_priority(self.priority()),
        );

        lines.push(Line::from(""));
        let footer = if submitting {
            Span::styled("Saving...", Style::default().fg(Color::Yellow))
        } else {
            Span::styled(
                "Enter: save   Esc: cancel   Tab: next field   ←/→: change selection",
                Style::default().fg(Color::DarkGray),
            )
        };
        lines.push(Line::from(footer));

        f.render_widget(Paragraph::new(lines), inner);
    }

    fn push_input_line<'a>(
        &'a self,
        lines: &mut Vec<Line<'a>>,
        field: usize,
        label: &'a str,
        input: &'a InputField,
    ) {
        let active = self.current_field == field;
        let label_style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value = if active {
            format!("{}_", input.value)
        } else {
            input.value.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<18}"), label_style),
            Span::raw(value),
        ]));
        if let Some(message) = self.error(field) {
            lines.push(Line::from(Span::styled(
                format!("{:<18}{message}", ""),
                Style::default().fg(Color::Red),
            )));
        }
    }

    fn push_selector_line<'a>(
        &'a self,
        lines: &mut Vec<Line<'a>>,
        field: usize,
        label: &'a str,
        value: &'a str,
    ) {
        let active = self.current_field == field;
        let label_style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value_span = if active {
            Span::styled(format!("< {value} >"), Style::default().add_modifier(Modifier::BOLD))
        } else {
            Span::raw(value)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<18}"), label_style),
            value_span,
        ]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    fn type_text(form: &mut TaskForm, text: &str) {
        for c in text.chars() {
            form.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn short_title_blocks_submission_with_message() {
        let mut form = TaskForm::new(Status::Todo);
        type_text(&mut form, "ab");
        assert!(!form.validate_all(today()));
        assert_eq!(
            form.error(TITLE_FIELD),
            Some("Title must be at least 3 characters long")
        );

        type_text(&mut form, "c");
        assert!(form.validate_all(today()));
        assert!(form.error(TITLE_FIELD).is_none());
    }

    #[test]
    fn field_errors_update_on_every_change() {
        let mut form = TaskForm::new(Status::Todo);
        type_text(&mut form, "ab");
        // Per-keystroke validation has already flagged the short title.
        assert!(form.error(TITLE_FIELD).is_some());
        type_text(&mut form, "c");
        assert!(form.error(TITLE_FIELD).is_none());
    }

    #[test]
    fn draft_carries_selector_values_and_trimmed_inputs() {
        let mut form = TaskForm::new(Status::InProgress);
        type_text(&mut form, "  Plan sprint  ");
        assert!(form.validate_all(today()));
        let draft = form.draft(today()).unwrap();
        assert_eq!(draft.title, "Plan sprint");
        assert_eq!(draft.status, Status::InProgress);
        assert_eq!(draft.priority, Priority::Medium);
        assert!(draft.description.is_none());
    }

    #[test]
    fn past_due_date_is_rejected() {
        let mut form = TaskForm::new(Status::Todo);
        type_text(&mut form, "Valid title");
        form.current_field = DUE_FIELD;
        type_text(&mut form, "2020-01-01");
        assert!(!form.validate_all(today()));
        assert_eq!(form.error(DUE_FIELD), Some("Due date cannot be in the past"));
    }

    #[test]
    fn edit_form_round_trips_into_a_full_patch() {
        let task = Task::from_draft(
            5,
            TaskDraft {
                title: "Original".to_string(),
                description: Some("Body".to_string()),
                status: Status::Todo,
                priority: Priority::High,
                assignee: Some("Riley".to_string()),
                due: None,
            },
        );
        let mut form = TaskForm::from_task(&task);
        assert_eq!(form.editing, Some(5));

        // Clearing the assignee in the form clears it in the patch.
        form.assignee.clear();
        assert!(form.validate_all(today()));
        let patch = form.patch(today()).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Original"));
        assert_eq!(patch.priority, Some(Priority::High));
        assert!(patch.clear_assignee);
        assert!(patch.clear_due);
    }

    #[test]
    fn selector_fields_cycle_with_arrow_keys() {
        let mut form = TaskForm::new(Status::Todo);
        form.current_field = PRIORITY_FIELD;
        form.handle_key(KeyEvent::from(KeyCode::Right));
        assert_eq!(form.priority(), Priority::High);
        form.handle_key(KeyEvent::from(KeyCode::Right));
        assert_eq!(form.priority(), Priority::Low);
    }

    #[test]
    fn escape_cancels_and_enter_submits() {
        let mut form = TaskForm::new(Status::Todo);
        assert_eq!(form.handle_key(KeyEvent::from(KeyCode::Esc)), FormAction::Cancel);
        assert_eq!(
            form.handle_key(KeyEvent::from(KeyCode::Enter)),
            FormAction::Submit
        );
    }
}
