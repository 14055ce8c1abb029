//! Main application logic for the terminal user interface.
//!
//! The `App` struct owns every component plus the task service, routes key
//! presses, and processes the typed message queue through which components
//! request changes. All task mutations flow through one state machine:
//! begin loading, call the service, then either commit the new state and
//! re-run the filter/stats pipeline or leave state untouched and surface
//! the error.

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::error;

use crate::client::{ServiceError, TaskService};
use crate::fields::{format_status, Priority, Status};
use crate::filter::{self, Criteria};
use crate::stats;
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::tui::board::Board;
use crate::tui::filter_bar::{FilterBar, SearchKeyResult};
use crate::tui::notify::{Feedback, LoadScope, Loading, Notifications, NotifyKind};
use crate::tui::stats_panel::{QuickAction, StatsPanel};
use crate::tui::task_form::{FormAction, TaskForm};

/// Requests components raise for the controller to process.
#[derive(Debug)]
pub enum AppMessage {
    FilterChanged(Criteria),
    CreateTask(TaskDraft),
    UpdateTask(u64, TaskPatch),
    DeleteTask(u64),
    MoveTask(u64, Status),
    QuickAction(QuickAction),
    Refresh,
}

/// Top-level TUI state.
pub struct App {
    service: Box<dyn TaskService>,
    tasks: Vec<Task>,
    filtered: Vec<Task>,
    degraded: bool,
    filter_bar: FilterBar,
    board: Board,
    stats_panel: StatsPanel,
    form: Option<TaskForm>,
    notifications: Notifications,
    loading: Loading,
    confirm_delete: Option<u64>,
    queue: VecDeque<AppMessage>,
    should_quit: bool,
}

impl App {
    pub fn new(service: Box<dyn TaskService>) -> Self {
        let mut app = App {
            service,
            tasks: Vec::new(),
            filtered: Vec::new(),
            degraded: false,
            filter_bar: FilterBar::new(),
            board: Board::new(),
            stats_panel: StatsPanel::new(),
            form: None,
            notifications: Notifications::new(),
            loading: Loading::default(),
            confirm_delete: None,
            queue: VecDeque::new(),
            should_quit: false,
        };
        app.reload();
        app
    }

    /// Fetch the task sequence from the service and re-run the pipeline.
    fn reload(&mut self) {
        self.loading.begin(LoadScope::Board);
        match self.service.load() {
            Ok(loaded) => {
                self.tasks = loaded.tasks;
                self.degraded = loaded.degraded;
                if self.degraded {
                    self.notifications.notify(
                        NotifyKind::Warning,
                        "Task data could not be read; starting from an empty list",
                    );
                }
                self.rerun();
            }
            Err(e) => {
                error!(error = %e, "failed to load tasks");
                self.notifications
                    .notify(NotifyKind::Error, "Failed to load tasks");
            }
        }
        self.loading.end(LoadScope::Board);
    }

    /// Derive the filtered sequence and its statistics from the store.
    /// Every consumer renders from the same derivation, so the board and
    /// the stats panel can never disagree.
    fn rerun(&mut self) {
        let criteria = self.filter_bar.criteria().clone();
        self.filtered = filter::apply(&self.tasks, &criteria)
            .into_iter()
            .cloned()
            .collect();
        self.board.set_tasks(&self.filtered);
        self.stats_panel.update(stats::aggregate(&self.filtered));
    }

    pub fn post(&mut self, message: AppMessage) {
        self.queue.push_back(message);
    }

    /// Drain and process the message queue.
    pub fn pump(&mut self) {
        while let Some(message) = self.queue.pop_front() {
            self.dispatch(message);
        }
    }

    fn dispatch(&mut self, message: AppMessage) {
        match message {
            AppMessage::FilterChanged(_) => self.rerun(),
            AppMessage::CreateTask(draft) => self.handle_create(draft),
            AppMessage::UpdateTask(id, patch) => {
                self.handle_update(id, patch, "Task updated successfully", "Failed to update task")
            }
            AppMessage::DeleteTask(id) => self.handle_delete(id),
            AppMessage::MoveTask(id, status) => {
                let done = format!("Task moved to {}", format_status(status));
                self.handle_update(id, TaskPatch::status(status), &done, "Failed to move task")
            }
            AppMessage::QuickAction(action) => self.handle_quick_action(action),
            AppMessage::Refresh => self.reload(),
        }
    }

    fn notify_failure(&mut self, err: &ServiceError, fallback: &str) {
        match err {
            ServiceError::Validation(messages) => {
                let joined = messages.join("; ");
                self.notifications.notify(NotifyKind::Error, &joined);
            }
            other => {
                error!(error = %other, "task mutation failed");
                self.notifications.notify(NotifyKind::Error, fallback);
            }
        }
    }

    fn handle_create(&mut self, draft: TaskDraft) {
        self.loading.begin(LoadScope::Form);
        let result = self.service.create(draft);
        self.loading.end(LoadScope::Form);
        match result {
            Ok(task) => {
                self.tasks.push(task);
                self.rerun();
                self.form = None;
                self.notifications
                    .notify(NotifyKind::Success, "Task created successfully");
            }
            Err(e) => {
                if let Some(form) = &mut self.form {
                    form.current_field = 0;
                }
                self.notify_failure(&e, "Failed to create task");
            }
        }
    }

    fn handle_update(&mut self, id: u64, patch: TaskPatch, done: &str, failed: &str) {
        self.loading.begin(LoadScope::Form);
        let result = self.service.update(id, patch);
        self.loading.end(LoadScope::Form);
        match result {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *slot = updated;
                }
                self.rerun();
                self.form = None;
                self.notifications.notify(NotifyKind::Success, done);
            }
            Err(e) => self.notify_failure(&e, failed),
        }
    }

    fn handle_delete(&mut self, id: u64) {
        self.loading.begin(LoadScope::Board);
        let result = self.service.delete(id);
        self.loading.end(LoadScope::Board);
        match result {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                self.rerun();
                self.notifications
                    .notify(NotifyKind::Success, "Task deleted successfully");
            }
            Err(e) => self.notify_failure(&e, "Failed to delete task"),
        }
    }

    fn handle_quick_action(&mut self, action: QuickAction) {
        let changed = match action {
            QuickAction::ShowOverdue => {
                let today = Local::now().date_naive();
                let jumped = self.board.select_first_where(&self.filtered, |t| {
                    t.status != Status::Done && t.due.is_some_and(|d| d < today)
                });
                if !jumped {
                    self.notifications
                        .notify(NotifyKind::Info, "No overdue tasks");
                }
                None
            }
            QuickAction::ShowHighPriority => self.filter_bar.set_priority(Some(Priority::High)),
            QuickAction::ShowCompleted => self.filter_bar.set_status(Some(Status::Done)),
            QuickAction::ClearFilters => self.filter_bar.clear_all(),
        };
        if let Some(criteria) = changed {
            self.post(AppMessage::FilterChanged(criteria));
        }
    }

    /// Route a key press to whichever component has focus.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.form.is_some() {
            self.handle_form_key(key);
            return;
        }
        if let Some(id) = self.confirm_delete {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.confirm_delete = None;
                    self.post(AppMessage::DeleteTask(id));
                }
                _ => self.confirm_delete = None,
            }
            return;
        }
        if self.filter_bar.search_active {
            if let SearchKeyResult::Changed(Some(criteria)) =
                self.filter_bar.handle_search_key(key.code)
            {
                self.post(AppMessage::FilterChanged(criteria));
            }
            return;
        }
        self.handle_board_key(key);
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        // While a save is in flight the form stays visible but inert.
        if self.loading.is_active(LoadScope::Form) {
            return;
        }
        let Some(form) = &mut self.form else {
            return;
        };
        match form.handle_key(key) {
            FormAction::Cancel => {
                self.form = None;
            }
            FormAction::Submit => self.submit_form(),
            FormAction::None => {}
        }
    }

    /// Validate the whole form and raise the matching mutation message.
    /// Submission is withheld while any field is invalid.
    fn submit_form(&mut self) {
        let today = Local::now().date_naive();
        let Some(form) = &mut self.form else {
            return;
        };
        if !form.validate_all(today) {
            return;
        }
        let message = if let Some(id) = form.editing {
            match form.patch(today) {
                Ok(patch) => AppMessage::UpdateTask(id, patch),
                Err(_) => return,
            }
        } else {
            match form.draft(today) {
                Ok(draft) => AppMessage::CreateTask(draft),
                Err(_) => return,
            }
        };
        self.post(message);
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => self.board.select_left(),
            KeyCode::Right | KeyCode::Char('l') => self.board.select_right(),
            KeyCode::Up | KeyCode::Char('k') => self.board.select_up(),
            KeyCode::Down | KeyCode::Char('j') => self.board.select_down(),
            KeyCode::Char('n') => {
                self.form = Some(TaskForm::new(self.board.selected_status()));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.form = Some(TaskForm::from_task(task));
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.board.selected_id() {
                    self.confirm_delete = Some(id);
                }
            }
            KeyCode::Char('m') | KeyCode::Char(' ') => {
                if let Some(task) = self.selected_task() {
                    let next = match task.status {
                        Status::Todo => Status::InProgress,
                        Status::InProgress => Status::Done,
                        Status::Done => Status::Todo,
                    };
                    self.post(AppMessage::MoveTask(task.id, next));
                }
            }
            KeyCode::Char('s') => {
                if let Some(criteria) = self.filter_bar.cycle_status() {
                    self.post(AppMessage::FilterChanged(criteria));
                }
            }
            KeyCode::Char('p') => {
                if let Some(criteria) = self.filter_bar.cycle_priority() {
                    self.post(AppMessage::FilterChanged(criteria));
                }
            }
            KeyCode::Char('/') => self.filter_bar.search_active = true,
            KeyCode::Char('c') => {
                if let Some(criteria) = self.filter_bar.clear_all() {
                    self.post(AppMessage::FilterChanged(criteria));
                }
            }
            KeyCode::Char('r') => self.post(AppMessage::Refresh),
            KeyCode::Char('x') => self.notifications.dismiss(),
            KeyCode::Char(c) => {
                if let Some(action) = StatsPanel::quick_action_for(c) {
                    self.post(AppMessage::QuickAction(action));
                }
            }
            _ => {}
        }
    }

    fn selected_task(&self) -> Option<&Task> {
        let id = self.board.selected_id()?;
        self.filtered.iter().find(|t| t.id == id)
    }

    /// Advance time-based state: the search debounce and toast expiry.
    pub fn tick(&mut self, now: Instant) {
        if let Some(criteria) = self.filter_bar.tick(now) {
            self.post(AppMessage::FilterChanged(criteria));
        }
        self.notifications.tick();
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.filter_bar.render(f, chunks[0]);

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(chunks[1]);
        self.board.render(f, main[0], &self.filtered);
        self.stats_panel.render(f, main[1]);

        self.render_status_line(f, chunks[2]);

        if let Some(form) = &self.form {
            let area = centered_rect(60, 70, f.area());
            form.render(f, area, self.loading.is_active(LoadScope::Form));
        }
        if self.confirm_delete.is_some() {
            self.render_confirm(f);
        }
    }

    fn render_status_line(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if self.loading.is_active(LoadScope::Board) {
            spans.push(Span::styled("loading… ", Style::default().fg(Color::Yellow)));
        }
        if self.degraded {
            spans.push(Span::styled(
                "[data file unreadable] ",
                Style::default().fg(Color::Red),
            ));
        }
        if let Some(toast) = self.notifications.latest() {
            spans.push(Span::styled(
                toast.message.clone(),
                Style::default()
                    .fg(toast.kind.color())
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                "n: new  e: edit  d: delete  m: move  q: quit",
                Style::default().fg(Color::DarkGray),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_confirm(&self, f: &mut Frame) {
        let area = centered_rect(40, 20, f.area());
        f.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Delete Task ")
            .border_style(Style::default().fg(Color::Red));
        let text = Paragraph::new(vec![
            Line::from("Delete the selected task?"),
            Line::from(""),
            Line::from(Span::styled(
                "y: delete   any other key: cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(text, area);
    }

    /// Event loop: render, poll for input with a 50ms timeout, tick timers.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            self.tick(Instant::now());
            self.pump();
            terminal.draw(|f| self.render(f))?;
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Centered sub-rectangle sized as a percentage of the surrounding area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LoadedTasks;
    use crate::tui::notify::NotifyKind;

    /// In-memory service with a switch that makes every mutation fail.
    struct FakeService {
        tasks: Vec<Task>,
        next_id: u64,
        fail: bool,
    }

    impl FakeService {
        fn new(tasks: Vec<Task>) -> Self {
            let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            FakeService {
                tasks,
                next_id,
                fail: false,
            }
        }
    }

    impl TaskService for FakeService {
        fn load(&mut self) -> Result<LoadedTasks, ServiceError> {
            Ok(LoadedTasks {
                tasks: self.tasks.clone(),
                degraded: false,
            })
        }

        fn create(&mut self, draft: TaskDraft) -> Result<Task, ServiceError> {
            if self.fail {
                return Err(ServiceError::Backend {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let task = Task::from_draft(self.next_id, draft);
            self.next_id += 1;
            self.tasks.push(task.clone());
            Ok(task)
        }

        fn update(&mut self, id: u64, patch: TaskPatch) -> Result<Task, ServiceError> {
            if self.fail {
                return Err(ServiceError::Backend {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let task = self
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(ServiceError::NotFound(id))?;
            task.apply_patch(patch);
            Ok(task.clone())
        }

        fn delete(&mut self, id: u64) -> Result<(), ServiceError> {
            if self.fail {
                return Err(ServiceError::Backend {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let before = self.tasks.len();
            self.tasks.retain(|t| t.id != id);
            if self.tasks.len() == before {
                return Err(ServiceError::NotFound(id));
            }
            Ok(())
        }
    }

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

    fn seeded_app() -> App {
        let tasks = vec![
            Task::from_draft(1, draft("First")),
            Task::from_draft(2, draft("Second")),
        ];
        App::new(Box::new(FakeService::new(tasks)))
    }

    #[test]
    fn successful_create_updates_state_and_reruns_pipeline() {
        let mut app = seeded_app();
        app.post(AppMessage::CreateTask(draft("Third")));
        app.pump();

        assert_eq!(app.tasks.len(), 3);
        assert_eq!(app.filtered.len(), 3);
        assert_eq!(app.stats_panel.snapshot().total, 3);
        let toast = app.notifications.latest().unwrap();
        assert_eq!(toast.kind, NotifyKind::Success);
        assert_eq!(toast.message, "Task created successfully");
    }

    #[test]
    fn failed_create_leaves_state_untouched_and_reports_error() {
        let tasks = vec![Task::from_draft(1, draft("Only"))];
        let mut service = FakeService::new(tasks);
        service.fail = true;
        let mut app = App::new(Box::new(service));

        app.post(AppMessage::CreateTask(draft("Doomed")));
        app.pump();

        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.stats_panel.snapshot().total, 1);
        let toast = app.notifications.latest().unwrap();
        assert_eq!(toast.kind, NotifyKind::Error);
        assert_eq!(toast.message, "Failed to create task");
        assert!(!app.loading.is_active(LoadScope::Form));
    }

    #[test]
    fn validation_failures_surface_field_messages() {
        let mut app = seeded_app();
        app.notify_failure(
            &ServiceError::Validation(vec![
                "Title must be at least 3 characters long".to_string(),
                "Due date cannot be in the past".to_string(),
            ]),
            "Failed to update task",
        );
        let toast = app.notifications.latest().unwrap();
        assert_eq!(toast.kind, NotifyKind::Error);
        assert_eq!(
            toast.message,
            "Title must be at least 3 characters long; Due date cannot be in the past"
        );
    }

    #[test]
    fn filter_change_narrows_the_board_and_stats() {
        let mut app = seeded_app();
        let criteria = app.filter_bar.set_status(Some(Status::Done)).unwrap();
        app.post(AppMessage::FilterChanged(criteria));
        app.pump();

        assert!(app.filtered.is_empty());
        assert_eq!(app.stats_panel.snapshot().total, 0);
        // The underlying store is untouched by filtering.
        assert_eq!(app.tasks.len(), 2);
    }

    #[test]
    fn move_message_advances_the_workflow_status() {
        let mut app = seeded_app();
        app.post(AppMessage::MoveTask(1, Status::InProgress));
        app.pump();

        let moved = app.tasks.iter().find(|t| t.id == 1).unwrap();
        assert_eq!(moved.status, Status::InProgress);
        assert_eq!(
            app.notifications.latest().unwrap().message,
            "Task moved to In Progress"
        );
    }

    #[test]
    fn delete_flow_requires_confirmation() {
        let mut app = seeded_app();
        app.handle_key(KeyEvent::from(KeyCode::Char('d')));
        assert!(app.confirm_delete.is_some());

        // Any key other than confirm cancels.
        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert!(app.confirm_delete.is_none());
        assert_eq!(app.tasks.len(), 2);

        app.handle_key(KeyEvent::from(KeyCode::Char('d')));
        app.handle_key(KeyEvent::from(KeyCode::Char('y')));
        app.pump();
        assert_eq!(app.tasks.len(), 1);
    }

    #[test]
    fn quick_actions_drive_the_filter_bar() {
        let mut app = seeded_app();
        app.post(AppMessage::QuickAction(QuickAction::ShowHighPriority));
        app.pump();
        assert_eq!(app.filter_bar.criteria().priority, Some(Priority::High));
        assert!(app.filtered.is_empty());

        app.post(AppMessage::QuickAction(QuickAction::ClearFilters));
        app.pump();
        assert!(app.filter_bar.criteria().is_unrestricted());
        assert_eq!(app.filtered.len(), 2);
    }

    #[test]
    fn overdue_jump_with_no_overdue_tasks_informs_the_user() {
        let mut app = seeded_app();
        app.post(AppMessage::QuickAction(QuickAction::ShowOverdue));
        app.pump();
        let toast = app.notifications.latest().unwrap();
        assert_eq!(toast.kind, NotifyKind::Info);
        assert_eq!(toast.message, "No overdue tasks");
    }

    #[test]
    fn debounced_search_fires_through_the_message_queue() {
        let mut app = seeded_app();
        app.filter_bar.search_active = true;
        app.handle_key(KeyEvent::from(KeyCode::Char('f')));
        app.handle_key(KeyEvent::from(KeyCode::Char('i')));
        app.pump();
        // Nothing applied yet; the debounce window is still open.
        assert_eq!(app.filter_bar.criteria().search, "");

        app.tick(Instant::now() + Duration::from_millis(400));
        app.pump();
        assert_eq!(app.filter_bar.criteria().search, "fi");
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.filtered[0].title, "First");
    }
}
