//! Command implementations for the CLI interface.
//!
//! Each subcommand gets a `cmd_*` handler. The CRUD commands work on the
//! local JSON store directly; `serve` starts the HTTP server and `ui` opens
//! the board TUI, locally or against a remote server.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use chrono::Local;
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::client::{FileService, HttpService, TaskService};
use crate::fields::{format_priority, format_status, Priority, Status};
use crate::filter::{self, Criteria};
use crate::server::{self, AppState};
use crate::stats;
use crate::store::{format_due_relative, parse_due_input, truncate, Store};
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::tui::run::run_tui;
use crate::validate;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive board interface.
    Ui {
        /// Connect to a running server instead of the local file,
        /// e.g. http://127.0.0.1:3000.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Start the HTTP server.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on.
        #[arg(long, default_value_t = 3000)]
        port: u16,
        /// Serve tasks and statistics only; reject mutations.
        #[arg(long)]
        read_only: bool,
    },

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Person responsible for the task.
        #[arg(long)]
        assignee: Option<String>,
        /// Due date: YYYY-MM-DD, "today" or "tomorrow".
        #[arg(long)]
        due: Option<String>,
        /// Status: todo | in-progress | done.
        #[arg(long, value_enum, default_value_t = Status::Todo)]
        status: Status,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
    },

    /// List tasks with optional filters.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Case-insensitive text search over title, description and assignee.
        #[arg(long, default_value = "")]
        search: String,
    },

    /// View a single task by ID.
    View {
        /// Task ID.
        id: u64,
    },

    /// Update fields of an existing task.
    Update {
        /// Task ID.
        id: u64,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long)]
        desc: Option<String>,
        /// New assignee.
        #[arg(long)]
        assignee: Option<String>,
        /// New due date: YYYY-MM-DD, "today" or "tomorrow".
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
        /// New status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// New priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Mark a task as done.
    Complete {
        /// Task ID.
        id: u64,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// Show aggregated statistics for the task file.
    Stats,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the TUI over the local file or a remote server.
pub fn cmd_ui(db_path: &Path, remote: Option<String>) -> anyhow::Result<()> {
    let service: Box<dyn TaskService> = match remote {
        Some(base) => Box::new(HttpService::new(base)?),
        None => Box::new(FileService::new(db_path.to_path_buf())),
    };
    run_tui(service)?;
    Ok(())
}

/// Start the HTTP server on its own runtime.
pub fn cmd_serve(db_path: &Path, host: String, port: u16, read_only: bool) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let store = Store::load(db_path);
    let state = AppState::new(store, db_path.to_path_buf(), read_only);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::run(addr, state))
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    store: &mut Store,
    db_path: &Path,
    title: String,
    desc: Option<String>,
    assignee: Option<String>,
    due: Option<String>,
    status: Status,
    priority: Priority,
) -> anyhow::Result<()> {
    let due = match due {
        Some(raw) => Some(
            parse_due_input(&raw).ok_or_else(|| anyhow!("unrecognised due date: {raw}"))?,
        ),
        None => None,
    };
    let draft = TaskDraft {
        title,
        description: desc,
        status,
        priority,
        assignee,
        due,
    };
    let errors = validate::validate_draft(&draft);
    if !errors.is_empty() {
        bail!("{}", errors.join("\n"));
    }
    let task = store.create(draft);
    store.save(db_path)?;
    println!("Added task #{}: {}", task.id, task.title);
    Ok(())
}

pub fn cmd_list(
    store: &Store,
    status: Option<Status>,
    priority: Option<Priority>,
    search: String,
) -> anyhow::Result<()> {
    let criteria = Criteria {
        status,
        priority,
        search,
    };
    let filtered = filter::apply(&store.tasks, &criteria);
    print_table(&filtered);
    println!("{} of {} task(s)", filtered.len(), store.tasks.len());
    Ok(())
}

pub fn cmd_view(store: &Store, id: u64) -> anyhow::Result<()> {
    let task = store.get(id).ok_or_else(|| anyhow!("no task with id {id}"))?;
    let today = Local::now().date_naive();
    println!("#{} {}", task.id, task.title);
    println!("  Status:   {}", format_status(task.status));
    println!("  Priority: {}", format_priority(task.priority));
    println!("  Assignee: {}", task.assignee.as_deref().unwrap_or("-"));
    println!("  Due:      {}", format_due_relative(task.due, today));
    if let Some(description) = &task.description {
        println!("  Description:");
        for line in description.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    store: &mut Store,
    db_path: &Path,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    assignee: Option<String>,
    due: Option<String>,
    clear_due: bool,
    status: Option<Status>,
    priority: Option<Priority>,
) -> anyhow::Result<()> {
    let due = match due {
        Some(raw) => Some(
            parse_due_input(&raw).ok_or_else(|| anyhow!("unrecognised due date: {raw}"))?,
        ),
        None => None,
    };
    let patch = TaskPatch {
        title,
        description: desc,
        status,
        priority,
        assignee,
        due,
        clear_due,
        clear_assignee: false,
    };
    let errors = validate::validate_patch(&patch);
    if !errors.is_empty() {
        bail!("{}", errors.join("\n"));
    }
    let task = store
        .update(id, patch)
        .ok_or_else(|| anyhow!("no task with id {id}"))?;
    store.save(db_path)?;
    println!("Updated task #{}: {}", task.id, task.title);
    Ok(())
}

pub fn cmd_complete(store: &mut Store, db_path: &Path, id: u64) -> anyhow::Result<()> {
    let task = store
        .update(id, TaskPatch::status(Status::Done))
        .ok_or_else(|| anyhow!("no task with id {id}"))?;
    store.save(db_path)?;
    println!("Completed task #{}: {}", task.id, task.title);
    Ok(())
}

pub fn cmd_delete(store: &mut Store, db_path: &Path, id: u64) -> anyhow::Result<()> {
    if !store.remove(id) {
        bail!("no task with id {id}");
    }
    store.save(db_path)?;
    println!("Deleted task #{id}");
    Ok(())
}

pub fn cmd_stats(store: &Store) -> anyhow::Result<()> {
    let snapshot = stats::aggregate(&store.tasks);
    println!("Total tasks:     {}", snapshot.total);
    println!(
        "By status:       todo {}  in-progress {}  done {}",
        snapshot.by_status.todo, snapshot.by_status.in_progress, snapshot.by_status.done
    );
    println!(
        "By priority:     low {}  medium {}  high {}",
        snapshot.by_priority.low, snapshot.by_priority.medium, snapshot.by_priority.high
    );
    println!(
        "By due date:     overdue {}  today {}  this week {}  none {}",
        snapshot.by_due.overdue, snapshot.by_due.today, snapshot.by_due.week, snapshot.by_due.none
    );
    println!("Completion rate: {}%", snapshot.completion_rate);
    println!();
    for line in stats::insights(&snapshot) {
        println!("  {line}");
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}

/// Print tasks as an aligned table.
fn print_table(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    let today = Local::now().date_naive();
    println!(
        "{:>4}  {:<40} {:<12} {:<8} {:<14} {:<10}",
        "ID", "Title", "Status", "Priority", "Assignee", "Due"
    );
    for task in tasks {
        println!(
            "{:>4}  {:<40} {:<12} {:<8} {:<14} {:<10}",
            task.id,
            truncate(&task.title, 40),
            task.status.as_str(),
            task.priority.as_str(),
            truncate(task.assignee.as_deref().unwrap_or("-"), 14),
            format_due_relative(task.due, today),
        );
    }
}
