//! # TaskFlow
//!
//! A file-backed task manager with three faces over the same JSON store:
//!
//! - **CLI**: scriptable CRUD commands (`add`, `list`, `update`, ...)
//! - **TUI**: an interactive status board with filtering and live statistics
//! - **Server**: an HTTP JSON API with an optional read-only mode
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task via CLI
//! taskflow add "Fix login bug" --priority high --due tomorrow
//!
//! # List tasks
//! taskflow list --status todo
//!
//! # Launch the board TUI
//! taskflow ui
//!
//! # Start the HTTP server
//! taskflow serve --port 3000
//!
//! # Point the TUI at a running server
//! taskflow ui --remote http://127.0.0.1:3000
//! ```
//!
//! Data is stored in a single `tasks.json` (override with `--db`). The file
//! is written atomically, so a crash mid-save never corrupts existing data.

pub mod api;
pub mod cli;
pub mod client;
pub mod cmd;
pub mod fields;
pub mod filter;
pub mod server;
pub mod stats;
pub mod store;
pub mod task;
pub mod validate;
pub mod tui {
    pub mod app;
    pub mod board;
    pub mod colors;
    pub mod filter_bar;
    pub mod input;
    pub mod notify;
    pub mod run;
    pub mod stats_panel;
    pub mod task_form;
}
