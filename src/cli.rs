use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed task manager with a board TUI and an HTTP API.
/// Storage defaults to ./tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "taskflow", version, about = "Task management CLI, TUI and server")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
