use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskflow::cli::Cli;
use taskflow::cmd::*;
use taskflow::store::Store;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = cli.db.clone().unwrap_or_else(|| PathBuf::from("tasks.json"));

    let result = match cli.command {
        Commands::Ui { remote } => cmd_ui(&db_path, remote),
        Commands::Serve {
            host,
            port,
            read_only,
        } => cmd_serve(&db_path, host, port, read_only),
        Commands::Add {
            title,
            desc,
            assignee,
            due,
            status,
            priority,
        } => {
            let mut store = Store::load(&db_path);
            cmd_add(&mut store, &db_path, title, desc, assignee, due, status, priority)
        }
        Commands::List {
            status,
            priority,
            search,
        } => cmd_list(&Store::load(&db_path), status, priority, search),
        Commands::View { id } => cmd_view(&Store::load(&db_path), id),
        Commands::Update {
            id,
            title,
            desc,
            assignee,
            due,
            clear_due,
            status,
            priority,
        } => {
            let mut store = Store::load(&db_path);
            cmd_update(
                &mut store, &db_path, id, title, desc, assignee, due, clear_due, status, priority,
            )
        }
        Commands::Complete { id } => {
            let mut store = Store::load(&db_path);
            cmd_complete(&mut store, &db_path, id)
        }
        Commands::Delete { id } => {
            let mut store = Store::load(&db_path);
            cmd_delete(&mut store, &db_path, id)
        }
        Commands::Stats => cmd_stats(&Store::load(&db_path)),
        Commands::Completions { shell } => cmd_completions(shell),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
