mod cli;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "user-archiver", version, about = "Archive inactive users from the event store")]
struct App {
    /// Configuration file (JSON). Defaults to {data_dir}/config.json when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// SQLite database holding user_events and archived_users
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one archival pass (default)
    Run {
        /// Decide without archiving, deleting or writing a report
        #[arg(long)]
        dry_run: bool,
        /// Directory for the <YYYY-MM-DD>.json report
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
    /// Show live event and archive counts
    Status,
    /// Import events from a JSON array file
    Import {
        /// File containing [{"user_id", "event_time", "user_info": {...}}, ...]
        file: PathBuf,
    },
    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display the effective configuration
    Show,
    /// Write the effective configuration to a file
    Init {
        /// Destination. Defaults to {data_dir}/config.json
        #[arg(long)]
        output: Option<PathBuf>,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let app = App::parse();

    let result = cli::setup(app.config.as_deref(), app.database.as_deref()).and_then(|config| {
        match app.command {
            // No subcommand → one archival run
            None => cli::run::run(&config, false, None),
            Some(Commands::Run { dry_run, report_dir }) => {
                cli::run::run(&config, dry_run, report_dir.as_deref())
            }
            Some(Commands::Status) => cli::status::run(&config),
            Some(Commands::Import { file }) => cli::import::run(&config, &file),
            Some(Commands::Config { action }) => match action {
                ConfigAction::Show => cli::config::run_show(&config),
                ConfigAction::Init { output, force } => {
                    let target = output.unwrap_or_else(user_archiver::storage::path_utils::config_path);
                    cli::config::run_init(&config, &target, force)
                }
            },
        }
    });

    if let Err(e) = result {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
