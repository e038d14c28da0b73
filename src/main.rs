mod calendar;
mod capacity;
mod config;
mod db;
mod http;
mod import;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Initiative, resource and monthly capacity planning.
///
/// Without a subcommand, launches the interactive terminal UI.
#[derive(Parser)]
#[command(name = "capplan", version, about)]
struct Cli {
    /// SQLite database file (overrides CAPPLAN_DB and capplan.toml)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<run::Command>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::Config::load()?;
    if let Some(path) = cli.db {
        config.db_path = path;
    }

    match cli.command {
        None => {
            logging::init_file(&config.log_file)?;
            let mut db = db::Database::open(&config.db_path)?;
            run::as_tui(&mut db, config.window_size)
        }
        Some(command) => {
            logging::init_stderr();
            run::as_cli(command, &config)
        }
    }
}
