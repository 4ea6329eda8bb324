//! rTimeblock library root.
//! Exposes the slot-grid engine, the editing session, the CLI parser and the
//! high-level run() function.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod grid;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use grid::config::{Clock, FixedClock, SystemClock};
use std::sync::Arc;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, clock: Arc<dyn Clock>) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Add { .. } => cli::commands::add::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg, clock),
        Commands::Show { .. } => cli::commands::show::handle(&cli.command, cfg, clock),
        Commands::Del { .. } => cli::commands::del::handle(&cli.command, cfg),
        Commands::Status { .. } => cli::commands::status::handle(&cli.command, cfg),
        Commands::Edit { .. } => cli::commands::edit::handle(&cli.command, cfg, clock),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Load the config once; a missing file means defaults.
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    let clock: Arc<dyn Clock> = match &cli.now {
        Some(now) => Arc::new(FixedClock(utils::time::parse_datetime(now)?)),
        None => Arc::new(SystemClock),
    };

    dispatch(&cli, &cfg, clock)
}
