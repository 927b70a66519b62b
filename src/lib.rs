//! stempeluhr library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (server, stores, auth, core calculations).

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod models;
pub mod server;
pub mod store;
pub mod ui;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse the CLI
    let cli = Cli::parse();

    // 2️⃣ load the configuration once
    let mut cfg = Config::load();

    // 3️⃣ apply the data directory override, if any
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
