//! `libcat` command-line entry point.

mod catalog;
mod cli;
mod commands;
mod config;
mod format;
mod shell;

use anyhow::{Context, Result};
use catalog::Catalog;
use clap::Parser;
use cli::{Cli, Command};
use commands::{execute, Outcome};
use config::{AppConfig, StorageKind};
use format::OutputFormat;
use libcat_core::db::open_db;
use libcat_core::db::seed::seed_demo_data;
use libcat_core::{init_logging, MemoryStore};
use log::info;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::resolve(&cli)?;
    if let Some(dir) = &config.log_dir {
        init_logging(config.log_level, dir).context("failed to start logging")?;
    }
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match config.storage {
        StorageKind::Sqlite => {
            let mut conn = open_db(&config.db_path)
                .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
            if config.seed_demo_data && seed_demo_data(&mut conn)? {
                info!("event=seed module=cli status=ok storage=sqlite");
            }
            let catalog = Catalog::sqlite(&conn)?;
            dispatch(&catalog, &cli.command, format)
        }
        StorageKind::Memory => {
            let store = if config.seed_demo_data {
                MemoryStore::with_demo_data()
            } else {
                MemoryStore::new()
            };
            let catalog = Catalog::memory(&store);
            dispatch(&catalog, &cli.command, format)
        }
    }
}

fn dispatch(catalog: &Catalog<'_>, command: &Command, format: OutputFormat) -> Result<ExitCode> {
    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();

    match command {
        Command::Shell => {
            shell::run_shell(catalog, &mut input, &mut out, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Catalog(command) => match execute(catalog, command, &mut input, &mut out, format)? {
            Outcome::Done => Ok(ExitCode::SUCCESS),
            Outcome::Rejected => Ok(ExitCode::from(1)),
        },
    }
}
