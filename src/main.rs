mod cli;
mod commands;
mod config;
mod progress;
mod rclone;
mod runner;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

use config::Config;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    log::debug!(
        "rcmenu {} (verbosity {})",
        env!("CARGO_PKG_VERSION"),
        ctx.verbose
    );

    match cli.command {
        None | Some(Command::Menu) => commands::menu::run(&Config::from_env()?),
        Some(Command::Refresh) => commands::refresh::foreground(&ctx, &Config::from_env()?),
        Some(Command::List { sort, json }) => {
            commands::list::run(&Config::from_env()?, sort.into(), json)
        }
        Some(Command::RefreshWorker { remotes }) => {
            // Detached from any terminal; errors have nowhere to go
            match Config::from_env() {
                Ok(config) => commands::refresh::worker(&config, &remotes),
                Err(e) => {
                    log::debug!("Refresh skipped: {e:#}");
                    Ok(())
                }
            }
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "rcmenu", &mut io::stdout());
            Ok(())
        }
    }
}
