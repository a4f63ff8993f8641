use std::path::PathBuf;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use pybebra_core::api::{CliError, LoggingConfig};

mod commands;
mod input;
mod tui;

use commands::cli;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("pybebra: {e}");
            std::process::exit(2);
        }
    }
}

async fn run(args: cli::Args) -> Result<i32, CliError> {
    let cfg = args.resolve_config()?;

    let command = match args.command.clone() {
        Some(cmd) => cmd,
        None if atty::is(atty::Stream::Stdout) => cli::Commands::Tui,
        None => {
            return Err(CliError::Command(
                "no subcommand given and stdout is not a terminal; try `pybebra optimize --stdin`"
                    .to_string(),
            ))
        }
    };

    match command {
        cli::Commands::Optimize(opt) => {
            init_stderr_logging(&cfg.logging);
            commands::optimize::run(&opt, &cfg).await
        }
        cli::Commands::Tui => {
            let _guard = init_file_logging(&cfg.logging)?;
            commands::tui::run(&cfg).await
        }
    }
}

fn env_filter(cfg: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level))
}

fn init_stderr_logging(cfg: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cfg))
        .with_writer(std::io::stderr)
        .init();
}

/// The TUI owns the screen, so logs go to `<dir>/pybebra.log.<date>`.
fn init_file_logging(cfg: &LoggingConfig) -> Result<WorkerGuard, CliError> {
    let dir = log_dir(cfg);
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::daily(&dir, "pybebra.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cfg))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    tracing::info!(target: "pybebra.cli", dir = %dir.display(), "file logging started");
    Ok(guard)
}

fn log_dir(cfg: &LoggingConfig) -> PathBuf {
    if !cfg.dir.is_empty() {
        return PathBuf::from(&cfg.dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pybebra")
        .join("logs")
}
