// core/src/error/cli_error.rs
use thiserror::Error;

use super::{ConfigError, RunError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Run(#[from] RunError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("{0}")]
    Command(String),
}
