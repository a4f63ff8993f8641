mod cli_error;
mod client_error;
mod config_error;
mod run_error;

pub use cli_error::CliError;
pub use client_error::ClientError;
pub use config_error::ConfigError;
pub use run_error::RunError;
