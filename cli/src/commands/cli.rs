use clap::{Args as ClapArgs, Parser, Subcommand};

use pybebra_core::api::{AppConfig, ConfigError, Transport};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportArg {
    Stream,
    Json,
}

impl From<TransportArg> for Transport {
    fn from(t: TransportArg) -> Self {
        match t {
            TransportArg::Stream => Transport::Stream,
            TransportArg::Json => Transport::Json,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Submit Python functions to the PyBebra optimization service")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ./config.toml, then the user config dir).
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    #[arg(long, global = true)]
    pub token: Option<String>,

    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[arg(long, value_enum, global = true)]
    pub transport: Option<TransportArg>,
}

impl Args {
    /// Loads the config file and layers command-line overrides on top.
    pub fn resolve_config(&self) -> Result<AppConfig, ConfigError> {
        let mut cfg = pybebra_core::api::load(self.config.as_deref())?;
        self.apply_overrides(&mut cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(url) = &self.backend_url {
            cfg.backend.base_url = url.clone();
        }
        if let Some(token) = &self.token {
            cfg.backend.token = token.clone();
        }
        if let Some(ms) = self.timeout_ms {
            cfg.backend.timeout_ms = ms;
        }
        if let Some(t) = self.transport {
            cfg.backend.transport = t.into();
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct OptimizeArgs {
    #[arg(long, group = "input")]
    pub file: Option<String>,

    #[arg(long, group = "input")]
    pub code: Option<String>,

    #[arg(long, group = "input")]
    pub stdin: bool,

    #[arg(long, default_value = "text", value_parser = ["text", "jsonl"])]
    pub stream_format: String,

    #[arg(long, default_value_t = false)]
    pub ascii: bool,

    /// Print retrieved samples and generated code inline.
    #[arg(long, default_value_t = false)]
    pub details: bool,

    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Optimize one snippet and print its timeline.
    Optimize(OptimizeArgs),
    /// Interactive editor with run history.
    Tui,
}
