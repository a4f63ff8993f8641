use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "backend.base_url must be an http(s) URL, got {url:?}"
            )));
        }
        if self.backend.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "backend.timeout_ms must be greater than 0".to_string(),
            ));
        }
        for (name, path) in [
            ("backend.stream_path", &self.backend.stream_path),
            ("backend.improve_path", &self.backend.improve_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{name} must start with '/', got {path:?}"
                )));
            }
        }
        Ok(())
    }
}

/// How the code is submitted to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `data:`-framed event stream.
    Stream,
    /// Single JSON request/response, reported as one `result` event.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMode {
    /// JSON body `{"payload":{"code":...}}`.
    Post,
    /// `?code=...` query parameter.
    Get,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_stream_path")]
    pub stream_path: String,

    #[serde(default = "default_improve_path")]
    pub improve_path: String,

    #[serde(default = "default_transport")]
    pub transport: Transport,

    #[serde(default = "default_request_mode")]
    pub request: RequestMode,

    #[serde(default = "default_token")]
    pub token: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl BackendConfig {
    pub fn stream_url(&self) -> String {
        join_url(&self.base_url, &self.stream_path)
    }

    pub fn improve_url(&self) -> String {
        join_url(&self.base_url, &self.improve_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim().trim_end_matches('/'), path)
}

fn default_base_url() -> String {
    option_env!("PYBEBRA_BACKEND_URL")
        .unwrap_or("http://127.0.0.1:8089")
        .to_string()
}

fn default_stream_path() -> String {
    "/improve/stream".to_string()
}

fn default_improve_path() -> String {
    "/improve".to_string()
}

fn default_transport() -> Transport {
    Transport::Stream
}

fn default_request_mode() -> RequestMode {
    RequestMode::Post
}

fn default_token() -> String {
    "bebra".to_string()
}

fn default_timeout_ms() -> u64 {
    150_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            stream_path: default_stream_path(),
            improve_path: default_improve_path(),
            transport: default_transport(),
            request: default_request_mode(),
            token: default_token(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for the TUI's rolling log file. Empty means `~/.pybebra/logs`.
    #[serde(default)]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub ascii: bool,

    /// Expand detail panels (retrieved samples, generated code) in text output.
    #[serde(default)]
    pub show_details: bool,

    #[serde(default = "default_sample_code")]
    pub sample_code: String,
}

pub const DEFAULT_SAMPLE_CODE: &str = "def fibonacci(n):
    if n <= 0:
        return 0
    elif n == 1:
        return 1
    else:
        return fibonacci(n-1) + fibonacci(n-2)

# This function is inefficient for large values of n
# due to repeated calculations";

fn default_sample_code() -> String {
    DEFAULT_SAMPLE_CODE.to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            ascii: false,
            show_details: false,
            sample_code: default_sample_code(),
        }
    }
}
