//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `pybebra_core::api` instead of reaching into internal modules.

pub use crate::client::{EventCallback, OptimizationClient};
pub use crate::config::{
    load, AppConfig, BackendConfig, LoggingConfig, RequestMode, Transport, UiConfig,
    DEFAULT_SAMPLE_CODE,
};
pub use crate::engine::run_optimization;
pub use crate::error::{CliError, ClientError, ConfigError, RunError};
pub use crate::event::{EventKind, EventPayload, FrameDecoder, OptimizationEvent};
pub use crate::run::{Run, RunStatus, RunStore, Transition};
pub use crate::view::{
    present, status_style, DetailPanel, EventView, Icon, RunRenderer, Tone,
};
