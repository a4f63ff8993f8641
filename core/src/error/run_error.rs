// core/src/error/run_error.rs
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("nothing to optimize: code is empty")]
    EmptyCode,

    #[error("an optimization is already running: {run_id}")]
    AlreadyRunning { run_id: String },

    #[error("run finished without reaching history: {run_id}")]
    Lost { run_id: String },
}
