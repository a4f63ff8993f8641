use chrono::{DateTime, Local};
use serde::Serialize;

use crate::event::OptimizationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Success,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

/// One submission of source code and the timeline the service reported for it.
#[derive(Debug, Clone, Serialize)]
pub struct Run {
    pub id: String,
    pub original_code: String,
    pub events: Vec<OptimizationEvent>,
    pub optimized_code: Option<String>,
    pub status: RunStatus,
    pub timestamp: DateTime<Local>,
}

impl Run {
    pub fn new(id: String, original_code: String) -> Self {
        Self {
            id,
            original_code,
            events: Vec::new(),
            optimized_code: None,
            status: RunStatus::Running,
            timestamp: Local::now(),
        }
    }

    /// `HH:MM:SS`, 24-hour clock.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
