use chrono::Utc;

use crate::error::RunError;
use crate::event::{EventPayload, OptimizationEvent};

use super::model::{Run, RunStatus};

pub const STREAM_ENDED_MESSAGE: &str = "Optimization ended without a result";

/// What a single store update did to the run it was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Event appended; the run is still running.
    Appended,
    /// Event appended and the run moved to history with this status.
    Finalized(RunStatus),
    /// The run is no longer current; nothing changed.
    Ignored,
}

/// Owns the active run and the history list. All mutation goes through
/// `begin`, `apply` and `finish_stream`, so the invariants hold by
/// construction: at most one running run, each run enters history once,
/// history is most-recent-first.
#[derive(Debug, Default)]
pub struct RunStore {
    current: Option<Run>,
    history: Vec<Run>,
    last_millis: i64,
    seq: u32,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Run> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[Run] {
        &self.history
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Most recently finalized run.
    pub fn latest(&self) -> Option<&Run> {
        self.history.first()
    }

    pub fn find(&self, run_id: &str) -> Option<&Run> {
        self.current
            .iter()
            .chain(self.history.iter())
            .find(|r| r.id == run_id)
    }

    pub fn begin(&mut self, code: &str) -> Result<&Run, RunError> {
        if code.trim().is_empty() {
            return Err(RunError::EmptyCode);
        }
        if let Some(run) = &self.current {
            return Err(RunError::AlreadyRunning {
                run_id: run.id.clone(),
            });
        }

        let id = self.next_id();
        tracing::info!(target: "pybebra.run", run_id = %id, bytes = code.len(), "run started");
        Ok(self.current.insert(Run::new(id, code.to_string())))
    }

    pub fn apply(&mut self, run_id: &str, event: OptimizationEvent) -> Transition {
        let Some(run) = self.current.as_mut().filter(|r| r.id == run_id) else {
            tracing::debug!(
                target: "pybebra.run",
                run_id = %run_id,
                event_type = %event.event_type,
                "event for inactive run ignored"
            );
            return Transition::Ignored;
        };

        let outcome = event.kind().terminal_outcome();
        let optimized = match (&outcome, event.payload()) {
            (Some(true), EventPayload::Result { generated_code, .. }) => generated_code,
            _ => None,
        };
        run.events.push(event);

        match outcome {
            None => Transition::Appended,
            Some(success) => {
                if success {
                    run.optimized_code = optimized;
                }
                let status = if success {
                    RunStatus::Success
                } else {
                    RunStatus::Failed
                };
                self.finalize(status)
            }
        }
    }

    /// Called once the event stream for `run_id` is over. A run that never
    /// saw a terminal event is closed as failed with a synthetic error event.
    pub fn finish_stream(&mut self, run_id: &str) -> Transition {
        let Some(run) = self.current.as_mut().filter(|r| r.id == run_id) else {
            return Transition::Ignored;
        };
        tracing::warn!(
            target: "pybebra.run",
            run_id = %run_id,
            events = run.events.len(),
            "stream ended without a terminal event"
        );
        run.events.push(OptimizationEvent::error(STREAM_ENDED_MESSAGE));
        self.finalize(RunStatus::Failed)
    }

    fn finalize(&mut self, status: RunStatus) -> Transition {
        let Some(mut run) = self.current.take() else {
            return Transition::Ignored;
        };
        run.status = status;
        tracing::info!(
            target: "pybebra.run",
            run_id = %run.id,
            status = status.as_str(),
            events = run.events.len(),
            "run finished"
        );
        self.history.insert(0, run);
        Transition::Finalized(status)
    }

    fn next_id(&mut self) -> String {
        let millis = Utc::now().timestamp_millis();
        if millis == self.last_millis {
            self.seq += 1;
            format!("run-{millis}-{}", self.seq)
        } else {
            self.last_millis = millis;
            self.seq = 0;
            format!("run-{millis}")
        }
    }
}
