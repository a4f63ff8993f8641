use crate::event::OptimizationEvent;
use crate::run::Run;

/// Output strategy for a one-shot run (plain text, JSONL, ...).
///
/// `on_event` only sees events the store accepted for the active run, plus
/// the synthetic failure appended when a stream ends early.
pub trait RunRenderer: Send {
    fn on_start(&mut self, run: &Run);

    fn on_event(&mut self, run_id: &str, event: &OptimizationEvent);

    fn on_finish(&mut self, run: &Run);
}
