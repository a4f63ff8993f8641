use async_trait::async_trait;

use crate::event::OptimizationEvent;

pub type EventCallback<'a> = &'a mut (dyn FnMut(OptimizationEvent) + Send);

/// Submits code to the optimization service and reports its progress.
///
/// `optimize` invokes `on_event` once per decoded event, in arrival order,
/// and resolves when the response is over. It never fails: connection
/// errors, bad statuses and timeouts are delivered as exactly one `error`
/// event. Whether the run succeeded is left to the caller, which inspects
/// the event kinds it received.
#[async_trait]
pub trait OptimizationClient: Send + Sync {
    fn name(&self) -> &str;

    async fn optimize(&self, code: &str, on_event: EventCallback<'_>);
}
