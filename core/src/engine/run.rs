use crate::client::OptimizationClient;
use crate::error::RunError;
use crate::event::OptimizationEvent;
use crate::run::{Run, RunStore, Transition};
use crate::view::RunRenderer;

/// Runs one submission end to end: opens a run in `store`, streams events
/// from `client` into it, closes the run if the stream ended without a
/// terminal event, and returns the finalized run.
pub async fn run_optimization(
    client: &dyn OptimizationClient,
    store: &mut RunStore,
    code: &str,
    renderer: &mut dyn RunRenderer,
) -> Result<Run, RunError> {
    let run_id = {
        let run = store.begin(code)?;
        renderer.on_start(run);
        run.id.clone()
    };

    tracing::debug!(
        target: "pybebra.engine",
        run_id = %run_id,
        client = client.name(),
        "submitting code"
    );

    {
        let mut on_event = |ev: OptimizationEvent| {
            if store.apply(&run_id, ev.clone()) != Transition::Ignored {
                renderer.on_event(&run_id, &ev);
            }
        };
        client.optimize(code, &mut on_event).await;
    }

    if let Transition::Finalized(_) = store.finish_stream(&run_id) {
        if let Some(last) = store.latest().and_then(|r| r.events.last()) {
            renderer.on_event(&run_id, last);
        }
    }

    let run = store
        .find(&run_id)
        .cloned()
        .ok_or_else(|| RunError::Lost {
            run_id: run_id.clone(),
        })?;
    renderer.on_finish(&run);
    Ok(run)
}
