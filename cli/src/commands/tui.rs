use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use pybebra_core::api::{AppConfig, CliError, OptimizationClient};
use pybebra_plugins::factory;

use crate::tui::events::{spawn_input_reader, StreamMessage};
use crate::tui::{check_tui_support, restore_terminal, setup_terminal, ui, AppAction, Tui, TuiApp};

const TICK: Duration = Duration::from_millis(120);

pub async fn run(cfg: &AppConfig) -> Result<i32, CliError> {
    check_tui_support()?;
    let client: Arc<dyn OptimizationClient> = Arc::from(
        factory::build_client(&cfg.backend).map_err(|e| CliError::Command(e.to_string()))?,
    );
    let mut app = TuiApp::new(&cfg.ui);

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, client).await;
    restore_terminal(&mut terminal)?;
    result.map(|()| 0)
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut TuiApp,
    client: Arc<dyn OptimizationClient>,
) -> Result<(), CliError> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let _reader = spawn_input_reader(input_tx);
    let (stream_tx, mut stream_rx) = mpsc::unbounded_channel();
    let mut tick = tokio::time::interval(TICK);

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| CliError::Terminal(e.to_string()))?;

        tokio::select! {
            Some(input) = input_rx.recv() => match app.handle_input(input) {
                AppAction::Quit => break,
                AppAction::Submit { run_id, code } => {
                    spawn_stream(client.clone(), run_id, code, stream_tx.clone());
                }
                AppAction::None => {}
            },
            Some(msg) = stream_rx.recv() => app.on_stream(msg),
            _ = tick.tick() => app.on_tick(),
        }
    }

    tracing::info!(target: "pybebra.tui", runs = app.run_count(), "tui closed");
    Ok(())
}

/// Drives one stream on its own task. The UI loop applies the forwarded
/// events, so the store has a single writer.
fn spawn_stream(
    client: Arc<dyn OptimizationClient>,
    run_id: String,
    code: String,
    tx: mpsc::UnboundedSender<StreamMessage>,
) {
    tokio::spawn(async move {
        tracing::debug!(target: "pybebra.tui", run_id = %run_id, client = client.name(), "stream task started");
        {
            let mut forward = |event| {
                let _ = tx.send(StreamMessage::Event {
                    run_id: run_id.clone(),
                    event,
                });
            };
            client.optimize(&code, &mut forward).await;
        }
        let _ = tx.send(StreamMessage::Finished { run_id });
    });
}
