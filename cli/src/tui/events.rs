use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::mpsc;

use pybebra_core::api::OptimizationEvent;

#[derive(Debug)]
pub enum InputEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
}

/// Messages from the task that owns the network stream.
#[derive(Debug)]
pub enum StreamMessage {
    Event {
        run_id: String,
        event: OptimizationEvent,
    },
    Finished {
        run_id: String,
    },
}

/// Reads terminal events on a dedicated thread until the receiver goes away.
pub fn spawn_input_reader(tx: mpsc::UnboundedSender<InputEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(200)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    tracing::warn!(target: "pybebra.tui", error = %e, "terminal poll failed");
                    break;
                }
            }
            let input = match event::read() {
                Ok(Event::Key(key)) => InputEvent::Key(key),
                Ok(Event::Paste(text)) => InputEvent::Paste(text),
                Ok(Event::Resize(_, _)) => InputEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(target: "pybebra.tui", error = %e, "terminal read failed");
                    break;
                }
            };
            if tx.send(input).is_err() {
                break;
            }
        }
        tracing::debug!(target: "pybebra.tui", "input reader stopped");
    })
}
