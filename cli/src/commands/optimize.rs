use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use pybebra_core::api::{
    present, run_optimization, AppConfig, CliError, OptimizationEvent, Run, RunRenderer,
    RunStatus, RunStore,
};
use pybebra_plugins::factory;
use pybebra_plugins::stream::TextOptions;

use super::cli::OptimizeArgs;
use crate::input::read_code;

/// Runs one optimization and returns the process exit code.
pub async fn run(args: &OptimizeArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let code = read_code(args)?;
    let client =
        factory::build_client(&cfg.backend).map_err(|e| CliError::Command(e.to_string()))?;

    let stdout_tty = atty::is(atty::Stream::Stdout);
    let opts = TextOptions {
        ascii: args.ascii || cfg.ui.ascii,
        details: args.details || cfg.ui.show_details,
        color: stdout_tty && !args.no_color,
    };
    let renderer = factory::build_renderer(&args.stream_format, std::io::stdout(), opts);
    let mut renderer: Box<dyn RunRenderer> =
        if args.stream_format == "text" && atty::is(atty::Stream::Stderr) {
            Box::new(SpinnerRenderer::new(renderer))
        } else {
            renderer
        };

    let mut store = RunStore::new();
    let run = run_optimization(client.as_ref(), &mut store, &code, renderer.as_mut()).await?;
    Ok(exit_code(run.status))
}

pub fn exit_code(status: RunStatus) -> i32 {
    match status {
        RunStatus::Success => 0,
        _ => 1,
    }
}

/// Shows the latest event title on a stderr spinner while the inner
/// renderer prints the timeline.
struct SpinnerRenderer {
    inner: Box<dyn RunRenderer>,
    bar: ProgressBar,
}

impl SpinnerRenderer {
    fn new(inner: Box<dyn RunRenderer>) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { inner, bar }
    }
}

impl RunRenderer for SpinnerRenderer {
    fn on_start(&mut self, run: &Run) {
        self.bar.suspend(|| self.inner.on_start(run));
        self.bar.set_message("Waiting for the optimization service");
    }

    fn on_event(&mut self, run_id: &str, event: &OptimizationEvent) {
        self.bar.suspend(|| self.inner.on_event(run_id, event));
        self.bar.set_message(present(event).title);
    }

    fn on_finish(&mut self, run: &Run) {
        self.bar.finish_and_clear();
        self.inner.on_finish(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_success_exits_zero() {
        assert_eq!(exit_code(RunStatus::Success), 0);
        assert_eq!(exit_code(RunStatus::Failed), 1);
        assert_eq!(exit_code(RunStatus::Running), 1);
    }
}
