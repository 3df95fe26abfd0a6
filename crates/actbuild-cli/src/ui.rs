use actbuild::engine::progress::{Progress, ProgressCallback};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

#[derive(Default)]
struct BarState {
    active_bar: Option<ProgressBar>,
    base_message: String,
}

/// Renders workflow phases as spinners on stderr.
///
/// Phase spinners and the check-mark lines are only drawn when stderr is a terminal.
/// `Progress::Message` lines always go to stdout, above any active spinner.
#[derive(Clone)]
pub struct CliProgressHandler {
    mp: Arc<MultiProgress>,
    state: Arc<Mutex<BarState>>,
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr_with_hz(12))
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            mp: Arc::new(MultiProgress::with_draw_target(target)),
            state: Arc::new(Mutex::new(BarState::default())),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |progress: Progress| handler.handle_progress(progress))
    }

    /// Clears a spinner left behind by a phase that never finished (the workflow failed).
    pub fn finish(&self) {
        match self.state.lock() {
            Ok(mut state) => {
                if let Some(bar) = state.active_bar.take() {
                    bar.finish_and_clear();
                }
            }
            Err(e) => warn!("Progress state poisoned: {}", e),
        }
    }

    fn handle_progress(&self, progress: Progress) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(e) => {
                warn!("Progress state poisoned: {}", e);
                return;
            }
        };

        match progress {
            Progress::PhaseStart { name } => {
                if let Some(bar) = state.active_bar.take() {
                    bar.finish_and_clear();
                }

                let pb = self.mp.add(ProgressBar::new_spinner());
                pb.enable_steady_tick(Duration::from_millis(80));
                pb.set_style(Self::spinner_style());
                pb.set_message(name);

                state.active_bar = Some(pb);
                state.base_message = name.to_string();
            }
            Progress::PhaseFinish => {
                if let Some(bar) = state.active_bar.take() {
                    bar.finish_and_clear();
                }

                let final_message = format!("✓ {}", state.base_message);
                self.mp.println(final_message).ok();

                state.base_message.clear();
            }
            Progress::PhaseSkipped { name, reason } => {
                self.mp.println(format!("- {} (skipped: {})", name, reason)).ok();
            }
            Progress::Message(msg) => {
                self.mp.suspend(|| println!("{}", msg));
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }
}
