use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use qcflow::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct BarState {
    pb: ProgressBar,
    phase: &'static str,
    skipped: u64,
    halted: bool,
}

impl BarState {
    fn label(&self) -> String {
        if self.skipped == 0 {
            self.phase.to_string()
        } else {
            format!("{} ({} skipped)", self.phase, self.skipped)
        }
    }

    fn apply(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                self.phase = name;
                self.skipped = 0;
                self.halted = false;
                self.pb.reset();
                self.pb.set_length(0);
                self.pb.set_style(spinner_style());
                self.pb
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                self.pb.set_message(self.label());
            }
            Progress::TaskStart { total_files } => {
                self.pb.disable_steady_tick();
                self.pb.set_length(total_files);
                self.pb.set_position(0);
                self.pb.set_style(bar_style());
            }
            Progress::FileDone => self.pb.inc(1),
            Progress::FileSkipped { file, reason } => {
                self.skipped += 1;
                self.pb.println(format!("  ⚠ skipped {}: {}", file, reason));
                self.pb.set_message(self.label());
            }
            Progress::Halted { file, reason } => {
                self.halted = true;
                self.pb.println(format!("  ✗ halted at {}: {}", file, reason));
                self.pb.abandon_with_message(format!("{} halted", self.phase));
            }
            Progress::TaskFinish => {
                if !self.pb.is_finished() {
                    self.pb.finish();
                }
            }
            Progress::PhaseFinish => {
                self.pb.disable_steady_tick();
                if self.halted {
                    return;
                }
                if self.skipped == 0 {
                    self.pb.finish_with_message("✓ Done");
                } else {
                    self.pb
                        .finish_with_message(format!("✓ Done, {} skipped", self.skipped));
                }
            }
        }
    }
}

/// Renders workflow progress on stderr, keeping a running count of skipped files.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState {
                pb,
                phase: "",
                skipped: 0,
                halted: false,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            state.apply(progress);
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<32} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key(
            "eta",
            |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            },
        )
        .progress_chars("##-")
}
