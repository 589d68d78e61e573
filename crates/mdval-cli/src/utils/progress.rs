use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use mdvalidate::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Drives an `indicatif` spinner (single evaluations) or bar (suites) from core
/// progress events.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            let in_suite = pb_guard.length().unwrap_or(0) > 0;

            match progress {
                Progress::SuiteStart { total_cases } => {
                    pb_guard.reset();
                    pb_guard.set_length(total_cases);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::EvaluationStart { engine, label } => {
                    if !in_suite {
                        pb_guard.reset();
                        pb_guard.set_style(Self::spinner_style());
                        pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    }
                    pb_guard.set_message(format!("{} [{}]", label, engine));
                }
                Progress::StepStart { step } => {
                    let current = pb_guard.message();
                    let label = current.split(" - ").next().unwrap_or_default().to_string();
                    pb_guard.set_message(format!("{} - {}", label, step));
                }
                Progress::EvaluationFinish => {
                    if !in_suite {
                        pb_guard.disable_steady_tick();
                        pb_guard.finish_with_message("✓ Done");
                    }
                }
                Progress::CaseFinish { name, passed } => {
                    let mark = if passed { "✓" } else { "✗" };
                    pb_guard.println(format!("  {} {}", mark, name));
                    pb_guard.inc(1);
                    if pb_guard.position() >= pb_guard.length().unwrap_or(0) {
                        pb_guard.disable_steady_tick();
                        pb_guard.finish_and_clear();
                    }
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
