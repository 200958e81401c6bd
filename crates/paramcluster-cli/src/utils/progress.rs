use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use paramcluster::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// One status line reused by every phase: a spinner while a phase prepares,
/// then a bar over its steps (sequence files while ingesting, ordering and
/// type pairs while comparing).
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(Self::spinner_style());
        pb.finish_and_clear();
        Self { pb }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { name } => {
                pb.reset();
                pb.set_length(0);
                pb.set_style(Self::spinner_style());
                pb.set_prefix(name);
                pb.set_message("");
                pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::TaskStart { total_steps } => {
                pb.disable_steady_tick();
                pb.set_style(Self::bar_style());
                pb.set_length(total_steps);
                pb.set_position(0);
            }
            Progress::TaskIncrement => pb.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = pb.length() {
                    pb.set_position(length);
                }
            }
            Progress::InferenceFinished {
                ordering,
                parameter_type,
                passed,
            } => {
                let verdict = if passed { "passed" } else { "failed" };
                pb.set_message(format!("{} / {} {}", ordering, parameter_type, verdict));
            }
            Progress::Message(msg) => pb.println(format!("  {}", msg)),
            Progress::PhaseFinish => {
                pb.disable_steady_tick();
                pb.finish_and_clear();
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix} {msg}")
            .expect("Failed to create spinner style template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:>10} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .expect("Failed to create bar style template")
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramcluster::engine::store::ParameterType;

    fn hidden() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn ingestion_phase_counts_sequence_files() {
        let handler = hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Ingestion" });
        assert_eq!(handler.pb.prefix(), "Ingestion");
        assert!(!handler.pb.is_finished());

        callback(Progress::TaskStart { total_steps: 2 });
        callback(Progress::TaskIncrement);
        assert_eq!(handler.pb.length(), Some(2));
        assert_eq!(handler.pb.position(), 1);

        callback(Progress::TaskFinish);
        assert_eq!(handler.pb.position(), 2);
        callback(Progress::PhaseFinish);
        assert!(handler.pb.is_finished());
    }

    #[test]
    fn comparison_phase_shows_the_latest_verdict() {
        let handler = hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Comparison" });
        callback(Progress::TaskStart { total_steps: 3 });
        callback(Progress::InferenceFinished {
            ordering: "shuffle_1".to_string(),
            parameter_type: ParameterType::Bond,
            passed: false,
        });
        callback(Progress::TaskIncrement);

        assert_eq!(handler.pb.message(), "shuffle_1 / bond failed");
        assert_eq!(handler.pb.position(), 1);
    }

    #[test]
    fn next_phase_restarts_the_bar() {
        let handler = hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Ingestion" });
        callback(Progress::TaskStart { total_steps: 4 });
        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);

        callback(Progress::PhaseStart { name: "Comparison" });
        assert_eq!(handler.pb.prefix(), "Comparison");
        assert_eq!(handler.pb.position(), 0);
        assert_eq!(handler.pb.length(), Some(0));
        assert_eq!(handler.pb.message(), "");
        assert!(!handler.pb.is_finished());
    }
}
