//! Terminal progress for the analysis stages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use phonoscope_analysis::{AnalysisObserver, Stage};

/// Spinner on stderr that follows the pipeline stages.
///
/// Stages run concurrently, so the message reports how many have finished
/// rather than which one is running.
pub struct StageSpinner {
    bar: ProgressBar,
    finished: AtomicUsize,
}

impl StageSpinner {
    /// Start spinning; indicatif hides the bar when stderr is not a terminal.
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message("analyzing");
        Self {
            bar,
            finished: AtomicUsize::new(0),
        }
    }

    /// Replace the message
    pub fn set_message(&self, msg: &'static str) {
        self.bar.set_message(msg);
    }

    /// Remove the spinner from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl AnalysisObserver for StageSpinner {
    fn stage_started(&self, stage: Stage) {
        tracing::trace!(%stage, "stage started");
    }

    fn stage_finished(&self, stage: Stage, elapsed: Duration) {
        let done = self.finished.fetch_add(1, Ordering::Relaxed) + 1;
        self.bar.set_message(format!(
            "analyzing: {done}/{} stages ({stage} took {:.0} ms)",
            Stage::ALL.len(),
            elapsed.as_secs_f64() * 1e3
        ));
    }
}
