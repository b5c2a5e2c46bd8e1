//! Progress Display
//!
//! Opt-in terminal spinner for the per-cycle progress hook. Nothing is shown
//! unless a [`SpinnerProgress`] is installed on the run context.

use benchtest_core::Progress;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner that shows which unit and cycle is running.
///
/// Clones drive the same spinner, so a caller can keep one to clear it after
/// the run context has taken the other.
#[derive(Debug, Clone)]
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    /// Spinner drawing to stderr
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new_spinner())
    }

    /// Spinner that draws nowhere
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { bar }
    }

    /// Last message shown
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Clear the spinner from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Whether the spinner has been cleared
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for SpinnerProgress {
    fn on_cycle(&mut self, unit: &str, cycle: u64) {
        self.bar
            .set_message(format!("Benchtesting {unit} cycle {cycle} ..."));
        self.bar.tick();
    }
}
