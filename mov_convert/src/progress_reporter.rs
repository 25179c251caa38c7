//! Completion-fraction sinks.

use indicatif::ProgressBar;
use shared_utils::progress::{create_percent_bar, fraction_to_percent};

/// Receives the batch completion fraction (0.0..=1.0) after every job.
///
/// Calls are synchronous: each update is delivered before the next job starts.
pub trait ProgressReporter {
    fn update(&mut self, fraction: f64);
}

impl<F: FnMut(f64)> ProgressReporter for F {
    fn update(&mut self, fraction: f64) {
        self(fraction)
    }
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn update(&mut self, _fraction: f64) {}
}

/// Terminal progress bar on stderr.
pub struct ConsoleReporter {
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new(prefix: &str) -> Self {
        let bar = create_percent_bar(prefix);
        bar.set_message("converting");
        Self { bar }
    }

    pub fn from_bar(bar: ProgressBar) -> Self {
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for ConsoleReporter {
    fn update(&mut self, fraction: f64) {
        self.bar.set_position(fraction_to_percent(fraction));
        if fraction >= 1.0 {
            self.bar.set_message("done");
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
