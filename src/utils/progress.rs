//! Progress indicators for CLI mode
//!
//! Progress display using indicatif and console.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress tracker for a validation run
///
/// Every method takes `&self` so the tracker can be shared with the event
/// callback handed to the orchestrator.
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    /// Create a tracker that starts as a spinner until the test count is known
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Switch to a bar once the number of tests is known
    pub fn start_tests(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
    }

    /// Update the current message
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Print a line above the bar without advancing it
    pub fn println(&self, message: &str) {
        self.bar.println(message);
    }

    /// Mark a test as complete with a status line
    pub fn complete_test(&self, message: &str) {
        self.bar.println(message);
        self.bar.inc(1);
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Format a pass status line
pub fn pass_line(message: &str) -> String {
    format!("  {} {}", style("✓").green(), message)
}

/// Format a fail status line
pub fn fail_line(message: &str) -> String {
    format!("  {} {}", style("✗").red(), message)
}

/// Format a warning status line
pub fn warning_line(message: &str) -> String {
    format!("  {} {}", style("⚠").yellow(), message)
}

/// Format an info status line
pub fn info_line(message: &str) -> String {
    format!("  {} {}", style("ℹ").cyan(), message)
}
