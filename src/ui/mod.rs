//! UI/Progress presentation layer
//!
//! This module handles:
//! - Progress reporting for the checkout workflow and problem reports
//! - Interactive progress bars and spinners using indicatif
//! - Marshalling user interaction onto the thread that owns the terminal
//!
//! All progress reporting goes through the [`ProgressReporter`] trait, so
//! commands pick an implementation based on flags and tests can count units.

pub mod interaction;
pub mod prompts;

use indicatif::{ProgressBar, ProgressStyle};

pub use interaction::{Interaction, InteractionProxy, Selection, UiHost, ui_channel};
pub use prompts::TerminalInteraction;

/// Progress reporter for long-running operations
pub trait ProgressReporter: Send {
    /// Start reporting `total` units of work; zero means unknown
    fn begin(&mut self, total: u64);

    /// Describe the unit currently running
    fn set_message(&mut self, message: &str);

    /// Mark one unit as done
    fn inc(&mut self);

    /// All work completed
    fn finish(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with a progress bar or spinner
pub struct InteractiveProgressReporter {
    bar: ProgressBar,
}

impl InteractiveProgressReporter {
    /// Bar with a known length, used once `begin` reports a total
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Spinner for work with no meaningful unit count
    ///
    /// Redrawn only on message changes, so prompts shown in between stay intact.
    pub fn spinner() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { bar }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn begin(&mut self, total: u64) {
        if total == 0 {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        self.bar = ProgressBar::new(total);
        self.bar.set_style(style);
    }

    fn set_message(&mut self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn inc(&mut self) {
        self.bar.inc(1);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.bar.abandon();
    }
}

/// Silent progress reporter for quiet mode and tests
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn begin(&mut self, _total: u64) {}

    fn set_message(&mut self, _message: &str) {}

    fn inc(&mut self) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}
