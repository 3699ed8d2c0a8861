//! Terminal feedback for the two slow stages of a run: waiting on the
//! completion and linking records one by one.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

/// Stage indicator; inert unless progress output is enabled.
pub struct Progress(Option<ProgressBar>);

impl Progress {
    /// Spinner shown while the completion service works on `planned` studies.
    #[must_use]
    pub fn awaiting_completion(planned: usize) -> Self {
        Self::enabled(|| {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_message(format!("Generating {planned} studies..."));
            bar
        })
    }

    /// Counter over the records being linked.
    #[must_use]
    pub fn linking(records: usize) -> Self {
        Self::enabled(|| {
            let bar = ProgressBar::new(records as u64);
            bar.set_style(
                ProgressStyle::with_template("Linking {bar:30.cyan/blue} {pos}/{len} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        })
    }

    fn enabled(build: impl FnOnce() -> ProgressBar) -> Self {
        Self(ui::prefs().progress.then(build))
    }

    /// Show which record is being linked.
    pub fn current(&self, title: &str) {
        if let Some(bar) = &self.0 {
            bar.set_message(title.to_string());
        }
    }

    /// One more record linked.
    pub fn advance(&self) {
        if let Some(bar) = &self.0 {
            bar.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.0 {
            bar.finish_and_clear();
        }
    }

    /// Leave the indicator on screen with `reason`.
    pub fn fail(&self, reason: &str) {
        if let Some(bar) = &self.0 {
            bar.abandon_with_message(reason.to_string());
        }
    }
}
