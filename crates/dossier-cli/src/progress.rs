//! Stderr progress for long-running pipeline commands.
//!
//! Extraction gets a bar over its settled units; single completions (stage,
//! risk, verify, reanalyze, agent) get a spinner. Nothing draws when
//! `ui::prefs().progress` is off, so piped JSON output is never interleaved.

use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::ui;

const UNIT_TEMPLATE: &str = "{bar:30.cyan/blue} {pos}/{len} units {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg} ({elapsed})";

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

/// Handle to an optional bar or spinner. Every method is a no-op when
/// progress is disabled.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Spinner for one model round trip.
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    /// Bar over `total` extraction units.
    #[must_use]
    pub fn units(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template(UNIT_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    /// Record that `settled` units have finished and show the running
    /// strong-criterion count from the latest snapshot.
    pub fn settle_units(&self, settled: u64, strong: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(settled);
            bar.set_message(format!("{strong} strong"));
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }

    #[cfg(test)]
    fn is_drawing(&self) -> bool {
        self.bar.is_some()
    }
}
