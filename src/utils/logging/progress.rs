//! Download progress, using the indicatif crate.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner layout: elapsed time, then the message
pub const DOWNLOAD_SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Spinner for a download of unknown size, ticking in the background
///
/// # Arguments
/// * `message` - Optional message shown next to the spinner
///
/// # Returns
/// A running `ProgressBar`; stop it with [`finish_and_clear`]
#[must_use]
pub fn create_spinner(message: Option<&str>) -> ProgressBar {
    let style = ProgressStyle::with_template(DOWNLOAD_SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let spinner = ProgressBar::new_spinner().with_style(style);
    if let Some(message) = message {
        spinner.set_message(message.to_string());
    }
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}

/// Stop the spinner and erase its line
pub fn finish_and_clear(spinner: &ProgressBar) {
    spinner.finish_and_clear();
}
