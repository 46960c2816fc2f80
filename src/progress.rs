//! Terminal progress bars for downloads and the Fabric installer.
//!
//! Bars draw to stderr and stay hidden when it is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BYTES_TEMPLATE: &str =
    "{msg:.blue.bold} [{wide_bar:.blue}] {bytes}/{total_bytes} {bytes_per_sec} ({eta})";
const SPINNER_TEMPLATE: &str = "{spinner:.blue} {msg:.blue.bold}";

/// A byte counter for one or more downloads. Each download grows the length
/// by its `Content-Length` once the server answers.
pub fn download_bar(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new(0).with_message(message.into());
    if let Ok(style) = ProgressStyle::with_template(BYTES_TEMPLATE) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

/// A spinner for work of unknown length.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message.into());
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
