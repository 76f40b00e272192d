//! Terminal progress bars for reading and inserting.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BYTES_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {msg}";

const RECORDS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// Bar tracking bytes read from a file of `len` bytes.
#[must_use]
pub fn byte_bar(len: u64, message: &str) -> ProgressBar {
    styled(len, BYTES_TEMPLATE, message)
}

/// Bar tracking records inserted out of `len`.
#[must_use]
pub fn record_bar(len: u64, message: &str) -> ProgressBar {
    styled(len, RECORDS_TEMPLATE, message)
}

fn styled(len: u64, template: &str, message: &str) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar
}
