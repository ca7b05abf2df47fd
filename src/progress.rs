//! Progress indicators for rcmenu CLI.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar counting finished items.
pub fn bar(len: usize, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message(msg.to_string());
    pb
}

/// Remove the bar from the terminal.
pub fn finish_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
