//! Terminal styling for run output.
//!
//! Everything goes through the `log` facade so the same lines reach the
//! terminal and the log file. Styling uses `console`, which disables colors
//! automatically when the output is not a terminal or `NO_COLOR` is set.

use console::style;
use log::info;

/// Width of the label column in status lines.
const LABEL_WIDTH: usize = 18;

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("");
    info!("===== {} =====", style(title.to_uppercase()).cyan());
    info!("");
}

/// Print a processing step (one per source item)
pub fn print_processing(message: &str) {
    info!("");
    info!("  » {}", style(message).bold());
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let padding = LABEL_WIDTH.saturating_sub(label.chars().count()).max(1);
    if highlight {
        info!("      {}:{}{}", label, " ".repeat(padding), style(value).bold());
    } else {
        info!("      {}:{}{}", label, " ".repeat(padding), value);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    info!("    ✓ {}", style(message).green());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    info!("    ⚠ {}", style(message).yellow());
}

/// Print an error message
pub fn print_error(title: &str, message: &str) {
    info!("    ✗ {}: {}", style(title).red().bold(), message);
}
