use colored::Colorize;
use console::Term;

// Everything goes to stderr: stdout belongs to `list` output and to the
// picker programs.

/// Print an info message
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Wait for a key press so output stays on screen before the next menu.
pub fn pause() {
    let term = Term::stderr();
    if !term.is_term() {
        return;
    }
    eprint!("{}", "Press any key to continue...".dimmed());
    if let Err(e) = term.read_key() {
        log::debug!("Failed to read key: {e}");
    }
    eprintln!();
}

/// Pad or cut `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text:<width$}")
    } else if width <= 1 {
        "…".chars().take(width).collect()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_short_text() {
        assert_eq!(fit("b2", 5), "b2   ");
        assert_eq!(fit("exact", 5), "exact");
    }

    #[test]
    fn test_fit_truncates_long_text() {
        assert_eq!(fit("onedrive-business", 8), "onedriv…");
        assert_eq!(fit("abc", 1), "…");
        assert_eq!(fit("abc", 0), "");
    }
}
