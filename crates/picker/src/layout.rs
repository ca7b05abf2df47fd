//! Height computation for the full-screen-capable backends.
//!
//! Menus should be tall enough to show every item plus their chrome, but
//! never taller than the terminal and never squashed into a couple of rows.

/// Smallest height worth drawing a list in.
pub const MIN_HEIGHT: usize = 8;

/// Rows fzf uses besides the items: prompt line and match counter.
pub const FZF_CHROME: usize = 2;

/// Rows gum uses besides the list: the blank line under the header.
pub const GUM_CHROME: usize = 1;

/// Rows assumed when the terminal size cannot be read.
pub const FALLBACK_ROWS: usize = 24;

/// Visible rows of the controlling terminal.
pub fn terminal_rows() -> usize {
    let term = console::Term::stderr();
    match term.size_checked() {
        Some((rows, _)) if rows > 0 => usize::from(rows),
        _ => FALLBACK_ROWS,
    }
}

/// Total `--height` for fzf: items, header and chrome, within the terminal.
pub fn fzf_height(terminal_rows: usize, items: usize, header_lines: usize) -> usize {
    fit(items + header_lines + FZF_CHROME, MIN_HEIGHT, terminal_rows)
}

/// List `--height` for gum choose: the rows left for items once the header
/// and chrome are drawn.
pub fn gum_height(terminal_rows: usize, items: usize, header_lines: usize) -> usize {
    let available = terminal_rows.saturating_sub(header_lines + GUM_CHROME);
    let min = MIN_HEIGHT.saturating_sub(header_lines + GUM_CHROME);
    fit(items, min, available)
}

/// `wanted`, raised to `min`, capped to `available`, and at least one row.
fn fit(wanted: usize, min: usize, available: usize) -> usize {
    wanted.max(min).min(available).max(1)
}
