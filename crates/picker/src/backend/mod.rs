//! Picker backends.
//!
//! Each backend implements the same contract: show a prompt and a list of
//! labels, return the index of the chosen label or report cancellation.
//! [`crate::Picker`] tries them in rank order and uses the first available.

use std::fmt;
use std::process::Output;

use crate::error::{Error, Result};
use crate::{Pick, Prompt};

pub mod fzf;
pub mod gum;
pub mod numbered;

/// Exit status fzf and gum use for Ctrl-C / Esc.
pub(crate) const EXIT_INTERRUPTED: i32 = 130;

/// The kinds of backend, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// fzf: type-ahead filtering, wrap-around navigation
    Fuzzy,
    /// gum choose: cursor list, no wrap-around
    Chooser,
    /// Numbered prompt on plain stdin/stderr
    Numbered,
}

impl BackendKind {
    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Fuzzy => "fzf",
            BackendKind::Chooser => "gum",
            BackendKind::Numbered => "numbered",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend trait for interactive selection.
///
/// Callers guarantee `items` is non-empty and holds distinct labels.
pub trait Backend: Send + Sync {
    /// Which kind of backend this is.
    fn kind(&self) -> BackendKind;

    /// Whether this backend can run in the current environment.
    fn is_available(&self) -> bool;

    /// Ask the user to choose one of `items`.
    fn pick(&self, prompt: &Prompt, items: &[String]) -> Result<Pick>;
}

/// Map a line printed by an external picker back to an item index.
pub(crate) fn match_selection(items: &[String], selected: &str) -> Result<Pick> {
    let selected = selected.trim_end_matches(['\n', '\r']);
    if selected.trim().is_empty() {
        return Ok(Pick::Cancelled);
    }

    items
        .iter()
        .position(|item| item == selected)
        .or_else(|| items.iter().position(|item| item.trim() == selected.trim()))
        .map(Pick::Chosen)
        .ok_or_else(|| Error::UnknownSelection(selected.to_string()))
}

/// Interpret the exit status and stdout of an external picker.
pub(crate) fn interpret_output(
    program: &'static str,
    output: &Output,
    items: &[String],
) -> Result<Pick> {
    match output.status.code() {
        Some(0) => match_selection(items, &String::from_utf8_lossy(&output.stdout)),
        // 1: fzf "no match", gum "aborted"
        Some(1) | Some(EXIT_INTERRUPTED) | None => Ok(Pick::Cancelled),
        Some(code) => Err(Error::Backend { program, code }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<String> {
        vec!["1) gdrive".to_string(), "2) b2".to_string(), "0) Quit".to_string()]
    }

    #[test]
    fn test_match_selection_verbatim() {
        assert_eq!(match_selection(&items(), "2) b2\n").unwrap(), Pick::Chosen(1));
        assert_eq!(match_selection(&items(), "0) Quit").unwrap(), Pick::Chosen(2));
    }

    #[test]
    fn test_match_selection_empty_is_cancel() {
        assert_eq!(match_selection(&items(), "").unwrap(), Pick::Cancelled);
        assert_eq!(match_selection(&items(), "\n").unwrap(), Pick::Cancelled);
    }

    #[test]
    fn test_match_selection_unknown() {
        let err = match_selection(&items(), "3) s3").unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(BackendKind::Fuzzy.to_string(), "fzf");
        assert_eq!(BackendKind::Chooser.to_string(), "gum");
        assert_eq!(BackendKind::Numbered.to_string(), "numbered");
    }
}
