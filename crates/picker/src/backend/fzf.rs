//! fzf backend.

use std::io::Write;
use std::process::{Command, Stdio};

use super::{Backend, BackendKind, interpret_output};
use crate::error::{Error, Result};
use crate::layout;
use crate::{Pick, Prompt};

const PROGRAM: &str = "fzf";

/// Fuzzy-search list picker backed by `fzf`.
///
/// Reverse layout with the first item highlighted, type-ahead filtering and
/// wrap-around navigation (`--cycle`).
#[derive(Debug, Clone, Default)]
pub struct FzfBackend;

impl FzfBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }

    /// Arguments passed to fzf for a prompt and terminal height.
    pub fn args(prompt: &Prompt, items: usize, terminal_rows: usize) -> Vec<String> {
        let height = layout::fzf_height(terminal_rows, items, prompt.header_lines());
        vec![
            "--reverse".to_string(),
            "--cycle".to_string(),
            "--no-sort".to_string(),
            "--no-multi".to_string(),
            format!("--height={height}"),
            format!("--header={}", prompt.header),
            format!("--prompt={} ", prompt.line),
        ]
    }
}

impl Backend for FzfBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fuzzy
    }

    fn is_available(&self) -> bool {
        which::which(PROGRAM).is_ok()
    }

    fn pick(&self, prompt: &Prompt, items: &[String]) -> Result<Pick> {
        let args = Self::args(prompt, items.len(), layout::terminal_rows());
        log::debug!("Running {PROGRAM} {}", args.join(" "));

        let mut child = Command::new(PROGRAM)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: PROGRAM,
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut input = items.join("\n");
            input.push('\n');
            // fzf may exit before reading everything (Esc right away)
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                log::debug!("{PROGRAM} closed stdin early: {e}");
            }
        }

        let output = child.wait_with_output()?;
        interpret_output(PROGRAM, &output, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_layout() {
        let prompt = Prompt::new("Remotes\nsorted by name", "Select remote:");
        let args = FzfBackend::args(&prompt, 12, 40);

        assert!(args.contains(&"--reverse".to_string()));
        assert!(args.contains(&"--cycle".to_string()));
        assert!(args.contains(&"--height=16".to_string()));
        assert!(args.contains(&"--header=Remotes\nsorted by name".to_string()));
        assert!(args.contains(&"--prompt=Select remote: ".to_string()));
    }

    #[test]
    fn test_args_height_clamped() {
        let prompt = Prompt::new("Remotes", "Select:");
        let args = FzfBackend::args(&prompt, 500, 30);
        assert!(args.contains(&"--height=30".to_string()));
    }
}
