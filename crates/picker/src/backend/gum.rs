//! gum choose backend.

use std::process::{Command, Stdio};

use super::{Backend, BackendKind, interpret_output};
use crate::error::{Error, Result};
use crate::layout;
use crate::{Pick, Prompt};

const PROGRAM: &str = "gum";
const CURSOR: &str = "> ";

/// List chooser backed by `gum choose`.
///
/// Shows a cursor indicator with the first item pre-selected. Navigation
/// stops at the ends of the list.
#[derive(Debug, Clone, Default)]
pub struct GumBackend;

impl GumBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }

    /// Arguments passed to gum for a prompt, items and terminal height.
    pub fn args(prompt: &Prompt, items: &[String], terminal_rows: usize) -> Vec<String> {
        let height = layout::gum_height(terminal_rows, items.len(), prompt.header_lines() + 1);
        let mut args = vec![
            "choose".to_string(),
            format!("--header={}\n{}", prompt.header, prompt.line),
            format!("--height={height}"),
            format!("--cursor={CURSOR}"),
        ];
        if let Some(first) = items.first() {
            args.push(format!("--selected={first}"));
        }
        args.extend(items.iter().cloned());
        args
    }
}

impl Backend for GumBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Chooser
    }

    fn is_available(&self) -> bool {
        which::which(PROGRAM).is_ok()
    }

    fn pick(&self, prompt: &Prompt, items: &[String]) -> Result<Pick> {
        let args = Self::args(prompt, items, layout::terminal_rows());
        log::debug!("Running {PROGRAM} with {} items", items.len());

        let output = Command::new(PROGRAM)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| Error::Spawn {
                program: PROGRAM,
                source,
            })?;

        interpret_output(PROGRAM, &output, items)
    }
}
