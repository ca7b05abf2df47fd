//! # picker
//!
//! Choose one of N labels in the terminal, with whatever tooling is around.
//!
//! Backends are tried best-first and the first available one wins:
//! 1. **fzf**: fuzzy type-ahead, reverse layout, wrap-around navigation
//! 2. **gum choose**: cursor list, no wrap-around
//! 3. **numbered prompt**: type a number and press Enter, no dependencies
//!
//! The first two can be switched off with [`PickerOptions`], which is how the
//! fallback chain gets exercised deterministically.
//!
//! Call [`interrupt::install`] once to make Ctrl-C cancel a pick rather than
//! end the process.
//!
//! ## Example
//!
//! ```no_run
//! use picker::{Pick, Picker, PickerOptions, Prompt};
//!
//! let picker = Picker::new(&PickerOptions::default());
//! let items = vec!["1) gdrive".to_string(), "0) Quit".to_string()];
//! match picker.pick(&Prompt::new("Remotes", "Select remote:"), &items) {
//!     Ok(Pick::Chosen(i)) => println!("chose {}", items[i]),
//!     Ok(Pick::Cancelled) => println!("cancelled"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
/// Error types for picker operations.
pub mod error;
pub mod interrupt;
pub mod layout;

pub use backend::{Backend, BackendKind};
pub use error::{Error, Result};

use backend::fzf::FzfBackend;
use backend::gum::GumBackend;
use backend::numbered::NumberedBackend;

/// Two-line prompt shown above the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Context line(s), e.g. the menu title
    pub header: String,
    /// Question asked of the user
    pub line: String,
}

impl Prompt {
    /// Create a prompt.
    pub fn new(header: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            line: line.into(),
        }
    }

    /// Number of lines the header occupies.
    pub fn header_lines(&self) -> usize {
        self.header.lines().count().max(1)
    }
}

/// Outcome of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Index of the chosen item
    Chosen(usize),
    /// The user backed out without choosing
    Cancelled,
}

impl Pick {
    /// The chosen label, verbatim, if any.
    pub fn label(self, items: &[String]) -> Option<&str> {
        match self {
            Pick::Chosen(i) => items.get(i).map(String::as_str),
            Pick::Cancelled => None,
        }
    }
}

/// Which backends may be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickerOptions {
    /// Never use fzf
    pub disable_fuzzy: bool,
    /// Never use gum
    pub disable_chooser: bool,
}

/// Ranked list of backends.
pub struct Picker {
    backends: Vec<Box<dyn Backend>>,
}

impl Picker {
    /// Standard chain, minus the backends `options` disables.
    pub fn new(options: &PickerOptions) -> Self {
        let mut backends: Vec<Box<dyn Backend>> = Vec::new();
        if !options.disable_fuzzy {
            backends.push(Box::new(FzfBackend::new()));
        }
        if !options.disable_chooser {
            backends.push(Box::new(GumBackend::new()));
        }
        backends.push(Box::new(NumberedBackend::new()));
        Self { backends }
    }

    /// Custom chain, best first (useful for testing).
    pub fn with_backends(backends: Vec<Box<dyn Backend>>) -> Self {
        Self { backends }
    }

    /// The backend the next pick would use.
    pub fn active(&self) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|b| b.is_available())
            .map(|b| b.as_ref())
    }

    /// Ask the user to choose one of `items`.
    ///
    /// Fails with [`Error::NoItems`] before touching the terminal when
    /// `items` is empty.
    pub fn pick(&self, prompt: &Prompt, items: &[String]) -> Result<Pick> {
        if items.is_empty() {
            return Err(Error::NoItems);
        }

        let Some(backend) = self.active() else {
            // Only reachable with a custom chain lacking the numbered backend
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "no picker backend available",
            )));
        };
        log::debug!("Picking with {} ({} items)", backend.kind(), items.len());

        let pick = backend.pick(prompt, items)?;
        if let Pick::Chosen(i) = pick
            && i >= items.len()
        {
            return Err(Error::UnknownSelection(format!("index {i}")));
        }
        Ok(pick)
    }
}
