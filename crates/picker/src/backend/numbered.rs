//! Numbered-prompt backend.
//!
//! Works on any terminal: the items are printed with numbers and the user
//! types one. Labels that already carry an `N) ` prefix have it replaced by
//! the chooser's own numbering, except a `0) ` item (usually "Quit"), which is
//! shown as-is and chosen by typing `0`.
//!
//! Stdin is read on a helper thread so that Ctrl-C (see [`crate::interrupt`])
//! can cancel a prompt that is still waiting for a line.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;

use super::{Backend, BackendKind};
use crate::error::Result;
use crate::{Pick, Prompt, interrupt};

const ZERO_PREFIX: &str = "0) ";

/// How often a waiting prompt checks for an interrupt.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

static STDIN: OnceLock<Mutex<LineReader>> = OnceLock::new();

/// Numbered fallback reading stdin and drawing on stderr.
#[derive(Debug, Clone, Default)]
pub struct NumberedBackend;

impl NumberedBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for NumberedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Numbered
    }

    fn is_available(&self) -> bool {
        true
    }

    fn pick(&self, prompt: &Prompt, items: &[String]) -> Result<Pick> {
        interrupt::clear();
        let mut reader = stdin_reader()?
            .lock()
            .map_err(|_| io::Error::other("stdin reader poisoned"))?;
        let mut output = io::stderr();
        choose_with(
            || reader.next_line(interrupt::take),
            &mut output,
            prompt,
            items,
        )
    }
}

fn stdin_reader() -> io::Result<&'static Mutex<LineReader>> {
    if let Some(reader) = STDIN.get() {
        return Ok(reader);
    }
    let reader = LineReader::spawn(|buf| io::stdin().read_line(buf))?;
    Ok(STDIN.get_or_init(|| Mutex::new(reader)))
}

/// What one read from the user produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A line, including its newline
    Line(String),
    /// Input is closed
    Eof,
    /// Ctrl-C while waiting
    Interrupted,
}

/// Line reader running on its own thread, one line per request.
///
/// A request abandoned by an interrupt stays outstanding, and the line it
/// eventually produces goes to the next caller instead of being lost.
struct LineReader {
    requests: Sender<()>,
    lines: Receiver<io::Result<Option<String>>>,
    pending: bool,
}

impl LineReader {
    fn spawn<F>(mut read_line: F) -> io::Result<Self>
    where
        F: FnMut(&mut String) -> io::Result<usize> + Send + 'static,
    {
        let (requests, wanted) = mpsc::channel::<()>();
        let (sender, lines) = mpsc::channel();
        thread::Builder::new()
            .name("picker-input".to_string())
            .spawn(move || {
                for () in wanted {
                    let mut line = String::new();
                    let result = read_line(&mut line).map(|n| (n > 0).then_some(line));
                    if sender.send(result).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            requests,
            lines,
            pending: false,
        })
    }

    /// Wait for the next line, giving up when `interrupted` returns true.
    fn next_line(&mut self, interrupted: impl Fn() -> bool) -> io::Result<Answer> {
        if !self.pending {
            self.requests
                .send(())
                .map_err(|_| io::Error::other("input reader stopped"))?;
            self.pending = true;
        }
        loop {
            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(result) => {
                    self.pending = false;
                    return Ok(result?.map_or(Answer::Eof, Answer::Line));
                }
                Err(RecvTimeoutError::Timeout) => {
                    if interrupted() {
                        return Ok(Answer::Interrupted);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.pending = false;
                    return Ok(Answer::Eof);
                }
            }
        }
    }
}

/// One line of the numbered menu.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// What the user types
    key: usize,
    /// What is printed
    display: String,
    /// Position in the caller's items
    index: usize,
}

fn entries(items: &[String]) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(items.len());
    let mut next = 1;
    let mut zero_taken = false;

    for (index, item) in items.iter().enumerate() {
        if !zero_taken && item.starts_with(ZERO_PREFIX) {
            zero_taken = true;
            entries.push(Entry {
                key: 0,
                display: item.clone(),
                index,
            });
        } else {
            entries.push(Entry {
                key: next,
                display: format!("{next}) {}", strip_number_prefix(item)),
                index,
            });
            next += 1;
        }
    }
    entries
}

/// Remove a leading `"12) "` from a label.
pub fn strip_number_prefix(label: &str) -> &str {
    match label.split_once(") ") {
        Some((number, rest)) if !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) => {
            rest
        }
        _ => label,
    }
}

/// Run the numbered prompt over arbitrary input/output streams.
///
/// Invalid or blank answers re-prompt; end of input cancels.
pub fn choose<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &Prompt,
    items: &[String],
) -> Result<Pick> {
    choose_with(
        || {
            let mut line = String::new();
            Ok(if input.read_line(&mut line)? == 0 {
                Answer::Eof
            } else {
                Answer::Line(line)
            })
        },
        output,
        prompt,
        items,
    )
}

/// [`choose`] over any source of answers.
///
/// End of input and interrupts both cancel.
pub fn choose_with<W: Write>(
    mut next_answer: impl FnMut() -> io::Result<Answer>,
    output: &mut W,
    prompt: &Prompt,
    items: &[String],
) -> Result<Pick> {
    let entries = entries(items);
    let highest = entries.iter().map(|e| e.key).max().unwrap_or(0);
    let lowest = if entries.iter().any(|e| e.key == 0) { 0 } else { 1 };

    writeln!(output)?;
    if !prompt.header.is_empty() {
        writeln!(output, "{}", prompt.header)?;
    }
    for entry in &entries {
        writeln!(output, "  {}", entry.display)?;
    }

    loop {
        write!(output, "{} [{lowest}-{highest}]: ", prompt.line)?;
        output.flush()?;

        let answer = match next_answer()? {
            Answer::Line(line) => line,
            Answer::Eof | Answer::Interrupted => {
                writeln!(output)?;
                return Ok(Pick::Cancelled);
            }
        };

        let answer = answer.trim();
        if answer.is_empty() {
            continue;
        }

        let chosen = answer
            .parse::<usize>()
            .ok()
            .and_then(|key| entries.iter().find(|e| e.key == key));
        match chosen {
            Some(entry) => return Ok(Pick::Chosen(entry.index)),
            None => writeln!(output, "Invalid choice: {answer}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn labels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn run(answers: &str, items: &[String]) -> (Pick, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let prompt = Prompt::new("Remotes", "Select");
        let pick = choose(&mut input, &mut output, &prompt, items).unwrap();
        (pick, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_zero_selects_quit_item() {
        let items = labels(&["1) Foo", "2) Bar", "0) Quit"]);
        let (pick, _) = run("0\n", &items);
        assert_eq!(pick.label(&items), Some("0) Quit"));
    }

    #[test]
    fn test_number_returns_original_label() {
        let items = labels(&["1) Foo", "2) Bar", "0) Quit"]);
        let (pick, _) = run("2\n", &items);
        assert_eq!(pick, Pick::Chosen(1));
        assert_eq!(pick.label(&items), Some("2) Bar"));
    }

    #[test]
    fn test_display_renumbers_and_keeps_quit() {
        let items = labels(&["0) Quit", "7) Foo", "Bar"]);
        let (_, screen) = run("\n", &items);
        assert!(screen.contains("  0) Quit\n"));
        assert!(screen.contains("  1) Foo\n"));
        assert!(screen.contains("  2) Bar\n"));
        assert!(!screen.contains("7)"));
    }

    #[test]
    fn test_positional_mapping_after_quit() {
        let items = labels(&["0) Quit", "3) Foo", "9) Bar"]);
        let (pick, _) = run("2\n", &items);
        assert_eq!(pick.label(&items), Some("9) Bar"));
    }

    #[test]
    fn test_invalid_answers_reprompt() {
        let items = labels(&["1) Foo", "2) Bar"]);
        let (pick, screen) = run("abc\n\n9\n0\n1\n", &items);
        assert_eq!(pick, Pick::Chosen(0));
        assert!(screen.contains("Invalid choice: abc"));
        assert!(screen.contains("Invalid choice: 9"));
        // no quit item, so 0 is not a valid answer
        assert!(screen.contains("Invalid choice: 0"));
    }

    #[test]
    fn test_end_of_input_cancels() {
        let items = labels(&["1) Foo"]);
        assert_eq!(run("", &items).0, Pick::Cancelled);
        assert_eq!(run("nope\n", &items).0, Pick::Cancelled);
    }

    #[test]
    fn test_range_starts_at_one_without_quit_item() {
        let (_, screen) = run("", &labels(&["1) Foo", "2) Bar"]));
        assert!(screen.contains("Select [1-2]: "));

        let (_, screen) = run("", &labels(&["1) Foo", "0) Quit"]));
        assert!(screen.contains("Select [0-1]: "));
    }

    #[test]
    fn test_interrupt_cancels_prompt() {
        let items = labels(&["1) Foo", "0) Quit"]);
        let mut answers = vec![Answer::Interrupted, Answer::Line("x\n".to_string())];
        let mut output = Vec::new();
        let pick = choose_with(
            || Ok(answers.pop().unwrap_or(Answer::Eof)),
            &mut output,
            &Prompt::new("Remotes", "Select"),
            &items,
        )
        .unwrap();
        assert_eq!(pick, Pick::Cancelled);
        assert!(String::from_utf8(output).unwrap().contains("Invalid choice: x"));
    }

    #[test]
    fn test_interrupted_read_keeps_late_line() {
        let (rx, mut tx) = io::pipe().unwrap();
        let mut rx = io::BufReader::new(rx);
        let mut reader = LineReader::spawn(move |buf| rx.read_line(buf)).unwrap();

        assert_eq!(reader.next_line(|| true).unwrap(), Answer::Interrupted);

        tx.write_all(b"3\n").unwrap();
        assert_eq!(reader.next_line(|| false).unwrap(), Answer::Line("3\n".to_string()));

        drop(tx);
        assert_eq!(reader.next_line(|| false).unwrap(), Answer::Eof);
    }

    #[test]
    fn test_strip_number_prefix() {
        assert_eq!(strip_number_prefix("12) gdrive"), "gdrive");
        assert_eq!(strip_number_prefix("gdrive"), "gdrive");
        assert_eq!(strip_number_prefix("s) Sort"), "s) Sort");
        assert_eq!(strip_number_prefix(") x"), ") x");
    }
}
