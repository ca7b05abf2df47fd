//! Interactive menu.
//!
//! Two screens: the remote list and the per-remote action list.
//!
//! ```text
//! ListRemotes ──remote──▶ RemoteActions ──back/cancel──▶ ListRemotes
//!     │  ▲                     │
//!     │  └─sort/refresh        └──quit──▶ exit
//!     └──quit/cancel──▶ exit
//! ```

use anyhow::{Context, Result};
use capcache::{CapacityRecord, CapacityStore, SortMode, sort_remotes};
use picker::{Pick, Picker, Prompt};

use crate::commands::actions::{self, Outcome, RemoteAction};
use crate::commands::refresh;
use crate::config::Config;
use crate::rclone::{DEDUPE_TYPE, Rclone};
use crate::ui;

/// Widest remote name column in the list.
const MAX_NAME_WIDTH: usize = 32;

/// Starts the background capacity refresh.
type Launcher = fn(&[String]) -> Result<()>;

/// Entries of the remote list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ListEntry {
    Remote(String),
    Sort(SortMode),
    Refresh,
    Quit,
}

/// Where the remote list sends the user next.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Next {
    Remote(String),
    Again,
    Exit,
}

/// Whether the action screen returns to the list or ends the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Run the interactive menu until the user quits.
pub fn run(config: &Config) -> Result<()> {
    let rclone = Rclone::locate(&config.rclone)?;
    if let Err(e) = picker::interrupt::install() {
        log::warn!("Ctrl-C will exit instead of going back: {e}");
    }
    let picker = Picker::new(&config.picker);
    if let Some(backend) = picker.active() {
        log::info!("Using {} picker", backend.kind());
    }
    Session::new(config.clone(), rclone, picker, refresh::spawn_background).run()
}

/// State of one interactive run.
struct Session {
    config: Config,
    rclone: Rclone,
    picker: Picker,
    sort_mode: SortMode,
    /// Live remote listing, dropped by "refresh"
    remotes: Option<Vec<String>>,
    refresh_launched: bool,
    launcher: Launcher,
}

impl Session {
    fn new(config: Config, rclone: Rclone, picker: Picker, launcher: Launcher) -> Self {
        Self {
            config,
            rclone,
            picker,
            sort_mode: SortMode::default(),
            remotes: None,
            refresh_launched: false,
            launcher,
        }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            match self.list_remotes()? {
                Next::Remote(name) => {
                    if self.remote_actions(&name)? == Flow::Exit {
                        return Ok(());
                    }
                }
                Next::Again => {}
                Next::Exit => return Ok(()),
            }
        }
    }

    fn load_cache(&self) -> CapacityStore {
        CapacityStore::load(&self.config.cache_file).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable capacity cache: {e}");
            CapacityStore::new()
        })
    }

    fn live_remotes(&mut self) -> Vec<String> {
        if let Some(remotes) = &self.remotes {
            return remotes.clone();
        }
        match self.rclone.list_remotes() {
            Ok(remotes) => {
                self.remotes = Some(remotes.clone());
                remotes
            }
            Err(e) => {
                ui::error(&format!("{e:#}"));
                Vec::new()
            }
        }
    }

    fn launch_refresh_once(&mut self, remotes: &[String]) {
        if self.refresh_launched {
            return;
        }
        self.refresh_launched = true;
        if let Err(e) = (self.launcher)(remotes) {
            log::debug!("Background refresh not started: {e:#}");
        }
    }

    fn list_remotes(&mut self) -> Result<Next> {
        let store = self.load_cache();
        let remotes = self.live_remotes();
        if remotes.is_empty() {
            ui::warn("No remotes configured. Run 'rclone config' to add one.");
            return Ok(Next::Exit);
        }
        self.launch_refresh_once(&remotes);

        let sorted = sort_remotes(&remotes, self.sort_mode, &store);
        let entries = list_entries(sorted, self.sort_mode);
        let labels = list_labels(&entries, &store);
        let prompt = Prompt::new(
            format!(
                "rclone remotes ({}), sorted by {}",
                remotes.len(),
                self.sort_mode.description()
            ),
            "Select remote:",
        );

        let index = match self.pick(&prompt, &labels)? {
            Pick::Cancelled => return Ok(Next::Exit),
            Pick::Chosen(i) => i,
        };
        let entry = entries
            .get(index)
            .cloned()
            .with_context(|| format!("Selection {index} has no menu entry"))?;

        Ok(match entry {
            ListEntry::Remote(name) => Next::Remote(name),
            ListEntry::Sort(mode) => {
                self.sort_mode = mode;
                Next::Again
            }
            ListEntry::Refresh => {
                self.remotes = None;
                Next::Again
            }
            ListEntry::Quit => Next::Exit,
        })
    }

    fn remote_actions(&mut self, remote: &str) -> Result<Flow> {
        let supports_dedupe = match self.rclone.remote_type(remote) {
            Ok(kind) => kind.as_deref() == Some(DEDUPE_TYPE),
            Err(e) => {
                log::debug!("Could not read type of {remote}: {e:#}");
                false
            }
        };
        let actions = RemoteAction::menu(supports_dedupe);
        let labels = numbered_labels(&actions, |a| *a == RemoteAction::Quit, |a| a.title().to_string());

        loop {
            let store = self.load_cache();
            let prompt = Prompt::new(remote_header(remote, store.get(remote)), "Choose action:");

            let index = match self.pick(&prompt, &labels)? {
                Pick::Cancelled => return Ok(Flow::Continue),
                Pick::Chosen(i) => i,
            };
            let action = *actions
                .get(index)
                .with_context(|| format!("Selection {index} has no menu entry"))?;

            match action {
                RemoteAction::Back => return Ok(Flow::Continue),
                RemoteAction::Quit => return Ok(Flow::Exit),
                _ => self.run_action(action, remote),
            }
        }
    }

    /// Pick from `labels`. A picker program that breaks is reported and
    /// treated as a cancel; a selection that maps to nothing is fatal.
    fn pick(&self, prompt: &Prompt, labels: &[String]) -> Result<Pick> {
        match self.picker.pick(prompt, labels) {
            Ok(pick) => {
                log::debug!("Picked {:?}", pick.label(labels));
                Ok(pick)
            }
            Err(e) if e.is_internal() => Err(e).context("Menu selection failed"),
            Err(e) => {
                ui::error(&format!("Picker failed: {e}"));
                Ok(Pick::Cancelled)
            }
        }
    }

    fn run_action(&self, action: RemoteAction, remote: &str) {
        match actions::dispatch(action, remote, &self.rclone, &self.config.mount_helper) {
            Ok(Outcome::Done) => {
                if action.pauses_after() {
                    ui::success(&format!("{}: done", action.title()));
                    ui::pause();
                }
            }
            Ok(Outcome::Skipped) => ui::info("Skipped."),
            Err(e) => {
                ui::error(&format!("{} failed: {e:#}", action.title()));
                ui::pause();
            }
        }
    }
}

fn list_entries(sorted: Vec<String>, current: SortMode) -> Vec<ListEntry> {
    let mut entries: Vec<ListEntry> = sorted.into_iter().map(ListEntry::Remote).collect();
    entries.extend(
        SortMode::ALL
            .into_iter()
            .filter(|mode| *mode != current)
            .map(ListEntry::Sort),
    );
    entries.push(ListEntry::Refresh);
    entries.push(ListEntry::Quit);
    entries
}

fn list_labels(entries: &[ListEntry], store: &CapacityStore) -> Vec<String> {
    let width = entries
        .iter()
        .filter_map(|e| match e {
            ListEntry::Remote(name) => Some(name.chars().count()),
            _ => None,
        })
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);

    numbered_labels(
        entries,
        |e| *e == ListEntry::Quit,
        |e| match e {
            ListEntry::Remote(name) => format!(
                "{}  {}",
                ui::fit(name, width),
                capacity_summary(store.get(name))
            ),
            ListEntry::Sort(mode) => format!("Sort by {}", mode.description()),
            ListEntry::Refresh => "Refresh remote list".to_string(),
            ListEntry::Quit => "Quit".to_string(),
        },
    )
}

/// Number entries `1) ..`, `2) ..` in order, with the quit entry as `0) ..`.
fn numbered_labels<T>(
    entries: &[T],
    is_quit: impl Fn(&T) -> bool,
    title: impl Fn(&T) -> String,
) -> Vec<String> {
    let mut next = 1;
    entries
        .iter()
        .map(|entry| {
            if is_quit(entry) {
                format!("0) {}", title(entry))
            } else {
                let label = format!("{next}) {}", title(entry));
                next += 1;
                label
            }
        })
        .collect()
}

fn capacity_summary(record: Option<&CapacityRecord>) -> String {
    match record {
        Some(r) if !(r.free.is_empty() && r.total.is_empty()) => format!(
            "{} free of {}",
            if r.free.is_empty() { "?" } else { r.free.as_str() },
            if r.total.is_empty() { "?" } else { r.total.as_str() }
        ),
        _ => "capacity unknown".to_string(),
    }
}

fn remote_header(remote: &str, record: Option<&CapacityRecord>) -> String {
    match record {
        Some(r) if !r.used.is_empty() => {
            format!("{remote}: {}, {} used", capacity_summary(record), r.used)
        }
        _ => format!("{remote}: {}", capacity_summary(record)),
    }
}
