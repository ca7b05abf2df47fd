//! Per-remote actions.
//!
//! Each action is a single blocking external command. Failures are returned
//! to the menu, which reports them and carries on.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input};
use std::io;
use std::path::Path;

use crate::rclone::Rclone;
use crate::runner;

/// Depth offered by default for `rclone tree`.
pub const DEFAULT_TREE_DEPTH: u32 = 2;

/// Something the user can do with a selected remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    /// `rclone lsd`
    ListDirs,
    /// `rclone ncdu`
    BrowseSizes,
    /// `rclone tree --level N`
    Tree,
    /// `rclone about`
    About,
    /// `rclone cleanup`
    Cleanup,
    /// `rclone dedupe` (Google Drive only)
    Dedupe,
    /// `rclone config reconnect`
    Reconnect,
    /// Read-only mount via the helper
    Mount,
    /// Back to the remote list
    Back,
    /// Exit the program
    Quit,
}

impl RemoteAction {
    /// Actions offered for a remote, in menu order.
    pub fn menu(supports_dedupe: bool) -> Vec<RemoteAction> {
        let mut actions = vec![
            RemoteAction::ListDirs,
            RemoteAction::BrowseSizes,
            RemoteAction::Tree,
            RemoteAction::About,
            RemoteAction::Cleanup,
        ];
        if supports_dedupe {
            actions.push(RemoteAction::Dedupe);
        }
        actions.extend([
            RemoteAction::Reconnect,
            RemoteAction::Mount,
            RemoteAction::Back,
            RemoteAction::Quit,
        ]);
        actions
    }

    /// Menu text, without numbering.
    pub fn title(self) -> &'static str {
        match self {
            RemoteAction::ListDirs => "List top-level directories",
            RemoteAction::BrowseSizes => "Browse directory sizes (ncdu)",
            RemoteAction::Tree => "Show directory tree",
            RemoteAction::About => "Show live capacity",
            RemoteAction::Cleanup => "Empty trash (cleanup)",
            RemoteAction::Dedupe => "Deduplicate files",
            RemoteAction::Reconnect => "Reconnect / refresh token",
            RemoteAction::Mount => "Mount read-only",
            RemoteAction::Back => "Back",
            RemoteAction::Quit => "Quit",
        }
    }

    /// Whether the output should stay on screen until a key is pressed.
    pub fn pauses_after(self) -> bool {
        matches!(
            self,
            RemoteAction::ListDirs
                | RemoteAction::Tree
                | RemoteAction::About
                | RemoteAction::Cleanup
                | RemoteAction::Dedupe
                | RemoteAction::Reconnect
                | RemoteAction::Mount
        )
    }
}

/// What a dispatched action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran and succeeded
    Done,
    /// The user declined a confirmation
    Skipped,
}

/// Run `action` against `remote`.
///
/// `Back` and `Quit` are handled by the menu and are no-ops here.
pub fn dispatch(
    action: RemoteAction,
    remote: &str,
    rclone: &Rclone,
    mount_helper: &Path,
) -> Result<Outcome> {
    match action {
        RemoteAction::ListDirs => rclone.stream(&["lsd"], remote, &[])?,
        RemoteAction::BrowseSizes => rclone.stream(&["ncdu"], remote, &[])?,
        RemoteAction::Tree => {
            let Some(depth) = ask_depth()? else {
                return Ok(Outcome::Skipped);
            };
            let level = format!("--level={depth}");
            rclone.stream(&["tree"], remote, &["--dirs-only", &level])?;
        }
        RemoteAction::About => rclone.stream(&["about"], remote, &[])?,
        RemoteAction::Cleanup => {
            if !confirm(&format!("Permanently empty the trash of {remote}?"))? {
                return Ok(Outcome::Skipped);
            }
            rclone.stream(&["cleanup"], remote, &[])?;
        }
        RemoteAction::Dedupe => {
            if !confirm(&format!("Interactively deduplicate files on {remote}?"))? {
                return Ok(Outcome::Skipped);
            }
            rclone.stream(&["dedupe"], remote, &["--dedupe-mode", "interactive"])?;
        }
        RemoteAction::Reconnect => rclone.stream(&["config", "reconnect"], remote, &[])?,
        RemoteAction::Mount => mount(remote, mount_helper)?,
        RemoteAction::Back | RemoteAction::Quit => {}
    }
    Ok(Outcome::Done)
}

/// Mount `remote` read-only through the helper executable.
pub fn mount(remote: &str, helper: &Path) -> Result<()> {
    if !runner::command_exists(helper) {
        anyhow::bail!(
            "Mount helper {} not found or not executable (set RCMENU_MOUNT_HELPER)",
            helper.display()
        );
    }
    runner::run_checked(helper, &[&crate::rclone::target(remote), "--read-only"])
}

/// Tree depth, or `None` when the prompt was interrupted.
fn ask_depth() -> Result<Option<u32>> {
    let answer = Input::<u32>::new()
        .with_prompt("Tree depth")
        .default(DEFAULT_TREE_DEPTH)
        .validate_with(|depth: &u32| {
            if *depth >= 1 {
                Ok(())
            } else {
                Err("depth must be at least 1")
            }
        })
        .interact_text();
    unless_interrupted(answer).context("Failed to read tree depth")
}

/// Yes/no question; an interrupted prompt counts as "no".
fn confirm(prompt: &str) -> Result<bool> {
    let answer = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact();
    Ok(unless_interrupted(answer)
        .context("Failed to read user input")?
        .unwrap_or(false))
}

/// Ctrl-C at a dialoguer prompt arrives as an `Interrupted` IO error.
fn unless_interrupted<T>(answer: dialoguer::Result<T>) -> dialoguer::Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_includes_dedupe_only_when_supported() {
        assert!(RemoteAction::menu(true).contains(&RemoteAction::Dedupe));
        assert!(!RemoteAction::menu(false).contains(&RemoteAction::Dedupe));
    }

    #[test]
    fn test_menu_ends_with_back_and_quit() {
        let menu = RemoteAction::menu(false);
        assert_eq!(&menu[menu.len() - 2..], [RemoteAction::Back, RemoteAction::Quit]);
    }

    #[test]
    fn test_interactive_actions_do_not_pause() {
        assert!(!RemoteAction::BrowseSizes.pauses_after());
        assert!(!RemoteAction::Back.pauses_after());
        assert!(RemoteAction::ListDirs.pauses_after());
    }

    #[test]
    fn test_interrupted_prompt_is_not_an_error() {
        let interrupted: dialoguer::Result<bool> = Err(dialoguer::Error::IO(io::Error::from(
            io::ErrorKind::Interrupted,
        )));
        assert_eq!(unless_interrupted(interrupted).unwrap(), None);
        assert_eq!(unless_interrupted(Ok(3)).unwrap(), Some(3));

        let broken: dialoguer::Result<bool> = Err(dialoguer::Error::IO(io::Error::from(
            io::ErrorKind::BrokenPipe,
        )));
        assert!(unless_interrupted(broken).is_err());
    }

    #[test]
    fn test_mount_missing_helper_is_reported() {
        let err = mount("gdrive", Path::new("/nonexistent/rclone-mount-ro")).unwrap_err();
        assert!(err.to_string().contains("RCMENU_MOUNT_HELPER"));
    }

    #[cfg(unix)]
    #[test]
    fn test_mount_passes_read_only_flag() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let log = tmp.path().join("args");
        let helper = tmp.path().join("mount-helper");
        std::fs::write(
            &helper,
            format!("#!/bin/sh\necho \"$@\" > '{}'\n", log.display()),
        )
        .unwrap();
        std::fs::set_permissions(&helper, std::fs::Permissions::from_mode(0o755)).unwrap();

        mount("gdrive", &helper).unwrap();
        assert_eq!(std::fs::read_to_string(&log).unwrap().trim(), "gdrive: --read-only");
    }
}
