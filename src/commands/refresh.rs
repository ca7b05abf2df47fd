//! Capacity cache refresh, foreground and background.
//!
//! The menu never waits for capacity numbers. On its first successful remote
//! listing it starts a detached `rcmenu refresh-worker` process which
//! rewrites the cache file on its own schedule; the menu just picks up
//! whatever the file holds the next time it draws.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use crate::Context as AppContext;
use crate::config::{Config, ENV_CACHE_FILE};
use crate::progress;
use crate::rclone::Rclone;
use crate::ui;

/// Start a detached refresh of `remotes`.
///
/// Fire-and-forget: nothing waits for it to finish. A thread reaps the
/// child so it does not linger as a zombie while the menu runs.
pub fn spawn_background(remotes: &[String]) -> Result<()> {
    let exe = std::env::current_exe().context("Could not locate the rcmenu executable")?;
    let mut child = detached(&exe)
        .arg("refresh-worker")
        .arg("--")
        .args(remotes)
        .spawn()
        .with_context(|| format!("Failed to start {}", exe.display()))?;

    log::debug!(
        "Background refresh started (pid {}) for {} remotes",
        child.id(),
        remotes.len()
    );
    thread::spawn(move || {
        if let Err(e) = child.wait() {
            log::debug!("Background refresh wait failed: {e}");
        }
    });
    Ok(())
}

/// Command with no stdio, in its own process group so that Ctrl-C or a
/// hangup at the terminal reaches the menu but not the refresh.
fn detached(program: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    cmd
}

/// Body of the background process.
///
/// Every failure is swallowed: a refresh that cannot run simply leaves the
/// previous cache in place.
pub fn worker(config: &Config, remotes: &[String]) -> Result<()> {
    let rclone = match Rclone::locate(&config.rclone) {
        Ok(r) => r,
        Err(e) => {
            log::debug!("Refresh skipped: {e:#}");
            return Ok(());
        }
    };

    match capcache::refresh(&rclone, remotes, &config.cache_file) {
        Ok(report) => log::debug!(
            "Refreshed {} of {} remotes",
            report.refreshed(),
            remotes.len()
        ),
        Err(e) => log::debug!("Refresh failed: {e}"),
    }
    Ok(())
}

/// `rcmenu refresh`: refresh every remote with a progress bar and a summary.
pub fn foreground(ctx: &AppContext, config: &Config) -> Result<()> {
    let rclone = Rclone::locate(&config.rclone)?;
    let remotes = rclone.list_remotes()?;
    if remotes.is_empty() {
        ui::warn("No remotes configured. Run 'rclone config' to add one.");
        return Ok(());
    }

    let pb = (!ctx.quiet).then(|| progress::bar(remotes.len(), "Querying remotes"));
    let report = match capcache::refresh_with_progress(
        &rclone,
        &remotes,
        &config.cache_file,
        |remote| {
            if let Some(pb) = &pb {
                pb.set_message(remote.to_string());
                pb.inc(1);
            }
        },
    ) {
        Ok(report) => report,
        Err(e) => {
            if let Some(pb) = &pb {
                progress::finish_clear(pb);
            }
            let hint = if e.is_io() {
                format!(" (set {ENV_CACHE_FILE} to use another location)")
            } else {
                String::new()
            };
            anyhow::bail!("Failed to update {}: {e}{hint}", config.cache_file.display());
        }
    };
    if let Some(pb) = &pb {
        progress::finish_clear(pb);
    }

    for (remote, reason) in &report.skipped {
        ui::warn(&format!("{remote}: {reason}"));
    }
    if !ctx.quiet {
        ui::success(&format!(
            "Cached capacity for {} of {} remotes in {}",
            report.refreshed(),
            remotes.len(),
            config.cache_file.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_detached_child_has_own_process_group() {
        let mut child = detached(Path::new("sleep")).arg("5").spawn().unwrap();
        let pid = child.id();
        let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).unwrap();
        // fields after "pid (comm)": state ppid pgrp ...
        let after_comm = &stat[stat.rfind(')').unwrap() + 1..];
        let pgrp: u32 = after_comm.split_whitespace().nth(2).unwrap().parse().unwrap();
        child.kill().unwrap();
        child.wait().unwrap();
        assert_eq!(pgrp, pid);
    }

    #[cfg(unix)]
    #[test]
    fn test_foreground_hints_at_cache_override_on_write_failure() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let rclone = tmp.path().join("rclone");
        std::fs::write(
            &rclone,
            "#!/bin/sh\ncase \"$1\" in\n  listremotes) echo 'gdrive:' ;;\n  about) echo 'Total: 1 GiB' ;;\nesac\n",
        )
        .unwrap();
        std::fs::set_permissions(&rclone, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = Config {
            cache_file: std::path::PathBuf::from("/proc/rcmenu/remotes.cache"),
            mount_helper: tmp.path().join("mount"),
            rclone,
            picker: picker::PickerOptions::default(),
        };
        let ctx = AppContext {
            verbose: 0,
            quiet: true,
        };
        let err = foreground(&ctx, &config).unwrap_err();
        assert!(err.to_string().contains(ENV_CACHE_FILE));
    }
}
