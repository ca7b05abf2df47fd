//! rclone adapter.
//!
//! Every interaction with remotes goes through the `rclone` executable.
//! Listing and capacity queries capture output; browsing commands stream
//! straight to the terminal.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::runner;

/// Backend type whose remotes support `rclone dedupe`.
pub const DEDUPE_TYPE: &str = "drive";

/// Handle on an installed rclone.
#[derive(Debug, Clone)]
pub struct Rclone {
    program: PathBuf,
}

impl Rclone {
    /// Use `program` (name on PATH or path), failing if it cannot be found.
    pub fn locate(program: &Path) -> Result<Self> {
        if !runner::command_exists(program) {
            anyhow::bail!(
                "{} not found. Install rclone (https://rclone.org/install/) or set RCMENU_RCLONE",
                program.display()
            );
        }
        Ok(Self {
            program: program.to_path_buf(),
        })
    }

    /// Configured remote names, without the trailing `:`.
    pub fn list_remotes(&self) -> Result<Vec<String>> {
        let output = runner::run_capture(&self.program, &["listremotes"])
            .context("Failed to list remotes")?;
        Ok(parse_remotes(&output))
    }

    /// Raw `rclone about` report for a remote.
    pub fn about_report(&self, remote: &str) -> Result<String> {
        runner::run_capture(&self.program, &["about", &target(remote)])
    }

    /// Backend type of a remote (`drive`, `s3`, ...), from its config section.
    pub fn remote_type(&self, remote: &str) -> Result<Option<String>> {
        let output = runner::run_capture(&self.program, &["config", "show", remote])?;
        Ok(parse_remote_type(&output))
    }

    /// Run an rclone subcommand against a remote, streaming its output.
    pub fn stream(&self, subcommand: &[&str], remote: &str, extra: &[&str]) -> Result<()> {
        let target = target(remote);
        let mut args: Vec<&str> = subcommand.to_vec();
        args.push(&target);
        args.extend_from_slice(extra);
        runner::run_checked(&self.program, &args)
    }
}

impl capcache::CapacitySource for Rclone {
    fn about(&self, remote: &str) -> capcache::Result<String> {
        self.about_report(remote)
            .map_err(|e| capcache::Error::Source {
                remote: remote.to_string(),
                message: format!("{e:#}"),
            })
    }
}

/// `gdrive` -> `gdrive:`
pub fn target(remote: &str) -> String {
    format!("{}:", remote.trim_end_matches(':'))
}

/// Parse `rclone listremotes` output.
pub fn parse_remotes(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim().trim_end_matches(':'))
        .filter(|name| !name.is_empty() && !name.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Find `type = ...` in `rclone config show <remote>` output.
pub fn parse_remote_type(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        (key.trim() == "type").then(|| value.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remotes() {
        let output = "gdrive:\nb2:\n\n  onedrive:  \n";
        assert_eq!(parse_remotes(output), ["gdrive", "b2", "onedrive"]);
        assert!(parse_remotes("").is_empty());
    }

    #[test]
    fn test_parse_remote_type() {
        let output = "[gdrive]\ntype = drive\nscope = drive\ntoken = XXX\n";
        assert_eq!(parse_remote_type(output).as_deref(), Some("drive"));
        assert_eq!(parse_remote_type("[x]\nprovider = AWS\n"), None);
    }

    #[test]
    fn test_target() {
        assert_eq!(target("gdrive"), "gdrive:");
        assert_eq!(target("gdrive:"), "gdrive:");
    }

    #[test]
    fn test_locate_missing_rclone() {
        let err = Rclone::locate(Path::new("rcmenu-no-such-rclone")).unwrap_err();
        assert!(err.to_string().contains("RCMENU_RCLONE"));
    }

    #[cfg(unix)]
    #[test]
    fn test_capacity_source_uses_about() {
        use capcache::CapacitySource;
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let script = tmp.path().join("rclone");
        std::fs::write(
            &script,
            "#!/bin/sh\n[ \"$1\" = about ] && [ \"$2\" = gdrive: ] && printf 'Total: 15 GiB\\nFree: 12.34 GiB\\n' && exit 0\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let rclone = Rclone::locate(&script).unwrap();
        let report = rclone.about("gdrive").unwrap();
        assert!(report.contains("Free: 12.34 GiB"));
        assert!(rclone.about("missing").is_err());
    }
}
