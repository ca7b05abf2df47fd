use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::process::{Command, ExitStatus, Stdio};

/// Run a command and inherit stdio (shows output in real-time)
///
/// Once [`picker::interrupt::install`] has run, Ctrl-C stops only the child;
/// the interrupt is consumed here so it does not cancel the next menu.
pub fn run(cmd: impl AsRef<OsStr>, args: &[&str]) -> Result<ExitStatus> {
    let cmd = cmd.as_ref();
    log::debug!("Running: {} {}", cmd.to_string_lossy(), args.join(" "));
    let status = Command::new(cmd)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute: {} {}", cmd.to_string_lossy(), args.join(" ")));
    if picker::interrupt::take() {
        log::debug!("Interrupted: {}", cmd.to_string_lossy());
    }
    status
}

/// Run a command inheriting stdio and fail on a non-zero exit
pub fn run_checked(cmd: impl AsRef<OsStr>, args: &[&str]) -> Result<()> {
    let cmd = cmd.as_ref();
    let status = run(cmd, args)?;
    if status.success() {
        Ok(())
    } else {
        anyhow::bail!(
            "{} {} exited with {}",
            cmd.to_string_lossy(),
            args.first().copied().unwrap_or_default(),
            describe_status(status)
        )
    }
}

/// Run a command and capture output
pub fn run_capture(cmd: impl AsRef<OsStr>, args: &[&str]) -> Result<String> {
    let cmd = cmd.as_ref();
    log::debug!("Capturing: {} {}", cmd.to_string_lossy(), args.join(" "));
    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to execute: {} {}", cmd.to_string_lossy(), args.join(" ")))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Command failed: {}", stderr.trim())
    }
}

/// Check if a command exists (bare name on PATH, or a path to an executable)
pub fn command_exists(cmd: impl AsRef<OsStr>) -> bool {
    which::which(cmd.as_ref()).is_ok()
}

fn describe_status(status: ExitStatus) -> String {
    status
        .code()
        .map_or_else(|| "a signal".to_string(), |code| format!("status {code}"))
}
