//! Ctrl-C as "go back" instead of "die".
//!
//! [`install`] replaces the default SIGINT action with a flag, so an
//! interrupt while a menu waits for input (or while a child command runs)
//! leaves the process alive. The numbered backend polls the flag and turns
//! it into [`crate::Pick::Cancelled`]. Until `install` is called, SIGINT keeps
//! its default behaviour.

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

fn flag() -> &'static Arc<AtomicBool> {
    FLAG.get_or_init(|| Arc::new(AtomicBool::new(false)))
}

/// Route SIGINT to the interrupt flag. Safe to call more than once.
#[cfg(unix)]
pub fn install() -> std::io::Result<()> {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(flag()))?;
    let _ = INSTALLED.set(());
    log::debug!("SIGINT routed to the picker");
    Ok(())
}

/// Route SIGINT to the interrupt flag. No-op off Unix.
#[cfg(not(unix))]
pub fn install() -> std::io::Result<()> {
    Ok(())
}

/// Whether an interrupt arrived since the last [`take`] or [`clear`], clearing it.
pub fn take() -> bool {
    flag().swap(false, Ordering::Relaxed)
}

/// Whether an interrupt is pending, without clearing it.
pub fn pending() -> bool {
    flag().load(Ordering::Relaxed)
}

/// Forget any interrupt received so far.
pub fn clear() {
    flag().store(false, Ordering::Relaxed);
}
