//! Environment-driven configuration for rcmenu
//!
//! rcmenu takes no configuration file. Everything that can be changed is
//! read from the environment once at startup.
//!
//! # Environment Variables
//!
//! - `RCMENU_CACHE_FILE` - Capacity cache location
//! - `RCMENU_MOUNT_HELPER` - Read-only mount helper executable
//! - `RCMENU_RCLONE` - rclone executable
//! - `RCMENU_NO_FZF` - Truthy value disables the fzf picker
//! - `RCMENU_NO_GUM` - Truthy value disables the gum picker
//!
//! # Path Resolution Priority
//!
//! For cache_file():
//! 1. `RCMENU_CACHE_FILE` environment variable
//! 2. `XDG_CACHE_HOME/rcmenu/remotes.cache` (if set)
//! 3. `~/.cache/rcmenu/remotes.cache`

use anyhow::{Context, Result};
use picker::PickerOptions;
use std::path::PathBuf;

/// Environment variable for the cache file override
pub const ENV_CACHE_FILE: &str = "RCMENU_CACHE_FILE";

/// Environment variable for the mount helper override
pub const ENV_MOUNT_HELPER: &str = "RCMENU_MOUNT_HELPER";

/// Environment variable for the rclone executable override
pub const ENV_RCLONE: &str = "RCMENU_RCLONE";

/// Environment variable that disables the fzf backend
pub const ENV_NO_FZF: &str = "RCMENU_NO_FZF";

/// Environment variable that disables the gum backend
pub const ENV_NO_GUM: &str = "RCMENU_NO_GUM";

/// Mount helper looked up on PATH when no override is set
pub const DEFAULT_MOUNT_HELPER: &str = "rclone-mount-ro";

/// rclone executable used when no override is set
pub const DEFAULT_RCLONE: &str = "rclone";

const CACHE_FILE_NAME: &str = "remotes.cache";

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity cache file
    pub cache_file: PathBuf,
    /// Read-only mount helper
    pub mount_helper: PathBuf,
    /// rclone executable
    pub rclone: PathBuf,
    /// Picker backend overrides
    pub picker: PickerOptions,
}

impl Config {
    /// Read the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            cache_file: cache_file()?,
            mount_helper: env_path(ENV_MOUNT_HELPER)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MOUNT_HELPER)),
            rclone: env_path(ENV_RCLONE).unwrap_or_else(|| PathBuf::from(DEFAULT_RCLONE)),
            picker: PickerOptions {
                disable_fuzzy: env_flag(ENV_NO_FZF),
                disable_chooser: env_flag(ENV_NO_GUM),
            },
        };
        log::debug!("Configuration: {config:?}");
        Ok(config)
    }
}

/// Get the capacity cache file path
///
/// Priority:
/// 1. `RCMENU_CACHE_FILE` env var
/// 2. `XDG_CACHE_HOME/rcmenu/remotes.cache`
/// 3. `~/.cache/rcmenu/remotes.cache`
pub fn cache_file() -> Result<PathBuf> {
    // 1. Check environment variable override
    if let Some(path) = env_path(ENV_CACHE_FILE) {
        log::debug!("Using cache file from {}: {}", ENV_CACHE_FILE, path.display());
        return Ok(path);
    }

    // 2. Check XDG_CACHE_HOME
    if let Ok(xdg_cache) = std::env::var("XDG_CACHE_HOME")
        && !xdg_cache.is_empty()
    {
        let path = PathBuf::from(xdg_cache).join("rcmenu").join(CACHE_FILE_NAME);
        log::debug!("Using XDG_CACHE_HOME: {}", path.display());
        return Ok(path);
    }

    // 3. Default: ~/.cache/rcmenu
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".cache").join("rcmenu").join(CACHE_FILE_NAME);
    log::debug!("Using default cache file: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

/// Non-empty env var, expanded as a path.
fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| expand(v.trim()))
}

/// Whether an env var is set to a truthy value.
fn env_flag(key: &str) -> bool {
    std::env::var(key).is_ok_and(|v| is_truthy(&v))
}

/// `1`, `true`, `yes` and `on` (any case) are truthy.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests that touch the process environment.
    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Helper to run a test with temporary env var
    ///
    /// # Safety
    /// This function uses unsafe env::set_var/remove_var which can cause issues
    /// if other threads read environment variables concurrently.
    /// Hold [`env_lock`] for the whole test.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    /// Helper to run a test with env var removed
    fn without_env_var<F, R>(key: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::remove_var(key) };
        let result = f();
        if let Some(v) = original {
            // SAFETY: Tests run in isolation
            unsafe { env::set_var(key, v) };
        }
        result
    }

    #[test]
    fn test_cache_file_env_override() {
        let _env = env_lock();
        with_env_var(ENV_CACHE_FILE, "/custom/remotes.cache", || {
            assert_eq!(cache_file().unwrap(), PathBuf::from("/custom/remotes.cache"));
        });
    }

    #[test]
    fn test_cache_file_env_override_with_tilde() {
        let _env = env_lock();
        let home = dirs::home_dir().unwrap();
        with_env_var(ENV_CACHE_FILE, "~/rcmenu-tilde-test/remotes.cache", || {
            assert_eq!(
                cache_file().unwrap(),
                home.join("rcmenu-tilde-test").join("remotes.cache")
            );
        });
    }

    #[test]
    fn test_cache_file_xdg() {
        let _env = env_lock();
        without_env_var(ENV_CACHE_FILE, || {
            with_env_var("XDG_CACHE_HOME", "/tmp/xdg-cache-test", || {
                assert_eq!(
                    cache_file().unwrap(),
                    PathBuf::from("/tmp/xdg-cache-test/rcmenu/remotes.cache")
                );
            });
        });
    }

    #[test]
    fn test_cache_file_default() {
        let _env = env_lock();
        without_env_var(ENV_CACHE_FILE, || {
            without_env_var("XDG_CACHE_HOME", || {
                let home = dirs::home_dir().unwrap();
                assert_eq!(
                    cache_file().unwrap(),
                    home.join(".cache").join("rcmenu").join("remotes.cache")
                );
            });
        });
    }

    #[test]
    fn test_mount_helper_override() {
        let _env = env_lock();
        with_env_var(ENV_MOUNT_HELPER, "/opt/bin/mount-ro", || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.mount_helper, PathBuf::from("/opt/bin/mount-ro"));
        });
    }

    #[test]
    fn test_picker_flags() {
        let _env = env_lock();
        with_env_var(ENV_NO_FZF, "1", || {
            with_env_var(ENV_NO_GUM, "no", || {
                let config = Config::from_env().unwrap();
                assert!(config.picker.disable_fuzzy);
                assert!(!config.picker.disable_chooser);
            });
        });
    }

    #[test]
    fn test_is_truthy() {
        for value in ["1", "true", "TRUE", "yes", " on "] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["", "0", "false", "no", "off", "maybe"] {
            assert!(!is_truthy(value), "{value}");
        }
    }

    #[test]
    fn test_env_var_constants() {
        assert_eq!(ENV_CACHE_FILE, "RCMENU_CACHE_FILE");
        assert_eq!(ENV_MOUNT_HELPER, "RCMENU_MOUNT_HELPER");
        assert_eq!(ENV_NO_FZF, "RCMENU_NO_FZF");
        assert_eq!(ENV_NO_GUM, "RCMENU_NO_GUM");
    }
}
