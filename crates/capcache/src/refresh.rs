//! Capacity refresh.
//!
//! A refresh asks a [`CapacitySource`] about every remote, turns each report
//! into a [`CapacityRecord`] and rewrites the cache in one go. Remotes whose
//! query fails are left out of the new file until a later refresh succeeds.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::record::{CapacityRecord, CapacityStore};
use crate::units::split_number;

/// Something that can describe a remote's capacity.
///
/// The report is free-form text containing lines such as `Total:   15 GiB`,
/// the way `rclone about` prints it.
pub trait CapacitySource: Send + Sync {
    /// Fetch the capacity report for one remote (name without trailing `:`).
    fn about(&self, remote: &str) -> Result<String>;
}

/// Outcome of a refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Records written to the cache, in remote order
    pub records: Vec<CapacityRecord>,
    /// Remotes left out, with the reason
    pub skipped: Vec<(String, String)>,
}

impl RefreshReport {
    /// Number of remotes that produced a record.
    pub fn refreshed(&self) -> usize {
        self.records.len()
    }
}

/// Query every remote and atomically rewrite the cache at `path`.
///
/// Queries run in parallel; the resulting file keeps the order of `remotes`.
pub fn refresh(
    source: &dyn CapacitySource,
    remotes: &[String],
    path: &Path,
) -> Result<RefreshReport> {
    refresh_with_progress(source, remotes, path, |_| {})
}

/// [`refresh`] with a callback invoked as each remote finishes.
pub fn refresh_with_progress(
    source: &dyn CapacitySource,
    remotes: &[String],
    path: &Path,
    on_done: impl Fn(&str) + Sync,
) -> Result<RefreshReport> {
    let outcomes: Vec<(String, Result<Option<CapacityRecord>>)> = remotes
        .par_iter()
        .map(|remote| {
            let outcome = source.about(remote).map(|text| parse_about(remote, &text));
            on_done(remote);
            (remote.clone(), outcome)
        })
        .collect();

    let mut report = RefreshReport::default();
    for (remote, outcome) in outcomes {
        match outcome {
            Ok(Some(record)) => report.records.push(record),
            Ok(None) => {
                log::debug!("Empty capacity report for {remote}");
                report.skipped.push((remote, "empty report".to_string()));
            }
            Err(e) => {
                log::debug!("Capacity query failed for {remote}: {e}");
                report.skipped.push((remote, e.to_string()));
            }
        }
    }

    CapacityStore::replace(path, &report.records)?;
    Ok(report)
}

/// Build a record from a capacity report.
///
/// Returns `None` for an empty report. Missing labels leave the field empty.
/// The free figure is truncated to one decimal place.
pub fn parse_about(remote: &str, text: &str) -> Option<CapacityRecord> {
    if text.trim().is_empty() {
        return None;
    }

    let name = remote.trim().trim_end_matches(':');
    let total = labelled_value(text, "Total:");
    let used = labelled_value(text, "Used:");
    let free = truncate_to_tenths(&labelled_value(text, "Free:"));
    Some(CapacityRecord::new(name, total, used, free))
}

fn labelled_value(text: &str, label: &str) -> String {
    text.lines()
        .find_map(|line| line.trim_start().strip_prefix(label))
        .map(|rest| rest.trim().to_string())
        .unwrap_or_default()
}

/// Cut the number in `"12.34 GiB"` down to one decimal digit: `"12.3 GiB"`.
///
/// Works on the digits themselves so the stored value never moves because of
/// float formatting, and never rounds up.
fn truncate_to_tenths(value: &str) -> String {
    let (number, unit) = split_number(value);
    let Some((whole, fraction)) = number.split_once('.') else {
        return value.to_string();
    };

    let tenths: String = fraction.chars().take(1).collect();
    let number = if tenths.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{tenths}")
    };

    if unit.is_empty() {
        number
    } else {
        format!("{number} {unit}")
    }
}

/// In-memory capacity source for tests.
///
/// Remotes without a configured report fail their query.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    reports: Arc<Mutex<HashMap<String, String>>>,
}

impl MockSource {
    /// Create a source with no remotes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report returned for `remote`.
    pub fn set_report(&self, remote: impl Into<String>, report: impl Into<String>) {
        let mut reports = self.reports.lock().unwrap_or_else(|e| e.into_inner());
        reports.insert(remote.into(), report.into());
    }
}

impl CapacitySource for MockSource {
    fn about(&self, remote: &str) -> Result<String> {
        let reports = self.reports.lock().unwrap_or_else(|e| e.into_inner());
        reports.get(remote).cloned().ok_or_else(|| Error::Source {
            remote: remote.to_string(),
            message: "no such remote".to_string(),
        })
    }
}
