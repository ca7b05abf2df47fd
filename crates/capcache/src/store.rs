//! Cache file persistence.
//!
//! Writes go to a temporary file in the cache's own directory and are then
//! renamed over the cache path, so a concurrent reader sees either the old or
//! the new file in full, never a mix.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::record::{COMMENT_MARKER, CapacityRecord, CapacityStore, is_valid_name};

/// Separator between the four fields of a data line.
///
/// rclone never prints a pipe in a size string.
pub const FIELD_SEPARATOR: char = '|';

const FIELD_COUNT: usize = 4;

impl CapacityStore {
    /// Load the cache file at `path`.
    ///
    /// A missing file is an empty store. Blank lines, comments and malformed
    /// lines are skipped individually.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No capacity cache at {}", path.display());
                Ok(Self::new())
            }
            Err(source) => Err(Error::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse cache file contents.
    pub fn parse(contents: &str) -> Self {
        let mut store = Self::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with(COMMENT_MARKER) {
                continue;
            }
            match parse_line(line) {
                Some(record) => {
                    store.push(record);
                }
                None => log::debug!("Skipping malformed cache line {}: {line:?}", lineno + 1),
            }
        }
        store
    }

    /// Atomically replace the cache file at `path` with `records`.
    ///
    /// This is a full rewrite. Records with invalid names are dropped and
    /// only the first record for each name is written.
    pub fn replace(path: impl AsRef<Path>, records: &[CapacityRecord]) -> Result<()> {
        replace_with_hook(path.as_ref(), records, || {})
    }

    /// Render the file contents `replace` would write, header included.
    pub fn render(records: &[CapacityRecord]) -> String {
        let mut out = String::new();
        out.push_str("# rcmenu capacity cache (advisory, safe to delete)\n");
        out.push_str(&format!(
            "# generated: {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push_str("# name|total|used|free\n");

        let mut seen = HashSet::new();
        for record in records {
            if !record.has_valid_name() || !seen.insert(record.name.trim()) {
                continue;
            }
            out.push_str(&encode_line(record));
            out.push('\n');
        }
        out
    }
}

fn parse_line(line: &str) -> Option<CapacityRecord> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() != FIELD_COUNT || !is_valid_name(fields[0]) {
        return None;
    }
    Some(CapacityRecord::new(fields[0], fields[1], fields[2], fields[3]))
}

fn encode_line(record: &CapacityRecord) -> String {
    [
        record.name.as_str(),
        record.total.as_str(),
        record.used.as_str(),
        record.free.as_str(),
    ]
    .iter()
    .map(|field| sanitize(field))
    .collect::<Vec<_>>()
    .join(&FIELD_SEPARATOR.to_string())
}

/// Keep a field on one line and free of separators.
fn sanitize(field: &str) -> String {
    field
        .trim()
        .chars()
        .map(|c| {
            if c == FIELD_SEPARATOR || c == '\n' || c == '\r' {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// `replace` with a callback run after the temporary file is complete and
/// before it is renamed into place.
fn replace_with_hook(
    path: &Path,
    records: &[CapacityRecord],
    before_rename: impl FnOnce(),
) -> Result<()> {
    let dir = parent_dir(path)?;
    fs::create_dir_all(&dir).map_err(|source| Error::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let file_name = path
        .file_name()
        .map_or_else(|| "cache".into(), |n| n.to_string_lossy().into_owned());
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(write_err)?;

    tmp.write_all(CapacityStore::render(records).as_bytes())
        .map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    before_rename();

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    log::debug!("Wrote {} capacity records to {}", records.len(), path.display());
    Ok(())
}

fn parent_dir(path: &Path) -> Result<PathBuf> {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(p) => Ok(p.to_path_buf()),
        None => Err(Error::NoParent(path.to_path_buf())),
    }
}
