use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker that starts a comment line in the cache file.
pub const COMMENT_MARKER: char = '#';

/// Capacity figures cached for one remote.
///
/// Values are kept exactly as the remote tool reported them (e.g. `"10 TiB"`),
/// or empty when unknown. Use [`crate::normalize`] to compare them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRecord {
    /// Remote identifier without the trailing `:`
    pub name: String,
    /// Total capacity
    pub total: String,
    /// Used space
    pub used: String,
    /// Free space
    pub free: String,
}

/// Which capacity figure to read from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityField {
    /// Total capacity
    Total,
    /// Used space
    Used,
    /// Free space
    Free,
}

impl CapacityRecord {
    /// Create a record.
    pub fn new(
        name: impl Into<String>,
        total: impl Into<String>,
        used: impl Into<String>,
        free: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            total: total.into(),
            used: used.into(),
            free: free.into(),
        }
    }

    /// A record with every figure unknown.
    #[cfg(test)]
    pub(crate) fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, "", "", "")
    }

    /// Get one capacity figure.
    pub fn field(&self, field: CapacityField) -> &str {
        match field {
            CapacityField::Total => &self.total,
            CapacityField::Used => &self.used,
            CapacityField::Free => &self.free,
        }
    }

    /// Whether the name can be stored: non-empty and not a comment.
    pub fn has_valid_name(&self) -> bool {
        is_valid_name(&self.name)
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && !name.starts_with(COMMENT_MARKER)
}

/// Ordered collection of capacity records, keyed by remote name.
///
/// When the same name appears more than once, lookups return the first
/// occurrence. [`CapacityStore::replace`] never writes duplicates,
/// so this only matters for hand-edited files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityStore {
    records: Vec<CapacityRecord>,
    index: HashMap<String, usize>,
}

impl CapacityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, skipping records with invalid names.
    pub fn from_records(records: impl IntoIterator<Item = CapacityRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.push(record);
        }
        store
    }

    /// Append a record. Records with an empty or comment-prefixed name are
    /// dropped. Returns whether the record was kept.
    pub fn push(&mut self, record: CapacityRecord) -> bool {
        if !record.has_valid_name() {
            return false;
        }
        let position = self.records.len();
        self.index.entry(record.name.clone()).or_insert(position);
        self.records.push(record);
        true
    }

    /// Look up the first record for a remote.
    pub fn get(&self, name: &str) -> Option<&CapacityRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Get one figure for a remote, empty when the remote is not cached.
    pub fn field(&self, name: &str, field: CapacityField) -> &str {
        self.get(name).map_or("", |r| r.field(field))
    }

    /// All records in file order.
    pub fn records(&self) -> &[CapacityRecord] {
        &self.records
    }

    /// Iterate over records in file order.
    pub fn iter(&self) -> impl Iterator<Item = &CapacityRecord> {
        self.records.iter()
    }

    /// Number of records, including shadowed duplicates.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<CapacityRecord> for CapacityStore {
    fn from_iter<I: IntoIterator<Item = CapacityRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let store = CapacityStore::from_records([
            CapacityRecord::new("gdrive", "15 GiB", "3 GiB", "12 GiB"),
            CapacityRecord::new("gdrive", "1 TiB", "1 TiB", "0 B"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("gdrive").unwrap().total, "15 GiB");
    }

    #[test]
    fn test_invalid_names_are_dropped() {
        let mut store = CapacityStore::new();
        assert!(!store.push(CapacityRecord::unknown("")));
        assert!(!store.push(CapacityRecord::unknown("   ")));
        assert!(!store.push(CapacityRecord::unknown("#comment")));
        assert!(store.push(CapacityRecord::unknown("b2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_field_lookup() {
        let store: CapacityStore =
            [CapacityRecord::new("s3", "10 TiB", "4 TiB", "6 TiB")].into_iter().collect();
        assert_eq!(store.field("s3", CapacityField::Total), "10 TiB");
        assert_eq!(store.field("s3", CapacityField::Used), "4 TiB");
        assert_eq!(store.field("s3", CapacityField::Free), "6 TiB");
        assert_eq!(store.field("missing", CapacityField::Free), "");
    }
}
