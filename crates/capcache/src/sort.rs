use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::record::{CapacityField, CapacityStore};
use crate::units::normalize;

/// Ranking criterion for the remote list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Remote name, ascending
    #[default]
    Name,
    /// Free space, largest first
    Free,
    /// Total capacity, largest first
    Total,
    /// Used space, largest first
    Used,
}

impl SortMode {
    /// Every mode, in menu order.
    pub const ALL: [SortMode; 4] = [SortMode::Name, SortMode::Free, SortMode::Total, SortMode::Used];

    /// The capacity figure this mode ranks by, if any.
    pub fn field(self) -> Option<CapacityField> {
        match self {
            SortMode::Name => None,
            SortMode::Free => Some(CapacityField::Free),
            SortMode::Total => Some(CapacityField::Total),
            SortMode::Used => Some(CapacityField::Used),
        }
    }

    /// Lowercase identifier, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Name => "name",
            SortMode::Free => "free",
            SortMode::Total => "total",
            SortMode::Used => "used",
        }
    }

    /// Human-readable description for menus.
    pub fn description(self) -> &'static str {
        match self {
            SortMode::Name => "name",
            SortMode::Free => "free space",
            SortMode::Total => "total size",
            SortMode::Used => "used space",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortMode::Name),
            "free" => Ok(SortMode::Free),
            "total" | "size" => Ok(SortMode::Total),
            "used" => Ok(SortMode::Used),
            other => Err(format!("unknown sort mode: {other}")),
        }
    }
}

/// Order remote names by `mode`.
///
/// Name mode sorts ascending. Capacity modes sort by the cached figure in
/// bytes, largest first, with ties broken by name. Remotes missing from the
/// cache count as 0 bytes and sink to the bottom.
pub fn sort_remotes(remotes: &[String], mode: SortMode, store: &CapacityStore) -> Vec<String> {
    let mut ordered = remotes.to_vec();
    match mode.field() {
        None => ordered.sort(),
        Some(field) => {
            ordered.sort_by_cached_key(|name| (Reverse(normalize(store.field(name, field))), name.clone()));
        }
    }
    ordered
}
