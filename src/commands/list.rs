//! `rcmenu list`: print the capacity cache without touching any remote.

use anyhow::{Context, Result};
use capcache::{CapacityRecord, CapacityStore, SortMode, normalize, sort_remotes};
use colored::Colorize;
use serde::Serialize;

use crate::config::Config;
use crate::ui;

pub fn run(config: &Config, mode: SortMode, json: bool) -> Result<()> {
    let store = CapacityStore::load(&config.cache_file)
        .with_context(|| format!("Failed to read {}", config.cache_file.display()))?;
    let rows = ordered(&store, mode);

    if json {
        let rows: Vec<JsonRow> = rows.into_iter().map(JsonRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        ui::info("Capacity cache is empty. Run 'rcmenu refresh' to fill it.");
        return Ok(());
    }

    print!("{}", render_table(&rows));
    Ok(())
}

/// JSON form of a record: the cached strings plus their byte counts.
#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    total: &'a str,
    used: &'a str,
    free: &'a str,
    total_bytes: u64,
    used_bytes: u64,
    free_bytes: u64,
}

impl<'a> From<&'a CapacityRecord> for JsonRow<'a> {
    fn from(r: &'a CapacityRecord) -> Self {
        Self {
            name: &r.name,
            total: &r.total,
            used: &r.used,
            free: &r.free,
            total_bytes: normalize(&r.total),
            used_bytes: normalize(&r.used),
            free_bytes: normalize(&r.free),
        }
    }
}

/// Records ordered by `mode`, first occurrence per name.
fn ordered(store: &CapacityStore, mode: SortMode) -> Vec<&CapacityRecord> {
    let mut names: Vec<String> = Vec::new();
    for record in store.iter() {
        if !names.contains(&record.name) {
            names.push(record.name.clone());
        }
    }
    sort_remotes(&names, mode, store)
        .iter()
        .filter_map(|name| store.get(name))
        .collect()
}

fn render_table(rows: &[&CapacityRecord]) -> String {
    let width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("REMOTE".len());

    let mut out = format!(
        "{}\n",
        format!("{:<width$}  {:>12}  {:>12}  {:>12}", "REMOTE", "TOTAL", "USED", "FREE").bold()
    );
    for r in rows {
        out.push_str(&format!(
            "{:<width$}  {:>12}  {:>12}  {:>12}\n",
            r.name,
            or_dash(&r.total),
            or_dash(&r.used),
            or_dash(&r.free)
        ));
    }
    out
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
