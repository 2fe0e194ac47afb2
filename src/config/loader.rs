use std::fs;
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::error::{AppError, Result};

use super::{validator, Entry};

/// Read the entry list from a JSON file of `[url, name, enabled]` triples.
///
/// Every problem with the file is a configuration error: the run must not
/// start fetching from a half-understood list.
pub fn load_entries(path: &Path) -> Result<Vec<Entry>> {
    let json = fs::read_to_string(path).map_err(|err| {
        AppError::config(format!(
            "failed to read configuration file {}: {err}",
            path.display()
        ))
    })?;

    let raw: Value = serde_json::from_str(&json).map_err(|err| {
        AppError::config(format!(
            "failed to decode configuration file {} as JSON: {err}",
            path.display()
        ))
    })?;

    let entries = parse_entries(&raw)?;
    debug!(
        "loaded {} entries ({} enabled) from {}",
        entries.len(),
        entries.iter().filter(|entry| entry.enabled).count(),
        path.display()
    );
    Ok(entries)
}

/// Convert an already decoded JSON document into entries.
pub fn parse_entries(raw: &Value) -> Result<Vec<Entry>> {
    let rows = raw.as_array().ok_or_else(|| {
        AppError::config("expected a list of [url, name, enabled] triples at the top level")
    })?;

    validator::validate_entries(rows)
}
