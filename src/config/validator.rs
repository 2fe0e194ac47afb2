use reqwest::Url;
use serde_json::Value;

use crate::error::{AppError, Result};

use super::Entry;

/// Validate every raw `[url, name, enabled]` row and surface all issues at once.
pub fn validate_entries(rows: &[Value]) -> Result<Vec<Entry>> {
    let mut issues = Vec::new();
    let mut entries = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        if let Some(entry) = validate_row(index, row, &mut issues) {
            entries.push(entry);
        }
    }

    if issues.is_empty() {
        Ok(entries)
    } else {
        Err(AppError::config(format!(
            "expected a list of [url, name, enabled] triples:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_row(index: usize, row: &Value, issues: &mut Vec<String>) -> Option<Entry> {
    let Some(fields) = row.as_array() else {
        issues.push(format!("entry #{index} is not a list"));
        return None;
    };

    if fields.len() != 3 {
        issues.push(format!(
            "entry #{index} has {} fields instead of 3",
            fields.len()
        ));
        return None;
    }

    let before = issues.len();

    let url = match fields[0].as_str() {
        Some(url) => {
            validate_url(index, url, issues);
            url
        }
        None => {
            issues.push(format!("entry #{index}: url must be a string"));
            ""
        }
    };

    let name = match fields[1].as_str() {
        Some(name) if name.trim().is_empty() => {
            issues.push(format!("entry #{index}: name must not be empty"));
            ""
        }
        Some(name) => name,
        None => {
            issues.push(format!("entry #{index}: name must be a string"));
            ""
        }
    };

    let enabled = match fields[2].as_f64() {
        Some(flag) => flag == 1.0,
        None => {
            issues.push(format!(
                "entry #{index}: enabled flag must be numeric, got {}",
                fields[2]
            ));
            false
        }
    };

    if issues.len() > before {
        return None;
    }

    Some(Entry::new(url, name.trim(), enabled))
}

fn validate_url(index: usize, url: &str, issues: &mut Vec<String>) {
    match Url::parse(url) {
        Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => issues.push(format!(
            "entry #{index}: url `{url}` must use http or https"
        )),
        Ok(parsed) if parsed.host_str().is_none() => {
            issues.push(format!("entry #{index}: url `{url}` has no host"))
        }
        Ok(_) => {}
        Err(err) => issues.push(format!("entry #{index}: url `{url}` is invalid ({err})")),
    }
}
