use std::env;
use std::path::{Path, PathBuf};

use crate::config::OutputLocation;
use crate::error::{AppError, Context, Result};

/// Suffix derived from the configuration file name (`urls.json` → `urls`).
pub fn config_suffix(config_file: &Path) -> String {
    config_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("urls")
        .to_string()
}

/// Turn the requested output location into a concrete directory.
pub fn resolve_output_dir(location: &OutputLocation) -> Result<PathBuf> {
    match location {
        OutputLocation::WorkingDir => {
            Ok(env::current_dir().context("Failed to determine the current directory")?)
        }
        OutputLocation::Desktop => desktop_dir(),
        OutputLocation::Dir(dir) => Ok(dir.clone()),
    }
}

fn desktop_dir() -> Result<PathBuf> {
    ["USERPROFILE", "HOME"]
        .iter()
        .find_map(|var| env::var_os(var).filter(|value| !value.is_empty()))
        .map(|home| PathBuf::from(home).join("Desktop"))
        .ok_or_else(|| {
            AppError::message(
                "Neither USERPROFILE nor HOME is set; use --local to write next to the current directory",
            )
        })
}
