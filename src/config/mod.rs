use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

pub mod loader;
pub mod validator;

pub use loader::{load_entries, parse_entries};

/// Configuration file read when `--file` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "urls.json";
/// Upper bound on simultaneous page fetches.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 20;
/// Per-fetch deadline in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// One configured instrument to scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub url: String,
    pub name: String,
    pub enabled: bool,
}

impl Entry {
    pub fn new<U: Into<String>, N: Into<String>>(url: U, name: N, enabled: bool) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            enabled,
        }
    }
}

/// Character placed between the integer and fraction digits of every
/// numeric output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DecimalSeparator {
    #[value(name = ".")]
    Dot,
    #[default]
    #[value(name = ",")]
    Comma,
}

/// Where the output file lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLocation {
    WorkingDir,
    Desktop,
    Dir(PathBuf),
}

/// Everything a run needs besides the entry list.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config_file: PathBuf,
    pub concurrency_limit: usize,
    pub fetch_timeout: Duration,
    pub separator: DecimalSeparator,
    pub output: OutputLocation,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            separator: DecimalSeparator::default(),
            output: OutputLocation::Desktop,
        }
    }
}
