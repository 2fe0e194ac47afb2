use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{
    DecimalSeparator, OutputLocation, RunSettings, DEFAULT_CONCURRENCY_LIMIT, DEFAULT_CONFIG_FILE,
    DEFAULT_FETCH_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(name = "indices-cli")]
#[command(about = "Fetch index price histories and write their latest, highest and lowest values to a CSV file")]
#[command(version)]
pub struct Cli {
    /// Create the CSV file in the current directory instead of the Desktop
    #[arg(short, long)]
    pub local: bool,

    /// JSON file listing [url, name, enabled] entries
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub file: PathBuf,

    /// Decimal separator used in numeric columns
    #[arg(short, long, value_enum, default_value_t = DecimalSeparator::Comma)]
    pub decimal: DecimalSeparator,

    /// Maximum number of pages fetched at the same time
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY_LIMIT)]
    pub concurrency: usize,

    /// Per-page fetch timeout in seconds
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_FETCH_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

impl Cli {
    pub fn into_settings(self) -> RunSettings {
        RunSettings {
            config_file: self.file,
            concurrency_limit: self.concurrency,
            fetch_timeout: Duration::from_secs(self.timeout),
            separator: self.decimal,
            output: if self.local {
                OutputLocation::WorkingDir
            } else {
                OutputLocation::Desktop
            },
        }
    }
}
