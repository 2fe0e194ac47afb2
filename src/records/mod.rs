use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::DecimalSeparator;
use crate::error::{Context, Result};
use crate::series::AggregateResult;
use crate::utils::{config_suffix, output_timestamp_slug};

pub mod format;
pub mod sink;

pub use format::{format_record, Row, HEADER};

/// Facade that owns the output directory and names result files.
pub struct Records {
    output_dir: PathBuf,
}

impl Records {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Ensure the output directory exists before anything is written.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;
        Ok(())
    }

    /// `indices_<YYYYmmdd_HHMM>_<config stem>.csv` inside the output directory.
    pub fn output_path(&self, config_file: &Path, timestamp: &str) -> PathBuf {
        self.output_dir.join(format!(
            "indices_{}_{}.csv",
            timestamp,
            config_suffix(config_file)
        ))
    }

    /// Format and persist the summaries under a freshly timestamped name.
    pub fn save_results(
        &self,
        config_file: &Path,
        results: &[&AggregateResult],
        separator: DecimalSeparator,
    ) -> Result<PathBuf> {
        let path = self.output_path(config_file, &output_timestamp_slug());
        let rows: Vec<Row> = results
            .iter()
            .map(|result| format_record(result, separator))
            .collect();

        sink::write_file(&path, &rows)?;
        info!("wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }
}
