use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::info;

use crate::config::{load_entries, RunSettings};
use crate::error::Result;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::records::Records;
use crate::utils::resolve_output_dir;

use super::pipeline::{Pipeline, RunResult};

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub output_file: PathBuf,
    pub result: RunResult,
    pub elapsed: Duration,
}

/// Entry point used by `main`: load the entry list, scrape it over HTTP and
/// write the summary file.
pub async fn run(settings: &RunSettings) -> Result<RunReport> {
    let fetcher = HttpFetcher::new(settings.fetch_timeout)?;
    run_with(settings, fetcher).await
}

/// Same as [`run`] with the fetcher supplied by the caller.
///
/// Configuration and output-directory problems abort before any fetch;
/// per-entry failures only show up in the returned `RunResult`.
pub async fn run_with<F: PageFetcher>(settings: &RunSettings, fetcher: F) -> Result<RunReport> {
    let started = Instant::now();

    let entries = load_entries(&settings.config_file)?;
    let records = Records::new(resolve_output_dir(&settings.output)?);
    records.prepare()?;

    let pipeline = Pipeline::new(fetcher, settings.concurrency_limit, settings.fetch_timeout);
    let result = pipeline.run(&entries).await;

    let output_file =
        records.save_results(&settings.config_file, &result.successes(), settings.separator)?;

    let elapsed = started.elapsed();
    info!(
        "run finished in {:.2}s: {} succeeded, {} failed",
        elapsed.as_secs_f64(),
        result.successes().len(),
        result.failures().len()
    );

    Ok(RunReport {
        output_file,
        result,
        elapsed,
    })
}
