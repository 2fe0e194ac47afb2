use std::process::ExitCode;

use clap::Parser;

use indices_cli::app::{self, RunReport};
use indices_cli::cli::Cli;
use indices_cli::utils::current_human_timestamp;

/// Exit status when the file was written but some entries failed.
const PARTIAL_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Cli::parse().into_settings();
    println!(
        "Fetching indices listed in {} at {} ...",
        settings.config_file.display(),
        current_human_timestamp()
    );

    match app::run(&settings).await {
        Ok(report) => print_report(&report),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &RunReport) -> ExitCode {
    let failures = report.result.failures();

    println!("File created here: {}", report.output_file.display());
    println!(
        "{} of {} entries written",
        report.result.successes().len(),
        report.result.len()
    );

    for failure in &failures {
        eprintln!(
            "Failed to process {} ({}): {}",
            failure.name, failure.url, failure.cause
        );
    }

    println!("\nDuration: {:.2} sec", report.elapsed.as_secs_f64());

    if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(PARTIAL_FAILURE)
    }
}
