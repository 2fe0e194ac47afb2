use chrono::Local;

pub fn current_human_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Minute-resolution stamp embedded in output file names.
pub fn output_timestamp_slug() -> String {
    Local::now().format("%Y%m%d_%H%M").to_string()
}
