pub mod file;
pub mod time;

pub use file::{config_suffix, resolve_output_dir};
pub use time::{current_human_timestamp, output_timestamp_slug};
