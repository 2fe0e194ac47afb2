pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod records;
pub mod series;
pub mod utils;

pub use error::{AppError, FetchError, Result};
