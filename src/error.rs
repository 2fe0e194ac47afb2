use std::time::Duration;

use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        AppError::Config(msg.into())
    }
}

/// Failure of a single fetch → parse → aggregate unit. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server answered with HTTP status {status}")]
    HttpStatus { status: u16 },
    #[error("no response within {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl FetchError {
    pub fn network<T: Into<String>>(msg: T) -> Self {
        FetchError::Network(msg.into())
    }

    pub fn malformed<T: Into<String>>(msg: T) -> Self {
        FetchError::MalformedDocument(msg.into())
    }
}
