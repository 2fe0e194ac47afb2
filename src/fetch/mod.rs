use async_trait::async_trait;

use crate::error::FetchError;

pub mod client;

pub use client::HttpFetcher;

/// Raw markup returned by a successful fetch.
pub type RawDocument = String;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Retrieves one page per call. Implementations hold no per-call state, so a
/// single instance is shared by every concurrent unit of a run.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult<RawDocument>;
}

#[inline]
pub fn ensure_concurrency_limit(limit: usize) -> usize {
    limit.max(1)
}
