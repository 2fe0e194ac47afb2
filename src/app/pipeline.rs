use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::config::Entry;
use crate::error::FetchError;
use crate::fetch::{ensure_concurrency_limit, FetchResult, PageFetcher};
use crate::series::{aggregate, is_newest_first, parse_document, AggregateResult};

/// An entry whose unit of work ended in an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub name: String,
    pub url: String,
    pub cause: FetchError,
}

/// Terminal state of one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Aggregated(AggregateResult),
    Failed(FetchFailure),
}

/// One outcome per enabled entry, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    outcomes: Vec<Outcome>,
}

impl RunResult {
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn successes(&self) -> Vec<&AggregateResult> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                Outcome::Aggregated(result) => Some(result),
                Outcome::Failed(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&FetchFailure> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                Outcome::Failed(failure) => Some(failure),
                Outcome::Aggregated(_) => None,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| matches!(outcome, Outcome::Failed(_)))
    }
}

/// Runs fetch → parse → aggregate for every enabled entry with at most
/// `concurrency_limit` fetches in flight.
pub struct Pipeline<F> {
    fetcher: F,
    concurrency_limit: usize,
    fetch_timeout: Duration,
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(fetcher: F, concurrency_limit: usize, fetch_timeout: Duration) -> Self {
        Self {
            fetcher,
            concurrency_limit: ensure_concurrency_limit(concurrency_limit),
            fetch_timeout,
        }
    }

    #[cfg(test)]
    fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Process every enabled entry and wait for all of them. A failing unit
    /// never cancels its siblings; results come back in input order whatever
    /// the completion order was.
    pub async fn run(&self, entries: &[Entry]) -> RunResult {
        let limit = self.concurrency_limit;
        let gate = Semaphore::new(limit);
        let gate = &gate;

        let enabled: Vec<&Entry> = entries.iter().filter(|entry| entry.enabled).collect();
        info!(
            "processing {} of {} entries, {} at a time",
            enabled.len(),
            entries.len(),
            limit
        );

        let mut completed: Vec<(usize, Outcome)> = stream::iter(enabled.into_iter().enumerate())
            .map(|(index, entry)| async move { (index, self.run_unit(entry, gate).await) })
            .buffer_unordered(limit)
            .collect()
            .await;

        completed.sort_by_key(|(index, _)| *index);

        RunResult {
            outcomes: completed.into_iter().map(|(_, outcome)| outcome).collect(),
        }
    }

    async fn run_unit(&self, entry: &Entry, gate: &Semaphore) -> Outcome {
        info!("Processing {} ...", entry.name);

        match self.process(entry, gate).await {
            Ok(result) => {
                info!(
                    "{}: latest {}, max {} ({}), min {} ({})",
                    entry.name,
                    result.latest_value,
                    result.max_value,
                    result.max_date,
                    result.min_value,
                    result.min_date
                );
                Outcome::Aggregated(result)
            }
            Err(cause) => {
                warn!("{} ({}) failed: {}", entry.name, entry.url, cause);
                Outcome::Failed(FetchFailure {
                    name: entry.name.clone(),
                    url: entry.url.clone(),
                    cause,
                })
            }
        }
    }

    async fn process(&self, entry: &Entry, gate: &Semaphore) -> FetchResult<AggregateResult> {
        let document = {
            // The gate lives as long as the run and is never closed.
            let _permit = gate
                .acquire()
                .await
                .map_err(|err| FetchError::network(err.to_string()))?;

            match timeout(self.fetch_timeout, self.fetcher.fetch(&entry.url)).await {
                Ok(fetched) => fetched?,
                Err(_) => return Err(FetchError::Timeout(self.fetch_timeout)),
            }
        };

        let series = parse_document(&document)?;
        debug!("{}: parsed {} samples", entry.name, series.samples().len());
        if !is_newest_first(&series) {
            warn!(
                "{}: first row is not the most recent date, latest value may be stale",
                entry.name
            );
        }

        Ok(aggregate(&series, &entry.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::fetch::RawDocument;

    #[derive(Clone)]
    enum Page {
        Html(String),
        Status(u16),
        Hang,
    }

    /// Serves canned pages and records how it was driven.
    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, (Duration, Page)>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn with_page(mut self, url: &str, delay_ms: u64, page: Page) -> Self {
            self.pages
                .insert(url.to_string(), (Duration::from_millis(delay_ms), page));
            self
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> FetchResult<RawDocument> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let (delay, page) = self
                .pages
                .get(url)
                .cloned()
                .unwrap_or((Duration::ZERO, Page::Status(404)));

            let result = match page {
                Page::Html(html) => {
                    tokio::time::sleep(delay).await;
                    Ok(html)
                }
                Page::Status(status) => {
                    tokio::time::sleep(delay).await;
                    Err(FetchError::HttpStatus { status })
                }
                Page::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(FetchError::network("unreachable"))
                }
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn history_page(rows: &[(&str, &str)]) -> Page {
        let body: String = rows
            .iter()
            .map(|(date, value)| {
                format!(
                    r#"<tr class="c-table__row"><td>{date}</td><td>{value}</td><td>+0,10%</td><td>{value}</td><td>{value}</td><td>{value}</td></tr>"#
                )
            })
            .collect();
        Page::Html(format!("<html><body><table>{body}</table></body></html>"))
    }

    fn simple_page(value: &str) -> Page {
        history_page(&[("02/01/2024", value)])
    }

    fn entry(url: &str, name: &str) -> Entry {
        Entry::new(url, name, true)
    }

    fn names(result: &RunResult) -> Vec<String> {
        result
            .outcomes()
            .iter()
            .map(|outcome| match outcome {
                Outcome::Aggregated(result) => result.name.clone(),
                Outcome::Failed(failure) => failure.name.clone(),
            })
            .collect()
    }

    fn pipeline(fetcher: StubFetcher, limit: usize) -> Pipeline<StubFetcher> {
        Pipeline::new(fetcher, limit, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn aggregates_page_with_tie_breaking() {
        let fetcher = StubFetcher::default().with_page(
            "https://example.com/cac",
            0,
            history_page(&[
                ("02/01/2024", "10,0"),
                ("01/01/2024", "15,0"),
                ("29/12/2023", "10,0"),
            ]),
        );

        let result = pipeline(fetcher, 4)
            .run(&[entry("https://example.com/cac", "CAC 40")])
            .await;

        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(
            result.outcomes(),
            &[Outcome::Aggregated(AggregateResult {
                name: "CAC 40".to_string(),
                latest_value: dec!(10.0),
                max_date: day(2024, 1, 1),
                max_value: dec!(15.0),
                min_date: day(2024, 1, 2),
                min_value: dec!(10.0),
            })]
        );
    }

    #[tokio::test]
    async fn preserves_input_order_regardless_of_completion() {
        let fetcher = StubFetcher::default()
            .with_page("https://example.com/a", 60, simple_page("1"))
            .with_page("https://example.com/b", 30, simple_page("2"))
            .with_page("https://example.com/c", 0, simple_page("3"));

        let result = pipeline(fetcher, 3)
            .run(&[
                entry("https://example.com/a", "A"),
                entry("https://example.com/b", "B"),
                entry("https://example.com/c", "C"),
            ])
            .await;

        assert_eq!(result.len(), 3);
        assert_eq!(names(&result), vec!["A", "B", "C"]);
        assert!(!result.has_failures());
    }

    #[tokio::test]
    async fn disabled_entries_are_never_fetched() {
        let fetcher = StubFetcher::default()
            .with_page("https://example.com/a", 0, simple_page("1"))
            .with_page("https://example.com/b", 0, simple_page("2"));
        let pipeline = pipeline(fetcher, 2);

        let result = pipeline
            .run(&[
                Entry::new("https://example.com/a", "A", false),
                entry("https://example.com/b", "B"),
                Entry::new("https://example.com/c", "C", false),
            ])
            .await;

        assert_eq!(names(&result), vec!["B"]);
        assert_eq!(pipeline.fetcher().calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *pipeline.fetcher().requested.lock().unwrap(),
            vec!["https://example.com/b".to_string()]
        );
    }

    #[tokio::test]
    async fn http_failure_does_not_stop_siblings() {
        let fetcher = StubFetcher::default()
            .with_page("https://example.com/gone", 0, Page::Status(404))
            .with_page("https://example.com/b", 20, simple_page("2"))
            .with_page("https://example.com/c", 40, simple_page("3"));

        let result = pipeline(fetcher, 1)
            .run(&[
                entry("https://example.com/gone", "Gone"),
                entry("https://example.com/b", "B"),
                entry("https://example.com/c", "C"),
            ])
            .await;

        assert_eq!(
            result.failures(),
            vec![&FetchFailure {
                name: "Gone".to_string(),
                url: "https://example.com/gone".to_string(),
                cause: FetchError::HttpStatus { status: 404 },
            }]
        );
        let succeeded: Vec<&str> = result
            .successes()
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(succeeded, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn unparseable_page_becomes_failure() {
        let fetcher = StubFetcher::default()
            .with_page(
                "https://example.com/empty",
                0,
                Page::Html("<html><body>maintenance</body></html>".to_string()),
            )
            .with_page("https://example.com/ok", 0, simple_page("5"));

        let result = pipeline(fetcher, 2)
            .run(&[
                entry("https://example.com/empty", "Empty"),
                entry("https://example.com/ok", "Ok"),
            ])
            .await;

        assert!(matches!(
            &result.outcomes()[0],
            Outcome::Failed(FetchFailure {
                cause: FetchError::MalformedDocument(_),
                ..
            })
        ));
        assert!(matches!(&result.outcomes()[1], Outcome::Aggregated(_)));
    }

    #[tokio::test]
    async fn slow_fetch_times_out_alone() {
        let fetcher = StubFetcher::default()
            .with_page("https://example.com/slow", 0, Page::Hang)
            .with_page("https://example.com/fast", 0, simple_page("7"));
        let timeout = Duration::from_millis(50);

        let result = Pipeline::new(fetcher, 2, timeout)
            .run(&[
                entry("https://example.com/slow", "Slow"),
                entry("https://example.com/fast", "Fast"),
            ])
            .await;

        assert_eq!(
            result.failures()[0].cause,
            FetchError::Timeout(Duration::from_millis(50))
        );
        assert_eq!(result.successes()[0].name, "Fast");
    }

    #[tokio::test]
    async fn never_exceeds_concurrency_ceiling() {
        let mut fetcher = StubFetcher::default();
        let mut entries = Vec::new();
        for idx in 0..5 {
            let url = format!("https://example.com/{idx}");
            fetcher = fetcher.with_page(&url, 30, simple_page("1"));
            entries.push(entry(&url, &format!("E{idx}")));
        }
        let pipeline = pipeline(fetcher, 2);

        let result = pipeline.run(&entries).await;

        assert_eq!(result.len(), 5);
        let observed = pipeline.fetcher().max_in_flight.load(Ordering::SeqCst);
        assert!(observed <= 2, "saw {observed} fetches in flight");
        assert!(observed >= 1);
        assert_eq!(pipeline.fetcher().calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn zero_limit_is_clamped_to_one() {
        let fetcher = StubFetcher::default().with_page("https://example.com/a", 0, simple_page("1"));

        let result = pipeline(fetcher, 0)
            .run(&[entry("https://example.com/a", "A")])
            .await;

        assert_eq!(names(&result), vec!["A"]);
    }

    #[tokio::test]
    async fn empty_entry_list_yields_empty_result() {
        let result = pipeline(StubFetcher::default(), 3).run(&[]).await;

        assert!(result.is_empty());
        assert!(!result.has_failures());
    }
}
