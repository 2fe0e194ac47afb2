use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Series;

/// Latest, highest and lowest observation of one instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub name: String,
    pub latest_value: Decimal,
    pub max_date: NaiveDate,
    pub max_value: Decimal,
    pub min_date: NaiveDate,
    pub min_value: Decimal,
}

/// Reduce a series in a single pass.
///
/// `latest_value` is the first sample in document order: source pages list
/// the newest trading day first and the series is not re-sorted. On ties for
/// the maximum or minimum, the earliest sample in document order wins.
pub fn aggregate(series: &Series, name: &str) -> AggregateResult {
    let first = series.first();
    let mut max = first;
    let mut min = first;

    for sample in &series.samples()[1..] {
        if sample.value > max.value {
            max = sample;
        }
        if sample.value < min.value {
            min = sample;
        }
    }

    AggregateResult {
        name: name.to_string(),
        latest_value: first.value,
        max_date: max.date,
        max_value: max.value,
        min_date: min.date,
        min_value: min.value,
    }
}

/// Whether the first sample carries the most recent date of the series,
/// i.e. whether `latest_value` really is the latest quote.
pub fn is_newest_first(series: &Series) -> bool {
    let first = series.first().date;
    series.samples().iter().all(|sample| sample.date <= first)
}
