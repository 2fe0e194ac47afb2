use chrono::NaiveDate;
use rust_decimal::Decimal;

pub mod aggregate;
pub mod parser;

pub use aggregate::{aggregate, is_newest_first, AggregateResult};
pub use parser::parse_document;

/// One observed price point on one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub date: NaiveDate,
    pub value: Decimal,
}

impl Sample {
    pub fn new(date: NaiveDate, value: Decimal) -> Self {
        Self { date, value }
    }
}

/// Samples of one instrument in document order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series(Vec<Sample>);

impl Series {
    /// Returns `None` for an empty sample list.
    pub fn new(samples: Vec<Sample>) -> Option<Self> {
        if samples.is_empty() {
            None
        } else {
            Some(Self(samples))
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    pub fn first(&self) -> &Sample {
        &self.0[0]
    }
}
