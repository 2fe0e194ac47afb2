use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DecimalSeparator;
use crate::series::AggregateResult;

/// Column titles of the output file.
pub const HEADER: [&str; 6] = [
    "Indice",
    "Cours",
    "Date with max",
    "Max",
    "Date with min",
    "Min",
];

const FRACTION_DIGITS: u32 = 3;
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Textual fields of one output line, in `HEADER` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub fields: [String; 6],
}

impl Row {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

pub fn format_record(result: &AggregateResult, separator: DecimalSeparator) -> Row {
    Row {
        fields: [
            result.name.clone(),
            format_decimal(result.latest_value, separator),
            format_date(result.max_date),
            format_decimal(result.max_value, separator),
            format_date(result.min_date),
            format_decimal(result.min_value, separator),
        ],
    }
}

/// Render with exactly three fraction digits, rounding half away from zero.
pub fn format_decimal(value: Decimal, separator: DecimalSeparator) -> String {
    let mut rounded =
        value.round_dp_with_strategy(FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(FRACTION_DIGITS);
    let text = rounded.to_string();

    match separator {
        DecimalSeparator::Dot => text,
        DecimalSeparator::Comma => text.replace('.', ","),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
