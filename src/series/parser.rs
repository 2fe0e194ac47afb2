use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use log::debug;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use crate::error::FetchError;
use crate::fetch::FetchResult;

use super::{Sample, Series};

/// Data rows of the historical quotes table.
const ROW_SELECTOR: &str = "tr.c-table__row";
const CELL_SELECTOR: &str = "td";

/// Date, close, variation, open, high, low.
const MIN_ROW_CELLS: usize = 6;

/// `[currency] [+] digits[{ws}ddd]*[(.|,)digits]* [currency|unit]`
const VALUE_GRAMMAR: &str =
    r"^(?:\p{Sc}\s*)?\+?(?P<number>[0-9]+(?:\s[0-9]{3})*(?:[.,][0-9]+)*)(?:\s*(?:\p{Sc}|\p{L}{1,4}))?$";

/// Date layouts seen in the history tables, most common first.
const DATE_FORMATS: [&str; 5] = ["%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y", "%Y-%m-%d", "%d/%m/%y"];

/// Extract the price series from a history page.
///
/// Each table row contributes one sample: the date from its first cell and
/// the closing price from the first following cell that is not a
/// percentage. Rows shorter than the quotes layout, or whose date or price
/// does not parse, are skipped; the document only fails when no row
/// survives.
pub fn parse_document(html: &str) -> FetchResult<Series> {
    let document = Html::parse_document(html);
    let rows = selector(ROW_SELECTOR)?;
    let cells = selector(CELL_SELECTOR)?;

    let mut seen = 0usize;
    let mut samples = Vec::new();

    for row in document.select(&rows) {
        seen += 1;
        let texts: Vec<String> = row.select(&cells).map(cell_text).collect();
        match parse_row(&texts) {
            Some(sample) => samples.push(sample),
            None => debug!("skipping unparseable row {:?}", texts),
        }
    }

    Series::new(samples).ok_or_else(|| {
        if seen == 0 {
            FetchError::malformed("no historical quotes table found")
        } else {
            FetchError::malformed(format!(
                "none of the {seen} table rows held a valid date and value"
            ))
        }
    })
}

/// Build a sample from the text of one row's cells.
///
/// The price column is fixed: a cell that does not parse skips the row
/// rather than letting a later column stand in for it.
pub fn parse_row<S: AsRef<str>>(cells: &[S]) -> Option<Sample> {
    if cells.len() < MIN_ROW_CELLS {
        return None;
    }

    let (date_cell, rest) = cells.split_first()?;
    let date = parse_date(date_cell.as_ref())?;
    let price_cell = rest
        .iter()
        .map(AsRef::as_ref)
        .find(|cell| !cell.contains('%'))?;
    let value = parse_value(price_cell)?;
    Some(Sample::new(date, value))
}

pub fn parse_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    // `%Y` happily reads "24" as year 24, so two-digit years need the
    // plausibility filter to fall through to `%y`.
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(token, format)
            .ok()
            .filter(|date| date.year() >= 1900)
    })
}

/// Normalize a locale-formatted number to a canonical decimal.
///
/// The token must be a single unsigned number, optionally preceded by a
/// currency symbol and followed by a currency symbol or a short unit
/// (`EUR`, `pts`). Digits may be grouped by any single whitespace
/// character. When both `.` and `,` appear, the rightmost is the decimal
/// separator; a separator repeated several times is grouping. Anything
/// else (prose, percentages, negative numbers) yields `None`.
pub fn parse_value(token: &str) -> Option<Decimal> {
    let captures = value_pattern()?.captures(token.trim())?;
    let digits: String = captures
        .name("number")?
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let decimal_pos = match (digits.rfind('.'), digits.rfind(',')) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(dot), None) if digits.matches('.').count() == 1 => Some(dot),
        (None, Some(comma)) if digits.matches(',').count() == 1 => Some(comma),
        _ => None,
    };

    let normalized: String = digits
        .char_indices()
        .filter_map(|(idx, ch)| match ch {
            '.' | ',' if Some(idx) == decimal_pos => Some('.'),
            '.' | ',' => None,
            digit => Some(digit),
        })
        .collect();

    Decimal::from_str(&normalized).ok()
}

fn value_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(VALUE_GRAMMAR).ok())
        .as_ref()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> FetchResult<Selector> {
    Selector::parse(css)
        .map_err(|err| FetchError::malformed(format!("invalid selector `{css}`: {err}")))
}
