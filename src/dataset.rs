//! Tabular dataset model.
//!
//! A [`Dataset`] is an ordered list of [`Record`]s, each mapping a column name to a
//! [`CellValue`]. Records keep their column order, and the first record acts as the
//! schema for the whole dataset.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single scalar cell as it arrives from a JSON preview or a parsed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

pub type Record = IndexMap<String, CellValue>;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Year-month formats, parsed as the first day of the month.
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%B %Y", "%b %Y"];

impl CellValue {
    /// Builds a cell from raw text, mapping the empty string to `Null`.
    pub fn from_text(raw: &str) -> Self {
        if raw.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric reading of the cell, if it has one.
    ///
    /// Numbers are taken as-is, booleans count as 1/0, and text must parse as a finite
    /// float after trimming. Null and blank text have no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Number(n) => n.is_finite().then_some(*n),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// Numeric value used by aggregations: anything without a numeric reading is 0.
    pub fn coerce_number(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// Date reading of a text cell. Non-text cells never parse as dates.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Text(s) => parse_date(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", format_plain_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Renders a number without a trailing `.0` when it is integral.
pub fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Best-effort date parsing over the formats commonly found in exported spreadsheets.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| parse_month(s))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `2024-01`, `2024/01`, `January 2024`, `Jan 2024`. Numeric forms need a four-digit year.
fn parse_month(s: &str) -> Option<NaiveDate> {
    let has_year_prefix = s.len() > 4 && s.as_bytes()[..4].iter().all(u8::is_ascii_digit);
    if !has_year_prefix && !s.chars().any(char::is_alphabetic) {
        return None;
    }
    let with_day = format!("{} 1", s);
    MONTH_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&with_day, &format!("{} %d", fmt)).ok()
    })
}

/// An ordered collection of uniform-shape records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The schema record. Every other record is assumed to share its columns.
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Column names in the order of the first record.
    pub fn columns(&self) -> Vec<&str> {
        self.first()
            .map(|r| r.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Cell for `column` in each record; `None` where a record lacks the column.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a CellValue>> + 'a {
        self.records.iter().map(move |r| r.get(column))
    }

    /// Keeps at most `max` records from the front.
    pub fn truncate(&mut self, max: usize) {
        self.records.truncate(max);
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
