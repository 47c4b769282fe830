//! Lane date handling.
//!
//! Callers send dates in whatever shape their system produces: ISO
//! `YYYY-MM-DD`, the board's own `MM/DD/YYYY`, or a structured date.
//! All of them normalize to `NaiveDate` at the boundary, and output
//! always uses the board's `MM/DD/YYYY` format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The load board's required textual date format.
const BOARD_FORMAT: &str = "%m/%d/%Y";

/// Error returned when a date string cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized date {input:?}: expected YYYY-MM-DD or MM/DD/YYYY")]
pub struct DateError {
    input: String,
}

/// Parse a date in either accepted textual format.
pub fn parse_board_date(s: &str) -> Result<NaiveDate, DateError> {
    let trimmed = s.trim();

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, BOARD_FORMAT))
        .map_err(|_| DateError {
            input: s.to_string(),
        })
}

/// Format a date in the board's `MM/DD/YYYY` format.
pub fn format_board_date(date: NaiveDate) -> String {
    date.format(BOARD_FORMAT).to_string()
}

/// A date that deserializes from any accepted input shape and always
/// serializes as `MM/DD/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FlexibleDate(pub NaiveDate);

impl FlexibleDate {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for FlexibleDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::str::FromStr for FlexibleDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_board_date(s).map(FlexibleDate)
    }
}

impl Serialize for FlexibleDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_board_date(self.0))
    }
}

impl<'de> Deserialize<'de> for FlexibleDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
