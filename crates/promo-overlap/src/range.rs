//! Calendar date ranges and their intersection test.
//!
//! Campaign periods are whole days: a campaign running `2024-01-01..=2024-01-10`
//! is live on both boundary days, so two ranges that touch on a single day
//! overlap.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// An inclusive `[start, end]` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Two ranges intersect iff `self.start <= other.end && self.end >= other.start`.
    ///
    /// Boundaries are inclusive, so ranges sharing a single day intersect.
    pub fn intersects(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Whether `day` falls inside the range (both ends included).
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Parse a wire date into a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps. Timestamps keep only their date
/// part as written, without shifting between offsets.
pub fn parse_date(raw: &str) -> Result<NaiveDate, RecordError> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ndt| ndt.date())
        .map_err(|_| RecordError::InvalidDate(raw.to_string()))
}

