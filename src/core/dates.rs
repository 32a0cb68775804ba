//! Calendar date ranges.
//!
//! Every range in the system is inclusive on both ends: an engagement from the 1st to the
//! 10th occupies ten days, and a single-day leave has `start == end`. [`DateRange`] is the
//! validated form used at the input boundary; the engine itself works on raw dates and
//! treats an inverted range as empty.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format used for dates entered by users and rendered in replies
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive `[start, end]` range of calendar days with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting one whose end precedes its start.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDateRange`] when `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    #[must_use]
    pub const fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Parses two ISO 8601 dates (`YYYY-MM-DD`) into a range.
    ///
    /// # Errors
    /// Returns an error if either date is malformed or the range is inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// First day of the range
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, always at least 1.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        inclusive_days(self.start, self.end)
    }

    /// Whether `day` falls inside the range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Iterates over every day of the range in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`), trimming surrounding whitespace.
///
/// # Errors
/// Returns [`Error::DateParse`] when the text is not a valid date.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(Into::into)
}

/// Number of days in `[start, end]`; zero or negative when the range is inverted.
#[must_use]
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Number of days shared by `[a_start, a_end]` and `[b_start, b_end]`.
///
/// Two ranges overlap iff `max(starts) <= min(ends)`; a one-day range touching the
/// other range's first or last day shares exactly one day.
#[must_use]
pub fn overlap_days(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> i64 {
    let latest_start = a_start.max(b_start);
    let earliest_end = a_end.min(b_end);
    inclusive_days(latest_start, earliest_end).max(0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        let result = DateRange::new(date(2024, 1, 10), date(2024, 1, 9));
        assert!(matches!(result, Err(Error::InvalidDateRange { .. })));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::single_day(date(2024, 2, 29));
        assert_eq!(range.num_days(), 1);
        assert!(range.contains(date(2024, 2, 29)));
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn test_parse_trims_and_validates() {
        let range = DateRange::parse(" 2024-01-01", "2024-01-10 ").unwrap();
        assert_eq!(range.num_days(), 10);
        assert!(DateRange::parse("2024-13-01", "2024-01-10").is_err());
        assert!(DateRange::parse("2024-01-10", "2024-01-01").is_err());
    }

    #[test]
    fn test_days_spans_month_boundary() {
        let range = DateRange::new(date(2024, 1, 30), date(2024, 2, 2)).unwrap();
        let days: Vec<NaiveDate> = range.days().collect();
        assert_eq!(
            days,
            vec![date(2024, 1, 30), date(2024, 1, 31), date(2024, 2, 1), date(2024, 2, 2)]
        );
    }

    #[test]
    fn test_overlap_days_shared_boundary() {
        // Ranges meeting on one day share exactly that day
        let days = overlap_days(date(2024, 1, 1), date(2024, 1, 10), date(2024, 1, 10), date(2024, 1, 15));
        assert_eq!(days, 1);
    }

    #[test]
    fn test_overlap_days_disjoint() {
        let days = overlap_days(date(2024, 1, 1), date(2024, 1, 10), date(2024, 1, 11), date(2024, 1, 15));
        assert_eq!(days, 0);
    }

    #[test]
    fn test_overlap_days_contained() {
        let days = overlap_days(date(2024, 1, 1), date(2024, 1, 31), date(2024, 1, 5), date(2024, 1, 7));
        assert_eq!(days, 3);
    }

    #[test]
    fn test_overlap_days_inverted_range_is_empty() {
        let days = overlap_days(date(2024, 1, 10), date(2024, 1, 1), date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(days, 0);
    }
}
