//! Calendar slots and the forbidden-range bookkeeping.
//!
//! All keys and spans are computed in the host's local civil time zone.
//! Spans are half-open `[start, end)` intervals of naive local time, so
//! DST transitions cannot make a slot ambiguous.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

/// Retention granularity, ordered finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    Minutes,
    Hours,
    Days,
    Weeks,
    Week13,
    Months,
    Quarters,
    Years,
}

impl Granularity {
    /// All granularities in processing order (finest first).
    pub const ALL: [Self; 8] = [
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Week13,
        Self::Months,
        Self::Quarters,
        Self::Years,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Week13 => "week13",
            Self::Months => "months",
            Self::Quarters => "quarters",
            Self::Years => "years",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Identity of one calendar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Minute {
        date: NaiveDate,
        hour: u32,
        minute: u32,
    },
    Hour {
        date: NaiveDate,
        hour: u32,
    },
    Day {
        date: NaiveDate,
    },
    Week {
        iso_year: i32,
        iso_week: u32,
    },
    Week13 {
        iso_year: i32,
        block: u32,
    },
    Month {
        year: i32,
        month: u32,
    },
    Quarter {
        year: i32,
        quarter: u32,
    },
    Year {
        year: i32,
    },
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minute { date, hour, minute } => write!(f, "{date}T{hour:02}:{minute:02}"),
            Self::Hour { date, hour } => write!(f, "{date}T{hour:02}"),
            Self::Day { date } => write!(f, "{date}"),
            Self::Week { iso_year, iso_week } => write!(f, "{iso_year}-W{iso_week:02}"),
            Self::Week13 { iso_year, block } => write!(f, "{iso_year}-13W{block}"),
            Self::Month { year, month } => write!(f, "{year}-{month:02}"),
            Self::Quarter { year, quarter } => write!(f, "{year}-Q{quarter}"),
            Self::Year { year } => write!(f, "{year}"),
        }
    }
}

/// Half-open civil-time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Computes the slot identity of `t` under `granularity`.
#[must_use]
pub fn bucket_key(granularity: Granularity, t: NaiveDateTime) -> BucketKey {
    let date = t.date();
    match granularity {
        Granularity::Minutes => BucketKey::Minute {
            date,
            hour: t.hour(),
            minute: t.minute(),
        },
        Granularity::Hours => BucketKey::Hour {
            date,
            hour: t.hour(),
        },
        Granularity::Days => BucketKey::Day { date },
        Granularity::Weeks => {
            let iso = date.iso_week();
            BucketKey::Week {
                iso_year: iso.year(),
                iso_week: iso.week(),
            }
        }
        Granularity::Week13 => {
            let iso = date.iso_week();
            BucketKey::Week13 {
                iso_year: iso.year(),
                block: (iso.week() - 1) / 13,
            }
        }
        Granularity::Months => BucketKey::Month {
            year: date.year(),
            month: date.month(),
        },
        Granularity::Quarters => BucketKey::Quarter {
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
        },
        Granularity::Years => BucketKey::Year { year: date.year() },
    }
}

/// Computes the calendar interval covered by the slot of `t` under
/// `granularity`.
#[must_use]
pub fn bucket_span(granularity: Granularity, t: NaiveDateTime) -> Span {
    let date = t.date();
    match granularity {
        Granularity::Minutes => {
            let start = date.and_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t);
            span_until(start, start.checked_add_signed(Duration::minutes(1)))
        }
        Granularity::Hours => {
            let start = date.and_hms_opt(t.hour(), 0, 0).unwrap_or(t);
            span_until(start, start.checked_add_signed(Duration::hours(1)))
        }
        Granularity::Days => day_span(date, 1),
        Granularity::Weeks => {
            let iso = date.iso_week();
            week_span(iso.year(), iso.week(), 1)
        }
        Granularity::Week13 => {
            let iso = date.iso_week();
            let block = (iso.week() - 1) / 13;
            week_span(iso.year(), block * 13 + 1, 13)
        }
        Granularity::Months => {
            let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
            month_span(start, 1)
        }
        Granularity::Quarters => {
            let first_month = (date.month() - 1) / 3 * 3 + 1;
            let start = NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date);
            month_span(start, 3)
        }
        Granularity::Years => {
            let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
            let end = NaiveDate::from_ymd_opt(date.year() + 1, 1, 1);
            span_until(start.and_time(NaiveTime::MIN), end.map(|d| d.and_time(NaiveTime::MIN)))
        }
    }
}

fn span_until(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Span {
    Span {
        start,
        end: end.unwrap_or(NaiveDateTime::MAX),
    }
}

fn day_span(date: NaiveDate, days: u64) -> Span {
    let start = date.and_time(NaiveTime::MIN);
    span_until(start, date.checked_add_days(chrono::Days::new(days)).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Interval from Monday of ISO week `week` spanning `count` weeks.
///
/// A block reaching past the last ISO week of the year ends at the next
/// ISO year's week 1.
fn week_span(iso_year: i32, week: u32, count: u32) -> Span {
    let start = NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon);
    let end = NaiveDate::from_isoywd_opt(iso_year, week + count, Weekday::Mon)
        .or_else(|| NaiveDate::from_isoywd_opt(iso_year + 1, 1, Weekday::Mon));
    Span {
        start: start.map_or(NaiveDateTime::MIN, |d| d.and_time(NaiveTime::MIN)),
        end: end.map_or(NaiveDateTime::MAX, |d| d.and_time(NaiveTime::MIN)),
    }
}

fn month_span(start: NaiveDate, months: u32) -> Span {
    let (mut year, mut month) = (start.year(), start.month() + months);
    if month > 12 {
        year += 1;
        month -= 12;
    }
    let end = NaiveDate::from_ymd_opt(year, month, 1);
    span_until(start.and_time(NaiveTime::MIN), end.map(|d| d.and_time(NaiveTime::MIN)))
}

/// Sorted union of disjoint half-open civil-time intervals.
///
/// Holds the calendar ranges already claimed by finer granularities;
/// membership tests are binary searches.
#[derive(Debug, Clone, Default)]
pub struct IntervalSet {
    spans: Vec<Span>,
}

impl IntervalSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Merges `span` into the set, coalescing adjacent intervals.
    pub fn insert(&mut self, span: Span) {
        if span.start >= span.end {
            return;
        }
        let idx = self.spans.partition_point(|s| s.start < span.start);
        self.spans.insert(idx, span);
        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());
        for s in self.spans.drain(..) {
            match merged.last_mut() {
                Some(last) if s.start <= last.end => last.end = last.end.max(s.end),
                _ => merged.push(s),
            }
        }
        self.spans = merged;
    }

    /// True if `span` intersects any stored interval.
    #[must_use]
    pub fn overlaps(&self, span: Span) -> bool {
        let idx = self.spans.partition_point(|s| s.end <= span.start);
        self.spans.get(idx).is_some_and(|s| s.start < span.end)
    }

    /// True if the instant `t` lies inside a stored interval.
    #[must_use]
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        let idx = self.spans.partition_point(|s| s.end <= t);
        self.spans.get(idx).is_some_and(|s| s.start <= t)
    }
}

#[cfg(test)]
#[path = "bucket_tests.rs"]
mod tests;
