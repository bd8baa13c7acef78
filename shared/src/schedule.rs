//! Wall-clock primitives and the booking overlap predicate.
//!
//! Dates and times are naive local wall-clock values checked against fixed
//! formats only: no time zones, no leap-year or month-length logic.

use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

use crate::Booking;

/// A `HH:MM` wall-clock time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Parse an exact `HH:MM` string (24h, zero padded).
    pub fn parse(value: &str) -> Option<Self> {
        let bytes = value.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return None;
        }
        let digit = |i: usize| -> Option<u16> {
            let b = bytes[i];
            b.is_ascii_digit().then(|| u16::from(b - b'0'))
        };
        let hour = digit(0)? * 10 + digit(1)?;
        let minute = digit(3)? * 10 + digit(4)?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    /// Truncates seconds, matching how the booking views compare against "now".
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockTimeParseError(pub String);

impl fmt::Display for ClockTimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time `{}`, expected HH:MM", self.0)
    }
}

impl std::error::Error for ClockTimeParseError {}

impl FromStr for ClockTime {
    type Err = ClockTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ClockTimeParseError(s.to_string()))
    }
}

/// Half-open `[start, end)` interval with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: ClockTime,
    end: ClockTime,
}

impl TimeRange {
    pub fn new(start: ClockTime, end: ClockTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    /// `s < E && e > S`. Touching ranges do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn contains(&self, time: ClockTime) -> bool {
        self.start <= time && time < self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end.minutes() - self.start.minutes())
    }
}

/// Fixed-format `YYYY-MM-DD` check: four digit year, month 01-12, day 01-31.
pub fn is_valid_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let all_digits = [0, 1, 2, 3, 5, 6, 8, 9]
        .iter()
        .all(|&i| bytes[i].is_ascii_digit());
    if !all_digits {
        return false;
    }
    let month = (bytes[5] - b'0') * 10 + (bytes[6] - b'0');
    let day = (bytes[8] - b'0') * 10 + (bytes[9] - b'0');
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Date part of a value that may carry an ISO time suffix (`2026-01-28T00:00:00Z`).
pub fn date_only(value: &str) -> &str {
    value.split('T').next().unwrap_or(value)
}

/// First booking on the same studio and date whose interval overlaps `range`.
///
/// Rows whose times do not parse cannot be compared and are skipped.
/// `exclude_id` lets an update ignore the row being replaced.
pub fn find_conflict<'a, I>(
    bookings: I,
    studio: &str,
    date: &str,
    range: &TimeRange,
    exclude_id: Option<&str>,
) -> Option<&'a Booking>
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings.into_iter().find(|booking| {
        if booking.studio != studio || date_only(&booking.date) != date {
            return false;
        }
        if exclude_id.is_some_and(|id| id == booking.id) {
            return false;
        }
        booking
            .time_range()
            .is_some_and(|existing| existing.overlaps(range))
    })
}
