use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schedule::{date_only, ClockTime};

/// Wall-clock position of a booking relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Completed,
    Ongoing,
    Upcoming,
}

/// Pure status derivation from the booking's date and times.
///
/// Past dates are completed, future dates upcoming; on today's date the
/// minute-resolution `now` is compared against `[start, end)`.
pub fn booking_status(
    date: &str,
    start: ClockTime,
    end: ClockTime,
    now: NaiveDateTime,
) -> BookingStatus {
    let today = now.date().format("%Y-%m-%d").to_string();
    let date = date_only(date);

    if date < today.as_str() {
        return BookingStatus::Completed;
    }
    if date > today.as_str() {
        return BookingStatus::Upcoming;
    }

    let current = ClockTime::from_naive_time(now.time());
    if end <= current {
        BookingStatus::Completed
    } else if start <= current {
        BookingStatus::Ongoing
    } else {
        BookingStatus::Upcoming
    }
}

impl crate::Booking {
    /// `None` when the stored times are malformed.
    pub fn status(&self, now: NaiveDateTime) -> Option<BookingStatus> {
        let range = self.time_range()?;
        Some(booking_status(&self.date, range.start(), range.end(), now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(date: &str, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn t(value: &str) -> ClockTime {
        ClockTime::parse(value).unwrap()
    }

    #[test]
    fn test_other_days() {
        let now = at("2026-01-28", 11, 0, 0);
        assert_eq!(booking_status("2026-01-27", t("10:00"), t("12:00"), now), BookingStatus::Completed);
        assert_eq!(booking_status("2026-01-29", t("10:00"), t("12:00"), now), BookingStatus::Upcoming);
        assert_eq!(
            booking_status("2026-01-27T00:00:00.000Z", t("10:00"), t("12:00"), now),
            BookingStatus::Completed
        );
    }

    #[test]
    fn test_today_boundaries() {
        let start = t("10:00");
        let end = t("12:00");
        assert_eq!(booking_status("2026-01-28", start, end, at("2026-01-28", 9, 59, 59)), BookingStatus::Upcoming);
        assert_eq!(booking_status("2026-01-28", start, end, at("2026-01-28", 10, 0, 0)), BookingStatus::Ongoing);
        assert_eq!(booking_status("2026-01-28", start, end, at("2026-01-28", 11, 59, 59)), BookingStatus::Ongoing);
        assert_eq!(booking_status("2026-01-28", start, end, at("2026-01-28", 12, 0, 0)), BookingStatus::Completed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BookingStatus::Ongoing).unwrap(), "\"ongoing\"");
    }
}
