//! Pure view derivations over the cached bookings.
//!
//! Nothing here touches I/O or the clock; callers pass `today` / `now`.

use chrono::{Days, NaiveDate, NaiveDateTime};
use shared::{date_only, Booking, BookingStatus, ClockTime};

/// First hour shown on the timeline
pub const TIMELINE_START_HOUR: u16 = 9;
/// Last hour row shown on the timeline (inclusive)
pub const TIMELINE_END_HOUR: u16 = 18;
pub const HOUR_HEIGHT_PX: f64 = 50.0;
pub const MIN_BLOCK_HEIGHT_PX: f64 = 30.0;

const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    Today,
    Tomorrow,
    /// Today and the following six days
    Week,
    Custom(NaiveDate),
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Dates covered by `range`, as `YYYY-MM-DD`.
pub fn display_dates(range: DateRange, today: NaiveDate) -> Vec<String> {
    match range {
        DateRange::Today => vec![format_date(today)],
        DateRange::Tomorrow => vec![format_date(today + Days::new(1))],
        DateRange::Week => (0..WEEK_DAYS)
            .map(|offset| format_date(today + Days::new(offset)))
            .collect(),
        DateRange::Custom(date) => vec![format_date(date)],
    }
}

/// User-controlled filters of the list and timeline views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub only_mine: bool,
    /// Case-insensitive match on photographer or note
    pub search: Option<String>,
}

impl BookingFilter {
    /// Bookings dated today or later that pass the filters. Statistics use the
    /// full history instead.
    pub fn apply<'a>(&self, bookings: &'a [Booking], user: &str, today: NaiveDate) -> Vec<&'a Booking> {
        let today = format_date(today);
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        bookings
            .iter()
            .filter(|b| date_only(&b.date) >= today.as_str())
            .filter(|b| !self.only_mine || b.is_owned_by(user))
            .filter(|b| match &needle {
                Some(needle) => {
                    b.photographer.to_lowercase().contains(needle)
                        || b
                            .note
                            .as_deref()
                            .is_some_and(|note| note.to_lowercase().contains(needle))
                }
                None => true,
            })
            .collect()
    }
}

/// One studio column of the list view.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioColumn<'a> {
    pub studio: String,
    pub bookings: Vec<&'a Booking>,
}

/// Group bookings on `dates` by studio, keeping the configured studio order.
pub fn list_by_studio<'a>(
    bookings: &[&'a Booking],
    studios: &[String],
    dates: &[String],
) -> Vec<StudioColumn<'a>> {
    studios
        .iter()
        .map(|studio| StudioColumn {
            studio: studio.clone(),
            bookings: bookings
                .iter()
                .copied()
                .filter(|b| &b.studio == studio && dates.iter().any(|d| d == date_only(&b.date)))
                .collect(),
        })
        .collect()
}

/// Absolutely positioned block on the timeline grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBlock<'a> {
    pub booking: &'a Booking,
    pub top_px: f64,
    pub height_px: f64,
    pub is_mine: bool,
    pub status: BookingStatus,
}

/// Total height of a studio column.
pub fn timeline_height_px() -> f64 {
    f64::from(TIMELINE_END_HOUR - TIMELINE_START_HOUR + 1) * HOUR_HEIGHT_PX
}

/// Hour labels down the time column, `09:00` through `18:00`.
pub fn timeline_hours() -> Vec<String> {
    (TIMELINE_START_HOUR..=TIMELINE_END_HOUR)
        .map(|hour| format!("{:02}:00", hour))
        .collect()
}

/// Layout for one studio column. Bookings that start before the first
/// hour or after the last hour row are left out.
pub fn timeline_blocks<'a>(
    bookings: &[&'a Booking],
    studio: &str,
    dates: &[String],
    user: &str,
    now: NaiveDateTime,
) -> Vec<TimelineBlock<'a>> {
    let grid_start = TIMELINE_START_HOUR * 60;
    let grid_end = (TIMELINE_END_HOUR + 1) * 60;

    bookings
        .iter()
        .copied()
        .filter(|b| b.studio == studio && dates.iter().any(|d| d == date_only(&b.date)))
        .filter_map(|b| {
            let range = b.time_range()?;
            let start = range.start().minutes();
            if start < grid_start || start >= grid_end {
                return None;
            }
            let top_px = f64::from(start - grid_start) / 60.0 * HOUR_HEIGHT_PX;
            let height_px = (f64::from(range.duration_minutes()) / 60.0 * HOUR_HEIGHT_PX)
                .max(MIN_BLOCK_HEIGHT_PX);
            Some(TimelineBlock {
                booking: b,
                top_px,
                height_px,
                is_mine: b.is_owned_by(user),
                status: b.status(now)?,
            })
        })
        .collect()
}

/// Start times for a new booking clicked at `hour` on the grid.
pub fn slot_for_hour(hour: u16) -> Option<(ClockTime, ClockTime)> {
    Some((ClockTime::from_hm(hour, 0)?, ClockTime::from_hm(hour + 1, 0)?))
}

/// Hours booked today by `user`.
pub fn today_usage_hours(bookings: &[Booking], user: &str, today: NaiveDate) -> f64 {
    let today = format_date(today);
    let minutes: u32 = bookings
        .iter()
        .filter(|b| b.is_owned_by(user) && date_only(&b.date) == today)
        .map(Booking::duration_minutes)
        .sum();
    f64::from(minutes) / 60.0
}
