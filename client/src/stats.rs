//! Usage statistics over the full booking history.

use std::collections::{BTreeSet, HashMap};

use shared::Booking;

/// `None` means "all" for both fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilter {
    /// `YYYY-MM`
    pub month: Option<String>,
    pub studio: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotographerStats {
    pub rank: usize,
    pub photographer: String,
    pub count: usize,
    pub total_hours: f64,
    pub avg_hours: f64,
    /// Share of all filtered hours, 0-100
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsReport {
    pub total_bookings: usize,
    pub total_hours: f64,
    pub photographers: usize,
    /// Sorted by total hours, highest first
    pub rows: Vec<PhotographerStats>,
}

/// Months that have bookings, newest first.
pub fn available_months(bookings: &[Booking]) -> Vec<String> {
    let months: BTreeSet<&str> = bookings
        .iter()
        .filter_map(|b| b.date.get(..7))
        .collect();
    months.into_iter().rev().map(String::from).collect()
}

pub fn compute_stats(bookings: &[Booking], filter: &StatsFilter) -> StatsReport {
    let selected: Vec<&Booking> = bookings
        .iter()
        .filter(|b| {
            filter
                .month
                .as_deref()
                .map_or(true, |month| b.date.starts_with(month))
        })
        .filter(|b| filter.studio.as_deref().map_or(true, |studio| b.studio == studio))
        .collect();

    // photographer -> (count, minutes)
    let mut per_photographer: HashMap<&str, (usize, u32)> = HashMap::new();
    for booking in &selected {
        let entry = per_photographer.entry(booking.photographer.as_str()).or_default();
        entry.0 += 1;
        entry.1 += booking.duration_minutes();
    }

    let total_minutes: u32 = per_photographer.values().map(|(_, minutes)| minutes).sum();
    let total_hours = f64::from(total_minutes) / 60.0;

    let mut rows: Vec<PhotographerStats> = per_photographer
        .into_iter()
        .map(|(photographer, (count, minutes))| {
            let hours = f64::from(minutes) / 60.0;
            PhotographerStats {
                rank: 0,
                photographer: photographer.to_string(),
                count,
                total_hours: hours,
                avg_hours: hours / count as f64,
                share_percent: if total_minutes > 0 {
                    f64::from(minutes) / f64::from(total_minutes) * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_hours
            .total_cmp(&a.total_hours)
            .then_with(|| a.photographer.cmp(&b.photographer))
    });
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }

    StatsReport {
        total_bookings: selected.len(),
        total_hours,
        photographers: rows.len(),
        rows,
    }
}
