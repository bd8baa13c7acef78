use serde::{Deserialize, Serialize};
use std::fmt;

pub mod schedule;
pub mod status;
pub mod validation;

pub use schedule::{date_only, find_conflict, is_valid_date, ClockTime, TimeRange};
pub use status::{booking_status, BookingStatus};
pub use validation::{validate_draft, ValidBooking, ValidationError, ValidationRules};

/// A reserved interval for one studio on one date, owned by a photographer.
///
/// Field names go over the wire in camelCase (`startTime`, `createdAt`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Opaque client-generated identifier (usually an epoch-millis string)
    pub id: String,
    pub studio: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Wall-clock start, `HH:MM`
    pub start_time: String,
    /// Wall-clock end, `HH:MM`, strictly after `start_time`
    pub end_time: String,
    /// Display name of the owning photographer
    pub photographer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, alias = "notes", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: CreatedAt,
}

impl Booking {
    /// Parsed `[start, end)` range, if both times are well formed.
    pub fn time_range(&self) -> Option<TimeRange> {
        let start = ClockTime::parse(&self.start_time)?;
        let end = ClockTime::parse(&self.end_time)?;
        TimeRange::new(start, end)
    }

    /// Length of the booking in minutes; zero for malformed rows.
    pub fn duration_minutes(&self) -> u32 {
        self.time_range()
            .map(|range| range.duration_minutes())
            .unwrap_or(0)
    }

    pub fn is_owned_by(&self, user: &str) -> bool {
        self.photographer == user
    }
}

/// Creation timestamp. The store assigns RFC 3339 text; clients that mirror
/// the browser app send epoch milliseconds, which are kept as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    Millis(i64),
    Text(String),
}

impl CreatedAt {
    pub fn now() -> Self {
        CreatedAt::Text(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }

    pub fn now_millis() -> Self {
        CreatedAt::Millis(chrono::Utc::now().timestamp_millis())
    }

    /// Rebuild from the single text column used for persistence.
    pub fn from_stored(raw: &str) -> Self {
        let is_millis = !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit());
        match raw.parse::<i64>() {
            Ok(millis) if is_millis => CreatedAt::Millis(millis),
            _ => CreatedAt::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for CreatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreatedAt::Millis(millis) => write!(f, "{}", millis),
            CreatedAt::Text(text) => f.write_str(text),
        }
    }
}

/// Body of `POST /api/bookings`.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub photographer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, alias = "notes", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<CreatedAt>,
}

impl From<Booking> for BookingDraft {
    fn from(booking: Booking) -> Self {
        Self {
            id: Some(booking.id),
            studio: Some(booking.studio),
            date: Some(booking.date),
            start_time: Some(booking.start_time),
            end_time: Some(booking.end_time),
            photographer: Some(booking.photographer),
            contact: booking.contact,
            note: booking.note,
            created_at: Some(booking.created_at),
        }
    }
}

/// Body of `PUT /api/bookings/:id`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photographer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, alias = "notes", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BookingUpdate {
    /// Overlay the present fields on an existing booking, producing a draft
    /// that keeps the original id and creation time.
    pub fn apply_to(&self, existing: &Booking) -> BookingDraft {
        let pick = |new: &Option<String>, old: &str| Some(new.clone().unwrap_or_else(|| old.to_string()));
        BookingDraft {
            id: Some(existing.id.clone()),
            studio: pick(&self.studio, &existing.studio),
            date: pick(&self.date, &existing.date),
            start_time: pick(&self.start_time, &existing.start_time),
            end_time: pick(&self.end_time, &existing.end_time),
            photographer: pick(&self.photographer, &existing.photographer),
            contact: self.contact.clone().or_else(|| existing.contact.clone()),
            note: self.note.clone().or_else(|| existing.note.clone()),
            created_at: Some(existing.created_at.clone()),
        }
    }
}

/// Error body used by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    pub message: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_booking() -> Booking {
        Booking {
            id: "1769580000000".to_string(),
            studio: "A".to_string(),
            date: "2026-01-28".to_string(),
            start_time: "10:00".to_string(),
            end_time: "12:00".to_string(),
            photographer: "X".to_string(),
            contact: None,
            note: Some("catalogue shoot".to_string()),
            created_at: CreatedAt::Millis(1769580000000),
        }
    }

    #[test]
    fn test_booking_uses_camel_case_on_the_wire() {
        let value = serde_json::to_value(sample_booking()).unwrap();
        assert_eq!(value["startTime"], "10:00");
        assert_eq!(value["endTime"], "12:00");
        assert_eq!(value["createdAt"], 1769580000000i64);
        assert!(value.get("contact").is_none());
    }

    #[test]
    fn test_notes_alias_is_accepted() {
        let booking: Booking = serde_json::from_value(json!({
            "id": "1",
            "studio": "A",
            "date": "2026-01-28",
            "startTime": "10:00",
            "endTime": "11:00",
            "photographer": "X",
            "notes": "from the strict variant",
            "createdAt": "2026-01-01T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(booking.note.as_deref(), Some("from the strict variant"));
        assert_eq!(
            booking.created_at,
            CreatedAt::Text("2026-01-01T00:00:00.000Z".to_string())
        );
    }

    #[test]
    fn test_created_at_from_stored() {
        assert_eq!(CreatedAt::from_stored("1769580000000"), CreatedAt::Millis(1769580000000));
        assert_eq!(
            CreatedAt::from_stored("2026-01-28T10:00:00Z"),
            CreatedAt::Text("2026-01-28T10:00:00Z".to_string())
        );
        assert_eq!(CreatedAt::from_stored(""), CreatedAt::Text(String::new()));
        assert_eq!(CreatedAt::from_stored("-5"), CreatedAt::Text("-5".to_string()));
    }

    #[test]
    fn test_draft_tolerates_missing_fields() {
        let draft: BookingDraft = serde_json::from_value(json!({ "studio": "A" })).unwrap();
        assert_eq!(draft.studio.as_deref(), Some("A"));
        assert!(draft.id.is_none());
        assert!(draft.created_at.is_none());
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let existing = sample_booking();
        let update = BookingUpdate {
            end_time: Some("13:00".to_string()),
            ..BookingUpdate::default()
        };

        let draft = update.apply_to(&existing);

        assert_eq!(draft.id.as_deref(), Some("1769580000000"));
        assert_eq!(draft.start_time.as_deref(), Some("10:00"));
        assert_eq!(draft.end_time.as_deref(), Some("13:00"));
        assert_eq!(draft.note.as_deref(), Some("catalogue shoot"));
        assert_eq!(draft.created_at, Some(CreatedAt::Millis(1769580000000)));
    }

    #[test]
    fn test_duration_and_ownership() {
        let booking = sample_booking();
        assert_eq!(booking.duration_minutes(), 120);
        assert!(booking.is_owned_by("X"));
        assert!(!booking.is_owned_by("Y"));
    }
}
