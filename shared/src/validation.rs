//! Draft validation shared by the store and the client pre-check.

use crate::schedule::{is_valid_date, ClockTime, TimeRange};
use crate::{Booking, BookingDraft, CreatedAt};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid {field} `{value}`, expected HH:MM")]
    InvalidTime { field: &'static str, value: String },
    #[error("end time must be later than start time")]
    EndNotAfterStart,
    #[error("unknown studio `{0}`")]
    UnknownStudio(String),
}

/// Knobs that differ between deployments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRules {
    /// Reject drafts without a contact.
    pub require_contact: bool,
    /// When set, only these studio names are accepted.
    pub studios: Option<Vec<String>>,
}

/// A draft that passed every check, with its times already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBooking {
    pub id: String,
    pub studio: String,
    pub date: String,
    pub range: TimeRange,
    pub photographer: String,
    pub contact: Option<String>,
    pub note: Option<String>,
    pub created_at: Option<CreatedAt>,
}

impl ValidBooking {
    /// Finish the booking, keeping a supplied creation time or using `fallback`.
    pub fn into_booking(self, fallback: impl FnOnce() -> CreatedAt) -> Booking {
        Booking {
            id: self.id,
            studio: self.studio,
            date: self.date,
            start_time: self.range.start().to_string(),
            end_time: self.range.end().to_string(),
            photographer: self.photographer,
            contact: self.contact,
            note: self.note,
            created_at: self.created_at.unwrap_or_else(fallback),
        }
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn parse_time(value: &str, field: &'static str) -> Result<ClockTime, ValidationError> {
    ClockTime::parse(value).ok_or_else(|| ValidationError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

/// Check presence, formats and ordering of a draft.
pub fn validate_draft(
    draft: &BookingDraft,
    rules: &ValidationRules,
) -> Result<ValidBooking, ValidationError> {
    let id = required(&draft.id, "id")?;
    let studio = required(&draft.studio, "studio")?;
    let date = required(&draft.date, "date")?;
    let start_time = required(&draft.start_time, "startTime")?;
    let end_time = required(&draft.end_time, "endTime")?;
    let photographer = required(&draft.photographer, "photographer")?;
    let contact = if rules.require_contact {
        Some(required(&draft.contact, "contact")?)
    } else {
        optional(&draft.contact)
    };

    if !is_valid_date(&date) {
        return Err(ValidationError::InvalidDate(date));
    }
    let start = parse_time(&start_time, "startTime")?;
    let end = parse_time(&end_time, "endTime")?;
    let range = TimeRange::new(start, end).ok_or(ValidationError::EndNotAfterStart)?;

    if let Some(studios) = &rules.studios {
        if !studios.iter().any(|s| s == &studio) {
            return Err(ValidationError::UnknownStudio(studio));
        }
    }

    Ok(ValidBooking {
        id,
        studio,
        date,
        range,
        photographer,
        contact,
        note: optional(&draft.note),
        created_at: draft.created_at.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BookingDraft {
        BookingDraft {
            id: Some("1".to_string()),
            studio: Some("A".to_string()),
            date: Some("2026-01-28".to_string()),
            start_time: Some("10:00".to_string()),
            end_time: Some("12:00".to_string()),
            photographer: Some("X".to_string()),
            ..BookingDraft::default()
        }
    }

    #[test]
    fn test_valid_draft() {
        let valid = validate_draft(&draft(), &ValidationRules::default()).unwrap();
        assert_eq!(valid.range.duration_minutes(), 120);
        assert!(valid.contact.is_none());

        let booking = valid.into_booking(|| CreatedAt::Text("now".to_string()));
        assert_eq!(booking.start_time, "10:00");
        assert_eq!(booking.created_at, CreatedAt::Text("now".to_string()));
    }

    #[test]
    fn test_missing_and_blank_fields() {
        let mut d = draft();
        d.photographer = None;
        assert_eq!(
            validate_draft(&d, &ValidationRules::default()),
            Err(ValidationError::MissingField("photographer"))
        );

        let mut d = draft();
        d.studio = Some("   ".to_string());
        assert_eq!(
            validate_draft(&d, &ValidationRules::default()),
            Err(ValidationError::MissingField("studio"))
        );
    }

    #[test]
    fn test_contact_required_in_strict_mode() {
        let rules = ValidationRules {
            require_contact: true,
            ..ValidationRules::default()
        };
        assert_eq!(
            validate_draft(&draft(), &rules),
            Err(ValidationError::MissingField("contact"))
        );

        let mut d = draft();
        d.contact = Some("13800138000".to_string());
        assert!(validate_draft(&d, &rules).is_ok());
    }

    #[test]
    fn test_format_errors() {
        let mut d = draft();
        d.date = Some("2026/01/28".to_string());
        assert!(matches!(
            validate_draft(&d, &ValidationRules::default()),
            Err(ValidationError::InvalidDate(_))
        ));

        let mut d = draft();
        d.start_time = Some("9:00".to_string());
        assert!(matches!(
            validate_draft(&d, &ValidationRules::default()),
            Err(ValidationError::InvalidTime { field: "startTime", .. })
        ));
    }

    #[test]
    fn test_start_must_precede_end() {
        let mut d = draft();
        d.start_time = Some("13:00".to_string());
        d.end_time = Some("12:00".to_string());
        assert_eq!(
            validate_draft(&d, &ValidationRules::default()),
            Err(ValidationError::EndNotAfterStart)
        );

        d.start_time = Some("12:00".to_string());
        assert_eq!(
            validate_draft(&d, &ValidationRules::default()),
            Err(ValidationError::EndNotAfterStart)
        );
    }

    #[test]
    fn test_studio_allow_list() {
        let rules = ValidationRules {
            studios: Some(vec!["Studio 1".to_string(), "Studio 2".to_string()]),
            ..ValidationRules::default()
        };
        assert_eq!(
            validate_draft(&draft(), &rules),
            Err(ValidationError::UnknownStudio("A".to_string()))
        );
    }
}
