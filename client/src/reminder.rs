//! Start-time reminders for the signed-in photographer.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use shared::{date_only, Booking, ClockTime};
use tracing::info;

/// Minutes before start at which the "starting soon" reminder appears
pub const LEAD_MINUTES: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub booking_id: String,
    pub title: String,
    pub body: String,
}

/// Result of one reminder pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderUpdate {
    /// Text for the persistent banner; `None` hides it
    pub banner: Option<String>,
    /// One-shot notification, delivered at most once per key and session
    pub notification: Option<Notification>,
}

/// Receives reminder output; a UI shows banners and pops notifications.
pub trait Notifier: Send + Sync {
    fn show_banner(&self, text: Option<&str>);

    fn notify(&self, notification: &Notification);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_banner(&self, text: Option<&str>) {
        if let Some(text) = text {
            info!("Reminder: {}", text);
        }
    }

    fn notify(&self, notification: &Notification) {
        info!("{}: {}", notification.title, notification.body);
    }
}

/// Keys of notifications already sent this session (`{id}_start`, `{id}_5min`).
#[derive(Debug, Clone, Default)]
pub struct ReminderState {
    notified: HashSet<String>,
}

impl ReminderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_notified(&self, key: &str) -> bool {
        self.notified.contains(key)
    }

    pub fn reset(&mut self) {
        self.notified.clear();
    }

    /// Look at today's bookings of `user`; the first ongoing or imminent one
    /// decides the banner.
    pub fn check(&mut self, bookings: &[Booking], user: &str, now: NaiveDateTime) -> ReminderUpdate {
        let today = now.date().format("%Y-%m-%d").to_string();
        let current = i32::from(ClockTime::from_naive_time(now.time()).minutes());

        for booking in bookings
            .iter()
            .filter(|b| b.is_owned_by(user) && date_only(&b.date) == today)
        {
            let Some(range) = booking.time_range() else {
                continue;
            };
            let start = i32::from(range.start().minutes());
            let end = i32::from(range.end().minutes());
            let until_start = start - current;

            if current >= start && current < end {
                let banner = format!(
                    "Your booking in {} is in progress, {} minutes left",
                    booking.studio,
                    end - current
                );
                // Only within the first minute after start
                let notification = if until_start >= -1 {
                    self.once(format!("{}_start", booking.id), || Notification {
                        booking_id: booking.id.clone(),
                        title: "Booking started".to_string(),
                        body: format!("Your booking in {} starts now", booking.studio),
                    })
                } else {
                    None
                };
                return ReminderUpdate {
                    banner: Some(banner),
                    notification,
                };
            }

            if until_start > 0 && until_start <= LEAD_MINUTES {
                let banner = format!(
                    "Your booking in {} starts in {} minutes ({}-{})",
                    booking.studio, until_start, booking.start_time, booking.end_time
                );
                let notification = self.once(format!("{}_5min", booking.id), || Notification {
                    booking_id: booking.id.clone(),
                    title: "Booking starting soon".to_string(),
                    body: format!("Your booking in {} starts in {} minutes", booking.studio, until_start),
                });
                return ReminderUpdate {
                    banner: Some(banner),
                    notification,
                };
            }
        }

        ReminderUpdate::default()
    }

    fn once(&mut self, key: String, build: impl FnOnce() -> Notification) -> Option<Notification> {
        self.notified.insert(key).then(build)
    }

    /// Run a pass and hand the result to `notifier`.
    pub fn check_and_notify(
        &mut self,
        bookings: &[Booking],
        user: &str,
        now: NaiveDateTime,
        notifier: &dyn Notifier,
    ) -> ReminderUpdate {
        let update = self.check(bookings, user, now);
        notifier.show_banner(update.banner.as_deref());
        if let Some(notification) = &update.notification {
            notifier.notify(notification);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::CreatedAt;
    use std::sync::Mutex;

    fn booking(id: &str, start: &str, end: &str, user: &str) -> Booking {
        Booking {
            id: id.to_string(),
            studio: "Studio 1".to_string(),
            date: "2026-01-28".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            photographer: user.to_string(),
            contact: None,
            note: None,
            created_at: CreatedAt::Millis(0),
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 28)
            .unwrap()
            .and_hms_opt(hour, minute, 30)
            .unwrap()
    }

    #[test]
    fn test_soon_reminder_fires_once() {
        let bookings = vec![booking("1", "10:00", "12:00", "X")];
        let mut state = ReminderState::new();

        let first = state.check(&bookings, "X", at(9, 57));
        assert_eq!(
            first.banner.as_deref(),
            Some("Your booking in Studio 1 starts in 3 minutes (10:00-12:00)")
        );
        assert_eq!(first.notification.map(|n| n.title), Some("Booking starting soon".to_string()));
        assert!(state.was_notified("1_5min"));

        let second = state.check(&bookings, "X", at(9, 58));
        assert!(second.banner.is_some());
        assert!(second.notification.is_none());
    }

    #[test]
    fn test_started_notification_window() {
        let bookings = vec![booking("1", "10:00", "12:00", "X")];
        let mut state = ReminderState::new();

        let started = state.check(&bookings, "X", at(10, 1));
        assert_eq!(
            started.banner.as_deref(),
            Some("Your booking in Studio 1 is in progress, 119 minutes left")
        );
        assert!(started.notification.is_some());

        // Later in the booking only the banner remains
        let mut late = ReminderState::new();
        let update = late.check(&bookings, "X", at(10, 2));
        assert!(update.banner.is_some());
        assert!(update.notification.is_none());
    }

    #[test]
    fn test_no_reminder_outside_window() {
        let bookings = vec![
            booking("1", "10:00", "12:00", "X"),
            booking("2", "09:00", "09:30", "Y"),
        ];
        let mut state = ReminderState::new();

        assert_eq!(state.check(&bookings, "X", at(9, 54)), ReminderUpdate::default());
        assert_eq!(state.check(&bookings, "X", at(12, 0)), ReminderUpdate::default());
        // Someone else's booking never reminds
        assert_eq!(state.check(&bookings, "X", at(9, 10)), ReminderUpdate::default());
    }

    #[derive(Default)]
    struct RecordingNotifier {
        banners: Mutex<Vec<Option<String>>>,
        notifications: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn show_banner(&self, text: Option<&str>) {
            self.banners.lock().unwrap().push(text.map(String::from));
        }

        fn notify(&self, notification: &Notification) {
            self.notifications.lock().unwrap().push(notification.clone());
        }
    }

    #[test]
    fn test_check_and_notify_forwards() {
        let bookings = vec![booking("1", "10:00", "12:00", "X")];
        let notifier = RecordingNotifier::default();
        let mut state = ReminderState::new();

        state.check_and_notify(&bookings, "X", at(9, 56), &notifier);
        state.check_and_notify(&bookings, "X", at(9, 57), &notifier);
        state.check_and_notify(&bookings, "X", at(13, 0), &notifier);

        assert_eq!(notifier.notifications.lock().unwrap().len(), 1);
        let banners = notifier.banners.lock().unwrap();
        assert_eq!(banners.len(), 3);
        assert!(banners[2].is_none());
    }
}
