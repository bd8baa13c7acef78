use shared::{find_conflict, validate_draft, Booking, BookingDraft, CreatedAt, ValidationRules};
use tracing::{info, warn};

use crate::error::{ClientError, Result};
use crate::source::BookingSource;

/// The client's copy of every booking, sorted by date then start time.
///
/// Views borrow this. When the cache is shared behind a lock, fetch from the
/// source first and hand the result to [`apply_fetch`](Self::apply_fetch) so
/// the lock is never held across a network call.
#[derive(Debug, Clone, Default)]
pub struct BookingCache {
    bookings: Vec<Booking>,
    rules: ValidationRules,
}

impl BookingCache {
    pub fn new(rules: ValidationRules) -> Self {
        Self {
            bookings: Vec::new(),
            rules,
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn get(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bookings.clear();
    }

    /// Replace the cache with the source's full list. A failed fetch leaves
    /// the cache empty.
    pub async fn refresh(&mut self, source: &dyn BookingSource) -> Result<usize> {
        let fetched = source.fetch_all().await;
        self.apply_fetch(fetched)
    }

    /// Install the outcome of a `fetch_all` made without holding the cache.
    pub fn apply_fetch(&mut self, fetched: Result<Vec<Booking>>) -> Result<usize> {
        match fetched {
            Ok(bookings) => {
                self.replace(bookings);
                info!("Loaded {} bookings", self.bookings.len());
                Ok(self.bookings.len())
            }
            Err(e) => {
                warn!("Failed to load bookings: {}", e);
                self.bookings.clear();
                Err(e)
            }
        }
    }

    pub fn replace(&mut self, mut bookings: Vec<Booking>) {
        sort_bookings(&mut bookings);
        self.bookings = bookings;
    }

    /// Validate and pre-check a draft against the cached bookings. The
    /// returned booking is ready to send; the source re-checks on its own.
    pub fn prepare(&self, draft: BookingDraft) -> Result<Booking> {
        let valid = validate_draft(&draft, &self.rules)?;

        if let Some(existing) = find_conflict(&self.bookings, &valid.studio, &valid.date, &valid.range, None) {
            info!("Booking {} conflicts with cached booking {}", valid.id, existing.id);
            return Err(ClientError::conflict());
        }

        Ok(valid.into_booking(CreatedAt::now_millis))
    }

    /// Check that `user` may cancel booking `id`.
    pub fn check_cancel(&self, id: &str, user: &str) -> Result<()> {
        let booking = self
            .get(id)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;
        if !booking.is_owned_by(user) {
            return Err(ClientError::NotOwner);
        }
        Ok(())
    }

    /// Reflect a write the source already accepted.
    pub fn record_created(&mut self, booking: Booking) {
        self.bookings.retain(|b| b.id != booking.id);
        self.bookings.push(booking);
        sort_bookings(&mut self.bookings);
    }

    pub fn record_deleted(&mut self, id: &str) {
        self.bookings.retain(|b| b.id != id);
    }

    /// Install the reload that follows a successful write. A failed reload
    /// keeps the locally recorded write and is only logged.
    pub fn apply_reload(&mut self, fetched: Result<Vec<Booking>>) {
        match fetched {
            Ok(bookings) => self.replace(bookings),
            Err(e) => warn!("Reload after write failed, keeping local copy: {}", e),
        }
    }

    /// Pre-check, write and reload.
    pub async fn submit(&mut self, source: &dyn BookingSource, draft: BookingDraft) -> Result<Booking> {
        let booking = self.prepare(draft)?;
        source.create(&booking).await?;
        info!("Booked {} {} {}-{}", booking.studio, booking.date, booking.start_time, booking.end_time);

        self.record_created(booking.clone());
        let fetched = source.fetch_all().await;
        self.apply_reload(fetched);
        Ok(booking)
    }

    /// Cancel a booking owned by `user`.
    pub async fn delete(&mut self, source: &dyn BookingSource, id: &str, user: &str) -> Result<()> {
        self.check_cancel(id, user)?;
        source.delete(id).await?;
        info!("Cancelled booking {}", id);

        self.record_deleted(id);
        let fetched = source.fetch_all().await;
        self.apply_reload(fetched);
        Ok(())
    }

    /// Bookings owned by `user`, in cache order
    pub fn my_bookings<'a>(&'a self, user: &'a str) -> impl Iterator<Item = &'a Booking> + 'a {
        self.bookings.iter().filter(move |b| b.is_owned_by(user))
    }
}

pub fn sort_bookings(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
}

/// Draft for `user` with a fresh epoch-millis id.
pub fn new_draft(
    user: &str,
    studio: &str,
    date: &str,
    start_time: &str,
    end_time: &str,
    note: Option<&str>,
) -> BookingDraft {
    BookingDraft {
        id: Some(chrono::Utc::now().timestamp_millis().to_string()),
        studio: Some(studio.to_string()),
        date: Some(date.to_string()),
        start_time: Some(start_time.to_string()),
        end_time: Some(end_time.to_string()),
        photographer: Some(user.to_string()),
        contact: None,
        note: note.map(str::trim).filter(|n| !n.is_empty()).map(String::from),
        created_at: None,
    }
}
