//! A signed-in client: cache, credentials and the background tasks.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use shared::{Booking, BookingDraft, ValidationRules};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::auth::{Authenticator, CredentialCheck};
use crate::cache::{new_draft, BookingCache};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::local_storage::LocalStorage;
use crate::reminder::{Notifier, ReminderState, ReminderUpdate};
use crate::source::{BookingSource, LocalSource, RemoteSource};
use crate::tasks::PeriodicTask;
use crate::views::{display_dates, list_by_studio, BookingFilter, DateRange};

pub struct Session {
    config: ClientConfig,
    source: Arc<dyn BookingSource>,
    cache: Arc<RwLock<BookingCache>>,
    reminders: Arc<Mutex<ReminderState>>,
    notifier: Arc<dyn Notifier>,
    auth: Authenticator,
    user: Option<String>,
    refresh_task: Option<PeriodicTask>,
    reminder_task: Option<PeriodicTask>,
}

impl Session {
    /// Pick the booking source from the configuration: REST in cloud mode,
    /// the local storage directory otherwise.
    pub fn new(
        config: ClientConfig,
        credentials: Box<dyn CredentialCheck>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let storage = LocalStorage::open(&config.storage_dir)?;
        let source: Arc<dyn BookingSource> = match &config.api_base_url {
            Some(url) => Arc::new(RemoteSource::new(ApiClient::with_base_url(url.clone())?)),
            None => Arc::new(LocalSource::new(storage.clone())),
        };
        Ok(Self::with_source(config, storage, source, credentials, notifier))
    }

    pub fn with_source(
        config: ClientConfig,
        storage: LocalStorage,
        source: Arc<dyn BookingSource>,
        credentials: Box<dyn CredentialCheck>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            source,
            cache: Arc::new(RwLock::new(BookingCache::new(ValidationRules::default()))),
            reminders: Arc::new(Mutex::new(ReminderState::new())),
            notifier,
            auth: Authenticator::new(storage, credentials),
            user: None,
            refresh_task: None,
            reminder_task: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Shared handle for views and for callers that render the cache.
    pub fn cache(&self) -> Arc<RwLock<BookingCache>> {
        Arc::clone(&self.cache)
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_task.as_ref().is_some_and(PeriodicTask::is_running)
    }

    pub fn is_reminding(&self) -> bool {
        self.reminder_task.as_ref().is_some_and(PeriodicTask::is_running)
    }

    fn require_user(&self) -> Result<&str> {
        self.user
            .as_deref()
            .ok_or_else(|| ClientError::Auth("not signed in".to_string()))
    }

    /// Continue a stored session or remembered login, if any.
    pub async fn resume(&mut self) -> Result<Option<String>> {
        match self.auth.auto_login()? {
            Some(user) => {
                self.start(user.clone()).await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub async fn login(&mut self, name: &str, password: &str, remember: bool) -> Result<()> {
        let user = self.auth.login(name, password, remember)?;
        self.start(user).await
    }

    pub async fn guest_login(&mut self) -> Result<String> {
        let user = self.auth.guest_login()?;
        self.start(user.clone()).await?;
        Ok(user)
    }

    async fn start(&mut self, user: String) -> Result<()> {
        self.stop_tasks().await;
        self.reminders.lock().await.reset();
        self.user = Some(user);

        // A failed first load is reported by the refresh itself; the session
        // still starts and the next refresh may succeed.
        if let Err(e) = self.refresh().await {
            warn!("Initial load failed: {}", e);
        }

        if self.source.is_remote() {
            self.refresh_task = Some(self.spawn_refresh_task());
        }
        if self.auth.reminder_enabled()? {
            self.reminder_task = Some(self.spawn_reminder_task()?);
        }
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<()> {
        self.stop_tasks().await;
        self.auth.logout()?;
        if let Some(user) = self.user.take() {
            info!("{} signed out", user);
        }
        Ok(())
    }

    async fn stop_tasks(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.stop().await;
        }
        if let Some(task) = self.reminder_task.take() {
            task.stop().await;
        }
    }

    fn spawn_refresh_task(&self) -> PeriodicTask {
        let cache = Arc::clone(&self.cache);
        let source = Arc::clone(&self.source);
        PeriodicTask::spawn("booking refresh", self.config.refresh_interval, move || {
            let cache = Arc::clone(&cache);
            let source = Arc::clone(&source);
            async move {
                let fetched = source.fetch_all().await;
                if let Err(e) = cache.write().await.apply_fetch(fetched) {
                    warn!("Periodic refresh failed: {}", e);
                }
            }
        })
    }

    fn spawn_reminder_task(&self) -> Result<PeriodicTask> {
        let user = self.require_user()?.to_string();
        let cache = Arc::clone(&self.cache);
        let reminders = Arc::clone(&self.reminders);
        let notifier = Arc::clone(&self.notifier);
        Ok(PeriodicTask::spawn("reminder check", self.config.reminder_interval, move || {
            let cache = Arc::clone(&cache);
            let reminders = Arc::clone(&reminders);
            let notifier = Arc::clone(&notifier);
            let user = user.clone();
            async move {
                let cache = cache.read().await;
                let mut state = reminders.lock().await;
                state.check_and_notify(cache.bookings(), &user, Local::now().naive_local(), notifier.as_ref());
            }
        }))
    }

    /// Fetch without holding the cache, then swap the result in.
    pub async fn refresh(&self) -> Result<usize> {
        let fetched = self.source.fetch_all().await;
        self.cache.write().await.apply_fetch(fetched)
    }

    async fn reload_after_write(&self) {
        let fetched = self.source.fetch_all().await;
        self.cache.write().await.apply_reload(fetched);
    }

    /// Book a slot for the signed-in photographer.
    pub async fn book(
        &self,
        studio: &str,
        date: &str,
        start_time: &str,
        end_time: &str,
        note: Option<&str>,
    ) -> Result<Booking> {
        let user = self.require_user()?;
        let draft = new_draft(user, studio, date, start_time, end_time, note);
        self.submit(draft).await
    }

    pub async fn submit(&self, draft: BookingDraft) -> Result<Booking> {
        self.require_user()?;
        let booking = self.cache.read().await.prepare(draft)?;
        self.source.create(&booking).await?;
        info!("Booked {} {} {}-{}", booking.studio, booking.date, booking.start_time, booking.end_time);

        self.cache.write().await.record_created(booking.clone());
        self.reload_after_write().await;
        Ok(booking)
    }

    /// Cancel one of the signed-in photographer's bookings.
    pub async fn cancel(&self, id: &str) -> Result<()> {
        let user = self.require_user()?;
        self.cache.read().await.check_cancel(id, user)?;
        self.source.delete(id).await?;
        info!("Cancelled booking {}", id);

        self.cache.write().await.record_deleted(id);
        self.reload_after_write().await;
        Ok(())
    }

    /// List view for the configured studios, filtered and limited to `range`.
    pub async fn studio_listings(
        &self,
        range: DateRange,
        filter: &BookingFilter,
        today: NaiveDate,
    ) -> Result<Vec<(String, Vec<Booking>)>> {
        let user = self.require_user()?;
        let cache = self.cache.read().await;
        let visible = filter.apply(cache.bookings(), user, today);
        let dates = display_dates(range, today);
        Ok(list_by_studio(&visible, &self.config.studios, &dates)
            .into_iter()
            .map(|column| (column.studio, column.bookings.into_iter().cloned().collect()))
            .collect())
    }

    pub async fn my_bookings(&self) -> Result<Vec<Booking>> {
        let user = self.require_user()?;
        Ok(self.cache.read().await.my_bookings(user).cloned().collect())
    }

    pub fn change_password(&self, current: &str, new: &str, confirm: &str) -> Result<()> {
        let user = self.require_user()?;
        self.auth.change_password(user, current, new, confirm)
    }

    /// Persist the preference and start or stop the reminder task.
    pub async fn set_reminder_enabled(&mut self, enabled: bool) -> Result<()> {
        self.auth.set_reminder_enabled(enabled)?;
        if enabled {
            if self.reminder_task.is_none() && self.user.is_some() {
                self.reminder_task = Some(self.spawn_reminder_task()?);
            }
        } else if let Some(task) = self.reminder_task.take() {
            task.stop().await;
            self.notifier.show_banner(None);
        }
        Ok(())
    }

    /// One reminder pass right now, outside the periodic schedule.
    pub async fn check_reminders(&self) -> Result<ReminderUpdate> {
        let user = self.require_user()?;
        let cache = self.cache.read().await;
        let mut state = self.reminders.lock().await;
        Ok(state.check_and_notify(
            cache.bookings(),
            user,
            Local::now().naive_local(),
            self.notifier.as_ref(),
        ))
    }
}
