//! Sign-in against a fixed roster with locally stored password overrides.
//!
//! This is a convenience gate for a shared front end, not a security
//! boundary: the booking store trusts whoever calls it.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::{ClientError, Result};
use crate::local_storage::{
    LocalStorage, CURRENT_USER_KEY, CUSTOM_PASSWORDS_KEY, REMEMBER_ME_KEY, REMINDER_ENABLED_KEY,
    SAVED_PASSWORD_KEY, SAVED_USERNAME_KEY,
};

pub const MIN_PASSWORD_LEN: usize = 4;
const GUEST_PREFIX: &str = "Guest";

/// Source of the default password for each known user.
pub trait CredentialCheck: Send + Sync {
    /// `None` for users that may not sign in at all.
    fn default_password(&self, user: &str) -> Option<String>;
}

/// Roster held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new<I, U, P>(users: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(user, password)| (user.into(), password.into()))
                .collect(),
        }
    }

    /// Every name shares one initial password.
    pub fn with_shared_password<I, U>(names: I, password: &str) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self::new(names.into_iter().map(|name| (name, password.to_string())))
    }
}

impl CredentialCheck for StaticCredentials {
    fn default_password(&self, user: &str) -> Option<String> {
        self.users.get(user).cloned()
    }
}

/// Login state persisted in local storage.
pub struct Authenticator {
    storage: LocalStorage,
    credentials: Box<dyn CredentialCheck>,
}

impl Authenticator {
    pub fn new(storage: LocalStorage, credentials: Box<dyn CredentialCheck>) -> Self {
        Self {
            storage,
            credentials,
        }
    }

    fn custom_passwords(&self) -> Result<HashMap<String, String>> {
        Ok(self.storage.get(CUSTOM_PASSWORDS_KEY)?.unwrap_or_default())
    }

    /// Override first, roster second. `None` if the user is not on the roster.
    fn expected_password(&self, user: &str) -> Result<Option<String>> {
        let Some(default) = self.credentials.default_password(user) else {
            return Ok(None);
        };
        Ok(Some(self.custom_passwords()?.remove(user).unwrap_or(default)))
    }

    pub fn current_user(&self) -> Result<Option<String>> {
        self.storage.get(CURRENT_USER_KEY)
    }

    pub fn login(&self, name: &str, password: &str, remember: bool) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::Auth("please enter a user name".to_string()));
        }
        if password.is_empty() {
            return Err(ClientError::Auth("please enter a password".to_string()));
        }

        match self.expected_password(name)? {
            Some(expected) if expected == password => {}
            _ => {
                warn!("Failed login for {}", name);
                return Err(ClientError::Auth("wrong user name or password".to_string()));
            }
        }

        self.storage.set(CURRENT_USER_KEY, name)?;
        if remember {
            self.storage.set(SAVED_USERNAME_KEY, name)?;
            self.storage.set(SAVED_PASSWORD_KEY, password)?;
            self.storage.set(REMEMBER_ME_KEY, &true)?;
        } else {
            self.forget_saved_login()?;
        }

        info!("{} signed in", name);
        Ok(name.to_string())
    }

    /// Resume the stored session, or sign in again with remembered credentials.
    pub fn auto_login(&self) -> Result<Option<String>> {
        if let Some(user) = self.current_user()? {
            return Ok(Some(user));
        }

        let remember: bool = self.storage.get(REMEMBER_ME_KEY)?.unwrap_or(false);
        let username: Option<String> = self.storage.get(SAVED_USERNAME_KEY)?;
        let password: Option<String> = self.storage.get(SAVED_PASSWORD_KEY)?;

        match (remember, username, password) {
            (true, Some(username), Some(password)) => self.login(&username, &password, true).map(Some),
            _ => Ok(None),
        }
    }

    /// Sign in as `Guest<n>` with a random n below 10000.
    pub fn guest_login(&self) -> Result<String> {
        let number = uuid::Uuid::new_v4().as_u128() % 10_000;
        let name = format!("{}{}", GUEST_PREFIX, number);
        self.storage.set(CURRENT_USER_KEY, &name)?;
        info!("{} signed in", name);
        Ok(name)
    }

    pub fn change_password(&self, user: &str, current: &str, new: &str, confirm: &str) -> Result<()> {
        if current.is_empty() {
            return Err(ClientError::Auth("please enter the current password".to_string()));
        }
        if self.expected_password(user)?.as_deref() != Some(current) {
            return Err(ClientError::Auth("current password is wrong".to_string()));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::Auth(format!(
                "new password needs at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if new != confirm {
            return Err(ClientError::Auth("passwords do not match".to_string()));
        }

        let mut passwords = self.custom_passwords()?;
        passwords.insert(user.to_string(), new.to_string());
        self.storage.set(CUSTOM_PASSWORDS_KEY, &passwords)?;
        info!("Password changed for {}", user);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.storage.remove(CURRENT_USER_KEY)
    }

    fn forget_saved_login(&self) -> Result<()> {
        self.storage.remove(SAVED_USERNAME_KEY)?;
        self.storage.remove(SAVED_PASSWORD_KEY)?;
        self.storage.remove(REMEMBER_ME_KEY)
    }

    pub fn reminder_enabled(&self) -> Result<bool> {
        Ok(self.storage.get(REMINDER_ENABLED_KEY)?.unwrap_or(false))
    }

    pub fn set_reminder_enabled(&self, enabled: bool) -> Result<()> {
        self.storage.set(REMINDER_ENABLED_KEY, &enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn authenticator(temp: &TempDir) -> Authenticator {
        let storage = LocalStorage::open(temp.path()).unwrap();
        let credentials = StaticCredentials::with_shared_password(["X", "Y", "admin"], "123456");
        Authenticator::new(storage, Box::new(credentials))
    }

    #[test]
    fn test_login() {
        let temp = TempDir::new().unwrap();
        let auth = authenticator(&temp);

        assert!(matches!(auth.login("X", "wrong", false), Err(ClientError::Auth(_))));
        assert!(matches!(auth.login("nobody", "123456", false), Err(ClientError::Auth(_))));
        assert!(matches!(auth.login("  ", "123456", false), Err(ClientError::Auth(_))));
        assert_eq!(auth.current_user().unwrap(), None);

        assert_eq!(auth.login(" X ", "123456", false).unwrap(), "X");
        assert_eq!(auth.current_user().unwrap().as_deref(), Some("X"));

        auth.logout().unwrap();
        assert_eq!(auth.current_user().unwrap(), None);
        assert_eq!(auth.auto_login().unwrap(), None);
    }

    #[test]
    fn test_remember_me_auto_login() {
        let temp = TempDir::new().unwrap();
        let auth = authenticator(&temp);

        auth.login("Y", "123456", true).unwrap();
        auth.logout().unwrap();

        let reopened = authenticator(&temp);
        assert_eq!(reopened.auto_login().unwrap().as_deref(), Some("Y"));

        // Signing in without "remember me" forgets the saved credentials
        reopened.login("Y", "123456", false).unwrap();
        reopened.logout().unwrap();
        assert_eq!(reopened.auto_login().unwrap(), None);
    }

    #[test]
    fn test_change_password() {
        let temp = TempDir::new().unwrap();
        let auth = authenticator(&temp);

        assert!(auth.change_password("X", "bad", "abcd", "abcd").is_err());
        assert!(auth.change_password("X", "123456", "abc", "abc").is_err());
        assert!(auth.change_password("X", "123456", "abcd", "abce").is_err());

        auth.change_password("X", "123456", "abcd", "abcd").unwrap();

        assert!(auth.login("X", "123456", false).is_err());
        auth.login("X", "abcd", false).unwrap();
        // Other users keep the roster password
        auth.login("Y", "123456", false).unwrap();
    }

    #[test]
    fn test_guest_and_reminder_preference() {
        let temp = TempDir::new().unwrap();
        let auth = authenticator(&temp);

        let guest = auth.guest_login().unwrap();
        let number: u32 = guest.strip_prefix("Guest").unwrap().parse().unwrap();
        assert!(number < 10_000);
        assert_eq!(auth.current_user().unwrap(), Some(guest));

        assert!(!auth.reminder_enabled().unwrap());
        auth.set_reminder_enabled(true).unwrap();
        assert!(auth.reminder_enabled().unwrap());
    }
}
