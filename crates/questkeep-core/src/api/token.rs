//! Storage for the single opaque backend token.

use std::sync::Mutex;

use crate::error::TokenStoreError;

/// Where the bearer token lives between runs.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, TokenStoreError>;
    fn set(&self, token: &str) -> Result<(), TokenStoreError>;
    /// Removing a missing token is not an error.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// OS keyring backed store.
pub struct KeyringTokenStore {
    service: String,
    account: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new("questkeep", "api_token")
    }
}

impl KeyringTokenStore {
    pub fn new(service: &str, account: &str) -> Self {
        Self {
            service: service.to_string(),
            account: account.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, TokenStoreError> {
        Ok(keyring::Entry::new(&self.service, &self.account)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<String>, TokenStoreError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for tests and one-off sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.slot().clone())
    }

    fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot() = None;
        Ok(())
    }
}
