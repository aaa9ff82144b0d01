use anyhow::{anyhow, Context, Result};
use keyring::Entry;
use tracing::debug;

use super::token::{TokenStore, TOKEN_KEY};

pub const SERVICE_NAME: &str = "todoauth";

/// Token kept in the OS keychain under service `todoauth`, user `jwt`.
///
/// The entry is created once and reused, so a backend that keeps state per
/// entry sees every save, load and clear on the same handle.
pub struct KeyringTokenStore {
    service: String,
    entry: Entry,
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>) -> Result<Self> {
        let service = service.into();
        let entry = Entry::new(&service, TOKEN_KEY).context("Failed to create keyring entry")?;
        Ok(Self { service, entry })
    }

    pub fn default_service() -> Result<Self> {
        Self::new(SERVICE_NAME)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(anyhow!("Failed to read token from keychain: {}", e)),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry
            .set_password(token)
            .context("Failed to store token in keychain")?;
        debug!(service = %self.service, "Token saved to keychain");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(anyhow!("Failed to delete token from keychain: {}", e)),
        }
    }
}
