//! High-level API for the session and house cache.

use crate::{CacheKeys, KeyValueStore, StorageResult};
use hearth_models::{House, User};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Typed accessors over the raw key-value store.
///
/// Deserialization failures on reads are logged and surfaced as `None`
/// rather than errors: every cached value here is advisory and is
/// revalidated against the server before being trusted.
pub struct CacheManager {
    storage: Box<dyn KeyValueStore>,
}

impl CacheManager {
    /// Create a new cache manager with the given storage backend.
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.storage.get(key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    // ==========================================
    // Session bundle
    // ==========================================

    /// Store the bearer token.
    pub fn set_auth_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(CacheKeys::AUTH_TOKEN, token)
    }

    /// Retrieve the bearer token.
    pub fn get_auth_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(CacheKeys::AUTH_TOKEN)
    }

    /// Store the user profile.
    pub fn set_user(&self, user: &User) -> StorageResult<()> {
        self.storage.set(CacheKeys::USER, &serde_json::to_string(user)?)
    }

    /// Retrieve the cached user profile.
    pub fn get_user(&self) -> StorageResult<Option<User>> {
        self.get_json(CacheKeys::USER)
    }

    /// Whether a (possibly stale) session bundle exists.
    pub fn has_session(&self) -> StorageResult<bool> {
        Ok(self.storage.has(CacheKeys::AUTH_TOKEN)? && self.storage.has(CacheKeys::USER)?)
    }

    /// Clear everything tied to the authenticated session.
    ///
    /// The token is deleted first: if the process dies mid-clear, the
    /// leftover keys can never look like a usable authenticated state.
    /// All four deletes are attempted even if one fails.
    pub fn clear_session_bundle(&self) -> StorageResult<()> {
        debug!("Clearing session bundle");
        let mut first_error = None;

        for key in [
            CacheKeys::AUTH_TOKEN,
            CacheKeys::USER,
            CacheKeys::CURRENT_HOUSE,
            CacheKeys::HOUSES,
        ] {
            if let Err(e) = self.storage.delete(key) {
                warn!(key = %key, error = %e, "Failed to clear cache key");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ==========================================
    // House data
    // ==========================================

    /// Store the current house selection.
    pub fn set_current_house(&self, house: &House) -> StorageResult<()> {
        self.storage
            .set(CacheKeys::CURRENT_HOUSE, &serde_json::to_string(house)?)
    }

    /// Retrieve the cached current house.
    pub fn get_current_house(&self) -> StorageResult<Option<House>> {
        self.get_json(CacheKeys::CURRENT_HOUSE)
    }

    /// Remove the current house selection.
    pub fn clear_current_house(&self) -> StorageResult<()> {
        self.storage.delete(CacheKeys::CURRENT_HOUSE)?;
        Ok(())
    }

    /// Store the full house list.
    pub fn set_houses(&self, houses: &[House]) -> StorageResult<()> {
        self.storage
            .set(CacheKeys::HOUSES, &serde_json::to_string(houses)?)
    }

    /// Retrieve the cached house list.
    pub fn get_houses(&self) -> StorageResult<Option<Vec<House>>> {
        self.get_json(CacheKeys::HOUSES)
    }

    /// Clear both house keys.
    pub fn clear_house_data(&self) -> StorageResult<()> {
        self.storage.delete(CacheKeys::CURRENT_HOUSE)?;
        self.storage.delete(CacheKeys::HOUSES)?;
        Ok(())
    }

    // ==========================================
    // Theme (written by the theme module, read here for completeness)
    // ==========================================

    /// Store the theme preference ("light" | "dark").
    pub fn set_theme_preference(&self, theme: &str) -> StorageResult<()> {
        self.storage.set(CacheKeys::THEME_PREFERENCE, theme)
    }

    /// Retrieve the theme preference.
    pub fn get_theme_preference(&self) -> StorageResult<Option<String>> {
        self.storage.get(CacheKeys::THEME_PREFERENCE)
    }
}
