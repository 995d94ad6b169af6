use std::sync::Arc;

use async_trait::async_trait;

use super::SettingsRepositoryTrait;
use crate::constants::{
    DEFAULT_DISPLAY_CURRENCY, HOLDINGS_POLL_INTERVAL_SECS, WATCHLIST_POLL_INTERVAL_SECS,
};
use crate::errors::{DatabaseError, Error, Result};
use crate::settings::{Settings, SettingsUpdate};

// Define the trait for SettingsService
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;

    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<()>;

    fn get_display_currency(&self) -> Result<String>;

    fn get_holdings_poll_interval_secs(&self) -> Result<u64>;

    fn get_watchlist_poll_interval_secs(&self) -> Result<u64>;

    /// Get a single setting value by key. Returns None if not found.
    fn get_setting_value(&self, key: &str) -> Result<Option<String>>;

    /// Set a single setting value by key.
    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

// Implement the trait for SettingsService
#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        self.settings_repository.get_settings()
    }

    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<()> {
        new_settings.validate()?;
        self.settings_repository
            .update_settings(new_settings)
            .await?;
        Ok(())
    }

    fn get_display_currency(&self) -> Result<String> {
        match self.settings_repository.get_setting("display_currency") {
            Ok(value) => Ok(value),
            Err(Error::Database(DatabaseError::NotFound(_))) => {
                Ok(DEFAULT_DISPLAY_CURRENCY.to_string())
            }
            Err(e) => Err(e),
        }
    }

    fn get_holdings_poll_interval_secs(&self) -> Result<u64> {
        match self
            .settings_repository
            .get_setting("holdings_poll_interval_secs")
        {
            Ok(value) => Ok(value.parse().unwrap_or(HOLDINGS_POLL_INTERVAL_SECS)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(HOLDINGS_POLL_INTERVAL_SECS),
            Err(e) => Err(e),
        }
    }

    fn get_watchlist_poll_interval_secs(&self) -> Result<u64> {
        match self
            .settings_repository
            .get_setting("watchlist_poll_interval_secs")
        {
            Ok(value) => Ok(value.parse().unwrap_or(WATCHLIST_POLL_INTERVAL_SECS)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(WATCHLIST_POLL_INTERVAL_SECS),
            Err(e) => Err(e),
        }
    }

    fn get_setting_value(&self, key: &str) -> Result<Option<String>> {
        match self.settings_repository.get_setting(key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()> {
        self.settings_repository.update_setting(key, value).await
    }
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }
}
