use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings::dsl::*;
use dashfolio_core::constants::{
    DEFAULT_DISPLAY_CURRENCY, DEFAULT_TAB_NAME, HOLDINGS_POLL_INTERVAL_SECS,
    WATCHLIST_POLL_INTERVAL_SECS,
};
use dashfolio_core::errors::Result;
use dashfolio_core::settings::{Settings, SettingsRepositoryTrait, SettingsUpdate};

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_settings(&self) -> Result<Settings> {
        let mut conn = get_connection(&self.pool)?;
        let all_settings: Vec<(String, String)> = app_settings
            .select((setting_key, setting_value))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;

        let mut settings = Settings::default();

        for (key, value) in all_settings {
            match key.as_str() {
                "display_currency" => settings.display_currency = value,
                "default_tab_name" => settings.default_tab_name = value,
                "holdings_poll_interval_secs" => {
                    settings.holdings_poll_interval_secs =
                        value.parse().unwrap_or(HOLDINGS_POLL_INTERVAL_SECS);
                }
                "watchlist_poll_interval_secs" => {
                    settings.watchlist_poll_interval_secs =
                        value.parse().unwrap_or(WATCHLIST_POLL_INTERVAL_SECS);
                }
                _ => {} // Ignore unknown settings
            }
        }

        Ok(settings)
    }

    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<()> {
        let settings = new_settings.clone();
        self.writer
            .exec(move |conn| {
                if let Some(ref display_currency) = settings.display_currency {
                    diesel::replace_into(app_settings)
                        .values(&AppSettingDB {
                            setting_key: "display_currency".to_string(),
                            setting_value: display_currency.clone(),
                        })
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                if let Some(ref default_tab_name) = settings.default_tab_name {
                    diesel::replace_into(app_settings)
                        .values(&AppSettingDB {
                            setting_key: "default_tab_name".to_string(),
                            setting_value: default_tab_name.clone(),
                        })
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                if let Some(holdings_poll_interval_secs) = settings.holdings_poll_interval_secs {
                    diesel::replace_into(app_settings)
                        .values(&AppSettingDB {
                            setting_key: "holdings_poll_interval_secs".to_string(),
                            setting_value: holdings_poll_interval_secs.to_string(),
                        })
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                if let Some(watchlist_poll_interval_secs) = settings.watchlist_poll_interval_secs {
                    diesel::replace_into(app_settings)
                        .values(&AppSettingDB {
                            setting_key: "watchlist_poll_interval_secs".to_string(),
                            setting_value: watchlist_poll_interval_secs.to_string(),
                        })
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                Ok(())
            })
            .await
    }

    fn get_setting(&self, setting_key_param: &str) -> Result<String> {
        let mut conn = get_connection(&self.pool)?;
        let result = app_settings
            .filter(setting_key.eq(setting_key_param))
            .select(setting_value)
            .first(&mut conn);

        match result {
            Ok(value) => Ok(value),
            Err(diesel::result::Error::NotFound) => {
                // Return default values for known settings
                let default_value = match setting_key_param {
                    "display_currency" => DEFAULT_DISPLAY_CURRENCY.to_string(),
                    "default_tab_name" => DEFAULT_TAB_NAME.to_string(),
                    "holdings_poll_interval_secs" => HOLDINGS_POLL_INTERVAL_SECS.to_string(),
                    "watchlist_poll_interval_secs" => WATCHLIST_POLL_INTERVAL_SECS.to_string(),
                    _ => return Err(StorageError::from(diesel::result::Error::NotFound).into()),
                };
                Ok(default_value)
            }
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    async fn update_setting(
        &self,
        setting_key_param: &str,
        setting_value_param: &str,
    ) -> Result<()> {
        let key = setting_key_param.to_string();
        let value = setting_value_param.to_string();

        self.writer
            .exec(move |conn| {
                diesel::replace_into(app_settings)
                    .values(AppSettingDB {
                        setting_key: key,
                        setting_value: value,
                    })
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
