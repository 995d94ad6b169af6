use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DISPLAY_CURRENCY, DEFAULT_TAB_NAME, HOLDINGS_POLL_INTERVAL_SECS,
    WATCHLIST_POLL_INTERVAL_SECS,
};
use crate::errors::{Error, Result, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub display_currency: String,
    pub default_tab_name: String,
    pub holdings_poll_interval_secs: u64,
    pub watchlist_poll_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_currency: DEFAULT_DISPLAY_CURRENCY.to_string(),
            default_tab_name: DEFAULT_TAB_NAME.to_string(),
            holdings_poll_interval_secs: HOLDINGS_POLL_INTERVAL_SECS,
            watchlist_poll_interval_secs: WATCHLIST_POLL_INTERVAL_SECS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub display_currency: Option<String>,
    pub default_tab_name: Option<String>,
    pub holdings_poll_interval_secs: Option<u64>,
    pub watchlist_poll_interval_secs: Option<u64>,
}

impl SettingsUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref currency) = self.display_currency {
            if currency.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Display currency cannot be empty".to_string(),
                )));
            }
        }
        if let Some(ref name) = self.default_tab_name {
            if name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Default tab name cannot be empty".to_string(),
                )));
            }
        }
        if self.holdings_poll_interval_secs == Some(0)
            || self.watchlist_poll_interval_secs == Some(0)
        {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Poll intervals must be greater than zero".to_string(),
            )));
        }
        Ok(())
    }
}
