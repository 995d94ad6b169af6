//! Watchlist domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use dashfolio_market_data::TickerQuote;

use crate::{errors::ValidationError, Error, Result};

/// A symbol the user tracks without holding a position.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: String,
    pub ticker_symbol: String,
    pub display_name: String,
    pub created_at: NaiveDateTime,
}

/// Input model for adding a watchlist item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchlistItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub ticker_symbol: String,
    /// Optional; falls back to the ticker symbol.
    pub display_name: Option<String>,
}

impl NewWatchlistItem {
    /// Validates the new watchlist item data.
    pub fn validate(&self) -> Result<()> {
        if self.ticker_symbol.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Ticker symbol cannot be empty".to_string(),
            )));
        }
        Ok(())
    }

    /// The symbol as stored and polled.
    pub fn normalized_symbol(&self) -> String {
        self.ticker_symbol.trim().to_uppercase()
    }
}

/// Watchlist item joined with its cached quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotedWatchlistItem {
    #[serde(flatten)]
    pub item: WatchlistItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<TickerQuote>,
    /// True when no quote is cached or the cached one is older than the
    /// caller's staleness threshold.
    pub stale: bool,
}
