use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market session state reported alongside a quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketState {
    /// Pre-market session.
    Pre,
    /// Regular trading hours.
    Regular,
    /// After-hours session.
    Post,
    /// Market closed.
    Closed,
    /// State missing or unrecognized in the provider payload.
    #[default]
    Unknown,
}

impl MarketState {
    /// Maps a provider's raw market-state string onto the canonical enum.
    ///
    /// Providers report extended sessions with several labels ("POSTPOST",
    /// "PREPRE"); those collapse onto the nearest canonical state.
    pub fn from_provider(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "PRE" | "PREPRE" => MarketState::Pre,
            "REGULAR" => MarketState::Regular,
            "POST" | "POSTPOST" => MarketState::Post,
            "CLOSED" => MarketState::Closed,
            _ => MarketState::Unknown,
        }
    }
}

/// A live, ephemeral price observation for one ticker symbol.
///
/// Quotes are never persisted; they live in the engine's in-memory cache and
/// are rebuilt by polling.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerQuote {
    /// Upper-cased ticker symbol (e.g., "AAPL", "SHOP.TO").
    pub symbol: String,

    /// Latest traded price per unit. Always a finite value; rows with a
    /// missing or non-finite price become failures, not quotes.
    pub price_per_unit: Decimal,

    /// Absolute change since previous close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_abs: Option<Decimal>,

    /// Percentage change since previous close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<Decimal>,

    /// Currency the price is denominated in (e.g., "USD").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Exchange display name (e.g., "NasdaqGS").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    /// Market session state at fetch time.
    pub market_state: MarketState,

    /// When this observation was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Per-symbol failure marker inside a batch response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteFailure {
    pub symbol: String,
    pub message: String,
}

impl QuoteFailure {
    pub fn new(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            message: message.into(),
        }
    }
}

/// Outcome of one batched quote request.
///
/// Every requested symbol lands in exactly one of the two lists: priced rows
/// in `quotes`, everything else (unknown symbol, missing price, non-finite
/// price) in `failures`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBatch {
    pub quotes: Vec<TickerQuote>,
    pub failures: Vec<QuoteFailure>,
}

impl QuoteBatch {
    /// True when the batch neither priced nor failed any symbol.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty() && self.failures.is_empty()
    }
}
