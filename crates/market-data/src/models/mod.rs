//! Canonical market data models.
//!
//! Everything the engine consumes from a quote service is expressed in these
//! types; provider-specific wire shapes never escape the `provider` module.

mod quote;
mod search;

pub use quote::{MarketState, QuoteBatch, QuoteFailure, TickerQuote};
pub use search::SearchResult;
