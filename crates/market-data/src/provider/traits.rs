//! Quote provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{QuoteBatch, SearchResult};

/// Trait for live quote sources.
///
/// Implement this trait to add support for a new quote service. The engine
/// only ever talks to a provider through this trait, so tests substitute
/// in-memory fakes freely.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used in log lines and error
    /// messages.
    fn id(&self) -> &'static str;

    /// Fetch the latest quotes for a batch of symbols.
    ///
    /// An empty `symbols` slice returns an empty batch without issuing a
    /// request. Per-symbol lookup failures are reported inside the batch;
    /// `Err` is reserved for whole-request failures (network, auth, decode),
    /// in which case no symbol in the batch produced data.
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<QuoteBatch, MarketDataError>;

    /// Search for symbols matching a free-text query.
    ///
    /// Default implementation returns `NotSupported`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let _ = query;
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }
}
