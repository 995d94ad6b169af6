//! Watchlist repository and service traits.

use std::time::Duration;

use async_trait::async_trait;

use super::watchlist_model::{NewWatchlistItem, QuotedWatchlistItem, WatchlistItem};
use crate::errors::Result;
use dashfolio_market_data::SearchResult;

/// Trait defining the contract for watchlist repository operations.
#[async_trait]
pub trait WatchlistRepositoryTrait: Send + Sync {
    /// Adds an item to the watchlist.
    async fn add(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem>;

    /// Removes an item by its ID. Returns the number of deleted records.
    async fn remove(&self, item_id: &str) -> Result<usize>;

    /// Lists all items ordered by creation time.
    fn list(&self) -> Result<Vec<WatchlistItem>>;
}

/// Trait defining the contract for watchlist service operations.
#[async_trait]
pub trait WatchlistServiceTrait: Send + Sync {
    /// Adds a symbol to the watchlist with business validation. The symbol
    /// is normalized to uppercase; adding one that is already tracked is
    /// rejected.
    async fn add_item(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem>;

    /// Removes an item from the watchlist.
    async fn remove_item(&self, item_id: &str) -> Result<()>;

    /// Lists all items.
    fn list_items(&self) -> Result<Vec<WatchlistItem>>;

    /// Lists all items joined with their cached quotes. A quote missing
    /// from the cache or older than `stale_after` marks the row stale.
    fn quoted_items(&self, stale_after: Duration) -> Result<Vec<QuotedWatchlistItem>>;

    /// Searches the provider for symbols matching a free-text query.
    /// Returns `Ok(None)` when a newer search was issued before this one
    /// finished; the caller drops superseded results.
    async fn search_symbols(&self, query: &str) -> Result<Option<Vec<SearchResult>>>;
}
