use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};

use super::watchlist_model::{NewWatchlistItem, QuotedWatchlistItem, WatchlistItem};
use super::watchlist_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::quotes::{PollScope, PollerHandle, PricePoller, QuoteCache, TickerSource};
use dashfolio_market_data::{QuoteProvider, SearchResult};

/// Service for the watchlist and its quote view.
///
/// Owns a quote cache separate from the holdings cache, so tab switches
/// never drop watchlist prices. Symbol search is stamped: every new query
/// bumps a counter, and a response that comes back under an old stamp is
/// reported as superseded instead of delivered.
pub struct WatchlistService {
    repository: Arc<dyn WatchlistRepositoryTrait>,
    cache: QuoteCache,
    provider: Arc<dyn QuoteProvider>,
    event_sink: Arc<dyn DomainEventSink>,
    search_stamp: AtomicU64,
}

impl WatchlistService {
    pub fn new(
        repository: Arc<dyn WatchlistRepositoryTrait>,
        cache: QuoteCache,
        provider: Arc<dyn QuoteProvider>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            cache,
            provider,
            event_sink,
            search_stamp: AtomicU64::new(0),
        }
    }

    /// The cache this service reads quotes from.
    pub fn quote_cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Starts the watchlist poller. The symbol set is recomputed on every
    /// tick, so additions and removals are picked up without a restart.
    pub fn start_price_poller(&self, interval: Duration) -> PollerHandle {
        let repository = self.repository.clone();
        let ticker_source: TickerSource = Arc::new(move || match repository.list() {
            Ok(items) => {
                let mut seen = HashSet::new();
                let mut symbols = Vec::new();
                for item in items {
                    let symbol = item.ticker_symbol.to_uppercase();
                    if seen.insert(symbol.clone()) {
                        symbols.push(symbol);
                    }
                }
                symbols
            }
            Err(e) => {
                warn!("Could not list watchlist for quote polling: {}", e);
                Vec::new()
            }
        });

        PricePoller::new(
            PollScope::Watchlist,
            interval,
            self.provider.clone(),
            self.cache.clone(),
            ticker_source,
        )
        .with_event_sink(self.event_sink.clone())
        .start()
    }

    fn emit_watchlist_changed(&self) {
        if let Ok(items) = self.repository.list() {
            let ids = items.into_iter().map(|item| item.id).collect();
            self.event_sink.emit(DomainEvent::watchlist_changed(ids));
        }
    }
}

#[async_trait]
impl WatchlistServiceTrait for WatchlistService {
    async fn add_item(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem> {
        new_item.validate()?;
        let symbol = new_item.normalized_symbol();

        let already_tracked = self
            .repository
            .list()?
            .iter()
            .any(|item| item.ticker_symbol == symbol);
        if already_tracked {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "{} is already on the watchlist",
                symbol
            ))));
        }

        let item = self
            .repository
            .add(NewWatchlistItem {
                id: new_item.id,
                display_name: Some(
                    new_item
                        .display_name
                        .filter(|name| !name.trim().is_empty())
                        .unwrap_or_else(|| symbol.clone()),
                ),
                ticker_symbol: symbol,
            })
            .await?;
        self.emit_watchlist_changed();
        Ok(item)
    }

    async fn remove_item(&self, item_id: &str) -> Result<()> {
        self.repository.remove(item_id).await?;
        self.emit_watchlist_changed();
        Ok(())
    }

    fn list_items(&self) -> Result<Vec<WatchlistItem>> {
        self.repository.list()
    }

    fn quoted_items(&self, stale_after: Duration) -> Result<Vec<QuotedWatchlistItem>> {
        let now = Utc::now();
        let stale_after = chrono::Duration::from_std(stale_after)
            .unwrap_or_else(|_| chrono::Duration::seconds(i64::MAX / 1_000));
        let items = self.repository.list()?;
        Ok(items
            .into_iter()
            .map(|item| {
                let quote = self.cache.get(&item.ticker_symbol);
                let stale = match &quote {
                    Some(quote) => now.signed_duration_since(quote.fetched_at) > stale_after,
                    None => true,
                };
                QuotedWatchlistItem { item, quote, stale }
            })
            .collect())
    }

    async fn search_symbols(&self, query: &str) -> Result<Option<Vec<SearchResult>>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let stamp = self.search_stamp.fetch_add(1, Ordering::SeqCst) + 1;
        let results = self.provider.search(query).await?;
        // A newer query was issued while this one was in flight.
        if self.search_stamp.load(Ordering::SeqCst) != stamp {
            debug!("Search for '{}' superseded by a newer query", query);
            return Ok(None);
        }
        Ok(Some(results))
    }
}
