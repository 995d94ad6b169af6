//! Merge-only in-memory quote cache.
//!
//! The poller is the only writer; valuation and summary code are read-only
//! consumers. Successful quotes overwrite their symbol's slot. Symbols that
//! error or are absent from a batch keep their previous value, so readers
//! fall back to the last good price instead of losing it.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use dashfolio_market_data::{QuoteBatch, TickerQuote};

#[derive(Clone, Default)]
pub struct QuoteCache {
    inner: Arc<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    quotes: DashMap<String, TickerQuote>,
    last_refreshed: RwLock<Option<DateTime<Utc>>>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached quote for a symbol, if any. Lookup is
    /// case-insensitive; cache keys are uppercased.
    pub fn get(&self, symbol: &str) -> Option<TickerQuote> {
        self.inner
            .quotes
            .get(&symbol.to_uppercase())
            .map(|entry| entry.value().clone())
    }

    /// Merges a batch into the cache. Quotes overwrite their symbol's slot;
    /// failures leave existing entries untouched. Returns the number of
    /// quotes applied.
    pub fn apply_batch(&self, batch: &QuoteBatch) -> usize {
        for quote in &batch.quotes {
            self.inner
                .quotes
                .insert(quote.symbol.to_uppercase(), quote.clone());
        }
        *self.inner.last_refreshed.write().unwrap() = Some(Utc::now());
        batch.quotes.len()
    }

    /// When the cache last received a poll response, successful or partial.
    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_refreshed.read().unwrap()
    }

    /// Drops every cached quote and the refresh stamp. Called on tab switch
    /// so quotes for one tab's symbols never leak into another tab's view.
    pub fn clear(&self) {
        self.inner.quotes.clear();
        *self.inner.last_refreshed.write().unwrap() = None;
    }

    pub fn len(&self) -> usize {
        self.inner.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.quotes.is_empty()
    }
}
