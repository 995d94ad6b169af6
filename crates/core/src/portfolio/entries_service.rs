use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use super::entries_model::{distinct_ticker_symbols, EntryUpdate, NewEntry, PortfolioEntry};
use super::entries_traits::{EntryRepositoryTrait, EntryServiceTrait};
use super::summary::{summarize, PortfolioSummary};
use super::valuation::{value_entry, ValuedEntry};
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::fx::RateTable;
use crate::quotes::{PollScope, PollerHandle, PricePoller, QuoteCache, TickerSource};
use crate::tabs::TabRegistry;

/// Service for portfolio entries and the valuation view they feed.
///
/// Reads are served from the repository joined with the shared quote
/// cache; the cache itself is kept fresh by the holdings poller this
/// service can start. Writes go through the repository and are announced
/// on the event sink.
pub struct EntryService {
    repository: Arc<dyn EntryRepositoryTrait>,
    registry: TabRegistry,
    cache: QuoteCache,
    provider: Arc<dyn dashfolio_market_data::QuoteProvider>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl EntryService {
    pub fn new(
        repository: Arc<dyn EntryRepositoryTrait>,
        registry: TabRegistry,
        cache: QuoteCache,
        provider: Arc<dyn dashfolio_market_data::QuoteProvider>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            registry,
            cache,
            provider,
            event_sink,
        }
    }

    /// The cache this service reads quotes from.
    pub fn quote_cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Starts a holdings poller for the active tab's ticker set.
    ///
    /// The ticker set is recomputed on every tick, so entry edits and tab
    /// switches are picked up without restarting. The returned handle stops
    /// the poller when dropped; the owning view restarts it (with a fresh
    /// handle) when the active tab changes.
    pub fn start_price_poller(&self, interval: Duration) -> PollerHandle {
        let repository = self.repository.clone();
        let registry = self.registry.clone();
        let ticker_source: TickerSource = Arc::new(move || match registry.active_tab_id() {
            Some(tab_id) => match repository.list_for_tab(&tab_id) {
                Ok(entries) => distinct_ticker_symbols(&entries),
                Err(e) => {
                    warn!("Could not list entries for quote polling: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        });

        PricePoller::new(
            PollScope::Holdings,
            interval,
            self.provider.clone(),
            self.cache.clone(),
            ticker_source,
        )
        .with_registry(self.registry.clone())
        .with_event_sink(self.event_sink.clone())
        .start()
    }

    fn emit_entries_changed(&self, tab_id: &str) {
        if let Ok(entries) = self.repository.list_for_tab(tab_id) {
            let ids = entries.into_iter().map(|entry| entry.id).collect();
            self.event_sink
                .emit(DomainEvent::entries_changed(tab_id.to_string(), ids));
        }
    }
}

#[async_trait]
impl EntryServiceTrait for EntryService {
    async fn create_entry(&self, new_entry: NewEntry) -> Result<PortfolioEntry> {
        new_entry.validate()?;
        let entry = self.repository.create(new_entry).await?;
        self.emit_entries_changed(&entry.tab_id);
        Ok(entry)
    }

    async fn update_entry(&self, entry_update: EntryUpdate) -> Result<PortfolioEntry> {
        entry_update.validate()?;
        let entry = self.repository.update(entry_update).await?;
        self.emit_entries_changed(&entry.tab_id);
        Ok(entry)
    }

    async fn delete_entry(&self, entry_id: &str) -> Result<()> {
        let entry = self.repository.get_by_id(entry_id)?;
        self.repository.delete(entry_id).await?;
        self.emit_entries_changed(&entry.tab_id);
        Ok(())
    }

    fn get_entry(&self, entry_id: &str) -> Result<PortfolioEntry> {
        self.repository.get_by_id(entry_id)
    }

    fn list_entries(&self, tab_id: &str) -> Result<Vec<PortfolioEntry>> {
        self.repository.list_for_tab(tab_id)
    }

    fn entries_for_generation(
        &self,
        tab_id: &str,
        generation: u64,
    ) -> Result<Option<Vec<PortfolioEntry>>> {
        let entries = self.repository.list_for_tab(tab_id)?;
        // The check happens after the load: a switch during the read makes
        // this result stale, and stale results are dropped, not applied.
        if !self.registry.is_current(generation) {
            debug!(
                "Dropping entry load for tab {} issued under stale generation {}",
                tab_id, generation
            );
            return Ok(None);
        }
        Ok(Some(entries))
    }

    fn valued_entries(&self, tab_id: &str) -> Result<Vec<ValuedEntry>> {
        let entries = self.repository.list_for_tab(tab_id)?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                let quote = entry
                    .ticker_symbol
                    .as_deref()
                    .and_then(|symbol| self.cache.get(symbol));
                value_entry(entry, quote.as_ref())
            })
            .collect())
    }

    fn summary(&self, tab_id: &str, rates: &RateTable) -> Result<PortfolioSummary> {
        let valued = self.valued_entries(tab_id)?;
        Ok(summarize(&valued, rates))
    }
}
