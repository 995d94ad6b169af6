//! Tests for the entry service: validation gating, quote joins, generation
//! discard, and the holdings poller wiring.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    use crate::errors::{DatabaseError, Error, Result};
    use crate::events::{DomainEvent, RecordingEventSink};
    use crate::fx::RateTable;
    use crate::portfolio::{
        EntryRepositoryTrait, EntryService, EntryServiceTrait, EntryUpdate, NewEntry,
        PortfolioEntry,
    };
    use crate::quotes::QuoteCache;
    use crate::tabs::TabRegistry;
    use dashfolio_market_data::{
        MarketDataError, MarketState, QuoteBatch, QuoteProvider, TickerQuote,
    };

    #[derive(Clone, Default)]
    struct MockEntryRepository {
        entries: Arc<Mutex<Vec<PortfolioEntry>>>,
        create_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EntryRepositoryTrait for MockEntryRepository {
        async fn create(&self, new_entry: NewEntry) -> Result<PortfolioEntry> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let mut entries = self.entries.lock().unwrap();
            let now = Utc::now().naive_utc();
            let entry = PortfolioEntry {
                id: new_entry
                    .id
                    .unwrap_or_else(|| format!("entry-{}", entries.len() + 1)),
                tab_id: new_entry.tab_id,
                display_name: new_entry.display_name,
                ticker_symbol: new_entry.ticker_symbol,
                units: new_entry.units,
                currency: new_entry.currency,
                recorded_value: new_entry.recorded_value,
                base_price_per_unit: new_entry.base_price_per_unit,
                entry_date: new_entry.entry_date,
                created_at: now,
                updated_at: now,
            };
            entries.push(entry.clone());
            Ok(entry)
        }

        async fn update(&self, entry_update: EntryUpdate) -> Result<PortfolioEntry> {
            let mut entries = self.entries.lock().unwrap();
            let id = entry_update.id.clone().unwrap_or_default();
            let entry = entries
                .iter_mut()
                .find(|entry| entry.id == id)
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(id.clone())))?;
            entry.display_name = entry_update.display_name;
            entry.ticker_symbol = entry_update.ticker_symbol;
            entry.units = entry_update.units;
            entry.currency = entry_update.currency;
            entry.recorded_value = entry_update.recorded_value;
            entry.base_price_per_unit = entry_update.base_price_per_unit;
            entry.entry_date = entry_update.entry_date;
            entry.updated_at = Utc::now().naive_utc();
            Ok(entry.clone())
        }

        async fn delete(&self, entry_id: &str) -> Result<usize> {
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|entry| entry.id != entry_id);
            Ok(before - entries.len())
        }

        fn get_by_id(&self, entry_id: &str) -> Result<PortfolioEntry> {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .find(|entry| entry.id == entry_id)
                .cloned()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(entry_id.to_string())))
        }

        fn list_for_tab(&self, tab_id: &str) -> Result<Vec<PortfolioEntry>> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|entry| entry.tab_id == tab_id)
                .cloned()
                .collect())
        }
    }

    struct MockProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl QuoteProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn fetch_quotes(
            &self,
            symbols: &[String],
        ) -> std::result::Result<QuoteBatch, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(QuoteBatch {
                quotes: symbols
                    .iter()
                    .map(|symbol| TickerQuote {
                        symbol: symbol.clone(),
                        price_per_unit: dec!(120),
                        change_abs: None,
                        change_pct: None,
                        currency: Some("USD".to_string()),
                        exchange: None,
                        market_state: MarketState::Regular,
                        fetched_at: Utc::now(),
                    })
                    .collect(),
                failures: vec![],
            })
        }
    }

    struct Fixture {
        service: EntryService,
        repository: MockEntryRepository,
        registry: TabRegistry,
        cache: QuoteCache,
        sink: RecordingEventSink,
        provider_calls: Arc<AtomicUsize>,
    }

    fn fixture() -> Fixture {
        let repository = MockEntryRepository::default();
        let registry = TabRegistry::new();
        let cache = QuoteCache::new();
        let sink = RecordingEventSink::new();
        let provider_calls = Arc::new(AtomicUsize::new(0));
        let service = EntryService::new(
            Arc::new(repository.clone()),
            registry.clone(),
            cache.clone(),
            Arc::new(MockProvider {
                calls: provider_calls.clone(),
            }),
            Arc::new(sink.clone()),
        );
        Fixture {
            service,
            repository,
            registry,
            cache,
            sink,
            provider_calls,
        }
    }

    fn new_entry(tab_id: &str, name: &str, symbol: Option<&str>) -> NewEntry {
        NewEntry {
            id: None,
            tab_id: tab_id.to_string(),
            display_name: name.to_string(),
            ticker_symbol: symbol.map(String::from),
            units: Some(dec!(10)),
            currency: "USD".to_string(),
            recorded_value: dec!(1000),
            base_price_per_unit: None,
            entry_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    // ==================== Validation ====================

    #[tokio::test]
    async fn test_invalid_entry_rejected_before_repository_call() {
        let fx = fixture();
        let result = fx.service.create_entry(new_entry("tab-1", "  ", None)).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(fx.repository.create_calls.load(Ordering::SeqCst), 0);
    }

    // ==================== Quote Joins ====================

    #[tokio::test]
    async fn test_valued_entries_use_cached_quotes_and_fall_back_without_them() {
        let fx = fixture();
        fx.service
            .create_entry(new_entry("tab-1", "Apple", Some("AAPL")))
            .await
            .unwrap();
        fx.service
            .create_entry(new_entry("tab-1", "Savings bond", None))
            .await
            .unwrap();

        fx.cache.apply_batch(&QuoteBatch {
            quotes: vec![TickerQuote {
                symbol: "AAPL".to_string(),
                price_per_unit: dec!(120),
                change_abs: None,
                change_pct: None,
                currency: Some("USD".to_string()),
                exchange: None,
                market_state: MarketState::Regular,
                fetched_at: Utc::now(),
            }],
            failures: vec![],
        });

        let valued = fx.service.valued_entries("tab-1").unwrap();
        assert_eq!(valued.len(), 2);

        let apple = &valued[0];
        assert!(apple.valuation.live_price);
        assert_eq!(apple.valuation.total_value, dec!(1200));

        let bond = &valued[1];
        assert!(!bond.valuation.live_price);
        assert_eq!(bond.valuation.total_value, dec!(1000));
    }

    #[tokio::test]
    async fn test_summary_converts_and_flags_missing_rates() {
        let fx = fixture();
        fx.service
            .create_entry(new_entry("tab-1", "Apple", None))
            .await
            .unwrap();
        let mut foreign = new_entry("tab-1", "Gilts", None);
        foreign.currency = "GBP".to_string();
        foreign.recorded_value = dec!(80);
        fx.service.create_entry(foreign).await.unwrap();

        let rates = RateTable::new("USD");
        let summary = fx.service.summary("tab-1", &rates).unwrap();
        assert_eq!(summary.total_value, dec!(1000));
        assert!(summary.partial_data);
        assert_eq!(summary.totals_by_currency.len(), 2);
    }

    // ==================== Generation Discard ====================

    #[tokio::test]
    async fn test_entry_load_for_stale_generation_returns_none() {
        let fx = fixture();
        let generation = fx.registry.switch_to(Some("tab-1".to_string()));
        fx.service
            .create_entry(new_entry("tab-1", "Apple", Some("AAPL")))
            .await
            .unwrap();

        // Load issued under the current generation is delivered.
        let current = fx
            .service
            .entries_for_generation("tab-1", generation)
            .unwrap();
        assert_eq!(current.map(|entries| entries.len()), Some(1));

        // A switch makes that generation stale; the same load is dropped.
        fx.registry.switch_to(Some("tab-2".to_string()));
        let stale = fx
            .service
            .entries_for_generation("tab-1", generation)
            .unwrap();
        assert!(stale.is_none());
    }

    // ==================== Events ====================

    #[tokio::test]
    async fn test_mutations_emit_entries_changed_for_owning_tab() {
        let fx = fixture();
        let entry = fx
            .service
            .create_entry(new_entry("tab-1", "Apple", Some("AAPL")))
            .await
            .unwrap();
        fx.sink.clear();

        fx.service.delete_entry(&entry.id).await.unwrap();
        let events = fx.sink.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DomainEvent::EntriesChanged { tab_id, entry_ids }
                if tab_id == "tab-1" && entry_ids.is_empty()
        ));
    }

    // ==================== Holdings Poller ====================

    #[tokio::test(start_paused = true)]
    async fn test_holdings_poller_fetches_active_tab_symbols_only() {
        let fx = fixture();
        fx.registry.switch_to(Some("tab-1".to_string()));
        fx.service
            .create_entry(new_entry("tab-1", "Apple", Some("AAPL")))
            .await
            .unwrap();
        fx.service
            .create_entry(new_entry("tab-1", "Apple again", Some("aapl")))
            .await
            .unwrap();
        fx.service
            .create_entry(new_entry("tab-1", "Microsoft", Some("MSFT")))
            .await
            .unwrap();

        let handle = fx.service.start_price_poller(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(fx.provider_calls.load(Ordering::SeqCst), 1);
        assert!(fx.cache.get("AAPL").is_some());
        assert!(fx.cache.get("MSFT").is_some());
        assert_eq!(fx.cache.len(), 2);

        // With no active tab the ticker set is empty and ticks skip.
        fx.registry.switch_to(None);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fx.provider_calls.load(Ordering::SeqCst), 1);

        drop(handle);
    }
}
