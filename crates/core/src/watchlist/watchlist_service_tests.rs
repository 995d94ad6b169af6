//! Tests for the watchlist service: symbol normalization, quote staleness,
//! superseded searches, and the watchlist poller.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tokio::sync::Semaphore;

    use crate::errors::{DatabaseError, Error, Result};
    use crate::events::RecordingEventSink;
    use crate::quotes::QuoteCache;
    use crate::watchlist::{
        NewWatchlistItem, WatchlistItem, WatchlistRepositoryTrait, WatchlistService,
        WatchlistServiceTrait,
    };
    use dashfolio_market_data::{
        MarketDataError, MarketState, QuoteBatch, QuoteProvider, SearchResult, TickerQuote,
    };

    #[derive(Clone, Default)]
    struct MockWatchlistRepository {
        items: Arc<Mutex<Vec<WatchlistItem>>>,
    }

    #[async_trait]
    impl WatchlistRepositoryTrait for MockWatchlistRepository {
        async fn add(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem> {
            let mut items = self.items.lock().unwrap();
            let item = WatchlistItem {
                id: new_item
                    .id
                    .unwrap_or_else(|| format!("watch-{}", items.len() + 1)),
                display_name: new_item
                    .display_name
                    .unwrap_or_else(|| new_item.ticker_symbol.clone()),
                ticker_symbol: new_item.ticker_symbol,
                created_at: Utc::now().naive_utc(),
            };
            items.push(item.clone());
            Ok(item)
        }

        async fn remove(&self, item_id: &str) -> Result<usize> {
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|item| item.id != item_id);
            if items.len() == before {
                return Err(Error::Database(DatabaseError::NotFound(
                    item_id.to_string(),
                )));
            }
            Ok(before - items.len())
        }

        fn list(&self) -> Result<Vec<WatchlistItem>> {
            Ok(self.items.lock().unwrap().clone())
        }
    }

    /// Provider with gated search so tests can hold a query in flight.
    struct MockSearchProvider {
        quote_calls: Arc<AtomicUsize>,
        search_calls: Arc<AtomicUsize>,
        search_gate: Option<Arc<Semaphore>>,
    }

    impl MockSearchProvider {
        fn new() -> Self {
            Self {
                quote_calls: Arc::new(AtomicUsize::new(0)),
                search_calls: Arc::new(AtomicUsize::new(0)),
                search_gate: None,
            }
        }
    }

    #[async_trait]
    impl QuoteProvider for MockSearchProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn fetch_quotes(
            &self,
            symbols: &[String],
        ) -> std::result::Result<QuoteBatch, MarketDataError> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            Ok(QuoteBatch {
                quotes: symbols
                    .iter()
                    .map(|symbol| TickerQuote {
                        symbol: symbol.clone(),
                        price_per_unit: dec!(50),
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

        async fn search(
            &self,
            query: &str,
        ) -> std::result::Result<Vec<SearchResult>, MarketDataError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.search_gate {
                let _permit = gate.acquire().await.unwrap();
            }
            Ok(vec![SearchResult::new(
                query.to_uppercase(),
                format!("{} Inc.", query),
                "NASDAQ",
            )])
        }
    }

    fn service_with(provider: MockSearchProvider) -> (WatchlistService, MockWatchlistRepository, QuoteCache, RecordingEventSink) {
        let repository = MockWatchlistRepository::default();
        let cache = QuoteCache::new();
        let sink = RecordingEventSink::new();
        let service = WatchlistService::new(
            Arc::new(repository.clone()),
            cache.clone(),
            Arc::new(provider),
            Arc::new(sink.clone()),
        );
        (service, repository, cache, sink)
    }

    fn cached_quote(symbol: &str, age_secs: i64) -> TickerQuote {
        TickerQuote {
            symbol: symbol.to_string(),
            price_per_unit: dec!(50),
            change_abs: None,
            change_pct: None,
            currency: Some("USD".to_string()),
            exchange: None,
            market_state: MarketState::Regular,
            fetched_at: Utc::now() - chrono::Duration::seconds(age_secs),
        }
    }

    // ==================== Add / Remove ====================

    #[tokio::test]
    async fn test_add_normalizes_symbol_and_rejects_duplicates() {
        let (service, repository, _cache, sink) = service_with(MockSearchProvider::new());

        let item = service
            .add_item(NewWatchlistItem {
                id: None,
                ticker_symbol: " aapl ".to_string(),
                display_name: None,
            })
            .await
            .unwrap();
        assert_eq!(item.ticker_symbol, "AAPL");
        assert_eq!(item.display_name, "AAPL");
        assert_eq!(sink.len(), 1);

        let duplicate = service
            .add_item(NewWatchlistItem {
                id: None,
                ticker_symbol: "AAPL".to_string(),
                display_name: Some("Apple".to_string()),
            })
            .await;
        assert!(matches!(duplicate, Err(Error::Validation(_))));
        assert_eq!(repository.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_symbol_rejected() {
        let (service, repository, _cache, _sink) = service_with(MockSearchProvider::new());
        let result = service
            .add_item(NewWatchlistItem {
                id: None,
                ticker_symbol: "   ".to_string(),
                display_name: None,
            })
            .await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(repository.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_item_emits_change() {
        let (service, _repository, _cache, sink) = service_with(MockSearchProvider::new());
        let item = service
            .add_item(NewWatchlistItem {
                id: None,
                ticker_symbol: "NVDA".to_string(),
                display_name: None,
            })
            .await
            .unwrap();
        sink.clear();

        service.remove_item(&item.id).await.unwrap();
        assert_eq!(service.list_items().unwrap().len(), 0);
        assert_eq!(sink.len(), 1);
    }

    // ==================== Quote View ====================

    #[tokio::test]
    async fn test_quoted_items_flag_missing_and_old_quotes_as_stale() {
        let (service, _repository, cache, _sink) = service_with(MockSearchProvider::new());
        for symbol in ["AAPL", "MSFT", "NVDA"] {
            service
                .add_item(NewWatchlistItem {
                    id: None,
                    ticker_symbol: symbol.to_string(),
                    display_name: None,
                })
                .await
                .unwrap();
        }
        cache.apply_batch(&QuoteBatch {
            quotes: vec![cached_quote("AAPL", 5), cached_quote("MSFT", 300)],
            failures: vec![],
        });

        let quoted = service.quoted_items(Duration::from_secs(60)).unwrap();
        assert_eq!(quoted.len(), 3);

        let aapl = quoted.iter().find(|q| q.item.ticker_symbol == "AAPL").unwrap();
        assert!(!aapl.stale);
        assert!(aapl.quote.is_some());

        let msft = quoted.iter().find(|q| q.item.ticker_symbol == "MSFT").unwrap();
        assert!(msft.stale, "an old quote is served but flagged stale");
        assert!(msft.quote.is_some());

        let nvda = quoted.iter().find(|q| q.item.ticker_symbol == "NVDA").unwrap();
        assert!(nvda.stale);
        assert!(nvda.quote.is_none());
    }

    // ==================== Search ====================

    #[tokio::test]
    async fn test_blank_search_returns_empty_without_provider_call() {
        let provider = MockSearchProvider::new();
        let search_calls = provider.search_calls.clone();
        let (service, _repository, _cache, _sink) = service_with(provider);

        let results = service.search_symbols("   ").await.unwrap();
        assert!(results.expect("blank query is not superseded").is_empty());
        assert_eq!(search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_superseded_search_is_dropped_and_newest_wins() {
        let mut provider = MockSearchProvider::new();
        let gate = Arc::new(Semaphore::new(0));
        let search_calls = provider.search_calls.clone();
        provider.search_gate = Some(gate.clone());
        let (service, _repository, _cache, _sink) = service_with(provider);
        let service = Arc::new(service);

        let older = {
            let service = service.clone();
            tokio::spawn(async move { service.search_symbols("app").await })
        };
        let newer = {
            let service = service.clone();
            let search_calls = search_calls.clone();
            tokio::spawn(async move {
                // Make sure the first query is already in flight.
                while search_calls.load(Ordering::SeqCst) < 1 {
                    tokio::task::yield_now().await;
                }
                service.search_symbols("apple").await
            })
        };

        // Release the queries only once both are stamped and in flight,
        // so the older one finishes under the newer stamp.
        while search_calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        gate.add_permits(2);
        let older = older.await.unwrap().unwrap();
        let newer = newer.await.unwrap().unwrap();

        assert!(older.is_none(), "the first query was superseded");
        let results = newer.expect("the newest query delivers results");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "APPLE");
    }

    // ==================== Poller ====================

    #[tokio::test(start_paused = true)]
    async fn test_watchlist_poller_fills_the_watchlist_cache() {
        let provider = MockSearchProvider::new();
        let quote_calls = provider.quote_calls.clone();
        let (service, _repository, cache, _sink) = service_with(provider);
        for symbol in ["AAPL", "NVDA"] {
            service
                .add_item(NewWatchlistItem {
                    id: None,
                    ticker_symbol: symbol.to_string(),
                    display_name: None,
                })
                .await
                .unwrap();
        }

        let handle = service.start_price_poller(Duration::from_secs(30));
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(quote_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("AAPL").is_some());
        assert!(cache.get("NVDA").is_some());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(quote_calls.load(Ordering::SeqCst), 2);

        drop(handle);
    }
}
