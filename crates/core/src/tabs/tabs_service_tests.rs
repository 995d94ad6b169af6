//! Tests for the tab service lifecycle: default tab creation, delete
//! reselection, and switch ordering.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::drafts::{DraftKey, DraftStore, EntryDraft};
    use crate::errors::{DatabaseError, Error, Result};
    use crate::events::RecordingEventSink;
    use crate::quotes::QuoteCache;
    use crate::tabs::{
        NewTab, Tab, TabRegistry, TabRepositoryTrait, TabService, TabServiceTrait, TabUpdate,
    };
    use dashfolio_market_data::{MarketState, QuoteBatch, TickerQuote};

    #[derive(Clone, Default)]
    struct MockTabRepository {
        tabs: Arc<Mutex<Vec<Tab>>>,
        create_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TabRepositoryTrait for MockTabRepository {
        async fn create(&self, new_tab: NewTab) -> Result<Tab> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let mut tabs = self.tabs.lock().unwrap();
            let now = Utc::now().naive_utc();
            let tab = Tab {
                id: new_tab
                    .id
                    .unwrap_or_else(|| format!("tab-{}", tabs.len() + 1)),
                name: new_tab.name,
                is_active: false,
                created_at: now,
                updated_at: now,
            };
            tabs.push(tab.clone());
            Ok(tab)
        }

        async fn rename(&self, tab_update: TabUpdate) -> Result<Tab> {
            let mut tabs = self.tabs.lock().unwrap();
            let id = tab_update.id.clone().unwrap_or_default();
            let tab = tabs
                .iter_mut()
                .find(|tab| tab.id == id)
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(id.clone())))?;
            tab.name = tab_update.name;
            Ok(tab.clone())
        }

        async fn delete(&self, tab_id: &str) -> Result<usize> {
            let mut tabs = self.tabs.lock().unwrap();
            let before = tabs.len();
            tabs.retain(|tab| tab.id != tab_id);
            Ok(before - tabs.len())
        }

        async fn set_active(&self, tab_id: &str) -> Result<()> {
            let mut tabs = self.tabs.lock().unwrap();
            for tab in tabs.iter_mut() {
                tab.is_active = tab.id == tab_id;
            }
            Ok(())
        }

        fn get_by_id(&self, tab_id: &str) -> Result<Tab> {
            self.tabs
                .lock()
                .unwrap()
                .iter()
                .find(|tab| tab.id == tab_id)
                .cloned()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(tab_id.to_string())))
        }

        fn list(&self) -> Result<Vec<Tab>> {
            Ok(self.tabs.lock().unwrap().clone())
        }
    }

    struct Fixture {
        service: TabService,
        repository: MockTabRepository,
        registry: TabRegistry,
        cache: QuoteCache,
        drafts: DraftStore,
        sink: RecordingEventSink,
    }

    fn fixture() -> Fixture {
        let repository = MockTabRepository::default();
        let registry = TabRegistry::new();
        let cache = QuoteCache::new();
        let drafts = DraftStore::new();
        let sink = RecordingEventSink::new();
        let service = TabService::new(
            Arc::new(repository.clone()),
            registry.clone(),
            cache.clone(),
            drafts.clone(),
            Arc::new(sink.clone()),
            "Main",
        );
        Fixture {
            service,
            repository,
            registry,
            cache,
            drafts,
            sink,
        }
    }

    fn prime_cache(cache: &QuoteCache, symbol: &str) {
        cache.apply_batch(&QuoteBatch {
            quotes: vec![TickerQuote {
                symbol: symbol.to_string(),
                price_per_unit: dec!(100),
                change_abs: None,
                change_pct: None,
                currency: Some("USD".to_string()),
                exchange: None,
                market_state: MarketState::Regular,
                fetched_at: Utc::now(),
            }],
            failures: vec![],
        });
    }

    // ==================== Default Tab ====================

    #[tokio::test]
    async fn test_ensure_default_tab_creates_main_exactly_once() {
        let fx = fixture();

        let tab = fx.service.ensure_default_tab().await.unwrap();
        assert_eq!(tab.name, "Main");
        assert_eq!(fx.registry.active_tab_id(), Some(tab.id.clone()));

        // Second call finds the existing tab and creates nothing.
        let again = fx.service.ensure_default_tab().await.unwrap();
        assert_eq!(again.id, tab.id);
        assert_eq!(fx.repository.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.repository.tabs.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_default_tab_adopts_persisted_active_tab() {
        let fx = fixture();
        fx.service
            .create_tab(NewTab {
                id: Some("tab-a".to_string()),
                name: "Alpha".to_string(),
            })
            .await
            .unwrap();
        fx.service
            .create_tab(NewTab {
                id: Some("tab-b".to_string()),
                name: "Beta".to_string(),
            })
            .await
            .unwrap();
        fx.repository.set_active("tab-b").await.unwrap();

        let tab = fx.service.ensure_default_tab().await.unwrap();
        assert_eq!(tab.id, "tab-b");
        assert_eq!(fx.registry.active_tab_id(), Some("tab-b".to_string()));
    }

    // ==================== Validation ====================

    #[tokio::test]
    async fn test_blank_tab_name_rejected_before_repository_call() {
        let fx = fixture();
        let result = fx
            .service
            .create_tab(NewTab {
                id: None,
                name: "   ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(fx.repository.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rename_requires_id_and_name() {
        let fx = fixture();
        let missing_id = fx
            .service
            .rename_tab(TabUpdate {
                id: None,
                name: "Renamed".to_string(),
            })
            .await;
        assert!(matches!(missing_id, Err(Error::Validation(_))));

        fx.service
            .create_tab(NewTab {
                id: Some("tab-a".to_string()),
                name: "Alpha".to_string(),
            })
            .await
            .unwrap();
        let blank = fx
            .service
            .rename_tab(TabUpdate {
                id: Some("tab-a".to_string()),
                name: "".to_string(),
            })
            .await;
        assert!(matches!(blank, Err(Error::Validation(_))));
    }

    // ==================== Delete ====================

    #[tokio::test]
    async fn test_delete_active_tab_selects_exactly_one_remaining() {
        let fx = fixture();
        fx.service.ensure_default_tab().await.unwrap();
        fx.service
            .create_tab(NewTab {
                id: Some("tab-b".to_string()),
                name: "Beta".to_string(),
            })
            .await
            .unwrap();
        let active = fx.registry.active_tab_id().unwrap();

        let switch = fx.service.delete_tab(&active).await.unwrap();
        let switch = switch.expect("deleting the active tab should switch");
        assert_eq!(switch.tab.id, "tab-b");
        assert_eq!(fx.registry.active_tab_id(), Some("tab-b".to_string()));

        let tabs = fx.repository.list().unwrap();
        assert_eq!(tabs.len(), 1);
        assert!(tabs[0].is_active);
    }

    #[tokio::test]
    async fn test_delete_inactive_tab_keeps_active_selection() {
        let fx = fixture();
        let main = fx.service.ensure_default_tab().await.unwrap();
        fx.service
            .create_tab(NewTab {
                id: Some("tab-b".to_string()),
                name: "Beta".to_string(),
            })
            .await
            .unwrap();

        let switch = fx.service.delete_tab("tab-b").await.unwrap();
        assert!(switch.is_none());
        assert_eq!(fx.registry.active_tab_id(), Some(main.id));
    }

    #[tokio::test]
    async fn test_delete_last_tab_clears_all_derived_state() {
        let fx = fixture();
        let tab = fx.service.ensure_default_tab().await.unwrap();
        prime_cache(&fx.cache, "AAPL");
        fx.drafts
            .save(DraftKey::new(tab.id.clone(), "session"), EntryDraft::default());

        let switch = fx.service.delete_tab(&tab.id).await.unwrap();
        assert!(switch.is_none());
        assert_eq!(fx.registry.active_tab_id(), None);
        assert!(fx.cache.is_empty());
        assert!(fx.drafts.is_empty());
    }

    // ==================== Switch ====================

    #[tokio::test]
    async fn test_switch_clears_cache_and_bumps_generation() {
        let fx = fixture();
        fx.service.ensure_default_tab().await.unwrap();
        fx.service
            .create_tab(NewTab {
                id: Some("tab-b".to_string()),
                name: "Beta".to_string(),
            })
            .await
            .unwrap();
        prime_cache(&fx.cache, "AAPL");
        let before = fx.registry.generation();

        let switch = fx.service.switch_tab("tab-b").await.unwrap();
        assert!(switch.generation > before);
        assert!(fx.cache.is_empty());
        assert_eq!(fx.registry.active_tab_id(), Some("tab-b".to_string()));
        assert!(fx.registry.is_current(switch.generation));
    }

    #[tokio::test]
    async fn test_switch_to_unknown_tab_fails_without_side_effects() {
        let fx = fixture();
        fx.service.ensure_default_tab().await.unwrap();
        prime_cache(&fx.cache, "AAPL");
        let before = fx.registry.generation();

        let result = fx.service.switch_tab("missing").await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
        // Lookup failed before any state was touched.
        assert_eq!(fx.registry.generation(), before);
        assert!(!fx.cache.is_empty());
    }

    #[tokio::test]
    async fn test_lifecycle_emits_events() {
        let fx = fixture();
        fx.service.ensure_default_tab().await.unwrap();
        fx.sink.clear();

        fx.service
            .create_tab(NewTab {
                id: Some("tab-b".to_string()),
                name: "Beta".to_string(),
            })
            .await
            .unwrap();
        fx.service.switch_tab("tab-b").await.unwrap();

        let events = fx.sink.events();
        assert!(events
            .iter()
            .any(|event| matches!(event, crate::events::DomainEvent::TabsChanged { .. })));
        assert!(events.iter().any(|event| matches!(
            event,
            crate::events::DomainEvent::ActiveTabSwitched { tab_id: Some(id), .. } if id == "tab-b"
        )));
    }
}
