use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::tabs_model::{NewTab, Tab, TabSwitch, TabUpdate};
use super::tabs_registry::TabRegistry;
use super::tabs_traits::{TabRepositoryTrait, TabServiceTrait};
use crate::drafts::DraftStore;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::quotes::QuoteCache;

/// Service for managing tabs and the active-tab lifecycle.
///
/// The service owns the ordering rule for switches: derived state for the
/// old tab (the holdings quote cache, the generation token) is cleared
/// before anything is loaded for the new tab, so a slow response for the
/// old tab can never land in the new tab's view.
pub struct TabService {
    repository: Arc<dyn TabRepositoryTrait>,
    registry: TabRegistry,
    holdings_cache: QuoteCache,
    drafts: DraftStore,
    event_sink: Arc<dyn DomainEventSink>,
    default_tab_name: String,
}

impl TabService {
    pub fn new(
        repository: Arc<dyn TabRepositoryTrait>,
        registry: TabRegistry,
        holdings_cache: QuoteCache,
        drafts: DraftStore,
        event_sink: Arc<dyn DomainEventSink>,
        default_tab_name: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            registry,
            holdings_cache,
            drafts,
            event_sink,
            default_tab_name: default_tab_name.into(),
        }
    }

    /// The registry this service updates. Entry and poller code share it.
    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    fn emit_tabs_changed(&self) {
        if let Ok(tabs) = self.repository.list() {
            let ids = tabs.into_iter().map(|tab| tab.id).collect();
            self.event_sink.emit(DomainEvent::tabs_changed(ids));
        }
    }

    /// Makes a tab active: old-tab state is dropped first, then the switch
    /// is persisted and announced.
    async fn activate(&self, tab: Tab) -> Result<TabSwitch> {
        self.holdings_cache.clear();
        let generation = self.registry.switch_to(Some(tab.id.clone()));
        self.repository.set_active(&tab.id).await?;
        self.event_sink.emit(DomainEvent::active_tab_switched(
            Some(tab.id.clone()),
            generation,
        ));
        Ok(TabSwitch { tab, generation })
    }
}

#[async_trait]
impl TabServiceTrait for TabService {
    async fn ensure_default_tab(&self) -> Result<Tab> {
        let tabs = self.repository.list()?;
        if tabs.is_empty() {
            debug!("No tabs exist, creating default tab '{}'", self.default_tab_name);
            let tab = self
                .repository
                .create(NewTab {
                    id: None,
                    name: self.default_tab_name.clone(),
                })
                .await?;
            self.emit_tabs_changed();
            let switch = self.activate(tab).await?;
            return Ok(switch.tab);
        }

        let active = tabs
            .iter()
            .find(|tab| tab.is_active)
            .cloned()
            .unwrap_or_else(|| tabs[0].clone());
        if self.registry.active_tab_id().is_none() {
            let switch = self.activate(active).await?;
            return Ok(switch.tab);
        }
        Ok(active)
    }

    async fn create_tab(&self, new_tab: NewTab) -> Result<Tab> {
        new_tab.validate()?;
        let tab = self.repository.create(new_tab).await?;
        self.emit_tabs_changed();
        Ok(tab)
    }

    async fn rename_tab(&self, tab_update: TabUpdate) -> Result<Tab> {
        tab_update.validate()?;
        let tab = self.repository.rename(tab_update).await?;
        self.emit_tabs_changed();
        Ok(tab)
    }

    async fn delete_tab(&self, tab_id: &str) -> Result<Option<TabSwitch>> {
        let was_active = self.registry.active_tab_id().as_deref() == Some(tab_id);
        self.repository.delete(tab_id).await?;
        self.drafts.discard_for_tab(tab_id);
        self.emit_tabs_changed();

        if !was_active {
            return Ok(None);
        }

        let remaining = self.repository.list()?;
        match remaining.into_iter().next() {
            Some(next) => {
                debug!("Active tab {} deleted, selecting {}", tab_id, next.id);
                let switch = self.activate(next).await?;
                Ok(Some(switch))
            }
            None => {
                // Last tab gone: no active tab, no cached quotes, nothing derived.
                self.holdings_cache.clear();
                let generation = self.registry.switch_to(None);
                self.event_sink
                    .emit(DomainEvent::active_tab_switched(None, generation));
                Ok(None)
            }
        }
    }

    async fn switch_tab(&self, tab_id: &str) -> Result<TabSwitch> {
        let tab = self.repository.get_by_id(tab_id)?;
        self.activate(tab).await
    }

    fn get_tab(&self, tab_id: &str) -> Result<Tab> {
        self.repository.get_by_id(tab_id)
    }

    fn list_tabs(&self) -> Result<Vec<Tab>> {
        self.repository.list()
    }

    fn active_tab_id(&self) -> Option<String> {
        self.registry.active_tab_id()
    }

    fn generation(&self) -> u64 {
        self.registry.generation()
    }
}
