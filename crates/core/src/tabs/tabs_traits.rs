//! Tab repository and service traits.
//!
//! These traits define the contract for tab operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::tabs_model::{NewTab, Tab, TabSwitch, TabUpdate};
use crate::errors::Result;

/// Trait defining the contract for Tab repository operations.
#[async_trait]
pub trait TabRepositoryTrait: Send + Sync {
    /// Creates a new tab.
    async fn create(&self, new_tab: NewTab) -> Result<Tab>;

    /// Renames an existing tab.
    async fn rename(&self, tab_update: TabUpdate) -> Result<Tab>;

    /// Deletes a tab by its ID. Entries belonging to the tab are deleted
    /// with it. Returns the number of deleted tabs.
    async fn delete(&self, tab_id: &str) -> Result<usize>;

    /// Marks one tab as active and every other tab as inactive.
    async fn set_active(&self, tab_id: &str) -> Result<()>;

    /// Retrieves a tab by its ID.
    fn get_by_id(&self, tab_id: &str) -> Result<Tab>;

    /// Lists all tabs ordered by creation time.
    fn list(&self) -> Result<Vec<Tab>>;
}

/// Trait defining the contract for Tab service operations.
#[async_trait]
pub trait TabServiceTrait: Send + Sync {
    /// Guarantees at least one tab exists and one is active, creating the
    /// default tab when the caller has none. Returns the active tab.
    async fn ensure_default_tab(&self) -> Result<Tab>;

    /// Creates a new tab with business validation.
    async fn create_tab(&self, new_tab: NewTab) -> Result<Tab>;

    /// Renames an existing tab with business validation.
    async fn rename_tab(&self, tab_update: TabUpdate) -> Result<Tab>;

    /// Deletes a tab. When the active tab is deleted and other tabs remain,
    /// one of them becomes active and the resulting switch is returned.
    async fn delete_tab(&self, tab_id: &str) -> Result<Option<TabSwitch>>;

    /// Switches to another tab, clearing derived state for the old one
    /// before anything loads for the new one.
    async fn switch_tab(&self, tab_id: &str) -> Result<TabSwitch>;

    /// Retrieves a tab by ID.
    fn get_tab(&self, tab_id: &str) -> Result<Tab>;

    /// Lists all tabs.
    fn list_tabs(&self) -> Result<Vec<Tab>>;

    /// The currently active tab ID, if any.
    fn active_tab_id(&self) -> Option<String>;

    /// The latest generation token.
    fn generation(&self) -> u64;
}
