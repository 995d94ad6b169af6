//! Entry repository and service traits.
//!
//! These traits define the contract for portfolio entry operations without
//! any database-specific types, allowing for different storage
//! implementations.

use async_trait::async_trait;

use super::entries_model::{EntryUpdate, NewEntry, PortfolioEntry};
use super::summary::PortfolioSummary;
use super::valuation::ValuedEntry;
use crate::errors::Result;
use crate::fx::RateTable;

/// Trait defining the contract for entry repository operations.
#[async_trait]
pub trait EntryRepositoryTrait: Send + Sync {
    /// Creates a new entry.
    async fn create(&self, new_entry: NewEntry) -> Result<PortfolioEntry>;

    /// Updates an existing entry.
    async fn update(&self, entry_update: EntryUpdate) -> Result<PortfolioEntry>;

    /// Deletes an entry by its ID. Returns the number of deleted records.
    async fn delete(&self, entry_id: &str) -> Result<usize>;

    /// Retrieves an entry by its ID.
    fn get_by_id(&self, entry_id: &str) -> Result<PortfolioEntry>;

    /// Lists a tab's entries ordered by entry date, then creation time.
    fn list_for_tab(&self, tab_id: &str) -> Result<Vec<PortfolioEntry>>;
}

/// Trait defining the contract for entry service operations.
#[async_trait]
pub trait EntryServiceTrait: Send + Sync {
    /// Creates a new entry with business validation.
    async fn create_entry(&self, new_entry: NewEntry) -> Result<PortfolioEntry>;

    /// Updates an existing entry with business validation.
    async fn update_entry(&self, entry_update: EntryUpdate) -> Result<PortfolioEntry>;

    /// Deletes an entry.
    async fn delete_entry(&self, entry_id: &str) -> Result<()>;

    /// Retrieves an entry by ID.
    fn get_entry(&self, entry_id: &str) -> Result<PortfolioEntry>;

    /// Lists a tab's entries.
    fn list_entries(&self, tab_id: &str) -> Result<Vec<PortfolioEntry>>;

    /// Lists a tab's entries, but only when the given generation token is
    /// still current. A load finishing after a newer tab switch returns
    /// `Ok(None)` and must be dropped by the caller.
    fn entries_for_generation(
        &self,
        tab_id: &str,
        generation: u64,
    ) -> Result<Option<Vec<PortfolioEntry>>>;

    /// Lists a tab's entries joined with cached quotes and derived metrics.
    fn valued_entries(&self, tab_id: &str) -> Result<Vec<ValuedEntry>>;

    /// Rolls a tab's entries into per-currency totals and a converted
    /// grand total.
    fn summary(&self, tab_id: &str, rates: &RateTable) -> Result<PortfolioSummary>;
}
