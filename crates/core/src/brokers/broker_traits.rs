//! Trait definitions for broker holding repository and service interfaces.

use async_trait::async_trait;

use super::broker_model::{BrokerHolding, BrokerHoldingDraft, BrokerHoldingView, ImportOutcome};
use crate::Result;

/// Trait for broker holding repository operations.
#[async_trait]
pub trait BrokerHoldingRepositoryTrait: Send + Sync {
    /// Upserts drafts keyed by ticker symbol, in input order. An existing
    /// symbol is updated in place (same id, new quantity/cost); a new one
    /// is inserted. Returns the stored rows for the submitted drafts.
    async fn upsert_many(&self, drafts: Vec<BrokerHoldingDraft>) -> Result<Vec<BrokerHolding>>;

    fn list(&self) -> Result<Vec<BrokerHolding>>;

    async fn delete(&self, holding_id: &str) -> Result<()>;
}

/// Trait defining the broker import service interface.
#[async_trait]
pub trait BrokerImportServiceTrait: Send + Sync {
    /// Parses a brokerage CSV export and imports its rows. A malformed file
    /// is rejected wholesale; nothing reaches storage.
    async fn import_csv(&self, content: &[u8]) -> Result<ImportOutcome>;

    /// Imports pre-parsed rows.
    async fn import_rows(&self, rows: Vec<BrokerHoldingDraft>) -> Result<ImportOutcome>;

    /// Imports bare tickers with no position size (`quantity = 0`, no cost
    /// basis).
    async fn import_tickers(&self, tickers: Vec<String>) -> Result<ImportOutcome>;

    fn list_holdings(&self) -> Result<Vec<BrokerHolding>>;

    async fn remove_holding(&self, holding_id: &str) -> Result<()>;

    /// Joins stored holdings with live quotes. A failed lookup marks only
    /// its own row unavailable; a failed batch marks every row unavailable
    /// without erroring.
    async fn enriched_holdings(&self) -> Result<Vec<BrokerHoldingView>>;
}
