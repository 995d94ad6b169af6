//! Portfolio module - entries, valuation, and multi-currency summaries.
//!
//! The valuation path is deliberately layered:
//!
//! 1. **Models** (`entries_model.rs`) - entry records as stored
//! 2. **Calculator** (`valuation.rs`) - pure per-entry math over (entry, quote)
//! 3. **Aggregator** (`summary.rs`) - pure rollup into per-currency totals
//! 4. **Service** (`entries_service.rs`) - CRUD plus orchestration of the
//!    calculator, aggregator, quote cache, and the holdings poller
//!
//! The calculator and aggregator have no dependency on storage or network,
//! so every numeric edge case is testable without mocks.

mod entries_model;
mod entries_service;
mod entries_traits;
mod summary;
mod valuation;

#[cfg(test)]
mod entries_service_tests;
#[cfg(test)]
mod summary_tests;

// Re-export the public interface
pub use entries_model::{distinct_ticker_symbols, EntryUpdate, NewEntry, PortfolioEntry};
pub use entries_service::EntryService;
pub use entries_traits::{EntryRepositoryTrait, EntryServiceTrait};
pub use summary::{
    summarize, summarize_broker_holdings, BrokerGainLoss, CurrencyTotal, PortfolioSummary,
};
pub use valuation::{compute, value_entry, EntryValuation, ValuedEntry};
