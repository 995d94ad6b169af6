//! Dashfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the portfolio valuation and live-pricing engine:
//! isolated holdings workspaces ("tabs"), per-position valuation, multi-
//! currency summaries, periodic single-flight quote polling, a watchlist,
//! and broker import reconciliation.
//!
//! It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate; live quotes arrive through
//! the provider trait defined in the `market-data` crate.

pub mod brokers;
pub mod constants;
pub mod drafts;
pub mod errors;
pub mod events;
pub mod fx;
pub mod portfolio;
pub mod quotes;
pub mod settings;
pub mod tabs;
pub mod watchlist;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
