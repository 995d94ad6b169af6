//! Watchlist module - tracked symbols with their own quote poller.
//!
//! The watchlist is independent of portfolio entries: items carry no value
//! or units, quotes live in a cache owned by this module (tab switches do
//! not touch it), and the poller runs on its own cadence.

mod watchlist_model;
mod watchlist_service;
mod watchlist_traits;

#[cfg(test)]
mod watchlist_service_tests;

// Re-export the public interface
pub use watchlist_model::{NewWatchlistItem, QuotedWatchlistItem, WatchlistItem};
pub use watchlist_service::WatchlistService;
pub use watchlist_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
