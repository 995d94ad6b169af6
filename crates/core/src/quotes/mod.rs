//! Quotes module - live price cache and background pollers.
//!
//! Quotes are ephemeral: they live in a merge-only in-memory cache that is
//! rebuilt by polling and never persisted. Two independent pollers keep the
//! cache fresh, one for the active tab's holdings and one for the watchlist.

mod cache;
mod poller;


// Re-export the public interface
pub use cache::QuoteCache;
pub use poller::{PollScope, PollerHandle, PricePoller, TickOutcome, TickerSource};
