//! SQLite storage implementation for the watchlist.

mod model;
mod repository;

pub use model::WatchlistItemDB;
pub use repository::WatchlistRepository;

// Re-export trait from core for convenience
pub use dashfolio_core::watchlist::WatchlistRepositoryTrait;
