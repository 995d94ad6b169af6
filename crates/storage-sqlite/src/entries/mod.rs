//! SQLite storage implementation for portfolio entries.

mod model;
mod repository;

pub use model::PortfolioEntryDB;
pub use repository::EntryRepository;

// Re-export trait from core for convenience
pub use dashfolio_core::portfolio::EntryRepositoryTrait;
