//! SQLite storage implementation for tabs.

mod model;
mod repository;

pub use model::TabDB;
pub use repository::TabRepository;

// Re-export trait from core for convenience
pub use dashfolio_core::tabs::TabRepositoryTrait;
