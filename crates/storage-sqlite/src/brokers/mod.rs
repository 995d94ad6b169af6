//! SQLite storage implementation for broker holdings.

mod model;
mod repository;

pub use model::BrokerHoldingDB;
pub use repository::BrokerHoldingRepository;

// Re-export trait from core for convenience
pub use dashfolio_core::brokers::BrokerHoldingRepositoryTrait;
