//! SQLite storage implementation for Dashfolio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `dashfolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for every core repository trait
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies
//! exist. The core crate is database-agnostic and works with traits.
//!
//! Reads go straight to the connection pool; every mutation is serialized
//! through a single-writer actor so pool connections never contend for
//! SQLite's write lock.

pub mod db;
pub mod errors;
pub mod schema;

mod utils;

// Repository implementations
pub mod brokers;
pub mod entries;
pub mod settings;
pub mod tabs;
pub mod watchlist;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from dashfolio-core for convenience
pub use dashfolio_core::errors::{DatabaseError, Error, Result};
