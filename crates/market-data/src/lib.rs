//! Dashfolio Market Data Crate
//!
//! Provider-agnostic live quote fetching for the Dashfolio engine.
//!
//! # Overview
//!
//! This crate owns the boundary between the portfolio engine and external
//! quote services:
//! - Batched latest-quote lookups with per-symbol error markers
//! - Fuzzy symbol search
//! - Normalization of loosely-typed wire payloads into one canonical record
//!
//! # Core Types
//!
//! - [`QuoteProvider`] - trait implemented by each quote source
//! - [`TickerQuote`] - canonical live price observation
//! - [`QuoteBatch`] - quotes plus per-symbol failures from one request
//! - [`SearchResult`] - candidate from a fuzzy symbol search
//!
//! Prices cross this boundary as `rust_decimal::Decimal`; raw floating-point
//! values that are NaN or infinite never leave this crate, they become
//! per-symbol failures instead.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{MarketState, QuoteBatch, QuoteFailure, SearchResult, TickerQuote};
pub use provider::yahoo::YahooProvider;
pub use provider::QuoteProvider;
