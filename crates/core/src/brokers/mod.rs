//! Broker holdings module - import intake, reconciliation, and quote
//! enrichment.
//!
//! Holdings arrive from brokerage exports (CSV) or bare ticker lists, are
//! normalized and merged by ticker symbol, and are served back joined with
//! live quotes.

mod broker_errors;
mod broker_model;
mod broker_traits;
mod csv_parser;
mod import_service;


pub use broker_errors::{ImportError, RowError};
pub use broker_model::{BrokerHolding, BrokerHoldingDraft, BrokerHoldingView, ImportOutcome};
pub use broker_traits::{BrokerHoldingRepositoryTrait, BrokerImportServiceTrait};
pub use csv_parser::{drafts_from_tickers, parse_broker_csv};
pub use import_service::BrokerImportService;
