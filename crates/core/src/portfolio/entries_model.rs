//! Portfolio entry domain models.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Domain model for a user-recorded holding inside a tab.
///
/// `recorded_value` is the position's total value in its own `currency` and
/// is never converted in storage. `units` is optional: fractional positions
/// are legal, and a missing or non-positive unit count is priced as exactly
/// one unit at valuation time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioEntry {
    pub id: String,
    pub tab_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Decimal>,
    pub currency: String,
    pub recorded_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price_per_unit: Option<Decimal>,
    pub entry_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tab_id: String,
    pub display_name: String,
    pub ticker_symbol: Option<String>,
    pub units: Option<Decimal>,
    pub currency: String,
    pub recorded_value: Decimal,
    pub base_price_per_unit: Option<Decimal>,
    pub entry_date: NaiveDate,
}

impl NewEntry {
    /// Validates the new entry data.
    pub fn validate(&self) -> Result<()> {
        if self.tab_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Entry must belong to a tab".to_string(),
            )));
        }
        if self.display_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Entry name cannot be empty".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for updating an existing entry. Entries never move between
/// tabs; the tab association is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryUpdate {
    pub id: Option<String>,
    pub display_name: String,
    pub ticker_symbol: Option<String>,
    pub units: Option<Decimal>,
    pub currency: String,
    pub recorded_value: Decimal,
    pub base_price_per_unit: Option<Decimal>,
    pub entry_date: NaiveDate,
}

impl EntryUpdate {
    /// Validates the entry update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Entry ID is required for updates".to_string(),
            )));
        }
        if self.display_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Entry name cannot be empty".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// Distinct uppercased ticker symbols across entries, in first-seen order.
/// Entries without a symbol are skipped. This is the set the holdings
/// poller fetches.
pub fn distinct_ticker_symbols(entries: &[PortfolioEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for entry in entries {
        if let Some(symbol) = entry
            .ticker_symbol
            .as_deref()
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
        {
            let symbol = symbol.to_uppercase();
            if seen.insert(symbol.clone()) {
                symbols.push(symbol);
            }
        }
    }
    symbols
}
