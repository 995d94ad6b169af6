//! Database model for portfolio entries.
//!
//! Decimal columns are stored as TEXT to keep exact values; SQLite's REAL
//! would round-trip through binary floating point.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::parse_decimal_column;
use dashfolio_core::portfolio::{EntryUpdate, NewEntry, PortfolioEntry};

/// Database model for portfolio entries
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::portfolio_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
// Updates replace the whole row; a None must clear the column, not keep it.
#[diesel(treat_none_as_null = true)]
pub struct PortfolioEntryDB {
    pub id: String,
    pub tab_id: String,
    pub display_name: String,
    pub ticker_symbol: Option<String>,
    pub units: Option<String>,
    pub currency: String,
    pub recorded_value: String,
    pub base_price_per_unit: Option<String>,
    pub entry_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<PortfolioEntryDB> for PortfolioEntry {
    fn from(db: PortfolioEntryDB) -> Self {
        Self {
            id: db.id,
            tab_id: db.tab_id,
            display_name: db.display_name,
            ticker_symbol: db.ticker_symbol,
            units: db
                .units
                .as_deref()
                .map(|value| parse_decimal_column(value, "units")),
            currency: db.currency,
            recorded_value: parse_decimal_column(&db.recorded_value, "recorded_value"),
            base_price_per_unit: db
                .base_price_per_unit
                .as_deref()
                .map(|value| parse_decimal_column(value, "base_price_per_unit")),
            entry_date: db.entry_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewEntry> for PortfolioEntryDB {
    fn from(domain: NewEntry) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            tab_id: domain.tab_id,
            display_name: domain.display_name,
            ticker_symbol: domain.ticker_symbol,
            units: domain.units.map(|units| units.to_string()),
            currency: domain.currency,
            recorded_value: domain.recorded_value.to_string(),
            base_price_per_unit: domain.base_price_per_unit.map(|price| price.to_string()),
            entry_date: domain.entry_date,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<EntryUpdate> for PortfolioEntryDB {
    fn from(domain: EntryUpdate) -> Self {
        Self {
            id: domain.id.unwrap_or_default(),
            tab_id: String::new(), // Filled from the existing record
            display_name: domain.display_name,
            ticker_symbol: domain.ticker_symbol,
            units: domain.units.map(|units| units.to_string()),
            currency: domain.currency,
            recorded_value: domain.recorded_value.to_string(),
            base_price_per_unit: domain.base_price_per_unit.map(|price| price.to_string()),
            entry_date: domain.entry_date,
            created_at: NaiveDateTime::default(), // Filled from the existing record
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
