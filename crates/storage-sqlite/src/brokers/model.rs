//! Database model for imported broker holdings.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::parse_decimal_column;
use dashfolio_core::brokers::{BrokerHolding, BrokerHoldingDraft};
use dashfolio_core::constants::DEFAULT_DISPLAY_CURRENCY;

/// Database model for broker holdings
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
#[diesel(table_name = crate::schema::broker_holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
// A reimport without a cost basis clears the stored one.
#[diesel(treat_none_as_null = true)]
pub struct BrokerHoldingDB {
    pub id: String,
    pub ticker_symbol: String,
    pub display_name: String,
    pub quantity: String,
    pub avg_cost_basis: Option<String>,
    pub currency: String,
    pub imported_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<BrokerHoldingDB> for BrokerHolding {
    fn from(db: BrokerHoldingDB) -> Self {
        Self {
            id: db.id,
            ticker_symbol: db.ticker_symbol,
            display_name: db.display_name,
            quantity: parse_decimal_column(&db.quantity, "quantity"),
            avg_cost_basis: db
                .avg_cost_basis
                .as_deref()
                .map(|value| parse_decimal_column(value, "avg_cost_basis")),
            currency: db.currency,
            imported_at: db.imported_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<BrokerHoldingDraft> for BrokerHoldingDB {
    fn from(domain: BrokerHoldingDraft) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let symbol = domain.ticker_symbol;
        Self {
            id: String::new(), // Minted by the repository
            display_name: domain
                .display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| symbol.clone()),
            ticker_symbol: symbol,
            quantity: domain.quantity.to_string(),
            avg_cost_basis: domain.avg_cost_basis.map(|cost| cost.to_string()),
            currency: domain
                .currency
                .filter(|currency| !currency.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_CURRENCY.to_string()),
            imported_at: now,
            updated_at: now,
        }
    }
}
