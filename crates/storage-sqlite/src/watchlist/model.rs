//! Database model for watchlist items.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use dashfolio_core::watchlist::{NewWatchlistItem, WatchlistItem};

/// Database model for watchlist items
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
#[diesel(table_name = crate::schema::watchlist_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WatchlistItemDB {
    pub id: String,
    pub ticker_symbol: String,
    pub display_name: String,
    pub created_at: NaiveDateTime,
}

// Conversion implementations
impl From<WatchlistItemDB> for WatchlistItem {
    fn from(db: WatchlistItemDB) -> Self {
        Self {
            id: db.id,
            ticker_symbol: db.ticker_symbol,
            display_name: db.display_name,
            created_at: db.created_at,
        }
    }
}

impl From<NewWatchlistItem> for WatchlistItemDB {
    fn from(domain: NewWatchlistItem) -> Self {
        let symbol = domain.normalized_symbol();
        Self {
            id: domain.id.unwrap_or_default(),
            display_name: domain
                .display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| symbol.clone()),
            ticker_symbol: symbol,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
