//! Database model for tabs.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use dashfolio_core::tabs::{NewTab, Tab};

/// Database model for tabs
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
#[diesel(table_name = crate::schema::tabs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TabDB {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<TabDB> for Tab {
    fn from(db: TabDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewTab> for TabDB {
    fn from(domain: NewTab) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            name: domain.name,
            // New tabs start inactive; activation is an explicit step.
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }
}
