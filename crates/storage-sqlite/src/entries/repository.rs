use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::PortfolioEntryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::portfolio_entries;
use crate::schema::portfolio_entries::dsl::*;
use dashfolio_core::errors::Result;
use dashfolio_core::portfolio::{EntryRepositoryTrait, EntryUpdate, NewEntry, PortfolioEntry};

/// Repository for managing portfolio entry data in the database
pub struct EntryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl EntryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl EntryRepositoryTrait for EntryRepository {
    async fn create(&self, new_entry: NewEntry) -> Result<PortfolioEntry> {
        new_entry.validate()?;

        self.writer
            .exec(move |conn| {
                let mut entry_db: PortfolioEntryDB = new_entry.into();
                if entry_db.id.is_empty() {
                    entry_db.id = uuid::Uuid::new_v4().to_string();
                }

                diesel::insert_into(portfolio_entries::table)
                    .values(&entry_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(entry_db.into())
            })
            .await
    }

    async fn update(&self, entry_update: EntryUpdate) -> Result<PortfolioEntry> {
        entry_update.validate()?;

        self.writer
            .exec(move |conn| {
                let mut entry_db: PortfolioEntryDB = entry_update.into();

                let existing = portfolio_entries
                    .select(PortfolioEntryDB::as_select())
                    .find(&entry_db.id)
                    .first::<PortfolioEntryDB>(conn)
                    .map_err(StorageError::from)?;

                // An update never moves an entry to another tab.
                entry_db.tab_id = existing.tab_id;
                entry_db.created_at = existing.created_at;

                diesel::update(portfolio_entries.find(&entry_db.id))
                    .set(&entry_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(entry_db.into())
            })
            .await
    }

    async fn delete(&self, entry_id_param: &str) -> Result<usize> {
        let id_to_delete = entry_id_param.to_string();
        self.writer
            .exec(move |conn| {
                let deleted = diesel::delete(portfolio_entries.find(&id_to_delete))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }

    fn get_by_id(&self, entry_id_param: &str) -> Result<PortfolioEntry> {
        let mut conn = get_connection(&self.pool)?;

        let entry = portfolio_entries
            .select(PortfolioEntryDB::as_select())
            .find(entry_id_param)
            .first::<PortfolioEntryDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(entry.into())
    }

    fn list_for_tab(&self, tab_id_param: &str) -> Result<Vec<PortfolioEntry>> {
        let mut conn = get_connection(&self.pool)?;

        let results = portfolio_entries
            .filter(tab_id.eq(tab_id_param))
            .select(PortfolioEntryDB::as_select())
            .order((entry_date.asc(), created_at.asc()))
            .load::<PortfolioEntryDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(PortfolioEntry::from).collect())
    }
}
