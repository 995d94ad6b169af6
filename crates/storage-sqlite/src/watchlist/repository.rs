use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::WatchlistItemDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::watchlist_items;
use crate::schema::watchlist_items::dsl::*;
use dashfolio_core::errors::Result;
use dashfolio_core::watchlist::{NewWatchlistItem, WatchlistItem, WatchlistRepositoryTrait};

/// Repository for managing watchlist data in the database
pub struct WatchlistRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl WatchlistRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for WatchlistRepository {
    async fn add(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem> {
        new_item.validate()?;

        self.writer
            .exec(move |conn| {
                let mut item_db: WatchlistItemDB = new_item.into();
                if item_db.id.is_empty() {
                    item_db.id = uuid::Uuid::new_v4().to_string();
                }

                // The UNIQUE constraint on ticker_symbol backs up the
                // duplicate check done in the service.
                diesel::insert_into(watchlist_items::table)
                    .values(&item_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(item_db.into())
            })
            .await
    }

    async fn remove(&self, item_id_param: &str) -> Result<usize> {
        let id_to_delete = item_id_param.to_string();
        self.writer
            .exec(move |conn| {
                let deleted = diesel::delete(watchlist_items.find(&id_to_delete))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }

    fn list(&self) -> Result<Vec<WatchlistItem>> {
        let mut conn = get_connection(&self.pool)?;

        let results = watchlist_items
            .select(WatchlistItemDB::as_select())
            .order(created_at.asc())
            .load::<WatchlistItemDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(WatchlistItem::from).collect())
    }
}
