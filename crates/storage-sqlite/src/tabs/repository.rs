use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::TabDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::tabs;
use crate::schema::tabs::dsl::*;
use dashfolio_core::errors::Result;
use dashfolio_core::tabs::{NewTab, Tab, TabRepositoryTrait, TabUpdate};

/// Repository for managing tab data in the database
pub struct TabRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TabRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TabRepositoryTrait for TabRepository {
    async fn create(&self, new_tab: NewTab) -> Result<Tab> {
        new_tab.validate()?;

        self.writer
            .exec(move |conn| {
                let mut tab_db: TabDB = new_tab.into();
                if tab_db.id.is_empty() {
                    tab_db.id = uuid::Uuid::new_v4().to_string();
                }

                diesel::insert_into(tabs::table)
                    .values(&tab_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(tab_db.into())
            })
            .await
    }

    async fn rename(&self, tab_update: TabUpdate) -> Result<Tab> {
        tab_update.validate()?;

        self.writer
            .exec(move |conn| {
                let tab_id = tab_update.id.clone().unwrap_or_default();

                let existing = tabs
                    .select(TabDB::as_select())
                    .find(&tab_id)
                    .first::<TabDB>(conn)
                    .map_err(StorageError::from)?;

                let tab_db = TabDB {
                    name: tab_update.name,
                    updated_at: chrono::Utc::now().naive_utc(),
                    ..existing
                };

                diesel::update(tabs.find(&tab_id))
                    .set(&tab_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(tab_db.into())
            })
            .await
    }

    /// Deletes a tab; its entries go with it through the foreign key cascade.
    async fn delete(&self, tab_id_param: &str) -> Result<usize> {
        let id_to_delete = tab_id_param.to_string();
        self.writer
            .exec(move |conn| {
                let deleted = diesel::delete(tabs.find(&id_to_delete))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }

    async fn set_active(&self, tab_id_param: &str) -> Result<()> {
        let target_id = tab_id_param.to_string();
        self.writer
            .exec(move |conn| {
                let activated = diesel::update(tabs.find(&target_id))
                    .set((
                        is_active.eq(true),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                if activated == 0 {
                    return Err(StorageError::from(diesel::result::Error::NotFound).into());
                }

                diesel::update(tabs.filter(id.ne(&target_id)))
                    .set(is_active.eq(false))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(())
            })
            .await
    }

    fn get_by_id(&self, tab_id_param: &str) -> Result<Tab> {
        let mut conn = get_connection(&self.pool)?;

        let tab = tabs
            .select(TabDB::as_select())
            .find(tab_id_param)
            .first::<TabDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(tab.into())
    }

    fn list(&self) -> Result<Vec<Tab>> {
        let mut conn = get_connection(&self.pool)?;

        let results = tabs
            .select(TabDB::as_select())
            .order(created_at.asc())
            .load::<TabDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(Tab::from).collect())
    }
}
