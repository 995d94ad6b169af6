use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::BrokerHoldingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::broker_holdings;
use crate::schema::broker_holdings::dsl::*;
use dashfolio_core::brokers::{BrokerHolding, BrokerHoldingDraft, BrokerHoldingRepositoryTrait};
use dashfolio_core::errors::Result;

/// Repository for managing imported broker holdings in the database
pub struct BrokerHoldingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BrokerHoldingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BrokerHoldingRepositoryTrait for BrokerHoldingRepository {
    async fn upsert_many(&self, drafts: Vec<BrokerHoldingDraft>) -> Result<Vec<BrokerHolding>> {
        self.writer
            .exec(move |conn| {
                let mut stored = Vec::with_capacity(drafts.len());

                for draft in drafts {
                    let draft_db: BrokerHoldingDB = draft.into();

                    let existing = broker_holdings
                        .filter(ticker_symbol.eq(&draft_db.ticker_symbol))
                        .select(BrokerHoldingDB::as_select())
                        .first::<BrokerHoldingDB>(conn)
                        .optional()
                        .map_err(StorageError::from)?;

                    let row = match existing {
                        Some(current) => {
                            // Reimport updates the position in place; the row
                            // keeps its id and original import time.
                            let updated = BrokerHoldingDB {
                                display_name: draft_db.display_name,
                                quantity: draft_db.quantity,
                                avg_cost_basis: draft_db.avg_cost_basis,
                                currency: draft_db.currency,
                                updated_at: draft_db.updated_at,
                                ..current
                            };
                            diesel::update(broker_holdings.find(&updated.id))
                                .set(&updated)
                                .execute(conn)
                                .map_err(StorageError::from)?;
                            updated
                        }
                        None => {
                            let inserted = BrokerHoldingDB {
                                id: uuid::Uuid::new_v4().to_string(),
                                ..draft_db
                            };
                            diesel::insert_into(broker_holdings::table)
                                .values(&inserted)
                                .execute(conn)
                                .map_err(StorageError::from)?;
                            inserted
                        }
                    };

                    stored.push(row.into());
                }

                Ok(stored)
            })
            .await
    }

    fn list(&self) -> Result<Vec<BrokerHolding>> {
        let mut conn = get_connection(&self.pool)?;

        let results = broker_holdings
            .select(BrokerHoldingDB::as_select())
            .order(ticker_symbol.asc())
            .load::<BrokerHoldingDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(BrokerHolding::from).collect())
    }

    async fn delete(&self, holding_id_param: &str) -> Result<()> {
        let id_to_delete = holding_id_param.to_string();
        self.writer
            .exec(move |conn| {
                let deleted = diesel::delete(broker_holdings.find(&id_to_delete))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                if deleted == 0 {
                    return Err(StorageError::from(diesel::result::Error::NotFound).into());
                }

                Ok(())
            })
            .await
    }
}
