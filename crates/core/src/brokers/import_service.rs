//! Broker import service.
//!
//! Normalizes import intents (CSV file, pre-parsed rows, bare ticker list)
//! into upserts keyed by ticker symbol, and serves the quote-enriched view
//! of stored holdings.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::broker_model::{BrokerHolding, BrokerHoldingDraft, BrokerHoldingView, ImportOutcome};
use super::broker_traits::{BrokerHoldingRepositoryTrait, BrokerImportServiceTrait};
use super::csv_parser::{drafts_from_tickers, parse_broker_csv};
use crate::events::{DomainEvent, DomainEventSink};
use crate::Result;
use dashfolio_market_data::QuoteProvider;

/// Service for importing and enriching broker holdings.
pub struct BrokerImportService {
    repository: Arc<dyn BrokerHoldingRepositoryTrait>,
    provider: Arc<dyn QuoteProvider>,
    event_sink: Arc<dyn DomainEventSink>,
    default_currency: String,
}

impl BrokerImportService {
    pub fn new(
        repository: Arc<dyn BrokerHoldingRepositoryTrait>,
        provider: Arc<dyn QuoteProvider>,
        event_sink: Arc<dyn DomainEventSink>,
        default_currency: String,
    ) -> Self {
        Self {
            repository,
            provider,
            event_sink,
            default_currency,
        }
    }

    /// Uppercases symbols, de-duplicates them (the last occurrence wins, the
    /// first occurrence keeps its position), and resolves display name and
    /// currency fallbacks. Drafts leave here fully resolved.
    fn normalize(&self, rows: Vec<BrokerHoldingDraft>) -> Result<Vec<BrokerHoldingDraft>> {
        let mut order: Vec<String> = Vec::new();
        let mut merged: HashMap<String, BrokerHoldingDraft> = HashMap::new();

        for mut draft in rows {
            draft.validate()?;
            let symbol = draft.ticker_symbol.trim().to_uppercase();
            let display_name = draft
                .display_name
                .take()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| symbol.clone());
            let currency = draft
                .currency
                .take()
                .filter(|currency| !currency.trim().is_empty())
                .unwrap_or_else(|| self.default_currency.clone());

            draft.ticker_symbol = symbol.clone();
            draft.display_name = Some(display_name);
            draft.currency = Some(currency.to_uppercase());

            if !merged.contains_key(&symbol) {
                order.push(symbol.clone());
            }
            merged.insert(symbol, draft);
        }

        Ok(order
            .into_iter()
            .filter_map(|symbol| merged.remove(&symbol))
            .collect())
    }
}

#[async_trait]
impl BrokerImportServiceTrait for BrokerImportService {
    async fn import_csv(&self, content: &[u8]) -> Result<ImportOutcome> {
        let drafts = parse_broker_csv(content)?;
        self.import_rows(drafts).await
    }

    async fn import_rows(&self, rows: Vec<BrokerHoldingDraft>) -> Result<ImportOutcome> {
        let drafts = self.normalize(rows)?;
        if drafts.is_empty() {
            return Ok(ImportOutcome {
                imported_count: 0,
                holdings: Vec::new(),
            });
        }

        let holdings = self.repository.upsert_many(drafts).await?;
        let symbols: Vec<String> = holdings
            .iter()
            .map(|holding| holding.ticker_symbol.clone())
            .collect();
        debug!("Imported {} broker holdings", holdings.len());
        self.event_sink.emit(DomainEvent::broker_holdings_imported(
            holdings.len(),
            symbols,
        ));

        Ok(ImportOutcome {
            imported_count: holdings.len(),
            holdings,
        })
    }

    async fn import_tickers(&self, tickers: Vec<String>) -> Result<ImportOutcome> {
        self.import_rows(drafts_from_tickers(tickers)).await
    }

    fn list_holdings(&self) -> Result<Vec<BrokerHolding>> {
        self.repository.list()
    }

    async fn remove_holding(&self, holding_id: &str) -> Result<()> {
        self.repository.delete(holding_id).await?;
        let remaining = self
            .repository
            .list()?
            .into_iter()
            .map(|holding| holding.id)
            .collect();
        self.event_sink
            .emit(DomainEvent::broker_holdings_changed(remaining));
        Ok(())
    }

    async fn enriched_holdings(&self) -> Result<Vec<BrokerHoldingView>> {
        let holdings = self.repository.list()?;
        if holdings.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut symbols = Vec::new();
        for holding in &holdings {
            let symbol = holding.ticker_symbol.to_uppercase();
            if seen.insert(symbol.clone()) {
                symbols.push(symbol);
            }
        }

        let batch = match self.provider.fetch_quotes(&symbols).await {
            Ok(batch) => batch,
            Err(e) => {
                // Whole-batch failure: every row is shown unavailable, the
                // stored data itself is untouched.
                warn!("Quote lookup for broker holdings failed: {}", e);
                return Ok(holdings
                    .into_iter()
                    .map(BrokerHoldingView::unavailable)
                    .collect());
            }
        };
        for failure in &batch.failures {
            debug!(
                "No quote for broker holding {}: {}",
                failure.symbol, failure.message
            );
        }

        let prices: HashMap<String, Decimal> = batch
            .quotes
            .iter()
            .map(|quote| (quote.symbol.to_uppercase(), quote.price_per_unit))
            .collect();

        Ok(holdings
            .into_iter()
            .map(
                |holding| match prices.get(&holding.ticker_symbol.to_uppercase()) {
                    Some(price) => BrokerHoldingView::priced(holding, *price),
                    None => BrokerHoldingView::unavailable(holding),
                },
            )
            .collect())
    }
}
