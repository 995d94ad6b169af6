//! Yahoo Finance quote provider.
//!
//! Talks to the public Yahoo endpoints:
//! - `v7/finance/quote` for batched latest quotes
//! - `v1/finance/search` for fuzzy symbol search
//!
//! The quote endpoint requires the cookie + crumb handshake; the crumb is
//! cached process-wide and refreshed once when Yahoo rejects it.

mod models;

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use num_traits::FromPrimitive;
use reqwest::header;
use rust_decimal::Decimal;
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{MarketState, QuoteBatch, QuoteFailure, SearchResult, TickerQuote};
use crate::provider::QuoteProvider;

use models::{QuoteEnvelope, QuoteRow, SearchEnvelope, SearchRow};

const PROVIDER_ID: &str = "YAHOO";

const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REQUEST_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data.
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

/// Process-wide cache for the Yahoo authentication crumb.
static YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::new(None);

fn invalidate_crumb() {
    *YAHOO_CRUMB.write().unwrap() = None;
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance quote provider.
///
/// Covers equities/ETFs (AAPL, SHOP.TO), cryptocurrencies (BTC-USD) and FX
/// pairs (EURUSD=X) through the same batch endpoint.
pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    ///
    /// The request timeout bounds how long a dead socket can hold up a poll
    /// tick; staleness handling beyond that belongs to the caller.
    pub fn new() -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(MarketDataError::Network)?;
        Ok(Self { client })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap();
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        let response = self
            .client
            .get(COOKIE_URL)
            .send()
            .await
            .map_err(send_error)?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Failed to parse Yahoo cookie".to_string(),
            })?;

        let crumb = self
            .client
            .get(CRUMB_URL)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(send_error)?
            .text()
            .await
            .map_err(send_error)?;

        if crumb.trim().is_empty() || crumb.contains("Invalid") {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: "Yahoo returned an unusable crumb".to_string(),
            });
        }

        let crumb_data = CrumbData { cookie, crumb };
        *YAHOO_CRUMB.write().unwrap() = Some(crumb_data.clone());
        Ok(crumb_data)
    }

    async fn quote_request(
        &self,
        symbols_param: &str,
        crumb: &CrumbData,
    ) -> Result<reqwest::Response, MarketDataError> {
        let url = format!(
            "{}?symbols={}&crumb={}",
            QUOTE_URL,
            encode(symbols_param),
            encode(&crumb.crumb)
        );

        self.client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(send_error)
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> Result<QuoteBatch, MarketDataError> {
        if symbols.is_empty() {
            return Ok(QuoteBatch::default());
        }

        let joined = symbols.join(",");
        let crumb = self.ensure_crumb().await?;
        let mut response = self.quote_request(&joined, &crumb).await?;

        // Yahoo expires crumbs without warning; refresh once and retry.
        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            debug!("Yahoo crumb rejected, fetching a fresh one");
            invalidate_crumb();
            let fresh = self.ensure_crumb().await?;
            response = self.quote_request(&joined, &fresh).await?;
        }

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("quote request returned HTTP {}", response.status()),
            });
        }

        let envelope: QuoteEnvelope =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::UnexpectedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })?;

        if let Some(error) = envelope.quote_response.error {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: error.to_string(),
            });
        }

        Ok(batch_from_rows(symbols, envelope.quote_response.result))
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}?q={}&quotesCount=10&newsCount=0",
            SEARCH_URL,
            encode(trimmed)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(send_error)?;

        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("search request returned HTTP {}", response.status()),
            });
        }

        let envelope: SearchEnvelope =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::UnexpectedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })?;

        Ok(envelope
            .quotes
            .into_iter()
            .filter_map(search_result_from_row)
            .collect())
    }
}

// ============================================================================
// Normalization
// ============================================================================

fn send_error(err: reqwest::Error) -> MarketDataError {
    if err.is_timeout() {
        MarketDataError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        MarketDataError::Network(err)
    }
}

/// Folds raw quote rows into a batch. Requested symbols the provider skipped,
/// or returned without a usable price, become failure markers so callers can
/// flag exactly those rows.
fn batch_from_rows(requested: &[String], rows: Vec<QuoteRow>) -> QuoteBatch {
    let fetched_at = Utc::now();
    let mut batch = QuoteBatch::default();

    for row in rows {
        match quote_from_row(row, fetched_at) {
            Ok(quote) => batch.quotes.push(quote),
            Err(Some(failure)) => batch.failures.push(failure),
            Err(None) => {} // row carried no symbol, nothing to attribute it to
        }
    }

    for symbol in requested {
        let upper = symbol.to_uppercase();
        let priced = batch.quotes.iter().any(|q| q.symbol == upper);
        let failed = batch.failures.iter().any(|f| f.symbol == upper);
        if !priced && !failed {
            batch
                .failures
                .push(QuoteFailure::new(upper, "no data returned for symbol"));
        }
    }

    batch
}

/// Normalizes one raw row. `Err(Some(failure))` marks the symbol unavailable;
/// `Err(None)` drops a row that cannot be attributed to any symbol.
fn quote_from_row(
    row: QuoteRow,
    fetched_at: DateTime<Utc>,
) -> Result<TickerQuote, Option<QuoteFailure>> {
    let symbol = match row.symbol {
        Some(s) if !s.trim().is_empty() => s.to_uppercase(),
        _ => return Err(None),
    };

    let price = match row
        .regular_market_price
        .filter(|p| p.is_finite())
        .and_then(Decimal::from_f64)
    {
        Some(p) => p,
        None => {
            return Err(Some(QuoteFailure::new(
                symbol,
                "missing or non-finite price",
            )))
        }
    };

    Ok(TickerQuote {
        symbol,
        price_per_unit: price,
        change_abs: row
            .regular_market_change
            .filter(|c| c.is_finite())
            .and_then(Decimal::from_f64),
        change_pct: row
            .regular_market_change_percent
            .filter(|c| c.is_finite())
            .and_then(Decimal::from_f64),
        currency: row.currency,
        exchange: row.full_exchange_name.or(row.exchange),
        market_state: row
            .market_state
            .as_deref()
            .map(MarketState::from_provider)
            .unwrap_or_default(),
        fetched_at,
    })
}

fn search_result_from_row(row: SearchRow) -> Option<SearchResult> {
    let symbol = row.symbol.filter(|s| !s.trim().is_empty())?;
    let name = row
        .shortname
        .or(row.longname)
        .unwrap_or_else(|| symbol.clone());
    let exchange = row.exch_disp.or(row.exchange).unwrap_or_default();

    let mut result = SearchResult::new(symbol, name, exchange);
    if let Some(currency) = row.currency {
        result = result.with_currency(currency);
    }
    if let Some(score) = row.score.filter(|s| s.is_finite()) {
        result = result.with_score(score);
    }
    Some(result)
}
