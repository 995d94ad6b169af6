//! Wire models for the Yahoo quote endpoints.
//!
//! These structs mirror the loosely-typed JSON payloads as-is; normalization
//! into canonical records happens in the provider module and nothing here
//! escapes it.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    pub quote_response: QuoteResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteResponse {
    #[serde(default)]
    pub result: Vec<QuoteRow>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// One row of the v7 quote payload. Everything is optional: the endpoint
/// omits fields freely depending on instrument type and session.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRow {
    pub symbol: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_change: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub currency: Option<String>,
    pub full_exchange_name: Option<String>,
    pub exchange: Option<String>,
    pub market_state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub quotes: Vec<SearchRow>,
}

/// One candidate row of the v1 search payload. The name arrives as either
/// `shortname`, `longname`, or neither.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRow {
    pub symbol: Option<String>,
    pub shortname: Option<String>,
    pub longname: Option<String>,
    pub exch_disp: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub score: Option<f64>,
}
