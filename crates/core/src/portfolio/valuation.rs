//! Per-entry valuation math.
//!
//! `compute` is a pure function over one entry and the cached quote for its
//! symbol. It never fails and never divides by zero: missing or unusable
//! quotes fall back to the entry's own recorded value, and a missing or
//! non-positive unit count is treated as exactly one unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use dashfolio_market_data::{MarketState, TickerQuote};

use crate::constants::PERCENT_DECIMAL_PRECISION;
use crate::portfolio::entries_model::PortfolioEntry;

/// Derived metrics for one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryValuation {
    /// Effective unit count used in the math. Never zero.
    pub unit_count: Decimal,
    pub price_per_unit: Decimal,
    pub total_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_abs: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_pct: Option<Decimal>,
    /// True when the price came from a live quote rather than the
    /// recorded value.
    pub live_price: bool,
}

/// Computes valuation metrics for an entry against an optional quote.
///
/// - `unit_count` is the entry's units when greater than zero, else one.
/// - `price_per_unit` is the quote's price when present, else
///   `recorded_value / unit_count`.
/// - Growth is only derived when a non-zero base price is recorded.
pub fn compute(entry: &PortfolioEntry, quote: Option<&TickerQuote>) -> EntryValuation {
    let unit_count = match entry.units {
        Some(units) if units > Decimal::ZERO => units,
        _ => Decimal::ONE,
    };

    let (price_per_unit, live_price) = match quote {
        Some(quote) => (quote.price_per_unit, true),
        None => (entry.recorded_value / unit_count, false),
    };

    let total_value = unit_count * price_per_unit;

    let (growth_abs, growth_pct) = match entry.base_price_per_unit {
        Some(base) if !base.is_zero() => {
            let abs = price_per_unit - base;
            let pct = (abs / base * Decimal::ONE_HUNDRED).round_dp(PERCENT_DECIMAL_PRECISION);
            (Some(abs), Some(pct))
        }
        _ => (None, None),
    };

    EntryValuation {
        unit_count,
        price_per_unit,
        total_value,
        growth_abs,
        growth_pct,
        live_price,
    }
}

/// Entry plus its derived metrics and quote freshness, as exposed to view
/// consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuedEntry {
    #[serde(flatten)]
    pub entry: PortfolioEntry,
    #[serde(flatten)]
    pub valuation: EntryValuation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_state: Option<MarketState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_fetched_at: Option<DateTime<Utc>>,
}

/// Builds the view model for one entry from the cached quote, if any.
pub fn value_entry(entry: PortfolioEntry, quote: Option<&TickerQuote>) -> ValuedEntry {
    let valuation = compute(&entry, quote);
    ValuedEntry {
        valuation,
        quote_currency: quote.and_then(|quote| quote.currency.clone()),
        market_state: quote.map(|quote| quote.market_state),
        quote_fetched_at: quote.map(|quote| quote.fetched_at),
        entry,
    }
}
