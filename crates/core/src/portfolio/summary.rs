//! Multi-currency portfolio rollups.
//!
//! Pure aggregation over already-valued entries. Native-currency totals are
//! always complete; only the converted display total can be partial, and a
//! gap is reported through a flag rather than an error.

use std::collections::BTreeMap;

use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::brokers::BrokerHoldingView;
use crate::constants::PERCENT_DECIMAL_PRECISION;
use crate::fx::RateTable;
use crate::portfolio::valuation::ValuedEntry;

/// Total for one native currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyTotal {
    pub currency: String,
    pub total_value: Decimal,
    pub entry_count: usize,
}

/// Rolled-up view of one tab's entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub display_currency: String,
    /// Grand total in the display currency. Entries whose currency has no
    /// usable rate are excluded from this figure only.
    pub total_value: Decimal,
    pub totals_by_currency: Vec<CurrencyTotal>,
    /// True when at least one entry was excluded from `total_value` for
    /// lack of an FX rate.
    pub partial_data: bool,
}

/// Rolls valued entries into per-currency totals plus one display-currency
/// grand total.
pub fn summarize(entries: &[ValuedEntry], rates: &RateTable) -> PortfolioSummary {
    let mut by_currency: BTreeMap<String, CurrencyTotal> = BTreeMap::new();
    let mut total_value = Decimal::ZERO;
    let mut partial_data = false;

    for valued in entries {
        let currency = valued.entry.currency.to_uppercase();
        let bucket = by_currency
            .entry(currency.clone())
            .or_insert_with(|| CurrencyTotal {
                currency: currency.clone(),
                total_value: Decimal::ZERO,
                entry_count: 0,
            });
        bucket.total_value += valued.valuation.total_value;
        bucket.entry_count += 1;

        match rates.convert_into_display(valued.valuation.total_value, &currency) {
            Some(converted) => total_value += converted,
            None => {
                warn!(
                    "No usable FX rate for {} -> {}, excluding entry {} from the converted total",
                    currency,
                    rates.display_currency(),
                    valued.entry.id
                );
                partial_data = true;
            }
        }
    }

    PortfolioSummary {
        display_currency: rates.display_currency().to_string(),
        total_value,
        totals_by_currency: by_currency.into_values().collect(),
        partial_data,
    }
}

/// Gain/loss rollup across broker holdings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerGainLoss {
    pub total_gain_loss: Decimal,
    /// None when no holding carries a positive cost basis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_gain_loss_pct: Option<Decimal>,
}

/// Sums gain/loss over holdings that have both a position value and a
/// positive position cost. Holdings missing either side contribute
/// nothing. A zero cost denominator yields a `None` percentage.
pub fn summarize_broker_holdings(holdings: &[BrokerHoldingView]) -> BrokerGainLoss {
    let mut total_gain_loss = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for view in holdings {
        if let (Some(value), Some(cost)) = (view.position_value, view.position_cost) {
            if cost > Decimal::ZERO {
                total_gain_loss += value - cost;
                total_cost += cost;
            }
        }
    }

    let total_gain_loss_pct = if total_cost > Decimal::ZERO {
        Some(
            (total_gain_loss / total_cost * Decimal::ONE_HUNDRED)
                .round_dp(PERCENT_DECIMAL_PRECISION),
        )
    } else {
        None
    };

    BrokerGainLoss {
        total_gain_loss,
        total_gain_loss_pct,
    }
}
