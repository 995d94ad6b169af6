//! Broker holding domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_DECIMAL_PRECISION;
use crate::errors::ValidationError;
use crate::{Error, Result};

/// A holding imported from a brokerage export.
///
/// Unlike a `PortfolioEntry`, a broker holding carries its own cost basis
/// and is keyed by ticker symbol: re-importing a symbol updates the stored
/// row instead of creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrokerHolding {
    pub id: String,
    pub ticker_symbol: String,
    pub display_name: String,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_cost_basis: Option<Decimal>,
    pub currency: String,
    pub imported_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A normalized import row, ready for upsert.
///
/// Produced by the CSV parser or the ticker-list intake; ids and timestamps
/// are minted by storage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrokerHoldingDraft {
    pub ticker_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_cost_basis: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl BrokerHoldingDraft {
    /// Draft for a bare ticker with no position size.
    pub fn from_ticker(symbol: impl Into<String>) -> Self {
        Self {
            ticker_symbol: symbol.into(),
            display_name: None,
            quantity: Decimal::ZERO,
            avg_cost_basis: None,
            currency: None,
        }
    }

    /// Validates the draft before submission.
    pub fn validate(&self) -> Result<()> {
        if self.ticker_symbol.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Ticker symbol cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

/// Outcome of one import request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Distinct holdings created or updated by this import.
    pub imported_count: usize,
    pub holdings: Vec<BrokerHolding>,
}

/// A stored holding joined with its live quote.
///
/// The quote join is transient; nothing here is persisted. A holding whose
/// lookup failed keeps its stored fields and carries `error: true` with all
/// price-derived fields absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerHoldingView {
    #[serde(flatten)]
    pub holding: BrokerHolding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_loss: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_loss_pct: Option<Decimal>,
    /// True when the live lookup for this ticker failed.
    pub error: bool,
}

impl BrokerHoldingView {
    /// View for a holding priced by a live quote.
    pub fn priced(holding: BrokerHolding, price_per_unit: Decimal) -> Self {
        let position_value = holding.quantity * price_per_unit;
        let position_cost = holding.avg_cost_basis.map(|cost| holding.quantity * cost);
        let gain_loss = position_cost.map(|cost| position_value - cost);
        let gain_loss_pct = match (gain_loss, position_cost) {
            (Some(gain), Some(cost)) if cost > Decimal::ZERO => {
                Some((gain / cost * Decimal::ONE_HUNDRED).round_dp(PERCENT_DECIMAL_PRECISION))
            }
            _ => None,
        };

        Self {
            holding,
            price_per_unit: Some(price_per_unit),
            position_value: Some(position_value),
            position_cost,
            gain_loss,
            gain_loss_pct,
            error: false,
        }
    }

    /// View for a holding whose lookup failed or returned nothing.
    pub fn unavailable(holding: BrokerHolding) -> Self {
        Self {
            holding,
            price_per_unit: None,
            position_value: None,
            position_cost: None,
            gain_loss: None,
            gain_loss_pct: None,
            error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(quantity: Decimal, avg_cost_basis: Option<Decimal>) -> BrokerHolding {
        BrokerHolding {
            id: "bh-1".to_string(),
            ticker_symbol: "AAPL".to_string(),
            display_name: "Apple Inc.".to_string(),
            quantity,
            avg_cost_basis,
            currency: "USD".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_priced_view_derives_position_fields() {
        let view = BrokerHoldingView::priced(holding(dec!(10), Some(dec!(100))), dec!(120));

        assert_eq!(view.position_value, Some(dec!(1200)));
        assert_eq!(view.position_cost, Some(dec!(1000)));
        assert_eq!(view.gain_loss, Some(dec!(200)));
        assert_eq!(view.gain_loss_pct, Some(dec!(20)));
        assert!(!view.error);
    }

    #[test]
    fn test_priced_view_without_cost_basis_has_no_gain_fields() {
        let view = BrokerHoldingView::priced(holding(dec!(10), None), dec!(120));

        assert_eq!(view.position_value, Some(dec!(1200)));
        assert_eq!(view.position_cost, None);
        assert_eq!(view.gain_loss, None);
        assert_eq!(view.gain_loss_pct, None);
    }

    #[test]
    fn test_zero_quantity_gives_no_percentage() {
        // quantity 0 makes position_cost 0; the percentage denominator guard
        // must yield None rather than divide.
        let view = BrokerHoldingView::priced(holding(Decimal::ZERO, Some(dec!(100))), dec!(120));

        assert_eq!(view.position_value, Some(Decimal::ZERO));
        assert_eq!(view.position_cost, Some(Decimal::ZERO));
        assert_eq!(view.gain_loss, Some(Decimal::ZERO));
        assert_eq!(view.gain_loss_pct, None);
    }

    #[test]
    fn test_unavailable_view_keeps_stored_fields_only() {
        let view = BrokerHoldingView::unavailable(holding(dec!(5), Some(dec!(50))));

        assert!(view.error);
        assert_eq!(view.price_per_unit, None);
        assert_eq!(view.position_value, None);
        assert_eq!(view.holding.quantity, dec!(5));
    }
}
