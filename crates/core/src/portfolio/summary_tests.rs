//! Tests for multi-currency summaries and the broker gain/loss rollup.

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::brokers::{BrokerHolding, BrokerHoldingView};
    use crate::fx::RateTable;
    use crate::portfolio::{
        summarize, summarize_broker_holdings, value_entry, PortfolioEntry, ValuedEntry,
    };

    fn entry(id: &str, currency: &str, units: Decimal, recorded_value: Decimal) -> ValuedEntry {
        value_entry(
            PortfolioEntry {
                id: id.to_string(),
                tab_id: "tab-1".to_string(),
                display_name: id.to_string(),
                ticker_symbol: None,
                units: Some(units),
                currency: currency.to_string(),
                recorded_value,
                base_price_per_unit: None,
                entry_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                ..Default::default()
            },
            None,
        )
    }

    fn holding_view(
        symbol: &str,
        position_value: Option<Decimal>,
        position_cost: Option<Decimal>,
    ) -> BrokerHoldingView {
        let now = Utc::now().naive_utc();
        BrokerHoldingView {
            holding: BrokerHolding {
                id: symbol.to_lowercase(),
                ticker_symbol: symbol.to_string(),
                display_name: symbol.to_string(),
                quantity: dec!(1),
                avg_cost_basis: None,
                currency: "USD".to_string(),
                imported_at: now,
                updated_at: now,
            },
            price_per_unit: None,
            position_value,
            position_cost,
            gain_loss: None,
            gain_loss_pct: None,
            error: false,
        }
    }

    // ==================== Portfolio Summary ====================

    #[test]
    fn test_native_totals_are_always_complete() {
        let entries = vec![
            entry("a", "USD", dec!(1), dec!(100)),
            entry("b", "USD", dec!(1), dec!(50)),
            entry("c", "ILS", dec!(1), dec!(370)),
        ];
        // No ILS rate on purpose.
        let rates = RateTable::new("USD");

        let summary = summarize(&entries, &rates);
        assert_eq!(summary.totals_by_currency.len(), 2);

        let ils = summary
            .totals_by_currency
            .iter()
            .find(|total| total.currency == "ILS")
            .unwrap();
        assert_eq!(ils.total_value, dec!(370));
        assert_eq!(ils.entry_count, 1);

        let usd = summary
            .totals_by_currency
            .iter()
            .find(|total| total.currency == "USD")
            .unwrap();
        assert_eq!(usd.total_value, dec!(150));
        assert_eq!(usd.entry_count, 2);
    }

    #[test]
    fn test_display_total_divides_by_rate() {
        let mut rates = RateTable::new("USD");
        rates.set_rate("ILS", dec!(3.7));
        let entries = vec![
            entry("a", "USD", dec!(1), dec!(100)),
            entry("b", "ILS", dec!(1), dec!(370)),
        ];

        let summary = summarize(&entries, &rates);
        assert_eq!(summary.display_currency, "USD");
        assert_eq!(summary.total_value, dec!(200));
        assert!(!summary.partial_data);
    }

    #[test]
    fn test_missing_rate_excludes_entry_and_flags_partial() {
        let rates = RateTable::new("USD");
        let entries = vec![
            entry("a", "USD", dec!(1), dec!(100)),
            entry("b", "GBP", dec!(1), dec!(80)),
        ];

        let summary = summarize(&entries, &rates);
        // The GBP entry is only missing from the converted figure.
        assert_eq!(summary.total_value, dec!(100));
        assert!(summary.partial_data);
        assert!(summary
            .totals_by_currency
            .iter()
            .any(|total| total.currency == "GBP" && total.total_value == dec!(80)));
    }

    #[test]
    fn test_empty_entries_summarize_to_zero() {
        let summary = summarize(&[], &RateTable::new("USD"));
        assert_eq!(summary.total_value, Decimal::ZERO);
        assert!(summary.totals_by_currency.is_empty());
        assert!(!summary.partial_data);
    }

    // ==================== Broker Gain/Loss Rollup ====================

    #[test]
    fn test_broker_rollup_sums_gain_loss_over_costed_rows() {
        let views = vec![
            holding_view("AAPL", Some(dec!(1200)), Some(dec!(1000))),
            holding_view("MSFT", Some(dec!(900)), Some(dec!(1000))),
            // Zero cost contributes nothing to either side.
            holding_view("FREE", Some(dec!(500)), Some(Decimal::ZERO)),
            // Missing position value contributes nothing.
            holding_view("WAIT", None, Some(dec!(100))),
        ];

        let rollup = summarize_broker_holdings(&views);
        assert_eq!(rollup.total_gain_loss, dec!(100));
        // 100 gain over 2000 cost.
        assert_eq!(rollup.total_gain_loss_pct, Some(dec!(5)));
    }

    #[test]
    fn test_broker_rollup_zero_denominator_yields_none() {
        let views = vec![
            holding_view("FREE", Some(dec!(500)), Some(Decimal::ZERO)),
            holding_view("WAIT", None, None),
        ];

        let rollup = summarize_broker_holdings(&views);
        assert_eq!(rollup.total_gain_loss, Decimal::ZERO);
        assert_eq!(rollup.total_gain_loss_pct, None);
    }

    #[test]
    fn test_broker_rollup_handles_empty_input() {
        let rollup = summarize_broker_holdings(&[]);
        assert_eq!(rollup.total_gain_loss, Decimal::ZERO);
        assert_eq!(rollup.total_gain_loss_pct, None);
    }
}
