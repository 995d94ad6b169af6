//! In-memory exchange rate table used when rolling amounts up into the
//! display currency.
//!
//! Rates are expressed as units of the source currency per one unit of the
//! display currency. Converting into the display currency therefore divides
//! by the rate. A missing or non-positive rate means the currency cannot be
//! converted and callers are expected to exclude the amount and flag the
//! result as partial.

use std::collections::HashMap;

use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct RateTable {
    display_currency: String,
    rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn new(display_currency: impl Into<String>) -> Self {
        Self {
            display_currency: display_currency.into().to_uppercase(),
            rates: HashMap::new(),
        }
    }

    pub fn with_rates(
        display_currency: impl Into<String>,
        rates: HashMap<String, Decimal>,
    ) -> Self {
        let mut table = Self::new(display_currency);
        for (currency, rate) in rates {
            table.set_rate(currency, rate);
        }
        table
    }

    pub fn display_currency(&self) -> &str {
        &self.display_currency
    }

    pub fn set_rate(&mut self, currency: impl Into<String>, rate: Decimal) {
        self.rates.insert(currency.into().to_uppercase(), rate);
    }

    /// Looks up the rate for a currency. The display currency always
    /// resolves to one. Missing and non-positive rates resolve to `None`.
    pub fn rate(&self, currency: &str) -> Option<Decimal> {
        let currency = currency.to_uppercase();
        if currency == self.display_currency {
            return Some(Decimal::ONE);
        }
        match self.rates.get(&currency) {
            Some(rate) if *rate > Decimal::ZERO => Some(*rate),
            _ => None,
        }
    }

    /// Converts an amount from the given currency into the display currency.
    /// Returns `None` when no usable rate is available.
    pub fn convert_into_display(&self, amount: Decimal, currency: &str) -> Option<Decimal> {
        self.rate(currency).map(|rate| amount / rate)
    }
}
