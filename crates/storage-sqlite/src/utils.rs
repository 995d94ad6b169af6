//! Shared helpers for mapping database rows to domain types.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses a decimal column stored as TEXT.
///
/// Values written by this crate are plain decimal strings, but rows edited
/// by hand or produced by older builds may carry scientific notation. A
/// value that parses neither way is logged and treated as zero rather than
/// failing the whole load.
pub(crate) fn parse_decimal_column(value_str: &str, field_name: &str) -> Decimal {
    Decimal::from_str(value_str)
        .or_else(|_| Decimal::from_scientific(value_str))
        .unwrap_or_else(|e| {
            log::error!(
                "Failed to parse {} '{}' as a decimal ({}), falling back to zero",
                field_name,
                value_str,
                e
            );
            Decimal::ZERO
        })
}
