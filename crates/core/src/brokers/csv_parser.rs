//! Brokerage CSV intake.
//!
//! Parses an exported positions file into normalized drafts. The whole file
//! is validated before anything is returned: a missing symbol column, an
//! inconsistent field count, or any unparseable cell rejects the import
//! wholesale with per-row diagnostics, so storage never sees half a file.

use std::str::FromStr;

use csv::ReaderBuilder;
use rust_decimal::Decimal;

use super::broker_errors::{ImportError, RowError};
use super::broker_model::BrokerHoldingDraft;
use crate::Result;

/// Header synonyms, matched case-insensitively after trimming.
const SYMBOL_HEADERS: &[&str] = &["symbol", "ticker", "ticker symbol"];
const NAME_HEADERS: &[&str] = &["name", "description", "display name"];
const QUANTITY_HEADERS: &[&str] = &["quantity", "shares", "units"];
const COST_HEADERS: &[&str] = &[
    "avg cost basis",
    "cost basis",
    "avg cost",
    "average cost",
    "cost",
];
const CURRENCY_HEADERS: &[&str] = &["currency"];

/// Column indices resolved from the header row.
struct ColumnMap {
    symbol: usize,
    name: Option<usize>,
    quantity: Option<usize>,
    cost: Option<usize>,
    currency: Option<usize>,
}

/// Parses a brokerage CSV export into holding drafts.
///
/// Only the symbol column is required. Quantity defaults to zero and cost
/// basis to absent when their columns are missing or their cells empty.
pub fn parse_broker_csv(content: &[u8]) -> Result<Vec<BrokerHoldingDraft>> {
    let text = decode_content(content);
    let delimiter = detect_delimiter(&text);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    let mut row_errors: Vec<RowError> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                let row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
                if row.iter().all(|cell| cell.trim().is_empty()) {
                    continue;
                }
                records.push(row);
            }
            Err(e) => {
                row_errors.push(RowError::new(index, format!("Unreadable row: {}", e)));
            }
        }
    }

    if records.is_empty() {
        if row_errors.is_empty() {
            return Err(ImportError::Empty.into());
        }
        return Err(ImportError::Malformed {
            row_count: 0,
            row_errors,
        }
        .into());
    }

    let headers: Vec<String> = records[0]
        .iter()
        .map(|cell| cell.trim().to_lowercase())
        .collect();
    let columns = resolve_columns(&headers)?;
    let data_rows = &records[1..];

    if data_rows.is_empty() && row_errors.is_empty() {
        return Err(ImportError::Empty.into());
    }

    let mut drafts = Vec::with_capacity(data_rows.len());
    for (index, row) in data_rows.iter().enumerate() {
        if row.len() != headers.len() {
            row_errors.push(RowError::new(
                index,
                format!("Expected {} fields, found {}", headers.len(), row.len()),
            ));
            continue;
        }
        match parse_row(row, &columns) {
            Ok(draft) => drafts.push(draft),
            Err(message) => row_errors.push(RowError::new(index, message)),
        }
    }

    if !row_errors.is_empty() {
        return Err(ImportError::Malformed {
            row_count: data_rows.len(),
            row_errors,
        }
        .into());
    }
    Ok(drafts)
}

/// Builds no-position drafts from a bare ticker list.
pub fn drafts_from_tickers(tickers: Vec<String>) -> Vec<BrokerHoldingDraft> {
    tickers
        .into_iter()
        .map(BrokerHoldingDraft::from_ticker)
        .collect()
}

/// Strips a UTF-8 BOM and decodes, replacing invalid sequences. Corrupted
/// cells fail the row parse rather than the decode.
fn decode_content(content: &[u8]) -> String {
    let without_bom =
        if content.len() >= 3 && content[0] == 0xEF && content[1] == 0xBB && content[2] == 0xBF {
            &content[3..]
        } else {
            content
        };
    String::from_utf8_lossy(without_bom).into_owned()
}

/// Picks the candidate delimiter occurring most often in the header line.
fn detect_delimiter(text: &str) -> u8 {
    let header_line = text.lines().next().unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|&candidate| header_line.bytes().filter(|&b| b == candidate).count())
        .unwrap_or(b',')
}

fn find_column(headers: &[String], synonyms: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| synonyms.contains(&header.as_str()))
}

fn resolve_columns(headers: &[String]) -> Result<ColumnMap> {
    let symbol = match find_column(headers, SYMBOL_HEADERS) {
        Some(index) => index,
        None => {
            return Err(ImportError::MissingSymbolColumn(SYMBOL_HEADERS.join(", ")).into());
        }
    };
    Ok(ColumnMap {
        symbol,
        name: find_column(headers, NAME_HEADERS),
        quantity: find_column(headers, QUANTITY_HEADERS),
        cost: find_column(headers, COST_HEADERS),
        currency: find_column(headers, CURRENCY_HEADERS),
    })
}

fn parse_row(row: &[String], columns: &ColumnMap) -> std::result::Result<BrokerHoldingDraft, String> {
    let symbol = row[columns.symbol].trim();
    if symbol.is_empty() {
        return Err("Missing ticker symbol".to_string());
    }

    let quantity = match optional_cell(row, columns.quantity) {
        Some(cell) => parse_decimal_cell(cell).map_err(|e| format!("Bad quantity: {}", e))?,
        None => Decimal::ZERO,
    };
    let avg_cost_basis = match optional_cell(row, columns.cost) {
        Some(cell) => Some(parse_decimal_cell(cell).map_err(|e| format!("Bad cost basis: {}", e))?),
        None => None,
    };

    Ok(BrokerHoldingDraft {
        ticker_symbol: symbol.to_string(),
        display_name: optional_cell(row, columns.name).map(|cell| cell.to_string()),
        quantity,
        avg_cost_basis,
        currency: optional_cell(row, columns.currency).map(|cell| cell.to_uppercase()),
    })
}

/// A cell from an optional column; empty cells count as absent.
fn optional_cell(row: &[String], column: Option<usize>) -> Option<&str> {
    column
        .map(|index| row[index].trim())
        .filter(|cell| !cell.is_empty())
}

/// Parses a numeric cell: plain decimal, then scientific notation, then a
/// thousands-separated form ("1,234.56").
fn parse_decimal_cell(cell: &str) -> std::result::Result<Decimal, String> {
    if let Ok(value) = Decimal::from_str(cell) {
        return Ok(value);
    }
    if let Ok(value) = Decimal::from_scientific(cell) {
        return Ok(value);
    }
    let cleaned = cell.replace(',', "");
    Decimal::from_str(&cleaned).map_err(|_| format!("'{}' is not a number", cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_export() {
        let content = b"Symbol,Description,Quantity,Avg Cost,Currency\n\
                        AAPL,Apple Inc.,10,150.25,USD\n\
                        shop.to,Shopify,3,95,CAD";

        let drafts = parse_broker_csv(content).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].ticker_symbol, "AAPL");
        assert_eq!(drafts[0].display_name.as_deref(), Some("Apple Inc."));
        assert_eq!(drafts[0].quantity, dec!(10));
        assert_eq!(drafts[0].avg_cost_basis, Some(dec!(150.25)));
        assert_eq!(drafts[0].currency.as_deref(), Some("USD"));
        // Symbol casing is normalized later, at the service level.
        assert_eq!(drafts[1].ticker_symbol, "shop.to");
    }

    #[test]
    fn test_header_synonyms_and_semicolon_delimiter() {
        let content = b"Ticker;Shares;Cost Basis\nMSFT;5;300";

        let drafts = parse_broker_csv(content).unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].ticker_symbol, "MSFT");
        assert_eq!(drafts[0].quantity, dec!(5));
        assert_eq!(drafts[0].avg_cost_basis, Some(dec!(300)));
    }

    #[test]
    fn test_symbol_only_file_defaults_position_fields() {
        let content = b"symbol\nAAPL\nMSFT";

        let drafts = parse_broker_csv(content).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].quantity, Decimal::ZERO);
        assert_eq!(drafts[0].avg_cost_basis, None);
        assert_eq!(drafts[0].currency, None);
    }

    #[test]
    fn test_missing_symbol_column_rejected() {
        let content = b"Name,Quantity\nApple,10";

        let result = parse_broker_csv(content);

        assert!(matches!(
            result,
            Err(Error::Import(ImportError::MissingSymbolColumn(_)))
        ));
    }

    #[test]
    fn test_malformed_rows_reject_the_whole_file() {
        let content = b"Symbol,Quantity\nAAPL,10\nMSFT,not-a-number\nNVDA,5";

        let result = parse_broker_csv(content);

        match result {
            Err(Error::Import(ImportError::Malformed {
                row_count,
                row_errors,
            })) => {
                assert_eq!(row_count, 3);
                assert_eq!(row_errors.len(), 1);
                assert_eq!(row_errors[0].row_index, 1);
            }
            other => panic!("Expected wholesale rejection, got {:?}", other.map(|d| d.len())),
        }
    }

    #[test]
    fn test_inconsistent_field_count_rejects_the_whole_file() {
        let content = b"Symbol,Quantity\nAAPL,10\nMSFT,5,extra";

        let result = parse_broker_csv(content);

        assert!(matches!(
            result,
            Err(Error::Import(ImportError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(
            parse_broker_csv(b""),
            Err(Error::Import(ImportError::Empty))
        ));
        assert!(matches!(
            parse_broker_csv(b"Symbol,Quantity\n"),
            Err(Error::Import(ImportError::Empty))
        ));
    }

    #[test]
    fn test_bom_and_blank_lines_tolerated() {
        let content = b"\xEF\xBB\xBFSymbol,Quantity\n\nAAPL,10\n\n";

        let drafts = parse_broker_csv(content).unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].ticker_symbol, "AAPL");
    }

    #[test]
    fn test_thousands_separator_and_scientific_quantities() {
        let content = b"Symbol;Quantity;Cost\nVT;\"1,250.5\";95.1\nBRK.B;1e2;300";

        let drafts = parse_broker_csv(content).unwrap();

        assert_eq!(drafts[0].quantity, dec!(1250.5));
        assert_eq!(drafts[1].quantity, dec!(100));
    }

    #[test]
    fn test_empty_cells_mean_absent_not_error() {
        let content = b"Symbol,Quantity,Cost,Currency\nAAPL,,,\n";

        let drafts = parse_broker_csv(content).unwrap();

        assert_eq!(drafts[0].quantity, Decimal::ZERO);
        assert_eq!(drafts[0].avg_cost_basis, None);
        assert_eq!(drafts[0].currency, None);
    }
}
