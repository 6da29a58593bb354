//! Header-vocabulary table classification.
//!
//! Deterministic keyword rules over the lower-cased header text. First match wins:
//! positions, then transactions, then fees.

use serde::{Deserialize, Serialize};

/// Semantic category of a statement table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TableCategory {
    #[serde(rename = "positions")]
    Positions,
    #[serde(rename = "transactions")]
    Transactions,
    #[serde(rename = "fees")]
    Fees,
    #[serde(rename = "unknown")]
    Unknown,
}

impl TableCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableCategory::Positions => "positions",
            TableCategory::Transactions => "transactions",
            TableCategory::Fees => "fees",
            TableCategory::Unknown => "unknown",
        }
    }
}

/// Classify a table by its header cells.
pub fn classify_headers<S: AsRef<str>>(headers: &[S]) -> TableCategory {
    let text = headers
        .iter()
        .map(|h| h.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if text.contains("quantity") && (text.contains("price") || text.contains("market value")) {
        return TableCategory::Positions;
    }

    if text.contains("date") && (text.contains("description") || text.contains("amount")) {
        return TableCategory::Transactions;
    }

    if text.contains("fee") || text.contains("commission") || text.contains("expense ratio") {
        return TableCategory::Fees;
    }

    TableCategory::Unknown
}

/// Fallback for unknown tables: a "$" anywhere in the first row marks it as positions.
pub fn looks_monetary<S: AsRef<str>>(first_row: &[S]) -> bool {
    first_row.iter().any(|cell| cell.as_ref().contains('$'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_transactions() {
        assert_eq!(
            classify_headers(&["Date", "Description", "Amount"]),
            TableCategory::Transactions
        );
    }

    #[test]
    fn test_classify_positions() {
        assert_eq!(
            classify_headers(&["Symbol", "Quantity", "Price", "Market Value"]),
            TableCategory::Positions
        );
        assert_eq!(
            classify_headers(&["QUANTITY", "Market Value"]),
            TableCategory::Positions
        );
    }

    #[test]
    fn test_classify_fees() {
        assert_eq!(classify_headers(&["Commission"]), TableCategory::Fees);
        assert_eq!(classify_headers(&["Fund", "Expense Ratio"]), TableCategory::Fees);
        assert_eq!(classify_headers(&["Advisory Fees"]), TableCategory::Fees);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify_headers(&["Foo", "Bar"]), TableCategory::Unknown);
        assert_eq!(classify_headers::<&str>(&[]), TableCategory::Unknown);
        // quantity alone is not enough
        assert_eq!(classify_headers(&["Symbol", "Quantity"]), TableCategory::Unknown);
    }

    #[test]
    fn test_priority_positions_over_transactions_and_fees() {
        let headers = ["Trade Date", "Quantity", "Price", "Amount", "Commission"];
        assert_eq!(classify_headers(&headers), TableCategory::Positions);

        let headers = ["Date", "Amount", "Fee"];
        assert_eq!(classify_headers(&headers), TableCategory::Transactions);
    }

    #[test]
    fn test_matches_across_header_boundaries() {
        // Joined with a space, so "Market" + "Value" in separate cells still matches.
        assert_eq!(
            classify_headers(&["Quantity", "Market", "Value"]),
            TableCategory::Positions
        );
    }

    #[test]
    fn test_looks_monetary() {
        assert!(looks_monetary(&["AAPL", "$10.00"]));
        assert!(!looks_monetary(&["AAPL", "10.00"]));
        assert!(!looks_monetary::<&str>(&[]));
    }
}
