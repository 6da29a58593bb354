//! Walk an extraction response and merge every table into category buckets.

use folio_core::{
    classify_headers, looks_monetary, ExtractionResponse, NoopObserver, NormalizedData,
    PipelineObserver, SkipReason, TableCategory,
};

use crate::normalizer::normalize_table;
use crate::parsers::html_table::parse_html_table;

/// Normalize a response without instrumentation.
pub fn normalize_response(response: &ExtractionResponse) -> NormalizedData {
    normalize_response_with(response, &mut NoopObserver)
}

/// Normalize a response, reporting each decision to `observer`.
///
/// Pages and tables are visited in order, so every bucket ends up sorted by
/// (page, table, row). Page position in `pages` is the provenance page index.
pub fn normalize_response_with(
    response: &ExtractionResponse,
    observer: &mut dyn PipelineObserver,
) -> NormalizedData {
    let mut out = NormalizedData::default();

    for (page_index, page) in response.pages.iter().enumerate() {
        observer.page_started(page_index, page.raw_tables.len());

        for (table_index, html) in page.raw_tables.iter().enumerate() {
            let table = parse_html_table(html);

            if table.headers.is_empty() {
                observer.table_skipped(page_index, table_index, SkipReason::NoHeaders);
                continue;
            }
            if table.rows.is_empty() {
                observer.table_skipped(page_index, table_index, SkipReason::NoRows);
                continue;
            }

            let category = classify_headers(&table.headers);
            observer.table_classified(page_index, table_index, category, table.rows.len());

            let rows = normalize_table(&table.headers, &table.rows, page_index, table_index);

            match category {
                TableCategory::Positions => out.positions.extend(rows),
                TableCategory::Transactions => out.transactions.extend(rows),
                TableCategory::Fees => out.fees.extend(rows),
                TableCategory::Unknown => {
                    let kept = looks_monetary(&table.rows[0]);
                    observer.unknown_fallback(page_index, table_index, kept);
                    if kept {
                        out.positions.extend(rows);
                    }
                }
            }
        }
    }

    observer.finished(&out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ExtractionPage, RecordingObserver};

    fn page(tables: &[&str]) -> ExtractionPage {
        ExtractionPage {
            page_index: 0,
            raw_tables: tables.iter().map(|t| t.to_string()).collect(),
            text: String::new(),
        }
    }

    fn response(pages: Vec<ExtractionPage>) -> ExtractionResponse {
        ExtractionResponse {
            pages,
            status: "success".to_string(),
            message: None,
        }
    }

    const POSITIONS: &str = "<table><tr><th>Symbol</th><th>Quantity</th><th>Price</th></tr>\
                             <tr><td>AAPL</td><td>100</td><td>$150.00</td></tr></table>";
    const TRANSACTIONS: &str = "<table><tr><th>Date</th><th>Description</th><th>Amount</th></tr>\
                                <tr><td>2024-01-15</td><td>Buy AAPL</td><td>$1500.00</td></tr></table>";
    const FEES: &str = "<table><tr><th>Fee Type</th><th>Charged</th></tr>\
                        <tr><td>Wire</td><td>$25.00</td></tr></table>";

    #[test]
    fn test_routes_tables_to_buckets() {
        let resp = response(vec![page(&[POSITIONS, TRANSACTIONS, FEES])]);
        let data = normalize_response(&resp);

        assert_eq!(data.positions.len(), 1);
        assert_eq!(data.transactions.len(), 1);
        assert_eq!(data.fees.len(), 1);
        assert_eq!(data.transactions[0].provenance.table_index, 1);
        assert_eq!(data.fees[0].provenance.table_index, 2);
    }

    #[test]
    fn test_unknown_with_dollar_falls_back_to_positions() {
        let unknown = "<table><tr><th>Holding</th><th>Worth</th></tr>\
                       <tr><td>Bond</td><td>$900</td></tr></table>";
        let resp = response(vec![page(&[unknown])]);

        let mut obs = RecordingObserver::default();
        let data = normalize_response_with(&resp, &mut obs);
        assert_eq!(data.positions.len(), 1);
        assert_eq!(data.positions[0].fields.get("Holding"), Some("Bond"));
        assert!(obs.events.contains(&"fallback 0/0 positions".to_string()));
    }

    #[test]
    fn test_unknown_without_dollar_is_discarded() {
        // "$" only in a later row does not count
        let unknown = "<table><tr><th>Foo</th><th>Bar</th></tr>\
                       <tr><td>x</td><td>y</td></tr>\
                       <tr><td>z</td><td>$1</td></tr></table>";
        let resp = response(vec![page(&[unknown])]);

        let mut obs = RecordingObserver::default();
        let data = normalize_response_with(&resp, &mut obs);
        assert!(data.is_empty());
        assert!(obs.events.contains(&"fallback 0/0 discard".to_string()));
    }

    #[test]
    fn test_empty_tables_are_skipped_not_classified() {
        let no_headers = "<table><tr><td>$1</td></tr></table>";
        let no_rows = "<table><tr><th>Quantity</th><th>Price</th></tr></table>";
        let resp = response(vec![page(&[no_headers, no_rows, "garbage"])]);

        let mut obs = RecordingObserver::default();
        let data = normalize_response_with(&resp, &mut obs);
        assert!(data.is_empty());
        assert_eq!(
            obs.events,
            vec![
                "page 0 tables=3",
                "skip 0/0 NoHeaders",
                "skip 0/1 NoRows",
                "skip 0/2 NoHeaders",
                "done positions=0 transactions=0 fees=0",
            ]
        );
    }

    #[test]
    fn test_page_position_is_provenance_page_index() {
        let mut second = page(&[POSITIONS]);
        second.page_index = 42;
        let resp = response(vec![page(&[]), second]);

        let data = normalize_response(&resp);
        assert_eq!(data.positions[0].provenance.page_index, 1);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let resp = response(vec![page(&[POSITIONS, POSITIONS])]);
        let data = normalize_response(&resp);
        assert_eq!(data.positions.len(), 2);
        assert_eq!(data.positions[0].fields, data.positions[1].fields);
        assert_ne!(data.positions[0].provenance, data.positions[1].provenance);
    }
}
