//! HTML table fragment tokenizer.
//!
//! Expected fragment shape from the extraction service:
//!   <table><tr><th>Symbol</th><th>Quantity</th></tr>
//!          <tr><td>AAPL</td><td>100</td></tr></table>
//!
//! Headers are every `th` in document order. Rows are every `tr` in document
//! order, minus the leading header rows: the `tr`s before the first one holding
//! a non-empty `td`. A blank corner `<td></td>` does not end the header block,
//! and a `th`-only totals row after the data is still a row.

use folio_core::ParsedTable;
use scraper::{ElementRef, Html, Selector};

fn is_cell(el: &ElementRef) -> bool {
    matches!(el.value().name(), "th" | "td")
}

fn cell_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn is_data_cell(el: &ElementRef) -> bool {
    el.value().name() == "td" && !cell_text(*el).is_empty()
}

/// Bare `<tr>`/`<td>` markup is dropped by the HTML tree builder unless it sits
/// inside a table, so wrap fragments that lack one.
fn wrap_fragment(html: &str) -> String {
    if html.to_ascii_lowercase().contains("<table") {
        html.to_string()
    } else {
        format!("<table>{html}</table>")
    }
}

/// Tokenize one HTML table fragment into header and row cells.
///
/// Never fails: markup with no table structure yields an empty `ParsedTable`.
pub fn parse_html_table(html: &str) -> ParsedTable {
    let (Ok(th), Ok(tr)) = (Selector::parse("th"), Selector::parse("tr")) else {
        return ParsedTable::default();
    };

    let document = Html::parse_fragment(&wrap_fragment(html));

    let headers = document.select(&th).map(cell_text).collect();

    let mut rows = Vec::new();
    let mut in_header = true;
    for row in document.select(&tr) {
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(is_cell)
            .collect();

        if cells.is_empty() {
            continue;
        }
        if in_header {
            if !cells.iter().any(is_data_cell) {
                continue;
            }
            in_header = false;
        }

        rows.push(cells.into_iter().map(cell_text).collect());
    }

    ParsedTable { headers, rows }
}
