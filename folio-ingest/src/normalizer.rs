//! Map table rows onto header names and attach provenance.

use folio_core::{NormalizedRow, Provenance, RowFields};

/// Rebuild a one-row table snippet for provenance.
///
/// Always `<table><tr><th>..</th>..</tr><tr><td>..</td>..</tr></table>`; text is inserted
/// verbatim so the output is a pure function of the inputs.
pub fn provenance_html<S: AsRef<str>, T: AsRef<str>>(headers: &[S], row: &[T]) -> String {
    let mut html = String::from("<table><tr>");
    for h in headers {
        html.push_str("<th>");
        html.push_str(h.as_ref());
        html.push_str("</th>");
    }
    html.push_str("</tr><tr>");
    for cell in row {
        html.push_str("<td>");
        html.push_str(cell.as_ref());
        html.push_str("</td>");
    }
    html.push_str("</tr></table>");
    html
}

/// Normalize every row of one table, in row order.
///
/// The k-th header takes the k-th cell; missing cells become "" and extra cells are dropped.
pub fn normalize_table(
    headers: &[String],
    rows: &[Vec<String>],
    page_index: usize,
    table_index: usize,
) -> Vec<NormalizedRow> {
    rows.iter()
        .enumerate()
        .map(|(row_index, row)| {
            let fields: RowFields = headers
                .iter()
                .enumerate()
                .map(|(k, header)| (header.as_str(), row.get(k).map(String::as_str).unwrap_or("")))
                .collect();

            NormalizedRow {
                fields,
                provenance: Provenance {
                    page_index,
                    table_index,
                    row_index,
                    source_html: provenance_html(headers, row),
                },
            }
        })
        .collect()
}
