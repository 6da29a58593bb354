//! CSV rendering of a normalized bucket.
//!
//! Columns: the first row's field names, then page_index, table_index, row_index.
//! Later rows are written against that schema; fields they lack come out empty.

use folio_core::NormalizedRow;

pub const PROVENANCE_COLUMNS: [&str; 3] = ["page_index", "table_index", "row_index"];

/// Quote a value only when it holds a comma, a double quote, or a newline.
pub fn escape_csv_value(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialize a bucket to CSV. Empty bucket gives an empty string; no trailing newline.
pub fn export_to_csv(rows: &[NormalizedRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let schema: Vec<&str> = first.fields.names().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        schema
            .iter()
            .copied()
            .chain(PROVENANCE_COLUMNS)
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        let mut values: Vec<String> = schema
            .iter()
            .map(|name| escape_csv_value(row.fields.get(name).unwrap_or("")))
            .collect();
        values.push(row.provenance.page_index.to_string());
        values.push(row.provenance.table_index.to_string());
        values.push(row.provenance.row_index.to_string());
        lines.push(values.join(","));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Provenance, RowFields};

    fn row(fields: &[(&str, &str)], page: usize, table: usize, idx: usize) -> NormalizedRow {
        NormalizedRow {
            fields: fields.iter().copied().collect::<RowFields>(),
            provenance: Provenance {
                page_index: page,
                table_index: table,
                row_index: idx,
                source_html: String::new(),
            },
        }
    }

    #[test]
    fn test_empty_bucket() {
        assert_eq!(export_to_csv(&[]), "");
    }

    #[test]
    fn test_escape_rules() {
        assert_eq!(escape_csv_value("He said \"hi\", now"), "\"He said \"\"hi\"\", now\"");
        assert_eq!(escape_csv_value("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_value("line1\nline2"), "\"line1\nline2\"");
        assert_eq!(escape_csv_value("$1500.00"), "$1500.00");
        assert_eq!(escape_csv_value(""), "");
        // carriage return alone is not a trigger
        assert_eq!(escape_csv_value("a\rb"), "a\rb");
    }

    #[test]
    fn test_header_and_rows() {
        let rows = vec![
            row(&[("Symbol", "AAPL"), ("Quantity", "100"), ("Price", "$150.00")], 0, 0, 0),
            row(&[("Symbol", "MSFT"), ("Quantity", "5"), ("Price", "$1,000.00")], 1, 3, 2),
        ];

        assert_eq!(
            export_to_csv(&rows),
            "Symbol,Quantity,Price,page_index,table_index,row_index\n\
             AAPL,100,$150.00,0,0,0\n\
             MSFT,5,\"$1,000.00\",1,3,2"
        );
    }

    #[test]
    fn test_schema_comes_from_first_row_only() {
        let rows = vec![
            row(&[("Date", "2024-01-15"), ("Amount", "$1")], 0, 0, 0),
            row(&[("Fee", "Wire"), ("Amount", "$2")], 0, 1, 0),
        ];

        assert_eq!(
            export_to_csv(&rows),
            "Date,Amount,page_index,table_index,row_index\n\
             2024-01-15,$1,0,0,0\n\
             ,$2,0,1,0"
        );
    }
}
