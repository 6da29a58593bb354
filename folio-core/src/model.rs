//! Extraction payload and normalized record types.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One page as returned by the document-extraction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPage {
    #[serde(rename = "pageIndex", default)]
    pub page_index: usize,
    /// HTML table fragments, in page order.
    #[serde(rename = "processed_tables", default)]
    pub raw_tables: Vec<String>,
    #[serde(default)]
    pub text: String,
}

/// Full extraction payload; the only input to the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub pages: Vec<ExtractionPage>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Header and row cells scraped from one HTML table fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// A table with no headers or no rows carries nothing to normalize.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }
}

/// Where a normalized row came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(rename = "pageIndex")]
    pub page_index: usize,
    #[serde(rename = "tableIndex")]
    pub table_index: usize,
    #[serde(rename = "rowIndex")]
    pub row_index: usize,
    /// Minimal `<table>` holding the header row and this data row.
    #[serde(rename = "html")]
    pub source_html: String,
}

/// Header name to cell value, kept in the order names were first inserted.
///
/// Inserting an existing name overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    entries: Vec<(String, String)>,
}

impl RowFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = RowFields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl Serialize for RowFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RowFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = RowFields;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of header names to cell strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RowFields, A::Error> {
                let mut fields = RowFields::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    fields.insert(k, v);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// One table row mapped onto its header names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    #[serde(rename = "data")]
    pub fields: RowFields,
    pub provenance: Provenance,
}

/// Normalized rows grouped by table category, each in (page, table, row) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedData {
    pub positions: Vec<NormalizedRow>,
    pub transactions: Vec<NormalizedRow>,
    pub fees: Vec<NormalizedRow>,
}

impl NormalizedData {
    pub fn total_rows(&self) -> usize {
        self.positions.len() + self.transactions.len() + self.fees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_rows() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_fields_keep_first_position_last_value() {
        let mut fields = RowFields::new();
        fields.insert("Symbol", "AAPL");
        fields.insert("Price", "$1.00");
        fields.insert("Symbol", "MSFT");

        let names: Vec<_> = fields.names().collect();
        assert_eq!(names, vec!["Symbol", "Price"]);
        assert_eq!(fields.get("Symbol"), Some("MSFT"));
        assert_eq!(fields.get("Missing"), None);
    }

    #[test]
    fn test_row_fields_serialize_in_insertion_order() {
        let fields: RowFields = [("Zeta", "1"), ("Alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alpha":"2"}"#);

        let back: RowFields = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn test_response_uses_extraction_wire_names() {
        let json = r#"{
            "pages": [{"pageIndex": 3, "processed_tables": ["<table></table>"], "text": "hi"}],
            "status": "ok"
        }"#;
        let resp: ExtractionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.pages[0].page_index, 3);
        assert_eq!(resp.pages[0].raw_tables.len(), 1);
        assert_eq!(resp.message, None);
    }

    #[test]
    fn test_parsed_table_empty_when_either_side_missing() {
        let headers_only = ParsedTable { headers: vec!["A".into()], rows: vec![] };
        let rows_only = ParsedTable { headers: vec![], rows: vec![vec!["1".into()]] };
        assert!(headers_only.is_empty());
        assert!(rows_only.is_empty());
    }
}
