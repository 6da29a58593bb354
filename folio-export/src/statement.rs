//! Display-oriented statement projection.
//!
//! Best-effort only: this reshapes a raw extraction payload into something a UI can show,
//! using looser heuristics than the normalization pipeline. Nothing downstream should rely
//! on it for correctness.

use folio_core::{ExtractionResponse, Provenance};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// A table as the extraction service may deliver it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTable {
    /// HTML fragment; counted but not scanned here.
    Html(String),
    Structured(StructuredTable),
    /// Anything else (numbers, arrays, null); counted, never scanned.
    Other(serde_json::Value),
}

/// A table delivered as nested rows and cells.
///
/// Every part is lenient: a malformed row or a non-string title only loses
/// that piece, never the whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredTable {
    #[serde(default)]
    pub title: Option<RawText>,
    #[serde(default)]
    pub caption: Option<RawText>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Text(String),
    Other(serde_json::Value),
}

impl RawText {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawText::Text(s) => Some(s),
            RawText::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRow {
    Row(StructuredRow),
    /// Subtotal strings, nulls, rows whose `cells` is not a list.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredRow {
    #[serde(default)]
    pub cells: Vec<RawCell>,
}

/// `rows` that is not a list reads as no rows.
fn lenient_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawRow>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Text(String),
    Object {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        value: Option<serde_json::Value>,
    },
    Other(serde_json::Value),
}

impl RawCell {
    /// Plain text of a cell: the string itself, else `text`, else `value`, else "".
    pub fn text(&self) -> String {
        match self {
            RawCell::Text(s) => s.clone(),
            RawCell::Object { text, value } => match (text.as_deref(), value) {
                (Some(t), _) if !t.is_empty() => t.to_string(),
                (_, Some(serde_json::Value::String(s))) => s.clone(),
                (_, Some(serde_json::Value::Number(n))) => n.to_string(),
                _ => String::new(),
            },
            RawCell::Other(_) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(rename = "pageIndex", default)]
    pub page_index: usize,
    #[serde(default)]
    pub processed_tables: Vec<RawTable>,
    #[serde(default)]
    pub text: String,
}

/// Extraction payload with loosely shaped tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawExtraction {
    #[serde(default)]
    pub pages: Vec<RawPage>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&ExtractionResponse> for RawExtraction {
    fn from(resp: &ExtractionResponse) -> Self {
        Self {
            pages: resp
                .pages
                .iter()
                .map(|p| RawPage {
                    page_index: p.page_index,
                    processed_tables: p.raw_tables.iter().cloned().map(RawTable::Html).collect(),
                    text: p.text.clone(),
                })
                .collect(),
            status: resp.status.clone(),
            message: resp.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementHeader {
    pub account_number: String,
    pub period_start: String,
    pub period_end: String,
    pub ending_value: f64,
    pub total_fees: f64,
}

impl Default for StatementHeader {
    fn default() -> Self {
        Self {
            account_number: UNKNOWN.to_string(),
            period_start: UNKNOWN.to_string(),
            period_end: UNKNOWN.to_string(),
            ending_value: 0.0,
            total_fees: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub symbol: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub value: String,
    pub asset_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub symbol: String,
    pub quantity: String,
    pub price: String,
    pub amount: String,
    pub fee: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeView {
    pub description: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementView {
    pub header: StatementHeader,
    pub positions: Vec<PositionView>,
    pub transactions: Vec<TransactionView>,
    pub fees: Vec<FeeView>,
    pub provenance: Provenance,
}

impl StatementView {
    /// Replace the placeholder header with one extracted separately.
    pub fn with_header(mut self, header: StatementHeader) -> Self {
        self.header = header;
        self
    }
}

const UNKNOWN: &str = "Unknown";
const ZERO_DOLLARS: &str = "$0.00";

fn cell_or(cells: &[String], i: usize, default: &str) -> String {
    cells
        .get(i)
        .filter(|c| !c.is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn scan_rows(table: &StructuredTable, positions: &mut Vec<PositionView>) {
    for row in &table.rows {
        let RawRow::Row(row) = row else {
            continue;
        };
        if row.cells.is_empty() {
            continue;
        }
        let cells: Vec<String> = row.cells.iter().map(RawCell::text).collect();
        let row_text = cells.join(" ").to_lowercase();

        // column header row
        if row_text.contains("symbol") || row_text.contains("ticker") || row_text.contains("security") {
            continue;
        }

        if cells.len() >= 4 && cells.iter().any(|c| c.contains('$')) {
            positions.push(PositionView {
                symbol: cell_or(&cells, 0, UNKNOWN),
                description: cell_or(&cells, 1, "Unknown Security"),
                quantity: cell_or(&cells, 2, "0"),
                price: cell_or(&cells, 3, ZERO_DOLLARS),
                value: cell_or(&cells, 4, ZERO_DOLLARS),
                asset_class: "Equity".to_string(),
            });
        }
    }
}

/// Masked account number from a table title such as "Account: 123456789".
fn sniff_account(table: &StructuredTable, account_re: &Regex) -> Option<String> {
    let title = table
        .title
        .as_ref()
        .and_then(RawText::as_text)
        .filter(|t| !t.is_empty())
        .or(table.caption.as_ref().and_then(RawText::as_text))?
        .to_lowercase();

    if !title.contains("account") {
        return None;
    }
    let digits = account_re.captures(&title)?.get(1)?.as_str();
    let tail = &digits[digits.len().saturating_sub(4)..];
    Some(format!("****{tail}"))
}

/// Project a raw extraction payload into a display statement.
pub fn project_statement(raw: &RawExtraction) -> StatementView {
    let account_re = Regex::new(r"(?i)account[:\s]*([0-9]+)").ok();

    let tables: Vec<(usize, usize, &RawTable)> = raw
        .pages
        .iter()
        .enumerate()
        .flat_map(|(page_index, page)| {
            page.processed_tables
                .iter()
                .enumerate()
                .map(move |(table_index, table)| (page_index, table_index, table))
        })
        .collect();

    let mut header = StatementHeader::default();
    let mut positions = Vec::new();
    let mut transactions = Vec::new();

    for (_, _, table) in &tables {
        let RawTable::Structured(table) = table else {
            continue;
        };
        scan_rows(table, &mut positions);
        if let Some(account) = account_re.as_ref().and_then(|re| sniff_account(table, re)) {
            header.account_number = account;
        }
    }

    let table_count = tables.len();

    if positions.is_empty() {
        positions.push(PositionView {
            symbol: "PARSED_DATA".to_string(),
            description: format!("Found {table_count} tables in PDF"),
            quantity: raw.pages.len().to_string(),
            price: ZERO_DOLLARS.to_string(),
            value: ZERO_DOLLARS.to_string(),
            asset_class: "Data".to_string(),
        });
    }

    if table_count > 0 {
        transactions.push(TransactionView {
            date: "2024-03-31".to_string(),
            kind: "Data Extract".to_string(),
            symbol: "CARDINAL".to_string(),
            quantity: table_count.to_string(),
            price: ZERO_DOLLARS.to_string(),
            amount: ZERO_DOLLARS.to_string(),
            fee: ZERO_DOLLARS.to_string(),
        });
    }

    let (page_index, table_index) = tables.first().map(|(p, t, _)| (*p, *t)).unwrap_or((0, 0));

    StatementView {
        header,
        positions,
        transactions,
        fees: Vec::new(),
        provenance: Provenance {
            page_index,
            table_index,
            row_index: 0,
            source_html: format!("Processed {table_count} tables from Cardinal API"),
        },
    }
}
