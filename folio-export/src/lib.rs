//! folio-export: CSV export of normalized buckets and the display statement projection

pub mod csv_export;
pub mod header;
pub mod statement;

pub use csv_export::{escape_csv_value, export_to_csv, PROVENANCE_COLUMNS};
pub use header::decode_header_extract;
pub use statement::{
    project_statement, FeeView, PositionView, RawCell, RawExtraction, RawPage, RawRow, RawTable,
    RawText, StatementHeader, StatementView, StructuredRow, StructuredTable, TransactionView,
};
