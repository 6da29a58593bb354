//! folio-ingest: HTML table tokenizing, row normalization, and bucket aggregation.

pub mod aggregator;
pub mod normalizer;
pub mod parsers;
pub mod trace;

pub use aggregator::{normalize_response, normalize_response_with};
pub use normalizer::{normalize_table, provenance_html};
pub use parsers::parse_html_table;
pub use trace::TracingObserver;
