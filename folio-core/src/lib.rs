//! folio-core: extraction payload types, normalized records, and table classification

pub mod classify;
pub mod model;
pub mod observer;

pub use classify::{classify_headers, looks_monetary, TableCategory};
pub use model::{
    ExtractionPage, ExtractionResponse, NormalizedData, NormalizedRow, ParsedTable, Provenance,
    RowFields,
};
pub use observer::{NoopObserver, PipelineObserver, RecordingObserver, SkipReason};
