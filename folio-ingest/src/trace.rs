//! Pipeline observer that forwards events to `tracing`.

use folio_core::{NormalizedData, PipelineObserver, SkipReason, TableCategory};
use tracing::{debug, info};

/// Emits one `tracing` event per pipeline decision, tagged with a source label
/// (usually the input file name).
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    source: String,
}

impl TracingObserver {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }
}

impl PipelineObserver for TracingObserver {
    fn page_started(&mut self, page_index: usize, table_count: usize) {
        debug!(source = %self.source, page = page_index, tables = table_count, "page");
    }

    fn table_skipped(&mut self, page_index: usize, table_index: usize, reason: SkipReason) {
        debug!(
            source = %self.source,
            page = page_index,
            table = table_index,
            ?reason,
            "table skipped"
        );
    }

    fn table_classified(
        &mut self,
        page_index: usize,
        table_index: usize,
        category: TableCategory,
        row_count: usize,
    ) {
        debug!(
            source = %self.source,
            page = page_index,
            table = table_index,
            category = category.as_str(),
            rows = row_count,
            "table classified"
        );
    }

    fn unknown_fallback(&mut self, page_index: usize, table_index: usize, kept: bool) {
        if kept {
            info!(
                source = %self.source,
                page = page_index,
                table = table_index,
                "unknown table has currency values, treating as positions"
            );
        } else {
            debug!(
                source = %self.source,
                page = page_index,
                table = table_index,
                "unknown table discarded"
            );
        }
    }

    fn finished(&mut self, data: &NormalizedData) {
        info!(
            source = %self.source,
            positions = data.positions.len(),
            transactions = data.transactions.len(),
            fees = data.fees.len(),
            "normalized"
        );
    }
}
