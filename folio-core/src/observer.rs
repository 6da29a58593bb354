//! Instrumentation hooks for the normalization pipeline.
//!
//! The pipeline itself never logs. Callers that want diagnostics pass an observer;
//! every method defaults to doing nothing.

use crate::classify::TableCategory;
use crate::model::NormalizedData;

/// Why a table fragment produced no rows before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoHeaders,
    NoRows,
}

pub trait PipelineObserver {
    /// A page is about to be walked.
    fn page_started(&mut self, _page_index: usize, _table_count: usize) {}

    /// Tokenizing produced an empty table; it is not classified.
    fn table_skipped(&mut self, _page_index: usize, _table_index: usize, _reason: SkipReason) {}

    /// Header classification result, before any fallback.
    fn table_classified(
        &mut self,
        _page_index: usize,
        _table_index: usize,
        _category: TableCategory,
        _row_count: usize,
    ) {
    }

    /// An unknown table was either folded into positions (`kept`) or dropped.
    fn unknown_fallback(&mut self, _page_index: usize, _table_index: usize, _kept: bool) {}

    /// Called once with the final buckets.
    fn finished(&mut self, _data: &NormalizedData) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records events as strings; handy in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingObserver {
    pub events: Vec<String>,
}

impl PipelineObserver for RecordingObserver {
    fn page_started(&mut self, page_index: usize, table_count: usize) {
        self.events.push(format!("page {page_index} tables={table_count}"));
    }

    fn table_skipped(&mut self, page_index: usize, table_index: usize, reason: SkipReason) {
        self.events
            .push(format!("skip {page_index}/{table_index} {reason:?}"));
    }

    fn table_classified(
        &mut self,
        page_index: usize,
        table_index: usize,
        category: TableCategory,
        row_count: usize,
    ) {
        self.events.push(format!(
            "classify {page_index}/{table_index} {} rows={row_count}",
            category.as_str()
        ));
    }

    fn unknown_fallback(&mut self, page_index: usize, table_index: usize, kept: bool) {
        let verdict = if kept { "positions" } else { "discard" };
        self.events
            .push(format!("fallback {page_index}/{table_index} {verdict}"));
    }

    fn finished(&mut self, data: &NormalizedData) {
        self.events.push(format!(
            "done positions={} transactions={} fees={}",
            data.positions.len(),
            data.transactions.len(),
            data.fees.len()
        ));
    }
}
