//! Observer hooks for extraction decisions
//!
//! The navigator and the table extractor never log on their own. Every
//! decision worth tracing is reported to an [`ExtractObserver`] handed to them
//! at construction time; the default is [`NoopObserver`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tfmkt_transfers::{ExtractObserver, TableExtractor};
//!
//! struct CountingObserver(std::sync::atomic::AtomicUsize);
//!
//! impl ExtractObserver for CountingObserver {
//!     fn on_table_parsed(&self, _competition: &str, records: usize) {
//!         self.0.fetch_add(records, std::sync::atomic::Ordering::Relaxed);
//!     }
//! }
//!
//! let extractor = TableExtractor::with_observer(Arc::new(CountingObserver(Default::default())));
//! ```

use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::record::CellValue;

/// Why a body row produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The row had too few `td` descendants to be a data row
    TooFewCells { cells: usize },
    /// Every cell of the row was classified as contributing nothing
    NoValues,
}

/// Receiver for extraction events
///
/// All methods default to doing nothing, so implementors only override what
/// they need.
pub trait ExtractObserver: Send + Sync {
    /// Called once per classified cell or sub-cell
    ///
    /// `value` is `None` when the matching rule drops the cell.
    fn on_cell_classified(&self, _column: usize, _rule: &'static str, _value: Option<&CellValue>) {}

    /// Called when a body row is skipped without producing a record
    fn on_row_skipped(&self, _row: usize, _reason: SkipReason) {}

    /// Called after all rows of a table have been turned into records
    fn on_table_parsed(&self, _competition: &str, _records: usize) {}

    /// Called when a listing page has no link to the full table
    fn on_detail_link_missing(&self, _url: &str) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExtractObserver for NoopObserver {}

/// Observer that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExtractObserver for TracingObserver {
    fn on_cell_classified(&self, column: usize, rule: &'static str, value: Option<&CellValue>) {
        trace!(column, rule, ?value, "classified cell");
    }

    fn on_row_skipped(&self, row: usize, reason: SkipReason) {
        debug!(row, ?reason, "skipped row");
    }

    fn on_table_parsed(&self, competition: &str, records: usize) {
        info!(competition, records, "parsed transfer table");
    }

    fn on_detail_link_missing(&self, url: &str) {
        debug!(url, "no complete list link on listing page");
    }
}

/// Fans events out to several observers
#[derive(Default, Clone)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn ExtractObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer to receive extraction events
    pub fn register(&mut self, observer: Arc<dyn ExtractObserver>) {
        self.observers.push(observer);
    }
}

impl ExtractObserver for ObserverRegistry {
    fn on_cell_classified(&self, column: usize, rule: &'static str, value: Option<&CellValue>) {
        for observer in &self.observers {
            observer.on_cell_classified(column, rule, value);
        }
    }

    fn on_row_skipped(&self, row: usize, reason: SkipReason) {
        for observer in &self.observers {
            observer.on_row_skipped(row, reason);
        }
    }

    fn on_table_parsed(&self, competition: &str, records: usize) {
        for observer in &self.observers {
            observer.on_table_parsed(competition, records);
        }
    }

    fn on_detail_link_missing(&self, url: &str) {
        for observer in &self.observers {
            observer.on_detail_link_missing(url);
        }
    }
}
