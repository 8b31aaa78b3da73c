//! Transfer table extraction
//!
//! A detail page holds one or more `.items` tables. Each table yields at most
//! [`ROWS_PER_TABLE`] records: the header row gives the column identifiers,
//! the leading body rows give the values.
//!
//! # Example
//!
//! ```ignore
//! use tfmkt_transfers::{Page, TableExtractor};
//!
//! let page = Page::parse("https://www.transfermarkt.co.uk/x/transfers/wettbewerb/GB1/plus/1", &html)?;
//! for record in TableExtractor::new().extract(&page, &serde_json::json!({"code": "GB1"})) {
//!     let record = record?;
//!     println!("{}", serde_json::to_string(&record)?);
//! }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::backend::ElementRef;
use crate::classify::classify_cell;
use crate::error::ExtractionError;
use crate::normalize::{decode_value, header_key};
use crate::observer::{ExtractObserver, NoopObserver, SkipReason};
use crate::page::Page;
use crate::record::{CellValue, Record};
use crate::selectors::{
    ANCHOR, COMPETITION_NAME, DATA_CELL, HEADER_CELL, MAX_SKIPPED_ROW_CELLS, POSITION_COLUMN, ROW,
    ROWS_PER_TABLE, TRANSFER_TABLE,
};

/// Turns detail pages into transfer records
///
/// Stateless between pages: extracting the same page twice yields the same
/// records.
#[derive(Clone)]
pub struct TableExtractor {
    observer: Arc<dyn ExtractObserver>,
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor {
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoopObserver))
    }

    pub fn with_observer(observer: Arc<dyn ExtractObserver>) -> Self {
        Self { observer }
    }

    /// Lazily extract every record of the page
    ///
    /// Tables are parsed one at a time as the iterator advances. The first
    /// error ends the sequence; records of rows before it are still yielded.
    pub fn extract<'p>(&'p self, page: &'p Page, parent: &Value) -> Records<'p> {
        let root = page.root();
        let competition = root
            .select_one(COMPETITION_NAME)
            .and_then(|heading| heading.first_text())
            .map(|name| decode_value(&name));

        Records {
            extractor: self,
            page,
            parent: parent.clone(),
            competition,
            tables: root.select_all(TRANSFER_TABLE).into_iter(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Extract every record of the page, failing on the first error
    pub fn extract_all(&self, page: &Page, parent: &Value) -> Result<Vec<Record>, ExtractionError> {
        self.extract(page, parent).collect()
    }

    /// Values produced by one body row, in column order
    fn row_values<E: ElementRef>(&self, row: &E) -> Vec<CellValue> {
        let mut values = Vec::new();
        let cells = row
            .child_elements()
            .into_iter()
            .filter(|cell| cell.tag_name() == DATA_CELL);

        for (column, cell) in cells.enumerate() {
            for outcome in classify_cell(cell, column) {
                self.observer
                    .on_cell_classified(column, outcome.rule, outcome.value.as_ref());
                values.extend(outcome.value);
            }
        }
        values
    }
}

/// Column identifiers of a table, with `position` inserted at index 1
pub fn derive_header<E: ElementRef>(table: &E) -> Vec<String> {
    let mut header: Vec<String> = table
        .select_all(HEADER_CELL)
        .iter()
        .map(|th| {
            let label = th
                .select_all(ANCHOR)
                .iter()
                .find_map(ElementRef::first_descendant_text)
                .or_else(|| th.first_descendant_text())
                .unwrap_or_default();
            header_key(&label)
        })
        .collect();

    let index = header.len().min(1);
    header.insert(index, POSITION_COLUMN.to_string());
    header
}

/// Leading data rows of a table
///
/// Rows are the direct `tr` children of the table and of its `tbody` and
/// `tfoot` sections. Rows without any `td` child are header rows.
pub fn body_rows<E: ElementRef>(table: &E) -> Vec<E> {
    table
        .child_elements()
        .into_iter()
        .flat_map(|child| {
            if child.tag_name() == ROW {
                vec![child]
            } else if matches!(child.tag_name(), "tbody" | "tfoot") {
                child.child_elements()
            } else {
                Vec::new()
            }
        })
        .filter(|row| row.tag_name() == ROW)
        .filter(|row| row.child_elements().iter().any(|cell| cell.tag_name() == DATA_CELL))
        .take(ROWS_PER_TABLE)
        .collect()
}

/// Lazy sequence of records from one page
pub struct Records<'p> {
    extractor: &'p TableExtractor,
    page: &'p Page,
    parent: Value,
    competition: Option<String>,
    tables: std::vec::IntoIter<scraper::ElementRef<'p>>,
    pending: VecDeque<Result<Record, ExtractionError>>,
    finished: bool,
}

impl Records<'_> {
    fn load_table<E: ElementRef>(&mut self, table: &E) {
        let Some(competition) = self.competition.clone() else {
            self.pending.push_back(Err(ExtractionError::MissingField {
                field: "competition_code".to_string(),
                selector: COMPETITION_NAME.to_string(),
                url: self.page.url().to_string(),
            }));
            return;
        };

        let header = derive_header(table);
        let observer = &self.extractor.observer;
        let mut emitted = 0;

        for (index, row) in body_rows(table).iter().enumerate() {
            let cells = row.select_all(DATA_CELL).len();
            if cells <= MAX_SKIPPED_ROW_CELLS {
                observer.on_row_skipped(index, SkipReason::TooFewCells { cells });
                continue;
            }

            let values = self.extractor.row_values(row);
            if values.is_empty() {
                observer.on_row_skipped(index, SkipReason::NoValues);
                continue;
            }

            if values.len() != header.len() {
                self.pending.push_back(Err(ExtractionError::ArityMismatch {
                    header,
                    values,
                    url: self.page.url().to_string(),
                }));
                return;
            }

            let fields: IndexMap<String, CellValue> =
                header.iter().cloned().zip(values).collect();
            self.pending.push_back(Ok(Record::new(
                self.page.path(),
                self.parent.clone(),
                competition.clone(),
                fields,
            )));
            emitted += 1;
        }

        observer.on_table_parsed(&competition, emitted);
    }
}

impl Iterator for Records<'_> {
    type Item = Result<Record, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                if item.is_err() {
                    self.finished = true;
                    self.pending.clear();
                }
                return Some(item);
            }
            if self.finished {
                return None;
            }

            let table = self.tables.next()?;
            self.load_table(&table);
        }
    }
}
