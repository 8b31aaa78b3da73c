//! Error types for page extraction and fetching
//!
//! Extraction errors are hard failures: they abort the current page only.
//! Expected absences (no "full list" link, short rows, annotation cells) are
//! not errors and never show up here.

use crate::record::CellValue;

/// Errors that abort the extraction of a single page
///
/// # Examples
///
/// ```ignore
/// use tfmkt_transfers::{ExtractionError, TableExtractor};
///
/// match TableExtractor::new().extract_all(&page, &parent) {
///     Ok(records) => println!("{} records", records.len()),
///     Err(ExtractionError::ArityMismatch { header, values, url }) => {
///         eprintln!("layout changed at {url}: {header:?} vs {values:?}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// A data row produced a different number of values than the table header
    ///
    /// This signals that a layout assumption no longer holds for the page.
    #[error("Header ({header:?}) - cell element ({values:?}) mismatch at {url}")]
    ArityMismatch {
        header: Vec<String>,
        values: Vec<CellValue>,
        url: String,
    },

    /// A page-level field required to build records was not found
    #[error("Required field '{field}' not found using selector '{selector}' at {url}")]
    MissingField {
        field: String,
        selector: String,
        url: String,
    },

    /// The page URL could not be parsed
    #[error("Invalid page URL '{url}': {error}")]
    InvalidUrl {
        url: String,
        #[source]
        error: url::ParseError,
    },
}

/// Errors that can occur while downloading a page
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// Errors surfaced by the transfers spider
#[derive(Debug, thiserror::Error)]
pub enum SpiderError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The record receiver was dropped before the crawl finished
    #[error("Record sink closed")]
    SinkClosed,
}
