//! Transfer records from competition statistics pages
//!
//! [`Navigator`] finds the full transfer table linked from a competition page,
//! [`TableExtractor`] turns that table into flat [`Record`]s, and
//! [`TransfersSpider`] wires both into the [`Crawler`].

// Core modules
mod backend;
pub mod classify;
pub mod crawler;
mod error;
mod fetch;
mod navigator;
pub mod normalize;
mod observer;
mod page;
mod record;
pub mod selectors;
mod spider;
mod table;

// Public exports
pub use backend::ElementRef;
pub use crawler::{
    Callback, ConfigError, CrawlError, CrawlStats, Crawler, CrawlerBuilder, DelayLimiter,
    RateLimiter, Request, Spider, StatsTracker, TokenBucketLimiter, UrlNormalizer,
};
pub use error::{ExtractionError, FetchError, SpiderError};
pub use fetch::{DEFAULT_USER_AGENT, Fetcher, HttpFetcher};
pub use navigator::{Navigator, locate_detail_url};
pub use observer::{ExtractObserver, NoopObserver, ObserverRegistry, SkipReason, TracingObserver};
pub use page::Page;
pub use record::{CellValue, RECORD_TYPE, Record, Reference};
pub use spider::{DEFAULT_BASE_URL, TransfersSpider, TransfersSpiderBuilder};
pub use table::{Records, TableExtractor, body_rows, derive_header};
