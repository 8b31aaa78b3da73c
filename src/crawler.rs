//! Crawl driver for transfer spiders
//!
//! This module runs a [`Spider`] to completion:
//! - **Concurrent fetching**: pages of one crawl depth are fetched in parallel
//! - **Rate limiting**: token bucket or fixed delay between requests
//! - **Request deduplication**: by normalized URL, across the whole crawl
//! - **Graceful cancellation**: no new requests once cancelled, in-flight ones finish
//!
//! Parsing is synchronous and happens right after each fetch, so parsed
//! documents never live across an await point.
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//! use tfmkt_transfers::{Crawler, TransfersSpider};
//!
//! let spider = TransfersSpider::builder()
//!     .parents(vec![serde_json::json!({"href": "/premier-league/startseite/wettbewerb/GB1"})])
//!     .build()?;
//!
//! let crawler = Crawler::builder()
//!     .crawling_concurrency(4)
//!     .rate_limit(2.0)
//!     .build()?;
//!
//! let stats = crawler.crawl(Arc::new(spider)).await;
//! println!("Visited {} pages", stats.pages_visited);
//! ```

use std::{
    collections::HashSet,
    fmt::Display,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use futures_util::{StreamExt, stream};
use serde_json::Value;
use tokio::{
    sync::Mutex,
    time::{self, sleep},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::FetchError;
use crate::fetch::{Fetcher, HttpFetcher};

/// Which parse step a fetched page goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    /// Competition page linking to the full transfer table
    Listing,
    /// Full transfer table
    Detail,
}

/// A page to fetch, with the context its records will carry
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: Url,
    pub callback: Callback,
    /// Opaque caller context, passed through unchanged
    pub parent: Value,
}

impl Request {
    pub fn listing(url: Url, parent: Value) -> Self {
        Self {
            url,
            callback: Callback::Listing,
            parent,
        }
    }

    pub fn detail(url: Url, parent: Value) -> Self {
        Self {
            url,
            callback: Callback::Detail,
            parent,
        }
    }
}

/// Errors that can occur during crawler configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Crawling concurrency must be greater than 0
    #[error("Crawling concurrency must be greater than 0, got {0}")]
    InvalidCrawlingConcurrency(usize),

    /// Processing concurrency must be greater than 0
    #[error("Processing concurrency must be greater than 0, got {0}")]
    InvalidProcessingConcurrency(usize),

    /// Requests per second must be a positive, finite number
    #[error("Rate limit must be a positive number of requests per second, got {0}")]
    InvalidRateLimit(f64),

    #[error("Invalid base URL '{url}': {error}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        error: url::ParseError,
    },

    #[error("Failed to build HTTP fetcher: {0}")]
    Fetcher(#[from] FetchError),
}

/// Error that occurred while visiting a page, with context
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed for {url}: {error}")]
pub struct CrawlError {
    /// The URL being processed when the error occurred
    pub url: String,
    /// The operation that failed
    pub operation: &'static str,
    /// The error message
    pub error: String,
}

impl CrawlError {
    pub fn new(url: &Url, operation: &'static str, error: impl Display) -> Self {
        Self {
            url: url.to_string(),
            operation,
            error: error.to_string(),
        }
    }
}

/// Trait for implementing spiders
///
/// A spider names its start requests, turns each fetched page into items and
/// follow-up requests, and decides what to do with every item.
///
/// # Example
///
/// ```ignore
/// struct TitleSpider;
///
/// #[async_trait::async_trait]
/// impl Spider for TitleSpider {
///     type Item = String;
///     type Error = String;
///
///     fn start_requests(&self) -> Vec<Request> {
///         vec![Request::listing(Url::parse("https://example.com").unwrap(), Value::Null)]
///     }
///
///     fn parse(&self, _request: &Request, body: &str) -> Result<(Vec<String>, Vec<Request>), String> {
///         Ok((vec![body.len().to_string()], vec![]))
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Spider: Send + Sync {
    /// The type of items extracted from pages
    type Item: Send + 'static;
    /// The error type for spider operations
    type Error: Display + Send + 'static;

    /// Requests to crawl first
    fn start_requests(&self) -> Vec<Request>;

    /// Parse a fetched page into items and follow-up requests
    fn parse(
        &self,
        request: &Request,
        body: &str,
    ) -> Result<(Vec<Self::Item>, Vec<Request>), Self::Error>;

    /// Process an extracted item
    ///
    /// Default implementation drops the item.
    async fn process(&self, _item: Self::Item) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Trait for implementing rate limiting strategies
#[async_trait::async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until a request is allowed under the rate limit
    async fn acquire(&self);
}

struct Bucket {
    tokens: f64,
    last_refill: time::Instant,
}

/// Token bucket rate limiter
///
/// Bursts up to one second of requests, and never less than one request.
pub struct TokenBucketLimiter {
    bucket: Mutex<Bucket>,
    capacity: f64,
    refill_rate: f64,
}

impl TokenBucketLimiter {
    pub fn new(requests_per_second: f64) -> Self {
        let capacity = requests_per_second.max(1.0);
        Self {
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: time::Instant::now(),
            }),
            capacity,
            refill_rate: requests_per_second,
        }
    }
}

#[async_trait::async_trait]
impl RateLimiter for TokenBucketLimiter {
    async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = time::Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.capacity);
                bucket.last_refill = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64(((1.0 - bucket.tokens) / self.refill_rate).max(0.001))
            };

            sleep(wait).await;
        }
    }
}

/// Fixed delay before every request
pub struct DelayLimiter {
    delay: Duration,
}

impl DelayLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl RateLimiter for DelayLimiter {
    async fn acquire(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

/// Configuration for rate limiting strategy
#[derive(Debug, Clone, PartialEq)]
pub enum RateLimiterConfig {
    Delay(Duration),
    TokenBucket { requests_per_second: f64 },
    None,
}

impl RateLimiterConfig {
    fn build(&self) -> Arc<dyn RateLimiter> {
        match self {
            Self::Delay(delay) => Arc::new(DelayLimiter::new(*delay)),
            Self::TokenBucket {
                requests_per_second,
            } => Arc::new(TokenBucketLimiter::new(*requests_per_second)),
            Self::None => Arc::new(DelayLimiter::new(Duration::ZERO)),
        }
    }
}

/// Validated configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub(crate) crawling_concurrency: usize,
    pub(crate) processing_concurrency: usize,
    pub(crate) rate_limiter: RateLimiterConfig,
}

impl CrawlerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawling_concurrency == 0 {
            return Err(ConfigError::InvalidCrawlingConcurrency(0));
        }
        if self.processing_concurrency == 0 {
            return Err(ConfigError::InvalidProcessingConcurrency(0));
        }
        if let RateLimiterConfig::TokenBucket {
            requests_per_second,
        } = self.rate_limiter
            && !(requests_per_second.is_finite() && requests_per_second > 0.0)
        {
            return Err(ConfigError::InvalidRateLimit(requests_per_second));
        }
        Ok(())
    }
}

/// Utility for normalizing URLs for deduplication
pub struct UrlNormalizer;

impl UrlNormalizer {
    /// Drop the fragment and any trailing slash of a non-root path
    pub fn normalize(url: &Url) -> String {
        let mut normalized = url.clone();
        normalized.set_fragment(None);

        let path = normalized.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/').to_string();
            normalized.set_path(&trimmed);
        }
        normalized.into()
    }
}

const DEFAULT_DELAY_MS: u64 = 200;
const DEFAULT_CRAWLING_CONCURRENCY: usize = 2;
const DEFAULT_PROCESSING_CONCURRENCY: usize = 2;

/// Statistics collected during one crawl
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Number of requests that were fetched, successfully or not
    pub pages_visited: usize,
    /// Number of items processed without error
    pub items_extracted: usize,
    /// Fetch, parse and processing failures
    pub errors_encountered: usize,
    pub start_time: Instant,
    pub last_update: Instant,
}

impl CrawlStats {
    pub fn elapsed(&self) -> Duration {
        self.last_update.duration_since(self.start_time)
    }

    pub fn pages_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.pages_visited as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Thread-safe counters behind [`CrawlStats`]
pub struct StatsTracker {
    pages_visited: AtomicUsize,
    items_extracted: AtomicUsize,
    errors_encountered: AtomicUsize,
    start_time: Instant,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            pages_visited: AtomicUsize::new(0),
            items_extracted: AtomicUsize::new(0),
            errors_encountered: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn page_visited(&self) {
        self.pages_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn item_extracted(&self) {
        self.items_extracted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn error_encountered(&self) {
        self.errors_encountered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            pages_visited: self.pages_visited.load(Ordering::Relaxed),
            items_extracted: self.items_extracted.load(Ordering::Relaxed),
            errors_encountered: self.errors_encountered.load(Ordering::Relaxed),
            start_time: self.start_time,
            last_update: Instant::now(),
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

struct Visit<T> {
    request: Request,
    outcome: Result<(Vec<T>, Vec<Request>), CrawlError>,
}

fn is_cancelled(cancel_token: Option<&CancellationToken>) -> bool {
    cancel_token.is_some_and(CancellationToken::is_cancelled)
}

/// Crawler that fetches pages concurrently and feeds them to a spider
///
/// Requests discovered on one depth are fetched together on the next, so the
/// crawl ends when a depth produces no new request.
pub struct Crawler {
    config: CrawlerConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Crawler {
    /// Create a crawler builder for custom configuration
    pub fn builder() -> CrawlerBuilder {
        CrawlerBuilder::default()
    }

    /// Crawl until no request is left and return the final statistics
    pub async fn crawl<S>(&self, spider: Arc<S>) -> CrawlStats
    where
        S: Spider + ?Sized,
    {
        self.crawl_internal(spider, None).await
    }

    /// Crawl with cancellation support
    ///
    /// Once the token is cancelled no new request is started; requests already
    /// fetched are still parsed and their items processed.
    pub async fn crawl_with_cancellation<S>(
        &self,
        spider: Arc<S>,
        cancel_token: CancellationToken,
    ) -> CrawlStats
    where
        S: Spider + ?Sized,
    {
        self.crawl_internal(spider, Some(cancel_token)).await
    }

    async fn crawl_internal<S>(
        &self,
        spider: Arc<S>,
        cancel_token: Option<CancellationToken>,
    ) -> CrawlStats
    where
        S: Spider + ?Sized,
    {
        let stats = StatsTracker::new();
        let rate_limiter = self.config.rate_limiter.build();
        let mut seen = HashSet::<String>::new();

        let mut frontier: Vec<Request> = spider
            .start_requests()
            .into_iter()
            .filter(|request| seen.insert(UrlNormalizer::normalize(&request.url)))
            .collect();
        info!(requests = frontier.len(), "starting crawl");

        while !frontier.is_empty() {
            if is_cancelled(cancel_token.as_ref()) {
                info!(dropped = frontier.len(), "crawl cancelled");
                break;
            }

            let visits: Vec<Option<Visit<S::Item>>> = stream::iter(std::mem::take(&mut frontier))
                .map(|request| {
                    self.visit(
                        spider.as_ref(),
                        request,
                        rate_limiter.as_ref(),
                        cancel_token.as_ref(),
                    )
                })
                .buffer_unordered(self.config.crawling_concurrency)
                .collect()
                .await;

            let mut items = Vec::new();
            for visit in visits.into_iter().flatten() {
                stats.page_visited();
                match visit.outcome {
                    Ok((new_items, follow_ups)) => {
                        debug!(
                            url = %visit.request.url,
                            items = new_items.len(),
                            follow_ups = follow_ups.len(),
                            "parsed page"
                        );
                        items.extend(new_items);
                        frontier.extend(follow_ups.into_iter().filter(|request| {
                            seen.insert(UrlNormalizer::normalize(&request.url))
                        }));
                    }
                    Err(error) => {
                        warn!(
                            url = %error.url,
                            operation = error.operation,
                            error = %error.error,
                            "request failed"
                        );
                        stats.error_encountered();
                    }
                }
            }

            stream::iter(items)
                .for_each_concurrent(self.config.processing_concurrency, |item| {
                    let spider = spider.as_ref();
                    let stats = &stats;
                    async move {
                        match spider.process(item).await {
                            Ok(()) => stats.item_extracted(),
                            Err(err) => {
                                warn!(error = %err, "failed to process item");
                                stats.error_encountered();
                            }
                        }
                    }
                })
                .await;
        }

        let final_stats = stats.snapshot();
        info!(
            pages = final_stats.pages_visited,
            items = final_stats.items_extracted,
            errors = final_stats.errors_encountered,
            "crawl finished"
        );
        final_stats
    }

    async fn visit<S>(
        &self,
        spider: &S,
        request: Request,
        rate_limiter: &dyn RateLimiter,
        cancel_token: Option<&CancellationToken>,
    ) -> Option<Visit<S::Item>>
    where
        S: Spider + ?Sized,
    {
        if is_cancelled(cancel_token) {
            return None;
        }
        rate_limiter.acquire().await;

        debug!(url = %request.url, callback = ?request.callback, "fetching page");
        let outcome = match self.fetcher.fetch(&request.url).await {
            Ok(body) => spider
                .parse(&request, &body)
                .map_err(|err| CrawlError::new(&request.url, "parse", err)),
            Err(err) => Err(CrawlError::new(&request.url, "fetch", err)),
        };
        Some(Visit { request, outcome })
    }
}

/// Builder for configuring a Crawler
pub struct CrawlerBuilder {
    config: CrawlerConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl Default for CrawlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlerBuilder {
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig {
                crawling_concurrency: DEFAULT_CRAWLING_CONCURRENCY,
                processing_concurrency: DEFAULT_PROCESSING_CONCURRENCY,
                rate_limiter: RateLimiterConfig::Delay(Duration::from_millis(DEFAULT_DELAY_MS)),
            },
            fetcher: None,
        }
    }

    /// Set the number of concurrent fetches (default: 2)
    pub fn crawling_concurrency(mut self, concurrency: usize) -> Self {
        self.config.crawling_concurrency = concurrency;
        self
    }

    /// Set the number of items processed concurrently (default: 2)
    pub fn processing_concurrency(mut self, concurrency: usize) -> Self {
        self.config.processing_concurrency = concurrency;
        self
    }

    /// Wait a fixed delay before every request (default: 200ms)
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.rate_limiter = RateLimiterConfig::Delay(delay);
        self
    }

    /// Limit requests with a token bucket
    pub fn rate_limit(mut self, requests_per_second: f64) -> Self {
        self.config.rate_limiter = RateLimiterConfig::TokenBucket {
            requests_per_second,
        };
        self
    }

    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limiter = RateLimiterConfig::None;
        self
    }

    /// Serve pages from a custom fetcher instead of HTTP
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Build the Crawler with the configured settings
    pub fn build(self) -> Result<Crawler, ConfigError> {
        self.config.validate()?;
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new()?),
        };
        Ok(Crawler {
            config: self.config,
            fetcher,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn token_bucket_below_one_request_per_second() {
        let limiter = TokenBucketLimiter::new(0.5);
        let start = time::Instant::now();

        let acquired = time::timeout(Duration::from_secs(5), async {
            limiter.acquire().await;
            limiter.acquire().await;
        })
        .await;

        assert!(acquired.is_ok());
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn token_bucket_allows_burst_of_one_second() {
        let limiter = TokenBucketLimiter::new(3.0);
        let start = time::Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[test]
    fn pages_per_second_of_empty_crawl() {
        let now = Instant::now();
        let stats = CrawlStats {
            pages_visited: 0,
            items_extracted: 0,
            errors_encountered: 0,
            start_time: now,
            last_update: now,
        };

        assert_eq!(stats.pages_per_second(), 0.0);
    }
}
