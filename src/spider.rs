//! Spider following competitions to their transfer tables
//!
//! Each parent value names a competition page through its `href`. The listing
//! page is searched for the link to the full transfer table; the table page is
//! turned into records that carry the parent unchanged.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;
use url::Url;

use crate::crawler::{Callback, ConfigError, Request, Spider};
use crate::error::SpiderError;
use crate::navigator::Navigator;
use crate::observer::{ExtractObserver, NoopObserver};
use crate::page::Page;
use crate::record::Record;
use crate::table::TableExtractor;

pub const DEFAULT_BASE_URL: &str = "https://www.transfermarkt.co.uk";

pub struct TransfersSpider {
    base_url: Url,
    parents: Vec<Value>,
    navigator: Navigator,
    extractor: TableExtractor,
    sink: Option<mpsc::Sender<Record>>,
}

impl TransfersSpider {
    pub fn builder() -> TransfersSpiderBuilder {
        TransfersSpiderBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn listing_request(&self, parent: &Value) -> Option<Request> {
        let Some(href) = parent.get("href").and_then(Value::as_str) else {
            warn!(?parent, "parent has no href, skipping");
            return None;
        };
        match self.base_url.join(href) {
            Ok(url) => Some(Request::listing(url, parent.clone())),
            Err(error) => {
                warn!(href, %error, "parent href is not a valid URL, skipping");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl Spider for TransfersSpider {
    type Item = Record;
    type Error = SpiderError;

    fn start_requests(&self) -> Vec<Request> {
        self.parents
            .iter()
            .filter_map(|parent| self.listing_request(parent))
            .collect()
    }

    fn parse(
        &self,
        request: &Request,
        body: &str,
    ) -> Result<(Vec<Record>, Vec<Request>), SpiderError> {
        let page = Page::from_url(request.url.clone(), body);
        match request.callback {
            Callback::Listing => {
                let follow_up = self
                    .navigator
                    .locate_detail_url(&page)
                    .map(|url| Request::detail(url, request.parent.clone()));
                Ok((Vec::new(), follow_up.into_iter().collect()))
            }
            Callback::Detail => {
                let records = self.extractor.extract_all(&page, &request.parent)?;
                Ok((records, Vec::new()))
            }
        }
    }

    async fn process(&self, item: Record) -> Result<(), SpiderError> {
        if let Some(sink) = &self.sink {
            sink.send(item).await.map_err(|_| SpiderError::SinkClosed)?;
        }
        Ok(())
    }
}

/// Builder for [`TransfersSpider`]
pub struct TransfersSpiderBuilder {
    base_url: String,
    parents: Vec<Value>,
    observer: Arc<dyn ExtractObserver>,
    sink: Option<mpsc::Sender<Record>>,
}

impl Default for TransfersSpiderBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            parents: Vec::new(),
            observer: Arc::new(NoopObserver),
            sink: None,
        }
    }
}

impl TransfersSpiderBuilder {
    /// Site root that parent hrefs are resolved against
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Competitions to crawl; each needs an `href` field
    pub fn parents(mut self, parents: Vec<Value>) -> Self {
        self.parents = parents;
        self
    }

    /// Observer for navigator and table extractor events
    pub fn observe_with(mut self, observer: Arc<dyn ExtractObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Channel receiving every processed record
    pub fn sink(mut self, sink: mpsc::Sender<Record>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<TransfersSpider, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(|error| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            error,
        })?;
        Ok(TransfersSpider {
            base_url,
            parents: self.parents,
            navigator: Navigator::with_observer(self.observer.clone()),
            extractor: TableExtractor::with_observer(self.observer),
            sink: self.sink,
        })
    }
}
