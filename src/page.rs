use std::fmt;

use scraper::Html;
use url::Url;

use crate::error::ExtractionError;

/// A fetched document together with the URL it was served from
///
/// `scraper::Html` is not `Send`; build a `Page` inside synchronous code and
/// drop it before the next await point.
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parse `body` as a full HTML document served from `url`
    pub fn parse(url: &str, body: &str) -> Result<Self, ExtractionError> {
        let url = Url::parse(url).map_err(|error| ExtractionError::InvalidUrl {
            url: url.to_string(),
            error,
        })?;
        Ok(Self::from_url(url, body))
    }

    pub fn from_url(url: Url, body: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(body),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path component of the page URL, used as the record `href`
    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn root(&self) -> scraper::ElementRef<'_> {
        self.document.root_element()
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page").field("url", &self.url.as_str()).finish_non_exhaustive()
    }
}
