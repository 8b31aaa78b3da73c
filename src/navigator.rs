use std::sync::Arc;

use url::Url;

use crate::backend::ElementRef;
use crate::observer::{ExtractObserver, NoopObserver};
use crate::page::Page;
use crate::selectors::{ANCHOR, COMPLETE_LIST_TEXT, DETAIL_SUFFIX};

/// Finds the detailed statistics table linked from a listing page
#[derive(Clone)]
pub struct Navigator {
    observer: Arc<dyn ExtractObserver>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoopObserver))
    }

    pub fn with_observer(observer: Arc<dyn ExtractObserver>) -> Self {
        Self { observer }
    }

    /// URL of the first page of the full transfer table
    ///
    /// Takes the href of the first anchor whose text contains
    /// `View complete list`, appends `/plus/1` and resolves it against the
    /// page URL. Listing pages without such a link have nothing further to
    /// extract, so absence is `None` rather than an error.
    pub fn locate_detail_url(&self, page: &Page) -> Option<Url> {
        let detail = page
            .root()
            .select_all(ANCHOR)
            .into_iter()
            .filter(|anchor| ElementRef::text(anchor).contains(COMPLETE_LIST_TEXT))
            .find_map(|anchor| anchor.attr("href").map(str::to_owned))
            .and_then(|href| page.url().join(&format!("{href}{DETAIL_SUFFIX}")).ok());

        if detail.is_none() {
            self.observer.on_detail_link_missing(page.url().as_str());
        }
        detail
    }
}

/// [`Navigator::locate_detail_url`] without an observer
pub fn locate_detail_url(page: &Page) -> Option<Url> {
    Navigator::new().locate_detail_url(page)
}
