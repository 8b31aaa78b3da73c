//! HTML backend abstraction used by the table extractor
//!
//! The cell heuristics only need a handful of DOM queries. Keeping them behind
//! this trait lets the classifier stay generic over the parsing library.

/// Trait representing an HTML element that can be queried with CSS selectors
pub trait ElementRef: Sized {
    /// Select the first descendant matching the CSS selector
    ///
    /// Returns `None` if no element matches or if the selector is invalid.
    fn select_one(&self, selector: &str) -> Option<Self>;

    /// Select all descendants matching the CSS selector, in document order
    ///
    /// Returns an empty vector if no elements match or if the selector is invalid.
    fn select_all(&self, selector: &str) -> Vec<Self>;

    /// Direct element children, skipping text and comment nodes
    fn child_elements(&self) -> Vec<Self>;

    /// Local tag name, lower-case (`td`, `a`, ...)
    fn tag_name(&self) -> &str;

    /// Whether the `class` attribute contains `class` as a token
    fn has_class(&self, class: &str) -> bool;

    /// Get the value of an HTML attribute
    fn attr(&self, name: &str) -> Option<&str>;

    /// Concatenated text of every descendant text node
    fn text(&self) -> String;

    /// First text node that is a direct child of this element
    fn first_text(&self) -> Option<String>;

    /// First text node at any depth below this element, in document order
    fn first_descendant_text(&self) -> Option<String>;
}

impl<'a> ElementRef for scraper::ElementRef<'a> {
    fn select_one(&self, selector: &str) -> Option<Self> {
        let selector = scraper::Selector::parse(selector).ok()?;
        self.select(&selector).next()
    }

    fn select_all(&self, selector: &str) -> Vec<Self> {
        let selector = match scraper::Selector::parse(selector) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        self.select(&selector).collect()
    }

    fn child_elements(&self) -> Vec<Self> {
        self.children().filter_map(scraper::ElementRef::wrap).collect()
    }

    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn has_class(&self, class: &str) -> bool {
        self.value().classes().any(|c| c == class)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn text(&self) -> String {
        self.text().collect()
    }

    fn first_text(&self) -> Option<String> {
        self.children()
            .find_map(|node| node.value().as_text().map(|text| (**text).to_owned()))
    }

    fn first_descendant_text(&self) -> Option<String> {
        self.text().next().map(str::to_owned)
    }
}
