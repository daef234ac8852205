//! Search inputs and the navigation to the results page.
//!
//! The page carries two redundant search inputs (desktop header and mobile
//! drawer). Only one is visible at a time, so a search reads the desktop
//! value and falls back to the mobile one. Every search leaves both inputs
//! holding the query that was searched.

use std::fmt;

use tracing::debug;

use crate::config::StorefrontConfig;
use crate::url::with_query_param;

/// One of the two search inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchWidget {
    Desktop,
    Mobile,
}

impl SearchWidget {
    pub const ALL: [Self; 2] = [Self::Desktop, Self::Mobile];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Desktop => 0,
            Self::Mobile => 1,
        }
    }
}

impl fmt::Display for SearchWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current text of both inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    pub desktop: String,
    pub mobile: String,
}

impl SearchBox {
    #[must_use]
    pub fn value(&self, widget: SearchWidget) -> &str {
        match widget {
            SearchWidget::Desktop => &self.desktop,
            SearchWidget::Mobile => &self.mobile,
        }
    }

    pub fn set_value(&mut self, widget: SearchWidget, value: impl Into<String>) {
        let value = value.into();
        match widget {
            SearchWidget::Desktop => self.desktop = value,
            SearchWidget::Mobile => self.mobile = value,
        }
    }

    /// The query a search would use: desktop text, or mobile text when the
    /// desktop input is empty.
    #[must_use]
    pub fn query(&self) -> &str {
        if self.desktop.is_empty() {
            &self.mobile
        } else {
            &self.desktop
        }
    }

    /// Put `query` into both inputs.
    pub fn mirror(&mut self, query: &str) {
        query.clone_into(&mut self.desktop);
        query.clone_into(&mut self.mobile);
    }

    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.desktop == self.mobile
    }
}

/// Results page URL for `query`.
///
/// ```
/// use storefront_core::search::feed_url;
///
/// assert_eq!(feed_url("/feed", "su şişesi", true), "/feed?q=su%20%C5%9Fi%C5%9Fesi");
/// assert_eq!(feed_url("/feed", "laptop", false), "/feed?q=laptop");
/// ```
#[must_use]
pub fn feed_url(feed_path: &str, query: &str, encode: bool) -> String {
    with_query_param(feed_path, "q", query, encode)
}

/// Owns the inputs and turns search actions into navigation URLs.
#[derive(Debug, Clone)]
pub struct SearchController {
    feed_path: String,
    encode_query: bool,
    inputs: SearchBox,
}

impl SearchController {
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            feed_path: config.feed_path.clone(),
            encode_query: config.encode_feed_query,
            inputs: SearchBox::default(),
        }
    }

    #[must_use]
    pub fn inputs(&self) -> &SearchBox {
        &self.inputs
    }

    #[must_use]
    pub fn value(&self, widget: SearchWidget) -> &str {
        self.inputs.value(widget)
    }

    /// Record what the user typed into `widget`.
    pub fn input(&mut self, widget: SearchWidget, value: impl Into<String>) {
        self.inputs.set_value(widget, value);
    }

    /// Search with the current query. Returns the URL to navigate to.
    pub fn search(&mut self) -> String {
        let query = self.inputs.query().to_owned();
        self.go(&query)
    }

    /// Search for an accepted suggestion. Returns the URL to navigate to.
    pub fn accept(&mut self, text: &str) -> String {
        self.go(text)
    }

    fn go(&mut self, query: &str) -> String {
        self.inputs.mirror(query);
        let url = feed_url(&self.feed_path, query, self.encode_query);
        debug!(query, %url, "search");
        url
    }
}
