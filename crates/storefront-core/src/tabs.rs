//! Hash-addressed tab switcher.
//!
//! A tab `reviews` is a content element with id `reviews` plus a trigger
//! element with id `switcher_reviews`. At most one pair is selected at a
//! time and the selection is mirrored into the location hash as
//! `#tab_reviews`, which is how deep links restore it on load.

use std::fmt;

use tracing::{debug, info, warn};

/// Default trigger id prefix.
pub const TRIGGER_PREFIX: &str = "switcher_";

const HASH_PREFIX: &str = "tab_";

/// Identifier of a tab; also the id of its content element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(String);

impl TabId {
    /// Returns `None` for an empty id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.is_empty()).then_some(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the trigger element, `switcher_<id>`.
    #[must_use]
    pub fn trigger_id(&self) -> String {
        self.trigger_id_with(TRIGGER_PREFIX)
    }

    #[must_use]
    pub fn trigger_id_with(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }

    /// Location hash selecting this tab, `#tab_<id>`.
    #[must_use]
    pub fn hash(&self) -> String {
        format!("#{HASH_PREFIX}{}", self.0)
    }

    /// Tab named by a location hash.
    ///
    /// A leading `#` and then a leading `tab_` are removed; whatever remains
    /// is the id. An empty remainder means no tab.
    ///
    /// ```
    /// use storefront_core::tabs::TabId;
    ///
    /// assert_eq!(TabId::from_hash("#tab_reviews").unwrap().as_str(), "reviews");
    /// assert!(TabId::from_hash("#tab_").is_none());
    /// assert!(TabId::from_hash("").is_none());
    /// ```
    #[must_use]
    pub fn from_hash(hash: &str) -> Option<Self> {
        let fragment = hash.strip_prefix('#').unwrap_or(hash);
        Self::new(fragment.strip_prefix(HASH_PREFIX).unwrap_or(fragment))
    }

    /// Tab whose trigger element has id `trigger_id`.
    #[must_use]
    pub fn from_trigger_id(trigger_id: &str, prefix: &str) -> Option<Self> {
        trigger_id.strip_prefix(prefix).and_then(Self::new)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a switch: what to deselect and the hash to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSwitch {
    pub previous: Option<TabId>,
    pub selected: TabId,
    pub hash: String,
}

/// Tracks the selected tab among those present on the page.
#[derive(Debug, Clone, Default)]
pub struct TabSwitcher {
    known: Vec<TabId>,
    active: Option<TabId>,
}

impl TabSwitcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record which tabs have a trigger on the page.
    pub fn set_known(&mut self, tabs: impl IntoIterator<Item = TabId>) {
        self.known = tabs.into_iter().collect();
        self.known.sort();
        self.known.dedup();
    }

    #[must_use]
    pub fn knows(&self, tab: &TabId) -> bool {
        self.known.binary_search(tab).is_ok()
    }

    #[must_use]
    pub fn active(&self) -> Option<&TabId> {
        self.active.as_ref()
    }

    /// Select `tab`, returning the previous selection and the new hash.
    pub fn switch_to(&mut self, tab: TabId) -> TabSwitch {
        let previous = self.active.replace(tab.clone());
        debug!(tab = %tab, previous = ?previous.as_ref().map(TabId::as_str), "tab switched");
        TabSwitch {
            previous,
            hash: tab.hash(),
            selected: tab,
        }
    }

    /// Select the tab named by a location hash, if it exists on the page.
    pub fn restore_from_hash(&mut self, hash: &str) -> Option<TabSwitch> {
        let tab = TabId::from_hash(hash)?;
        if !self.knows(&tab) {
            warn!(%tab, hash, "hash names a tab that is not on this page");
            return None;
        }
        info!(%tab, "tab restored from hash");
        Some(self.switch_to(tab))
    }
}
