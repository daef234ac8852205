//! Page configuration.
//!
//! Every field has a default matching the production page, so an empty JSON
//! object (or no config at all) yields a working setup. Hosts override only
//! what differs:
//!
//! ```
//! use storefront_core::config::{DebounceScope, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_json(r#"{"debounce_scope":"shared"}"#).unwrap();
//! assert_eq!(config.debounce_scope, DebounceScope::Shared);
//! assert_eq!(config.debounce_ms, 300);
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Which debounce timer a search widget's keystrokes arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebounceScope {
    /// Desktop and mobile inputs debounce independently.
    #[default]
    PerWidget,
    /// Both inputs share one timer; typing in one cancels the other's
    /// pending fetch.
    Shared,
}

/// DOM ids and selectors the page controllers are bound to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub search_input_desktop: String,
    pub search_input_mobile: String,
    pub autocomplete_wrapper_desktop: String,
    pub autocomplete_wrapper_mobile: String,
    /// Selector of the subtree that counts as "inside search" for dismissal.
    pub search_wrapper_selector: String,
    pub mobile_menu: String,
    /// Tab triggers are `<prefix><tab id>`.
    pub tab_trigger_prefix: String,
    pub selected_trigger_class: String,
    pub unselected_trigger_class: String,
    pub selected_tab_class: String,
    pub unselected_tab_class: String,
    pub review_overlay: String,
    pub close_button_selector: String,
    pub cancel_button_selector: String,
    pub submit_button_selector: String,
    pub rate_button_selector: String,
    pub modal_product_image_selector: String,
    pub modal_product_name_selector: String,
    pub star_selector: String,
    pub selected_rating_input: String,
    pub review_comment: String,
    pub order_selector: String,
    pub order_details_selector: String,
    pub order_image_selector: String,
    pub order_product_name_selector: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            search_input_desktop: "search-input-desktop".into(),
            search_input_mobile: "search-input-mobile".into(),
            autocomplete_wrapper_desktop: "autocomplete-wrapper-desktop".into(),
            autocomplete_wrapper_mobile: "autocomplete-wrapper-mobile".into(),
            search_wrapper_selector: ".search-wrapper".into(),
            mobile_menu: "mobile-menu".into(),
            tab_trigger_prefix: "switcher_".into(),
            selected_trigger_class: "profile-tab-selection selected-selector".into(),
            unselected_trigger_class: "profile-tab-selection".into(),
            selected_tab_class: "selected-tab".into(),
            unselected_tab_class: "tab".into(),
            review_overlay: "review-modal-overlay".into(),
            close_button_selector: ".close-modal".into(),
            cancel_button_selector: ".modal-button.cancel-button".into(),
            submit_button_selector: ".modal-button.submit-button".into(),
            rate_button_selector: ".order-colorful-button.yellow-theme".into(),
            modal_product_image_selector: ".modal-product-image".into(),
            modal_product_name_selector: ".modal-product-name".into(),
            star_selector: ".stars-container i".into(),
            selected_rating_input: "selected-rating".into(),
            review_comment: "review-comment".into(),
            order_selector: ".order".into(),
            order_details_selector: ".order-details".into(),
            order_image_selector: ".order-image".into(),
            order_product_name_selector: ".order-details-product-name".into(),
        }
    }
}

/// Configuration for the page controllers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Suggestions endpoint, queried as `<endpoint>?q=<query>`.
    pub autocomplete_endpoint: String,
    /// Review endpoint, posted as `<endpoint>?order=<order id>`.
    pub review_endpoint: String,
    /// Results page, navigated as `<feed_path>?q=<query>`.
    pub feed_path: String,
    /// Quiet period before a keystroke burst triggers a suggestions fetch.
    pub debounce_ms: u64,
    pub debounce_scope: DebounceScope,
    /// Percent-encode the query in the feed URL. When `false` the query is
    /// appended verbatim and the server must cope.
    pub encode_feed_query: bool,
    /// Locale used to pick user-facing messages.
    pub locale: String,
    /// Max level forwarded to the browser console.
    pub log_level: String,
    pub elements: ElementIds,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            autocomplete_endpoint: "/autocomplete".into(),
            review_endpoint: "/review".into(),
            feed_path: "/feed".into(),
            debounce_ms: 300,
            debounce_scope: DebounceScope::PerWidget,
            encode_feed_query: true,
            locale: "tr".into(),
            log_level: "info".into(),
            elements: ElementIds::default(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl StorefrontConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        for (field, value) in [
            ("autocomplete_endpoint", &self.autocomplete_endpoint),
            ("review_endpoint", &self.review_endpoint),
            ("feed_path", &self.feed_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::InvalidPath {
                    field,
                    value: value.clone(),
                });
            }
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::UnknownLogLevel(self.log_level.clone()));
        }
        Ok(())
    }

    /// Debounce quiet period.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Set the debounce quiet period.
    #[must_use]
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the debounce scope.
    #[must_use]
    pub fn with_debounce_scope(mut self, scope: DebounceScope) -> Self {
        self.debounce_scope = scope;
        self
    }

    /// Choose whether the feed query is percent-encoded.
    #[must_use]
    pub fn with_encoded_feed_query(mut self, encode: bool) -> Self {
        self.encode_feed_query = encode;
        self
    }

    /// Set the message locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}
