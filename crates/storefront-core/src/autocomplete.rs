//! Debounced suggestions for the search inputs.
//!
//! Each widget owns a suggestion panel and a request generation. Every call
//! to [`AutocompleteController::begin`] bumps the widget's generation, and a
//! response is applied only if it carries the current one, so a slow answer
//! to an old query can never overwrite the panel for a newer query.
//!
//! # Response handling
//!
//! | Response | Panel |
//! |----------|-------|
//! | 2xx, non-empty JSON array of strings | shown, rows in response order |
//! | 2xx, `[]` or `null` | hidden |
//! | 2xx, anything else | hidden, logged |
//! | non-2xx or network failure | hidden, logged |
//! | older generation | untouched |

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::config::{DebounceScope, StorefrontConfig};
use crate::error::FetchError;
use crate::http::{FetchResult, HttpRequest};
use crate::program::TimerSlot;
use crate::search::SearchWidget;
use crate::url::with_query_param;

const SLOT_DESKTOP: TimerSlot = TimerSlot("autocomplete.desktop");
const SLOT_MOBILE: TimerSlot = TimerSlot("autocomplete.mobile");
const SLOT_SHARED: TimerSlot = TimerSlot("autocomplete");

/// One suggestion row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
}

/// Visible state of one widget's dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionPanel {
    pub visible: bool,
    pub suggestions: Vec<Suggestion>,
}

impl SuggestionPanel {
    fn hide(&mut self) {
        self.visible = false;
        self.suggestions.clear();
    }
}

/// A suggestions request tagged with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub widget: SearchWidget,
    pub generation: u64,
    pub request: HttpRequest,
}

/// What applying a response did to the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Panel shown with this many rows.
    Shown(usize),
    /// Empty result; panel hidden.
    Hidden,
    /// A newer request superseded this one; nothing changed.
    Stale,
    /// Request failed; panel hidden.
    Failed(FetchError),
}

/// Parse a suggestions body: a JSON array of strings, or `null`.
pub fn parse_suggestions(body: &str) -> Result<Vec<String>, FetchError> {
    serde_json::from_str::<Option<Vec<String>>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// Suggestion panels plus the bookkeeping that keeps them current.
#[derive(Debug, Clone)]
pub struct AutocompleteController {
    endpoint: String,
    delay: Duration,
    scope: DebounceScope,
    panels: [SuggestionPanel; 2],
    generations: [u64; 2],
}

impl AutocompleteController {
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            endpoint: config.autocomplete_endpoint.clone(),
            delay: config.debounce(),
            scope: config.debounce_scope,
            panels: Default::default(),
            generations: [0; 2],
        }
    }

    /// Quiet period before a keystroke burst is fetched.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Timer slot the keystrokes of `widget` arm.
    #[must_use]
    pub fn debounce_slot(&self, widget: SearchWidget) -> TimerSlot {
        match (self.scope, widget) {
            (DebounceScope::Shared, _) => SLOT_SHARED,
            (DebounceScope::PerWidget, SearchWidget::Desktop) => SLOT_DESKTOP,
            (DebounceScope::PerWidget, SearchWidget::Mobile) => SLOT_MOBILE,
        }
    }

    /// Start a lookup for `query` on `widget`.
    ///
    /// An empty query hides the panel and returns `None`. Either way any
    /// response still in flight for this widget becomes stale.
    pub fn begin(&mut self, widget: SearchWidget, query: &str) -> Option<SuggestionRequest> {
        let generation = self.bump(widget);
        if query.is_empty() {
            trace!(%widget, "empty query, hiding suggestions");
            self.panels[widget.index()].hide();
            return None;
        }
        let url = with_query_param(&self.endpoint, "q", query, true);
        debug!(%widget, generation, %url, "fetching suggestions");
        Some(SuggestionRequest {
            widget,
            generation,
            request: HttpRequest::get(url),
        })
    }

    /// Apply the outcome of the request tagged `generation`.
    pub fn apply_response(
        &mut self,
        widget: SearchWidget,
        generation: u64,
        result: FetchResult,
    ) -> ApplyOutcome {
        let current = self.generations[widget.index()];
        if generation != current {
            debug!(%widget, generation, current, "stale suggestions discarded");
            return ApplyOutcome::Stale;
        }
        let parsed = result
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| parse_suggestions(&resp.body));
        let panel = &mut self.panels[widget.index()];
        match parsed {
            Ok(texts) if texts.is_empty() => {
                panel.hide();
                ApplyOutcome::Hidden
            }
            Ok(texts) => {
                panel.suggestions = texts.into_iter().map(|text| Suggestion { text }).collect();
                panel.visible = true;
                ApplyOutcome::Shown(panel.suggestions.len())
            }
            Err(err) => {
                warn!(%widget, error = %err, "suggestions request failed");
                panel.hide();
                ApplyOutcome::Failed(err)
            }
        }
    }

    /// Hide both panels.
    pub fn hide_all(&mut self) {
        for panel in &mut self.panels {
            panel.hide();
        }
    }

    /// Text of row `index` on `widget`'s panel.
    #[must_use]
    pub fn suggestion(&self, widget: SearchWidget, index: usize) -> Option<&str> {
        self.panels[widget.index()]
            .suggestions
            .get(index)
            .map(|s| s.text.as_str())
    }

    #[must_use]
    pub fn panel(&self, widget: SearchWidget) -> &SuggestionPanel {
        &self.panels[widget.index()]
    }

    /// Generation of the latest request started for `widget`.
    #[must_use]
    pub fn generation(&self, widget: SearchWidget) -> u64 {
        self.generations[widget.index()]
    }

    fn bump(&mut self, widget: SearchWidget) -> u64 {
        let slot = &mut self.generations[widget.index()];
        *slot = slot.wrapping_add(1);
        *slot
    }
}
