//! Star-rating review modal.
//!
//! # State machine
//!
//! ```text
//!            open(order)                 begin_submit() == Ok(Some)
//! Closed ───────────────▶ Open{draft} ─────────────────────────▶ Submitting{draft}
//!   ▲                       │   ▲                                   │
//!   │        close()        │   │      finish_submit(failure)       │
//!   ├───────────────────────┘   └───────────────────────────────────┤
//!   │                      finish_submit(success) / close()         │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! `open` always starts from a fresh draft (rating 0, empty comment),
//! whatever the previous state. While `Submitting`, further submits are
//! ignored. A response that arrives after the modal was closed or reopened
//! still yields its outcome (so the user gets the alert) but leaves the
//! current modal alone.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::StorefrontConfig;
use crate::error::{FetchError, ReviewRejection};
use crate::http::{FetchResult, HttpRequest};
use crate::url::with_query_param;

/// Number of stars in the widget.
pub const MAX_STARS: u8 = 5;

/// The order row a review is about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderContext {
    pub order_id: String,
    pub product_image: String,
    pub product_name: String,
}

impl OrderContext {
    #[must_use]
    pub fn new(
        order_id: impl Into<String>,
        product_image: impl Into<String>,
        product_name: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            product_image: product_image.into(),
            product_name: product_name.into(),
        }
    }
}

/// Selected star count; zero means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct StarRating(u8);

impl StarRating {
    pub const UNSET: Self = Self(0);

    /// `None` above [`MAX_STARS`].
    #[must_use]
    pub const fn new(stars: u8) -> Option<Self> {
        if stars <= MAX_STARS {
            Some(Self(stars))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_set(self) -> bool {
        self.0 != 0
    }
}

/// Review being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub order: OrderContext,
    pub rating: StarRating,
    pub comment: String,
}

impl ReviewDraft {
    fn fresh(order: OrderContext) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }
}

/// Modal lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        draft: ReviewDraft,
        /// Star under the pointer, previewed instead of the rating.
        hover: Option<u8>,
    },
    Submitting {
        draft: ReviewDraft,
    },
}

/// JSON body posted to the review endpoint. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSubmission<'a> {
    pub order_id: &'a str,
    pub rating: u8,
    pub comment: &'a str,
}

impl ReviewSubmission<'_> {
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 2xx.
    Accepted,
    /// Non-2xx, with the response text.
    Rejected { status: u16, body: String },
    /// The request never completed.
    Failed(String),
}

/// Everything the host needs to paint the modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalView {
    pub open: bool,
    pub product_image: String,
    pub product_name: String,
    /// Stars drawn filled: the hover preview if any, else the rating.
    pub filled_stars: u8,
    /// Value of the hidden rating field.
    pub rating_field: String,
    pub comment: String,
    pub scroll_locked: bool,
    pub submitting: bool,
}

/// Extract the URL from a CSS `background-image` value.
///
/// Accepts `url("…")`, `url('…')` and bare `url(…)`; anything else is
/// returned trimmed, unchanged.
///
/// ```
/// use storefront_core::review::parse_css_url;
///
/// assert_eq!(parse_css_url(r#"url("/img/p.png")"#), "/img/p.png");
/// assert_eq!(parse_css_url("url('/img/p.png')"), "/img/p.png");
/// assert_eq!(parse_css_url("url(/img/p.png)"), "/img/p.png");
/// assert_eq!(parse_css_url("none"), "none");
/// ```
#[must_use]
pub fn parse_css_url(value: &str) -> &str {
    let value = value.trim();
    let Some(inner) = value
        .strip_prefix("url(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return value;
    };
    let inner = inner.trim();
    for quote in ['"', '\''] {
        if let Some(unquoted) = inner
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return unquoted;
        }
    }
    inner
}

/// Owns the modal state.
#[derive(Debug, Clone)]
pub struct ReviewModalController {
    endpoint: String,
    state: ModalState,
}

impl ReviewModalController {
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            endpoint: config.review_endpoint.clone(),
            state: ModalState::Closed,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.state, ModalState::Closed)
    }

    #[must_use]
    pub fn draft(&self) -> Option<&ReviewDraft> {
        match &self.state {
            ModalState::Closed => None,
            ModalState::Open { draft, .. } | ModalState::Submitting { draft } => Some(draft),
        }
    }

    /// Committed rating, or unset when closed.
    #[must_use]
    pub fn rating(&self) -> StarRating {
        self.draft().map_or(StarRating::UNSET, |d| d.rating)
    }

    /// Open for a rate button press. A row without an order id is refused.
    pub fn open_from_row(&mut self, order: Option<OrderContext>) -> Result<(), ReviewRejection> {
        match order {
            Some(order) if !order.order_id.is_empty() => {
                self.open(order);
                Ok(())
            }
            _ => {
                warn!("rate pressed in a row without an order id");
                Err(ReviewRejection::MissingOrderContext)
            }
        }
    }

    /// Show the modal for `order` with a fresh draft.
    pub fn open(&mut self, order: OrderContext) {
        info!(order_id = %order.order_id, "review modal opened");
        self.state = ModalState::Open {
            draft: ReviewDraft::fresh(order),
            hover: None,
        };
    }

    /// Hide the modal and drop the draft.
    pub fn close(&mut self) {
        if self.is_open() {
            debug!("review modal closed");
        }
        self.state = ModalState::Closed;
    }

    /// Preview `star` filled stars.
    pub fn hover(&mut self, star: u8) {
        if let ModalState::Open { hover, .. } = &mut self.state {
            *hover = Some(star.min(MAX_STARS));
        }
    }

    /// End the preview; the committed rating shows again.
    pub fn leave(&mut self) {
        if let ModalState::Open { hover, .. } = &mut self.state {
            *hover = None;
        }
    }

    /// Commit a rating. Out-of-range values are ignored.
    pub fn click(&mut self, star: u8) {
        let Some(rating) = StarRating::new(star) else {
            warn!(star, "star value out of range");
            return;
        };
        if let ModalState::Open { draft, .. } = &mut self.state {
            draft.rating = rating;
        }
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        if let ModalState::Open { draft, .. } = &mut self.state {
            draft.comment = comment.into();
        }
    }

    /// Validate the draft and build the POST.
    ///
    /// Returns `Ok(None)` if a submission is already in flight. The rating
    /// is checked before the order id.
    pub fn begin_submit(&mut self) -> Result<Option<HttpRequest>, ReviewRejection> {
        let draft = match &self.state {
            ModalState::Submitting { .. } => {
                debug!("submit ignored, already submitting");
                return Ok(None);
            }
            ModalState::Closed => return Err(ReviewRejection::MissingRating),
            ModalState::Open { draft, .. } => draft,
        };
        if !draft.rating.is_set() {
            return Err(ReviewRejection::MissingRating);
        }
        if draft.order.order_id.is_empty() {
            warn!("submit without an order id");
            return Err(ReviewRejection::MissingOrder);
        }

        let body = ReviewSubmission {
            order_id: &draft.order.order_id,
            rating: draft.rating.value(),
            comment: &draft.comment,
        }
        .to_json();
        let url = with_query_param(&self.endpoint, "order", &draft.order.order_id, true);
        let request = HttpRequest::post_json(url, body);

        let draft = draft.clone();
        info!(order_id = %draft.order.order_id, rating = draft.rating.value(), "submitting review");
        self.state = ModalState::Submitting { draft };
        Ok(Some(request))
    }

    /// Settle the in-flight submission.
    pub fn finish_submit(&mut self, result: FetchResult) -> SubmitOutcome {
        let outcome = match result {
            Ok(resp) if resp.is_success() => SubmitOutcome::Accepted,
            Ok(resp) => SubmitOutcome::Rejected {
                status: resp.status,
                body: resp.body,
            },
            Err(FetchError::Status { status, body }) => SubmitOutcome::Rejected { status, body },
            Err(err) => SubmitOutcome::Failed(err.to_string()),
        };

        let state = std::mem::take(&mut self.state);
        self.state = match (state, &outcome) {
            (ModalState::Submitting { .. }, SubmitOutcome::Accepted) => ModalState::Closed,
            (ModalState::Submitting { draft }, _) => ModalState::Open { draft, hover: None },
            (other, _) => {
                debug!("review response arrived after the modal changed");
                other
            }
        };
        info!(?outcome, "review submission settled");
        outcome
    }

    #[must_use]
    pub fn view(&self) -> ModalView {
        let (draft, hover, submitting) = match &self.state {
            ModalState::Closed => {
                return ModalView {
                    rating_field: "0".into(),
                    ..ModalView::default()
                };
            }
            ModalState::Open { draft, hover } => (draft, *hover, false),
            ModalState::Submitting { draft } => (draft, None, true),
        };
        ModalView {
            open: true,
            product_image: draft.order.product_image.clone(),
            product_name: draft.order.product_name.clone(),
            filled_stars: hover.unwrap_or(draft.rating.value()),
            rating_field: draft.rating.value().to_string(),
            comment: draft.comment.clone(),
            scroll_locked: true,
            submitting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, Method};
    use pretty_assertions::assert_eq;

    fn controller() -> ReviewModalController {
        ReviewModalController::new(&StorefrontConfig::default())
    }

    fn order(id: &str) -> OrderContext {
        OrderContext::new(id, "/img/p.png", "Kahve Makinesi")
    }

    #[test]
    fn open_resets_draft() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(3);
        modal.set_comment("iyi");
        modal.open(order("ord_2"));
        let draft = modal.draft().unwrap();
        assert_eq!(draft.rating, StarRating::UNSET);
        assert_eq!(draft.comment, "");
        assert_eq!(draft.order.order_id, "ord_2");
    }

    #[test]
    fn row_without_order_is_refused() {
        let mut modal = controller();
        assert_eq!(
            modal.open_from_row(None),
            Err(ReviewRejection::MissingOrderContext)
        );
        assert_eq!(
            modal.open_from_row(Some(order(""))),
            Err(ReviewRejection::MissingOrderContext)
        );
        assert!(!modal.is_open());
        assert!(modal.open_from_row(Some(order("ord_1"))).is_ok());
        assert!(modal.is_open());
    }

    #[test]
    fn hover_previews_and_leave_restores() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(2);
        modal.hover(4);
        assert_eq!(modal.view().filled_stars, 4);
        assert_eq!(modal.view().rating_field, "2");
        modal.leave();
        assert_eq!(modal.view().filled_stars, 2);
    }

    #[test]
    fn click_out_of_range_ignored() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(4);
        modal.click(9);
        assert_eq!(modal.rating().value(), 4);
    }

    #[test]
    fn submit_requires_rating_first() {
        let mut modal = controller();
        modal.open(order(""));
        assert_eq!(modal.begin_submit(), Err(ReviewRejection::MissingRating));
        modal.click(5);
        assert_eq!(modal.begin_submit(), Err(ReviewRejection::MissingOrder));
        assert!(matches!(modal.state(), ModalState::Open { .. }));
    }

    #[test]
    fn submit_builds_exact_request() {
        let mut modal = controller();
        modal.open(order("ord_9"));
        modal.click(4);
        modal.set_comment("Great");
        let req = modal.begin_submit().unwrap().unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.url, "/review?order=ord_9");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"order_id":"ord_9","rating":4,"comment":"Great"}"#)
        );
        assert!(modal.view().submitting);
    }

    #[test]
    fn comment_is_json_escaped() {
        let submission = ReviewSubmission {
            order_id: "o",
            rating: 1,
            comment: "\"çok\" iyi\n",
        };
        assert_eq!(
            submission.to_json(),
            r#"{"order_id":"o","rating":1,"comment":"\"çok\" iyi\n"}"#
        );
    }

    #[test]
    fn duplicate_submit_ignored() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(1);
        assert!(modal.begin_submit().unwrap().is_some());
        assert_eq!(modal.begin_submit(), Ok(None));
    }

    #[test]
    fn success_closes() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(5);
        modal.begin_submit().unwrap();
        assert_eq!(
            modal.finish_submit(Ok(HttpResponse::new(201, ""))),
            SubmitOutcome::Accepted
        );
        assert_eq!(modal.state(), &ModalState::Closed);
        assert_eq!(modal.view().rating_field, "0");
    }

    #[test]
    fn rejection_keeps_draft() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(3);
        modal.set_comment("meh");
        modal.begin_submit().unwrap();
        assert_eq!(
            modal.finish_submit(Ok(HttpResponse::new(400, "bad"))),
            SubmitOutcome::Rejected {
                status: 400,
                body: "bad".into()
            }
        );
        let draft = modal.draft().unwrap();
        assert_eq!(draft.rating.value(), 3);
        assert_eq!(draft.comment, "meh");
        assert!(!modal.view().submitting);
    }

    #[test]
    fn network_failure_keeps_draft() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(3);
        modal.begin_submit().unwrap();
        let outcome = modal.finish_submit(Err(FetchError::Network("offline".into())));
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(matches!(modal.state(), ModalState::Open { .. }));
    }

    #[test]
    fn late_response_leaves_reopened_modal_alone() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(3);
        modal.begin_submit().unwrap();
        modal.open(order("ord_2"));
        assert_eq!(
            modal.finish_submit(Ok(HttpResponse::new(200, ""))),
            SubmitOutcome::Accepted
        );
        assert_eq!(modal.draft().unwrap().order.order_id, "ord_2");
    }

    #[test]
    fn close_resets_everything() {
        let mut modal = controller();
        modal.open(order("ord_1"));
        modal.click(2);
        modal.close();
        assert_eq!(modal.view(), ModalView {
            rating_field: "0".into(),
            ..ModalView::default()
        });
        assert_eq!(modal.begin_submit(), Err(ReviewRejection::MissingRating));
    }

    #[test]
    fn order_id_is_encoded_in_url() {
        let mut modal = controller();
        modal.open(order("ord 1&x"));
        modal.click(1);
        let req = modal.begin_submit().unwrap().unwrap();
        assert_eq!(req.url, "/review?order=ord%201%26x");
    }
}
