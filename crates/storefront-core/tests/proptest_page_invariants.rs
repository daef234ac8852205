//! Property-based invariant tests for the page controllers.
//!
//! **Debounce:**
//! 1. A burst of keystrokes whose gaps are all shorter than the quiet period
//!    issues exactly one request, for the last value typed.
//! 2. An empty final value issues no request and leaves the panel hidden.
//!
//! **Autocomplete:**
//! 3. Whatever order responses arrive in, the panel only ever shows the
//!    answer to the most recent request.
//!
//! **Search:**
//! 4. After Enter or a suggestion click both inputs hold the searched text
//!    and the navigation URL carries that text.
//!
//! **Review:**
//! 5. Opening the modal always yields rating 0 and an empty comment.
//! 6. Submit produces a request iff the rating is set and an order id is
//!    present.

use std::time::Duration;

use proptest::prelude::*;
use storefront_core::url::encode_uri_component;
use storefront_core::{
    Effect, FetchId, HttpResponse, OrderContext, PageEvent, PageModel, PageRunner, SearchWidget,
    StorefrontConfig,
};

fn page() -> PageRunner<PageModel> {
    PageModel::runner(&StorefrontConfig::default())
}

fn fetch_ids(effects: &[Effect]) -> Vec<FetchId> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Fetch { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

// ── Strategies ────────────────────────────────────────────────────────────

fn widget() -> impl Strategy<Value = SearchWidget> {
    prop_oneof![Just(SearchWidget::Desktop), Just(SearchWidget::Mobile)]
}

fn query() -> impl Strategy<Value = String> {
    "[a-zçğıöşü ]{1,12}"
}

fn burst() -> impl Strategy<Value = Vec<(u64, String)>> {
    prop::collection::vec((0u64..300, query()), 1..12)
}

/// One scripted edit in the modal.
#[derive(Debug, Clone)]
enum ModalAction {
    Hover(u8),
    Leave,
    Click(u8),
    Comment(String),
    Close,
}

fn modal_action() -> impl Strategy<Value = ModalAction> {
    prop_oneof![
        (0u8..=7).prop_map(ModalAction::Hover),
        Just(ModalAction::Leave),
        (0u8..=7).prop_map(ModalAction::Click),
        "[ -~]{0,20}".prop_map(ModalAction::Comment),
        Just(ModalAction::Close),
    ]
}

fn apply(runner: &mut PageRunner<PageModel>, action: ModalAction) {
    let event = match action {
        ModalAction::Hover(star) => PageEvent::StarHover { star },
        ModalAction::Leave => PageEvent::StarLeave,
        ModalAction::Click(star) => PageEvent::StarClick { star },
        ModalAction::Comment(text) => PageEvent::CommentInput { text },
        ModalAction::Close => PageEvent::CloseModal,
    };
    runner.step_event(event);
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn burst_collapses_to_last_value(w in widget(), keys in burst()) {
        let mut runner = page();
        let mut now = 0u64;
        for (gap, value) in &keys {
            now += gap;
            runner.dispatch(
                PageEvent::SearchInput { widget: w, value: value.clone() },
                Duration::from_millis(now),
            );
        }
        runner.step(Duration::from_millis(now + 300));

        let effects = runner.take_effects();
        prop_assert_eq!(effects.len(), 1);
        let last = &keys[keys.len() - 1].1;
        let expected = format!("/autocomplete?q={}", encode_uri_component(last));
        let fetched_last = matches!(
            &effects[0],
            Effect::Fetch { request, .. } if request.url == expected
        );
        prop_assert!(fetched_last);
    }

    #[test]
    fn empty_final_value_never_fetches(w in widget(), keys in burst()) {
        let mut runner = page();
        let mut now = 0u64;
        for (gap, value) in &keys {
            now += gap;
            runner.dispatch(
                PageEvent::SearchInput { widget: w, value: value.clone() },
                Duration::from_millis(now),
            );
        }
        runner.dispatch(
            PageEvent::SearchInput { widget: w, value: String::new() },
            Duration::from_millis(now + 1),
        );
        runner.step(Duration::from_millis(now + 10_000));

        prop_assert!(fetch_ids(&runner.take_effects()).is_empty());
        prop_assert!(!runner.force_view().panel(w).visible);
    }

    #[test]
    fn only_latest_response_is_shown(
        w in widget(),
        queries in prop::collection::vec(query(), 2..6),
        rotation in any::<usize>(),
    ) {
        let mut runner = page();
        let mut ids = Vec::new();
        for (i, q) in queries.iter().enumerate() {
            let t = (i as u64) * 1_000;
            runner.dispatch(
                PageEvent::SearchInput { widget: w, value: q.clone() },
                Duration::from_millis(t),
            );
            runner.step(Duration::from_millis(t + 300));
            ids.extend(fetch_ids(&runner.take_effects()));
        }
        prop_assert_eq!(ids.len(), queries.len());

        // Deliver in a scrambled order; each body names its own query.
        let mut delivery: Vec<usize> = (0..ids.len()).collect();
        let len = delivery.len();
        delivery.rotate_left(rotation % len);
        for i in delivery {
            let body = format!("[\"{}!\"]", queries[i]);
            runner.complete_fetch(ids[i], Ok(HttpResponse::new(200, body)));
        }

        let view = runner.force_view();
        let panel = view.panel(w);
        prop_assert!(panel.visible);
        prop_assert_eq!(panel.suggestions.len(), 1);
        let expected = format!("{}!", queries[queries.len() - 1]);
        prop_assert_eq!(&panel.suggestions[0].text, &expected);
    }

    #[test]
    fn search_mirrors_inputs(
        desktop in "[a-z ]{0,8}",
        mobile in "[a-z ]{0,8}",
        via_suggestion in any::<bool>(),
    ) {
        let mut runner = page();
        runner.step_event(PageEvent::SearchInput { widget: SearchWidget::Desktop, value: desktop.clone() });
        runner.step_event(PageEvent::SearchInput { widget: SearchWidget::Mobile, value: mobile.clone() });

        let searched = if via_suggestion {
            runner.step(Duration::from_millis(1_000));
            let id = fetch_ids(&runner.take_effects()).first().copied();
            let Some(id) = id else {
                // Both inputs empty: nothing to suggest.
                return Ok(());
            };
            runner.complete_fetch(id, Ok(HttpResponse::new(200, r#"["öneri"]"#)));
            runner.step_event(PageEvent::SuggestionClicked {
                widget: if desktop.is_empty() { SearchWidget::Mobile } else { SearchWidget::Desktop },
                index: 0,
            });
            "öneri".to_string()
        } else {
            runner.step_event(PageEvent::SearchEnter {
                widget: SearchWidget::Desktop,
                desktop: desktop.clone(),
                mobile: mobile.clone(),
            });
            if desktop.is_empty() { mobile.clone() } else { desktop.clone() }
        };

        let view = runner.force_view();
        prop_assert_eq!(&view.inputs.desktop, &searched);
        prop_assert_eq!(&view.inputs.mobile, &searched);
        let navigated: Vec<String> = runner
            .take_effects()
            .into_iter()
            .filter_map(|e| match e { Effect::Navigate(url) => Some(url), _ => None })
            .collect();
        prop_assert_eq!(
            navigated,
            vec![format!("/feed?q={}", encode_uri_component(&searched))]
        );
    }

    #[test]
    fn open_always_resets(actions in prop::collection::vec(modal_action(), 0..20)) {
        let mut runner = page();
        runner.step_event(PageEvent::RateClicked {
            order: Some(OrderContext::new("ord_1", "", "Kupa")),
        });
        for action in actions {
            apply(&mut runner, action);
        }
        runner.step_event(PageEvent::RateClicked {
            order: Some(OrderContext::new("ord_2", "", "Tabak")),
        });

        let modal = runner.force_view().modal;
        prop_assert!(modal.open);
        prop_assert_eq!(modal.filled_stars, 0);
        prop_assert_eq!(modal.rating_field, "0");
        prop_assert_eq!(modal.comment, "");
    }

    #[test]
    fn submit_requests_iff_valid(
        star in 0u8..=5,
        order_id in prop_oneof![Just(String::new()), "ord_[0-9]{1,4}"],
        comment in "[ -~]{0,20}",
    ) {
        let mut runner = page();
        runner.step_event(PageEvent::RateClicked {
            order: Some(OrderContext::new(order_id.clone(), "", "Kupa")),
        });
        // An empty id is refused at open; force the modal open anyway.
        if order_id.is_empty() {
            runner
                .model_mut()
                .review_mut()
                .open(OrderContext::new("", "", "Kupa"));
        }
        runner.step_event(PageEvent::StarClick { star });
        runner.step_event(PageEvent::CommentInput { text: comment });
        runner.step_event(PageEvent::SubmitReview);

        let sent = fetch_ids(&runner.take_effects()).len();
        let valid = star != 0 && !order_id.is_empty();
        prop_assert_eq!(sent, usize::from(valid));
    }
}
