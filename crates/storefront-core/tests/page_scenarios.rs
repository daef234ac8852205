//! End-to-end page scenarios driven through the runner with a fake clock.
//!
//! Each test plays the host: it dispatches DOM events at chosen instants,
//! performs the effects by hand and feeds responses back.

use std::time::Duration;

use pretty_assertions::assert_eq;
use storefront_core::http::Method;
use storefront_core::{
    DebounceScope, Effect, FetchId, HttpRequest, HttpResponse, OrderContext, PageEvent, PageModel,
    PageRunner, SearchWidget, StorefrontConfig, TabId,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("storefront_core=debug")
        .try_init();
}

fn page() -> PageRunner<PageModel> {
    init_tracing();
    PageModel::runner(&StorefrontConfig::default())
}

fn typed(widget: SearchWidget, value: &str) -> PageEvent {
    PageEvent::SearchInput {
        widget,
        value: value.into(),
    }
}

fn fetches(effects: Vec<Effect>) -> Vec<(FetchId, HttpRequest)> {
    effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Fetch { id, request } => Some((id, request)),
            _ => None,
        })
        .collect()
}

fn open_for(runner: &mut PageRunner<PageModel>, order_id: &str) {
    runner.step_event(PageEvent::RateClicked {
        order: Some(OrderContext::new(order_id, "/img/mug.png", "Kupa")),
    });
}

#[test]
fn suggestions_shown_then_accepted() {
    let mut runner = page();
    runner.dispatch(typed(SearchWidget::Desktop, "l"), ms(0));
    runner.dispatch(typed(SearchWidget::Desktop, "la"), ms(80));
    runner.dispatch(typed(SearchWidget::Desktop, "lap"), ms(160));
    runner.step(ms(460));

    let sent = fetches(runner.take_effects());
    assert_eq!(sent.len(), 1);
    let (id, request) = &sent[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "/autocomplete?q=lap");

    assert!(runner.complete_fetch(*id, Ok(HttpResponse::new(200, r#"["laptop","laptop stand"]"#))));
    let view = runner.view().unwrap();
    let panel = view.panel(SearchWidget::Desktop);
    assert!(panel.visible);
    let rows: Vec<&str> = panel.suggestions.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(rows, vec!["laptop", "laptop stand"]);

    runner.step_event(PageEvent::SuggestionClicked {
        widget: SearchWidget::Desktop,
        index: 0,
    });
    assert_eq!(runner.take_effects(), vec![Effect::Navigate("/feed?q=laptop".into())]);
    let view = runner.view().unwrap();
    assert_eq!(view.inputs.desktop, "laptop");
    assert_eq!(view.inputs.mobile, "laptop");
    assert!(!view.panel(SearchWidget::Desktop).visible);
    assert!(!view.panel(SearchWidget::Mobile).visible);
}

#[test]
fn empty_result_hides_panel() {
    let mut runner = page();
    runner.dispatch(typed(SearchWidget::Mobile, "qwxz"), ms(0));
    runner.step(ms(300));
    let (id, _) = fetches(runner.take_effects()).remove(0);
    runner.complete_fetch(id, Ok(HttpResponse::new(200, "[]")));

    let view = runner.force_view();
    let panel = view.panel(SearchWidget::Mobile);
    assert!(!panel.visible);
    assert!(panel.suggestions.is_empty());
}

#[test]
fn clearing_the_input_hides_without_request() {
    let mut runner = page();
    runner.dispatch(typed(SearchWidget::Desktop, "lap"), ms(0));
    runner.step(ms(300));
    let (id, _) = fetches(runner.take_effects()).remove(0);
    runner.complete_fetch(id, Ok(HttpResponse::new(200, r#"["laptop"]"#)));

    runner.dispatch(typed(SearchWidget::Desktop, ""), ms(1_000));
    runner.step(ms(1_300));
    assert!(fetches(runner.take_effects()).is_empty());
    assert!(!runner.force_view().panel(SearchWidget::Desktop).visible);
}

#[test]
fn late_response_for_old_query_is_dropped() {
    let mut runner = page();
    runner.dispatch(typed(SearchWidget::Desktop, "la"), ms(0));
    runner.step(ms(300));
    runner.dispatch(typed(SearchWidget::Desktop, "lap"), ms(400));
    runner.step(ms(700));
    let sent = fetches(runner.take_effects());
    assert_eq!(sent.len(), 2);
    let (old, new) = (sent[0].0, sent[1].0);

    runner.complete_fetch(new, Ok(HttpResponse::new(200, r#"["laptop"]"#)));
    runner.complete_fetch(old, Ok(HttpResponse::new(200, r#"["lamba","lavanta"]"#)));

    let view = runner.force_view();
    let rows: Vec<&str> = view
        .panel(SearchWidget::Desktop)
        .suggestions
        .iter()
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(rows, vec!["laptop"]);
}

#[test]
fn failed_lookup_logs_and_hides() {
    let mut runner = page();
    runner.dispatch(typed(SearchWidget::Desktop, "lap"), ms(0));
    runner.step(ms(300));
    let (id, _) = fetches(runner.take_effects()).remove(0);
    runner.complete_fetch(id, Ok(HttpResponse::new(503, "busy")));

    assert!(runner.take_effects().is_empty());
    let logs = runner.drain_logs();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].contains("503"));
    assert!(!runner.force_view().panel(SearchWidget::Desktop).visible);
}

#[test]
fn widgets_debounce_independently_by_default() {
    let mut runner = page();
    runner.dispatch(typed(SearchWidget::Desktop, "kupa"), ms(0));
    runner.dispatch(typed(SearchWidget::Mobile, "tabak"), ms(100));
    runner.step(ms(1_000));
    let urls: Vec<String> = fetches(runner.take_effects())
        .into_iter()
        .map(|(_, r)| r.url)
        .collect();
    assert_eq!(urls, vec!["/autocomplete?q=kupa", "/autocomplete?q=tabak"]);
}

#[test]
fn shared_scope_cancels_across_widgets() {
    init_tracing();
    let config = StorefrontConfig::default().with_debounce_scope(DebounceScope::Shared);
    let mut runner = PageModel::runner(&config);
    runner.dispatch(typed(SearchWidget::Desktop, "kupa"), ms(0));
    runner.dispatch(typed(SearchWidget::Mobile, "tabak"), ms(100));
    runner.step(ms(1_000));
    let urls: Vec<String> = fetches(runner.take_effects())
        .into_iter()
        .map(|(_, r)| r.url)
        .collect();
    assert_eq!(urls, vec!["/autocomplete?q=tabak"]);
}

#[test]
fn enter_falls_back_to_mobile_and_mirrors() {
    let mut runner = page();
    runner.step_event(typed(SearchWidget::Mobile, "çanta"));
    runner.step_event(PageEvent::SearchEnter {
        widget: SearchWidget::Mobile,
        desktop: String::new(),
        mobile: "çanta".into(),
    });
    assert_eq!(
        runner.take_effects(),
        vec![Effect::Navigate("/feed?q=%C3%A7anta".into())]
    );
    let view = runner.force_view();
    assert_eq!(view.inputs.desktop, "çanta");
    assert_eq!(view.inputs.mobile, "çanta");
}

#[test]
fn enter_on_prefilled_input_searches_its_text() {
    let mut runner = page();
    runner.dispatch(
        PageEvent::Loaded {
            hash: String::new(),
            tabs: vec![],
        },
        ms(0),
    );
    // The results page renders the last query into the inputs; nothing was typed.
    runner.dispatch(
        PageEvent::SearchEnter {
            widget: SearchWidget::Desktop,
            desktop: "laptop".into(),
            mobile: "laptop".into(),
        },
        ms(10),
    );
    assert_eq!(
        runner.take_effects(),
        vec![Effect::Navigate("/feed?q=laptop".into())]
    );
    let view = runner.force_view();
    assert_eq!(view.inputs.desktop, "laptop");
    assert_eq!(view.inputs.mobile, "laptop");
}

#[test]
fn enter_prefers_page_values_over_stale_keystrokes() {
    let mut runner = page();
    runner.step_event(typed(SearchWidget::Desktop, "lap"));
    runner.step_event(PageEvent::SearchEnter {
        widget: SearchWidget::Desktop,
        desktop: "laptop çantası".into(),
        mobile: String::new(),
    });
    assert_eq!(
        runner.take_effects(),
        vec![Effect::Navigate("/feed?q=laptop%20%C3%A7antas%C4%B1".into())]
    );
}

#[test]
fn review_submitted_and_closed() {
    let mut runner = page();
    open_for(&mut runner, "ord_9");
    runner.step_event(PageEvent::StarHover { star: 5 });
    runner.step_event(PageEvent::StarClick { star: 4 });
    runner.step_event(PageEvent::StarLeave);
    runner.step_event(PageEvent::CommentInput {
        text: "Great".into(),
    });

    let view = runner.force_view();
    assert!(view.modal.open);
    assert!(view.modal.scroll_locked);
    assert_eq!(view.modal.filled_stars, 4);
    assert_eq!(view.modal.rating_field, "4");
    assert_eq!(view.modal.product_name, "Kupa");

    runner.step_event(PageEvent::SubmitReview);
    let sent = fetches(runner.take_effects());
    assert_eq!(sent.len(), 1);
    let (id, request) = &sent[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "/review?order=ord_9");
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(
        request.body.as_deref(),
        Some(r#"{"order_id":"ord_9","rating":4,"comment":"Great"}"#)
    );

    runner.complete_fetch(*id, Ok(HttpResponse::new(200, "{}")));
    assert_eq!(
        runner.take_effects(),
        vec![Effect::Alert("Değerlendirmeniz başarıyla gönderildi!".into())]
    );
    let view = runner.force_view();
    assert!(!view.modal.open);
    assert!(!view.modal.scroll_locked);
}

#[test]
fn rejected_review_shows_status_and_body() {
    let mut runner = page();
    open_for(&mut runner, "ord_3");
    runner.step_event(PageEvent::StarClick { star: 1 });
    runner.step_event(PageEvent::SubmitReview);
    let (id, _) = fetches(runner.take_effects()).remove(0);
    runner.complete_fetch(id, Ok(HttpResponse::new(409, "zaten değerlendirildi")));

    assert_eq!(
        runner.take_effects(),
        vec![Effect::Alert(
            "Değerlendirme gönderilemedi: 409 - zaten değerlendirildi".into()
        )]
    );
    assert_eq!(runner.drain_logs().len(), 1);
    assert!(runner.force_view().modal.open);
}

#[test]
fn double_submit_posts_once() {
    let mut runner = page();
    open_for(&mut runner, "ord_1");
    runner.step_event(PageEvent::StarClick { star: 3 });
    runner.step_event(PageEvent::SubmitReview);
    runner.step_event(PageEvent::SubmitReview);
    assert_eq!(fetches(runner.take_effects()).len(), 1);
    assert!(runner.force_view().modal.submitting);
}

#[test]
fn reopening_resets_draft() {
    let mut runner = page();
    open_for(&mut runner, "ord_1");
    runner.step_event(PageEvent::StarClick { star: 5 });
    runner.step_event(PageEvent::CommentInput { text: "süper".into() });
    runner.step_event(PageEvent::CloseModal);
    open_for(&mut runner, "ord_2");

    let modal = runner.force_view().modal;
    assert!(modal.open);
    assert_eq!(modal.filled_stars, 0);
    assert_eq!(modal.rating_field, "0");
    assert_eq!(modal.comment, "");
}

#[test]
fn deep_link_selects_tab_on_load() {
    let mut runner = page();
    let tabs = ["orders", "reviews", "settings"]
        .into_iter()
        .filter_map(TabId::new)
        .collect();
    runner.step_event(PageEvent::Loaded {
        hash: "#tab_reviews".into(),
        tabs,
    });

    let active = runner.force_view().active_tab;
    assert_eq!(active.as_ref().map(TabId::as_str), Some("reviews"));
    assert_eq!(active.map(|t| t.trigger_id()), Some("switcher_reviews".to_string()));
    assert_eq!(
        runner.take_effects(),
        vec![Effect::HideMobileMenu, Effect::SetHash("#tab_reviews".into())]
    );
}

#[test]
fn load_without_hash_selects_nothing() {
    let mut runner = page();
    runner.step_event(PageEvent::Loaded {
        hash: String::new(),
        tabs: TabId::new("orders").into_iter().collect(),
    });
    assert_eq!(runner.force_view().active_tab, None);
    assert!(runner.take_effects().is_empty());
}
