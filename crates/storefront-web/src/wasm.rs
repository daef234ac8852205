#![forbid(unsafe_code)]

//! `wasm-bindgen` entry points and the browser host loop.
//!
//! The host owns one [`PageRunner<PageModel>`]. Every DOM listener turns its
//! event into a [`PageEvent`], dispatches it at the current monotonic time
//! and then calls [`flush`], which
//!
//! 1. drains effects, console lines and the next view under one borrow,
//! 2. applies the view diff to the DOM,
//! 3. performs the effects (fetches run in `spawn_local` and report back
//!    through `complete_fetch`),
//! 4. re-arms the single `setTimeout` for the runner's next deadline.

use std::cell::RefCell;
use std::time::Duration;

use js_sys::Object;
use storefront_core::{
    ConfigError, Effect, FetchError, FetchId, FetchResult, HttpRequest, HttpResponse,
    OrderContext, PageEvent, PageModel, PageRunner, PageView, SearchWidget, StorefrontConfig,
    TabId,
};
use storefront_core::review::parse_css_url;
use tracing::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, Element, KeyboardEvent, Request, RequestInit, Response, Window, console,
};
use web_time::Instant;

use crate::dom;
use crate::logging;
use crate::render;

struct App {
    runner: PageRunner<PageModel>,
    config: StorefrontConfig,
    last_view: PageView,
    origin: Instant,
    on_timer: Closure<dyn FnMut()>,
    timer: Option<(i32, Duration)>,
}

impl App {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Run `f` against the page. `None` before `start` or on re-entry.
fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            error!("page state re-entered; event dropped");
            return None;
        };
        slot.as_mut().map(f)
    })
}

fn console_sink(level: tracing::Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        tracing::Level::ERROR => console::error_1(&line),
        tracing::Level::WARN => console::warn_1(&line),
        tracing::Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = match info.location() {
                Some(loc) => format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                ),
                None => format!("panic: {info}"),
            };
            console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// Bind the page controllers to the current document.
///
/// `config_json` overrides any subset of the defaults. Call once the DOM is
/// ready (module scripts run after parsing, so a plain
/// `init().then(() => start())` suffices).
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> Result<(), JsValue> {
    install_panic_hook();
    let config = match config_json.as_deref() {
        Some(json) => StorefrontConfig::from_json(json),
        None => Ok(StorefrontConfig::default()),
    }
    .map_err(|e: ConfigError| JsValue::from_str(&e.to_string()))?;
    logging::init(&config.log_level, console_sink);

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let on_timer = Closure::<dyn FnMut()>::new(on_timer);
    let app = App {
        runner: PageModel::runner(&config),
        config: config.clone(),
        last_view: PageView::default(),
        origin: Instant::now(),
        on_timer,
        timer: None,
    };
    let already_started = APP.with(|cell| {
        let mut slot = cell.borrow_mut();
        let started = slot.is_some();
        if !started {
            *slot = Some(app);
        }
        started
    });
    if already_started {
        warn!("start called twice; ignoring");
        return Ok(());
    }

    bind_search(&document, &config);
    bind_tabs(&document, &config);
    bind_review(&document, &config);

    let hash = window.location().hash().unwrap_or_default();
    let prefix = &config.elements.tab_trigger_prefix;
    let tabs = dom::query_all(&document, &format!("[id^=\"{prefix}\"]"))
        .iter()
        .filter_map(|el| TabId::from_trigger_id(&el.id(), prefix))
        .collect();
    dispatch(PageEvent::Loaded { hash, tabs });
    info!("storefront controllers started");
    Ok(())
}

/// Select a tab by id, as a tab trigger click would.
#[wasm_bindgen(js_name = switchTab)]
pub fn switch_tab(tab: &str) {
    match TabId::new(tab) {
        Some(tab) => dispatch(PageEvent::TabClicked { tab }),
        None => warn!("switchTab called with an empty id"),
    }
}

// -- Event loop ---------------------------------------------------------------

fn dispatch(event: PageEvent) {
    debug!(?event, "dispatch");
    if with_app(|app| {
        let now = app.now();
        app.runner.dispatch(event, now);
    })
    .is_some()
    {
        flush();
    }
}

fn on_timer() {
    if with_app(|app| {
        app.timer = None;
        let now = app.now();
        app.runner.step(now);
    })
    .is_some()
    {
        flush();
    }
}

fn on_fetch_settled(id: FetchId, result: FetchResult) {
    if with_app(|app| app.runner.complete_fetch(id, result)) == Some(true) {
        flush();
    }
}

fn flush() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some((effects, logs, ops)) = with_app(|app| {
        let effects = app.runner.take_effects();
        let logs = app.runner.drain_logs();
        let ops = match app.runner.view() {
            Some(view) => {
                let ops = render::plan(&app.last_view, &view, &app.config.elements);
                app.last_view = view;
                ops
            }
            None => Vec::new(),
        };
        schedule(app, &window);
        (effects, logs, ops)
    }) else {
        return;
    };

    if let Some(document) = window.document() {
        dom::apply(&document, &ops);
    }
    for line in logs {
        console::error_1(&JsValue::from_str(&line));
    }
    for effect in effects {
        perform(&window, effect);
    }
}

/// Keep exactly one `setTimeout` armed for the runner's next deadline.
fn schedule(app: &mut App, window: &Window) {
    let deadline = app.runner.next_deadline();
    if app.timer.map(|(_, armed)| armed) == deadline {
        return;
    }
    if let Some((handle, _)) = app.timer.take() {
        window.clear_timeout_with_handle(handle);
    }
    let Some(deadline) = deadline else {
        return;
    };
    let delay = deadline.saturating_sub(app.now());
    let delay_ms = i32::try_from(delay.as_micros().div_ceil(1_000)).unwrap_or(i32::MAX);
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        app.on_timer.as_ref().unchecked_ref(),
        delay_ms,
    ) {
        Ok(handle) => app.timer = Some((handle, deadline)),
        Err(err) => error!(?err, "setTimeout failed"),
    }
}

fn perform(window: &Window, effect: Effect) {
    let result = match effect {
        Effect::Navigate(url) => window.location().set_href(&url),
        Effect::SetHash(hash) => window.location().set_hash(&hash),
        Effect::Alert(text) => window.alert_with_message(&text),
        Effect::HideMobileMenu => {
            hide_mobile_menu(window);
            Ok(())
        }
        Effect::Fetch { id, request } => {
            spawn_local(async move {
                let result = fetch(request).await;
                on_fetch_settled(id, result);
            });
            Ok(())
        }
    };
    if let Err(err) = result {
        error!(?err, "effect failed");
    }
}

fn hide_mobile_menu(window: &Window) {
    let menu_id = with_app(|app| app.config.elements.mobile_menu.clone()).unwrap_or_default();
    let menu = window
        .document()
        .and_then(|doc| dom::by_id(&doc, &menu_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
    if let Some(menu) = menu {
        let _ = menu.style().set_property("display", "none");
    }
}

fn network_error(err: JsValue) -> FetchError {
    FetchError::Network(format!("{err:?}"))
}

async fn fetch(request: HttpRequest) -> FetchResult {
    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;

    let init = RequestInit::new();
    init.set_method(request.method.as_str());
    let headers = web_sys::Headers::new().map_err(network_error)?;
    for (name, value) in &request.headers {
        headers.set(name, value).map_err(network_error)?;
    }
    init.set_headers(&headers);
    if let Some(body) = &request.body {
        init.set_body(&JsValue::from_str(body));
    }

    let req = Request::new_with_str_and_init(&request.url, &init).map_err(network_error)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(network_error)?
        .dyn_into()
        .map_err(network_error)?;
    let text = JsFuture::from(resp.text().map_err(network_error)?)
        .await
        .map_err(network_error)?;
    Ok(HttpResponse::new(resp.status(), text.as_string().unwrap_or_default()))
}

// -- Bindings -----------------------------------------------------------------

/// Live text of both search inputs. Missing inputs read as empty.
fn input_values(desktop_id: &str, mobile_id: &str) -> (String, String) {
    let document = web_sys::window().and_then(|w| w.document());
    let read = |id: &str| {
        document
            .as_ref()
            .and_then(|doc| dom::by_id(doc, id))
            .and_then(|el| dom::value_of(&el))
            .unwrap_or_default()
    };
    (read(desktop_id), read(mobile_id))
}

fn bind_search(document: &Document, config: &StorefrontConfig) {
    let ids = &config.elements;
    for (widget, input_id, wrapper_id) in [
        (SearchWidget::Desktop, &ids.search_input_desktop, &ids.autocomplete_wrapper_desktop),
        (SearchWidget::Mobile, &ids.search_input_mobile, &ids.autocomplete_wrapper_mobile),
    ] {
        let Some(input) = dom::by_id(document, input_id) else {
            warn!(%widget, id = %input_id, "search input missing");
            continue;
        };
        let source = input.clone();
        dom::listen(&input, "input", move |_| {
            let value = dom::value_of(&source).unwrap_or_default();
            dispatch(PageEvent::SearchInput { widget, value });
        });
        let (desktop_id, mobile_id) = (
            ids.search_input_desktop.clone(),
            ids.search_input_mobile.clone(),
        );
        dom::listen(&input, "keypress", move |event| {
            let is_enter = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|key| key.key() == "Enter");
            if is_enter {
                event.prevent_default();
                let (desktop, mobile) = input_values(&desktop_id, &mobile_id);
                dispatch(PageEvent::SearchEnter {
                    widget,
                    desktop,
                    mobile,
                });
            }
        });

        // One delegated listener per panel; rows carry their index.
        if let Some(wrapper) = dom::by_id(document, wrapper_id) {
            dom::listen(&wrapper, "click", move |event| {
                let index = dom::event_element(&event)
                    .and_then(|el| el.closest(&format!("[{}]", dom::ROW_INDEX_ATTR)).ok().flatten())
                    .and_then(|row| row.get_attribute(dom::ROW_INDEX_ATTR))
                    .and_then(|raw| raw.parse().ok());
                if let Some(index) = index {
                    dispatch(PageEvent::SuggestionClicked { widget, index });
                }
            });
        }
    }

    let wrapper_selector = ids.search_wrapper_selector.clone();
    dom::listen(document, "click", move |event| {
        let inside_search = dom::event_element(&event)
            .and_then(|el| el.closest(&wrapper_selector).ok().flatten())
            .is_some();
        dispatch(PageEvent::DocumentClick { inside_search });
    });
}

fn bind_tabs(document: &Document, config: &StorefrontConfig) {
    let prefix = &config.elements.tab_trigger_prefix;
    for trigger in dom::query_all(document, &format!("[id^=\"{prefix}\"]")) {
        let Some(tab) = TabId::from_trigger_id(&trigger.id(), prefix) else {
            continue;
        };
        dom::listen(&trigger, "click", move |_| {
            dispatch(PageEvent::TabClicked { tab: tab.clone() });
        });
    }
}

/// Order context of the row containing `button`.
fn order_context(button: &Element, config: &StorefrontConfig) -> Option<OrderContext> {
    let ids = &config.elements;
    let row = button.closest(&ids.order_selector).ok().flatten()?;
    let details = row.query_selector(&ids.order_details_selector).ok().flatten()?;
    let order_id = details.id();
    if order_id.is_empty() {
        return None;
    }
    let image = dom::child_style(&row, &ids.order_image_selector, "background-image")
        .unwrap_or_default();
    let name = dom::child_text(&row, &ids.order_product_name_selector).unwrap_or_default();
    Some(OrderContext::new(order_id, parse_css_url(&image), name))
}

fn bind_review(document: &Document, config: &StorefrontConfig) {
    let ids = &config.elements;

    for button in dom::query_all(document, &ids.rate_button_selector) {
        let config = config.clone();
        let source = button.clone();
        dom::listen(&button, "click", move |_| {
            let order = order_context(&source, &config);
            dispatch(PageEvent::RateClicked { order });
        });
    }

    for selector in [&ids.close_button_selector, &ids.cancel_button_selector] {
        if let Some(button) = dom::query(document, selector) {
            dom::listen(&button, "click", |_| dispatch(PageEvent::CloseModal));
        }
    }

    if let Some(overlay) = dom::by_id(document, &ids.review_overlay) {
        let overlay_value: JsValue = overlay.clone().into();
        dom::listen(&overlay, "click", move |event| {
            let on_overlay = event
                .target()
                .is_some_and(|target| Object::is(&target.into(), &overlay_value));
            dispatch(PageEvent::OverlayClick { on_overlay });
        });
    }

    for (i, star) in dom::query_all(document, &ids.star_selector).into_iter().enumerate() {
        let value = render::star_value(star.get_attribute("data-value").as_deref(), i);
        dom::listen(&star, "mouseover", move |_| dispatch(PageEvent::StarHover { star: value }));
        dom::listen(&star, "mouseout", |_| dispatch(PageEvent::StarLeave));
        dom::listen(&star, "click", move |_| dispatch(PageEvent::StarClick { star: value }));
    }

    if let Some(comment) = dom::by_id(document, &ids.review_comment) {
        let source = comment.clone();
        dom::listen(&comment, "input", move |_| {
            let text = dom::value_of(&source).unwrap_or_default();
            dispatch(PageEvent::CommentInput { text });
        });
    }

    if let Some(submit) = dom::query(document, &ids.submit_button_selector) {
        dom::listen(&submit, "click", |_| dispatch(PageEvent::SubmitReview));
    }
}
