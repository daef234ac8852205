#![forbid(unsafe_code)]

//! Thin DOM helpers and the [`DomOp`] applier. Only compiled on `wasm32`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
};

use crate::render::{DomOp, Target, css_url};

const ROW_CLASS: &str = "autocomplete-suggestion";
const ROW_TEXT_CLASS: &str = "search-suggestion-text";
const ROW_ICON_CLASS: &str = "bi bi-search";
/// Attribute carrying a row's position in its panel.
pub const ROW_INDEX_ATTR: &str = "data-index";

pub fn by_id(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn find(document: &Document, target: &Target) -> Option<Element> {
    match target {
        Target::Id(id) => by_id(document, id),
        Target::Selector(selector) => query(document, selector),
    }
}

/// Text of the first descendant of `root` matching `selector`.
pub fn child_text(root: &Element, selector: &str) -> Option<String> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.text_content())
}

/// Inline style property of the first descendant of `root` matching
/// `selector`.
pub fn child_style(root: &Element, selector: &str, property: &str) -> Option<String> {
    let el = root.query_selector(selector).ok().flatten()?;
    let el = el.dyn_into::<HtmlElement>().ok()?;
    el.style().get_property_value(property).ok()
}

/// Current `.value` of an input or textarea.
pub fn value_of(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    el.dyn_ref::<HtmlTextAreaElement>().map(HtmlTextAreaElement::value)
}

/// Element an event was dispatched to.
pub fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

/// Attach a listener for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let callback = closure.as_ref().unchecked_ref();
    if let Err(err) = target.add_event_listener_with_callback(event, callback) {
        tracing::error!(event, ?err, "failed to attach listener");
        return;
    }
    closure.forget();
}

fn set_value(el: &Element, value: &str) {
    // Skip identical writes so the caret stays where the user left it.
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        if input.value() != value {
            input.set_value(value);
        }
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        if area.value() != value {
            area.set_value(value);
        }
    }
}

fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>()
        && let Err(err) = html.style().set_property(property, value)
    {
        tracing::warn!(property, ?err, "style update failed");
    }
}

fn suggestion_row(document: &Document, index: usize, text: &str) -> Result<Element, JsValue> {
    let row = document.create_element("p")?;
    row.set_class_name(ROW_CLASS);
    row.set_attribute(ROW_INDEX_ATTR, &index.to_string())?;

    let icon = document.create_element("i")?;
    icon.set_class_name(ROW_ICON_CLASS);
    row.append_child(&icon)?;
    row.append_child(&document.create_text_node(" "))?;

    let label = document.create_element("span")?;
    label.set_class_name(ROW_TEXT_CLASS);
    label.set_text_content(Some(text));
    row.append_child(&label)?;
    Ok(row)
}

fn fill_stars(document: &Document, selector: &str, filled: u8) {
    for (i, star) in query_all(document, selector).into_iter().enumerate() {
        let value = crate::render::star_value(star.get_attribute("data-value").as_deref(), i);
        let classes = star.class_list();
        let (on, off) = if value <= filled {
            ("bi-star-fill", "bi-star")
        } else {
            ("bi-star", "bi-star-fill")
        };
        let _ = classes.remove_1(off);
        let _ = classes.add_1(on);
    }
}

/// Apply `ops` in order. Missing elements are skipped with a warning.
pub fn apply(document: &Document, ops: &[DomOp]) {
    for op in ops {
        if let Err(err) = apply_one(document, op) {
            tracing::warn!(?op, ?err, "DOM update failed");
        }
    }
}

fn apply_one(document: &Document, op: &DomOp) -> Result<(), JsValue> {
    let missing = |target: &Target| JsValue::from_str(&format!("element not found: {target:?}"));
    match op {
        DomOp::SetValue { target, value } => {
            let el = find(document, target).ok_or_else(|| missing(target))?;
            set_value(&el, value);
        }
        DomOp::SetDisplay { target, display } => {
            let el = find(document, target).ok_or_else(|| missing(target))?;
            set_style(&el, "display", display);
        }
        DomOp::ReplaceSuggestions { target, rows } => {
            let el = find(document, target).ok_or_else(|| missing(target))?;
            el.set_text_content(None);
            for (index, text) in rows.iter().enumerate() {
                el.append_child(&suggestion_row(document, index, text)?)?;
            }
        }
        DomOp::ResetSelected {
            selected,
            unselected,
        } => {
            if let Some(el) = document.get_elements_by_class_name(selected).item(0) {
                el.set_class_name(unselected);
            }
        }
        DomOp::SetClassName { target, class } => {
            let el = find(document, target).ok_or_else(|| missing(target))?;
            el.set_class_name(class);
        }
        DomOp::SetBackgroundImage { target, url } => {
            let el = find(document, target).ok_or_else(|| missing(target))?;
            set_style(&el, "background-image", &css_url(url));
        }
        DomOp::SetText { target, text } => {
            let el = find(document, target).ok_or_else(|| missing(target))?;
            el.set_text_content(Some(text));
        }
        DomOp::FillStars { selector, filled } => fill_stars(document, selector, *filled),
        DomOp::SetBodyOverflow(value) => {
            if let Some(body) = document.body() {
                body.style().set_property("overflow", value)?;
            }
        }
        DomOp::SetDisabled { target, disabled } => {
            let el = find(document, target).ok_or_else(|| missing(target))?;
            if *disabled {
                el.set_attribute("disabled", "")?;
            } else {
                el.remove_attribute("disabled")?;
            }
        }
    }
    Ok(())
}
