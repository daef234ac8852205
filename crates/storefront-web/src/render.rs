//! Diff two [`PageView`]s into DOM operations.
//!
//! The planner is pure: it knows element ids and class names from
//! [`ElementIds`] but never touches the DOM, so it is tested natively. The
//! wasm side walks the returned ops in order and applies each one.

use storefront_core::{ElementIds, PageView, SearchWidget};

/// How an op finds its element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Id(String),
    /// First match of a CSS selector.
    Selector(String),
}

/// One DOM mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomOp {
    /// Set `.value` of an input or textarea.
    SetValue { target: Target, value: String },
    /// Set `style.display`.
    SetDisplay {
        target: Target,
        display: &'static str,
    },
    /// Rebuild a suggestion panel's rows.
    ReplaceSuggestions { target: Target, rows: Vec<String> },
    /// Revert the first element carrying `selected` to `unselected`.
    ResetSelected {
        selected: String,
        unselected: String,
    },
    SetClassName { target: Target, class: String },
    SetBackgroundImage { target: Target, url: String },
    SetText { target: Target, text: String },
    /// Fill the first `filled` stars matched by `selector`.
    FillStars { selector: String, filled: u8 },
    /// Set `document.body.style.overflow`.
    SetBodyOverflow(&'static str),
    SetDisabled { target: Target, disabled: bool },
}

fn input_id(ids: &ElementIds, widget: SearchWidget) -> &str {
    match widget {
        SearchWidget::Desktop => &ids.search_input_desktop,
        SearchWidget::Mobile => &ids.search_input_mobile,
    }
}

fn wrapper_id(ids: &ElementIds, widget: SearchWidget) -> &str {
    match widget {
        SearchWidget::Desktop => &ids.autocomplete_wrapper_desktop,
        SearchWidget::Mobile => &ids.autocomplete_wrapper_mobile,
    }
}

fn id(value: &str) -> Target {
    Target::Id(value.to_owned())
}

fn selector(value: &str) -> Target {
    Target::Selector(value.to_owned())
}

/// Operations that turn a page showing `prev` into one showing `next`.
#[must_use]
pub fn plan(prev: &PageView, next: &PageView, ids: &ElementIds) -> Vec<DomOp> {
    let mut ops = Vec::new();
    plan_search(prev, next, ids, &mut ops);
    plan_tabs(prev, next, ids, &mut ops);
    plan_modal(prev, next, ids, &mut ops);
    ops
}

fn plan_search(prev: &PageView, next: &PageView, ids: &ElementIds, ops: &mut Vec<DomOp>) {
    for widget in SearchWidget::ALL {
        let value = next.inputs.value(widget);
        if prev.inputs.value(widget) != value {
            ops.push(DomOp::SetValue {
                target: id(input_id(ids, widget)),
                value: value.to_owned(),
            });
        }

        let (was, now) = (prev.panel(widget), next.panel(widget));
        if was.suggestions != now.suggestions {
            ops.push(DomOp::ReplaceSuggestions {
                target: id(wrapper_id(ids, widget)),
                rows: now.suggestions.iter().map(|s| s.text.clone()).collect(),
            });
        }
        if was.visible != now.visible {
            ops.push(DomOp::SetDisplay {
                target: id(wrapper_id(ids, widget)),
                display: if now.visible { "block" } else { "none" },
            });
        }
    }
}

fn plan_tabs(prev: &PageView, next: &PageView, ids: &ElementIds, ops: &mut Vec<DomOp>) {
    let Some(tab) = next.active_tab.as_ref() else {
        return;
    };
    if prev.active_tab.as_ref() == Some(tab) {
        return;
    }
    // Markup may ship with a pre-selected pair; reset whatever carries the class.
    ops.push(DomOp::ResetSelected {
        selected: ids.selected_tab_class.clone(),
        unselected: ids.unselected_tab_class.clone(),
    });
    ops.push(DomOp::ResetSelected {
        selected: ids.selected_trigger_class.clone(),
        unselected: ids.unselected_trigger_class.clone(),
    });
    ops.push(DomOp::SetClassName {
        target: Target::Id(tab.trigger_id_with(&ids.tab_trigger_prefix)),
        class: ids.selected_trigger_class.clone(),
    });
    ops.push(DomOp::SetClassName {
        target: id(tab.as_str()),
        class: ids.selected_tab_class.clone(),
    });
}

fn plan_modal(prev: &PageView, next: &PageView, ids: &ElementIds, ops: &mut Vec<DomOp>) {
    let (was, now) = (&prev.modal, &next.modal);

    if was.product_image != now.product_image {
        ops.push(DomOp::SetBackgroundImage {
            target: selector(&ids.modal_product_image_selector),
            url: now.product_image.clone(),
        });
    }
    if was.product_name != now.product_name {
        ops.push(DomOp::SetText {
            target: selector(&ids.modal_product_name_selector),
            text: now.product_name.clone(),
        });
    }
    if was.filled_stars != now.filled_stars {
        ops.push(DomOp::FillStars {
            selector: ids.star_selector.clone(),
            filled: now.filled_stars,
        });
    }
    if was.rating_field != now.rating_field {
        ops.push(DomOp::SetValue {
            target: id(&ids.selected_rating_input),
            value: now.rating_field.clone(),
        });
    }
    if was.comment != now.comment {
        ops.push(DomOp::SetValue {
            target: id(&ids.review_comment),
            value: now.comment.clone(),
        });
    }
    if was.submitting != now.submitting {
        ops.push(DomOp::SetDisabled {
            target: selector(&ids.submit_button_selector),
            disabled: now.submitting,
        });
    }
    if was.open != now.open {
        ops.push(DomOp::SetDisplay {
            target: id(&ids.review_overlay),
            display: if now.open { "flex" } else { "none" },
        });
    }
    if was.scroll_locked != now.scroll_locked {
        ops.push(DomOp::SetBodyOverflow(if now.scroll_locked {
            "hidden"
        } else {
            ""
        }));
    }
}

/// CSS `background-image` value for a product image URL.
#[must_use]
pub fn css_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    format!("url(\"{}\")", url.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Star value from its `data-value` attribute, or its 1-based position.
#[must_use]
pub fn star_value(data_value: Option<&str>, index: usize) -> u8 {
    data_value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_else(|| u8::try_from(index + 1).unwrap_or(u8::MAX))
}
