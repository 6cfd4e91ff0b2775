use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, Window};

use sightsketch_shared::footer::dev_footer_html;
use sightsketch_shared::trial::{
    back_route, next_route, next_trial_message, placeholder_payload, Page,
};
use sightsketch_shared::Params;

use crate::dom::{body_data, find_element, on, set_text, set_visible};
use crate::nav;
use crate::util::send_event_simulated;

pub fn bind_nav(
    window: &Window,
    document: &Document,
    page: &str,
    params: &Params,
) -> Result<(), JsValue> {
    if let Some(back) = find_element::<HtmlElement>(document, "backBtn") {
        let window = window.clone();
        let page = page.to_string();
        let params = params.clone();
        on(&back, "click", move |_| {
            if let Err(err) = nav::follow(&window, &back_route(&page, &params)) {
                web_sys::console::error_1(&err);
            }
        })?;
    }
    if let Some(next) = find_element::<HtmlElement>(document, "nextBtn") {
        let window = window.clone();
        let page = page.to_string();
        let params = params.clone();
        on(&next, "click", move |_| {
            if let Err(err) = nav::follow(&window, &next_route(&page, &params)) {
                web_sys::console::error_1(&err);
            }
        })?;
    }
    if let Some(restart) = find_element::<HtmlElement>(document, "restartBtn") {
        let window = window.clone();
        let params = params.clone();
        on(&restart, "click", move |event: Event| {
            event.prevent_default();
            let page = Page::ParamCheck.file_name();
            if let Err(err) = nav::goto(&window, &page, &params.to_pairs()) {
                web_sys::console::error_1(&err);
            }
        })?;
    }
    Ok(())
}

pub fn setup_nav_visibility(document: &Document, params: &Params, allow_back: bool) {
    if let Some(back) = find_element::<HtmlElement>(document, "backBtn") {
        set_visible(&back, params.is_dev() || allow_back);
    }
}

pub fn render_dev_footer(
    window: &Window,
    document: &Document,
    params: &Params,
    last_message: &str,
) -> Result<(), JsValue> {
    if !params.is_dev() {
        return Ok(());
    }
    let footer = document.create_element("div")?;
    footer.set_class_name("dev");
    footer.set_inner_html(&dev_footer_html(params, &nav::query_string(window), last_message));
    let parent = match document.query_selector(".inner")? {
        Some(inner) => inner,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("Missing body"))?
            .into(),
    };
    parent.append_child(&footer)?;
    Ok(())
}

fn fill_placeholders(document: &Document, params: &Params) {
    let payload = placeholder_payload(params);
    set_text(document, "trialText", &payload.trial_text);
    set_text(document, "blockNum", &payload.block_num.to_string());
    set_text(document, "typeLabel", &payload.type_label);
    set_text(document, "trialIndex", &payload.index.to_string());
    set_text(document, "totalInBlock", &payload.total_in_block.to_string());
    set_text(document, "nextTrialMessage", &next_trial_message(params));
}

pub fn start(
    window: &Window,
    document: &Document,
    page: &str,
    params: &Params,
) -> Result<(), JsValue> {
    bind_nav(window, document, page, params)?;
    setup_nav_visibility(document, params, body_data(document, "allow-back") != "false");
    fill_placeholders(document, params);
    let event = body_data(document, "event");
    let last_message = if event.is_empty() {
        String::new()
    } else {
        send_event_simulated(&event)
    };
    render_dev_footer(window, document, params, &last_message)
}
