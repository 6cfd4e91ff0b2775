use std::cell::Cell;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use crate::dom::{body_data, on};
use crate::drawing::{self, SaveTarget};
use crate::nav::{debug_enabled, read_params};
use crate::{pages, quiz, stimulus, tutorial};

const DEFAULT_NEXT_PAGE: &str = "nextpage.html";

fn document_ready_state(document: &Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() == Some("complete") {
        started.set(true);
        return start_app(&window, &document);
    }

    let onload_window = window.clone();
    on(&window, "load", move |_| {
        if started.replace(true) {
            return;
        }
        if let Err(err) = start_app(&onload_window, &document) {
            web_sys::console::error_1(&err);
        }
    })
}

fn start_app(window: &Window, document: &Document) -> Result<(), JsValue> {
    let debug = debug_enabled(window);
    let params = read_params(window);
    let page = body_data(document, "page");
    if debug {
        let href = window.location().href().ok().unwrap_or_default();
        web_sys::console::log_1(
            &format!("debug enabled page={page:?} href={href} params={params:?}").into(),
        );
    }

    match page.as_str() {
        "drawing" => drawing::start(window, document, &params, SaveTarget::Router, debug),
        "practice-draw" | "interface-demo" => {
            let next = body_data(document, "next");
            let next = if next.is_empty() {
                DEFAULT_NEXT_PAGE.to_string()
            } else {
                next
            };
            drawing::start(window, document, &params, SaveTarget::Page(next), debug)?;
            tutorial::start(window, document)
        }
        "image-stim-practice" => stimulus::start(window, document, &params, debug),
        "quiz" => quiz::start(window, document, &params, debug),
        "" => {
            web_sys::console::warn_1(&"page has no data-page attribute".into());
            Ok(())
        }
        other => pages::start(window, document, other, &params),
    }
}
