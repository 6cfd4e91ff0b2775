use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Window};

use sightsketch_shared::footer::escape_html;
use sightsketch_shared::stimulus::{
    config_error_message, fixation_outcome, practice, FixationOutcome, PracticeStimulus, Preload,
    END_AT_MS, FADE_AT_MS, FIXATION_ALT, FIXATION_SRC, POLL_MS,
};
use sightsketch_shared::Params;

use crate::dom::{body_data, find_element, get_element, on, set_visible};
use crate::nav;
use crate::pages;
use crate::util::log;

fn ready_html() -> &'static str {
    r#"<div class="center-wrap stage1-wrap"><div class="button-bar"><button id="startStimBtn" class="primary">click here when you are ready to see the image</button></div></div>"#
}

fn fixation_html() -> String {
    format!(
        r#"<div class="center-wrap"><div class="stimulus-box"><img id="fixImg" src="{FIXATION_SRC}" alt="{}" /></div></div>"#,
        escape_html(FIXATION_ALT)
    )
}

fn stimulus_html(stim: &PracticeStimulus) -> String {
    format!(
        r#"<div class="center-wrap"><div class="stimulus-box"><img id="stimImg" src="{}" alt="{}" /></div></div>"#,
        escape_html(stim.image_src),
        escape_html(stim.image_alt)
    )
}

fn begin_drawing_html() -> &'static str {
    r#"<div class="post-wrap"><div class="button-bar"><button id="beginDrawBtn" class="primary">Begin drawing</button></div></div>"#
}

fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn preload(src: &str) -> Result<Rc<Cell<Preload>>, JsValue> {
    let status = Rc::new(Cell::new(Preload::Pending));
    let image = HtmlImageElement::new()?;
    {
        let status = status.clone();
        on(&image, "load", move |_| status.set(Preload::Ready))?;
    }
    {
        let status = status.clone();
        let src = src.to_string();
        on(&image, "error", move |_| {
            web_sys::console::warn_1(&format!("image failed to load: {src}").into());
            status.set(Preload::Failed);
        })?;
    }
    image.set_src(src);
    Ok(status)
}

fn show_begin_drawing(
    window: &Window,
    document: &Document,
    root: &Element,
    stim: &'static PracticeStimulus,
) -> Result<(), JsValue> {
    root.set_inner_html(begin_drawing_html());
    let button: HtmlElement = get_element(document, "beginDrawBtn")?;
    let window = window.clone();
    on(&button, "click", move |_| {
        let query = nav::query_string(&window);
        let href = if query.is_empty() {
            stim.draw_page.to_string()
        } else {
            format!("{}?{query}", stim.draw_page)
        };
        if let Err(err) = window.location().set_href(&href) {
            web_sys::console::error_1(&err);
        }
    })
}

fn show_stimulus(
    window: &Window,
    document: &Document,
    root: &Element,
    stim: &'static PracticeStimulus,
) -> Result<(), JsValue> {
    root.set_inner_html(&stimulus_html(stim));
    let timers = Rc::new(RefCell::new(Vec::new()));

    let fade_document = document.clone();
    let fade = Closure::once_into_js(move || {
        if let Some(image) = find_element::<HtmlElement>(&fade_document, "stimImg") {
            let _ = image.style().set_property("opacity", "0");
        }
    });
    let fade_timer = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(fade.unchecked_ref(), FADE_AT_MS)?;
    timers.borrow_mut().push(fade_timer);

    let end_window = window.clone();
    let end_document = document.clone();
    let end_root = root.clone();
    let end = Closure::once_into_js(move || {
        if let Err(err) = show_begin_drawing(&end_window, &end_document, &end_root, stim) {
            web_sys::console::error_1(&err);
        }
    });
    let end_timer = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(end.unchecked_ref(), END_AT_MS)?;
    timers.borrow_mut().push(end_timer);

    let cleanup_window = window.clone();
    on(window, "beforeunload", move |_| {
        for timer in timers.borrow_mut().drain(..) {
            cleanup_window.clear_timeout_with_handle(timer);
        }
    })
}

fn run_fixation(
    window: &Window,
    document: &Document,
    root: &Element,
    stim: &'static PracticeStimulus,
    status: Rc<Cell<Preload>>,
    debug: bool,
) -> Result<(), JsValue> {
    root.set_inner_html(&fixation_html());
    let started = now_ms(window);
    let interval = Rc::new(Cell::new(None::<i32>));

    let poll_window = window.clone();
    let poll_document = document.clone();
    let poll_root = root.clone();
    let poll_interval = interval.clone();
    let poll = Closure::<dyn FnMut()>::new(move || {
        let elapsed = now_ms(&poll_window) - started;
        let outcome = fixation_outcome(status.get(), elapsed);
        if outcome == FixationOutcome::Wait {
            return;
        }
        if let Some(handle) = poll_interval.take() {
            poll_window.clear_interval_with_handle(handle);
        }
        log(debug, &format!("fixation done outcome={outcome:?} elapsed={elapsed:.0}"));
        let result = match outcome {
            FixationOutcome::SkipToDrawing => {
                show_begin_drawing(&poll_window, &poll_document, &poll_root, stim)
            }
            _ => show_stimulus(&poll_window, &poll_document, &poll_root, stim),
        };
        if let Err(err) = result {
            web_sys::console::error_1(&err);
        }
    });
    let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
        poll.as_ref().unchecked_ref(),
        POLL_MS,
    )?;
    interval.set(Some(handle));
    poll.forget();
    Ok(())
}

pub fn start(
    window: &Window,
    document: &Document,
    params: &Params,
    debug: bool,
) -> Result<(), JsValue> {
    let key = body_data(document, "practice").to_ascii_lowercase();
    let root: Element = get_element(document, "root")?;

    pages::bind_nav(window, document, "image-stim-practice", params)?;
    for id in ["backBtn", "nextBtn"] {
        if let Some(button) = find_element::<HtmlElement>(document, id) {
            set_visible(&button, params.is_dev());
        }
    }

    let Some(stim) = practice(&key) else {
        root.set_inner_html(&format!(
            r#"<div class="center-wrap"><p>{}</p></div>"#,
            escape_html(&config_error_message(&key))
        ));
        return Ok(());
    };

    let status = preload(stim.image_src)?;
    root.set_inner_html(ready_html());
    pages::render_dev_footer(window, document, params, &format!("practice={key}"))?;

    let start_button: HtmlElement = get_element(document, "startStimBtn")?;
    let start_window = window.clone();
    let start_document = document.clone();
    let start_root = root.clone();
    let started = Rc::new(Cell::new(false));
    on(&start_button, "click", move |_| {
        if started.replace(true) {
            return;
        }
        let result = run_fixation(
            &start_window,
            &start_document,
            &start_root,
            stim,
            status.clone(),
            debug,
        );
        if let Err(err) = result {
            web_sys::console::error_1(&err);
        }
    })
}
