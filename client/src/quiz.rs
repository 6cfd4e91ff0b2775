use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlImageElement, KeyboardEvent, Storage, Window};

use sightsketch_shared::quiz::{BackStep, QuizSession, QuizStep, Side, NEXT_PAGE, RAND_LEFT_KEY};
use sightsketch_shared::Params;

use crate::dom::{get_element, on, set_visible};
use crate::nav;
use crate::util::{coin_flip, log};

struct QuizUi {
    left: HtmlImageElement,
    right: HtmlImageElement,
    message: HtmlElement,
    next: HtmlElement,
    counter: HtmlElement,
    title: HtmlElement,
    text: HtmlElement,
    stimulus: HtmlImageElement,
}

fn session_storage(window: &Window) -> Option<Storage> {
    window.session_storage().ok().flatten()
}

fn load_sides(storage: Option<&Storage>) -> Option<Vec<bool>> {
    let raw = storage?.get_item(RAND_LEFT_KEY).ok().flatten()?;
    serde_json::from_str(&raw).ok()
}

fn store_sides(storage: Option<&Storage>, sides: &[bool]) {
    let Some(storage) = storage else {
        return;
    };
    if let Ok(raw) = serde_json::to_string(sides) {
        let _ = storage.set_item(RAND_LEFT_KEY, &raw);
    }
}

fn paint(session: &QuizSession, ui: &QuizUi) {
    let (Some(item), Some(view)) = (session.current(), session.view()) else {
        return;
    };
    ui.title.set_inner_html(&item.title_html());
    ui.counter.set_text_content(Some(&view.counter));
    ui.text.set_inner_html(&item.body_html());
    ui.stimulus.set_src(&item.guideline.stimulus_src());
    ui.left.set_src(&view.left_src);
    ui.right.set_src(&view.right_src);
    let _ = ui.left.style().set_property("border-color", view.left_border);
    let _ = ui.right.style().set_property("border-color", view.right_border);
    ui.message.set_text_content(Some(&view.message));
    set_visible(&ui.next, view.next_visible);
}

fn pick(session: &Rc<RefCell<QuizSession>>, ui: &QuizUi, side: Side, debug: bool) {
    let mut session = session.borrow_mut();
    if session.pick(side) {
        log(
            debug,
            &format!(
                "quiz pick index={} side={side:?} passed={}",
                session.index(),
                session.is_passed(session.index())
            ),
        );
        paint(&session, ui);
    }
}

pub fn start(
    window: &Window,
    document: &Document,
    params: &Params,
    debug: bool,
) -> Result<(), JsValue> {
    let ui = Rc::new(QuizUi {
        left: get_element(document, "xImgLeft")?,
        right: get_element(document, "xImgRight")?,
        message: get_element(document, "xMessageBox")?,
        next: get_element(document, "xNextButton")?,
        counter: get_element(document, "xQuestionCounter")?,
        title: get_element(document, "xGuidelineTitle")?,
        text: get_element(document, "xGuidelineText")?,
        stimulus: get_element(document, "xStimulusImg")?,
    });
    let back: HtmlElement = get_element(document, "xBackButton")?;

    for image in [&ui.left, &ui.right] {
        let _ = image.set_attribute("draggable", "false");
        let _ = image.set_attribute("role", "button");
        let _ = image.set_attribute("tabindex", "0");
        let _ = image.style().set_property("user-select", "none");
    }

    let storage = session_storage(window);
    let stored = load_sides(storage.as_ref());
    let stored_len = stored.as_ref().map(Vec::len);
    let session = QuizSession::new(stored, coin_flip);
    if session.is_empty() {
        return Ok(());
    }
    if stored_len != Some(session.len()) {
        store_sides(storage.as_ref(), session.rand_left());
    }
    log(debug, &format!("quiz start questions={}", session.len()));
    let session = Rc::new(RefCell::new(session));

    for (image, side) in [(&ui.left, Side::Left), (&ui.right, Side::Right)] {
        {
            let session = session.clone();
            let click_ui = ui.clone();
            on(image, "click", move |_| pick(&session, &click_ui, side, debug))?;
        }
        {
            let session = session.clone();
            let key_ui = ui.clone();
            on(image, "keydown", move |event| {
                let Ok(event) = event.dyn_into::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                if key == "Enter" || key == " " {
                    event.prevent_default();
                    pick(&session, &key_ui, side, debug);
                }
            })?;
        }
    }

    {
        let session = session.clone();
        let back_ui = ui.clone();
        let back_window = window.clone();
        on(&back, "click", move |_| {
            let step = session.borrow_mut().back();
            match step {
                BackStep::Question(_) => paint(&session.borrow(), &back_ui),
                BackStep::HistoryBack => {
                    let Ok(history) = back_window.history() else {
                        return;
                    };
                    if history.length().unwrap_or(0) > 1 {
                        let _ = history.back();
                    }
                }
            }
        })?;
    }

    {
        let session = session.clone();
        let next_ui = ui.clone();
        let next_window = window.clone();
        let params = params.clone();
        on(&ui.next, "click", move |_| {
            let step = session.borrow_mut().next();
            match step {
                QuizStep::Question(_) => paint(&session.borrow(), &next_ui),
                QuizStep::Finish => {
                    if let Err(err) = nav::goto(&next_window, NEXT_PAGE, &params.base_pairs()) {
                        web_sys::console::error_1(&err);
                    }
                }
                QuizStep::Stay => {}
            }
        })?;
    }

    paint(&session.borrow(), &ui);
    Ok(())
}
