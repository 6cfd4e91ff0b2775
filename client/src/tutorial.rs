use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, Window};

use sightsketch_shared::tutorial::{Tutorial, TutorialStep, MASK_ALL};

use crate::dom::{get_element, on, query_all};

fn is_button(element: &Element) -> bool {
    element.tag_name().eq_ignore_ascii_case("button")
        || element.get_attribute("role").as_deref() == Some("button")
}

fn set_masked(document: &Document, selector: &str, masked: bool) {
    for element in query_all(document, selector) {
        let _ = element
            .class_list()
            .toggle_with_force("demo-disabled", masked);
        if masked {
            let _ = element.set_attribute("aria-disabled", "true");
        } else {
            let _ = element.remove_attribute("aria-disabled");
        }
        if is_button(&element) {
            if let Ok(element) = element.dyn_into::<HtmlElement>() {
                element.set_tab_index(if masked { -1 } else { 0 });
            }
        }
    }
}

fn set_display(element: &HtmlElement, display: &str) {
    let _ = element.style().set_property("display", display);
}

struct Overlay {
    root: HtmlElement,
    title: HtmlElement,
    body: HtmlElement,
    next_bar: HtmlElement,
}

impl Overlay {
    fn show(&self, step: &TutorialStep) {
        self.title.set_text_content(Some(step.title));
        self.body.set_text_content(Some(step.body));
        set_display(&self.root, "flex");
    }
}

pub fn start(window: &Window, document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id("tutorialOverlay").is_none() {
        return Ok(());
    }
    let overlay = Rc::new(Overlay {
        root: get_element(document, "tutorialOverlay")?,
        title: get_element(document, "tutorialTitle")?,
        body: get_element(document, "tutorialBody")?,
        next_bar: get_element(document, "tutorialNext")?,
    });
    let try_button: HtmlElement = get_element(document, "tutorialTry")?;
    let next_button: HtmlElement = get_element(document, "tutorialNextBtn")?;

    for selector in MASK_ALL {
        set_masked(document, selector, true);
    }
    let tutorial = Rc::new(RefCell::new(Tutorial::default()));
    overlay.show(tutorial.borrow().current());

    {
        let overlay = overlay.clone();
        let tutorial = tutorial.clone();
        on(&try_button, "click", move |_| {
            set_display(&overlay.root, "none");
            if tutorial.borrow().next_available() {
                set_display(&overlay.next_bar, "block");
            }
        })?;
    }

    {
        let overlay = overlay.clone();
        let document = document.clone();
        on(&next_button, "click", move |_| {
            let mut tutorial = tutorial.borrow_mut();
            let step = tutorial.advance();
            for selector in step.enable {
                set_masked(&document, selector, false);
            }
            if !tutorial.next_available() {
                set_display(&overlay.next_bar, "none");
            }
            overlay.show(step);
        })?;
    }

    on(window, "keydown", move |event| {
        let Ok(event) = event.dyn_into::<KeyboardEvent>() else {
            return;
        };
        if event.key() == "Escape" {
            set_display(&overlay.root, "flex");
        }
    })?;

    Ok(())
}
