use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    PointerEvent,
};

use sightsketch_shared::sketch::canvas_style;
use sightsketch_shared::{CanvasGeometry, Tool};

/// Attaches `handler` for the lifetime of the page.
pub fn on(
    target: &EventTarget,
    name: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn find_element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_tool_button(button: &HtmlButtonElement, active: bool) {
    let pressed = if active { "true" } else { "false" };
    let _ = button.set_attribute("aria-pressed", pressed);
    let _ = button.class_list().toggle_with_force("selected", active);
}

pub fn set_canvas_style(canvas: &HtmlCanvasElement, tool: Tool, dragging: bool) {
    let style = canvas.style();
    for (name, value) in canvas_style(tool, dragging) {
        let _ = style.set_property(name, value);
    }
}

pub fn set_visible(element: &HtmlElement, visible: bool) {
    let display = if visible { "" } else { "none" };
    let _ = element.style().set_property("display", display);
}

pub fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(element) = document.get_element_by_id(id) {
        element.set_text_content(Some(text));
    }
}

pub fn enforce_square(viewport: &HtmlElement) {
    let width = viewport.offset_width();
    let style = viewport.style();
    let _ = style.set_property("height", &format!("{width}px"));
    let _ = style.set_property("padding-top", "0");
}

pub fn canvas_geometry(canvas: &HtmlCanvasElement) -> CanvasGeometry {
    let rect = canvas.get_bounding_client_rect();
    CanvasGeometry {
        left: rect.left(),
        top: rect.top(),
        css_width: rect.width(),
        css_height: rect.height(),
        pixel_width: f64::from(canvas.width()),
        pixel_height: f64::from(canvas.height()),
    }
}

pub fn client_position(event: &PointerEvent) -> (f64, f64) {
    (event.client_x() as f64, event.client_y() as f64)
}

pub fn is_touch_event(event: &PointerEvent) -> bool {
    event.pointer_type() == "touch"
}

pub fn body_data(document: &Document, name: &str) -> String {
    document
        .body()
        .and_then(|body| body.get_attribute(&format!("data-{name}")))
        .unwrap_or_default()
}
