use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    HtmlInputElement, PointerEvent, Window,
};

use sightsketch_shared::color::parse_intensity;
use sightsketch_shared::sketch::{Controls, BLUR_RESTORE_DELAY_MS};
use sightsketch_shared::trial::next_route;
use sightsketch_shared::{CanvasState, Params, Point, Sketchpad, Tool};

use crate::dom::{
    canvas_geometry, client_position, enforce_square, find_element, get_element, is_touch_event,
    on, query_all, set_canvas_style, set_tool_button,
};
use crate::nav;
use crate::render::{apply_canvas_filter, redraw, update_underlay};
use crate::state::State;
use crate::util::{colour_seed, log};

pub enum SaveTarget {
    Router,
    Page(String),
}

struct DrawingUi {
    brush: HtmlInputElement,
    background: HtmlInputElement,
    thickness: HtmlInputElement,
    blur: HtmlInputElement,
    tools: Vec<(Tool, HtmlButtonElement)>,
    flip: HtmlButtonElement,
    undo: HtmlButtonElement,
    redo: HtmlButtonElement,
}

fn sync_tool_ui(state: &State, ui: &DrawingUi) {
    let canvas_state = state.pad.state();
    for (tool, button) in &ui.tools {
        set_tool_button(button, *tool == canvas_state.tool);
    }
    let _ = ui
        .flip
        .class_list()
        .toggle_with_force("active", canvas_state.flip_x);
    set_canvas_style(&state.canvas, canvas_state.tool, state.pad.is_dragging());
}

fn sync_history_ui(state: &State, ui: &DrawingUi) {
    ui.undo.set_disabled(!state.pad.can_undo());
    ui.redo.set_disabled(!state.pad.can_redo());
}

fn sync_controls(state: &State, ui: &DrawingUi) {
    let canvas_state = state.pad.state();
    ui.brush.set_value(&canvas_state.brush.to_string());
    ui.background.set_value(&canvas_state.background.to_string());
    ui.thickness.set_value(&canvas_state.thickness.to_string());
    ui.blur.set_value(&canvas_state.blur.to_string());
    apply_canvas_filter(&state.canvas, canvas_state.blur);
    update_underlay(state.viewport.as_ref(), canvas_state.background);
    sync_tool_ui(state, ui);
    sync_history_ui(state, ui);
}

/// Drops the blur filter while the canvas is being touched and restores it
/// once input has been quiet for a moment.
fn suspend_blur(window: &Window, handle: &Rc<RefCell<State>>, state: &mut State) {
    apply_canvas_filter(&state.canvas, 0.0);
    if let Some(timer) = state.blur_timer.take() {
        window.clear_timeout_with_handle(timer);
    }
    let restore_state = handle.clone();
    let restore = Closure::once_into_js(move || {
        let mut state = restore_state.borrow_mut();
        state.blur_timer = None;
        apply_canvas_filter(&state.canvas, state.pad.state().blur);
    });
    if let Ok(timer) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        restore.unchecked_ref(),
        BLUR_RESTORE_DELAY_MS,
    ) {
        state.blur_timer = Some(timer);
    }
}

fn to_canvas_px(state: &State, a: Point, b: Point) -> Option<(Point, Point)> {
    let geometry = canvas_geometry(&state.canvas);
    Some((
        geometry.client_to_canvas_px(a.x, a.y)?,
        geometry.client_to_canvas_px(b.x, b.y)?,
    ))
}

fn read_controls(ui: &DrawingUi) -> Controls {
    let defaults = Controls::default();
    Controls {
        thickness: ui
            .thickness
            .value()
            .trim()
            .parse()
            .unwrap_or(defaults.thickness),
        blur: ui.blur.value().trim().parse().unwrap_or(defaults.blur),
    }
}

pub fn start(
    window: &Window,
    document: &Document,
    params: &Params,
    save_target: SaveTarget,
    debug: bool,
) -> Result<(), JsValue> {
    let canvas: HtmlCanvasElement = get_element(document, "drawingCanvas")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let viewport: Option<HtmlElement> = find_element(document, "viewport");

    let mut tools = Vec::new();
    for element in query_all(document, ".tool-row button[data-tool]") {
        let Ok(button) = element.dyn_into::<HtmlButtonElement>() else {
            continue;
        };
        let name = button.get_attribute("data-tool").unwrap_or_default();
        match name.parse::<Tool>() {
            Ok(tool) => tools.push((tool, button)),
            Err(err) => web_sys::console::warn_1(&err.to_string().into()),
        }
    }

    let ui = Rc::new(DrawingUi {
        brush: get_element(document, "brushColor")?,
        background: get_element(document, "background")?,
        thickness: get_element(document, "thickness")?,
        blur: get_element(document, "blur")?,
        tools,
        flip: get_element(document, "flipH")?,
        undo: get_element(document, "undo")?,
        redo: get_element(document, "redo")?,
    });
    let swap_button: HtmlButtonElement = get_element(document, "swapColors")?;
    let clear_button: HtmlButtonElement = get_element(document, "clear")?;
    let save_button: HtmlButtonElement = get_element(document, "saveButton")?;

    let seed = colour_seed(params);
    let initial = CanvasState::seeded(&seed, read_controls(&ui));
    log(
        debug,
        &format!(
            "canvas seeded seed={seed} background={} brush={} thickness={}",
            initial.background, initial.brush, initial.thickness
        ),
    );

    let state = Rc::new(RefCell::new(State {
        canvas: canvas.clone(),
        ctx,
        viewport: viewport.clone(),
        pad: Sketchpad::new(initial),
        touch_points: BTreeMap::new(),
        active_pointer: None,
        last_move: None,
        blur_timer: None,
        debug,
    }));

    if let Some(viewport) = viewport {
        enforce_square(&viewport);
        for name in ["load", "resize", "orientationchange"] {
            let viewport = viewport.clone();
            on(window, name, move |_| enforce_square(&viewport))?;
        }
    }

    for (tool, button) in &ui.tools {
        let tool = *tool;
        let tool_state = state.clone();
        let tool_ui = ui.clone();
        on(button, "click", move |_| {
            let mut state = tool_state.borrow_mut();
            if state.pad.set_tool(tool) {
                log(state.debug, &format!("tool={tool}"));
            }
            sync_tool_ui(&state, &tool_ui);
        })?;
    }

    {
        let flip_state = state.clone();
        let flip_ui = ui.clone();
        on(&ui.flip, "click", move |_| {
            let mut state = flip_state.borrow_mut();
            let center = canvas_geometry(&state.canvas).center();
            state.pad.flip(center);
            sync_tool_ui(&state, &flip_ui);
            sync_history_ui(&state, &flip_ui);
            redraw(&state);
        })?;
    }

    {
        let swap_state = state.clone();
        let swap_ui = ui.clone();
        on(&swap_button, "click", move |_| {
            let mut state = swap_state.borrow_mut();
            state.pad.swap_colors();
            let canvas_state = state.pad.state();
            swap_ui.brush.set_value(&canvas_state.brush.to_string());
            swap_ui
                .background
                .set_value(&canvas_state.background.to_string());
            update_underlay(state.viewport.as_ref(), canvas_state.background);
            sync_history_ui(&state, &swap_ui);
            redraw(&state);
        })?;
    }

    {
        let input_state = state.clone();
        let input_ui = ui.clone();
        on(&ui.brush, "input", move |_| {
            let mut state = input_state.borrow_mut();
            let fallback = state.pad.state().brush;
            let value = parse_intensity(&input_ui.brush.value(), fallback);
            let applied = state.pad.input_brush(i32::from(value));
            if applied != value {
                input_ui.brush.set_value(&applied.to_string());
            }
            redraw(&state);
        })?;
    }

    {
        let input_state = state.clone();
        let input_ui = ui.clone();
        on(&ui.background, "input", move |_| {
            let mut state = input_state.borrow_mut();
            let fallback = state.pad.state().background;
            let value = parse_intensity(&input_ui.background.value(), fallback);
            let applied = state.pad.input_background(i32::from(value));
            if applied != value {
                input_ui.background.set_value(&applied.to_string());
            }
            update_underlay(state.viewport.as_ref(), applied);
            redraw(&state);
        })?;
    }

    {
        let input_state = state.clone();
        let input_ui = ui.clone();
        on(&ui.thickness, "input", move |_| {
            let Ok(value) = input_ui.thickness.value().trim().parse::<f64>() else {
                return;
            };
            let mut state = input_state.borrow_mut();
            state.pad.input_thickness(value);
            redraw(&state);
        })?;
    }

    {
        let input_state = state.clone();
        let input_ui = ui.clone();
        on(&ui.blur, "input", move |_| {
            let value = input_ui.blur.value().trim().parse::<f64>().unwrap_or(0.0);
            let mut state = input_state.borrow_mut();
            let blur = state.pad.input_blur(value);
            apply_canvas_filter(&state.canvas, blur);
            redraw(&state);
        })?;
    }

    for input in [&ui.brush, &ui.background, &ui.thickness, &ui.blur] {
        let change_state = state.clone();
        let change_ui = ui.clone();
        on(input, "change", move |_| {
            let mut state = change_state.borrow_mut();
            state.pad.commit_controls();
            sync_history_ui(&state, &change_ui);
        })?;
    }

    {
        let undo_state = state.clone();
        let undo_ui = ui.clone();
        on(&ui.undo, "click", move |_| {
            let mut state = undo_state.borrow_mut();
            if state.pad.undo() {
                state.release_pointer();
                sync_controls(&state, &undo_ui);
                redraw(&state);
            }
        })?;
    }

    {
        let redo_state = state.clone();
        let redo_ui = ui.clone();
        on(&ui.redo, "click", move |_| {
            let mut state = redo_state.borrow_mut();
            if state.pad.redo() {
                state.release_pointer();
                sync_controls(&state, &redo_ui);
                redraw(&state);
            }
        })?;
    }

    {
        let clear_state = state.clone();
        let clear_ui = ui.clone();
        on(&clear_button, "click", move |_| {
            let mut state = clear_state.borrow_mut();
            state.pad.clear();
            sync_history_ui(&state, &clear_ui);
            redraw(&state);
        })?;
    }

    {
        let save_window = window.clone();
        let save_params = params.clone();
        on(&save_button, "click", move |_| {
            let result = match &save_target {
                SaveTarget::Router => {
                    nav::follow(&save_window, &next_route("drawing", &save_params))
                }
                SaveTarget::Page(page) => nav::goto(&save_window, page, &save_params.to_pairs()),
            };
            if let Err(err) = result {
                web_sys::console::error_1(&err);
            }
        })?;
    }

    {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let down_window = window.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let pointer_id = event.pointer_id();
            let (x, y) = client_position(&event);
            let mut state = down_state.borrow_mut();
            if is_touch_event(&event) {
                state.touch_points.insert(pointer_id, Point::new(x, y));
                if state.touch_points.len() >= 2 && state.pad.state().tool == Tool::Move {
                    event.prevent_default();
                    if !state.pad.is_gesturing() {
                        let started = state
                            .first_two_touches()
                            .and_then(|(a, b)| to_canvas_px(&state, a, b))
                            .is_some_and(|(a, b)| state.pad.begin_gesture(a, b));
                        if started {
                            state.release_pointer();
                            log(state.debug, "gesture:start");
                            suspend_blur(&down_window, &down_state, &mut state);
                            redraw(&state);
                        }
                    }
                    let _ = down_canvas.set_pointer_capture(pointer_id);
                    return;
                }
            }
            if state.pad.is_gesturing() || state.active_pointer.is_some() || event.button() != 0 {
                return;
            }
            event.prevent_default();
            let tool = state.pad.state().tool;
            let started = if tool == Tool::Move {
                let started = state.pad.begin_drag();
                if started {
                    state.last_move = Some(Point::new(x, y));
                    set_canvas_style(&state.canvas, tool, true);
                }
                started
            } else {
                let view = state.pad.state().view;
                canvas_geometry(&state.canvas)
                    .client_to_model(&view, x, y)
                    .is_some_and(|point| state.pad.pointer_down(point))
            };
            if !started {
                return;
            }
            state.active_pointer = Some(pointer_id);
            suspend_blur(&down_window, &down_state, &mut state);
            redraw(&state);
            let _ = down_canvas.set_pointer_capture(pointer_id);
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_window = window.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let pointer_id = event.pointer_id();
            let (x, y) = client_position(&event);
            let mut state = move_state.borrow_mut();
            if let Some(touch) = state.touch_points.get_mut(&pointer_id) {
                *touch = Point::new(x, y);
            }
            if state.pad.is_gesturing() {
                event.prevent_default();
                let moved = state
                    .first_two_touches()
                    .and_then(|(a, b)| to_canvas_px(&state, a, b))
                    .is_some_and(|(a, b)| state.pad.update_gesture(a, b));
                if moved {
                    suspend_blur(&move_window, &move_state, &mut state);
                    redraw(&state);
                }
                return;
            }
            if state.active_pointer != Some(pointer_id) {
                return;
            }
            event.prevent_default();
            let changed = if state.pad.is_dragging() {
                let Some(last) = state.last_move.replace(Point::new(x, y)) else {
                    return;
                };
                canvas_geometry(&state.canvas)
                    .css_delta_to_canvas(x - last.x, y - last.y)
                    .is_some_and(|(dx, dy)| state.pad.drag_by(dx, dy))
            } else {
                let view = state.pad.state().view;
                canvas_geometry(&state.canvas)
                    .client_to_model(&view, x, y)
                    .is_some_and(|point| state.pad.pointer_move(point))
            };
            if changed {
                suspend_blur(&move_window, &move_state, &mut state);
                redraw(&state);
            }
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let stop_canvas = canvas.clone();
        let stop_ui = ui.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let pointer_id = event.pointer_id();
            if stop_canvas.has_pointer_capture(pointer_id) {
                let _ = stop_canvas.release_pointer_capture(pointer_id);
            }
            let mut state = stop_state.borrow_mut();
            state.touch_points.remove(&pointer_id);
            if state.pad.is_gesturing() {
                if state.touch_points.len() < 2 && state.pad.end_gesture() {
                    state.release_pointer();
                    log(state.debug, "gesture:end");
                    sync_history_ui(&state, &stop_ui);
                }
                return;
            }
            if state.active_pointer != Some(pointer_id) {
                return;
            }
            event.prevent_default();
            state.release_pointer();
            if state.pad.end_drag() {
                set_canvas_style(&state.canvas, Tool::Move, false);
            } else if state.pad.pointer_up() {
                log(
                    state.debug,
                    &format!("stroke committed count={}", state.pad.state().strokes.len()),
                );
                redraw(&state);
            }
            sync_history_ui(&state, &stop_ui);
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    {
        let state_ref = state.borrow();
        let canvas_state = state_ref.pad.state();
        ui.brush.set_value(&canvas_state.brush.to_string());
        ui.background.set_value(&canvas_state.background.to_string());
        ui.thickness.set_value(&canvas_state.thickness.to_string());
        apply_canvas_filter(&state_ref.canvas, canvas_state.blur);
        update_underlay(state_ref.viewport.as_ref(), canvas_state.background);
        sync_tool_ui(&state_ref, &ui);
        sync_history_ui(&state_ref, &ui);
        redraw(&state_ref);
    }

    Ok(())
}
