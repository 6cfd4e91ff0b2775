use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::affine::Affine;
use crate::color::{self, MIN_COLOR_DISTANCE};
use crate::gesture::{drag_view, TwoFingerGesture};
use crate::history::History;
use crate::seed::SeededRng;
use crate::{normalize_point, ParseError, Point, Stroke};

pub const MIN_THICKNESS: f64 = 1.0;
pub const MAX_THICKNESS: f64 = 40.0;
pub const MAX_INITIAL_THICKNESS: f64 = 20.0;
pub const BLUR_RESTORE_DELAY_MS: i32 = 140;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Draw,
    Erase,
    Move,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Draw, Tool::Erase, Tool::Move];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Draw => "draw",
            Tool::Erase => "erase",
            Tool::Move => "move",
        }
    }

    pub fn captures_strokes(self) -> bool {
        matches!(self, Tool::Draw | Tool::Erase)
    }
}

/// Inline style the canvas carries for `tool`. `touch-action: none` keeps the
/// browser from claiming touches for its own pan and pinch-zoom.
pub fn canvas_style(tool: Tool, dragging: bool) -> [(&'static str, &'static str); 2] {
    let cursor = match tool {
        Tool::Move if dragging => "grabbing",
        Tool::Move => "grab",
        Tool::Erase => "cell",
        Tool::Draw => "crosshair",
    };
    [("cursor", cursor), ("touch-action", "none")]
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "draw" => Ok(Tool::Draw),
            "erase" => Ok(Tool::Erase),
            "move" => Ok(Tool::Move),
            other => Err(ParseError::UnknownTool(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    pub thickness: f64,
    pub blur: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            thickness: 4.0,
            blur: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CanvasState {
    pub tool: Tool,
    pub brush: u8,
    pub background: u8,
    pub thickness: f64,
    pub blur: f64,
    pub flip_x: bool,
    pub view: Affine,
    pub strokes: Vec<Stroke>,
}

impl CanvasState {
    pub fn seeded(seed: &str, controls: Controls) -> Self {
        let (background, brush) = color::seeded_colors(&mut SeededRng::from_seed(seed));
        Self {
            tool: Tool::Draw,
            brush,
            background,
            thickness: sanitize_thickness(controls.thickness, MAX_INITIAL_THICKNESS),
            blur: sanitize_blur(controls.blur),
            flip_x: false,
            view: Affine::IDENTITY,
            strokes: Vec::new(),
        }
    }

    /// Grey level a stroke paints with right now. Nothing is baked into the
    /// stroke, so a background change also repaints every erase stroke.
    pub fn stroke_gray(&self, stroke: &Stroke) -> u8 {
        if stroke.erase {
            self.background
        } else {
            self.brush
        }
    }

    pub fn background_padding(&self) -> f64 {
        (self.blur.trunc() * 2.0).max(0.0)
    }
}

fn sanitize_thickness(value: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return MIN_THICKNESS;
    }
    value.clamp(MIN_THICKNESS, max)
}

fn sanitize_blur(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.max(0.0)
}

#[derive(Clone, Debug, PartialEq)]
enum Interaction {
    Idle,
    Stroke { erase: bool, points: Vec<Point> },
    Drag,
    Gesture(TwoFingerGesture),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintPath<'a> {
    pub points: &'a [Point],
    pub gray: u8,
    pub width: f64,
}

#[derive(Clone, Debug)]
pub struct Sketchpad {
    state: CanvasState,
    history: History<CanvasState>,
    interaction: Interaction,
}

impl Sketchpad {
    pub fn new(state: CanvasState) -> Self {
        let mut history = History::new();
        history.push(state.clone());
        Self {
            state,
            history,
            interaction: Interaction::Idle,
        }
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.interaction, Interaction::Stroke { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Interaction::Drag)
    }

    pub fn is_gesturing(&self) -> bool {
        matches!(self.interaction, Interaction::Gesture(_))
    }

    fn snapshot(&mut self) {
        self.history.push(self.state.clone());
    }

    pub fn set_tool(&mut self, tool: Tool) -> bool {
        if self.state.tool == tool {
            return false;
        }
        self.state.tool = tool;
        true
    }

    pub fn pointer_down(&mut self, point: Point) -> bool {
        if !self.state.tool.captures_strokes() {
            return false;
        }
        let Some(point) = normalize_point(point) else {
            return false;
        };
        self.interaction = Interaction::Stroke {
            erase: self.state.tool == Tool::Erase,
            points: vec![point],
        };
        true
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Interaction::Stroke { points, .. } = &mut self.interaction else {
            return false;
        };
        let Some(point) = normalize_point(point) else {
            return false;
        };
        points.push(point);
        true
    }

    pub fn pointer_up(&mut self) -> bool {
        let interaction = std::mem::replace(&mut self.interaction, Interaction::Idle);
        match interaction {
            Interaction::Stroke { erase, points } => {
                self.state.strokes.push(Stroke { erase, points });
                self.snapshot();
                true
            }
            other => {
                self.interaction = other;
                false
            }
        }
    }

    pub fn begin_drag(&mut self) -> bool {
        if self.state.tool != Tool::Move || self.is_gesturing() {
            return false;
        }
        self.interaction = Interaction::Drag;
        true
    }

    /// `dx_px`/`dy_px` are already in canvas pixels.
    pub fn drag_by(&mut self, dx_px: f64, dy_px: f64) -> bool {
        if !self.is_dragging() || !dx_px.is_finite() || !dy_px.is_finite() {
            return false;
        }
        self.state.view = drag_view(&self.state.view, dx_px, dy_px);
        true
    }

    pub fn end_drag(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.interaction = Interaction::Idle;
        self.snapshot();
        true
    }

    pub fn begin_gesture(&mut self, a: Point, b: Point) -> bool {
        if self.state.tool != Tool::Move || !a.is_finite() || !b.is_finite() {
            return false;
        }
        self.interaction = Interaction::Gesture(TwoFingerGesture::start(self.state.view, a, b));
        true
    }

    pub fn update_gesture(&mut self, a: Point, b: Point) -> bool {
        let Interaction::Gesture(gesture) = &self.interaction else {
            return false;
        };
        if !a.is_finite() || !b.is_finite() {
            return false;
        }
        let view = gesture.view_for(a, b);
        if !view.is_finite() {
            return false;
        }
        self.state.view = view;
        true
    }

    pub fn end_gesture(&mut self) -> bool {
        if !self.is_gesturing() {
            return false;
        }
        self.interaction = Interaction::Idle;
        self.snapshot();
        true
    }

    pub fn cancel_interaction(&mut self) -> bool {
        let active = self.interaction != Interaction::Idle;
        self.interaction = Interaction::Idle;
        active
    }

    pub fn input_brush(&mut self, value: i32) -> u8 {
        let brush = color::separate(value, i32::from(self.state.background), MIN_COLOR_DISTANCE);
        self.state.brush = brush;
        brush
    }

    pub fn input_background(&mut self, value: i32) -> u8 {
        let background = color::separate(value, i32::from(self.state.brush), MIN_COLOR_DISTANCE);
        self.state.background = background;
        background
    }

    pub fn input_thickness(&mut self, value: f64) -> f64 {
        if value.is_finite() {
            self.state.thickness = sanitize_thickness(value, MAX_THICKNESS);
        }
        self.state.thickness
    }

    pub fn input_blur(&mut self, value: f64) -> f64 {
        self.state.blur = sanitize_blur(value);
        self.state.blur
    }

    pub fn commit_controls(&mut self) {
        self.snapshot();
    }

    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.state.brush, &mut self.state.background);
        self.snapshot();
    }

    pub fn flip(&mut self, center: Point) {
        self.state.flip_x = !self.state.flip_x;
        self.state.view = Affine::flip_x_about(center.x, center.y) * self.state.view;
        self.snapshot();
    }

    pub fn clear(&mut self) {
        self.state.strokes.clear();
        self.snapshot();
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.state = snapshot.clone();
        self.interaction = Interaction::Idle;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.state = snapshot.clone();
        self.interaction = Interaction::Idle;
        true
    }

    pub fn paint_list(&self) -> Vec<PaintPath<'_>> {
        let width = self.state.thickness;
        let mut paths: Vec<PaintPath<'_>> = self
            .state
            .strokes
            .iter()
            .filter(|stroke| stroke.points.len() > 1)
            .map(|stroke| PaintPath {
                points: &stroke.points,
                gray: self.state.stroke_gray(stroke),
                width,
            })
            .collect();
        if let Interaction::Stroke { erase, points } = &self.interaction {
            if points.len() > 1 {
                paths.push(PaintPath {
                    points,
                    gray: if *erase {
                        self.state.background
                    } else {
                        self.state.brush
                    },
                    width,
                });
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::{affine_approx_eq, approx_eq, CanvasGeometry};

    fn pad() -> Sketchpad {
        Sketchpad::new(CanvasState::seeded("P007", Controls::default()))
    }

    fn draw_line(pad: &mut Sketchpad, from: (f64, f64), to: (f64, f64)) {
        assert!(pad.pointer_down(Point::new(from.0, from.1)));
        assert!(pad.pointer_move(Point::new((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0)));
        assert!(pad.pointer_move(Point::new(to.0, to.1)));
        assert!(pad.pointer_up());
    }

    #[test]
    fn test_tool_parse() {
        assert_eq!("erase".parse::<Tool>(), Ok(Tool::Erase));
        assert_eq!(" move ".parse::<Tool>(), Ok(Tool::Move));
        assert_eq!(
            "lasso".parse::<Tool>(),
            Err(ParseError::UnknownTool("lasso".to_string()))
        );
        for tool in Tool::ALL {
            assert_eq!(tool.as_str().parse::<Tool>(), Ok(tool));
        }
    }

    #[test]
    fn test_seeded_state_is_deterministic() {
        let a = CanvasState::seeded("P007", Controls::default());
        let b = CanvasState::seeded("P007", Controls::default());
        assert_eq!((a.background, a.brush), (b.background, b.brush));
    }

    #[test]
    fn test_initial_thickness_is_clamped_tighter() {
        let state = CanvasState::seeded(
            "x",
            Controls {
                thickness: 35.0,
                blur: -2.0,
            },
        );
        assert_eq!(state.thickness, MAX_INITIAL_THICKNESS);
        assert_eq!(state.blur, 0.0);
    }

    #[test]
    fn test_stroke_commit_pushes_history() {
        let mut pad = pad();
        assert!(!pad.can_undo());
        draw_line(&mut pad, (0.0, 0.0), (10.0, 10.0));
        assert_eq!(pad.state().strokes.len(), 1);
        assert_eq!(pad.state().strokes[0].points.len(), 3);
        assert!(!pad.state().strokes[0].erase);
        assert!(pad.can_undo());
    }

    #[test]
    fn test_erase_tool_flags_stroke() {
        let mut pad = pad();
        pad.set_tool(Tool::Erase);
        draw_line(&mut pad, (0.0, 0.0), (5.0, 5.0));
        assert!(pad.state().strokes[0].erase);
    }

    #[test]
    fn test_move_tool_does_not_draw() {
        let mut pad = pad();
        pad.set_tool(Tool::Move);
        assert!(!pad.pointer_down(Point::new(1.0, 1.0)));
        assert!(!pad.pointer_up());
        assert!(pad.state().strokes.is_empty());
    }

    #[test]
    fn test_css_drag_pans_zoomed_view_in_canvas_pixels() {
        let geometry = CanvasGeometry {
            left: 0.0,
            top: 0.0,
            css_width: 500.0,
            css_height: 250.0,
            pixel_width: 1000.0,
            pixel_height: 1000.0,
        };
        let (dx, dy) = geometry.css_delta_to_canvas(10.0, 10.0).unwrap();

        let mut state = CanvasState::seeded("P007", Controls::default());
        state.view = Affine::translate(30.0, -12.0) * Affine::rotate(0.4) * Affine::scale(2.5);
        let mut pad = Sketchpad::new(state);
        pad.set_tool(Tool::Move);
        let origin = Point::new(0.0, 0.0);
        let before = pad.state().view.apply(origin);
        assert!(pad.begin_drag());
        assert!(pad.drag_by(dx, dy));
        assert!(pad.end_drag());
        let after = pad.state().view.apply(origin);
        assert!(approx_eq(after.x - before.x, 20.0));
        assert!(approx_eq(after.y - before.y, 40.0));
        assert!(pad.can_undo());
    }

    #[test]
    fn test_canvas_style_always_blocks_browser_touch_gestures() {
        for tool in Tool::ALL {
            for dragging in [false, true] {
                let style = canvas_style(tool, dragging);
                assert!(style.contains(&("touch-action", "none")), "{tool} {dragging}");
            }
        }
        assert_eq!(canvas_style(Tool::Move, true)[0], ("cursor", "grabbing"));
        assert_eq!(canvas_style(Tool::Move, false)[0], ("cursor", "grab"));
        assert_eq!(canvas_style(Tool::Draw, true)[0], ("cursor", "crosshair"));
    }

    #[test]
    fn test_tool_change_is_not_an_undo_step() {
        let mut pad = pad();
        assert!(pad.set_tool(Tool::Move));
        assert!(!pad.can_undo());
        assert!(!pad.set_tool(Tool::Move));
    }

    #[test]
    fn test_n_actions_then_n_undos_restore_initial() {
        let mut pad = pad();
        let initial = pad.state().clone();

        draw_line(&mut pad, (0.0, 0.0), (20.0, 0.0));
        pad.input_brush(i32::from(pad.state().background) + 3);
        pad.commit_controls();
        pad.swap_colors();
        pad.flip(Point::new(256.0, 256.0));
        pad.set_tool(Tool::Move);
        pad.begin_drag();
        pad.drag_by(15.0, -4.0);
        pad.end_drag();
        pad.begin_gesture(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        pad.update_gesture(Point::new(0.0, 0.0), Point::new(20.0, 0.0));
        pad.end_gesture();
        pad.input_thickness(12.0);
        pad.commit_controls();
        pad.clear();

        for _ in 0..8 {
            assert!(pad.undo());
        }
        assert!(!pad.undo());
        assert_eq!(pad.state(), &initial);
    }

    #[test]
    fn test_undo_restores_tool_and_view() {
        let mut pad = pad();
        pad.set_tool(Tool::Move);
        pad.begin_drag();
        pad.drag_by(30.0, 0.0);
        pad.end_drag();
        pad.set_tool(Tool::Erase);
        assert!(pad.undo());
        assert_eq!(pad.state().tool, Tool::Draw);
        assert_eq!(pad.state().view, Affine::IDENTITY);
        assert!(pad.redo());
        assert_eq!(pad.state().tool, Tool::Move);
        assert!(affine_approx_eq(&pad.state().view, &Affine::translate(30.0, 0.0)));
    }

    #[test]
    fn test_redo_after_undo_and_new_action_is_noop() {
        let mut pad = pad();
        draw_line(&mut pad, (0.0, 0.0), (1.0, 1.0));
        draw_line(&mut pad, (2.0, 2.0), (3.0, 3.0));
        assert!(pad.undo());
        assert!(pad.can_redo());
        draw_line(&mut pad, (4.0, 4.0), (5.0, 5.0));
        let before = pad.state().clone();
        assert!(!pad.can_redo());
        assert!(!pad.redo());
        assert_eq!(pad.state(), &before);
    }

    #[test]
    fn test_live_color_inputs_keep_distance() {
        let mut pad = pad();
        for value in -20..=280 {
            let brush = pad.input_brush(value);
            assert!((i32::from(brush) - i32::from(pad.state().background)).abs() >= 10);
            let background = pad.input_background(300 - value);
            assert!((i32::from(background) - i32::from(pad.state().brush)).abs() >= 10);
        }
    }

    #[test]
    fn test_erase_strokes_follow_current_background() {
        let mut pad = pad();
        draw_line(&mut pad, (0.0, 0.0), (1.0, 1.0));
        pad.set_tool(Tool::Erase);
        draw_line(&mut pad, (0.0, 1.0), (1.0, 0.0));

        let brush = pad.state().brush;
        let background = pad.state().background;
        let grays: Vec<u8> = pad.paint_list().iter().map(|path| path.gray).collect();
        assert_eq!(grays, vec![brush, background]);

        pad.swap_colors();
        let grays: Vec<u8> = pad.paint_list().iter().map(|path| path.gray).collect();
        assert_eq!(grays, vec![background, brush]);
    }

    #[test]
    fn test_paint_list_skips_single_points_and_includes_live_stroke() {
        let mut pad = pad();
        pad.pointer_down(Point::new(1.0, 1.0));
        pad.pointer_up();
        assert_eq!(pad.state().strokes.len(), 1);
        assert!(pad.paint_list().is_empty());

        pad.pointer_down(Point::new(0.0, 0.0));
        assert!(pad.paint_list().is_empty());
        pad.pointer_move(Point::new(4.0, 4.0));
        let paths = pad.paint_list();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].points.len(), 2);
        assert_eq!(paths[0].width, pad.state().thickness);
    }

    #[test]
    fn test_gesture_abandons_live_stroke() {
        let mut pad = pad();
        pad.pointer_down(Point::new(0.0, 0.0));
        pad.pointer_move(Point::new(3.0, 3.0));
        pad.set_tool(Tool::Move);
        assert!(pad.begin_gesture(Point::new(0.0, 0.0), Point::new(10.0, 10.0)));
        assert!(pad.end_gesture());
        assert!(pad.state().strokes.is_empty());
    }

    #[test]
    fn test_gesture_with_unmoved_fingers_keeps_view() {
        let mut pad = pad();
        pad.flip(Point::new(100.0, 100.0));
        pad.set_tool(Tool::Move);
        let view = pad.state().view;
        let a = Point::new(12.0, 40.0);
        let b = Point::new(90.0, 70.0);
        assert!(pad.begin_gesture(a, b));
        assert!(pad.update_gesture(a, b));
        assert!(pad.end_gesture());
        assert!(affine_approx_eq(&pad.state().view, &view));
    }

    #[test]
    fn test_flip_twice_restores_view() {
        let mut pad = pad();
        pad.set_tool(Tool::Move);
        pad.begin_drag();
        pad.drag_by(7.0, 9.0);
        pad.end_drag();
        let view = pad.state().view;
        pad.flip(Point::new(300.0, 300.0));
        assert!(pad.state().flip_x);
        pad.flip(Point::new(300.0, 300.0));
        assert!(!pad.state().flip_x);
        assert!(affine_approx_eq(&pad.state().view, &view));
    }

    #[test]
    fn test_thickness_and_blur_inputs_are_sanitized() {
        let mut pad = pad();
        assert_eq!(pad.input_thickness(99.0), MAX_THICKNESS);
        assert_eq!(pad.input_thickness(0.0), MIN_THICKNESS);
        assert_eq!(pad.input_thickness(f64::NAN), MIN_THICKNESS);
        assert_eq!(pad.input_blur(-1.0), 0.0);
        assert_eq!(pad.input_blur(3.5), 3.5);
        assert_eq!(pad.state().background_padding(), 6.0);
    }

    #[test]
    fn test_non_finite_points_are_dropped() {
        let mut pad = pad();
        assert!(!pad.pointer_down(Point::new(f64::NAN, 0.0)));
        assert!(pad.pointer_down(Point::new(0.0, 0.0)));
        assert!(!pad.pointer_move(Point::new(f64::INFINITY, 0.0)));
        pad.pointer_up();
        assert_eq!(pad.state().strokes[0].points.len(), 1);
    }
}
