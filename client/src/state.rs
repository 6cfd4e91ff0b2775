use std::collections::BTreeMap;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use sightsketch_shared::{Point, Sketchpad};

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub viewport: Option<HtmlElement>,
    pub pad: Sketchpad,
    pub touch_points: BTreeMap<i32, Point>,
    pub active_pointer: Option<i32>,
    pub last_move: Option<Point>,
    pub blur_timer: Option<i32>,
    pub debug: bool,
}

impl State {
    pub fn first_two_touches(&self) -> Option<(Point, Point)> {
        let mut touches = self.touch_points.values().copied();
        Some((touches.next()?, touches.next()?))
    }

    pub fn release_pointer(&mut self) {
        self.active_pointer = None;
        self.last_move = None;
    }
}
