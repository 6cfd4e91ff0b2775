use serde::{Deserialize, Serialize};

pub mod affine;
pub mod color;
pub mod footer;
pub mod gesture;
pub mod history;
pub mod params;
pub mod quiz;
pub mod seed;
pub mod sessions;
pub mod sketch;
pub mod stimulus;
pub mod trial;
pub mod tutorial;

pub use affine::{Affine, CanvasGeometry};
pub use params::Params;
pub use sketch::{CanvasState, Sketchpad, Tool};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if !point.is_finite() {
        return None;
    }
    Some(point)
}

/// One committed pointer drag in model space. Colour is not stored: it is
/// resolved from the current brush or background whenever the canvas is painted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    pub erase: bool,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown tool: {0:?}")]
    UnknownTool(String),
    #[error("Unknown page: {0:?}")]
    UnknownPage(String),
}
