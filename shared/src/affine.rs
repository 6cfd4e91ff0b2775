use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::{normalize_point, Point};

const SINGULAR_EPSILON: f64 = 1e-12;

/// 2D affine matrix laid out like `CanvasRenderingContext2d::set_transform`:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub const MIRROR_X: Affine = Affine {
        a: -1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn from_array(m: [f64; 6]) -> Self {
        Self {
            a: m[0],
            b: m[1],
            c: m[2],
            d: m[3],
            e: m[4],
            f: m[5],
        }
    }

    pub fn to_array(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(s: f64) -> Self {
        Self {
            a: s,
            d: s,
            ..Self::IDENTITY
        }
    }

    pub fn rotate(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn flip_x_about(cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy)
            .multiply(&Self::MIRROR_X)
            .multiply(&Self::translate(-cx, -cy))
    }

    pub fn multiply(&self, rhs: &Affine) -> Affine {
        Affine {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Closed-form inverse. A (near) singular matrix inverts to the identity.
    pub fn invert(&self) -> Affine {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Affine::IDENTITY;
        }
        let inv_det = 1.0 / det;
        let a = self.d * inv_det;
        let b = -self.b * inv_det;
        let c = -self.c * inv_det;
        let d = self.a * inv_det;
        Affine {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }
}

impl Mul for Affine {
    type Output = Affine;

    fn mul(self, rhs: Affine) -> Affine {
        self.multiply(&rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasGeometry {
    pub left: f64,
    pub top: f64,
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl CanvasGeometry {
    pub fn pixel_ratio(&self) -> Option<(f64, f64)> {
        if self.css_width <= 0.0 || self.css_height <= 0.0 {
            return None;
        }
        Some((
            self.pixel_width / self.css_width,
            self.pixel_height / self.css_height,
        ))
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.pixel_width * 0.5,
            y: self.pixel_height * 0.5,
        }
    }

    pub fn client_to_canvas_px(&self, client_x: f64, client_y: f64) -> Option<Point> {
        let (sx, sy) = self.pixel_ratio()?;
        normalize_point(Point {
            x: (client_x - self.left) * sx,
            y: (client_y - self.top) * sy,
        })
    }

    pub fn client_to_model(&self, view: &Affine, client_x: f64, client_y: f64) -> Option<Point> {
        let px = self.client_to_canvas_px(client_x, client_y)?;
        normalize_point(view.invert().apply(px))
    }

    pub fn css_delta_to_canvas(&self, dx: f64, dy: f64) -> Option<(f64, f64)> {
        let (sx, sy) = self.pixel_ratio()?;
        Some((dx * sx, dy * sy))
    }
}

#[cfg(test)]
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[cfg(test)]
pub(crate) fn affine_approx_eq(lhs: &Affine, rhs: &Affine) -> bool {
    lhs.to_array()
        .iter()
        .zip(rhs.to_array().iter())
        .all(|(a, b)| approx_eq(*a, *b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Affine> {
        vec![
            Affine::IDENTITY,
            Affine::translate(12.5, -3.0),
            Affine::scale(2.5),
            Affine::rotate(0.7),
            Affine::from_array([1.2, 0.3, -0.4, 0.9, 15.0, -8.0]),
            Affine::flip_x_about(400.0, 300.0) * Affine::rotate(-1.1) * Affine::scale(0.25),
        ]
    }

    #[test]
    fn test_multiply_with_inverse_is_identity() {
        for m in samples() {
            let product = m.multiply(&m.invert());
            assert!(
                affine_approx_eq(&product.invert(), &Affine::IDENTITY),
                "{m:?}"
            );
            assert!(affine_approx_eq(&product, &Affine::IDENTITY), "{m:?}");
        }
    }

    #[test]
    fn test_multiply_applies_right_operand_first() {
        let p = Point::new(3.0, -7.5);
        for a in samples() {
            for b in samples() {
                let composed = a.multiply(&b).apply(p);
                let nested = a.apply(b.apply(p));
                assert!(approx_eq(composed.x, nested.x));
                assert!(approx_eq(composed.y, nested.y));
            }
        }
    }

    #[test]
    fn test_translate_then_scale_order() {
        let m = Affine::translate(10.0, 0.0) * Affine::scale(2.0);
        let p = m.apply(Point::new(1.0, 1.0));
        assert!(approx_eq(p.x, 12.0));
        assert!(approx_eq(p.y, 2.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = Affine::rotate(std::f64::consts::FRAC_PI_2).apply(Point::new(1.0, 0.0));
        assert!(approx_eq(p.x, 0.0));
        assert!(approx_eq(p.y, 1.0));
    }

    #[test]
    fn test_singular_matrix_inverts_to_identity() {
        let singular = Affine::from_array([1.0, 2.0, 2.0, 4.0, 5.0, 6.0]);
        assert_eq!(singular.invert(), Affine::IDENTITY);
        assert_eq!(Affine::scale(0.0).invert(), Affine::IDENTITY);
        let nan = Affine::from_array([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(nan.invert(), Affine::IDENTITY);
    }

    #[test]
    fn test_flip_about_center_twice_restores_view() {
        let view = Affine::translate(40.0, 12.0) * Affine::rotate(0.3) * Affine::scale(1.7);
        let flip = Affine::flip_x_about(512.0, 384.0);
        let once = flip * view;
        assert!(!affine_approx_eq(&once, &view));
        let twice = flip * once;
        assert!(affine_approx_eq(&twice, &view));
    }

    #[test]
    fn test_flip_keeps_center_fixed() {
        let flip = Affine::flip_x_about(100.0, 50.0);
        let center = flip.apply(Point::new(100.0, 50.0));
        assert!(approx_eq(center.x, 100.0));
        assert!(approx_eq(center.y, 50.0));
        let left = flip.apply(Point::new(90.0, 10.0));
        assert!(approx_eq(left.x, 110.0));
        assert!(approx_eq(left.y, 10.0));
    }

    #[test]
    fn test_client_to_model_accounts_for_css_scaling() {
        let geometry = CanvasGeometry {
            left: 10.0,
            top: 20.0,
            css_width: 500.0,
            css_height: 500.0,
            pixel_width: 1000.0,
            pixel_height: 1000.0,
        };
        let px = geometry.client_to_canvas_px(60.0, 70.0).unwrap();
        assert!(approx_eq(px.x, 100.0));
        assert!(approx_eq(px.y, 100.0));

        let view = Affine::translate(50.0, 0.0) * Affine::scale(2.0);
        let model = geometry.client_to_model(&view, 60.0, 70.0).unwrap();
        assert!(approx_eq(model.x, 25.0));
        assert!(approx_eq(model.y, 50.0));
        let back = view.apply(model);
        assert!(approx_eq(back.x, px.x));
        assert!(approx_eq(back.y, px.y));
    }

    #[test]
    fn test_css_delta_scales_per_axis() {
        let geometry = CanvasGeometry {
            left: 40.0,
            top: 15.0,
            css_width: 500.0,
            css_height: 250.0,
            pixel_width: 1000.0,
            pixel_height: 1000.0,
        };
        let (dx, dy) = geometry.css_delta_to_canvas(10.0, 10.0).unwrap();
        assert!(approx_eq(dx, 20.0));
        assert!(approx_eq(dy, 40.0));
        let (dx, dy) = geometry.css_delta_to_canvas(-5.0, 2.5).unwrap();
        assert!(approx_eq(dx, -10.0));
        assert!(approx_eq(dy, 10.0));
    }

    #[test]
    fn test_collapsed_rect_yields_no_point() {
        let geometry = CanvasGeometry {
            left: 0.0,
            top: 0.0,
            css_width: 0.0,
            css_height: 300.0,
            pixel_width: 600.0,
            pixel_height: 600.0,
        };
        assert!(geometry.client_to_canvas_px(1.0, 1.0).is_none());
        assert!(geometry.css_delta_to_canvas(1.0, 1.0).is_none());
    }
}
