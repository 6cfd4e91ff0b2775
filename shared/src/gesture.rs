use crate::affine::Affine;
use crate::Point;

pub const MIN_GESTURE_SCALE: f64 = 0.2;
pub const MAX_GESTURE_SCALE: f64 = 8.0;
const MIN_SPAN: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoFingerGesture {
    pub view0: Affine,
    pub a0: Point,
    pub b0: Point,
    pub mid0: Point,
}

impl TwoFingerGesture {
    pub fn start(view: Affine, a: Point, b: Point) -> Self {
        Self {
            view0: view,
            a0: a,
            b0: b,
            mid0: a.midpoint(b),
        }
    }

    /// View for the current touch positions:
    /// `translate(mid1) · rotate(Δθ) · scale(s) · translate(-mid0) · view0`.
    pub fn view_for(&self, a1: Point, b1: Point) -> Affine {
        let mid1 = a1.midpoint(b1);
        let (v0x, v0y) = (self.b0.x - self.a0.x, self.b0.y - self.a0.y);
        let (v1x, v1y) = (b1.x - a1.x, b1.y - a1.y);
        let len0 = v0x.hypot(v0y).max(MIN_SPAN);
        let len1 = v1x.hypot(v1y).max(MIN_SPAN);
        let scale = (len1 / len0).clamp(MIN_GESTURE_SCALE, MAX_GESTURE_SCALE);
        let dtheta = v1y.atan2(v1x) - v0y.atan2(v0x);

        Affine::translate(mid1.x, mid1.y)
            * Affine::rotate(dtheta)
            * Affine::scale(scale)
            * Affine::translate(-self.mid0.x, -self.mid0.y)
            * self.view0
    }
}

pub fn drag_view(view: &Affine, dx_px: f64, dy_px: f64) -> Affine {
    Affine::translate(dx_px, dy_px) * *view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::{affine_approx_eq, approx_eq};

    fn view() -> Affine {
        Affine::translate(30.0, -10.0) * Affine::rotate(0.4) * Affine::scale(1.3)
    }

    #[test]
    fn test_unmoved_fingers_keep_view() {
        let a = Point::new(100.0, 200.0);
        let b = Point::new(300.0, 260.0);
        let gesture = TwoFingerGesture::start(view(), a, b);
        assert!(affine_approx_eq(&gesture.view_for(a, b), &view()));
    }

    #[test]
    fn test_pure_pan_translates_by_midpoint_delta() {
        let gesture = TwoFingerGesture::start(
            Affine::IDENTITY,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        );
        let next = gesture.view_for(Point::new(20.0, 5.0), Point::new(120.0, 5.0));
        assert!(affine_approx_eq(&next, &Affine::translate(20.0, 5.0)));
    }

    #[test]
    fn test_spread_zooms_about_midpoint() {
        let gesture = TwoFingerGesture::start(
            Affine::IDENTITY,
            Point::new(40.0, 50.0),
            Point::new(60.0, 50.0),
        );
        let next = gesture.view_for(Point::new(30.0, 50.0), Point::new(70.0, 50.0));
        let fixed = next.apply(Point::new(50.0, 50.0));
        assert!(approx_eq(fixed.x, 50.0));
        assert!(approx_eq(fixed.y, 50.0));
        assert!(approx_eq(next.a, 2.0));
        assert!(approx_eq(next.d, 2.0));
    }

    #[test]
    fn test_scale_is_clamped() {
        let gesture = TwoFingerGesture::start(
            Affine::IDENTITY,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        let huge = gesture.view_for(Point::new(0.0, 0.0), Point::new(1000.0, 0.0));
        assert!(approx_eq(huge.a, MAX_GESTURE_SCALE));
        let tiny = gesture.view_for(Point::new(0.0, 0.0), Point::new(0.01, 0.0));
        assert!(approx_eq(tiny.a, MIN_GESTURE_SCALE));
    }

    #[test]
    fn test_twist_rotates() {
        let gesture = TwoFingerGesture::start(
            Affine::IDENTITY,
            Point::new(-10.0, 0.0),
            Point::new(10.0, 0.0),
        );
        let next = gesture.view_for(Point::new(0.0, -10.0), Point::new(0.0, 10.0));
        let expected = Affine::rotate(std::f64::consts::FRAC_PI_2);
        assert!(affine_approx_eq(&next, &expected));
    }

    #[test]
    fn test_coincident_start_touches_do_not_blow_up() {
        let p = Point::new(5.0, 5.0);
        let gesture = TwoFingerGesture::start(Affine::IDENTITY, p, p);
        let next = gesture.view_for(Point::new(0.0, 0.0), Point::new(50.0, 0.0));
        assert!(next.is_finite());
        assert!(approx_eq(next.a.hypot(next.b), MAX_GESTURE_SCALE));
    }

    #[test]
    fn test_drag_ignores_existing_zoom() {
        let zoomed = Affine::scale(4.0);
        let moved = drag_view(&zoomed, 10.0, -5.0);
        let origin = moved.apply(Point::new(0.0, 0.0));
        assert!(approx_eq(origin.x, 10.0));
        assert!(approx_eq(origin.y, -5.0));
    }
}
