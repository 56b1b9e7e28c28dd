//! Angle and circle math shared by the layout engine, the rotation controller and the
//! renderers.
//!
//! All angles are radians in screen coordinates (y grows downward), so a positive angle
//! turns clockwise on screen.

use std::f64::consts::{PI, TAU};
use std::fmt;

pub const FULL_CIRCLE: f64 = TAU;

/// Smallest span `describe_arc` will emit. Zero-length arcs are dropped or divide by zero
/// in some renderers.
pub const MIN_ARC_SPAN: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of `self` as seen from `center`, in `[-PI, PI]`.
    pub fn angle_from(&self, center: Point) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }
}

pub fn polar_to_cartesian(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Reduces `angle` into `[0, 2PI)`. Non-finite input maps to 0.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let reduced = angle.rem_euclid(FULL_CIRCLE);
    // rem_euclid rounds tiny negative inputs up to exactly 2PI
    if reduced >= FULL_CIRCLE { 0.0 } else { reduced }
}

/// Signed rotation that takes `from` to `to` the short way around, in `(-PI, PI]`.
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(FULL_CIRCLE);
    if delta > PI { delta - FULL_CIRCLE } else { delta }
}

/// A single circular arc, always swept in the positive direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    pub span: f64,
    pub large_arc: bool,
}

impl fmt::Display for ArcPath {
    /// SVG path data: a move-to followed by one arc-to.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {:.3} {:.3} A {:.3} {:.3} 0 {} 1 {:.3} {:.3}",
            self.start.x,
            self.start.y,
            self.radius,
            self.radius,
            u8::from(self.large_arc),
            self.end.x,
            self.end.y,
        )
    }
}

/// Describes the clockwise arc from `start_angle` to `end_angle` on the given circle.
pub fn describe_arc(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> ArcPath {
    let start = normalize_angle(start_angle);
    let end = normalize_angle(end_angle);

    let mut span = end - start;
    if span < 0.0 {
        span += FULL_CIRCLE;
    }
    let span = span.max(MIN_ARC_SPAN);

    ArcPath {
        start: polar_to_cartesian(center, radius, start),
        end: polar_to_cartesian(center, radius, start + span),
        radius,
        span,
        large_arc: span > PI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_polar_to_cartesian_points_clockwise() {
        let c = Point::new(10.0, 10.0);
        let p = polar_to_cartesian(c, 5.0, FRAC_PI_2);
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_angle_range_and_idempotence() {
        let samples = [
            0.0,
            -0.0,
            1.0,
            -1.0,
            PI,
            -PI,
            TAU,
            -TAU,
            7.5 * TAU + 0.3,
            -1e-17,
            -123.456,
            1e9,
        ];
        for x in samples {
            let once = normalize_angle(x);
            assert!((0.0..FULL_CIRCLE).contains(&once), "normalize({x}) = {once}");
            assert_eq!(normalize_angle(once), once, "not idempotent for {x}");
        }
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), 1.5 * PI, epsilon = 1e-12);
        assert_eq!(normalize_angle(f64::NAN), 0.0);
    }

    #[test]
    fn test_shortest_delta_wraps() {
        assert_abs_diff_eq!(shortest_delta(3.0, -3.0), TAU - 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shortest_delta(-3.0, 3.0), 6.0 - TAU, epsilon = 1e-12);
        assert_abs_diff_eq!(shortest_delta(0.2, 0.5), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_from_center() {
        let c = Point::new(0.0, 0.0);
        assert_abs_diff_eq!(Point::new(0.0, 1.0).angle_from(c), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(Point::new(3.0, 4.0).distance_to(c), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_describe_arc_large_flag() {
        let c = Point::new(0.0, 0.0);
        assert!(!describe_arc(c, 1.0, 0.0, 1.0).large_arc);
        assert!(describe_arc(c, 1.0, 0.0, 4.0).large_arc);
    }

    #[test]
    fn test_describe_arc_wraps_past_zero() {
        let c = Point::new(0.0, 0.0);
        let arc = describe_arc(c, 1.0, TAU - 0.5, 0.5);
        assert_abs_diff_eq!(arc.span, 1.0, epsilon = 1e-9);
        assert!(!arc.large_arc);
        assert_abs_diff_eq!(arc.end.x, 0.5_f64.cos(), epsilon = 1e-9);
        assert_abs_diff_eq!(arc.end.y, 0.5_f64.sin(), epsilon = 1e-9);
    }

    #[test]
    fn test_describe_arc_degenerate_span_is_floored() {
        let arc = describe_arc(Point::default(), 2.0, 1.0, 1.0);
        assert_eq!(arc.span, MIN_ARC_SPAN);
        assert!(arc.start != arc.end);
    }

    #[test]
    fn test_arc_path_svg_data() {
        let arc = describe_arc(Point::new(50.0, 50.0), 10.0, 0.0, PI + 0.5);
        let data = arc.to_string();
        assert!(data.starts_with("M 60.000 50.000 A 10.000 10.000 0 1 1 "), "{data}");
    }
}
