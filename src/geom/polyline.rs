//! Arclength-parametrized polylines.
//!
//! A [`ArcLengthPolyline`] turns an ordered list of points into a curve where
//! `t ∈ [0, 1]` maps to *actual distance travelled*, not to the native
//! parameter of whatever produced the points. Straight segments build one
//! directly from their endpoints; curved segments build one from a dense
//! sample of the analytic Bezier curve (see [`crate::geom::curve`]).

use crate::geom::Point;

/// A polyline reparametrized so that `t ∈ [0, 1]` is fractional arclength.
#[derive(Debug, Clone)]
pub struct ArcLengthPolyline {
    points: Vec<Point>,
    /// Cumulative arclength up to and including `points[i]`. Same length as
    /// `points`; `cumulative[0] == 0.0`.
    cumulative: Vec<f64>,
}

impl ArcLengthPolyline {
    /// Builds a table from an ordered list of points.
    ///
    /// `points` must contain at least two distinct points; this is an
    /// invariant enforced by callers (segment construction), not re-checked
    /// here beyond a debug assertion.
    pub fn new(points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 2, "polyline needs at least two points");
        let mut cumulative = Vec::with_capacity(points.len());
        cumulative.push(0.0);
        for window in points.windows(2) {
            let d = window[0].distance_to(&window[1]);
            let last = *cumulative.last().unwrap();
            cumulative.push(last + d);
        }
        debug_assert!(*cumulative.last().unwrap() > 0.0, "polyline has zero length");
        ArcLengthPolyline { points, cumulative }
    }

    /// Total arclength of the polyline.
    pub fn length(&self) -> f64 {
        *self.cumulative.last().unwrap()
    }

    /// The raw sampled points, in order. Used as the segment's `points` field
    /// for rendering/endpoint queries.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Index of the last cumulative-distance entry `<= target`, found by
    /// binary search. Returns an index into `points`/`cumulative` such that
    /// `target` falls within `[cumulative[i], cumulative[i+1]]` (or the final
    /// segment if `target` is past the end).
    fn bracket(&self, target: f64) -> usize {
        match self
            .cumulative
            .binary_search_by(|probe| probe.partial_cmp(&target).unwrap())
        {
            Ok(i) => i.min(self.cumulative.len() - 2),
            Err(0) => 0,
            Err(i) => (i - 1).min(self.cumulative.len() - 2),
        }
    }

    /// World-space point at fractional arclength `t`, clamped to `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let target = t * self.length();
        let i = self.bracket(target);
        let seg_len = self.cumulative[i + 1] - self.cumulative[i];
        let local_t = if seg_len > 0.0 {
            (target - self.cumulative[i]) / seg_len
        } else {
            0.0
        };
        self.points[i].lerp(&self.points[i + 1], local_t)
    }

    /// Heading (radians, `atan2` convention) at fractional arclength `t`,
    /// clamped to `[0, 1]`. At `t == 1.0` this returns the tangent of the
    /// final sub-segment rather than an undefined forward difference.
    pub fn heading_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let target = t * self.length();
        let i = self.bracket(target);
        let a = self.points[i];
        let b = self.points[i + 1];
        (b.y - a.y).atan2(b.x - a.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line_midpoint() {
        let poly = ArcLengthPolyline::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert_eq!(poly.length(), 10.0);
        let mid = poly.point_at(0.5);
        assert_eq!(mid.x, 5.0);
        assert_eq!(mid.y, 0.0);
    }

    #[test]
    fn test_heading_constant_on_straight_line() {
        let poly = ArcLengthPolyline::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        let h0 = poly.heading_at(0.0);
        let h1 = poly.heading_at(1.0);
        assert!((h0 - h1).abs() < 1e-9);
        assert!((h0 - std::f64::consts::FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn test_multi_segment_arclength_is_uniform_speed() {
        // Two unequal-length legs; t=0.5 should land at exactly half the
        // *total* arclength, not halfway through the point list.
        let poly = ArcLengthPolyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 9.0),
        ]);
        assert_eq!(poly.length(), 10.0);
        let mid = poly.point_at(0.5);
        assert_eq!(mid.x, 1.0);
        assert_eq!(mid.y, 4.0);
    }

    #[test]
    fn test_endpoints_exact() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(6.0, 8.0)];
        let poly = ArcLengthPolyline::new(pts.clone());
        assert_eq!(poly.point_at(0.0), pts[0]);
        assert_eq!(poly.point_at(1.0), *pts.last().unwrap());
    }
}
