//! Road segments: geometry, FIFO vehicle queue, opaque metadata.

use crate::agents::VehicleID;
use crate::geom::curve::{self, CURVE_SAMPLES};
use crate::geom::polyline::ArcLengthPolyline;
use crate::geom::Point;
use crate::segment::SegmentMetadata;
use std::collections::VecDeque;

/// Index of a segment within a [`crate::simulation::Simulation`]'s segment
/// storage. Doubles as the routing graph's node identifier and as the unit
/// of a vehicle's resolved `path`.
pub type SegmentIndex = usize;

/// How a segment's shape was authored. Carried for introspection/rendering;
/// the engine itself only ever queries `point`/`heading`/`length` through
/// the shared arclength table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentShape {
    Straight,
    Quadratic { control: Point },
    Cubic { control_1: Point, control_2: Point },
}

/// One directional road segment.
///
/// `point(t)`, `heading(t)` and `length()` are arclength-parametrised: `t`
/// always means fractional distance travelled, regardless of whether the
/// underlying shape is a straight line or a Bezier curve.
#[derive(Debug, Clone)]
pub struct Segment {
    id: Option<String>,
    shape: SegmentShape,
    geometry: ArcLengthPolyline,
    vehicles: VecDeque<VehicleID>,
    metadata: SegmentMetadata,
}

impl Segment {
    /// Starts building a straight segment from `start` to `end`.
    pub fn straight(start: Point, end: Point) -> SegmentBuilder {
        Segment::from_points(vec![start, end])
    }

    /// Starts building a straight segment from an explicit polyline (more
    /// than two waypoints is allowed — this is the `create_segment(points,
    /// ...)` construction entry point).
    pub fn from_points(points: Vec<Point>) -> SegmentBuilder {
        SegmentBuilder::new(SegmentShape::Straight, ArcLengthPolyline::new(points))
    }

    /// Starts building a quadratic Bezier segment.
    pub fn quadratic(start: Point, control: Point, end: Point) -> SegmentBuilder {
        let points = (0..CURVE_SAMPLES)
            .map(|i| {
                let u = i as f64 / (CURVE_SAMPLES - 1) as f64;
                curve::quadratic_point(start, control, end, u)
            })
            .collect();
        SegmentBuilder::new(SegmentShape::Quadratic { control }, ArcLengthPolyline::new(points))
    }

    /// Starts building a cubic Bezier segment.
    pub fn cubic(start: Point, control_1: Point, control_2: Point, end: Point) -> SegmentBuilder {
        let points = (0..CURVE_SAMPLES)
            .map(|i| {
                let u = i as f64 / (CURVE_SAMPLES - 1) as f64;
                curve::cubic_point(start, control_1, control_2, end, u)
            })
            .collect();
        SegmentBuilder::new(
            SegmentShape::Cubic { control_1, control_2 },
            ArcLengthPolyline::new(points),
        )
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn shape(&self) -> SegmentShape {
        self.shape
    }

    pub fn metadata(&self) -> &SegmentMetadata {
        &self.metadata
    }

    /// World-space point at fractional arclength `t`.
    pub fn point(&self, t: f64) -> Point {
        self.geometry.point_at(t)
    }

    /// Heading (radians) at fractional arclength `t`.
    pub fn heading(&self, t: f64) -> f64 {
        self.geometry.heading_at(t)
    }

    /// Total arclength, meters.
    pub fn length(&self) -> f64 {
        self.geometry.length()
    }

    /// Dense polyline backing this segment's geometry, used for rendering
    /// and endpoint queries.
    pub fn points(&self) -> &[Point] {
        self.geometry.points()
    }

    pub fn start_point(&self) -> Point {
        self.geometry.point_at(0.0)
    }

    pub fn end_point(&self) -> Point {
        self.geometry.point_at(1.0)
    }

    /// The front-most vehicle (largest progress `x`), if any.
    pub fn head(&self) -> Option<VehicleID> {
        self.vehicles.front().copied()
    }

    /// The back-most vehicle (smallest progress `x`, closest to the
    /// segment's start), if any.
    pub fn tail(&self) -> Option<VehicleID> {
        self.vehicles.back().copied()
    }

    /// Vehicle ids in head-to-tail order.
    pub fn vehicles(&self) -> &VecDeque<VehicleID> {
        &self.vehicles
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Appends a vehicle at the tail (used on entry / handover).
    pub fn push_tail(&mut self, id: VehicleID) {
        self.vehicles.push_back(id);
    }

    /// Pops the head vehicle (used during handover).
    pub fn pop_head(&mut self) -> Option<VehicleID> {
        self.vehicles.pop_front()
    }

    /// Vehicle immediately behind position `index` in the queue (its lead),
    /// i.e. `vehicles[index - 1]`.
    pub fn lead_of(&self, index: usize) -> Option<VehicleID> {
        if index == 0 {
            None
        } else {
            self.vehicles.get(index - 1).copied()
        }
    }
}

/// Builder for [`Segment`]. See [`Segment::straight`]/[`Segment::quadratic`]/[`Segment::cubic`].
pub struct SegmentBuilder {
    id: Option<String>,
    shape: SegmentShape,
    geometry: ArcLengthPolyline,
    metadata: SegmentMetadata,
}

impl SegmentBuilder {
    fn new(shape: SegmentShape, geometry: ArcLengthPolyline) -> Self {
        SegmentBuilder { id: None, shape, geometry, metadata: SegmentMetadata::default() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: SegmentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn build(self) -> Segment {
        Segment {
            id: self.id,
            shape: self.shape,
            geometry: self.geometry,
            vehicles: VecDeque::new(),
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_length_and_endpoints() {
        let seg = Segment::straight(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).build();
        assert_eq!(seg.length(), 100.0);
        assert_eq!(seg.point(0.0), Point::new(0.0, 0.0));
        assert_eq!(seg.point(1.0), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_quadratic_endpoints_match_control_points() {
        let start = Point::new(0.0, 0.0);
        let control = Point::new(5.0, 10.0);
        let end = Point::new(10.0, 0.0);
        let seg = Segment::quadratic(start, control, end).build();
        let p0 = seg.point(0.0);
        let p1 = seg.point(1.0);
        assert!(p0.distance_to(&start) < 1e-6);
        assert!(p1.distance_to(&end) < 1e-6);
    }

    #[test]
    fn test_fifo_queue_head_and_lead() {
        let mut seg = Segment::straight(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).build();
        seg.push_tail(1);
        seg.push_tail(2);
        assert_eq!(seg.head(), Some(1));
        assert_eq!(seg.lead_of(0), None);
        assert_eq!(seg.lead_of(1), Some(1));
        assert_eq!(seg.pop_head(), Some(1));
        assert_eq!(seg.head(), Some(2));
    }

    #[test]
    fn test_id_and_metadata_roundtrip() {
        let seg = Segment::straight(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
            .with_id("seg-a")
            .with_metadata(SegmentMetadata { color: Some("red".into()), ..Default::default() })
            .build();
        assert_eq!(seg.id(), Some("seg-a"));
        assert_eq!(seg.metadata().color.as_deref(), Some("red"));
    }
}
