//! # Geometry Module
//!
//! Euclidean geometry primitives for road segments: a [`Point`] type, analytic
//! Bezier evaluation ([`curve`]), and arclength-parametrized polylines
//! ([`polyline::ArcLengthPolyline`]) that back straight and curved segment
//! shapes alike.
//!
//! ## Arclength parametrization
//!
//! Segment geometry is always queried with `t ∈ [0, 1]` representing
//! *fractional distance travelled*, never the native Bezier parameter. A
//! straight segment's polyline *is* its arclength table; a curved segment's
//! polyline is a dense sample ([`curve::CURVE_SAMPLES`] points) of the
//! analytic curve, reparametrized the same way. This keeps vehicle motion
//! speed-uniform regardless of how a segment's shape was authored.
//!
//! ```
//! use micro_traffic_sim_core::geom::{Point, polyline::ArcLengthPolyline};
//!
//! let poly = ArcLengthPolyline::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
//! assert_eq!(poly.point_at(0.5).x, 5.0);
//! ```

pub mod curve;
pub mod point;
pub mod polyline;

pub use self::point::Point;
