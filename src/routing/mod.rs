//! # Routing Module
//!
//! A directed graph over segment endpoints: two segments are connected when
//! one's end-endpoint snaps to the same tolerance-quantised grid cell as
//! another's start-endpoint. Shortest path is Dijkstra by cumulative segment
//! length.
//!
//! The graph is rebuilt lazily on first use after [`RoutingGraph::mark_dirty`]
//! (segment insertion marks it dirty). A query that fails at the default
//! tolerance is retried once at `5 * tol`; if that also fails, the query
//! fails with [`RoutingError::NoPathFound`] naming both segments and their
//! relevant endpoints.

mod error;
mod graph;

pub use self::error::RoutingError;

use crate::segment::{Segment, SegmentIndex};
use indexmap::IndexMap;

/// Default endpoint-snapping tolerance, meters.
pub const DEFAULT_TOL: f64 = 0.05;
/// Multiplier applied to `tol` on a retried build.
pub const RETRY_TOL_MULTIPLIER: f64 = 5.0;

/// The routing graph. Owns no segments; rebuilds its adjacency from a
/// caller-supplied segment slice whenever marked dirty.
#[derive(Debug, Clone)]
pub struct RoutingGraph {
    adjacency: IndexMap<SegmentIndex, Vec<(SegmentIndex, f64)>>,
    dirty: bool,
    tol: f64,
}

impl Default for RoutingGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingGraph {
    pub fn new() -> Self {
        RoutingGraph { adjacency: IndexMap::new(), dirty: true, tol: DEFAULT_TOL }
    }

    /// Marks the graph for a rebuild on next query. Called whenever a
    /// segment is added to the simulation.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Resolves a shortest path from `start` to `goal`, rebuilding the graph
    /// first if dirty, and retrying once at a relaxed tolerance if no path
    /// is found at the current one.
    pub fn shortest_path(
        &mut self,
        segments: &[Segment],
        start: SegmentIndex,
        goal: SegmentIndex,
    ) -> Result<Vec<SegmentIndex>, RoutingError> {
        if self.dirty {
            self.tol = DEFAULT_TOL;
            self.adjacency = graph::build_adjacency(segments, self.tol);
            self.dirty = false;
        }

        if let Some(path) = graph::shortest_path(&self.adjacency, start, goal) {
            return Ok(path);
        }

        let retry_tol = self.tol * RETRY_TOL_MULTIPLIER;
        let retry_adjacency = graph::build_adjacency(segments, retry_tol);
        if let Some(path) = graph::shortest_path(&retry_adjacency, start, goal) {
            self.adjacency = retry_adjacency;
            self.tol = retry_tol;
            return Ok(path);
        }

        Err(RoutingError::NoPathFound {
            from: start,
            to: goal,
            from_end: segments[start].end_point(),
            to_start: segments[goal].start_point(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    #[test]
    fn test_lazy_rebuild_then_retry_succeeds() {
        let segs = vec![
            Segment::straight(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).build(),
            Segment::straight(Point::new(10.1, 0.0), Point::new(20.0, 0.0)).build(),
        ];
        let mut g = RoutingGraph::new();
        assert!(g.shortest_path(&segs, 0, 1).is_ok());
        assert_eq!(g.tol(), DEFAULT_TOL * RETRY_TOL_MULTIPLIER);
    }

    #[test]
    fn test_no_path_reports_segments() {
        let segs = vec![
            Segment::straight(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).build(),
            Segment::straight(Point::new(50.0, 50.0), Point::new(60.0, 50.0)).build(),
        ];
        let mut g = RoutingGraph::new();
        let err = g.shortest_path(&segs, 0, 1).unwrap_err();
        assert_eq!(err, RoutingError::NoPathFound {
            from: 0,
            to: 1,
            from_end: Point::new(10.0, 0.0),
            to_start: Point::new(50.0, 50.0),
        });
    }
}
