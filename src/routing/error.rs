use crate::geom::Point;
use crate::segment::SegmentIndex;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    NoPathFound {
        from: SegmentIndex,
        to: SegmentIndex,
        from_end: Point,
        to_start: Point,
    },
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::NoPathFound { from, to, from_end, to_start } => write!(
                f,
                "no path found from segment {} (ending at {}) to segment {} (starting at {}), even after relaxing the snap tolerance",
                from, from_end, to, to_start
            ),
        }
    }
}

impl std::error::Error for RoutingError {}
