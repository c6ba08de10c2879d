//! Graph build and Dijkstra shortest path over segment endpoints.

use crate::segment::{Segment, SegmentIndex};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

type GridKey = (i64, i64);

fn snap(point: crate::geom::Point, tol: f64) -> GridKey {
    ((point.x / tol).round() as i64, (point.y / tol).round() as i64)
}

/// `segment_id -> [(segment_id, cost)]` adjacency, built by connecting each
/// segment's end-endpoint to every segment whose start-endpoint snaps to the
/// same grid cell at resolution `tol`.
pub fn build_adjacency(
    segments: &[Segment],
    tol: f64,
) -> IndexMap<SegmentIndex, Vec<(SegmentIndex, f64)>> {
    let mut starts: HashMap<GridKey, Vec<SegmentIndex>> = HashMap::new();
    for (idx, seg) in segments.iter().enumerate() {
        starts.entry(snap(seg.start_point(), tol)).or_default().push(idx);
    }

    let mut adjacency: IndexMap<SegmentIndex, Vec<(SegmentIndex, f64)>> = IndexMap::new();
    for idx in 0..segments.len() {
        adjacency.insert(idx, Vec::new());
    }

    for (u, seg) in segments.iter().enumerate() {
        let key = snap(seg.end_point(), tol);
        if let Some(v_list) = starts.get(&key) {
            for &v in v_list {
                if v != u {
                    adjacency.get_mut(&u).unwrap().push((v, segments[v].length()));
                }
            }
        }
    }

    adjacency
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: SegmentIndex,
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so `BinaryHeap` (a max-heap) behaves as a min-heap by cost; ties
// break by ascending node index for determinism.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Dijkstra from `start` to `goal`, inclusive of `start` in the returned
/// path. Cost accumulates as `sum(length(v))` over entered segments `v`,
/// i.e. the start segment itself contributes no cost.
pub fn shortest_path(
    adjacency: &IndexMap<SegmentIndex, Vec<(SegmentIndex, f64)>>,
    start: SegmentIndex,
    goal: SegmentIndex,
) -> Option<Vec<SegmentIndex>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut dist: IndexMap<SegmentIndex, f64> = IndexMap::new();
    let mut prev: IndexMap<SegmentIndex, SegmentIndex> = IndexMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(start, 0.0);
    heap.push(HeapEntry { cost: 0.0, node: start });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if node == goal {
            return Some(reconstruct_path(&prev, start, goal));
        }
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        let Some(neighbors) = adjacency.get(&node) else { continue };
        for &(next, edge_cost) in neighbors {
            let next_cost = cost + edge_cost;
            if next_cost < *dist.get(&next).unwrap_or(&f64::INFINITY) {
                dist.insert(next, next_cost);
                prev.insert(next, node);
                heap.push(HeapEntry { cost: next_cost, node: next });
            }
        }
    }

    None
}

fn reconstruct_path(
    prev: &IndexMap<SegmentIndex, SegmentIndex>,
    start: SegmentIndex,
    goal: SegmentIndex,
) -> Vec<SegmentIndex> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = *prev.get(&current).expect("reconstruct_path: broken prev chain");
        path.push(current);
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn grid() -> Vec<Segment> {
        vec![
            Segment::straight(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).build(), // A: 0
            Segment::straight(Point::new(10.0, 0.0), Point::new(20.0, 0.0)).build(), // B: 1
            Segment::straight(Point::new(10.0, 0.0), Point::new(10.0, 10.0)).build(), // C: 2
        ]
    }

    #[test]
    fn test_shortest_path_to_direct_neighbor() {
        let segs = grid();
        let adjacency = build_adjacency(&segs, 0.05);
        let path = shortest_path(&adjacency, 0, 1).unwrap();
        assert_eq!(path, vec![0, 1]);
    }

    #[test]
    fn test_shortest_path_to_other_branch() {
        let segs = grid();
        let adjacency = build_adjacency(&segs, 0.05);
        let path = shortest_path(&adjacency, 0, 2).unwrap();
        assert_eq!(path, vec![0, 2]);
    }

    #[test]
    fn test_no_path_when_endpoints_dont_snap() {
        let mut segs = grid();
        // Move B's start 0.1m away from A's end — outside default tol.
        segs[1] = Segment::straight(Point::new(10.1, 0.0), Point::new(20.0, 0.0)).build();
        let adjacency = build_adjacency(&segs, 0.05);
        assert!(shortest_path(&adjacency, 0, 1).is_none());
        let relaxed = build_adjacency(&segs, 0.25);
        assert!(shortest_path(&relaxed, 0, 1).is_some());
    }

    #[test]
    fn test_build_determinism() {
        let segs = grid();
        let a = build_adjacency(&segs, 0.05);
        let b = build_adjacency(&segs, 0.05);
        assert_eq!(a.get(&0), b.get(&0));
    }
}
