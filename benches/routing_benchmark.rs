use micro_traffic_sim_core::geom::Point;
use micro_traffic_sim_core::routing::RoutingGraph;
use micro_traffic_sim_core::segment::Segment;

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// A chain of `n` 50m straight segments, end-to-end, each snapping onto the
/// next's start point.
fn chain(n: usize) -> Vec<Segment> {
    (0..n)
        .map(|i| {
            let x = i as f64 * 50.0;
            Segment::straight(Point::new(x, 0.0), Point::new(x + 50.0, 0.0)).build()
        })
        .collect()
}

pub fn benchmark_shortest_path(c: &mut Criterion) {
    let segments = chain(5000);
    let mut graph = RoutingGraph::new();
    graph.shortest_path(&segments, 0, segments.len() - 1).expect("chain is fully connected");

    c.bench_function("routing_shortest_path", |b| {
        b.iter(|| match graph.shortest_path(black_box(&segments), black_box(0), black_box(segments.len() - 1)) {
            Ok(path) => {
                let _ = black_box(path);
            }
            Err(e) => panic!("Error during shortest path calculation: {:?}", e),
        })
    });
}

criterion_group!(benches, benchmark_shortest_path);
criterion_main!(benches);
