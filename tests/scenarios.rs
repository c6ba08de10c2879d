//! End-to-end scenarios covering solo free-flow, car-following, junction
//! control and routing.

use micro_traffic_sim_core::agents::Vehicle;
use micro_traffic_sim_core::events::Event;
use micro_traffic_sim_core::geom::Point;
use micro_traffic_sim_core::junctions::{ApproachControl, Junction};
use micro_traffic_sim_core::routing::RoutingError;
use micro_traffic_sim_core::segment::SegmentMetadata;
use micro_traffic_sim_core::simulation::{Simulation, VehicleRoute};

fn straight(sim: &mut Simulation, start: Point, end: Point) -> usize {
    sim.create_segment(None, vec![start, end], SegmentMetadata::default()).unwrap()
}

#[test]
fn straight_solo_reaches_v_max_and_wraps_on_exit() {
    let mut sim = Simulation::new().with_dt(1.0 / 60.0);
    let seg = straight(&mut sim, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    let id = sim.create_vehicle(Vehicle::new(1).build(), VehicleRoute { path: vec![seg], ..Default::default() }).unwrap();

    let steps = (10.0 * 60.0) as u32;
    sim.run(steps);

    let v = sim.vehicles().get(&id).unwrap();
    assert!((v.v() - 16.6).abs() < 0.01, "v={}", v.v());

    // Run until the vehicle exits onto the (nonexistent) next segment.
    for _ in 0..(40 * 60) {
        sim.run(1);
    }
    let v = sim.vehicles().get(&id).unwrap();
    assert_eq!(v.current_road_index(), 0);
    assert_eq!(v.x(), 0.0);
}

#[test]
fn follow_stop_settles_at_minimum_gap() {
    let mut sim = Simulation::new();
    let a = straight(&mut sim, Point::new(0.0, 0.0), Point::new(200.0, 0.0));
    let _b = straight(&mut sim, Point::new(200.0, 0.0), Point::new(400.0, 0.0));

    let lead_id = sim.create_vehicle(Vehicle::new(1).build(), VehicleRoute { path: vec![a], ..Default::default() }).unwrap();
    sim.vehicle_mut(lead_id).unwrap().set_x(150.0);
    sim.vehicle_mut(lead_id).unwrap().set_stopped(true);

    let follower_id = sim.create_vehicle(Vehicle::new(2).build(), VehicleRoute { path: vec![a], ..Default::default() }).unwrap();

    // Follower was inserted after the lead; segment order reflects creation
    // order, so the lead (pushed first) is already the head. Advance long
    // enough for the IDM approach to settle.
    for _ in 0..(120 * 60) {
        sim.update();
    }

    let lead = sim.vehicles().get(&lead_id).unwrap();
    let follower = sim.vehicles().get(&follower_id).unwrap();
    let gap = lead.x() - lead.l() - follower.x();
    assert!((gap - follower.s0()).abs() < 0.5, "gap={} s0={}", gap, follower.s0());
    assert!(follower.v() < 0.5, "follower should have settled, v={}", follower.v());
}

#[test]
fn red_light_stops_vehicle_within_six_meters() {
    // Phase defaults to green with phase_start=0; it flips to red at t=30
    // and back to green at t=60.
    let mut sim = Simulation::new();
    let seg = straight(&mut sim, Point::new(0.0, 0.0), Point::new(100.0, 0.0));

    let junction = Junction::new(1).with_approach(seg, ApproachControl::Light { green: 30.0, red: 30.0 }, 0.5).build();
    sim.add_junction(junction);

    let id = sim.create_vehicle(Vehicle::new(1).build(), VehicleRoute { path: vec![seg], ..Default::default() }).unwrap();
    sim.vehicle_mut(id).unwrap().set_x(45.0);

    while sim.t() < 30.1 {
        sim.update();
    }
    assert_eq!(
        sim.junctions().segment_approaches(seg)[0].phase_state.unwrap().phase,
        micro_traffic_sim_core::junctions::Phase::Red
    );
    let factor = sim.junctions().speed_factor(seg, 45.0, sim.segments(), sim.vehicles());
    assert!((factor - 0.0).abs() < 1e-9, "factor={}", factor);

    while sim.t() < 60.1 {
        sim.update();
    }
    assert_eq!(
        sim.junctions().segment_approaches(seg)[0].phase_state.unwrap().phase,
        micro_traffic_sim_core::junctions::Phase::Green
    );
    let factor = sim.junctions().speed_factor(seg, 45.0, sim.segments(), sim.vehicles());
    assert!((factor - 0.6).abs() < 1e-9, "factor should be the base slow-zone factor, got {}", factor);
}

#[test]
fn yield_priority_scales_down_for_vehicle_on_the_right() {
    let mut sim = Simulation::new();
    // A runs east. B crosses the same point from a bearing 80 degrees off A's
    // heading — inside the (0, pi/2) window that counts as "on A's right".
    let a = straight(&mut sim, Point::new(-50.0, 0.0), Point::new(50.0, 0.0));
    let (bx, by) = (80.0_f64.to_radians().cos(), 80.0_f64.to_radians().sin());
    let b = straight(&mut sim, Point::new(-50.0 * bx, -50.0 * by), Point::new(50.0 * bx, 50.0 * by));

    let junction = Junction::new(1)
        .with_approach(a, ApproachControl::Yield, 0.5)
        .with_approach(b, ApproachControl::Yield, 0.5)
        .build();
    sim.add_junction(junction);

    let a_vehicle = sim.create_vehicle(Vehicle::new(1).build(), VehicleRoute { path: vec![a], ..Default::default() }).unwrap();
    let b_vehicle = sim.create_vehicle(Vehicle::new(2).build(), VehicleRoute { path: vec![b], ..Default::default() }).unwrap();

    sim.vehicle_mut(a_vehicle).unwrap().set_x(40.0);
    sim.vehicle_mut(b_vehicle).unwrap().set_x(45.0);

    sim.update();
    let factor = sim.junctions().speed_factor(a, 40.0, sim.segments(), sim.vehicles());
    assert!((factor - 0.1).abs() < 1e-9, "factor={}", factor);

    // Remove B's vehicle: A is now alone in the slowdown zone at a yield.
    let mut sim2 = Simulation::new();
    let a2 = straight(&mut sim2, Point::new(-50.0, 0.0), Point::new(50.0, 0.0));
    let b2 = straight(&mut sim2, Point::new(0.0, -50.0), Point::new(0.0, 50.0));
    let junction2 =
        Junction::new(1).with_approach(a2, ApproachControl::Yield, 0.5).with_approach(b2, ApproachControl::Yield, 0.5).build();
    sim2.add_junction(junction2);
    let a2_vehicle = sim2.create_vehicle(Vehicle::new(1).build(), VehicleRoute { path: vec![a2], ..Default::default() }).unwrap();
    sim2.vehicle_mut(a2_vehicle).unwrap().set_x(40.0);
    sim2.update();
    let factor2 = sim2.junctions().speed_factor(a2, 40.0, sim2.segments(), sim2.vehicles());
    assert!((factor2 - 0.2).abs() < 1e-9, "factor2={}", factor2);
}

#[test]
fn routing_shortest_path_and_retry() {
    let mut sim = Simulation::new();
    let a = straight(&mut sim, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    let b = straight(&mut sim, Point::new(10.0, 0.0), Point::new(20.0, 0.0));
    let c = straight(&mut sim, Point::new(10.0, 0.0), Point::new(10.0, 10.0));

    assert_eq!(sim.resolve_path(a, b).unwrap(), vec![a, b]);
    assert_eq!(sim.resolve_path(a, c).unwrap(), vec![a, c]);

    // D's start is 0.1m off A's end: fails at the default 0.05 tol, then
    // succeeds after the internal 5x retry.
    let d = straight(&mut sim, Point::new(10.1, 0.0), Point::new(30.0, 0.0));
    assert_eq!(sim.resolve_path(a, d).unwrap(), vec![a, d]);
}

#[test]
fn routing_fails_when_truly_disconnected() {
    let mut sim = Simulation::new();
    let a = straight(&mut sim, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    let isolated = straight(&mut sim, Point::new(500.0, 500.0), Point::new(600.0, 500.0));
    let err = sim.resolve_path(a, isolated).unwrap_err();
    assert!(matches!(err, RoutingError::NoPathFound { .. }));
}

#[test]
fn event_slowdown_applies_within_lookahead_then_expires() {
    let mut sim = Simulation::new();
    let seg = straight(&mut sim, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    sim.add_event(Event::new(1, seg, 0.5, 0.0, 0.3).with_duration(10.0).build());

    let id = sim.create_vehicle(Vehicle::new(1).build(), VehicleRoute { path: vec![seg], ..Default::default() }).unwrap();
    sim.vehicle_mut(id).unwrap().set_x(20.0);

    let dt = sim.dt();
    sim.run((1.0 / dt) as u32);
    let v = sim.vehicles().get(&id).unwrap();
    assert!((v.v_max() - 16.6 * 0.3).abs() < 1e-6, "v_max={}", v.v_max());

    while sim.t() < 10.01 {
        sim.update();
    }
    let v = sim.vehicles().get(&id).unwrap();
    assert!((v.v_max() - 16.6).abs() < 1e-6, "v_max={}", v.v_max());
}
