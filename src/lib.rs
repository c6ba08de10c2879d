//! # micro_traffic_sim_core
//!
//! A deterministic, fixed-timestep microscopic road-traffic simulation
//! engine. Segments carry arclength-parametrised Bezier geometry
//! ([`geom`], [`segment`]); vehicles follow each other under the
//! Intelligent Driver Model ([`agents`]); a routing graph resolves
//! endpoint-to-endpoint paths ([`routing`]); timed disruptions
//! ([`events`]) and junction control ([`junctions`]) modulate a vehicle's
//! effective speed cap each tick; [`generators`] emit new vehicles onto
//! lead segments at a bounded rate. [`simulation::Simulation`] owns all of
//! it and drives the tick; [`config`] turns a JSON document into a
//! [`simulation::Simulation`] directly.
//!
//! ```
//! use micro_traffic_sim_core::simulation::Simulation;
//! use micro_traffic_sim_core::simulation::simulation::VehicleRoute;
//! use micro_traffic_sim_core::agents::Vehicle;
//! use micro_traffic_sim_core::segment::SegmentMetadata;
//! use micro_traffic_sim_core::geom::Point;
//!
//! let mut sim = Simulation::new();
//! let seg = sim
//!     .create_segment(None, vec![Point::new(0.0, 0.0), Point::new(200.0, 0.0)], SegmentMetadata::default())
//!     .unwrap();
//! sim.create_vehicle(Vehicle::new(1).build(), VehicleRoute { path: vec![seg], ..Default::default() }).unwrap();
//! sim.run(60);
//! assert_eq!(sim.frame_count(), 60);
//! ```

pub mod agents;
pub mod config;
pub mod events;
pub mod generators;
pub mod geom;
pub mod junctions;
pub mod routing;
pub mod segment;
pub mod simulation;
pub mod verbose;
