//! # Simulation module
//!
//! The top-level orchestrator. [`simulation::Simulation`] owns every
//! segment, vehicle, event, junction and generator for the run's lifetime
//! and drives the fixed-timestep tick in strict order:
//!
//! ```text
//! 1. Advance junctions (phase flip + approach rebuild)
//! 2. Refresh events (clear + rebuild per-segment factor tables)
//! 3. Update vehicles, segment-index then head-to-tail
//! 4. Handover (head vehicles crossing a segment boundary)
//! 5. Run vehicle generators
//! 6. t += dt; frame_count += 1
//! ```
//!
//! # Example
//!
//! ```
//! use micro_traffic_sim_core::simulation::Simulation;
//! use micro_traffic_sim_core::agents::Vehicle;
//! use micro_traffic_sim_core::simulation::simulation::VehicleRoute;
//! use micro_traffic_sim_core::segment::SegmentMetadata;
//! use micro_traffic_sim_core::geom::Point;
//!
//! let mut sim = Simulation::new();
//! let points = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
//! let seg = sim.create_segment(None, points, SegmentMetadata::default()).unwrap();
//! sim.create_vehicle(Vehicle::new(1).build(), VehicleRoute { path: vec![seg], ..Default::default() }).unwrap();
//! sim.update();
//! assert_eq!(sim.frame_count(), 1);
//! ```
pub mod simulation;

pub use self::simulation::{ConfigError, EnvironmentObject, Simulation, VehicleConstructionError, VehicleRoute};
