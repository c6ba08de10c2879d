//! # Agents Module
//!
//! The vehicle model: physical/IDM parameters, kinematic state, routing
//! cursor, and a typed class with default styling.
//!
//! ## Usage
//!
//! ```rust
//! use micro_traffic_sim_core::agents::{Vehicle, VehicleClass};
//!
//! let vehicle = Vehicle::new(1)
//!     .with_vehicle_class(VehicleClass::Bus)
//!     .with_path(vec![0, 1])
//!     .build();
//! ```

mod vehicle;
mod vehicle_class;
mod vehicles_storage;

pub use self::{vehicle::*, vehicle_class::*, vehicles_storage::*};
