//! # Generators Module
//!
//! Rate-limited vehicle emission, run once per tick after segment handover.
//! See [`generator::VehicleGenerator`].

mod generator;
mod template;

pub use self::{generator::{VehicleGenerator, VehicleGeneratorBuilder}, template::VehicleTemplate};
