//! # Config module
//!
//! Typed deserialization of the JSON configuration format and its
//! translation into a runnable [`crate::simulation::Simulation`] via
//! [`build_simulation`].
//!
//! ```
//! use micro_traffic_sim_core::config::{build_simulation, ConfigDocument};
//!
//! let doc: ConfigDocument = serde_json::from_str(r#"{
//!     "segments": [{"type": "segment", "id": "a", "start": [0,0], "end": [100,0]}]
//! }"#).unwrap();
//! let sim = build_simulation(&doc).unwrap();
//! assert_eq!(sim.segments().len(), 1);
//! ```

pub mod build;
pub mod document;

pub use self::build::build_simulation;
pub use self::document::{
    ApproachConfig, ConfigDocument, CubicSegmentConfig, EnvironmentConfig, EventConfig, JunctionConfig,
    PointArray, QuadraticSegmentConfig, SegmentConfig, SegmentRef, StraightSegmentConfig, VehicleConfig,
    VehicleGeneratorConfig, VehicleTemplateConfig,
};
