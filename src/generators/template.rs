//! Vehicle construction recipes used by a [`super::VehicleGenerator`].

use crate::agents::{Vehicle, VehicleClass, VehicleID};
use crate::segment::SegmentIndex;

/// A weighted recipe for materialising a vehicle. Physical parameters
/// mirror [`Vehicle`]'s defaults when unset.
#[derive(Debug, Clone)]
pub struct VehicleTemplate {
    pub vehicle_class: VehicleClass,
    pub l: f64,
    pub s0: f64,
    pub t_headway: f64,
    pub v_max: f64,
    pub a_max: f64,
    pub b_max: f64,
    pub color: Option<String>,
    pub shape: Option<String>,
    pub path: Vec<SegmentIndex>,
}

impl Default for VehicleTemplate {
    fn default() -> Self {
        VehicleTemplate {
            vehicle_class: VehicleClass::default(),
            l: 4.0,
            s0: 4.0,
            t_headway: 1.0,
            v_max: 16.6,
            a_max: 1.44,
            b_max: 4.61,
            color: None,
            shape: None,
            path: Vec::new(),
        }
    }
}

impl VehicleTemplate {
    /// Materialises a new [`Vehicle`] at `x = 0` on `path[0]`.
    pub fn materialize(&self, id: VehicleID) -> Vehicle {
        let mut builder = Vehicle::new(id)
            .with_vehicle_class(self.vehicle_class)
            .with_length(self.l)
            .with_s0(self.s0)
            .with_time_headway(self.t_headway)
            .with_v_max(self.v_max)
            .with_a_max(self.a_max)
            .with_b_max(self.b_max)
            .with_path(self.path.clone());
        if let Some(color) = &self.color {
            builder = builder.with_color(color.clone());
        }
        if let Some(shape) = &self.shape {
            builder = builder.with_shape(shape.clone());
        }
        builder.build()
    }
}
