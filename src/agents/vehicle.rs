//! Intelligent Driver Model (IDM) vehicle dynamics.

use crate::agents::VehicleClass;
use crate::segment::SegmentIndex;
use std::fmt;

pub type VehicleID = u64;

#[derive(Debug, Clone)]
pub enum VehicleError {
    MissingRoute { vehicle_id: VehicleID },
}

impl fmt::Display for VehicleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleError::MissingRoute { vehicle_id } => {
                write!(f, "vehicle '{}' has neither an explicit path nor start/end routing info", vehicle_id)
            }
        }
    }
}

impl std::error::Error for VehicleError {}

/// A single vehicle's physical parameters and kinematic state.
///
/// `update` implements the Intelligent Driver Model exactly as specified:
/// kinematics are integrated first using the *previous* tick's acceleration,
/// then acceleration is recomputed from the (possibly absent) lead vehicle,
/// then a `stopped` override is applied if set.
///
/// # Example
///
/// ```
/// use micro_traffic_sim_core::agents::Vehicle;
///
/// let mut v = Vehicle::new(1).build();
/// v.update(None, 1.0 / 60.0);
/// assert!(v.v() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleID,
    vehicle_class: VehicleClass,
    color: Option<String>,
    shape: Option<String>,

    /// Vehicle length, meters.
    l: f64,
    /// Minimum gap, meters.
    s0: f64,
    /// Time headway, seconds.
    t_headway: f64,
    /// Effective speed cap for this tick, mutated by the orchestrator from
    /// `_v_max * speed_factor`.
    v_max: f64,
    /// Baseline speed cap, immutable after construction.
    _v_max: f64,
    /// Maximum acceleration, m/s^2.
    a_max: f64,
    /// Comfortable deceleration, m/s^2.
    b_max: f64,
    /// `2 * sqrt(a_max * b_max)`, precomputed IDM constant.
    sqrt_ab: f64,

    /// Progress along the current segment, meters.
    x: f64,
    /// Current speed, m/s.
    v: f64,
    /// Current acceleration, m/s^2.
    a: f64,
    /// Gentle-braking-hold override.
    stopped: bool,

    /// Resolved sequence of segment indices.
    path: Vec<SegmentIndex>,
    /// Cursor into `path`.
    current_road_index: usize,
}

impl Vehicle {
    /// Starts building a vehicle with default IDM parameters. Defaults match
    /// spec: `l=4`, `s0=4`, `T=1`, `_v_max=16.6`, `a_max=1.44`, `b_max=4.61`.
    pub fn new(id: VehicleID) -> VehicleBuilder {
        let a_max = 1.44;
        let b_max = 4.61;
        VehicleBuilder {
            vehicle: Vehicle {
                id,
                vehicle_class: VehicleClass::default(),
                color: None,
                shape: None,
                l: 4.0,
                s0: 4.0,
                t_headway: 1.0,
                v_max: 16.6,
                _v_max: 16.6,
                a_max,
                b_max,
                sqrt_ab: 2.0 * (a_max * b_max).sqrt(),
                x: 0.0,
                v: 0.0,
                a: 0.0,
                stopped: false,
                path: Vec::new(),
                current_road_index: 0,
            },
        }
    }

    pub fn id(&self) -> VehicleID {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    pub fn v(&self) -> f64 {
        self.v
    }

    pub fn l(&self) -> f64 {
        self.l
    }

    pub fn s0(&self) -> f64 {
        self.s0
    }

    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    pub fn vehicle_class(&self) -> VehicleClass {
        self.vehicle_class
    }

    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(self.vehicle_class.default_style().color)
    }

    pub fn shape(&self) -> &str {
        self.shape.as_deref().unwrap_or(self.vehicle_class.default_style().shape)
    }

    pub fn path(&self) -> &[SegmentIndex] {
        &self.path
    }

    /// Overwrites the resolved route, resetting the cursor to its start.
    /// Used by the orchestrator once a `start_segment`/`end_segment` pair has
    /// been turned into a concrete path by the routing graph.
    pub fn set_path(&mut self, path: Vec<SegmentIndex>) {
        self.path = path;
        self.current_road_index = 0;
    }

    pub fn current_road_index(&self) -> usize {
        self.current_road_index
    }

    /// The segment the vehicle currently occupies, or `None` if its path is
    /// empty (should not occur for a constructed vehicle).
    pub fn current_segment(&self) -> Option<SegmentIndex> {
        self.path.get(self.current_road_index).copied()
    }

    /// The next segment in the vehicle's path, if any.
    pub fn next_segment(&self) -> Option<SegmentIndex> {
        self.path.get(self.current_road_index + 1).copied()
    }

    /// Advances the route cursor to the next segment and resets progress.
    /// Returns `false` (and leaves state unchanged but for `x`) if the
    /// vehicle has already reached the end of its path.
    pub fn advance_to_next_segment(&mut self) -> bool {
        if self.current_road_index + 1 < self.path.len() {
            self.current_road_index += 1;
            self.x = 0.0;
            true
        } else {
            self.x = 0.0;
            false
        }
    }

    /// Sets the effective speed cap for the upcoming tick. Called by the
    /// orchestrator each tick before `update`.
    pub fn set_v_max(&mut self, speed_factor: f64) {
        self.v_max = self._v_max * speed_factor;
    }

    pub fn v_max(&self) -> f64 {
        self.v_max
    }

    pub fn baseline_v_max(&self) -> f64 {
        self._v_max
    }

    /// One IDM tick. `lead` is the vehicle immediately ahead on the same
    /// segment, if any.
    pub fn update(&mut self, lead: Option<&Vehicle>, dt: f64) {
        // 1. Integrate kinematics using the previous tick's acceleration.
        if self.v + self.a * dt < 0.0 {
            self.x -= 0.5 * self.v * self.v / self.a;
            self.v = 0.0;
        } else {
            self.v += self.a * dt;
            self.x += self.v * dt + 0.5 * self.a * dt * dt;
        }

        // 2. Recompute acceleration from the lead vehicle, if any.
        let alpha = match lead {
            None => 0.0,
            Some(lead) => {
                let delta_x = lead.x - self.x - lead.l;
                debug_assert!(delta_x > 0.0, "IDM invariant violated: delta_x must be positive");
                let delta_v = self.v - lead.v;
                let gap_term = self.t_headway * self.v + delta_v * self.v / self.sqrt_ab;
                (self.s0 + gap_term.max(0.0)) / delta_x
            }
        };
        let ratio = if self.v_max > 0.0 { self.v / self.v_max } else { 0.0 };
        self.a = self.a_max * (1.0 - ratio.powi(4) - alpha * alpha);

        // 3. Stopped override: gentle braking hold.
        if self.stopped {
            self.a = if self.v_max > 0.0 { -self.b_max * self.v / self.v_max } else { -self.b_max };
        }
    }
}

/// Builder for [`Vehicle`]. See [`Vehicle::new`].
pub struct VehicleBuilder {
    vehicle: Vehicle,
}

impl VehicleBuilder {
    pub fn with_vehicle_class(mut self, class: VehicleClass) -> Self {
        self.vehicle.vehicle_class = class;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.vehicle.color = Some(color.into());
        self
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.vehicle.shape = Some(shape.into());
        self
    }

    pub fn with_length(mut self, l: f64) -> Self {
        self.vehicle.l = l;
        self
    }

    pub fn with_s0(mut self, s0: f64) -> Self {
        self.vehicle.s0 = s0;
        self
    }

    pub fn with_time_headway(mut self, t_headway: f64) -> Self {
        self.vehicle.t_headway = t_headway;
        self
    }

    /// Sets the baseline (and current) speed cap, recomputing nothing else.
    pub fn with_v_max(mut self, v_max: f64) -> Self {
        self.vehicle.v_max = v_max;
        self.vehicle._v_max = v_max;
        self
    }

    pub fn with_a_max(mut self, a_max: f64) -> Self {
        self.vehicle.a_max = a_max;
        self.vehicle.sqrt_ab = 2.0 * (a_max * self.vehicle.b_max).sqrt();
        self
    }

    pub fn with_b_max(mut self, b_max: f64) -> Self {
        self.vehicle.b_max = b_max;
        self.vehicle.sqrt_ab = 2.0 * (self.vehicle.a_max * b_max).sqrt();
        self
    }

    pub fn with_path(mut self, path: Vec<SegmentIndex>) -> Self {
        self.vehicle.path = path;
        self
    }

    pub fn build(self) -> Vehicle {
        self.vehicle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_flow_accelerates_towards_v_max() {
        let mut v = Vehicle::new(1).build();
        for _ in 0..600 {
            v.update(None, 1.0 / 60.0);
        }
        assert!((v.v() - 16.6).abs() < 0.01);
    }

    #[test]
    fn test_speed_never_negative() {
        let mut v = Vehicle::new(1).build();
        v.set_stopped(true);
        for _ in 0..600 {
            v.update(None, 1.0 / 60.0);
            assert!(v.v() >= 0.0);
        }
    }

    #[test]
    fn test_advance_to_next_segment_resets_progress() {
        let mut v = Vehicle::new(1).with_path(vec![0, 1]).build();
        v.set_x(99.0);
        assert!(v.advance_to_next_segment());
        assert_eq!(v.current_road_index(), 1);
        assert_eq!(v.x(), 0.0);
    }

    #[test]
    fn test_advance_past_last_segment_is_terminal() {
        let mut v = Vehicle::new(1).with_path(vec![0]).build();
        v.set_x(99.0);
        assert!(!v.advance_to_next_segment());
        assert_eq!(v.current_road_index(), 0);
        assert_eq!(v.x(), 0.0);
    }

    #[test]
    fn test_style_defaults_from_class() {
        let v = Vehicle::new(1).with_vehicle_class(VehicleClass::Bus).build();
        assert_eq!(v.color(), VehicleClass::Bus.default_style().color);
    }
}
