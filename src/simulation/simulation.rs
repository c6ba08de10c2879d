//! The engine: owns every segment, vehicle, event, junction and generator
//! for the lifetime of a run, and drives the fixed-timestep tick.

use crate::agents::{Vehicle, VehicleID, VehiclesStorage};
use crate::events::{Event, EventTable};
use crate::generators::VehicleGenerator;
use crate::junctions::{Junction, JunctionTable};
use crate::routing::{RoutingError, RoutingGraph};
use crate::geom::Point;
use crate::segment::{Segment, SegmentBuilder, SegmentIndex, SegmentMetadata};
use crate::verbose::{
    LocalLogger, VerboseLevel, EVENT_EVENTS_REFRESH, EVENT_GENERATE_VEHICLES, EVENT_HANDOVER,
    EVENT_JUNCTIONS_ADVANCE, EVENT_TICK, EVENT_VEHICLES_UPDATE,
};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Default fixed timestep, seconds.
pub const DEFAULT_DT: f64 = 1.0 / 60.0;
/// Distance ahead of a vehicle over which current/next-segment events
/// influence its effective speed cap.
pub const EVENT_LOOKAHEAD: f64 = 50.0;

/// Errors raised synchronously at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    DuplicateSegmentId { id: String },
    UnknownSegmentId { id: String },
    SegmentHasNoGeometry,
    VehicleMissingRoute { vehicle_id: VehicleID },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateSegmentId { id } => write!(f, "duplicate segment id '{}'", id),
            ConfigError::UnknownSegmentId { id } => write!(f, "unknown segment id '{}'", id),
            ConfigError::SegmentHasNoGeometry => write!(f, "segment has no geometry"),
            ConfigError::VehicleMissingRoute { vehicle_id } => {
                write!(f, "vehicle '{}' has neither an explicit path nor start/end routing info", vehicle_id)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while resolving a vehicle's route at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleConstructionError {
    Config(ConfigError),
    Routing(RoutingError),
}

impl fmt::Display for VehicleConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleConstructionError::Config(e) => write!(f, "{}", e),
            VehicleConstructionError::Routing(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for VehicleConstructionError {}

impl From<ConfigError> for VehicleConstructionError {
    fn from(e: ConfigError) -> Self {
        VehicleConstructionError::Config(e)
    }
}

impl From<RoutingError> for VehicleConstructionError {
    fn from(e: RoutingError) -> Self {
        VehicleConstructionError::Routing(e)
    }
}

/// Opaque, renderer/telemetry-only payload. The engine carries these without
/// interpreting them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentObject {
    pub kind: String,
    pub attributes: HashMap<String, serde_json::Value>,
}

/// Recipe consumed by [`Simulation::create_vehicle`]: either an explicit
/// `path`, or a `start_segment`/`end_segment` pair resolved through the
/// routing graph.
#[derive(Debug, Clone, Default)]
pub struct VehicleRoute {
    pub path: Vec<SegmentIndex>,
    pub start_segment: Option<SegmentIndex>,
    pub end_segment: Option<SegmentIndex>,
}

/// The engine. Owns segments, vehicles, events, junctions and generators;
/// `update()` advances exactly one fixed timestep.
pub struct Simulation {
    id: Uuid,
    segments: Vec<Segment>,
    segment_ids: HashMap<String, SegmentIndex>,
    vehicles: VehiclesStorage,
    next_vehicle_id: VehicleID,
    routing: RoutingGraph,
    events: EventTable,
    junctions: JunctionTable,
    generators: Vec<VehicleGenerator>,
    environment: Vec<EnvironmentObject>,
    t: f64,
    frame_count: u64,
    dt: f64,
    logger: LocalLogger,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates an empty simulation with `dt = 1/60` s.
    pub fn new() -> Self {
        Simulation {
            id: Uuid::new_v4(),
            segments: Vec::new(),
            segment_ids: HashMap::new(),
            vehicles: VehiclesStorage::new(),
            next_vehicle_id: 1,
            routing: RoutingGraph::new(),
            events: EventTable::new(),
            junctions: JunctionTable::new(),
            generators: Vec::new(),
            environment: Vec::new(),
            t: 0.0,
            frame_count: 0,
            dt: DEFAULT_DT,
            logger: LocalLogger::with_session(VerboseLevel::None, "simulation"),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn set_verbose_level(&mut self, level: VerboseLevel) {
        self.logger.set_level(level);
    }

    // ----- construction API -------------------------------------------------

    fn add_segment(&mut self, id: Option<String>, builder: SegmentBuilder) -> Result<SegmentIndex, ConfigError> {
        let index = self.segments.len();
        if let Some(id) = &id {
            if self.segment_ids.contains_key(id) {
                return Err(ConfigError::DuplicateSegmentId { id: id.clone() });
            }
        }
        let segment = match &id {
            Some(id) => builder.with_id(id.clone()).build(),
            None => builder.build(),
        };
        self.segments.push(segment);
        if let Some(id) = id {
            self.segment_ids.insert(id, index);
        }
        self.routing.mark_dirty();
        Ok(index)
    }

    /// `create_segment(points, **metadata)`. `points.len() >= 2`.
    pub fn create_segment(
        &mut self,
        id: Option<String>,
        points: Vec<Point>,
        metadata: SegmentMetadata,
    ) -> Result<SegmentIndex, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::SegmentHasNoGeometry);
        }
        self.add_segment(id, Segment::from_points(points).with_metadata(metadata))
    }

    /// `create_quadratic_bezier_curve(start, control, end, **metadata)`.
    pub fn create_quadratic_bezier_curve(
        &mut self,
        id: Option<String>,
        start: Point,
        control: Point,
        end: Point,
        metadata: SegmentMetadata,
    ) -> Result<SegmentIndex, ConfigError> {
        self.add_segment(id, Segment::quadratic(start, control, end).with_metadata(metadata))
    }

    /// `create_cubic_bezier_curve(start, c1, c2, end, **metadata)`.
    pub fn create_cubic_bezier_curve(
        &mut self,
        id: Option<String>,
        start: Point,
        control_1: Point,
        control_2: Point,
        end: Point,
        metadata: SegmentMetadata,
    ) -> Result<SegmentIndex, ConfigError> {
        self.add_segment(id, Segment::cubic(start, control_1, control_2, end).with_metadata(metadata))
    }

    pub fn resolve_segment_id(&self, id: &str) -> Result<SegmentIndex, ConfigError> {
        self.segment_ids.get(id).copied().ok_or_else(|| ConfigError::UnknownSegmentId { id: id.to_string() })
    }

    /// Resolves a path between two segments through the routing graph.
    /// Exposed for callers (e.g. the `config` module) that need a path ahead
    /// of constructing the vehicle that will use it.
    pub fn resolve_path(&mut self, start: SegmentIndex, end: SegmentIndex) -> Result<Vec<SegmentIndex>, RoutingError> {
        self.routing.shortest_path(&self.segments, start, end)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `create_vehicle(...)`. Resolves `route.path` if non-empty, otherwise
    /// routes `start_segment -> end_segment` through the graph. Places the
    /// vehicle at `x=0` on its first segment.
    pub fn create_vehicle(
        &mut self,
        mut vehicle: Vehicle,
        route: VehicleRoute,
    ) -> Result<VehicleID, VehicleConstructionError> {
        let id = vehicle.id();
        let path = if !route.path.is_empty() {
            route.path
        } else {
            match (route.start_segment, route.end_segment) {
                (Some(start), Some(end)) => self.routing.shortest_path(&self.segments, start, end)?,
                _ => return Err(ConfigError::VehicleMissingRoute { vehicle_id: id }.into()),
            }
        };

        vehicle.set_path(path);
        vehicle.set_x(0.0);
        let first = vehicle.current_segment().expect("resolved path is non-empty");
        self.segments[first].push_tail(id);
        self.vehicles.insert_vehicle(vehicle);
        Ok(id)
    }

    /// `create_vehicle_generator(...)`.
    pub fn create_vehicle_generator(&mut self, generator: VehicleGenerator) {
        self.generators.push(generator);
    }

    /// `add_environment_object(obj)`. Carried opaquely, never interpreted.
    pub fn add_environment_object(&mut self, object: EnvironmentObject) {
        self.environment.push(object);
    }

    pub fn environment(&self) -> &[EnvironmentObject] {
        &self.environment
    }

    /// `add_event(ev)`.
    pub fn add_event(&mut self, event: Event) {
        self.events.add_event(event);
    }

    /// `add_junction(j)`.
    pub fn add_junction(&mut self, junction: Junction) {
        self.junctions.add_junction(junction);
    }

    // ----- snapshot API -------------------------------------------------

    pub fn vehicles(&self) -> &VehiclesStorage {
        &self.vehicles
    }

    /// Mutable access to a single vehicle, e.g. to seed `x`/`stopped` for a
    /// scenario once it has already been placed by `create_vehicle`.
    pub fn vehicle_mut(&mut self, id: VehicleID) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(&id)
    }

    pub fn events(&self) -> &EventTable {
        &self.events
    }

    pub fn junctions(&self) -> &JunctionTable {
        &self.junctions
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    // ----- control surface -------------------------------------------------

    /// Advances the simulation by `steps` fixed ticks.
    pub fn run(&mut self, steps: u32) {
        for _ in 0..steps {
            self.update();
        }
    }

    /// One fixed-timestep tick, in strict six-step order: advance junctions,
    /// refresh events, update vehicles, hand over, run generators, advance clock.
    pub fn update(&mut self) {
        if self.logger.is_at_least(VerboseLevel::Main) {
            self.logger.log_with_fields(EVENT_TICK, "tick start", &[("t", &self.t), ("frame", &self.frame_count)]);
        }

        self.junctions.advance(self.t);
        if self.logger.is_at_least(VerboseLevel::Additional) {
            self.logger.log(EVENT_JUNCTIONS_ADVANCE, "junctions advanced");
        }

        self.events.refresh(self.t, &self.segments);
        if self.logger.is_at_least(VerboseLevel::Additional) {
            self.logger.log(EVENT_EVENTS_REFRESH, "events refreshed");
        }

        self.update_vehicles();
        if self.logger.is_at_least(VerboseLevel::Additional) {
            self.logger.log(EVENT_VEHICLES_UPDATE, "vehicles updated");
        }

        self.handover();
        if self.logger.is_at_least(VerboseLevel::Additional) {
            self.logger.log(EVENT_HANDOVER, "handover complete");
        }

        self.run_generators();
        if self.logger.is_at_least(VerboseLevel::Additional) {
            self.logger.log(EVENT_GENERATE_VEHICLES, "generators ran");
        }

        self.t += self.dt;
        self.frame_count += 1;
    }

    fn update_vehicles(&mut self) {
        for seg_idx in 0..self.segments.len() {
            let queue_len = self.segments[seg_idx].vehicles().len();
            for position in 0..queue_len {
                let Some(&vehicle_id) = self.segments[seg_idx].vehicles().get(position) else { continue };
                let lead_id = self.segments[seg_idx].lead_of(position);

                let speed_factor = self.speed_factor_for(seg_idx, vehicle_id);

                let lead = lead_id.and_then(|id| self.vehicles.get(&id)).cloned();
                if let Some(vehicle) = self.vehicles.get_mut(&vehicle_id) {
                    vehicle.set_v_max(speed_factor);
                    vehicle.update(lead.as_ref(), self.dt);
                }
            }
        }
    }

    /// Combined `[0,1]` speed factor for `vehicle_id` on `segment`: the
    /// minimum of current-segment event lookahead, next-segment event
    /// lookahead, and the junction factor.
    fn speed_factor_for(&self, segment: SegmentIndex, vehicle_id: VehicleID) -> f64 {
        let Some(vehicle) = self.vehicles.get(&vehicle_id) else { return 1.0 };
        let seg = &self.segments[segment];
        let x = vehicle.x();

        let mut factor = 1.0_f64;

        for record in self.events.events_on(segment) {
            let ahead = record.pos - x;
            if (0.0..=EVENT_LOOKAHEAD).contains(&ahead) {
                factor = factor.min(record.factor);
            }
        }

        if let Some(next) = vehicle.next_segment() {
            let remaining = (seg.length() - x).max(0.0);
            for record in self.events.events_on(next) {
                if remaining + record.pos <= EVENT_LOOKAHEAD {
                    factor = factor.min(record.factor);
                }
            }
        }

        factor = factor.min(self.junctions.speed_factor(segment, x, &self.segments, &self.vehicles));
        factor
    }

    /// Moves every segment's head vehicle onto the next segment in its path
    /// once `x >= length`. A vehicle that has exhausted its path is popped
    /// from its last segment but stays in [`VehiclesStorage`] as a terminal vehicle.
    fn handover(&mut self) {
        for seg_idx in 0..self.segments.len() {
            let Some(head_id) = self.segments[seg_idx].head() else { continue };
            let Some(vehicle) = self.vehicles.get(&head_id) else { continue };
            if vehicle.x() < self.segments[seg_idx].length() {
                continue;
            }

            self.segments[seg_idx].pop_head();
            let Some(vehicle) = self.vehicles.get_mut(&head_id) else { continue };
            if vehicle.advance_to_next_segment() {
                if let Some(next) = vehicle.current_segment() {
                    self.segments[next].push_tail(head_id);
                }
            }
        }
    }

    fn run_generators(&mut self) {
        for generator_index in 0..self.generators.len() {
            let lead_segment = self.generators[generator_index].lead_segment();
            let next_id = self.next_vehicle_id;
            let emitted = self.generators[generator_index].tick(
                self.t,
                self.frame_count,
                next_id,
                &self.segments[lead_segment],
                &self.vehicles,
            );
            if let Some(vehicle) = emitted {
                let id = vehicle.id();
                self.segments[lead_segment].push_tail(id);
                self.vehicles.insert_vehicle(vehicle);
                self.next_vehicle_id += 1;
            }
        }
    }
}
