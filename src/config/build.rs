//! Translates a [`ConfigDocument`] into a runnable [`Simulation`].
//!
//! Mirrors `trafficSimulator/config.py`'s `setup()`: segments first (so
//! later sections can resolve ids and auto-derive control points), then
//! vehicles, generators, environment objects, events and junctions, in that
//! order.

use crate::config::document::{
    ApproachConfig, ConfigDocument, EventConfig, JunctionConfig, SegmentConfig, SegmentRef, VehicleConfig,
    VehicleGeneratorConfig, VehicleTemplateConfig,
};
use crate::events::Event;
use crate::generators::{VehicleGenerator, VehicleTemplate};
use crate::geom::Point;
use crate::junctions::{ApproachControl, Junction};
use crate::segment::SegmentIndex;
use crate::simulation::{ConfigError, EnvironmentObject, Simulation, VehicleConstructionError, VehicleRoute};
use crate::agents::Vehicle;

/// Lateral/longitudinal offsets used by the `auto_control` heuristic,
/// matching `config.py`'s `_auto_quadratic_control`.
const AUTO_CONTROL_SCALE_FALLBACK: f64 = 0.35;
const AUTO_CONTROL_OFFSET_FALLBACK: f64 = 0.25;

/// Builds a fresh [`Simulation`] from a parsed configuration document.
pub fn build_simulation(doc: &ConfigDocument) -> Result<Simulation, VehicleConstructionError> {
    let mut sim = Simulation::new();

    build_segments(&mut sim, &doc.segments)?;
    build_vehicles(&mut sim, &doc.vehicles)?;
    build_generators(&mut sim, &doc.vehicle_generators)?;
    build_environment(&mut sim, &doc.environment);
    build_events(&mut sim, &doc.events)?;
    build_junctions(&mut sim, &doc.junctions)?;

    Ok(sim)
}

fn resolve_segment_ref(sim: &Simulation, r: &SegmentRef) -> Result<SegmentIndex, ConfigError> {
    match r {
        SegmentRef::Id(id) => sim.resolve_segment_id(id),
        SegmentRef::Index(index) => {
            if *index < sim.segments().len() {
                Ok(*index)
            } else {
                Err(ConfigError::UnknownSegmentId { id: format!("#{}", index) })
            }
        }
    }
}

fn to_point(p: [f64; 2]) -> Point {
    Point::new(p[0], p[1])
}

fn build_segments(sim: &mut Simulation, configs: &[SegmentConfig]) -> Result<(), ConfigError> {
    for config in configs {
        match config {
            SegmentConfig::Straight(s) => {
                let points: Vec<Point> = if !s.points.is_empty() {
                    s.points.iter().copied().map(to_point).collect()
                } else {
                    match (s.start, s.end) {
                        (Some(start), Some(end)) => vec![to_point(start), to_point(end)],
                        _ => return Err(ConfigError::SegmentHasNoGeometry),
                    }
                };
                sim.create_segment(s.id.clone(), points, s.metadata.clone())?;
            }
            SegmentConfig::Quadratic(q) => {
                let (start, start_heading) = resolve_quadratic_start(sim, q)?;
                let end = resolve_quadratic_end(sim, q)?;
                let control = if q.auto_control || q.control.is_none() {
                    auto_quadratic_control(start, end, start_heading, q.control_scale, q.control_offset)
                } else {
                    to_point(q.control.unwrap())
                };
                sim.create_quadratic_bezier_curve(q.id.clone(), start, control, end, q.metadata.clone())?;
            }
            SegmentConfig::Cubic(c) => {
                sim.create_cubic_bezier_curve(
                    c.id.clone(),
                    to_point(c.start),
                    to_point(c.control_1),
                    to_point(c.control_2),
                    to_point(c.end),
                    c.metadata.clone(),
                )?;
            }
        }
    }
    Ok(())
}

/// Resolves a quadratic segment's start point, and (if it connects onto an
/// existing segment) that segment's end heading — used by the `auto_control`
/// heuristic to keep the curve tangent-continuous.
fn resolve_quadratic_start(
    sim: &Simulation,
    q: &crate::config::document::QuadraticSegmentConfig,
) -> Result<(Point, Option<f64>), ConfigError> {
    if let Some(from_id) = &q.connect_from {
        let index = sim.resolve_segment_id(from_id)?;
        let seg = &sim.segments()[index];
        return Ok((seg.end_point(), Some(seg.heading(1.0))));
    }
    match q.start {
        Some(start) => Ok((to_point(start), None)),
        None => Err(ConfigError::SegmentHasNoGeometry),
    }
}

fn resolve_quadratic_end(
    sim: &Simulation,
    q: &crate::config::document::QuadraticSegmentConfig,
) -> Result<Point, ConfigError> {
    if let Some(to_id) = &q.connect_to {
        let index = sim.resolve_segment_id(to_id)?;
        let seg = &sim.segments()[index];
        return Ok(if q.connect_to_end { seg.end_point() } else { seg.start_point() });
    }
    q.end.map(to_point).ok_or(ConfigError::SegmentHasNoGeometry)
}

/// `ctrl = start + dir*dist*scale + normal*dist*offset`, where `dir`/`normal`
/// derive from the incoming segment's end heading when connected, or the
/// raw `start -> end` direction otherwise.
fn auto_quadratic_control(start: Point, end: Point, start_heading: Option<f64>, scale: f64, offset: f64) -> Point {
    let scale = if scale > 0.0 { scale } else { AUTO_CONTROL_SCALE_FALLBACK };
    let offset = if offset > 0.0 { offset } else { AUTO_CONTROL_OFFSET_FALLBACK };
    let dist = start.distance_to(&end);
    let heading = start_heading.unwrap_or_else(|| (end.y - start.y).atan2(end.x - start.x));
    let (dir_x, dir_y) = (heading.cos(), heading.sin());
    let (normal_x, normal_y) = (-dir_y, dir_x);
    Point::new(
        start.x + dir_x * dist * scale + normal_x * dist * offset,
        start.y + dir_y * dist * scale + normal_y * dist * offset,
    )
}

fn build_vehicles(sim: &mut Simulation, configs: &[VehicleConfig]) -> Result<(), VehicleConstructionError> {
    for v in configs {
        let mut builder = Vehicle::new(v.id).with_vehicle_class(v.vehicle_class);
        if let Some(l) = v.l {
            builder = builder.with_length(l);
        }
        if let Some(s0) = v.s0 {
            builder = builder.with_s0(s0);
        }
        if let Some(t) = v.t_headway {
            builder = builder.with_time_headway(t);
        }
        if let Some(v_max) = v.v_max {
            builder = builder.with_v_max(v_max);
        }
        if let Some(a_max) = v.a_max {
            builder = builder.with_a_max(a_max);
        }
        if let Some(b_max) = v.b_max {
            builder = builder.with_b_max(b_max);
        }
        if let Some(color) = &v.color {
            builder = builder.with_color(color.clone());
        }
        if let Some(shape) = &v.shape {
            builder = builder.with_shape(shape.clone());
        }

        let mut path = Vec::with_capacity(v.path.len());
        for r in &v.path {
            path.push(resolve_segment_ref(sim, r)?);
        }
        let start_segment = v.start_segment.as_ref().map(|r| resolve_segment_ref(sim, r)).transpose()?;
        let end_segment = v.end_segment.as_ref().map(|r| resolve_segment_ref(sim, r)).transpose()?;

        sim.create_vehicle(builder.build(), VehicleRoute { path, start_segment, end_segment })?;
    }
    Ok(())
}

fn vehicle_template_from_config(cfg: &VehicleTemplateConfig, path: Vec<SegmentIndex>) -> VehicleTemplate {
    let defaults = VehicleTemplate::default();
    VehicleTemplate {
        vehicle_class: cfg.vehicle_class,
        l: cfg.l.unwrap_or(defaults.l),
        s0: cfg.s0.unwrap_or(defaults.s0),
        t_headway: cfg.t_headway.unwrap_or(defaults.t_headway),
        v_max: cfg.v_max.unwrap_or(defaults.v_max),
        a_max: cfg.a_max.unwrap_or(defaults.a_max),
        b_max: cfg.b_max.unwrap_or(defaults.b_max),
        color: cfg.color.clone(),
        shape: cfg.shape.clone(),
        path,
    }
}

fn build_generators(sim: &mut Simulation, configs: &[VehicleGeneratorConfig]) -> Result<(), VehicleConstructionError> {
    for g in configs {
        let lead_segment = resolve_segment_ref(sim, &g.lead_segment)?;
        let mut builder = VehicleGenerator::new(g.index, g.rate, lead_segment);
        for (weight, template_cfg) in &g.vehicles {
            let path = resolve_template_path(sim, lead_segment, template_cfg)?;
            builder = builder.with_template(*weight, vehicle_template_from_config(template_cfg, path));
        }
        sim.create_vehicle_generator(builder.build());
    }
    Ok(())
}

/// A generator's templates place a vehicle at `x=0` on `lead_segment`; an
/// explicit `path`/`end_segment` in the template extends it beyond that
/// single segment.
fn resolve_template_path(
    sim: &mut Simulation,
    lead_segment: SegmentIndex,
    cfg: &VehicleTemplateConfig,
) -> Result<Vec<SegmentIndex>, VehicleConstructionError> {
    if !cfg.path.is_empty() {
        let mut path = Vec::with_capacity(cfg.path.len());
        for r in &cfg.path {
            path.push(resolve_segment_ref(sim, r)?);
        }
        return Ok(path);
    }
    if let Some(end_ref) = &cfg.end_segment {
        let end = resolve_segment_ref(sim, end_ref)?;
        return Ok(sim.resolve_path(lead_segment, end)?);
    }
    Ok(vec![lead_segment])
}

fn build_environment(sim: &mut Simulation, configs: &[crate::config::document::EnvironmentConfig]) {
    for e in configs {
        sim.add_environment_object(EnvironmentObject { kind: e.kind.clone(), attributes: e.attributes.clone() });
    }
}

fn build_events(sim: &mut Simulation, configs: &[EventConfig]) -> Result<(), ConfigError> {
    for e in configs {
        let segment_id = resolve_segment_ref(sim, &e.segment_id)?;
        let mut builder = Event::new(e.id, segment_id, e.offset, e.start_time, e.speed_factor);
        if let Some(duration) = e.duration {
            builder = builder.with_duration(duration);
        }
        if let Some(end_time) = e.end_time {
            builder = builder.with_end_time(end_time);
        }
        if let Some(event_type) = &e.event_type {
            builder = builder.with_type(event_type.clone());
        }
        sim.add_event(builder.build());
    }
    Ok(())
}

fn build_junctions(sim: &mut Simulation, configs: &[JunctionConfig]) -> Result<(), ConfigError> {
    for j in configs {
        let mut builder = Junction::new(j.id);
        for approach in &j.approaches {
            let segment_id = resolve_segment_ref(sim, &approach.segment_id)?;
            builder = builder.with_approach(segment_id, approach_control(approach), approach.offset);
        }
        sim.add_junction(builder.build());
    }
    Ok(())
}

fn approach_control(approach: &ApproachConfig) -> ApproachControl {
    if approach.kind == "light" {
        ApproachControl::Light { green: approach.green, red: approach.red }
    } else {
        ApproachControl::Yield
    }
}
