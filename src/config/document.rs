//! Typed mirror of the JSON configuration schema.

use crate::agents::VehicleClass;
use crate::events::EventID;
use crate::junctions::JunctionID;
use crate::segment::SegmentIndex;
use serde::Deserialize;
use std::collections::HashMap;

/// A point, `[x, y]` in the JSON schema.
pub type PointArray = [f64; 2];

/// A segment reference: either its string `id` or a raw index into the
/// order segments were declared in. Segments without an `id` can only be
/// referenced by index.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SegmentRef {
    Id(String),
    Index(SegmentIndex),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SegmentConfig {
    #[serde(rename = "segment")]
    Straight(StraightSegmentConfig),
    Quadratic(QuadraticSegmentConfig),
    Cubic(CubicSegmentConfig),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StraightSegmentConfig {
    pub id: Option<String>,
    #[serde(default)]
    pub points: Vec<PointArray>,
    pub start: Option<PointArray>,
    pub end: Option<PointArray>,
    #[serde(flatten)]
    pub metadata: crate::segment::SegmentMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuadraticSegmentConfig {
    pub id: Option<String>,
    pub start: Option<PointArray>,
    pub end: Option<PointArray>,
    pub control: Option<PointArray>,
    #[serde(default)]
    pub auto_control: bool,
    #[serde(default = "default_control_scale")]
    pub control_scale: f64,
    #[serde(default = "default_control_offset")]
    pub control_offset: f64,
    pub connect_from: Option<String>,
    pub connect_to: Option<String>,
    #[serde(default)]
    pub connect_to_end: bool,
    #[serde(flatten)]
    pub metadata: crate::segment::SegmentMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CubicSegmentConfig {
    pub id: Option<String>,
    pub start: PointArray,
    pub control_1: PointArray,
    pub control_2: PointArray,
    pub end: PointArray,
    #[serde(flatten)]
    pub metadata: crate::segment::SegmentMetadata,
}

pub(crate) fn default_control_scale() -> f64 {
    0.35
}

pub(crate) fn default_control_offset() -> f64 {
    0.25
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleConfig {
    pub id: u64,
    #[serde(default)]
    pub vehicle_class: VehicleClass,
    pub color: Option<String>,
    pub shape: Option<String>,
    pub l: Option<f64>,
    pub s0: Option<f64>,
    #[serde(rename = "T")]
    pub t_headway: Option<f64>,
    pub v_max: Option<f64>,
    pub a_max: Option<f64>,
    pub b_max: Option<f64>,
    #[serde(default)]
    pub path: Vec<SegmentRef>,
    pub start_segment: Option<SegmentRef>,
    pub end_segment: Option<SegmentRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleTemplateConfig {
    #[serde(default)]
    pub vehicle_class: VehicleClass,
    pub color: Option<String>,
    pub shape: Option<String>,
    pub l: Option<f64>,
    pub s0: Option<f64>,
    #[serde(rename = "T")]
    pub t_headway: Option<f64>,
    pub v_max: Option<f64>,
    pub a_max: Option<f64>,
    pub b_max: Option<f64>,
    /// Explicit route past `lead_segment`. Wins over `end_segment`.
    #[serde(default)]
    pub path: Vec<SegmentRef>,
    /// Routed past `lead_segment` through the graph, if `path` is empty.
    pub end_segment: Option<SegmentRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleGeneratorConfig {
    pub index: u64,
    pub rate: f64,
    pub lead_segment: SegmentRef,
    /// `(weight, template)` pairs, mirroring the source's
    /// `"vehicles": [[weight, {...}], ...]` shape.
    pub vehicles: Vec<(f64, VehicleTemplateConfig)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub attributes: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    pub id: EventID,
    pub segment_id: SegmentRef,
    #[serde(default = "default_offset")]
    pub offset: f64,
    #[serde(default)]
    pub start_time: f64,
    pub duration: Option<f64>,
    pub end_time: Option<f64>,
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

fn default_offset() -> f64 {
    0.5
}

fn default_speed_factor() -> f64 {
    1.0
}

fn default_green_red() -> f64 {
    30.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApproachConfig {
    pub segment_id: SegmentRef,
    #[serde(rename = "type", default = "default_approach_type")]
    pub kind: String,
    #[serde(default = "default_offset")]
    pub offset: f64,
    #[serde(default = "default_green_red")]
    pub green: f64,
    #[serde(default = "default_green_red")]
    pub red: f64,
}

fn default_approach_type() -> String {
    "yield".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct JunctionConfig {
    pub id: JunctionID,
    pub approaches: Vec<ApproachConfig>,
}

/// Top-level JSON configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub segments: Vec<SegmentConfig>,
    #[serde(default)]
    pub vehicles: Vec<VehicleConfig>,
    #[serde(default)]
    pub vehicle_generators: Vec<VehicleGeneratorConfig>,
    #[serde(default)]
    pub environment: Vec<EnvironmentConfig>,
    #[serde(default)]
    pub events: Vec<EventConfig>,
    #[serde(default)]
    pub junctions: Vec<JunctionConfig>,
    #[serde(default)]
    pub ui: serde_json::Value,
}
