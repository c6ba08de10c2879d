//! Opaque segment attributes carried by the engine but never interpreted by
//! it — renderer/telemetry concerns only.

/// Attribute bag attached to a [`super::Segment`](crate::segment::Segment).
/// None of these fields influence simulation behaviour.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct SegmentMetadata {
    pub category: Option<String>,
    pub material: Option<String>,
    pub max_speed: Option<f64>,
    pub width: Option<f64>,
    pub color: Option<String>,
    pub direction_hint: Option<String>,
}
