//! Junction configuration types.
//!
//! Approach *configuration* (`ApproachControl`, offset) is immutable after
//! construction. Live phase/timer state lives separately in
//! [`super::table::JunctionTable`]'s `approach_state` map, per the
//! mutable-dict-junction-phase redesign.

use crate::segment::SegmentIndex;

pub type JunctionID = u64;

/// Which half of a light's cycle is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Green,
    Red,
}

/// Immutable control discipline for one approach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApproachControl {
    Light { green: f64, red: f64 },
    Yield,
}

/// Live phase/timer state for a light approach. Has no meaning for a
/// `Yield` approach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseState {
    pub phase: Phase,
    pub phase_start: f64,
}

impl Default for PhaseState {
    fn default() -> Self {
        PhaseState { phase: Phase::Green, phase_start: 0.0 }
    }
}

/// One inbound segment at a junction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    pub segment_id: SegmentIndex,
    pub control: ApproachControl,
    /// Position along `segment_id`, `[0, 1]`.
    pub offset: f64,
}

/// A read-only view of an approach joined with its current phase state,
/// produced by [`super::table::JunctionTable::advance`]'s per-tick rebuild.
#[derive(Debug, Clone, Copy)]
pub struct ApproachView {
    pub junction_id: JunctionID,
    pub segment_id: SegmentIndex,
    pub control: ApproachControl,
    pub offset: f64,
    /// `Some` for `Light` approaches, `None` for `Yield`.
    pub phase_state: Option<PhaseState>,
}
