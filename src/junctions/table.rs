//! Phase advance, segment→approach mapping, and the per-vehicle slowdown
//! factor (light stop/slow zones, yield priority-to-the-right).

use crate::agents::VehiclesStorage;
use crate::junctions::junction::Junction;
use crate::junctions::types::{Approach, ApproachControl, ApproachView, JunctionID, Phase, PhaseState};
use crate::segment::{Segment, SegmentIndex};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Distance, meters, beyond which an approach imposes no slowdown at all.
const SLOW_ZONE: f64 = 40.0;
/// Base slowdown factor anywhere inside [`SLOW_ZONE`].
const SLOW_ZONE_FACTOR: f64 = 0.6;
/// Distance within which a red/yellow-controlled light approach is a full stop.
const LIGHT_STOP_DIST: f64 = 6.0;
const LIGHT_STOP_FACTOR: f64 = 0.0;
/// Distance within which a non-green light approach applies its slow factor.
const LIGHT_SLOW_DIST: f64 = 35.0;
const LIGHT_SLOW_FACTOR: f64 = 0.4;
/// Factor applied when another approach holds priority at a yield.
const YIELD_PRIORITY_FACTOR: f64 = 0.1;
/// Factor applied at a yield with no conflicting priority vehicle, inside the zone.
const YIELD_FACTOR: f64 = 0.2;
/// A vehicle already this far past the conflict point is ignored.
const PASSED_TOLERANCE: f64 = -2.0;
/// Window, ahead of the conflict point, in which another approach's lead
/// vehicle can claim priority.
const PRIORITY_WINDOW: f64 = 20.0;

/// Owns every junction's configuration plus the live, separately-mutable
/// phase state for each light approach.
#[derive(Debug, Default)]
pub struct JunctionTable {
    junctions: IndexMap<JunctionID, Junction>,
    approach_state: HashMap<(JunctionID, SegmentIndex), PhaseState>,
    segment_junctions: IndexMap<SegmentIndex, Vec<ApproachView>>,
}

impl JunctionTable {
    pub fn new() -> Self {
        JunctionTable::default()
    }

    /// Registers a junction, initialising light approaches to green with
    /// `phase_start = 0`.
    pub fn add_junction(&mut self, junction: Junction) {
        for approach in junction.approaches() {
            if let ApproachControl::Light { .. } = approach.control {
                self.approach_state
                    .entry((junction.id(), approach.segment_id))
                    .or_insert_with(PhaseState::default);
            }
        }
        self.junctions.insert(junction.id(), junction);
    }

    /// Advances every light approach's phase and rebuilds the
    /// segment→approach mapping. Called once per tick, before any vehicle
    /// update.
    pub fn advance(&mut self, t: f64) {
        for junction in self.junctions.values() {
            for approach in junction.approaches() {
                let ApproachControl::Light { green, red } = approach.control else { continue };
                let state = self
                    .approach_state
                    .get_mut(&(junction.id(), approach.segment_id))
                    .expect("light approach must have phase state");
                let elapsed = t - state.phase_start;
                match state.phase {
                    Phase::Green if elapsed >= green => {
                        state.phase = Phase::Red;
                        state.phase_start = t;
                    }
                    Phase::Red if elapsed >= red => {
                        state.phase = Phase::Green;
                        state.phase_start = t;
                    }
                    _ => {}
                }
            }
        }
        self.rebuild_segment_junctions();
    }

    fn rebuild_segment_junctions(&mut self) {
        self.segment_junctions.clear();
        for junction in self.junctions.values() {
            for approach in junction.approaches() {
                let phase_state = self.approach_state.get(&(junction.id(), approach.segment_id)).copied();
                let view = ApproachView {
                    junction_id: junction.id(),
                    segment_id: approach.segment_id,
                    control: approach.control,
                    offset: approach.offset,
                    phase_state,
                };
                self.segment_junctions.entry(approach.segment_id).or_default().push(view);
            }
        }
    }

    pub fn segment_approaches(&self, segment: SegmentIndex) -> &[ApproachView] {
        self.segment_junctions.get(&segment).map(Vec::as_slice).unwrap_or(&[])
    }

    fn approaches(&self, junction_id: JunctionID) -> &[Approach] {
        self.junctions.get(&junction_id).map(Junction::approaches).unwrap_or(&[])
    }

    fn phase_state(&self, junction_id: JunctionID, segment_id: SegmentIndex) -> Option<PhaseState> {
        self.approach_state.get(&(junction_id, segment_id)).copied()
    }

    /// Whether some other approach at `junction_id` currently has a lead
    /// vehicle close enough to, and angled to, claim priority over
    /// `self_segment`.
    fn has_vehicle_with_priority(
        &self,
        junction_id: JunctionID,
        self_segment: SegmentIndex,
        self_offset: f64,
        segments: &[Segment],
        vehicles: &VehiclesStorage,
    ) -> bool {
        let self_heading = segments[self_segment].heading(self_offset);
        for other in self.approaches(junction_id) {
            if other.segment_id == self_segment {
                continue;
            }
            if let ApproachControl::Light { .. } = other.control {
                if let Some(state) = self.phase_state(junction_id, other.segment_id) {
                    if state.phase == Phase::Red {
                        continue;
                    }
                }
            }
            let other_seg = &segments[other.segment_id];
            let Some(lead_id) = other_seg.head() else { continue };
            let Some(lead) = vehicles.get(&lead_id) else { continue };

            let dist_other = other.offset * other_seg.length() - lead.x();
            if !(PASSED_TOLERANCE..=PRIORITY_WINDOW).contains(&dist_other) {
                continue;
            }

            let other_heading = other_seg.heading(other.offset);
            let d = (other_heading - self_heading + PI).rem_euclid(TAU) - PI;
            if d > 0.0 && d < FRAC_PI_2 {
                return true;
            }
        }
        false
    }

    /// Combined junction slowdown factor for a vehicle at `vehicle_x` on
    /// `segment`, minimum over every approach bound to that segment.
    pub fn speed_factor(
        &self,
        segment: SegmentIndex,
        vehicle_x: f64,
        segments: &[Segment],
        vehicles: &VehiclesStorage,
    ) -> f64 {
        let mut factor = 1.0_f64;
        let seg_len = segments[segment].length();
        for view in self.segment_approaches(segment) {
            let has_priority = matches!(view.control, ApproachControl::Yield)
                && self.has_vehicle_with_priority(view.junction_id, segment, view.offset, segments, vehicles);
            factor = factor.min(approach_factor(view, seg_len, vehicle_x, has_priority));
        }
        factor
    }
}

fn approach_factor(view: &ApproachView, seg_len: f64, vehicle_x: f64, has_priority: bool) -> f64 {
    let dist_to = view.offset * seg_len - vehicle_x;
    if dist_to < PASSED_TOLERANCE {
        return 1.0;
    }

    let mut factor = 1.0_f64;
    if (0.0..=SLOW_ZONE).contains(&dist_to) {
        factor = factor.min(SLOW_ZONE_FACTOR);
    }

    match view.control {
        ApproachControl::Light { .. } => {
            let phase = view.phase_state.map(|s| s.phase).unwrap_or(Phase::Green);
            if phase != Phase::Green && dist_to >= 0.0 {
                if dist_to <= LIGHT_STOP_DIST {
                    factor = factor.min(LIGHT_STOP_FACTOR);
                } else if dist_to <= LIGHT_SLOW_DIST {
                    factor = factor.min(LIGHT_SLOW_FACTOR);
                }
            }
        }
        ApproachControl::Yield => {
            if dist_to >= 0.0 {
                if has_priority {
                    factor = factor.min(YIELD_PRIORITY_FACTOR);
                } else if dist_to < SLOW_ZONE {
                    factor = factor.min(YIELD_FACTOR);
                }
            }
        }
    }

    factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Vehicle;
    use crate::geom::Point;

    fn one_segment(len: f64) -> Vec<Segment> {
        vec![Segment::straight(Point::new(0.0, 0.0), Point::new(len, 0.0)).build()]
    }

    #[test]
    fn test_light_cycles_with_period_green_plus_red() {
        let mut table = JunctionTable::new();
        table.add_junction(
            Junction::new(1).with_approach(0, ApproachControl::Light { green: 30.0, red: 30.0 }, 0.5).build(),
        );
        table.advance(0.0);
        assert_eq!(table.phase_state(1, 0).unwrap().phase, Phase::Green);
        table.advance(30.0);
        assert_eq!(table.phase_state(1, 0).unwrap().phase, Phase::Red);
        table.advance(60.0);
        assert_eq!(table.phase_state(1, 0).unwrap().phase, Phase::Green);
    }

    #[test]
    fn test_red_light_full_stop_within_6m() {
        let segs = one_segment(100.0);
        let mut table = JunctionTable::new();
        table.add_junction(
            Junction::new(1).with_approach(0, ApproachControl::Light { green: 30.0, red: 30.0 }, 0.5).build(),
        );
        // Force red by setting initial state directly through an early advance past green.
        table.advance(0.0);
        table.advance(30.0); // flips to red at t=30
        let vehicles = VehiclesStorage::new();
        // conflict point is at offset 0.5 * 100 = 50; vehicle at x=44 -> dist_to=6
        let factor = table.speed_factor(0, 44.0, &segs, &vehicles);
        assert_eq!(factor, 0.0);
    }

    #[test]
    fn test_yield_priority_scales_to_point_one() {
        // self heading 0 (east); other heading pi/4 satisfies 0 < d < pi/2 directly.
        let mut seg_other = Segment::straight(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).build();
        let mut lead = Vehicle::new(1).build();
        lead.set_x(9.0); // conflict point at 0.5 * length(~14.14) ~= 7.07, dist_other is within [-2, 20]
        seg_other.push_tail(lead.id());
        let mut vehicles = VehiclesStorage::new();
        vehicles.insert_vehicle(lead);

        let segs = vec![Segment::straight(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).build(), seg_other];

        let mut table = JunctionTable::new();
        table.add_junction(
            Junction::new(1)
                .with_approach(0, ApproachControl::Yield, 0.5)
                .with_approach(1, ApproachControl::Yield, 0.5)
                .build(),
        );
        table.advance(0.0);

        let factor = table.speed_factor(0, 0.0, &segs, &vehicles);
        assert_eq!(factor, YIELD_PRIORITY_FACTOR);
    }

    #[test]
    fn test_yield_without_conflict_vehicle_uses_base_yield_factor() {
        let segs = one_segment(100.0);
        let mut table = JunctionTable::new();
        table.add_junction(Junction::new(1).with_approach(0, ApproachControl::Yield, 0.5).build());
        table.advance(0.0);
        let vehicles = VehiclesStorage::new();
        let factor = table.speed_factor(0, 20.0, &segs, &vehicles); // dist_to = 30
        assert_eq!(factor, YIELD_FACTOR);
    }
}
