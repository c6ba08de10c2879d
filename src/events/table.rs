//! Per-tick derivation of active events into per-segment speed factors.

use crate::events::{Event, EventID};
use crate::segment::{Segment, SegmentIndex};
use indexmap::IndexMap;

/// One active event's absolute position and factor, recorded against a
/// segment for lookahead queries (see
/// [`crate::simulation::Simulation`]'s per-vehicle speed-factor pass).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEventRecord {
    pub pos: f64,
    pub factor: f64,
}

/// Holds registered events and the per-segment tables derived from the
/// currently-active subset. Rebuilt from scratch every tick by [`refresh`](Self::refresh).
#[derive(Debug, Default)]
pub struct EventTable {
    events: IndexMap<EventID, Event>,
    segment_event_factors: IndexMap<SegmentIndex, f64>,
    segment_events_by_idx: IndexMap<SegmentIndex, Vec<ActiveEventRecord>>,
}

impl EventTable {
    pub fn new() -> Self {
        EventTable {
            events: IndexMap::new(),
            segment_event_factors: IndexMap::new(),
            segment_events_by_idx: IndexMap::new(),
        }
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.insert(event.id(), event);
    }

    /// Clears and rebuilds the per-segment tables from the events active at
    /// time `t`. Overlapping events on the same segment merge by minimum
    /// factor — the most restrictive disruption wins.
    pub fn refresh(&mut self, t: f64, segments: &[Segment]) {
        self.segment_event_factors.clear();
        self.segment_events_by_idx.clear();

        for event in self.events.values() {
            if !event.is_active(t) {
                continue;
            }
            let Some(seg) = segments.get(event.segment_id()) else { continue };
            let pos = event.offset() * seg.length();
            let factor = event.speed_factor();

            let merged = self.segment_event_factors.entry(event.segment_id()).or_insert(1.0);
            *merged = merged.min(factor);

            self.segment_events_by_idx
                .entry(event.segment_id())
                .or_default()
                .push(ActiveEventRecord { pos, factor });
        }
    }

    /// Merged speed factor for a segment, `1.0` if no active event applies.
    pub fn factor_for(&self, segment: SegmentIndex) -> f64 {
        self.segment_event_factors.get(&segment).copied().unwrap_or(1.0)
    }

    /// Active event records on a segment, in registration order.
    pub fn events_on(&self, segment: SegmentIndex) -> &[ActiveEventRecord] {
        self.segment_events_by_idx.get(&segment).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::segment::Segment;

    fn one_segment() -> Vec<Segment> {
        vec![Segment::straight(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).build()]
    }

    #[test]
    fn test_single_active_event() {
        let segs = one_segment();
        let mut table = EventTable::new();
        table.add_event(Event::new(1, 0, 0.5, 0.0, 0.3).with_duration(10.0).build());
        table.refresh(1.0, &segs);
        assert_eq!(table.factor_for(0), 0.3);
        assert_eq!(table.events_on(0), &[ActiveEventRecord { pos: 50.0, factor: 0.3 }]);
    }

    #[test]
    fn test_overlapping_events_merge_by_minimum() {
        let segs = one_segment();
        let mut table = EventTable::new();
        table.add_event(Event::new(1, 0, 0.2, 0.0, 0.5).with_duration(10.0).build());
        table.add_event(Event::new(2, 0, 0.8, 0.0, 0.2).with_duration(10.0).build());
        table.refresh(1.0, &segs);
        assert_eq!(table.factor_for(0), 0.2);
    }

    #[test]
    fn test_refresh_is_idempotent_within_same_tick() {
        let segs = one_segment();
        let mut table = EventTable::new();
        table.add_event(Event::new(1, 0, 0.5, 0.0, 0.3).with_duration(10.0).build());
        table.refresh(1.0, &segs);
        let first = table.factor_for(0);
        table.refresh(1.0, &segs);
        assert_eq!(table.factor_for(0), first);
    }

    #[test]
    fn test_expired_event_clears_factor() {
        let segs = one_segment();
        let mut table = EventTable::new();
        table.add_event(Event::new(1, 0, 0.5, 0.0, 0.3).with_duration(10.0).build());
        table.refresh(10.0, &segs);
        assert_eq!(table.factor_for(0), 1.0);
    }
}
