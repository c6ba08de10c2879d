//! A timed disruption bound to a position on a segment.

use crate::segment::SegmentIndex;

pub type EventID = u64;

/// One timed speed-factor disruption.
///
/// `end_time` is derived from `duration` when absent
/// (`start_time + duration`); an event with neither stays active forever
/// once started.
#[derive(Debug, Clone)]
pub struct Event {
    id: EventID,
    segment_id: SegmentIndex,
    /// Position along the segment, `[0, 1]`.
    offset: f64,
    start_time: f64,
    duration: Option<f64>,
    end_time: Option<f64>,
    /// Multiplier applied to a vehicle's effective speed cap, `[0, 1]`.
    speed_factor: f64,
    /// Opaque classification, carried but not interpreted by the core.
    event_type: Option<String>,
}

impl Event {
    pub fn new(id: EventID, segment_id: SegmentIndex, offset: f64, start_time: f64, speed_factor: f64) -> EventBuilder {
        EventBuilder {
            event: Event {
                id,
                segment_id,
                offset,
                start_time,
                duration: None,
                end_time: None,
                speed_factor,
                event_type: None,
            },
        }
    }

    pub fn id(&self) -> EventID {
        self.id
    }

    pub fn segment_id(&self) -> SegmentIndex {
        self.segment_id
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    /// Effective end time, deriving it from `duration` when `end_time` was
    /// not set explicitly.
    fn effective_end_time(&self) -> Option<f64> {
        self.end_time.or(self.duration.map(|d| self.start_time + d))
    }

    /// Whether this event is active at simulation time `t`.
    pub fn is_active(&self, t: f64) -> bool {
        if t < self.start_time {
            return false;
        }
        match self.effective_end_time() {
            Some(end) => t < end,
            None => true,
        }
    }
}

/// Builder for [`Event`]. See [`Event::new`].
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.event.duration = Some(duration);
        self
    }

    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.event.end_time = Some(end_time);
        self
    }

    pub fn with_type(mut self, event_type: impl Into<String>) -> Self {
        self.event.event_type = Some(event_type.into());
        self
    }

    pub fn build(self) -> Event {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_window_from_duration() {
        let ev = Event::new(1, 0, 0.5, 0.0, 0.3).with_duration(10.0).build();
        assert!(!ev.is_active(-0.1));
        assert!(ev.is_active(0.0));
        assert!(ev.is_active(9.99));
        assert!(!ev.is_active(10.0));
    }

    #[test]
    fn test_active_forever_without_end() {
        let ev = Event::new(1, 0, 0.5, 5.0, 0.3).build();
        assert!(!ev.is_active(4.9));
        assert!(ev.is_active(5.0));
        assert!(ev.is_active(1_000_000.0));
    }

    #[test]
    fn test_explicit_end_time_wins_over_duration() {
        let ev = Event::new(1, 0, 0.5, 0.0, 0.3).with_duration(10.0).with_end_time(3.0).build();
        assert!(ev.is_active(2.9));
        assert!(!ev.is_active(3.0));
    }
}
