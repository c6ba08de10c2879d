//! Rate-limited vehicle emission onto a lead segment.

use crate::agents::{Vehicle, VehicleID, VehiclesStorage};
use crate::generators::template::VehicleTemplate;
use crate::segment::{Segment, SegmentIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Emits vehicles onto `lead_segment` at `rate` vehicles/minute, sampling a
/// template by weight each time it fires. Silently skips an emission when
/// the lead segment's tail vehicle (the one closest to the start) is too
/// close to the start.
#[derive(Debug, Clone)]
pub struct VehicleGenerator {
    index: u64,
    templates: Vec<(f64, VehicleTemplate)>,
    rate: f64,
    lead_segment: SegmentIndex,
    last_emission_time: f64,
}

impl VehicleGenerator {
    /// `index` seeds this generator's deterministic PRNG together with the
    /// current frame count, so template selection is reproducible from
    /// simulation state alone.
    pub fn new(index: u64, rate: f64, lead_segment: SegmentIndex) -> VehicleGeneratorBuilder {
        VehicleGeneratorBuilder {
            generator: VehicleGenerator {
                index,
                templates: Vec::new(),
                rate,
                lead_segment,
                last_emission_time: f64::NEG_INFINITY,
            },
        }
    }

    pub fn lead_segment(&self) -> SegmentIndex {
        self.lead_segment
    }

    /// Attempts one emission. Returns the materialised vehicle on success;
    /// the caller is responsible for placing it into segment/vehicle
    /// storage. `next_id` is the id to assign if a vehicle is emitted.
    pub fn tick(
        &mut self,
        t: f64,
        frame_count: u64,
        next_id: VehicleID,
        lead_segment: &Segment,
        vehicles: &VehiclesStorage,
    ) -> Option<Vehicle> {
        if self.templates.is_empty() || self.rate <= 0.0 {
            return None;
        }
        if t - self.last_emission_time < 60.0 / self.rate {
            return None;
        }

        let mut rng = StdRng::seed_from_u64(seed_for(self.index, frame_count));
        let template = choose_template(&self.templates, &mut rng);

        if let Some(tail_id) = lead_segment.tail() {
            if let Some(tail) = vehicles.get(&tail_id) {
                if tail.x() < template.s0 + template.l {
                    return None;
                }
            }
        }

        self.last_emission_time = t;
        Some(template.materialize(next_id))
    }
}

fn seed_for(index: u64, frame_count: u64) -> u64 {
    index.wrapping_mul(0x9E3779B97F4A7C15).wrapping_add(frame_count)
}

fn choose_template<'a>(templates: &'a [(f64, VehicleTemplate)], rng: &mut impl Rng) -> &'a VehicleTemplate {
    let total: f64 = templates.iter().map(|(weight, _)| weight).sum();
    let mut pick = rng.random::<f64>() * total;
    for (weight, template) in templates {
        if pick < *weight {
            return template;
        }
        pick -= weight;
    }
    &templates.last().expect("at least one template").1
}

/// Builder for [`VehicleGenerator`]. See [`VehicleGenerator::new`].
pub struct VehicleGeneratorBuilder {
    generator: VehicleGenerator,
}

impl VehicleGeneratorBuilder {
    pub fn with_template(mut self, weight: f64, template: VehicleTemplate) -> Self {
        self.generator.templates.push((weight, template));
        self
    }

    pub fn build(self) -> VehicleGenerator {
        self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn segment() -> Segment {
        Segment::straight(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).build()
    }

    #[test]
    fn test_no_emission_before_rate_interval_elapsed() {
        let mut gen = VehicleGenerator::new(0, 60.0, 0).with_template(1.0, VehicleTemplate::default()).build();
        let seg = segment();
        let vehicles = VehiclesStorage::new();
        assert!(gen.tick(0.0, 0, 1, &seg, &vehicles).is_some());
        assert!(gen.tick(0.1, 1, 2, &seg, &vehicles).is_none());
    }

    #[test]
    fn test_emission_blocked_by_insufficient_gap() {
        let mut gen = VehicleGenerator::new(0, 60.0, 0).with_template(1.0, VehicleTemplate::default()).build();
        let mut seg = segment();
        let mut head = Vehicle::new(1).build();
        head.set_x(2.0); // closer than s0 + l = 8
        seg.push_tail(head.id());
        let mut vehicles = VehiclesStorage::new();
        vehicles.insert_vehicle(head);
        assert!(gen.tick(0.0, 0, 2, &seg, &vehicles).is_none());
    }

    #[test]
    fn test_emission_allowed_with_sufficient_gap() {
        let mut gen = VehicleGenerator::new(0, 60.0, 0).with_template(1.0, VehicleTemplate::default()).build();
        let mut seg = segment();
        let mut head = Vehicle::new(1).build();
        head.set_x(50.0);
        seg.push_tail(head.id());
        let mut vehicles = VehiclesStorage::new();
        vehicles.insert_vehicle(head);
        assert!(gen.tick(0.0, 0, 2, &seg, &vehicles).is_some());
    }

    #[test]
    fn test_emission_checks_tail_not_head_with_multiple_vehicles() {
        let mut gen = VehicleGenerator::new(0, 60.0, 0).with_template(1.0, VehicleTemplate::default()).build();
        let mut seg = segment();
        let mut head = Vehicle::new(1).build();
        head.set_x(90.0); // head is far down the segment
        let mut tail = Vehicle::new(2).build();
        tail.set_x(2.0); // tail is closer than s0 + l = 8 to the start
        seg.push_tail(head.id());
        seg.push_tail(tail.id());
        let mut vehicles = VehiclesStorage::new();
        vehicles.insert_vehicle(head);
        vehicles.insert_vehicle(tail);
        assert!(gen.tick(0.0, 0, 3, &seg, &vehicles).is_none());
    }
}
