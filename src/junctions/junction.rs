//! A junction: a fixed list of approaches sharing a conflict point.

use crate::junctions::types::{Approach, ApproachControl, JunctionID};
use crate::segment::SegmentIndex;

/// An intersection. Configuration-only — see [`crate::junctions::JunctionTable`]
/// for the mutable phase state this junction's light approaches carry.
#[derive(Debug, Clone)]
pub struct Junction {
    id: JunctionID,
    approaches: Vec<Approach>,
}

impl Junction {
    pub fn new(id: JunctionID) -> JunctionBuilder {
        JunctionBuilder { junction: Junction { id, approaches: Vec::new() } }
    }

    pub fn id(&self) -> JunctionID {
        self.id
    }

    pub fn approaches(&self) -> &[Approach] {
        &self.approaches
    }
}

/// Builder for [`Junction`]. See [`Junction::new`].
pub struct JunctionBuilder {
    junction: Junction,
}

impl JunctionBuilder {
    pub fn with_approach(mut self, segment_id: SegmentIndex, control: ApproachControl, offset: f64) -> Self {
        self.junction.approaches.push(Approach { segment_id, control, offset });
        self
    }

    pub fn build(self) -> Junction {
        self.junction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_appends_approaches() {
        let j = Junction::new(1)
            .with_approach(0, ApproachControl::Light { green: 30.0, red: 30.0 }, 0.5)
            .with_approach(2, ApproachControl::Yield, 0.5)
            .build();
        assert_eq!(j.approaches().len(), 2);
        assert_eq!(j.approaches()[0].segment_id, 0);
        assert_eq!(j.approaches()[1].segment_id, 2);
    }
}
