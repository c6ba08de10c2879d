//! # Junctions Module
//!
//! Traffic-light phases and priority-to-the-right yields. Approach
//! *configuration* ([`types::Approach`]) is immutable once a [`Junction`] is
//! built; live phase/timer state lives in [`JunctionTable`]'s separate
//! `approach_state` map, rebuilt into a segment→approach view each tick by
//! [`JunctionTable::advance`].

mod junction;
mod table;
mod types;

pub use self::{
    junction::{Junction, JunctionBuilder},
    table::JunctionTable,
    types::{Approach, ApproachControl, ApproachView, JunctionID, Phase, PhaseState},
};
