//! # Events Module
//!
//! Timed disruptions that lower a segment's effective speed cap for a
//! window of simulation time. Each tick, [`EventTable::refresh`] derives the
//! active subset and merges overlapping events by minimum factor — the most
//! restrictive disruption always wins.

mod event;
mod table;

pub use self::{event::{Event, EventBuilder, EventID}, table::{ActiveEventRecord, EventTable}};
