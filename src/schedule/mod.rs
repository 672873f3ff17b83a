//! Slot scheduling: weighted selection, slot filling, and the serial and
//! speculative-parallel executors that assemble a complete deck.

pub mod executor;
pub mod plan;
pub mod select;

pub use executor::{Scheduler, SlotFill};
pub use plan::{
    RoundSummary, RunRequest, RunSummary, ScheduleConfig, ScheduleMode, ScheduleOutcome,
};
pub use select::{select_generator, slot_rng, weighted_candidates};
