//! Sleep cycle model.
//!
//! A night is a run of equal-length cycles starting at bedtime. Each cycle is
//! split into stages by a fixed proportional layout (see [`StageKind`]).

mod generator;
mod stage;

pub use generator::{
    generate_cycles, Cycle, CycleGenerator, Stage, DEFAULT_CYCLE_COUNT, MAX_CYCLE_COUNT, MAX_CYCLE_LENGTH_MINUTES,
};
pub use stage::{boundary_offset_minutes, StageKind};
