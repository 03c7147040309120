//! Cycle generation from a bedtime.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::stage::{boundary_offset_minutes, StageKind};
use crate::clock::{add_minutes, Interval};
use crate::error::ValidationError;

/// Six cycles cover a typical night (9 hours at 90 minutes).
pub const DEFAULT_CYCLE_COUNT: usize = 6;

/// Longest accepted cycle. Keeps every stage offset inside chrono's range.
pub const MAX_CYCLE_LENGTH_MINUTES: i64 = 24 * 60;

/// Most cycles generated for one night.
pub const MAX_CYCLE_COUNT: usize = 24;

/// One stage inside a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub kind: StageKind,
    pub interval: Interval,
}

/// One full sleep cycle with its stage layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    index: u32,
    interval: Interval,
    stages: Vec<Stage>,
}

impl Cycle {
    /// 1-based position in the night.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn start(&self) -> NaiveDateTime {
        self.interval.start()
    }

    pub fn end(&self) -> NaiveDateTime {
        self.interval.end()
    }

    pub fn length_minutes(&self) -> i64 {
        self.interval.duration_minutes()
    }

    /// Stages in cycle order. Transition gaps appear only when non-empty.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, kind: StageKind) -> Option<&Stage> {
        self.stages.iter().find(|s| s.kind == kind)
    }
}

/// Builds the cycles of one night.
#[derive(Debug, Clone)]
pub struct CycleGenerator {
    cycle_length_minutes: i64,
    cycle_count: usize,
}

impl CycleGenerator {
    /// Create a generator for cycles of the given length (default count).
    pub fn new(cycle_length_minutes: i64) -> Result<Self, ValidationError> {
        if !(1..=MAX_CYCLE_LENGTH_MINUTES).contains(&cycle_length_minutes) {
            return Err(ValidationError::InvalidCycleLength {
                minutes: cycle_length_minutes,
            });
        }
        Ok(Self {
            cycle_length_minutes,
            cycle_count: DEFAULT_CYCLE_COUNT,
        })
    }

    /// Set the number of cycles to generate
    pub fn with_count(mut self, cycle_count: usize) -> Result<Self, ValidationError> {
        if !(1..=MAX_CYCLE_COUNT).contains(&cycle_count) {
            return Err(ValidationError::InvalidCycleCount { count: cycle_count });
        }
        self.cycle_count = cycle_count;
        Ok(self)
    }

    pub fn cycle_length_minutes(&self) -> i64 {
        self.cycle_length_minutes
    }

    /// Generate contiguous cycles starting at `bedtime`.
    pub fn generate(&self, bedtime: NaiveDateTime) -> Vec<Cycle> {
        let length = self.cycle_length_minutes;
        let mut cycles = Vec::with_capacity(self.cycle_count);
        let mut cycle_start = bedtime;

        for i in 0..self.cycle_count {
            let cycle_end = add_minutes(cycle_start, length);
            // length is in 1..=MAX_CYCLE_LENGTH_MINUTES, checked in new()
            let Some(interval) = Interval::new(cycle_start, cycle_end) else {
                break;
            };

            let stages = StageKind::ALL
                .iter()
                .filter_map(|&kind| {
                    let (from, to) = kind.fraction_span();
                    let start = add_minutes(cycle_start, boundary_offset_minutes(length, from));
                    let end = add_minutes(cycle_start, boundary_offset_minutes(length, to));
                    Interval::new(start, end).map(|interval| Stage { kind, interval })
                })
                .collect();

            cycles.push(Cycle {
                index: i as u32 + 1,
                interval,
                stages,
            });
            cycle_start = cycle_end;
        }

        tracing::debug!(
            cycles = cycles.len(),
            cycle_length_minutes = length,
            %bedtime,
            "generated sleep cycles"
        );
        cycles
    }
}

/// Convenience function: validate the inputs and generate the cycles.
pub fn generate_cycles(
    bedtime: NaiveDateTime,
    cycle_length_minutes: i64,
    cycle_count: usize,
) -> Result<Vec<Cycle>, ValidationError> {
    Ok(CycleGenerator::new(cycle_length_minutes)?
        .with_count(cycle_count)?
        .generate(bedtime))
}
