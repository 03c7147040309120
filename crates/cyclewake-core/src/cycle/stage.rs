use serde::{Deserialize, Serialize};

/// A named portion of one sleep cycle.
///
/// The split is fixed: 22% early light, 6% transition, 39% deep, 11% late
/// light, 11% REM preparation, 11% REM. Boundaries are rounded to whole
/// minutes from the cycle start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    EarlyLight,
    TransitionToDeep,
    Deep,
    LateLight,
    RemPrep,
    Rem,
}

impl StageKind {
    /// All stages in cycle order.
    pub const ALL: [StageKind; 6] = [
        StageKind::EarlyLight,
        StageKind::TransitionToDeep,
        StageKind::Deep,
        StageKind::LateLight,
        StageKind::RemPrep,
        StageKind::Rem,
    ];

    /// Start and end of the stage as fractions of the cycle length.
    pub fn fraction_span(self) -> (f64, f64) {
        match self {
            Self::EarlyLight => (0.0, 0.22),
            Self::TransitionToDeep => (0.22, 0.28),
            Self::Deep => (0.28, 0.67),
            Self::LateLight => (0.67, 0.78),
            Self::RemPrep => (0.78, 0.89),
            Self::Rem => (0.89, 1.0),
        }
    }

    /// Gaps between named stages; only materialized when non-empty.
    pub fn is_transition(self) -> bool {
        matches!(self, Self::TransitionToDeep | Self::RemPrep)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::EarlyLight => "Early Light Sleep",
            Self::TransitionToDeep => "Transition to Deep Sleep",
            Self::Deep => "Deep Sleep",
            Self::LateLight => "Late Light Sleep",
            Self::RemPrep => "REM Preparation",
            Self::Rem => "REM/End of Cycle",
        }
    }
}

/// Minutes from cycle start to the boundary at `fraction`.
pub fn boundary_offset_minutes(cycle_length_minutes: i64, fraction: f64) -> i64 {
    (cycle_length_minutes as f64 * fraction).round() as i64
}
