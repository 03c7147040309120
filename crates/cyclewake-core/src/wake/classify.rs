//! Stage-to-tier mapping and the per-night window buckets.

use serde::{Deserialize, Serialize};

use crate::clock::Interval;
use crate::cycle::{Cycle, StageKind};

/// How groggy waking up is expected to be. Ordered `Bad < Okay < Best`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Bad,
    Okay,
    Best,
}

impl QualityTier {
    /// Tier of waking inside a stage. Fixed; not configurable.
    pub fn for_stage(kind: StageKind) -> Self {
        match kind {
            StageKind::EarlyLight | StageKind::Rem => Self::Best,
            StageKind::LateLight | StageKind::TransitionToDeep | StageKind::RemPrep => Self::Okay,
            StageKind::Deep => Self::Bad,
        }
    }

    /// Combine the prayer-side and work-side tiers of a pairing.
    ///
    /// Both sides must be `Best` for a `Best` pairing; one `Bad` side makes
    /// the pairing `Bad`; anything else is `Okay`.
    pub fn combine(self, other: QualityTier) -> QualityTier {
        match (self, other) {
            (Self::Best, Self::Best) => Self::Best,
            (Self::Bad, _) | (_, Self::Bad) => Self::Bad,
            _ => Self::Okay,
        }
    }
}

/// A tagged sub-interval of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageWindow {
    pub cycle: u32,
    pub interval: Interval,
    pub tier: QualityTier,
    pub stage: StageKind,
    pub reason: &'static str,
}

pub(crate) fn stage_reason(kind: StageKind) -> &'static str {
    match kind {
        StageKind::EarlyLight => "Early light sleep - natural wake window",
        StageKind::TransitionToDeep => "Transition to deep sleep",
        StageKind::Deep => "Deep sleep - high grogginess risk",
        StageKind::LateLight => "Late light sleep - pre-REM window",
        StageKind::RemPrep => "REM preparation phase",
        StageKind::Rem => "End of cycle - REM completion",
    }
}

/// Order in which a cycle's windows are enumerated: the named stages first,
/// then the transition gaps.
const ENUMERATION_ORDER: [StageKind; 6] = [
    StageKind::EarlyLight,
    StageKind::Deep,
    StageKind::LateLight,
    StageKind::Rem,
    StageKind::TransitionToDeep,
    StageKind::RemPrep,
];

/// The wake windows of a single cycle.
pub fn canonical_windows(cycle: &Cycle) -> Vec<StageWindow> {
    ENUMERATION_ORDER
        .iter()
        .filter_map(|&kind| cycle.stage(kind))
        .map(|stage| StageWindow {
            cycle: cycle.index(),
            interval: stage.interval,
            tier: QualityTier::for_stage(stage.kind),
            stage: stage.kind,
            reason: stage_reason(stage.kind),
        })
        .collect()
}

/// All wake windows of a night, bucketed by tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WakeWindows {
    pub best: Vec<StageWindow>,
    pub okay: Vec<StageWindow>,
    pub worst: Vec<StageWindow>,
}

impl WakeWindows {
    pub fn bucket(&self, tier: QualityTier) -> &[StageWindow] {
        match tier {
            QualityTier::Best => &self.best,
            QualityTier::Okay => &self.okay,
            QualityTier::Bad => &self.worst,
        }
    }

    /// Every window, best bucket first.
    pub fn iter(&self) -> impl Iterator<Item = &StageWindow> {
        self.best.iter().chain(self.okay.iter()).chain(self.worst.iter())
    }

    pub fn len(&self) -> usize {
        self.best.len() + self.okay.len() + self.worst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify every cycle's stages into tier buckets.
pub fn classify_stages(cycles: &[Cycle]) -> WakeWindows {
    let mut windows = WakeWindows::default();
    for cycle in cycles {
        for window in canonical_windows(cycle) {
            match window.tier {
                QualityTier::Best => windows.best.push(window),
                QualityTier::Okay => windows.okay.push(window),
                QualityTier::Bad => windows.worst.push(window),
            }
        }
    }
    windows
}
