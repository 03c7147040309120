//! Best wake window before a hard deadline.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::classify::{QualityTier, StageWindow, WakeWindows};

/// Window to wake in when there is a must-wake-by time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlineRecommendation {
    pub tier: QualityTier,
    pub window: StageWindow,
}

/// Pick the latest `Best` window that ends by `deadline`, falling back to the
/// latest `Okay` one. Deep-sleep windows are never recommended.
pub fn best_wake_before(windows: &WakeWindows, deadline: NaiveDateTime) -> Option<DeadlineRecommendation> {
    [QualityTier::Best, QualityTier::Okay]
        .into_iter()
        .find_map(|tier| {
            windows
                .bucket(tier)
                .iter()
                .filter(|w| w.interval.end() <= deadline)
                .max_by_key(|w| w.interval.end())
                .map(|w| DeadlineRecommendation { tier, window: *w })
        })
}
