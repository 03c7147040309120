//! Pairing engine.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::analysis::IntersectionAnalysis;
use super::pairing::Pairing;
use crate::clock::Interval;
use crate::cycle::Cycle;
use crate::wake::{canonical_windows, locate, QualityTier};

/// Pairings bucketed by combined tier, each bucket ordered by sleep duration
/// (longest first).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntersectionResult {
    pub best: Vec<Pairing>,
    pub okay: Vec<Pairing>,
    pub bad: Vec<Pairing>,
    /// Sleep of the shortest viable pairing (the earliest viable wake-up),
    /// or 0 when nothing is viable.
    pub total_sleep_time_hours: f64,
    /// Some non-Bad pairing leaves enough prep time before work.
    pub has_viable_options: bool,
    pub analysis: IntersectionAnalysis,
}

impl IntersectionResult {
    pub fn bucket(&self, tier: QualityTier) -> &[Pairing] {
        match tier {
            QualityTier::Best => &self.best,
            QualityTier::Okay => &self.okay,
            QualityTier::Bad => &self.bad,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pairing> {
        self.best.iter().chain(self.okay.iter()).chain(self.bad.iter())
    }

    pub fn total_options(&self) -> usize {
        self.best.len() + self.okay.len() + self.bad.len()
    }

    /// Whether alternative suggestions are worth showing: nothing viable, no
    /// Best pairing, or fewer than two non-Bad pairings.
    pub fn wants_alternatives(&self) -> bool {
        !self.has_viable_options || self.best.is_empty() || self.best.len() + self.okay.len() < 2
    }
}

/// Couple every stage window overlapping the prayer window with the stage the
/// work wake-up falls into.
///
/// The work side is located against the whole night, since it usually falls
/// in a later cycle than the prayer side. If the work instant is outside
/// every cycle no pairing is produced.
pub fn intersect(
    cycles: &[Cycle],
    prayer_window: &Interval,
    work_instant: NaiveDateTime,
    bedtime: NaiveDateTime,
) -> IntersectionResult {
    let mut best = Vec::new();
    let mut okay = Vec::new();
    let mut bad = Vec::new();

    match locate(work_instant, cycles) {
        Some(work) => {
            for cycle in cycles {
                for window in canonical_windows(cycle) {
                    let Some(overlap) = window.interval.overlap(prayer_window) else {
                        continue;
                    };
                    let pairing = Pairing::new(&window, overlap, work_instant, &work, bedtime);
                    match pairing.tier {
                        QualityTier::Best => best.push(pairing),
                        QualityTier::Okay => okay.push(pairing),
                        QualityTier::Bad => bad.push(pairing),
                    }
                }
            }
        }
        None => {
            tracing::warn!(%work_instant, "work time falls outside every generated cycle");
        }
    }

    let total_sleep_time_hours = best
        .iter()
        .chain(okay.iter())
        .chain(bad.iter())
        .filter(|p| p.viable)
        .map(|p| p.sleep_duration_hours)
        .min_by(f64::total_cmp)
        .unwrap_or(0.0);

    let has_viable_options = best.iter().chain(okay.iter()).any(|p| p.viable);

    for bucket in [&mut best, &mut okay, &mut bad] {
        bucket.sort_by(|a, b| b.sleep_duration_hours.total_cmp(&a.sleep_duration_hours));
    }

    let analysis = IntersectionAnalysis::evaluate(&best, &okay, &bad, total_sleep_time_hours);

    tracing::debug!(
        best = best.len(),
        okay = okay.len(),
        bad = bad.len(),
        status = ?analysis.status,
        "intersected prayer window with work time"
    );

    IntersectionResult {
        best,
        okay,
        bad,
        total_sleep_time_hours,
        has_viable_options,
        analysis,
    }
}
