//! Proximity ranking of pairings.
//!
//! Ranking happens inside one tier bucket at a time, so a closer `Okay`
//! pairing can never push a farther `Best` pairing out of view.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::engine::IntersectionResult;
use super::pairing::Pairing;
use crate::clock::{minutes_between, Interval};

/// Pairings kept per tier after ranking.
pub const DEFAULT_PER_TIER_CAP: usize = 3;

/// A pairing annotated with its distance to the requested targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPairing {
    #[serde(flatten)]
    pub pairing: Pairing,
    /// Minutes from the prayer-window center to the nearer overlap edge
    pub prayer_proximity_minutes: f64,
    /// Minutes between the pairing's work wake-up and the requested one
    pub work_proximity_minutes: f64,
    pub total_proximity_minutes: f64,
}

impl RankedPairing {
    fn score(pairing: &Pairing, prayer_center: NaiveDateTime, work_instant: NaiveDateTime) -> Self {
        let prayer_proximity_minutes = pairing.prayer_overlap.edge_distance_minutes(prayer_center);
        let work_proximity_minutes = minutes_between(work_instant, pairing.work_instant).abs();
        Self {
            pairing: pairing.clone(),
            prayer_proximity_minutes,
            work_proximity_minutes,
            total_proximity_minutes: prayer_proximity_minutes + work_proximity_minutes,
        }
    }
}

/// Score one bucket, order it closest-first and keep at most `cap` entries.
pub fn rank_by_proximity(
    bucket: &[Pairing],
    prayer_window: &Interval,
    work_instant: NaiveDateTime,
    cap: usize,
) -> Vec<RankedPairing> {
    let center = prayer_window.center();
    let mut ranked: Vec<RankedPairing> = bucket
        .iter()
        .map(|p| RankedPairing::score(p, center, work_instant))
        .collect();
    ranked.sort_by(|a, b| a.total_proximity_minutes.total_cmp(&b.total_proximity_minutes));
    ranked.truncate(cap);
    ranked
}

/// Ranked view of all three buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBuckets {
    pub best: Vec<RankedPairing>,
    pub okay: Vec<RankedPairing>,
    pub bad: Vec<RankedPairing>,
}

impl RankedBuckets {
    pub fn is_empty(&self) -> bool {
        self.best.is_empty() && self.okay.is_empty() && self.bad.is_empty()
    }
}

/// Rank every bucket of an intersection result independently.
pub fn rank_buckets(
    result: &IntersectionResult,
    prayer_window: &Interval,
    work_instant: NaiveDateTime,
    cap: usize,
) -> RankedBuckets {
    RankedBuckets {
        best: rank_by_proximity(&result.best, prayer_window, work_instant, cap),
        okay: rank_by_proximity(&result.okay, prayer_window, work_instant, cap),
        bad: rank_by_proximity(&result.bad, prayer_window, work_instant, cap),
    }
}
