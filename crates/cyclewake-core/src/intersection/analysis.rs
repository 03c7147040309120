//! Overall verdict for an intersection run.

use std::fmt;

use serde::Serialize;

use super::pairing::Pairing;

/// Below this much sleep the schedule is flagged regardless of cycle timing.
pub const MIN_RESTFUL_SLEEP_HOURS: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionStatus {
    /// No stage window overlaps the prayer window at all
    NoIntersections,
    /// Overlaps exist but none leaves a usable schedule
    NoViable,
    /// At least one Best pairing
    Optimal,
    /// Only viable Okay pairings
    Acceptable,
}

/// Advice attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    InsufficientSleep,
    AdjustPrayerWindow,
    ChangeBedtime,
    MoveWorkLater,
    SleepEarlier,
    StayAwakeAfterPrayer,
    AdjustWorkStart,
    BedEarlierForAlignment,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InsufficientSleep => {
                "You are getting less than 6 hours of sleep - this will cause fatigue regardless of cycle timing"
            }
            Self::AdjustPrayerWindow => "Adjust your prayer window",
            Self::ChangeBedtime => "Consider changing your bedtime",
            Self::MoveWorkLater => "Move work start time later if possible",
            Self::SleepEarlier => "Sleep earlier to allow for proper cycles",
            Self::StayAwakeAfterPrayer => "Stay awake after prayer instead of broken sleep",
            Self::AdjustWorkStart => "Adjust work start time if possible",
            Self::BedEarlierForAlignment => "Consider going to bed earlier for better cycle alignment",
        };
        f.write_str(text)
    }
}

/// Summary of one intersection run.
///
/// Status and counts cover every pairing in the full buckets. They are
/// computed before proximity ranking trims each bucket, so `total_options`
/// can exceed the number of ranked pairings shown per tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntersectionAnalysis {
    pub status: IntersectionStatus,
    pub suggestions: Vec<Suggestion>,
    pub total_options: usize,
    /// Best pairings plus viable Okay pairings
    pub viable_options: usize,
    pub best_options: usize,
}

impl IntersectionAnalysis {
    pub(crate) fn evaluate(
        best: &[Pairing],
        okay: &[Pairing],
        bad: &[Pairing],
        total_sleep_time_hours: f64,
    ) -> Self {
        let total_options = best.len() + okay.len() + bad.len();
        let viable_options = best.len() + okay.iter().filter(|p| p.viable).count();
        let best_options = best.len();

        let (status, mut suggestions) = if total_options == 0 {
            (
                IntersectionStatus::NoIntersections,
                vec![
                    Suggestion::AdjustPrayerWindow,
                    Suggestion::ChangeBedtime,
                    Suggestion::MoveWorkLater,
                ],
            )
        } else if viable_options == 0 {
            (
                IntersectionStatus::NoViable,
                vec![
                    Suggestion::SleepEarlier,
                    Suggestion::StayAwakeAfterPrayer,
                    Suggestion::AdjustWorkStart,
                ],
            )
        } else if best_options > 0 {
            (IntersectionStatus::Optimal, Vec::new())
        } else {
            (
                IntersectionStatus::Acceptable,
                vec![Suggestion::BedEarlierForAlignment],
            )
        };

        if total_sleep_time_hours < MIN_RESTFUL_SLEEP_HOURS {
            suggestions.insert(0, Suggestion::InsufficientSleep);
        }

        Self {
            status,
            suggestions,
            total_options,
            viable_options,
            best_options,
        }
    }
}
