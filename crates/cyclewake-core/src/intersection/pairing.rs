use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::{hours_between, minutes_between, Interval};
use crate::cycle::StageKind;
use crate::wake::{QualityTier, StageMatch, StageWindow, WakeRegion};

/// Minimum minutes between the prayer wake-up and the work wake-up.
pub const MIN_PREP_MINUTES: f64 = 30.0;

/// Which of the two wake-ups a remark refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeSide {
    Prayer,
    Work,
}

/// Finer grade than the tier, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinedQuality {
    Poor,
    Acceptable,
    Good,
    Excellent,
}

impl CombinedQuality {
    fn grade(prayer: QualityTier, work: QualityTier) -> Self {
        match prayer.combine(work) {
            QualityTier::Best => Self::Excellent,
            QualityTier::Bad => Self::Poor,
            QualityTier::Okay if prayer == QualityTier::Best || work == QualityTier::Best => Self::Good,
            QualityTier::Okay => Self::Acceptable,
        }
    }
}

/// A candidate (prayer wake, work wake) combination. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pairing {
    pub prayer_overlap: Interval,
    pub work_instant: NaiveDateTime,
    pub prayer_cycle: u32,
    pub work_cycle: u32,
    pub tier: QualityTier,
    pub quality: CombinedQuality,
    pub prayer_stage: StageKind,
    pub work_region: WakeRegion,
    pub prayer_reason: &'static str,
    pub work_reason: &'static str,
    /// Set on `Bad` pairings: the side that wakes from deep sleep.
    pub deep_sleep_side: Option<WakeSide>,
    pub sleep_duration_hours: f64,
    pub minutes_prayer_to_work: f64,
    pub prayer_duration_minutes: i64,
    pub viable: bool,
}

impl Pairing {
    pub(crate) fn new(
        prayer_window: &StageWindow,
        prayer_overlap: Interval,
        work_instant: NaiveDateTime,
        work: &StageMatch,
        bedtime: NaiveDateTime,
    ) -> Self {
        let tier = prayer_window.tier.combine(work.tier);
        let deep_sleep_side = match tier {
            QualityTier::Bad if prayer_window.tier == QualityTier::Bad => Some(WakeSide::Prayer),
            QualityTier::Bad => Some(WakeSide::Work),
            _ => None,
        };
        let minutes_prayer_to_work = minutes_between(prayer_overlap.end(), work_instant);

        Self {
            prayer_overlap,
            work_instant,
            prayer_cycle: prayer_window.cycle,
            work_cycle: work.cycle,
            tier,
            quality: CombinedQuality::grade(prayer_window.tier, work.tier),
            prayer_stage: prayer_window.stage,
            work_region: work.region,
            prayer_reason: prayer_window.reason,
            work_reason: work.reason,
            deep_sleep_side,
            sleep_duration_hours: hours_between(bedtime, prayer_overlap.start()),
            minutes_prayer_to_work,
            prayer_duration_minutes: prayer_overlap.duration_minutes(),
            viable: minutes_prayer_to_work >= MIN_PREP_MINUTES,
        }
    }
}
