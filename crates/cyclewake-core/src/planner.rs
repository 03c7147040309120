//! Planning pipeline.
//!
//! Turns one set of wall-clock inputs into a complete night plan: the cycle
//! layout, classified wake windows and whichever analyses the supplied
//! constraints call for. This is the single entry point the CLI uses.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::{DayAnchor, Interval};
use crate::cycle::{Cycle, CycleGenerator, DEFAULT_CYCLE_COUNT};
use crate::error::{Result, ValidationError};
use crate::intersection::{
    intersect, rank_buckets, suggest_alternatives, Alternatives, IntersectionResult, IntersectionStatus,
    RankedBuckets, DEFAULT_PER_TIER_CAP, MIN_RESTFUL_SLEEP_HOURS,
};
use crate::optimizer::{optimize_prayer_window, OptimizationStatus, WindowOptimization};
use crate::wake::{
    analyze_fixed_target, best_wake_before, classify_stages, DeadlineRecommendation, FixedTargetAnalysis,
    WakeWindows,
};

/// Default cycle length in minutes.
pub const DEFAULT_CYCLE_LENGTH_MINUTES: i64 = 90;

/// A fixed prayer time is widened by this much on each side before pairing.
const FIXED_PRAYER_PADDING_MINUTES: i64 = 5;

/// How the prayer time is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrayerConstraint {
    #[default]
    None,
    Fixed(NaiveTime),
    Window { start: NaiveTime, end: NaiveTime },
}

/// Inputs for [`plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Calendar day the night starts on
    pub date: NaiveDate,
    pub bedtime: Option<NaiveTime>,
    pub cycle_length_minutes: i64,
    pub cycle_count: usize,
    pub prayer: PrayerConstraint,
    pub work_time: Option<NaiveTime>,
    pub must_wake_by: Option<NaiveTime>,
    pub per_tier_cap: usize,
}

impl PlanRequest {
    pub fn new(date: NaiveDate, bedtime: NaiveTime) -> Self {
        Self {
            date,
            bedtime: Some(bedtime),
            cycle_length_minutes: DEFAULT_CYCLE_LENGTH_MINUTES,
            cycle_count: DEFAULT_CYCLE_COUNT,
            prayer: PrayerConstraint::None,
            work_time: None,
            must_wake_by: None,
            per_tier_cap: DEFAULT_PER_TIER_CAP,
        }
    }

    pub fn with_cycles(mut self, length_minutes: i64, count: usize) -> Self {
        self.cycle_length_minutes = length_minutes;
        self.cycle_count = count;
        self
    }

    pub fn with_prayer(mut self, prayer: PrayerConstraint) -> Self {
        self.prayer = prayer;
        self
    }

    pub fn with_work_time(mut self, work_time: NaiveTime) -> Self {
        self.work_time = Some(work_time);
        self
    }

    pub fn with_must_wake_by(mut self, must_wake_by: NaiveTime) -> Self {
        self.must_wake_by = Some(must_wake_by);
        self
    }

    pub fn with_per_tier_cap(mut self, cap: usize) -> Self {
        self.per_tier_cap = cap;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedPrayerPlan {
    pub instant: NaiveDateTime,
    /// `None` when the prayer time is outside the night
    pub analysis: Option<FixedTargetAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntersectionPlan {
    pub prayer_window: Interval,
    pub work_time: NaiveDateTime,
    pub result: IntersectionResult,
    pub ranked: RankedBuckets,
    /// Only computed when the direct pairings are thin
    pub alternatives: Option<Alternatives>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadlinePlan {
    pub must_wake_by: NaiveDateTime,
    pub recommendation: Option<DeadlineRecommendation>,
}

/// Headline warning for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RealityCheck {
    NoIntersections,
    NoViable,
    InsufficientSleep { hours: f64 },
    NoPerfectAlignment,
    AllOptionsInterrupted,
    NoWindowBeforeDeadline,
}

impl RealityCheck {
    /// Critical checks mean the inputs cannot work as given.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::NoIntersections | Self::NoViable | Self::AllOptionsInterrupted)
    }
}

impl fmt::Display for RealityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoIntersections => f.write_str("No sleep stage lines up with the prayer window"),
            Self::NoViable => f.write_str("No combination of prayer and work wake-ups is workable"),
            Self::InsufficientSleep { hours } => {
                write!(f, "Only {hours:.1} hours of sleep before the first wake-up")
            }
            Self::NoPerfectAlignment => {
                f.write_str("No wake-up lands in an ideal stage on both sides")
            }
            Self::AllOptionsInterrupted => {
                f.write_str("Every wake-up cuts the following sleep off in deep sleep")
            }
            Self::NoWindowBeforeDeadline => {
                f.write_str("No light or REM window ends before the wake-by time")
            }
        }
    }
}

/// Everything computed for one night.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepPlan {
    pub bedtime: NaiveDateTime,
    pub cycle_length_minutes: i64,
    pub cycles: Vec<Cycle>,
    pub windows: WakeWindows,
    pub fixed_prayer: Option<FixedPrayerPlan>,
    pub intersection: Option<IntersectionPlan>,
    pub optimization: Option<WindowOptimization>,
    pub deadline: Option<DeadlinePlan>,
    pub reality_check: Option<RealityCheck>,
}

/// Prayer constraint after anchoring.
#[derive(Clone, Copy)]
enum AnchoredPrayer {
    None,
    Fixed(NaiveDateTime),
    Window(Interval),
}

fn anchor_prayer(anchor: &DayAnchor, bedtime: NaiveDateTime, prayer: PrayerConstraint) -> Result<AnchoredPrayer> {
    Ok(match prayer {
        PrayerConstraint::None => AnchoredPrayer::None,
        PrayerConstraint::Fixed(time) => AnchoredPrayer::Fixed(anchor.after(bedtime, time)),
        PrayerConstraint::Window { start, end } => {
            let start = anchor.after(bedtime, start);
            let end = anchor.after(bedtime, end);
            let window = Interval::new(start, end).ok_or(ValidationError::InvalidTimeRange { start, end })?;
            AnchoredPrayer::Window(window)
        }
    })
}

/// Run the whole pipeline for one request.
///
/// # Errors
///
/// Returns a validation error for a missing bedtime, a cycle length outside
/// one minute to one day, a cycle count outside 1 to 24 or a prayer window
/// that ends before it starts.
pub fn plan(request: &PlanRequest) -> Result<SleepPlan> {
    let bedtime_clock = request.bedtime.ok_or(ValidationError::MissingBedtime)?;
    let generator = CycleGenerator::new(request.cycle_length_minutes)?.with_count(request.cycle_count)?;

    let anchor = DayAnchor::new(request.date);
    let bedtime = anchor.bedtime(bedtime_clock);
    let prayer = anchor_prayer(&anchor, bedtime, request.prayer)?;
    let work_time = request.work_time.map(|t| anchor.after(bedtime, t));
    let must_wake_by = request.must_wake_by.map(|t| anchor.after(bedtime, t));

    let cycles = generator.generate(bedtime);
    let windows = classify_stages(&cycles);

    let fixed_prayer = match prayer {
        AnchoredPrayer::Fixed(instant) => Some(FixedPrayerPlan {
            instant,
            analysis: analyze_fixed_target(instant, &cycles),
        }),
        _ => None,
    };

    let prayer_window = match prayer {
        AnchoredPrayer::Fixed(instant) => Interval::around(instant, FIXED_PRAYER_PADDING_MINUTES),
        AnchoredPrayer::Window(window) => Some(window),
        AnchoredPrayer::None => None,
    };

    let intersection = match (prayer_window, work_time) {
        (Some(prayer_window), Some(work_time)) => {
            let result = intersect(&cycles, &prayer_window, work_time, bedtime);
            let ranked = rank_buckets(&result, &prayer_window, work_time, request.per_tier_cap);
            let alternatives = result
                .wants_alternatives()
                .then(|| suggest_alternatives(&cycles, &prayer_window, work_time, bedtime));
            Some(IntersectionPlan {
                prayer_window,
                work_time,
                result,
                ranked,
                alternatives,
            })
        }
        _ => None,
    };

    let optimization = match (&prayer, work_time) {
        (AnchoredPrayer::Window(window), None) => Some(optimize_prayer_window(
            &windows,
            window,
            must_wake_by,
            bedtime,
            request.cycle_length_minutes,
        )),
        _ => None,
    };

    let deadline = must_wake_by.map(|must_wake_by| DeadlinePlan {
        must_wake_by,
        recommendation: best_wake_before(&windows, must_wake_by),
    });

    let reality_check = reality_check(intersection.as_ref(), optimization.as_ref(), deadline.as_ref());

    tracing::debug!(
        %bedtime,
        cycles = cycles.len(),
        intersection = intersection.is_some(),
        optimization = optimization.is_some(),
        deadline = deadline.is_some(),
        ?reality_check,
        "planned night"
    );

    Ok(SleepPlan {
        bedtime,
        cycle_length_minutes: request.cycle_length_minutes,
        cycles,
        windows,
        fixed_prayer,
        intersection,
        optimization,
        deadline,
        reality_check,
    })
}

/// The first warning that applies, checked from the most to the least
/// severe source.
fn reality_check(
    intersection: Option<&IntersectionPlan>,
    optimization: Option<&WindowOptimization>,
    deadline: Option<&DeadlinePlan>,
) -> Option<RealityCheck> {
    if let Some(plan) = intersection {
        let result = &plan.result;
        match result.analysis.status {
            IntersectionStatus::NoIntersections => return Some(RealityCheck::NoIntersections),
            IntersectionStatus::NoViable => return Some(RealityCheck::NoViable),
            _ => {}
        }
        if result.total_sleep_time_hours < MIN_RESTFUL_SLEEP_HOURS {
            return Some(RealityCheck::InsufficientSleep {
                hours: result.total_sleep_time_hours,
            });
        }
        if result.best.is_empty() {
            return Some(RealityCheck::NoPerfectAlignment);
        }
    }

    if let Some(opt) = optimization {
        if opt.status == OptimizationStatus::NoOverlap {
            return Some(RealityCheck::NoIntersections);
        }
        if !opt.has_viable_option {
            return Some(RealityCheck::AllOptionsInterrupted);
        }
        if opt.total_sleep_hours < MIN_RESTFUL_SLEEP_HOURS {
            return Some(RealityCheck::InsufficientSleep {
                hours: opt.total_sleep_hours,
            });
        }
    }

    match deadline {
        Some(d) if d.recommendation.is_none() => Some(RealityCheck::NoWindowBeforeDeadline),
        _ => None,
    }
}
