//! Prayer-window optimizer.
//!
//! Used when a prayer window is known but there is no fixed work wake-up to
//! pair it with. Every classified window overlapping the prayer window is a
//! candidate wake-up; an optional later deadline adds the cost of going back
//! to sleep in between.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::{hours_between, minutes_between, Interval};
use crate::cycle::StageKind;
use crate::intersection::{MIN_PREP_MINUTES, MIN_RESTFUL_SLEEP_HOURS};
use crate::interruption::{analyze_interruption, InterruptionResult, Severity};
use crate::wake::{QualityTier, WakeWindows};

const MAX_RECOMMENDATIONS: usize = 3;
const INTERRUPTION_PENALTY: i32 = 2;

fn tier_priority(tier: QualityTier) -> i32 {
    match tier {
        QualityTier::Best => 3,
        QualityTier::Okay => 2,
        QualityTier::Bad => 1,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WakeRecommendation {
    /// Earliest wake-up inside both the stage window and the prayer window
    pub wake_time: NaiveDateTime,
    pub latest_wake_time: NaiveDateTime,
    pub tier: QualityTier,
    pub stage: StageKind,
    pub cycle: u32,
    pub reason: &'static str,
    pub sleep_duration_hours: f64,
    pub minutes_to_deadline: Option<f64>,
    /// Outcome of sleeping again between this wake-up and the deadline
    pub interruption: Option<InterruptionResult>,
    pub feasible: bool,
    pub adjusted_priority: i32,
}

impl WakeRecommendation {
    fn badly_interrupted(&self) -> bool {
        self.interruption.is_some_and(|i| !i.acceptable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum OptimizationStatus {
    NoOverlap,
    NotViable { cycle_conflicts: bool },
    Optimal,
    Good,
    Acceptable,
    Problematic,
    AcceptableWithWarning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowOptimization {
    pub recommendations: Vec<WakeRecommendation>,
    pub total_sleep_hours: f64,
    pub has_viable_option: bool,
    pub schedule_viable: bool,
    pub status: OptimizationStatus,
}

/// Rank wake-ups inside a prayer window.
///
/// Ordering: candidates that would be cut off in deep sleep go last, then
/// infeasible ones; the rest by (penalized) tier priority and longer sleep.
///
/// Running the interruption model is not by itself disqualifying. Any
/// candidate it ran on loses two priority points, but only an
/// unacceptable interruption marks it infeasible or moves it to the end.
/// `has_viable_option` counts feasible candidates, so a deadline alone
/// never empties the schedule.
pub fn optimize_prayer_window(
    windows: &WakeWindows,
    prayer_window: &Interval,
    deadline: Option<NaiveDateTime>,
    bedtime: NaiveDateTime,
    cycle_length_minutes: i64,
) -> WindowOptimization {
    let mut recommendations: Vec<WakeRecommendation> = windows
        .iter()
        .filter_map(|w| {
            let overlap = w.interval.overlap(prayer_window)?;
            let wake_time = overlap.start();
            let minutes_to_deadline = deadline.map(|d| minutes_between(wake_time, d));
            let interruption = match (deadline, minutes_to_deadline) {
                (Some(d), Some(m)) if m > 0.0 => {
                    Some(analyze_interruption(wake_time, d, cycle_length_minutes))
                }
                _ => None,
            };
            let base_feasible = minutes_to_deadline.map_or(true, |m| m >= MIN_PREP_MINUTES);
            let feasible = base_feasible && interruption.map_or(true, |i| i.acceptable);
            let priority = tier_priority(w.tier);

            Some(WakeRecommendation {
                wake_time,
                latest_wake_time: overlap.end(),
                tier: w.tier,
                stage: w.stage,
                cycle: w.cycle,
                reason: w.reason,
                sleep_duration_hours: hours_between(bedtime, wake_time),
                minutes_to_deadline,
                interruption,
                feasible,
                adjusted_priority: if interruption.is_some() {
                    priority - INTERRUPTION_PENALTY
                } else {
                    priority
                },
            })
        })
        .collect();

    recommendations.sort_by(|a, b| {
        a.badly_interrupted()
            .cmp(&b.badly_interrupted())
            .then_with(|| b.feasible.cmp(&a.feasible))
            .then_with(|| b.adjusted_priority.cmp(&a.adjusted_priority))
            .then_with(|| b.sleep_duration_hours.total_cmp(&a.sleep_duration_hours))
    });

    let total_sleep_hours = recommendations
        .first()
        .map_or(0.0, |r| r.sleep_duration_hours);
    let has_viable_option = recommendations.iter().any(|r| r.feasible);
    let schedule_viable = total_sleep_hours >= MIN_RESTFUL_SLEEP_HOURS && has_viable_option;

    let status = match recommendations.first() {
        None => OptimizationStatus::NoOverlap,
        Some(_) if !schedule_viable => OptimizationStatus::NotViable {
            cycle_conflicts: recommendations
                .iter()
                .any(|r| r.interruption.is_some_and(|i| i.severity == Severity::High)),
        },
        Some(top) => match top.interruption.map(|i| i.severity) {
            Some(Severity::High) => OptimizationStatus::Problematic,
            Some(Severity::Medium) => OptimizationStatus::AcceptableWithWarning,
            Some(Severity::Low) => OptimizationStatus::Good,
            None => match top.tier {
                QualityTier::Best => OptimizationStatus::Optimal,
                QualityTier::Okay => OptimizationStatus::Good,
                QualityTier::Bad => OptimizationStatus::Acceptable,
            },
        },
    };

    tracing::debug!(
        candidates = recommendations.len(),
        ?status,
        "optimized wake-up inside prayer window"
    );

    recommendations.truncate(MAX_RECOMMENDATIONS);

    WindowOptimization {
        recommendations,
        total_sleep_hours,
        has_viable_option,
        schedule_viable,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::generate_cycles;
    use crate::wake::classify_stages;
    use chrono::NaiveDate;

    fn bedtime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap()
    }

    fn next_day(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn windows() -> WakeWindows {
        classify_stages(&generate_cycles(bedtime(), 90, 6).unwrap())
    }

    #[test]
    fn without_deadline_prefers_best_then_longer_sleep() {
        let prayer = Interval::new(next_day(4, 0), next_day(5, 30)).unwrap();
        let opt = optimize_prayer_window(&windows(), &prayer, None, bedtime(), 90);

        assert_eq!(opt.recommendations.len(), 3);
        let top = &opt.recommendations[0];
        assert_eq!(top.tier, QualityTier::Best);
        assert_eq!(top.stage, StageKind::Rem);
        assert_eq!(top.wake_time, next_day(5, 20));
        assert_eq!(opt.recommendations[1].stage, StageKind::EarlyLight);
        assert_eq!(opt.status, OptimizationStatus::Optimal);
        assert!(opt.schedule_viable);
        assert!((opt.total_sleep_hours - (7.0 + 20.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn short_night_is_not_viable() {
        let prayer = Interval::new(next_day(1, 0), next_day(2, 30)).unwrap();
        let opt = optimize_prayer_window(&windows(), &prayer, None, bedtime(), 90);
        assert_eq!(opt.status, OptimizationStatus::NotViable { cycle_conflicts: false });
        assert!(!opt.schedule_viable);
        assert!(opt.has_viable_option);
    }

    #[test]
    fn no_overlap() {
        let prayer = Interval::new(next_day(9, 0), next_day(9, 30)).unwrap();
        let opt = optimize_prayer_window(&windows(), &prayer, None, bedtime(), 90);
        assert_eq!(opt.status, OptimizationStatus::NoOverlap);
        assert!(opt.recommendations.is_empty());
        assert_eq!(opt.total_sleep_hours, 0.0);
    }

    #[test]
    fn deadline_runs_interruption_model() {
        // Wake 04:00 (cycle 5 early light), deadline 05:30: 90 min -> light -> fine
        let prayer = Interval::new(next_day(4, 0), next_day(4, 20)).unwrap();
        let opt = optimize_prayer_window(&windows(), &prayer, Some(next_day(5, 30)), bedtime(), 90);
        let top = &opt.recommendations[0];
        let interruption = top.interruption.unwrap();
        assert_eq!(interruption.severity, Severity::Low);
        assert!(top.feasible);
        assert_eq!(top.adjusted_priority, 1);
        assert!(opt.has_viable_option);
        assert_eq!(opt.status, OptimizationStatus::Good);
    }

    #[test]
    fn deadline_in_deep_sleep_is_a_conflict() {
        // Wake 04:00, deadline 06:00: 120 min -> 30 into a new cycle -> deep
        let prayer = Interval::new(next_day(4, 0), next_day(4, 20)).unwrap();
        let opt = optimize_prayer_window(&windows(), &prayer, Some(next_day(6, 0)), bedtime(), 90);
        assert!(!opt.has_viable_option);
        assert_eq!(opt.status, OptimizationStatus::NotViable { cycle_conflicts: true });
    }
}
