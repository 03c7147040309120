//! Cycle-interruption model.
//!
//! Predicts how a second sleep attempt, started at `onset` and running until a
//! fixed deadline, gets cut off: the deadline's position inside the cycle that
//! would be in progress decides the severity.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::minutes_between;

/// Below this many minutes no cycle structure forms at all.
pub const MIN_MEANINGFUL_SLEEP_MINUTES: f64 = 70.0;

const LIGHT_FRACTION_LIMIT: f64 = 0.22;
const DEEP_FRACTION_LIMIT: f64 = 0.67;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Coarse stage the deadline cuts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptedStage {
    Light,
    Deep,
    Rem,
}

/// How loudly to warn about an interruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionAdvisory {
    /// Too little time; stay awake instead
    Critical,
    /// Deadline lands in deep sleep
    Warning,
    /// Deadline lands in REM
    Caution,
    /// Deadline lands in light sleep
    Fine,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterruptionResult {
    pub severity: Severity,
    /// `None` when there is not enough time for a cycle to matter
    pub stage_at_event: Option<InterruptedStage>,
    pub acceptable: bool,
    pub available_minutes: f64,
    pub cycle_progress_minutes: Option<f64>,
    pub fraction: Option<f64>,
}

impl InterruptionResult {
    pub fn advisory(&self) -> InterruptionAdvisory {
        match (self.stage_at_event, self.severity) {
            (None, _) => InterruptionAdvisory::Critical,
            (Some(_), Severity::High) => InterruptionAdvisory::Warning,
            (Some(_), Severity::Medium) => InterruptionAdvisory::Caution,
            (Some(_), Severity::Low) => InterruptionAdvisory::Fine,
        }
    }
}

/// Analyze a nap from `onset` that must end at `next_event`.
///
/// `cycle_length_minutes` must be positive; callers validate it upstream.
pub fn analyze_interruption(
    onset: NaiveDateTime,
    next_event: NaiveDateTime,
    cycle_length_minutes: i64,
) -> InterruptionResult {
    let available_minutes = minutes_between(onset, next_event);

    if available_minutes < MIN_MEANINGFUL_SLEEP_MINUTES || cycle_length_minutes <= 0 {
        return InterruptionResult {
            severity: Severity::High,
            stage_at_event: None,
            acceptable: false,
            available_minutes,
            cycle_progress_minutes: None,
            fraction: None,
        };
    }

    let cycle_length = cycle_length_minutes as f64;
    let progress = available_minutes.rem_euclid(cycle_length);
    let fraction = progress / cycle_length;

    let (stage, severity, acceptable) = if fraction <= LIGHT_FRACTION_LIMIT {
        (InterruptedStage::Light, Severity::Low, true)
    } else if fraction <= DEEP_FRACTION_LIMIT {
        (InterruptedStage::Deep, Severity::High, false)
    } else {
        (InterruptedStage::Rem, Severity::Medium, true)
    };

    InterruptionResult {
        severity,
        stage_at_event: Some(stage),
        acceptable,
        available_minutes,
        cycle_progress_minutes: Some(progress),
        fraction: Some(fraction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::add_minutes;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn twenty_minutes_is_high_and_unacceptable() {
        let r = analyze_interruption(at(5, 10), at(5, 30), 90);
        assert_eq!(r.available_minutes, 20.0);
        assert_eq!(r.severity, Severity::High);
        assert!(!r.acceptable);
        assert!(r.stage_at_event.is_none());
        assert_eq!(r.advisory(), InterruptionAdvisory::Critical);
    }

    #[test]
    fn exactly_one_cycle_ends_in_light_sleep() {
        let r = analyze_interruption(at(5, 0), at(6, 30), 90);
        assert_eq!(r.cycle_progress_minutes, Some(0.0));
        assert_eq!(r.stage_at_event, Some(InterruptedStage::Light));
        assert_eq!(r.severity, Severity::Low);
        assert!(r.acceptable);
        assert_eq!(r.advisory(), InterruptionAdvisory::Fine);
    }

    #[test]
    fn deep_band() {
        // 120 min -> 30 into the second cycle -> 0.33
        let r = analyze_interruption(at(4, 0), at(6, 0), 90);
        assert_eq!(r.stage_at_event, Some(InterruptedStage::Deep));
        assert_eq!(r.severity, Severity::High);
        assert!(!r.acceptable);
        assert_eq!(r.advisory(), InterruptionAdvisory::Warning);
    }

    #[test]
    fn rem_band() {
        // 80 min into a 90 min cycle -> 0.89
        let r = analyze_interruption(at(4, 0), at(5, 20), 90);
        assert_eq!(r.stage_at_event, Some(InterruptedStage::Rem));
        assert_eq!(r.severity, Severity::Medium);
        assert!(r.acceptable);
    }

    #[test]
    fn band_edges_are_inclusive_on_the_lower_band() {
        // 100 min cycle: 122 min -> 22 -> exactly 0.22 -> light
        let onset = at(3, 0);
        let r = analyze_interruption(onset, add_minutes(onset, 122), 100);
        assert_eq!(r.stage_at_event, Some(InterruptedStage::Light));
        // 167 min -> 67 -> exactly 0.67 -> deep
        let r = analyze_interruption(onset, add_minutes(onset, 167), 100);
        assert_eq!(r.stage_at_event, Some(InterruptedStage::Deep));
    }

    #[test]
    fn seventy_minutes_is_analyzed() {
        let r = analyze_interruption(at(4, 0), at(5, 10), 90);
        assert!(r.stage_at_event.is_some());
        assert_eq!(r.stage_at_event, Some(InterruptedStage::Rem));
    }
}
