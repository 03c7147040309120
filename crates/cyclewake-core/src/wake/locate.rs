//! Locating a single instant in the cycle layout.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::classify::{stage_reason, QualityTier};
use crate::clock::{minutes_between, Interval};
use crate::cycle::{Cycle, StageKind};

/// Where inside a cycle an instant falls.
///
/// The two transition gaps are reported as one region; the gap identity is
/// not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeRegion {
    EarlyLight,
    Deep,
    LateLight,
    Rem,
    Transition,
}

impl WakeRegion {
    pub fn tier(self) -> QualityTier {
        match self {
            Self::EarlyLight | Self::Rem => QualityTier::Best,
            Self::LateLight | Self::Transition => QualityTier::Okay,
            Self::Deep => QualityTier::Bad,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::EarlyLight => StageKind::EarlyLight.label(),
            Self::Deep => StageKind::Deep.label(),
            Self::LateLight => StageKind::LateLight.label(),
            Self::Rem => StageKind::Rem.label(),
            Self::Transition => "Transition Phase",
        }
    }
}

/// Result of locating an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageMatch {
    pub cycle: u32,
    pub region: WakeRegion,
    pub tier: QualityTier,
    pub reason: &'static str,
    /// The matched stage's span; `None` for the transition fallback.
    pub interval: Option<Interval>,
}

/// Named stages in the order they are tested. On a shared boundary the
/// earlier-starting stage wins; transitions are only the fallback.
const NAMED_REGIONS: [(StageKind, WakeRegion); 4] = [
    (StageKind::EarlyLight, WakeRegion::EarlyLight),
    (StageKind::Deep, WakeRegion::Deep),
    (StageKind::LateLight, WakeRegion::LateLight),
    (StageKind::Rem, WakeRegion::Rem),
];

/// Find the stage an instant falls into.
///
/// Scans cycles in order and stops at the first whose span contains the
/// instant (a cycle boundary therefore belongs to the earlier cycle).
/// Returns `None` when the instant lies outside every cycle.
pub fn locate(instant: NaiveDateTime, cycles: &[Cycle]) -> Option<StageMatch> {
    let cycle = cycles.iter().find(|c| c.interval().contains(instant))?;

    for (kind, region) in NAMED_REGIONS {
        if let Some(stage) = cycle.stage(kind) {
            if stage.interval.contains(instant) {
                return Some(StageMatch {
                    cycle: cycle.index(),
                    region,
                    tier: region.tier(),
                    reason: stage_reason(kind),
                    interval: Some(stage.interval),
                });
            }
        }
    }

    Some(StageMatch {
        cycle: cycle.index(),
        region: WakeRegion::Transition,
        tier: WakeRegion::Transition.tier(),
        reason: "Sleep transition phase",
        interval: None,
    })
}

/// A fixed target (e.g. a single prayer time) placed in the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixedTargetAnalysis {
    pub instant: NaiveDateTime,
    pub matched: StageMatch,
    /// Whole minutes from the start of the matched cycle.
    pub minutes_into_cycle: i64,
    /// REM start of the following cycle, if there is one.
    pub next_best_wake: Option<NaiveDateTime>,
}

/// Locate a fixed target and add cycle-progress context.
pub fn analyze_fixed_target(instant: NaiveDateTime, cycles: &[Cycle]) -> Option<FixedTargetAnalysis> {
    let Some(matched) = locate(instant, cycles) else {
        tracing::warn!(%instant, "target falls outside every generated cycle");
        return None;
    };
    let cycle = cycles.iter().find(|c| c.index() == matched.cycle)?;
    let next_best_wake = cycles
        .iter()
        .find(|c| c.index() > matched.cycle)
        .and_then(|c| c.stage(StageKind::Rem))
        .map(|rem| rem.interval.start());

    Some(FixedTargetAnalysis {
        instant,
        matched,
        minutes_into_cycle: minutes_between(cycle.start(), instant).round() as i64,
        next_best_wake,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::add_minutes;
    use crate::cycle::generate_cycles;
    use chrono::NaiveDate;

    fn bedtime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap()
    }

    fn night() -> Vec<Cycle> {
        generate_cycles(bedtime(), 90, 6).unwrap()
    }

    #[test]
    fn locates_each_region_of_first_cycle() {
        let cycles = night();
        let at = |m| locate(add_minutes(bedtime(), m), &cycles).unwrap().region;
        assert_eq!(at(10), WakeRegion::EarlyLight);
        assert_eq!(at(22), WakeRegion::Transition);
        assert_eq!(at(40), WakeRegion::Deep);
        assert_eq!(at(65), WakeRegion::LateLight);
        assert_eq!(at(75), WakeRegion::Transition);
        assert_eq!(at(85), WakeRegion::Rem);
    }

    #[test]
    fn shared_boundaries_go_to_earlier_named_stage() {
        let cycles = night();
        let at = |m| locate(add_minutes(bedtime(), m), &cycles).unwrap();
        // early light end == transition start
        assert_eq!(at(20).region, WakeRegion::EarlyLight);
        // deep end == late light start
        assert_eq!(at(60).region, WakeRegion::Deep);
        // cycle 1 end == cycle 2 start
        let boundary = at(90);
        assert_eq!(boundary.cycle, 1);
        assert_eq!(boundary.region, WakeRegion::Rem);
    }

    #[test]
    fn every_minute_of_the_night_is_classified() {
        let cycles = night();
        for m in 0..=540 {
            assert!(locate(add_minutes(bedtime(), m), &cycles).is_some(), "minute {m}");
        }
    }

    #[test]
    fn outside_the_night_is_none() {
        let cycles = night();
        assert!(locate(add_minutes(bedtime(), -1), &cycles).is_none());
        assert!(locate(add_minutes(bedtime(), 541), &cycles).is_none());
    }

    #[test]
    fn transition_match_has_no_interval() {
        let cycles = night();
        let m = locate(add_minutes(bedtime(), 22), &cycles).unwrap();
        assert_eq!(m.tier, QualityTier::Okay);
        assert!(m.interval.is_none());
    }

    #[test]
    fn fixed_target_reports_progress_and_next_rem() {
        let cycles = night();
        // 05:10 is 430 min after 22:00: cycle 5 (360..450), 70 min in
        let fajr = add_minutes(bedtime(), 430);
        let analysis = analyze_fixed_target(fajr, &cycles).unwrap();
        assert_eq!(analysis.matched.cycle, 5);
        assert_eq!(analysis.minutes_into_cycle, 70);
        assert_eq!(analysis.matched.region, WakeRegion::LateLight);
        assert_eq!(analysis.next_best_wake, Some(add_minutes(bedtime(), 530)));
    }

    #[test]
    fn last_cycle_has_no_next_best() {
        let cycles = night();
        let analysis = analyze_fixed_target(add_minutes(bedtime(), 500), &cycles).unwrap();
        assert_eq!(analysis.matched.cycle, 6);
        assert!(analysis.next_best_wake.is_none());
    }
}
