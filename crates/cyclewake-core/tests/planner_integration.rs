//! Integration tests for the planning pipeline.
//!
//! This test file verifies:
//! - The reference night layout (22:00, 90 minutes, 6 cycles)
//! - Prayer and work pairing end to end
//! - The optimizer and deadline paths
//! - Serialization of a full plan

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use cyclewake_core::clock::Interval;
use cyclewake_core::intersection::{IntersectionStatus, MIN_PREP_MINUTES};
use cyclewake_core::planner::DEFAULT_CYCLE_LENGTH_MINUTES;
use cyclewake_core::{
    analyze_interruption, generate_cycles, intersect, plan, PlanRequest, PrayerConstraint, QualityTier,
    RealityCheck, Severity, StageKind,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn night(h: u32, m: u32) -> NaiveDateTime {
    let day = if h >= 12 { 1 } else { 2 };
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[test]
fn test_reference_night_layout() {
    let p = plan(&PlanRequest::new(date(), t(22, 0))).unwrap();
    assert_eq!(p.cycle_length_minutes, DEFAULT_CYCLE_LENGTH_MINUTES);
    assert_eq!(p.cycles.len(), 6);
    assert_eq!(p.cycles[0].start(), night(22, 0));
    assert_eq!(p.cycles[5].end(), night(7, 0));

    let first = &p.cycles[0];
    let early = first.stage(StageKind::EarlyLight).unwrap().interval;
    assert_eq!((early.start(), early.end()), (night(22, 0), night(22, 20)));
    let deep = first.stage(StageKind::Deep).unwrap().interval;
    assert_eq!((deep.start(), deep.end()), (night(22, 25), night(23, 0)));
    let rem = first.stage(StageKind::Rem).unwrap().interval;
    assert_eq!((rem.start(), rem.end()), (night(23, 20), night(23, 30)));

    assert_eq!(p.windows.best.len(), 12);
    assert_eq!(p.windows.okay.len(), 18);
    assert_eq!(p.windows.worst.len(), 6);
}

#[test]
fn test_best_pairing_found_when_both_sides_align() {
    // Prayer window over cycle 5 REM (05:20-05:30), work in cycle 6 REM (06:50)
    let req = PlanRequest::new(date(), t(22, 0))
        .with_prayer(PrayerConstraint::Window {
            start: t(5, 15),
            end: t(5, 30),
        })
        .with_work_time(t(6, 55));
    let p = plan(&req).unwrap();
    let inter = p.intersection.unwrap();

    assert_eq!(inter.result.analysis.status, IntersectionStatus::Optimal);
    let best = &inter.ranked.best[0];
    assert_eq!(best.pairing.prayer_stage, StageKind::Rem);
    assert_eq!(best.pairing.prayer_cycle, 5);
    assert_eq!(best.pairing.work_cycle, 6);
    assert!(best.pairing.viable);
    assert!(inter.result.total_sleep_time_hours >= 7.0);
    assert!(p.reality_check.is_none());
}

#[test]
fn test_work_too_close_to_prayer_is_not_viable() {
    let cycles = generate_cycles(night(22, 0), 90, 6).unwrap();
    // Overlap ends 05:30; work 20 minutes later
    let window = Interval::new(night(5, 20), night(5, 30)).unwrap();
    let result = intersect(&cycles, &window, night(5, 50), night(22, 0));
    let pairing = result.iter().find(|p| p.prayer_stage == StageKind::Rem).unwrap();
    assert!(pairing.minutes_prayer_to_work < MIN_PREP_MINUTES);
    assert!(!pairing.viable);
}

#[test]
fn test_dawn_window_with_six_am_work_reports_no_viable() {
    let req = PlanRequest::new(date(), t(22, 0))
        .with_prayer(PrayerConstraint::Window {
            start: t(5, 0),
            end: t(5, 30),
        })
        .with_work_time(t(6, 0));
    let p = plan(&req).unwrap();
    let inter = p.intersection.unwrap();

    assert!(inter.result.bucket(QualityTier::Best).is_empty());
    assert_eq!(inter.result.analysis.status, IntersectionStatus::NoViable);
    assert!(!inter.result.analysis.suggestions.is_empty());
    let alternatives = inter.alternatives.unwrap();
    assert!(alternatives
        .coupled_pairs
        .iter()
        .all(|pair| pair.prayer.window.end() <= pair.work.window.start()));
    assert_eq!(p.reality_check, Some(RealityCheck::NoViable));
}

#[test]
fn test_interruption_scenario() {
    let r = analyze_interruption(night(5, 10), night(5, 30), 90);
    assert_eq!(r.available_minutes, 20.0);
    assert_eq!(r.severity, Severity::High);
    assert!(!r.acceptable);
}

#[test]
fn test_window_with_deadline_runs_optimizer_and_deadline() {
    let req = PlanRequest::new(date(), t(22, 0))
        .with_prayer(PrayerConstraint::Window {
            start: t(4, 0),
            end: t(4, 20),
        })
        .with_must_wake_by(t(5, 30));
    let p = plan(&req).unwrap();

    let opt = p.optimization.unwrap();
    let top = &opt.recommendations[0];
    assert_eq!(top.wake_time, night(4, 0));
    assert_eq!(top.interruption.unwrap().severity, Severity::Low);
    assert!(opt.schedule_viable);

    let deadline = p.deadline.unwrap();
    let rec = deadline.recommendation.unwrap();
    assert_eq!(rec.window.stage, StageKind::Rem);
    assert_eq!(rec.window.cycle, 5);
    assert!(p.reality_check.is_none());
}

#[test]
fn test_plan_serializes_to_json() {
    let req = PlanRequest::new(date(), t(22, 30))
        .with_prayer(PrayerConstraint::Fixed(t(5, 10)))
        .with_work_time(t(7, 0))
        .with_must_wake_by(t(7, 30));
    let p = plan(&req).unwrap();
    let json = serde_json::to_value(&p).unwrap();

    assert_eq!(json["cycles"].as_array().unwrap().len(), 6);
    assert!(json["fixed_prayer"]["analysis"].is_object());
    assert!(json["intersection"]["result"]["analysis"]["status"].is_string());
    assert!(json["deadline"]["must_wake_by"].is_string());
    assert_eq!(json["windows"]["best"][0]["tier"], "best");
}

#[test]
fn test_request_roundtrips_through_json() {
    let req = PlanRequest::new(date(), t(23, 0)).with_prayer(PrayerConstraint::Window {
        start: t(5, 0),
        end: t(5, 40),
    });
    let json = serde_json::to_string(&req).unwrap();
    let back: PlanRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, req);
}
