//! Alternative suggestions.
//!
//! Ignores the exact work instant: picks healthy prayer windows and healthy
//! work windows near the intended work time, then couples them.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::{hours_between, minutes_between, Interval};
use crate::cycle::{Cycle, StageKind};
use crate::wake::{canonical_windows, locate, QualityTier, StageMatch, StageWindow};

/// Work windows count as "near" when an edge is within this many minutes.
const WORK_SEARCH_RADIUS_MINUTES: f64 = 30.0;
/// Only the top few options on each side are considered for coupling.
const COUPLING_DEPTH: usize = 3;
const MAX_COUPLED_PAIRS: usize = 4;

/// A healthy stage window overlapping the prayer window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerOption {
    /// Overlap of the stage window with the prayer window
    pub window: Interval,
    pub cycle: u32,
    pub tier: QualityTier,
    pub stage: StageKind,
    pub reason: &'static str,
    pub sleep_duration_hours: f64,
    pub duration_minutes: i64,
}

/// Position of a work window relative to the intended work time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkAlignment {
    /// The window contains the work time
    Exact,
    BeforeWork,
    AfterWork,
}

/// A healthy stage window close to the intended work time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkOption {
    pub window: Interval,
    pub cycle: u32,
    pub tier: QualityTier,
    pub stage: StageKind,
    pub reason: &'static str,
    pub alignment: WorkAlignment,
    /// Minutes from the work time to the nearer window edge
    pub minutes_off: f64,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoupledPair {
    pub prayer: PrayerOption,
    pub work: WorkOption,
    pub tier: QualityTier,
    pub work_misaligned: bool,
    pub total_sleep_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternatives {
    pub coupled_pairs: Vec<CoupledPair>,
    /// Where the intended work time falls, for reference
    pub work_stage: Option<StageMatch>,
    pub has_good_options: bool,
}

fn healthy_windows(cycles: &[Cycle]) -> impl Iterator<Item = StageWindow> + '_ {
    cycles
        .iter()
        .flat_map(canonical_windows)
        .filter(|w| w.tier != QualityTier::Bad)
}

fn prayer_options(cycles: &[Cycle], prayer_window: &Interval, bedtime: NaiveDateTime) -> Vec<PrayerOption> {
    healthy_windows(cycles)
        .filter_map(|w| {
            let overlap = w.interval.overlap(prayer_window)?;
            Some(PrayerOption {
                window: overlap,
                cycle: w.cycle,
                tier: w.tier,
                stage: w.stage,
                reason: w.reason,
                sleep_duration_hours: hours_between(bedtime, overlap.start()),
                duration_minutes: overlap.duration_minutes(),
            })
        })
        .collect()
}

fn work_options(cycles: &[Cycle], work_instant: NaiveDateTime) -> Vec<WorkOption> {
    healthy_windows(cycles)
        .filter_map(|w| {
            let to_start = minutes_between(w.interval.start(), work_instant).abs();
            let to_end = minutes_between(w.interval.end(), work_instant).abs();
            let near = to_start <= WORK_SEARCH_RADIUS_MINUTES
                || to_end <= WORK_SEARCH_RADIUS_MINUTES
                || w.interval.contains(work_instant);
            if !near {
                return None;
            }

            let alignment = if w.interval.end() < work_instant {
                WorkAlignment::BeforeWork
            } else if w.interval.start() > work_instant {
                WorkAlignment::AfterWork
            } else {
                WorkAlignment::Exact
            };

            Some(WorkOption {
                window: w.interval,
                cycle: w.cycle,
                tier: w.tier,
                stage: w.stage,
                reason: w.reason,
                alignment,
                minutes_off: to_start.min(to_end),
                duration_minutes: w.interval.duration_minutes(),
            })
        })
        .collect()
}

/// Find coupled (prayer, work) window pairs near the requested targets.
///
/// Prayer options are ordered Best-first then by distance to the prayer-window
/// center; work options Best-first then by distance to the work time. A pair
/// needs the prayer window to end no later than the work window starts, and a
/// window is used at most once.
pub fn suggest_alternatives(
    cycles: &[Cycle],
    prayer_window: &Interval,
    work_instant: NaiveDateTime,
    bedtime: NaiveDateTime,
) -> Alternatives {
    let center = prayer_window.center();

    let mut prayers = prayer_options(cycles, prayer_window, bedtime);
    prayers.sort_by(|a, b| {
        b.tier.cmp(&a.tier).then_with(|| {
            a.window
                .edge_distance_minutes(center)
                .total_cmp(&b.window.edge_distance_minutes(center))
        })
    });

    let mut works = work_options(cycles, work_instant);
    works.sort_by(|a, b| b.tier.cmp(&a.tier).then_with(|| a.minutes_off.total_cmp(&b.minutes_off)));

    let mut used_prayer: HashSet<Interval> = HashSet::new();
    let mut used_work: HashSet<Interval> = HashSet::new();
    let mut coupled_pairs = Vec::new();

    for prayer in prayers.iter().take(COUPLING_DEPTH) {
        if coupled_pairs.len() >= MAX_COUPLED_PAIRS {
            break;
        }
        if used_prayer.contains(&prayer.window) {
            continue;
        }

        let candidate = works.iter().take(COUPLING_DEPTH).find(|work| {
            !used_work.contains(&work.window)
                && work.window != prayer.window
                && prayer.window.end() <= work.window.start()
        });

        if let Some(work) = candidate {
            used_prayer.insert(prayer.window);
            used_work.insert(work.window);
            coupled_pairs.push(CoupledPair {
                prayer: prayer.clone(),
                work: work.clone(),
                tier: prayer.tier.combine(work.tier),
                work_misaligned: work.alignment != WorkAlignment::Exact,
                total_sleep_hours: prayer.sleep_duration_hours,
            });
        }
    }

    coupled_pairs.sort_by(|a, b| {
        b.tier
            .cmp(&a.tier)
            .then_with(|| b.total_sleep_hours.total_cmp(&a.total_sleep_hours))
    });

    let has_good_options = coupled_pairs.iter().any(|p| p.tier == QualityTier::Best);

    tracing::debug!(
        prayer_options = prayers.len(),
        work_options = works.len(),
        pairs = coupled_pairs.len(),
        "built alternative suggestions"
    );

    Alternatives {
        coupled_pairs,
        work_stage: locate(work_instant, cycles),
        has_good_options,
    }
}
