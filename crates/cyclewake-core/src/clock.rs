//! Wall-clock arithmetic and intervals.
//!
//! Everything downstream works on naive wall-clock instants that share one
//! day-rollover base, set by [`DayAnchor`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

use crate::error::ValidationError;

/// Bedtimes before this hour are treated as "after midnight".
const AFTER_MIDNIGHT_CUTOFF_HOUR: u32 = 12;

/// Add a (possibly negative) number of minutes to an instant.
pub fn add_minutes(instant: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    instant + Duration::minutes(minutes)
}

/// Signed minutes from `from` to `to`.
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / 60.0
}

/// Signed hours from `from` to `to`.
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

/// Parse `HH:MM` into a wall-clock time.
pub fn parse_wall_clock(input: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|_| ValidationError::InvalidClock {
        input: input.to_string(),
    })
}

/// Day-rollover base for one calculation.
///
/// The bedtime anchors day 0. A bedtime in the morning hours is assumed to be
/// "tonight after midnight" and moves to the next calendar day; every other
/// time that does not come after the bedtime is rolled forward one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayAnchor {
    date: NaiveDate,
}

impl DayAnchor {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Anchor the bedtime.
    pub fn bedtime(&self, time: NaiveTime) -> NaiveDateTime {
        let instant = self.date.and_time(time);
        if time.hour() < AFTER_MIDNIGHT_CUTOFF_HOUR {
            instant + Duration::days(1)
        } else {
            instant
        }
    }

    /// Anchor a target time relative to an already anchored bedtime.
    pub fn after(&self, bedtime: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
        let instant = self.date.and_time(time);
        if instant <= bedtime {
            instant + Duration::days(1)
        } else {
            instant
        }
    }
}

/// A non-empty span of wall-clock time (`start < end`).
///
/// Containment is closed on both ends; callers that scan several
/// intervals resolve shared boundaries by scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Interval {
    /// Create an interval, or `None` if it would be empty.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        if start >= end {
            return None;
        }
        Some(Self { start, end })
    }

    /// A window of `padding_minutes` on either side of `center`.
    pub fn around(center: NaiveDateTime, padding_minutes: i64) -> Option<Self> {
        Self::new(
            add_minutes(center, -padding_minutes),
            add_minutes(center, padding_minutes),
        )
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn center(&self) -> NaiveDateTime {
        self.start + (self.end - self.start) / 2
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Intersection of two intervals; degenerate results count as no overlap.
    pub fn overlap(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Distance in minutes from `instant` to the nearer edge.
    pub fn edge_distance_minutes(&self, instant: NaiveDateTime) -> f64 {
        minutes_between(self.start, instant)
            .abs()
            .min(minutes_between(self.end, instant).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn empty_interval_is_refused() {
        assert!(Interval::new(at(5, 0), at(5, 0)).is_none());
        assert!(Interval::new(at(5, 10), at(5, 0)).is_none());
        assert!(Interval::new(at(5, 0), at(5, 1)).is_some());
    }

    #[test]
    fn overlap_of_disjoint_or_touching_intervals_is_none() {
        let a = Interval::new(at(5, 0), at(5, 20)).unwrap();
        let b = Interval::new(at(5, 20), at(5, 40)).unwrap();
        let c = Interval::new(at(6, 0), at(6, 30)).unwrap();
        assert!(a.overlap(&b).is_none());
        assert!(a.overlap(&c).is_none());
    }

    #[test]
    fn overlap_takes_inner_bounds() {
        let a = Interval::new(at(5, 0), at(5, 30)).unwrap();
        let b = Interval::new(at(5, 20), at(6, 0)).unwrap();
        let o = a.overlap(&b).unwrap();
        assert_eq!(o.start(), at(5, 20));
        assert_eq!(o.end(), at(5, 30));
        assert_eq!(o.duration_minutes(), 10);
    }

    #[test]
    fn center_and_edge_distance() {
        let w = Interval::new(at(5, 0), at(5, 30)).unwrap();
        assert_eq!(w.center(), at(5, 15));
        assert_eq!(w.edge_distance_minutes(at(5, 15)), 15.0);
        assert_eq!(w.edge_distance_minutes(at(6, 0)), 30.0);
    }

    #[test]
    fn around_pads_both_sides() {
        let w = Interval::around(at(5, 10), 5).unwrap();
        assert_eq!(w.start(), at(5, 5));
        assert_eq!(w.end(), at(5, 15));
    }

    #[test]
    fn evening_bedtime_stays_on_anchor_day() {
        let anchor = DayAnchor::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let bedtime = anchor.bedtime(NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        assert_eq!(bedtime, at(22, 0));
    }

    #[test]
    fn after_midnight_bedtime_rolls_to_next_day() {
        let anchor = DayAnchor::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let bedtime = anchor.bedtime(NaiveTime::from_hms_opt(0, 30, 0).unwrap());
        assert_eq!(bedtime, at(0, 30) + Duration::days(1));
    }

    #[test]
    fn morning_target_rolls_past_bedtime() {
        let anchor = DayAnchor::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let bedtime = anchor.bedtime(NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        let fajr = anchor.after(bedtime, NaiveTime::from_hms_opt(5, 0, 0).unwrap());
        assert_eq!(fajr, at(5, 0) + Duration::days(1));

        let late = anchor.after(bedtime, NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        assert_eq!(late, at(23, 0));
    }

    #[test]
    fn parse_wall_clock_accepts_hh_mm() {
        assert_eq!(
            parse_wall_clock("05:10").unwrap(),
            NaiveTime::from_hms_opt(5, 10, 0).unwrap()
        );
        assert_eq!(
            parse_wall_clock(" 22:45 ").unwrap(),
            NaiveTime::from_hms_opt(22, 45, 0).unwrap()
        );
        assert!(matches!(
            parse_wall_clock("25:00"),
            Err(ValidationError::InvalidClock { .. })
        ));
        assert!(parse_wall_clock("soon").is_err());
    }
}
