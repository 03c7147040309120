//! Coupling a flexible prayer wake-up with a fixed work wake-up.
//!
//! This module provides:
//! - The pairing engine that classifies every (prayer, work) combination
//! - A deterministic status summary with suggestions
//! - Proximity ranking within each tier bucket
//! - Alternative suggestions that ignore exact target alignment

mod alternatives;
mod analysis;
mod engine;
mod pairing;
mod proximity;

pub use alternatives::{
    suggest_alternatives, Alternatives, CoupledPair, PrayerOption, WorkAlignment, WorkOption,
};
pub use analysis::{IntersectionAnalysis, IntersectionStatus, Suggestion, MIN_RESTFUL_SLEEP_HOURS};
pub use engine::{intersect, IntersectionResult};
pub use pairing::{CombinedQuality, Pairing, WakeSide, MIN_PREP_MINUTES};
pub use proximity::{rank_buckets, rank_by_proximity, RankedBuckets, RankedPairing, DEFAULT_PER_TIER_CAP};
