//! # Cyclewake Core Library
//!
//! Sleep-cycle arithmetic for planning a night around two wake-ups: a
//! dawn prayer inside a time window and a later work wake-up. The library
//! models the night as back-to-back cycles of fixed length, grades every
//! stage by how gentle it is to wake from, and pairs prayer and work
//! wake-ups so both land outside deep sleep.
//!
//! ## Architecture
//!
//! - **Cycles**: fixed-length cycles split into six stages by constant fractions
//! - **Wake windows**: stages graded `Best` / `Okay` / `Bad`; single-instant lookup
//! - **Intersection**: prayer-window by work-time pairing, proximity ranking and
//!   alternative suggestions
//! - **Interruption**: outcome of going back to sleep until a fixed deadline
//! - **Planner**: one request in, one complete night plan out
//! - **Storage**: TOML configuration
//!
//! Everything except the configuration store is pure and synchronous.

pub mod clock;
pub mod cycle;
pub mod error;
pub mod intersection;
pub mod interruption;
pub mod optimizer;
pub mod planner;
pub mod storage;
pub mod wake;

pub use clock::{parse_wall_clock, DayAnchor, Interval};
pub use cycle::{generate_cycles, Cycle, CycleGenerator, Stage, StageKind};
pub use error::{ConfigError, CoreError, ValidationError};
pub use intersection::{
    intersect, rank_by_proximity, suggest_alternatives, IntersectionResult, IntersectionStatus, Pairing,
};
pub use interruption::{analyze_interruption, InterruptionResult, Severity};
pub use optimizer::{optimize_prayer_window, WindowOptimization};
pub use planner::{plan, PlanRequest, PrayerConstraint, RealityCheck, SleepPlan};
pub use storage::Config;
pub use wake::{analyze_fixed_target, classify_stages, locate, QualityTier, StageWindow, WakeWindows};
