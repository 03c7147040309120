//! Wake-quality classification.
//!
//! This module provides:
//! - Per-cycle wake windows tagged with a quality tier
//! - Locating a single instant in the cycle layout
//! - Picking the best window before a hard wake-by deadline

mod classify;
mod deadline;
mod locate;

pub use classify::{canonical_windows, classify_stages, QualityTier, StageWindow, WakeWindows};
pub use deadline::{best_wake_before, DeadlineRecommendation};
pub use locate::{analyze_fixed_target, locate, FixedTargetAnalysis, StageMatch, WakeRegion};
