//! Scoring and tier assignment engine.
//!
//! Turns a statistics snapshot into composite scores and tier lists:
//! - Per-mode composite scores from clamped performance and usage
//! - General scores as the mean of available mode scores
//! - Quota-based tier partitions with viability filtering
//! - Role-stratified tier lists per score partition
//!
//! Everything here is a pure function of its inputs.

mod lists;
mod scores;
mod tiers;

pub use lists::{build_tier_lists, filter_by_role};
pub use scores::{compute_scores, general_score, mode_score, usage_component, PerformanceCurve};
pub use tiers::{assign_tiers, tier_counts};
