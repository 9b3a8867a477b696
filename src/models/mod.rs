//! Core data models for the tier list engine.

mod ids;
mod mode;
mod role;
mod score;
mod stats;
mod tier;

pub use ids::*;
pub use mode::*;
pub use role::*;
pub use score::*;
pub use stats::*;
pub use tier::*;
