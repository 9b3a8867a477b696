//! # HSR Tier List
//!
//! Role-based tier lists for the three Honkai: Star Rail endgame modes,
//! computed from community clear records.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (stats snapshots, scores, tiers, roles)
//! - **calculate**: Composite scoring and quota-based tier assignment
//! - **ingest**: Clear-record CSV aggregation into per-character statistics
//! - **storage**: Dataset and role files, with archival of old datasets
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
