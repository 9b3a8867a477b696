//! Filesystem storage for the statistics dataset.
//!
//! Handles reading and writing the data directory:
//! - The current dataset (JSON)
//! - Timestamped archives of replaced datasets
//! - The character role assignment (JSON)

mod dataset;

pub use dataset::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join("hsr_dataset.json")
    }

    pub fn roles_path(&self) -> PathBuf {
        self.data_dir.join("character_roles.json")
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.data_dir.join("dataset_archive")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
