//! Dataset and role files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{StorageConfig, StorageError};
use crate::models::{RoleAssignment, StatsSnapshot};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    debug!("Read {:?}", path);
    Ok(value)
}

/// Load the current dataset.
pub fn load_dataset(config: &StorageConfig) -> Result<StatsSnapshot, StorageError> {
    let path = config.dataset_path();
    if !path.exists() {
        return Err(StorageError::PathNotFound(path));
    }

    let snapshot: StatsSnapshot = read_json(&path)?;
    info!("Loaded dataset with {} characters", snapshot.len());
    Ok(snapshot)
}

/// Move the current dataset into the archive directory.
///
/// Returns the archive path, or `None` if there was nothing to archive.
pub fn archive_dataset(config: &StorageConfig) -> Result<Option<PathBuf>, StorageError> {
    let current = config.dataset_path();
    if !current.exists() {
        return Ok(None);
    }

    let archive_dir = config.archive_dir();
    fs::create_dir_all(&archive_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut target = archive_dir.join(format!("dataset_{}.json", timestamp));
    let mut suffix = 1;
    while target.exists() {
        target = archive_dir.join(format!("dataset_{}_{}.json", timestamp, suffix));
        suffix += 1;
    }

    fs::rename(&current, &target)?;
    info!("Archived previous dataset to {:?}", target);
    Ok(Some(target))
}

/// Replace the current dataset, archiving the previous one first.
pub fn save_dataset(
    config: &StorageConfig,
    snapshot: &StatsSnapshot,
) -> Result<Option<PathBuf>, StorageError> {
    let archived = archive_dataset(config)?;

    let path = config.dataset_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;

    info!(
        "Wrote dataset with {} characters to {:?}",
        snapshot.len(),
        path
    );
    Ok(archived)
}

/// List archived datasets, oldest first.
pub fn list_archives(config: &StorageConfig) -> Result<Vec<PathBuf>, StorageError> {
    let dir = config.archive_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut archives = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            archives.push(entry.path());
        }
    }

    archives.sort();
    Ok(archives)
}

/// Load role assignments. A missing file means role data is unavailable.
pub fn load_roles(config: &StorageConfig) -> Result<Option<RoleAssignment>, StorageError> {
    let path = config.roles_path();
    if !path.exists() {
        return Ok(None);
    }

    let roles: RoleAssignment = read_json(&path)?;
    info!("Loaded roles for {} characters", roles.len());
    Ok(Some(roles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CharacterId, CharacterStats, CycleStats, Role};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> StorageConfig {
        StorageConfig::new(temp_dir.path().to_path_buf())
    }

    fn snapshot(cycles: f64) -> StatsSnapshot {
        [(
            CharacterId::from("Firefly"),
            CharacterStats {
                moc: Some(CycleStats {
                    cycles,
                    usage: 55.0,
                }),
                ..Default::default()
            },
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_save_and_load_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let archived = save_dataset(&config, &snapshot(3.0)).unwrap();
        assert!(archived.is_none());

        let loaded = load_dataset(&config).unwrap();
        assert_eq!(loaded, snapshot(3.0));
    }

    #[test]
    fn test_save_archives_previous() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        save_dataset(&config, &snapshot(3.0)).unwrap();
        let archived = save_dataset(&config, &snapshot(4.0)).unwrap().unwrap();

        assert!(archived.starts_with(config.archive_dir()));
        let name = archived.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("dataset_"));
        assert!(name.ends_with(".json"));

        assert_eq!(list_archives(&config).unwrap(), vec![archived.clone()]);

        let old: StatsSnapshot = read_json(&archived).unwrap();
        assert_eq!(old, snapshot(3.0));
        assert_eq!(load_dataset(&config).unwrap(), snapshot(4.0));
    }

    #[test]
    fn test_archive_names_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        save_dataset(&config, &snapshot(1.0)).unwrap();
        save_dataset(&config, &snapshot(2.0)).unwrap();
        save_dataset(&config, &snapshot(3.0)).unwrap();

        assert_eq!(list_archives(&config).unwrap().len(), 2);
    }

    #[test]
    fn test_load_missing_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let result = load_dataset(&config);
        assert!(matches!(result, Err(StorageError::PathNotFound(_))));
        assert!(list_archives(&config).unwrap().is_empty());
    }

    #[test]
    fn test_load_roles() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        assert!(load_roles(&config).unwrap().is_none());

        fs::write(
            config.roles_path(),
            r#"{"Firefly": ["DPS"], "Ruan Mei": ["Amplifier"]}"#,
        )
        .unwrap();
        let roles = load_roles(&config).unwrap().unwrap();
        assert!(roles.has_role("Firefly", Role::Dps));
        assert!(roles.has_role("Ruan Mei", Role::Amplifier));
    }

    #[test]
    fn test_load_malformed_roles() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        fs::write(config.roles_path(), "not json").unwrap();
        assert!(matches!(load_roles(&config), Err(StorageError::Json(_))));
    }
}
