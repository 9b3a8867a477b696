//! Composite score tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CharacterId, ScoreKey};

/// Composite scores per partition (three modes plus general).
///
/// A character appears in a mode partition iff it had stats for that mode,
/// and in `General` iff it appears in at least one mode partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    partitions: BTreeMap<ScoreKey, BTreeMap<CharacterId, f64>>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            partitions: ScoreKey::ALL
                .iter()
                .map(|k| (*k, BTreeMap::new()))
                .collect(),
        }
    }
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ScoreKey, character: CharacterId, score: f64) {
        self.partitions
            .entry(key)
            .or_default()
            .insert(character, score);
    }

    /// All scores for one partition.
    pub fn partition(&self, key: ScoreKey) -> &BTreeMap<CharacterId, f64> {
        static EMPTY: BTreeMap<CharacterId, f64> = BTreeMap::new();
        self.partitions.get(&key).unwrap_or(&EMPTY)
    }

    pub fn get(&self, key: ScoreKey, character: &str) -> Option<f64> {
        self.partition(key).get(character).copied()
    }

    /// Characters in a partition, best score first, ties by name.
    pub fn sorted(&self, key: ScoreKey) -> Vec<(&CharacterId, f64)> {
        let mut entries: Vec<_> = self.partition(key).iter().map(|(c, s)| (c, *s)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}
