//! Per-character aggregate statistics, the input to scoring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CharacterId, GameMode};

/// Cycle-based mode aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleStats {
    /// Average cycles to clear (lower is better)
    pub cycles: f64,

    /// Percent of observed clears that included the character (0-100)
    pub usage: f64,
}

/// Score-based mode aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    /// Average clear score (higher is better)
    pub score: f64,

    /// Percent of observed clears that included the character (0-100)
    pub usage: f64,
}

/// Raw metric and usage for one mode, independent of the metric's meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeReading {
    pub raw: f64,
    pub usage: f64,
}

/// Everything known about one character. A missing mode means "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moc: Option<CycleStats>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pf: Option<ScoreStats>,

    #[serde(
        rename = "as",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub apocalyptic_shadow: Option<ScoreStats>,
}

impl CharacterStats {
    /// Raw reading for a mode, if the character has data for it.
    pub fn reading(&self, mode: GameMode) -> Option<ModeReading> {
        match mode {
            GameMode::MemoryOfChaos => self.moc.map(|s| ModeReading {
                raw: s.cycles,
                usage: s.usage,
            }),
            GameMode::PureFiction => self.pf.map(|s| ModeReading {
                raw: s.score,
                usage: s.usage,
            }),
            GameMode::ApocalypticShadow => self.apocalyptic_shadow.map(|s| ModeReading {
                raw: s.score,
                usage: s.usage,
            }),
        }
    }

    /// Usage percentage for a mode.
    pub fn usage(&self, mode: GameMode) -> Option<f64> {
        self.reading(mode).map(|r| r.usage)
    }

    /// Modes this character has data for, in declaration order.
    pub fn modes(&self) -> impl Iterator<Item = GameMode> + '_ {
        GameMode::ALL
            .into_iter()
            .filter(move |mode| self.reading(*mode).is_some())
    }

    /// A character is viable if any mode shows usage at or above `min_usage`.
    pub fn is_viable(&self, min_usage: f64) -> bool {
        GameMode::ALL
            .iter()
            .filter_map(|mode| self.usage(*mode))
            .any(|usage| usage >= min_usage)
    }

    pub fn is_empty(&self) -> bool {
        self.modes().next().is_none()
    }
}

/// A full statistics snapshot: character name to per-mode aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsSnapshot {
    characters: BTreeMap<CharacterId, CharacterStats>,
}

impl StatsSnapshot {
    pub fn new(characters: BTreeMap<CharacterId, CharacterStats>) -> Self {
        Self { characters }
    }

    pub fn get(&self, character: &str) -> Option<&CharacterStats> {
        self.characters.get(character)
    }

    pub fn insert(&mut self, character: CharacterId, stats: CharacterStats) {
        self.characters.insert(character, stats);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CharacterId, &CharacterStats)> {
        self.characters.iter()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Number of characters with data for the given mode.
    pub fn mode_count(&self, mode: GameMode) -> usize {
        self.characters
            .values()
            .filter(|s| s.reading(mode).is_some())
            .count()
    }

    /// True if the character exists in the snapshot and is viable.
    pub fn is_viable(&self, character: &str, min_usage: f64) -> bool {
        self.get(character)
            .map(|s| s.is_viable(min_usage))
            .unwrap_or(false)
    }
}

impl FromIterator<(CharacterId, CharacterStats)> for StatsSnapshot {
    fn from_iter<I: IntoIterator<Item = (CharacterId, CharacterStats)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
