//! Endgame modes and score partitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The three endgame modes that are scored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Cycle-based: fewer cycles to clear is better.
    #[serde(rename = "moc")]
    MemoryOfChaos,
    /// Score-based.
    #[serde(rename = "pf")]
    PureFiction,
    /// Score-based.
    #[serde(rename = "as")]
    ApocalypticShadow,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [
        GameMode::MemoryOfChaos,
        GameMode::PureFiction,
        GameMode::ApocalypticShadow,
    ];

    /// Short key used in dataset files.
    pub fn key(&self) -> &'static str {
        match self {
            GameMode::MemoryOfChaos => "moc",
            GameMode::PureFiction => "pf",
            GameMode::ApocalypticShadow => "as",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameMode::MemoryOfChaos => "Memory of Chaos",
            GameMode::PureFiction => "Pure Fiction",
            GameMode::ApocalypticShadow => "Apocalyptic Shadow",
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Error returned when parsing an unknown mode or score key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for GameMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "moc" | "memory-of-chaos" => Ok(GameMode::MemoryOfChaos),
            "pf" | "pure-fiction" => Ok(GameMode::PureFiction),
            "as" | "apocalyptic-shadow" => Ok(GameMode::ApocalypticShadow),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// A partition of the score table: one per mode, plus the cross-mode mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKey {
    #[serde(rename = "moc")]
    MemoryOfChaos,
    #[serde(rename = "pf")]
    PureFiction,
    #[serde(rename = "as")]
    ApocalypticShadow,
    General,
}

impl ScoreKey {
    pub const ALL: [ScoreKey; 4] = [
        ScoreKey::MemoryOfChaos,
        ScoreKey::PureFiction,
        ScoreKey::ApocalypticShadow,
        ScoreKey::General,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ScoreKey::MemoryOfChaos => "moc",
            ScoreKey::PureFiction => "pf",
            ScoreKey::ApocalypticShadow => "as",
            ScoreKey::General => "general",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ScoreKey::MemoryOfChaos => "Memory of Chaos",
            ScoreKey::PureFiction => "Pure Fiction",
            ScoreKey::ApocalypticShadow => "Apocalyptic Shadow",
            ScoreKey::General => "General Tier List",
        }
    }
}

impl From<GameMode> for ScoreKey {
    fn from(mode: GameMode) -> Self {
        match mode {
            GameMode::MemoryOfChaos => ScoreKey::MemoryOfChaos,
            GameMode::PureFiction => ScoreKey::PureFiction,
            GameMode::ApocalypticShadow => ScoreKey::ApocalypticShadow,
        }
    }
}

impl std::fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ScoreKey {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(ScoreKey::General),
            other => other.parse::<GameMode>().map(ScoreKey::from),
        }
    }
}
