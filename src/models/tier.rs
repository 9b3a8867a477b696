//! Tier buckets and per-role tier lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CharacterId, Role, ScoreKey};

/// Tier classification, declared highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::S, Tier::A, Tier::B, Tier::C, Tier::D];

    /// Tiers filled by rank quota, in fill order.
    pub const RANKED: [Tier; 4] = [Tier::S, Tier::A, Tier::B, Tier::C];

    /// The remainder tier; also receives every non-viable character.
    pub fn lowest() -> Self {
        Tier::D
    }

    pub fn index(&self) -> usize {
        match self {
            Tier::S => 0,
            Tier::A => 1,
            Tier::B => 2,
            Tier::C => 3,
            Tier::D => 4,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::S => write!(f, "S"),
            Tier::A => write!(f, "A"),
            Tier::B => write!(f, "B"),
            Tier::C => write!(f, "C"),
            Tier::D => write!(f, "D"),
        }
    }
}

/// Five tier buckets for one (mode, role) pair.
///
/// Ranked characters appear in rank order within their bucket. Non-viable
/// characters trail the ranked ones in D.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierPartition {
    buckets: BTreeMap<Tier, Vec<CharacterId>>,
}

impl Default for TierPartition {
    fn default() -> Self {
        Self {
            buckets: Tier::ALL.iter().map(|t| (*t, Vec::new())).collect(),
        }
    }
}

impl TierPartition {
    /// Create an empty partition with all five buckets present.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tier: Tier, character: CharacterId) {
        self.buckets.entry(tier).or_default().push(character);
    }

    pub fn bucket(&self, tier: Tier) -> &[CharacterId] {
        self.buckets.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find the tier holding a character.
    pub fn tier_of(&self, character: &str) -> Option<Tier> {
        self.buckets
            .iter()
            .find(|(_, members)| members.iter().any(|c| c.as_str() == character))
            .map(|(tier, _)| *tier)
    }

    /// Buckets in tier order, highest first.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[CharacterId])> {
        self.buckets.iter().map(|(t, m)| (*t, m.as_slice()))
    }

    /// Bucket sizes, indexed by `Tier::index`.
    pub fn sizes(&self) -> [usize; 5] {
        let mut sizes = [0; 5];
        for (tier, members) in self.iter() {
            sizes[tier.index()] = members.len();
        }
        sizes
    }

    /// Total number of characters across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All tier lists for one score partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeTierLists {
    /// Every scored character, regardless of role.
    pub overall: TierPartition,

    /// One partition per role that has at least one scored character.
    pub by_role: BTreeMap<Role, TierPartition>,
}

/// Tier lists for every score partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierLists {
    lists: BTreeMap<ScoreKey, ModeTierLists>,
}

impl TierLists {
    pub fn new(lists: BTreeMap<ScoreKey, ModeTierLists>) -> Self {
        Self { lists }
    }

    pub fn get(&self, key: ScoreKey) -> Option<&ModeTierLists> {
        self.lists.get(&key)
    }

    pub fn role(&self, key: ScoreKey, role: Role) -> Option<&TierPartition> {
        self.get(key).and_then(|lists| lists.by_role.get(&role))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreKey, &ModeTierLists)> {
        self.lists.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order_highest_first() {
        assert!(Tier::S < Tier::A);
        assert!(Tier::C < Tier::D);
        assert_eq!(Tier::lowest(), Tier::D);
        assert_eq!(Tier::RANKED.len() + 1, Tier::ALL.len());
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(format!("{}", Tier::S), "S");
        assert_eq!(format!("{}", Tier::D), "D");
    }

    #[test]
    fn test_empty_partition_has_five_buckets() {
        let partition = TierPartition::new();
        assert_eq!(partition.iter().count(), 5);
        assert!(partition.is_empty());
        assert_eq!(partition.sizes(), [0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_partition_push_and_lookup() {
        let mut partition = TierPartition::new();
        partition.push(Tier::S, "Acheron".into());
        partition.push(Tier::D, "Arlan".into());
        partition.push(Tier::D, "Hook".into());

        assert_eq!(partition.len(), 3);
        assert_eq!(partition.tier_of("Acheron"), Some(Tier::S));
        assert_eq!(partition.tier_of("Hook"), Some(Tier::D));
        assert_eq!(partition.tier_of("Kafka"), None);
        assert_eq!(partition.sizes(), [1, 0, 0, 0, 2]);
        assert_eq!(partition.bucket(Tier::D)[0].as_str(), "Arlan");
    }

    #[test]
    fn test_partition_serializes_as_tier_map() {
        let mut partition = TierPartition::new();
        partition.push(Tier::A, "Robin".into());
        let json = serde_json::to_string(&partition).unwrap();
        assert_eq!(
            json,
            r#"{"S":[],"A":["Robin"],"B":[],"C":[],"D":[]}"#
        );
    }
}
