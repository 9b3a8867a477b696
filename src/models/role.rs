//! Character roles.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CharacterId;

/// Functional role a character fills in a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "DPS")]
    Dps,
    #[serde(rename = "Sub DPS")]
    SubDps,
    Amplifier,
    Sustain,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Dps, Role::SubDps, Role::Amplifier, Role::Sustain];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Dps => "DPS",
            Role::SubDps => "Sub DPS",
            Role::Amplifier => "Amplifier",
            Role::Sustain => "Sustain",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "dps" => Ok(Role::Dps),
            "subdps" => Ok(Role::SubDps),
            "amplifier" => Ok(Role::Amplifier),
            "sustain" => Ok(Role::Sustain),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Which roles each character holds. Characters absent from the map hold none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleAssignment {
    roles: BTreeMap<CharacterId, BTreeSet<Role>>,
}

impl RoleAssignment {
    pub fn new(roles: BTreeMap<CharacterId, BTreeSet<Role>>) -> Self {
        Self { roles }
    }

    pub fn roles_of(&self, character: &str) -> Option<&BTreeSet<Role>> {
        self.roles.get(character)
    }

    pub fn has_role(&self, character: &str, role: Role) -> bool {
        self.roles_of(character)
            .map(|roles| roles.contains(&role))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl FromIterator<(CharacterId, BTreeSet<Role>)> for RoleAssignment {
    fn from_iter<I: IntoIterator<Item = (CharacterId, BTreeSet<Role>)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
