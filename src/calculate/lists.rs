//! Role-stratified tier lists for every score partition.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::models::{
    CharacterId, ModeTierLists, Role, RoleAssignment, ScoreKey, ScoreTable, StatsSnapshot,
    TierLists,
};

use super::assign_tiers;

/// Scores of the characters that hold `role`.
pub fn filter_by_role(
    scores: &BTreeMap<CharacterId, f64>,
    roles: &RoleAssignment,
    role: Role,
) -> BTreeMap<CharacterId, f64> {
    scores
        .iter()
        .filter(|(character, _)| roles.has_role(character.as_str(), role))
        .map(|(character, score)| (character.clone(), *score))
        .collect()
}

/// Build the overall and per-role tier lists for each score partition.
///
/// Viability always comes from `snapshot`. Roles with no scored characters
/// are left out. When `roles` is `None` only the overall lists are built.
pub fn build_tier_lists(
    snapshot: &StatsSnapshot,
    scores: &ScoreTable,
    roles: Option<&RoleAssignment>,
    config: &ScoringConfig,
) -> TierLists {
    if roles.is_none() {
        warn!("Role data not found, building overall tier lists only");
    }

    let mut lists = BTreeMap::new();

    for key in ScoreKey::ALL {
        let partition = scores.partition(key);
        let mut mode_lists = ModeTierLists {
            overall: assign_tiers(partition, Some(snapshot), config),
            by_role: BTreeMap::new(),
        };

        if let Some(roles) = roles {
            for role in Role::ALL {
                let role_scores = filter_by_role(partition, roles, role);
                if role_scores.is_empty() {
                    debug!("No {} characters scored for {}", role, key);
                    continue;
                }
                mode_lists
                    .by_role
                    .insert(role, assign_tiers(&role_scores, Some(snapshot), config));
            }
        }

        lists.insert(key, mode_lists);
    }

    TierLists::new(lists)
}
