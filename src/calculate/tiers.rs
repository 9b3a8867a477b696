//! Quota-based tier assignment.
//!
//! Viable characters are ranked by score (descending, ties broken by name
//! ascending) and dealt into S, A, B and C by ratio quota, each ranked tier
//! getting at least one character while any remain. D takes what is left,
//! followed by every non-viable character in name order.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::{ScoringConfig, TierRatios};
use crate::models::{CharacterId, StatsSnapshot, Tier, TierPartition};

/// Bucket sizes for `n` ranked characters, indexed by `Tier::index`.
///
/// Each ranked tier asks for `max(1, round(n * ratio))` (ties rounded to
/// even) but never more than the characters still unassigned, so tiers
/// filled earlier win when small inputs over-allocate. The sizes always
/// sum to `n`.
pub fn tier_counts(n: usize, ratios: &TierRatios) -> [usize; 5] {
    let mut counts = [0usize; 5];
    let mut remaining = n;

    for (tier, ratio) in Tier::RANKED.iter().zip(ratios.as_array()) {
        let requested = ((n as f64 * ratio).round_ties_even() as usize).max(1);
        let granted = requested.min(remaining);
        if granted < requested {
            debug!(
                "Tier {} quota truncated from {} to {} (n={})",
                tier, requested, granted, n
            );
        }
        counts[tier.index()] = granted;
        remaining -= granted;
    }

    counts[Tier::lowest().index()] = remaining;
    counts
}

/// Partition scored characters into tiers.
///
/// With `raw` supplied, characters that have no mode at or above the
/// configured minimum usage (or no stats at all) skip ranking and go to D.
/// Without it every character is ranked.
pub fn assign_tiers(
    scores: &BTreeMap<CharacterId, f64>,
    raw: Option<&StatsSnapshot>,
    config: &ScoringConfig,
) -> TierPartition {
    let min_usage = config.usage.min;
    let (mut viable, non_viable): (Vec<_>, Vec<_>) = scores
        .iter()
        .partition(|(character, _)| match raw {
            Some(snapshot) => snapshot.is_viable(character.as_str(), min_usage),
            None => true,
        });

    viable.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let counts = tier_counts(viable.len(), &config.tier_ratios);
    let mut partition = TierPartition::new();
    let mut ranked = viable.into_iter();

    for tier in Tier::ALL {
        for (character, _) in ranked.by_ref().take(counts[tier.index()]) {
            partition.push(tier, character.clone());
        }
    }

    // BTreeMap iteration keeps these in name order.
    for (character, _) in &non_viable {
        partition.push(Tier::lowest(), (*character).clone());
    }

    debug!(
        "Assigned {} characters ({} non-viable): {:?}",
        partition.len(),
        non_viable.len(),
        partition.sizes()
    );

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CharacterStats, CycleStats};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn scores(entries: &[(&str, f64)]) -> BTreeMap<CharacterId, f64> {
        entries
            .iter()
            .map(|(name, score)| (CharacterId::from(*name), *score))
            .collect()
    }

    fn ranked(n: usize) -> BTreeMap<CharacterId, f64> {
        (0..n)
            .map(|i| (CharacterId::from(format!("c{:02}", i)), 1.0 - i as f64 / 100.0))
            .collect()
    }

    fn with_usage(entries: &[(&str, f64)]) -> StatsSnapshot {
        entries
            .iter()
            .map(|(name, usage)| {
                (
                    CharacterId::from(*name),
                    CharacterStats {
                        moc: Some(CycleStats {
                            cycles: 5.0,
                            usage: *usage,
                        }),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    fn names(partition: &TierPartition, tier: Tier) -> Vec<&str> {
        partition.bucket(tier).iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_counts_for_ten() {
        assert_eq!(tier_counts(10, &TierRatios::default()), [1, 2, 3, 3, 1]);
    }

    #[test]
    fn test_counts_small_inputs_are_clamped() {
        let ratios = TierRatios::default();
        assert_eq!(tier_counts(0, &ratios), [0, 0, 0, 0, 0]);
        assert_eq!(tier_counts(1, &ratios), [1, 0, 0, 0, 0]);
        assert_eq!(tier_counts(2, &ratios), [1, 1, 0, 0, 0]);
        assert_eq!(tier_counts(3, &ratios), [1, 1, 1, 0, 0]);
        assert_eq!(tier_counts(4, &ratios), [1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_counts_round_half_to_even() {
        // 25 * 0.1 = 2.5 -> 2, 25 * 0.2 = 5, 25 * 0.3 = 7.5 -> 8
        assert_eq!(tier_counts(25, &TierRatios::default()), [2, 5, 8, 8, 2]);
        // 5 * 0.1 = 0.5 -> 0 -> min 1, 5 * 0.3 = 1.5 -> 2
        assert_eq!(tier_counts(5, &TierRatios::default()), [1, 1, 2, 1, 0]);
    }

    #[test]
    fn test_empty_input_gives_empty_buckets() {
        let partition = assign_tiers(&BTreeMap::new(), None, &ScoringConfig::default());
        assert!(partition.is_empty());
        assert_eq!(partition.iter().count(), 5);
    }

    #[test]
    fn test_ten_characters_fill_by_rank() {
        let partition = assign_tiers(&ranked(10), None, &ScoringConfig::default());

        assert_eq!(names(&partition, Tier::S), vec!["c00"]);
        assert_eq!(names(&partition, Tier::A), vec!["c01", "c02"]);
        assert_eq!(names(&partition, Tier::B), vec!["c03", "c04", "c05"]);
        assert_eq!(names(&partition, Tier::C), vec!["c06", "c07", "c08"]);
        assert_eq!(names(&partition, Tier::D), vec!["c09"]);
    }

    #[test]
    fn test_three_characters_short_lower_tiers() {
        let partition = assign_tiers(
            &scores(&[("Seele", 0.2), ("Qingque", 0.9), ("Sampo", 0.5)]),
            None,
            &ScoringConfig::default(),
        );

        assert_eq!(partition.len(), 3);
        assert_eq!(names(&partition, Tier::S), vec!["Qingque"]);
        assert_eq!(names(&partition, Tier::A), vec!["Sampo"]);
        assert_eq!(names(&partition, Tier::B), vec!["Seele"]);
        assert!(partition.bucket(Tier::C).is_empty());
        assert!(partition.bucket(Tier::D).is_empty());
    }

    #[test]
    fn test_ties_broken_by_name() {
        let partition = assign_tiers(
            &scores(&[("Yunli", 0.5), ("Blade", 0.5), ("March 7th", 0.5), ("Jingliu", 0.5)]),
            None,
            &ScoringConfig::default(),
        );

        assert_eq!(names(&partition, Tier::S), vec!["Blade"]);
        assert_eq!(names(&partition, Tier::A), vec!["Jingliu"]);
        assert_eq!(names(&partition, Tier::B), vec!["March 7th"]);
        assert_eq!(names(&partition, Tier::C), vec!["Yunli"]);
    }

    #[test]
    fn test_non_viable_always_in_d() {
        let scored = scores(&[
            ("Acheron", 0.99),
            ("Pela", 0.7),
            ("Sushang", 0.6),
            ("Yukong", 0.5),
            ("Luka", 0.4),
        ]);
        let raw = with_usage(&[
            ("Acheron", 0.2),
            ("Pela", 50.0),
            ("Sushang", 10.0),
            ("Yukong", 5.0),
            ("Luka", 3.0),
        ]);
        let partition = assign_tiers(&scored, Some(&raw), &ScoringConfig::default());

        assert_eq!(partition.tier_of("Acheron"), Some(Tier::D));
        assert_eq!(names(&partition, Tier::S), vec!["Pela"]);
        assert_eq!(names(&partition, Tier::C), vec!["Luka"]);
        assert_eq!(partition.len(), 5);
    }

    #[test]
    fn test_missing_raw_stats_are_non_viable() {
        let scored = scores(&[("Clara", 0.8), ("Welt", 0.3)]);
        let raw = with_usage(&[("Welt", 20.0)]);
        let partition = assign_tiers(&scored, Some(&raw), &ScoringConfig::default());

        assert_eq!(partition.tier_of("Welt"), Some(Tier::S));
        assert_eq!(partition.tier_of("Clara"), Some(Tier::D));
    }

    #[test]
    fn test_non_viable_follow_ranked_in_d() {
        let mut scored = ranked(10);
        scored.insert(CharacterId::from("b-rare"), 0.1);
        scored.insert(CharacterId::from("a-rare"), 0.05);
        let mut raw = with_usage(&[("a-rare", 0.1), ("b-rare", 0.0)]);
        for (character, _) in ranked(10) {
            raw.insert(
                character,
                CharacterStats {
                    moc: Some(CycleStats {
                        cycles: 5.0,
                        usage: 30.0,
                    }),
                    ..Default::default()
                },
            );
        }

        let partition = assign_tiers(&scored, Some(&raw), &ScoringConfig::default());
        assert_eq!(names(&partition, Tier::D), vec!["c09", "a-rare", "b-rare"]);
    }

    #[test]
    fn test_without_raw_everyone_ranked() {
        let partition = assign_tiers(&scores(&[("Arlan", 0.01)]), None, &ScoringConfig::default());
        assert_eq!(partition.tier_of("Arlan"), Some(Tier::S));
    }

    proptest! {
        #[test]
        fn prop_partition_is_complete(
            entries in proptest::collection::btree_map("[a-z]{1,6}", 0.0..1.0f64, 0..40),
            usages in proptest::collection::vec(0.0..2.0f64, 40),
        ) {
            let scored: BTreeMap<CharacterId, f64> = entries
                .into_iter()
                .map(|(k, v)| (CharacterId::from(k), v))
                .collect();
            let raw: StatsSnapshot = scored
                .keys()
                .zip(usages)
                .map(|(c, usage)| {
                    (c.clone(), CharacterStats {
                        moc: Some(CycleStats { cycles: 5.0, usage }),
                        ..Default::default()
                    })
                })
                .collect();

            let partition = assign_tiers(&scored, Some(&raw), &ScoringConfig::default());

            prop_assert_eq!(partition.len(), scored.len());
            for character in scored.keys() {
                let hits = partition
                    .iter()
                    .filter(|(_, members)| members.contains(character))
                    .count();
                prop_assert_eq!(hits, 1);
                if !raw.is_viable(character.as_str(), 0.5) {
                    prop_assert_eq!(partition.tier_of(character.as_str()), Some(Tier::D));
                }
            }
        }

        #[test]
        fn prop_ranked_tiers_non_empty_from_four(n in 4usize..200) {
            let counts = tier_counts(n, &TierRatios::default());
            prop_assert_eq!(counts.iter().sum::<usize>(), n);
            for tier in Tier::RANKED {
                prop_assert!(counts[tier.index()] >= 1);
            }
        }
    }
}
