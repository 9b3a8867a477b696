//! Composite scores per character and mode.

use tracing::debug;

use crate::config::{ScoringConfig, UsageBounds};
use crate::models::{CharacterId, GameMode, ModeReading, ScoreKey, ScoreTable, StatsSnapshot};

/// How a mode's raw metric maps onto a [0, 1] performance value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceCurve {
    /// Fewer is better: `(cap - min(cycles, cap)) / cap`.
    CycleCap { cap: f64 },
    /// More is better: `clamp(score, floor, ceiling) / ceiling`.
    ScoreRange { floor: f64, ceiling: f64 },
}

impl PerformanceCurve {
    pub fn for_mode(mode: GameMode, config: &ScoringConfig) -> Self {
        match mode {
            GameMode::MemoryOfChaos => PerformanceCurve::CycleCap {
                cap: config.cycle_cap,
            },
            GameMode::PureFiction => PerformanceCurve::ScoreRange {
                floor: config.pure_fiction.floor,
                ceiling: config.pure_fiction.ceiling,
            },
            GameMode::ApocalypticShadow => PerformanceCurve::ScoreRange {
                floor: config.apocalyptic_shadow.floor,
                ceiling: config.apocalyptic_shadow.ceiling,
            },
        }
    }

    /// Normalized performance. NaN is treated as the worst value on the curve.
    ///
    /// Bounds are applied as `max` then `min`, so a curve built from an
    /// unvalidated config with inverted bounds never panics.
    pub fn performance(&self, raw: f64) -> f64 {
        match *self {
            PerformanceCurve::CycleCap { cap } => {
                // Negative cycle counts are clamped to 0 so performance never exceeds 1.
                let cycles = if raw.is_nan() { cap } else { raw.max(0.0).min(cap) };
                (cap - cycles) / cap
            }
            PerformanceCurve::ScoreRange { floor, ceiling } => {
                let score = if raw.is_nan() {
                    floor
                } else {
                    raw.max(floor).min(ceiling)
                };
                score / ceiling
            }
        }
    }
}

/// Usage percentage clamped to `[min, cap]` and scaled to a fraction.
pub fn usage_component(usage: f64, bounds: &UsageBounds) -> f64 {
    let usage = if usage.is_nan() {
        bounds.min
    } else {
        usage.max(bounds.min).min(bounds.cap)
    };
    usage / 100.0
}

/// Weighted composite of performance and usage for a single mode.
pub fn mode_score(mode: GameMode, reading: ModeReading, config: &ScoringConfig) -> f64 {
    let performance = PerformanceCurve::for_mode(mode, config).performance(reading.raw);
    let usage = usage_component(reading.usage, &config.usage);

    config.weights.performance * performance + config.weights.usage * usage
}

/// Score every character in every mode it has data for, then average the
/// available mode scores into the general partition.
pub fn compute_scores(snapshot: &StatsSnapshot, config: &ScoringConfig) -> ScoreTable {
    let mut table = ScoreTable::new();

    for (character, stats) in snapshot.iter() {
        let mut sum = 0.0;
        let mut count = 0usize;

        for mode in GameMode::ALL {
            let Some(reading) = stats.reading(mode) else {
                continue;
            };
            let score = mode_score(mode, reading, config);
            table.insert(ScoreKey::from(mode), character.clone(), score);
            sum += score;
            count += 1;
        }

        if count > 0 {
            table.insert(ScoreKey::General, character.clone(), sum / count as f64);
        }
    }

    debug!(
        "Scored {} characters (moc={}, pf={}, as={})",
        table.partition(ScoreKey::General).len(),
        table.partition(ScoreKey::MemoryOfChaos).len(),
        table.partition(ScoreKey::PureFiction).len(),
        table.partition(ScoreKey::ApocalypticShadow).len(),
    );

    table
}

/// Mean of a character's available mode scores.
pub fn general_score(table: &ScoreTable, character: &CharacterId) -> Option<f64> {
    let scores: Vec<f64> = GameMode::ALL
        .iter()
        .filter_map(|mode| table.get(ScoreKey::from(*mode), character.as_str()))
        .collect();

    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
