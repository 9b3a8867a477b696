//! Clear-record aggregation.
//!
//! Reads community clear records (one row per cleared half of a stage) and
//! reduces them to per-character averages and usage rates:
//! 1. Keep rows on the target floor with a full-star clear
//! 2. Keep only stages where both halves were cleared by the same player
//! 3. Average the stage metric per character and count appearances

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{CharacterId, CharacterStats, CycleStats, ScoreStats, StatsSnapshot};

/// Errors that can occur while reading clear records.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of a clear-record export.
///
/// Numeric columns that fail to parse are read as missing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClearRecord {
    pub uid: String,

    #[serde(deserialize_with = "csv::invalid_option")]
    pub floor: Option<f64>,

    #[serde(deserialize_with = "csv::invalid_option")]
    pub star_num: Option<f64>,

    /// Cycles for Memory of Chaos, points for the score modes
    #[serde(deserialize_with = "csv::invalid_option")]
    pub round_num: Option<f64>,

    #[serde(default)]
    pub ch1: Option<String>,
    #[serde(default)]
    pub ch2: Option<String>,
    #[serde(default)]
    pub ch3: Option<String>,
    #[serde(default)]
    pub ch4: Option<String>,
}

impl ClearRecord {
    /// Normalized names of the team members on this row.
    pub fn characters(&self) -> impl Iterator<Item = CharacterId> + '_ {
        [&self.ch1, &self.ch2, &self.ch3, &self.ch4]
            .into_iter()
            .filter_map(|name| name.as_deref().and_then(normalize_name))
    }
}

/// Which rows count toward a mode's statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageFilter {
    pub floor: f64,
    pub stars: f64,
}

impl StageFilter {
    /// Memory of Chaos: final floor, full stars.
    pub const MEMORY_OF_CHAOS: StageFilter = StageFilter {
        floor: 12.0,
        stars: 3.0,
    };

    /// Pure Fiction and Apocalyptic Shadow: final floor, full stars.
    pub const SCORE_MODE: StageFilter = StageFilter {
        floor: 4.0,
        stars: 3.0,
    };

    fn matches(&self, record: &ClearRecord) -> bool {
        record.floor == Some(self.floor) && record.star_num == Some(self.stars)
    }
}

/// Average metric and usage percentage for one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub average: f64,
    pub usage: f64,
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Canonical form of a character name, or `None` for blank cells.
///
/// Collapses whitespace runs, trims, drops a trailing `.0` left by numeric
/// exports and rejects the literal `nan`.
pub fn normalize_name(raw: &str) -> Option<CharacterId> {
    let name = whitespace().replace_all(raw.trim(), " ");
    let name = match name.strip_suffix(".0") {
        Some(stem) if !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()) => stem,
        _ => &name[..],
    };

    if name.is_empty() || name.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(CharacterId::from(name))
    }
}

/// Parse clear records from CSV with a header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ClearRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize() {
        records.push(row?);
    }

    debug!("Read {} clear records", records.len());
    Ok(records)
}

/// Parse clear records from a CSV file.
pub fn read_records_from_path(path: &Path) -> Result<Vec<ClearRecord>, IngestError> {
    info!("Reading clear records: {:?}", path);
    let file = std::fs::File::open(path)?;
    read_records(file)
}

/// Reduce records to per-character averages of `round_num`.
///
/// Only stages where the player cleared both halves count; usage is the
/// share of those stages that included the character, in percent. Rows with
/// a missing or non-finite metric are dropped before stages are grouped.
pub fn aggregate_stages(
    records: &[ClearRecord],
    filter: StageFilter,
) -> BTreeMap<CharacterId, Aggregate> {
    let mut stages: BTreeMap<&str, Vec<&ClearRecord>> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| filter.matches(r) && r.round_num.is_some_and(f64::is_finite))
    {
        stages.entry(record.uid.as_str()).or_default().push(record);
    }
    stages.retain(|_, halves| halves.len() == 2);

    let total_stages = stages.len();
    debug!(
        "{} of {} records form {} complete stages",
        total_stages * 2,
        records.len(),
        total_stages
    );

    if total_stages == 0 {
        warn!(
            "No complete stages found for floor {} at {} stars",
            filter.floor, filter.stars
        );
        return BTreeMap::new();
    }

    let mut totals: BTreeMap<CharacterId, (f64, usize)> = BTreeMap::new();
    for record in stages.values().flatten() {
        let Some(metric) = record.round_num else {
            continue;
        };
        for character in record.characters() {
            let entry = totals.entry(character).or_insert((0.0, 0));
            entry.0 += metric;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(character, (sum, count))| {
            let aggregate = Aggregate {
                average: sum / count as f64,
                usage: count as f64 / total_stages as f64 * 100.0,
            };
            (character, aggregate)
        })
        .collect()
}

/// Memory of Chaos statistics from raw records.
pub fn aggregate_cycle_mode(records: &[ClearRecord]) -> BTreeMap<CharacterId, CycleStats> {
    let stats: BTreeMap<_, _> = aggregate_stages(records, StageFilter::MEMORY_OF_CHAOS)
        .into_iter()
        .map(|(c, a)| {
            (
                c,
                CycleStats {
                    cycles: a.average,
                    usage: a.usage,
                },
            )
        })
        .collect();
    info!("Processed {} characters for moc", stats.len());
    stats
}

/// Pure Fiction or Apocalyptic Shadow statistics from raw records.
pub fn aggregate_score_mode(records: &[ClearRecord]) -> BTreeMap<CharacterId, ScoreStats> {
    let stats: BTreeMap<_, _> = aggregate_stages(records, StageFilter::SCORE_MODE)
        .into_iter()
        .map(|(c, a)| {
            (
                c,
                ScoreStats {
                    score: a.average,
                    usage: a.usage,
                },
            )
        })
        .collect();
    info!("Processed {} characters for a score mode", stats.len());
    stats
}

/// Combine per-mode results into one snapshot keyed by character.
pub fn merge_modes(
    moc: BTreeMap<CharacterId, CycleStats>,
    pf: BTreeMap<CharacterId, ScoreStats>,
    apocalyptic_shadow: BTreeMap<CharacterId, ScoreStats>,
) -> StatsSnapshot {
    let mut combined: BTreeMap<CharacterId, CharacterStats> = BTreeMap::new();

    for (character, stats) in moc {
        combined.entry(character).or_default().moc = Some(stats);
    }
    for (character, stats) in pf {
        combined.entry(character).or_default().pf = Some(stats);
    }
    for (character, stats) in apocalyptic_shadow {
        combined.entry(character).or_default().apocalyptic_shadow = Some(stats);
    }

    info!("Final dataset has {} characters", combined.len());
    StatsSnapshot::new(combined)
}
