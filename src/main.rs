use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hsr_tierlist::calculate::{build_tier_lists, compute_scores};
use hsr_tierlist::config::AppConfig;
use hsr_tierlist::ingest::{self, ClearRecord};
use hsr_tierlist::models::{CharacterId, GameMode, Role, ScoreKey, TierPartition};
use hsr_tierlist::storage::{self, StorageConfig};

#[derive(Parser)]
#[command(name = "hsr-tierlist")]
#[command(about = "Role-based Honkai: Star Rail tier lists from community clear records")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate clear-record CSVs into a new dataset
    Ingest {
        /// Memory of Chaos clear records
        #[arg(long)]
        moc: Option<PathBuf>,

        /// Pure Fiction clear records
        #[arg(long)]
        pf: Option<PathBuf>,

        /// Apocalyptic Shadow clear records
        #[arg(long = "as")]
        apocalyptic_shadow: Option<PathBuf>,

        /// Aggregate and report but don't write the dataset
        #[arg(long)]
        dry_run: bool,
    },

    /// Print composite scores
    Scores {
        /// Only this partition (moc, pf, as, general)
        #[arg(long)]
        mode: Option<ScoreKey>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print role-based tier lists
    Tiers {
        /// Only this partition (moc, pf, as, general)
        #[arg(long)]
        mode: Option<ScoreKey>,

        /// Only this role (dps, sub-dps, amplifier, sustain)
        #[arg(long)]
        role: Option<Role>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List archived datasets
    Archives,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    // Initialize tracing
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting hsr-tierlist v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Ingest {
            moc,
            pf,
            apocalyptic_shadow,
            dry_run,
        } => {
            let moc = ingest::aggregate_cycle_mode(&read_mode_records("moc", moc.as_deref()));
            let pf = ingest::aggregate_score_mode(&read_mode_records("pf", pf.as_deref()));
            let apocalyptic_shadow = ingest::aggregate_score_mode(&read_mode_records(
                "as",
                apocalyptic_shadow.as_deref(),
            ));

            let snapshot = ingest::merge_modes(moc, pf, apocalyptic_shadow);

            println!("\n=== Ingest Results ===");
            println!("Characters:       {}", snapshot.len());
            for mode in GameMode::ALL {
                println!(
                    "{:<18}{}",
                    format!("{}:", mode.display_name()),
                    snapshot.mode_count(mode)
                );
            }

            if dry_run {
                println!("\n(dry run - no data written to disk)");
                return Ok(());
            }

            let archived = storage::save_dataset(&storage, &snapshot)
                .context("Failed to write dataset")?;
            println!("\nDataset written to {:?}", storage.dataset_path());
            if let Some(path) = archived {
                println!("Previous version archived as {:?}", path);
            }
        }

        Commands::Scores { mode, json } => {
            let snapshot = storage::load_dataset(&storage)
                .context("Failed to load dataset (run `ingest` first)")?;
            let scores = compute_scores(&snapshot, &config.scoring);
            let keys = selected_keys(mode);

            if json {
                let selected: BTreeMap<ScoreKey, &BTreeMap<CharacterId, f64>> =
                    keys.iter().map(|k| (*k, scores.partition(*k))).collect();
                println!("{}", serde_json::to_string_pretty(&selected)?);
                return Ok(());
            }

            for key in keys {
                print_heading(key.display_name());
                for (rank, (character, score)) in scores.sorted(key).into_iter().enumerate() {
                    println!("{:>4}. {:<32} {:.4}", rank + 1, character, score);
                }
            }
        }

        Commands::Tiers { mode, role, json } => {
            let snapshot = storage::load_dataset(&storage)
                .context("Failed to load dataset (run `ingest` first)")?;
            let roles = storage::load_roles(&storage).context("Failed to load role file")?;

            let scores = compute_scores(&snapshot, &config.scoring);
            let lists = build_tier_lists(&snapshot, &scores, roles.as_ref(), &config.scoring);

            if json {
                let selected: BTreeMap<ScoreKey, BTreeMap<String, &TierPartition>> = lists
                    .iter()
                    .filter(|(key, _)| mode.map_or(true, |m| m == *key))
                    .map(|(key, mode_lists)| {
                        let mut partitions = BTreeMap::new();
                        if role.is_none() {
                            partitions.insert("All".to_string(), &mode_lists.overall);
                        }
                        for (r, partition) in &mode_lists.by_role {
                            if role.map_or(true, |wanted| wanted == *r) {
                                partitions.insert(r.label().to_string(), partition);
                            }
                        }
                        (key, partitions)
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&selected)?);
                return Ok(());
            }

            for key in selected_keys(mode) {
                let Some(mode_lists) = lists.get(key) else {
                    continue;
                };
                print_heading(key.display_name());

                if role.is_none() {
                    print_partition("All roles", &mode_lists.overall);
                }
                for r in Role::ALL {
                    if role.is_some_and(|wanted| wanted != r) {
                        continue;
                    }
                    if let Some(partition) = mode_lists.by_role.get(&r) {
                        print_partition(r.label(), partition);
                    }
                }
            }
        }

        Commands::Archives => {
            let archives = storage::list_archives(&storage)?;
            if archives.is_empty() {
                println!("No archived datasets in {:?}", storage.archive_dir());
            }
            for path in archives {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Read one mode's records; a failing mode is logged and treated as empty.
fn read_mode_records(mode: &str, path: Option<&Path>) -> Vec<ClearRecord> {
    let Some(path) = path else {
        tracing::info!("No {} records given, skipping", mode);
        return Vec::new();
    };

    match ingest::read_records_from_path(path) {
        Ok(records) => {
            tracing::info!("Processing {} data ({} rows)", mode, records.len());
            records
        }
        Err(e) => {
            tracing::error!("Error processing {} data: {}", mode, e);
            Vec::new()
        }
    }
}

fn selected_keys(mode: Option<ScoreKey>) -> Vec<ScoreKey> {
    match mode {
        Some(key) => vec![key],
        None => ScoreKey::ALL.to_vec(),
    }
}

fn print_heading(title: &str) {
    println!("\n{:^40}", title.to_uppercase());
    println!("{}", "=".repeat(40));
}

fn print_partition(label: &str, partition: &TierPartition) {
    println!("\n{}:", label);
    for (tier, members) in partition.iter() {
        if members.is_empty() {
            continue;
        }
        let names: Vec<&str> = members.iter().map(|c| c.as_str()).collect();
        println!("  {}-tier: {}", tier, names.join(", "));
    }
}
