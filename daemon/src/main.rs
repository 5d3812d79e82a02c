//! auditord — replay operations against the auditor election contract and
//! inspect stored state.

mod scenario;
mod snapshot;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use auditor_store::{AuditorStore, CandidateStore, StateStore, VoteStore};
use auditor_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment, DEFAULT_MAP_SIZE};
use auditor_types::AuditorConfig;
use auditor_utils::{format_duration, init_logging, LogFormat};
use clap::Parser;
use serde::Serialize;

use crate::scenario::{replay, Scenario};

#[derive(Parser)]
#[command(name = "auditord", about = "Auditor election contract tool")]
struct Cli {
    /// Path to a TOML contract configuration. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "AUDITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Committee size.
    #[arg(long, env = "AUDITOR_NUMELECTED")]
    numelected: Option<u8>,

    /// Maximum candidates per vote.
    #[arg(long, env = "AUDITOR_MAXVOTES")]
    maxvotes: Option<u8>,

    /// Minimum seconds between tenure rotations.
    #[arg(long, env = "AUDITOR_PERIOD_LENGTH")]
    period_length: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "AUDITOR_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "AUDITOR_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a JSON scenario and print the outcome of every step.
    Replay {
        /// Scenario file.
        #[arg(long)]
        scenario: PathBuf,

        /// Persist into this LMDB directory instead of memory.
        #[arg(long, env = "AUDITOR_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Print one stored collection as JSON.
    Show {
        #[arg(long, env = "AUDITOR_DATA_DIR")]
        data_dir: PathBuf,

        #[arg(value_enum)]
        collection: Collection,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Collection {
    Candidates,
    Votes,
    Auditors,
    State,
}

fn load_config(cli: &Cli) -> anyhow::Result<AuditorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let cfg = AuditorConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            cfg
        }
        None => AuditorConfig::default(),
    };
    if let Some(n) = cli.numelected {
        config.numelected = n;
    }
    if let Some(n) = cli.maxvotes {
        config.maxvotes = n;
    }
    if let Some(secs) = cli.period_length {
        config.period_length = secs;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn open_existing(data_dir: &Path) -> anyhow::Result<LmdbEnvironment> {
    if !data_dir.exists() {
        bail!("no data directory at {}", data_dir.display());
    }
    check_data_dir(data_dir).map_err(anyhow::Error::msg)?;
    let env = LmdbEnvironment::open(data_dir, DEFAULT_MAP_SIZE)
        .with_context(|| format!("opening {}", data_dir.display()))?;
    let report = check_integrity(&env)?;
    for problem in &report.errors {
        tracing::warn!(%problem, "integrity check");
    }
    Ok(env)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level)?;

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Replay { scenario, data_dir } => {
            let scenario = Scenario::from_json_file(scenario)?;
            tracing::info!(
                steps = scenario.steps.len(),
                numelected = config.numelected,
                release_delay = %format_duration(config.lockup_release_time_delay),
                period = %format_duration(config.period_length),
                "replaying scenario"
            );
            let report = match data_dir {
                Some(dir) => {
                    check_data_dir(dir).map_err(anyhow::Error::msg)?;
                    let env = LmdbEnvironment::open(dir, DEFAULT_MAP_SIZE)
                        .with_context(|| format!("opening {}", dir.display()))?;
                    replay(&config, &env, &scenario)?
                }
                None => {
                    let store = auditor_nullables::NullStore::new();
                    replay(&config, &store, &scenario)?
                }
            };
            tracing::info!(
                committed = report.committed,
                rejected = report.rejected,
                "replay finished"
            );
            print_json(&report)?;
        }
        Command::Show {
            data_dir,
            collection,
        } => {
            let env = open_existing(data_dir)?;
            match collection {
                Collection::Candidates => print_json(&env.iter_candidates()?)?,
                Collection::Votes => print_json(&env.iter_votes()?)?,
                Collection::Auditors => print_json(&env.auditors()?)?,
                Collection::State => print_json(&env.election_state()?)?,
            }
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}
