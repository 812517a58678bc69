//! areamap batch driver
//!
//! Turns encoded room placements into area-partitioned map records.
//!
//! Usage:
//!   areamap-gen --rooms rooms.json --episodes episodes.json 0 100 out/
//!   areamap-gen --rooms rooms.json --episodes episodes.json 0 100 out/ --areas 4 --jobs 8
//!
//! Logging goes through `RUST_LOG` (default `info`).

mod batch;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use areamap_logic::config::{PartitionConfig, SearchPolicy};
use areamap_logic::rooms::RoomSet;

use batch::Batch;

/// Partition placed room layouts into areas.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Room table (JSON array of rooms)
    #[arg(long)]
    rooms: PathBuf,

    /// Encoded placement records (JSON array of integer arrays)
    #[arg(long)]
    episodes: PathBuf,

    /// First episode index
    start: usize,

    /// One past the last episode index
    end: usize,

    /// Directory receiving `<index>.json` and the manifest
    out_dir: PathBuf,

    /// Partition settings (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of areas
    #[arg(long)]
    areas: Option<usize>,

    /// Partition attempts per episode
    #[arg(long)]
    trials: Option<u64>,

    /// Run every trial and keep the lowest-cost valid partition
    #[arg(long)]
    exhaustive: bool,

    /// Worker threads
    #[arg(long, default_value_t = 1)]
    jobs: usize,
}

impl Args {
    fn partition_config(&self) -> Result<PartitionConfig> {
        let mut config = match &self.config {
            Some(path) => PartitionConfig::from_json(&read(path)?)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PartitionConfig::default(),
        };
        if let Some(areas) = self.areas {
            config.num_areas = areas;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if self.exhaustive {
            config.policy = SearchPolicy::Exhaustive;
        }
        config.validate()?;
        Ok(config)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.partition_config()?;

    let rooms = RoomSet::from_json(&read(&args.rooms)?, &config.toilet_room, &config.anchor_room)
        .with_context(|| format!("loading rooms {}", args.rooms.display()))?;
    let episodes: Vec<Vec<i64>> = serde_json::from_str(&read(&args.episodes)?)
        .with_context(|| format!("parsing episodes {}", args.episodes.display()))?;
    log::info!(
        "{} rooms, {} episodes, {} areas, {} trials ({:?})",
        rooms.len(),
        episodes.len(),
        config.num_areas,
        config.trials,
        config.policy
    );

    Batch {
        rooms: &rooms,
        episodes: &episodes,
        config: &config,
        out_dir: &args.out_dir,
    }
    .run(args.start..args.end, args.jobs)?;
    Ok(())
}
