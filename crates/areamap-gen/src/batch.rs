//! Batch processing of an index range of episodes.
//!
//! Every index is self-contained: its record is decoded, mapped and written
//! on its own, so a range can be re-run or split across processes and the
//! files come out the same.

use std::fs;
use std::ops::Range;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use areamap_logic::blockmodel::BlockModelDetector;
use areamap_logic::config::PartitionConfig;
use areamap_logic::episode::{process_episode, Outcome};
use areamap_logic::rooms::RoomSet;

/// What happened to one episode.
#[derive(Debug, Clone, PartialEq)]
pub enum EpisodeStatus {
    /// File name under the output directory.
    Written(String),
    Skipped,
    Failed(String),
}

/// Result of a batch, persisted as the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub start: usize,
    pub end: usize,
    /// File names of written records, in index order.
    pub files: Vec<String>,
    pub skipped: Vec<usize>,
    pub failed: Vec<FailedEpisode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedEpisode {
    pub index: usize,
    pub error: String,
}

pub struct Batch<'a> {
    pub rooms: &'a RoomSet,
    pub episodes: &'a [Vec<i64>],
    pub config: &'a PartitionConfig,
    pub out_dir: &'a Path,
}

impl Batch<'_> {
    /// Map `range` and write one file per mapped episode plus the manifest.
    ///
    /// `jobs` above 1 spreads the indices over a thread pool.
    pub fn run(&self, range: Range<usize>, jobs: usize) -> Result<BatchSummary> {
        if range.start > range.end || range.end > self.episodes.len() {
            bail!(
                "invalid range {}..{} for {} episodes",
                range.start,
                range.end,
                self.episodes.len()
            );
        }
        fs::create_dir_all(self.out_dir)
            .with_context(|| format!("creating {}", self.out_dir.display()))?;

        let indices: Vec<usize> = range.clone().collect();
        let statuses: Vec<EpisodeStatus> = if jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("building thread pool")?;
            pool.install(|| {
                indices
                    .par_iter()
                    .map(|&index| self.run_one(index, &range))
                    .collect::<Result<Vec<_>>>()
            })?
        } else {
            indices
                .iter()
                .map(|&index| self.run_one(index, &range))
                .collect::<Result<Vec<_>>>()?
        };

        let mut summary = BatchSummary {
            start: range.start,
            end: range.end,
            ..BatchSummary::default()
        };
        for (index, status) in indices.into_iter().zip(statuses) {
            match status {
                EpisodeStatus::Written(name) => summary.files.push(name),
                EpisodeStatus::Skipped => summary.skipped.push(index),
                EpisodeStatus::Failed(error) => {
                    summary.failed.push(FailedEpisode { index, error });
                }
            }
        }

        let manifest = self
            .out_dir
            .join(format!("manifest-{}-{}.json", range.start, range.end));
        write_json(&manifest, &summary)?;
        log::info!(
            "batch {}..{}: {} written, {} skipped, {} failed",
            range.start,
            range.end,
            summary.files.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Map a single index. Only batch-fatal problems come back as `Err`.
    fn run_one(&self, index: usize, range: &Range<usize>) -> Result<EpisodeStatus> {
        log::info!("episode {index} ({}-{})", range.start, range.end);
        let record = &self.episodes[index];
        let detector = BlockModelDetector::default();
        match process_episode(self.rooms, record, self.config, &detector) {
            Ok(Outcome::Mapped { record, stats }) => {
                let name = format!("{index}.json");
                write_json(&self.out_dir.join(&name), &record)?;
                log::info!(
                    "episode {index}: mapped at trial {} of {} (cost {:.2})",
                    stats.trial,
                    stats.trials_run,
                    stats.cost
                );
                Ok(EpisodeStatus::Written(name))
            }
            Ok(Outcome::Skipped { trials }) => {
                log::info!("episode {index}: no valid partition in {trials} trials, skipping");
                Ok(EpisodeStatus::Skipped)
            }
            Err(e) if e.is_batch_fatal() => {
                Err(e).with_context(|| format!("episode {index} has a malformed record"))
            }
            Err(e) => {
                log::warn!("episode {index}: {e}");
                Ok(EpisodeStatus::Failed(e.to_string()))
            }
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
