//! Budgeted partition search.
//!
//! Trial `t` seeds the detector with `first_seed + t`, so every trial is
//! reproducible on its own. Trials run in increasing order: under
//! [`SearchPolicy::FirstImprovement`] the first valid proposal ends the
//! search, so reordering trials would change the result.

use crate::blockmodel::{CommunityDetector, Proposal};
use crate::config::{PartitionConfig, SearchPolicy};
use crate::error::DetectorError;
use crate::graph::DoorGraph;
use crate::validity::ValidityChecker;

/// The partition a search settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Area of each vertex of the searched graph.
    pub labels: Vec<usize>,
    pub cost: f64,
    /// Trial that produced `labels`.
    pub trial: u64,
    /// Trials actually run, including the selected one.
    pub trials_run: u64,
}

/// Run up to `config.trials` detector passes and keep the best valid one.
///
/// `Ok(None)` means no trial produced a valid partition; that is an expected
/// outcome, not an error. A proposal that does not label every vertex with a
/// block below `config.num_areas` is a detector fault and ends the search.
pub fn search_partition<D: CommunityDetector + ?Sized>(
    graph: &DoorGraph,
    checker: &ValidityChecker<'_>,
    detector: &D,
    config: &PartitionConfig,
) -> Result<Option<SearchResult>, DetectorError> {
    let mut best: Option<SearchResult> = None;

    for trial in 0..config.trials {
        let seed = config.first_seed.wrapping_add(trial);
        let proposal = detector.partition(graph, config.num_areas, seed)?;
        check_proposal(&proposal, graph.vertex_count(), config.num_areas, seed)?;
        if !checker.is_valid(&proposal.labels) {
            continue;
        }
        if best.as_ref().is_some_and(|b| proposal.cost >= b.cost) {
            continue;
        }

        log::debug!("trial {}: valid partition, cost {:.3}", trial, proposal.cost);
        best = Some(SearchResult {
            labels: proposal.labels,
            cost: proposal.cost,
            trial,
            trials_run: trial + 1,
        });
        if config.policy == SearchPolicy::FirstImprovement {
            break;
        }
    }

    if config.policy == SearchPolicy::Exhaustive {
        if let Some(b) = best.as_mut() {
            b.trials_run = config.trials;
        }
    }
    Ok(best)
}

fn check_proposal(
    proposal: &Proposal,
    vertices: usize,
    blocks: usize,
    seed: u64,
) -> Result<(), DetectorError> {
    if proposal.labels.len() != vertices {
        return Err(DetectorError::ProposalLength {
            seed,
            len: proposal.labels.len(),
            vertices,
        });
    }
    match proposal.labels.iter().find(|&&label| label >= blocks) {
        Some(&label) => Err(DetectorError::ProposalLabel {
            seed,
            label,
            blocks,
        }),
        None => Ok(()),
    }
}
