//! Community detection behind a pluggable interface.
//!
//! The partition search only needs `partition(graph, k, seed) -> (labels,
//! cost)`. [`BlockModelDetector`] fills that contract with a degree-corrected
//! stochastic block model fit by minimum description length:
//!
//! ```text
//! DL = S + L
//! S  = -E - sum_v ln(k_v!) - 1/2 sum_rs e_rs ln(e_rs / (e_r e_s))
//! L  = E h(B(B+1) / 2E) + N ln B,   h(x) = (1+x) ln(1+x) - x ln x
//! ```
//!
//! `e_rs` counts edge endpoints between blocks (`e_rr` is twice the internal
//! edge count) and `e_r` is the total degree of block `r`. A pass starts from
//! a random assignment with every block seeded, then sweeps the vertices in
//! random order, moving each to the block that lowers `DL` the most. Blocks
//! are never emptied, so a pass always returns exactly `B` communities.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::blockmodel::MAX_SWEEPS;
use crate::error::DetectorError;
use crate::graph::DoorGraph;

/// Moves must improve the description length by more than this.
const IMPROVEMENT_EPS: f64 = 1e-9;

/// One proposed partition of the graph's vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    /// Block of each vertex, `0..k`, every block non-empty.
    pub labels: Vec<usize>,
    /// Description length of the proposal; lower is better.
    pub cost: f64,
}

/// A randomized community-detection strategy.
pub trait CommunityDetector {
    /// Split `graph` into exactly `blocks` non-empty communities. The result
    /// must depend only on `graph`, `blocks` and `seed`.
    fn partition(&self, graph: &DoorGraph, blocks: usize, seed: u64)
        -> Result<Proposal, DetectorError>;
}

#[derive(Debug, Clone)]
pub struct BlockModelDetector {
    pub max_sweeps: usize,
}

impl Default for BlockModelDetector {
    fn default() -> Self {
        Self {
            max_sweeps: MAX_SWEEPS,
        }
    }
}

impl CommunityDetector for BlockModelDetector {
    fn partition(
        &self,
        graph: &DoorGraph,
        blocks: usize,
        seed: u64,
    ) -> Result<Proposal, DetectorError> {
        let n = graph.vertex_count();
        if blocks == 0 {
            return Err(DetectorError::ZeroBlocks);
        }
        if n < blocks {
            return Err(DetectorError::TooFewVertices {
                vertices: n,
                blocks,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = BlockState::new(graph, random_assignment(n, blocks, &mut rng), blocks);

        let mut order: Vec<usize> = (0..n).collect();
        let mut targets: Vec<usize> = (0..blocks).collect();
        for _ in 0..self.max_sweeps {
            order.shuffle(&mut rng);
            let mut moved = false;
            for &v in &order {
                let from = state.labels[v];
                if state.sizes[from] == 1 {
                    continue;
                }
                targets.shuffle(&mut rng);
                let mut best = (from, state.entropy());
                for &to in &targets {
                    if to == from {
                        continue;
                    }
                    state.shift(v, to);
                    let s = state.entropy();
                    if s < best.1 - IMPROVEMENT_EPS {
                        best = (to, s);
                    }
                    state.shift(v, from);
                }
                if best.0 != from {
                    state.shift(v, best.0);
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }

        let labels = canonical_labels(&state.labels, blocks);
        let cost = description_length(graph, &labels, blocks);
        Ok(Proposal { labels, cost })
    }
}

/// Description length of `labels` (block per vertex, `0..blocks`).
pub fn description_length(graph: &DoorGraph, labels: &[usize], blocks: usize) -> f64 {
    let state = BlockState::new(graph, labels.to_vec(), blocks);
    let edges = graph.edge_count();
    let ln_degree_factorials: f64 = (0..graph.vertex_count())
        .map(|v| ln_factorial(graph.degree(v)))
        .sum();
    -(edges as f64) - ln_degree_factorials
        + state.entropy()
        + model_length(graph.vertex_count(), edges, blocks)
}

/// Assignment with block `b` seeded by the `b`-th vertex of a shuffled order.
fn random_assignment(n: usize, blocks: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let mut labels = vec![0; n];
    for (i, &v) in order.iter().enumerate() {
        labels[v] = if i < blocks { i } else { rng.gen_range(0..blocks) };
    }
    labels
}

/// Renumber blocks in order of first appearance.
fn canonical_labels(labels: &[usize], blocks: usize) -> Vec<usize> {
    let mut remap = vec![usize::MAX; blocks];
    let mut next = 0;
    labels
        .iter()
        .map(|&b| {
            if remap[b] == usize::MAX {
                remap[b] = next;
                next += 1;
            }
            remap[b]
        })
        .collect()
}

fn model_length(vertices: usize, edges: usize, blocks: usize) -> f64 {
    let partition = vertices as f64 * (blocks as f64).ln();
    if edges == 0 {
        return partition;
    }
    let x = (blocks * (blocks + 1)) as f64 / (2.0 * edges as f64);
    edges as f64 * ((1.0 + x) * (1.0 + x).ln() - x * x.ln()) + partition
}

fn ln_factorial(k: usize) -> f64 {
    (2..=k).map(|i| (i as f64).ln()).sum()
}

fn xlogx(x: i64) -> f64 {
    if x <= 0 {
        0.0
    } else {
        let x = x as f64;
        x * x.ln()
    }
}

/// Block edge counts kept in step with the labels.
struct BlockState<'g> {
    graph: &'g DoorGraph,
    labels: Vec<usize>,
    sizes: Vec<usize>,
    ers: Vec<Vec<i64>>,
    er: Vec<i64>,
}

impl<'g> BlockState<'g> {
    fn new(graph: &'g DoorGraph, labels: Vec<usize>, blocks: usize) -> Self {
        let mut sizes = vec![0; blocks];
        let mut er = vec![0; blocks];
        for (v, &b) in labels.iter().enumerate() {
            sizes[b] += 1;
            er[b] += graph.degree(v) as i64;
        }
        let mut ers = vec![vec![0; blocks]; blocks];
        for edge in graph.edges() {
            let (r, s) = (labels[edge.a], labels[edge.b]);
            ers[r][s] += 1;
            ers[s][r] += 1;
        }
        Self {
            graph,
            labels,
            sizes,
            ers,
            er,
        }
    }

    /// The label-dependent part of `S`.
    fn entropy(&self) -> f64 {
        let blocks: f64 = self.er.iter().map(|&e| xlogx(e)).sum();
        let pairs: f64 = self.ers.iter().flatten().map(|&e| xlogx(e)).sum();
        blocks - 0.5 * pairs
    }

    fn shift(&mut self, v: usize, to: usize) {
        let from = self.labels[v];
        if from == to {
            return;
        }
        for &u in self.graph.neighbors(v) {
            if u == v {
                self.ers[from][from] -= 1;
                self.ers[to][to] += 1;
                continue;
            }
            let t = self.labels[u];
            self.ers[from][t] -= 1;
            self.ers[t][from] -= 1;
            self.ers[to][t] += 1;
            self.ers[t][to] += 1;
        }
        let degree = self.graph.degree(v) as i64;
        self.er[from] -= degree;
        self.er[to] += degree;
        self.sizes[from] -= 1;
        self.sizes[to] += 1;
        self.labels[v] = to;
    }
}
