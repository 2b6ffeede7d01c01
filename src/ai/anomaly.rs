//! Outlier detection over transaction amounts.
//!
//! A one-dimensional isolation forest, refit from scratch on every call.
//! That is quadratic-ish waste at scale but the history is tiny and the
//! contract is stateless: amounts in, boolean out.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{seq::index::sample, Rng, SeedableRng};

use super::AnomalyModel;

/// Below this much history every amount is considered normal.
const MIN_HISTORY: usize = 5;
/// Assumed fraction of outliers in the history.
const CONTAMINATION: f64 = 0.15;
const TREE_COUNT: usize = 100;
const MAX_SUBSAMPLE: usize = 256;
const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

pub struct IsolationForestDetector {
    seed: u64,
}

impl Default for IsolationForestDetector {
    fn default() -> Self {
        // Fixed seed: refitting on the same history must give the same answer.
        Self { seed: 7 }
    }
}

#[async_trait]
impl AnomalyModel for IsolationForestDetector {
    async fn is_anomalous(&self, amounts: &[f64]) -> bool {
        if amounts.len() < MIN_HISTORY {
            return false;
        }

        let forest = IsolationForest::fit(amounts, self.seed);
        let scores: Vec<f64> = amounts.iter().map(|&a| forest.score(a)).collect();
        let last = scores[scores.len() - 1];

        // Strictly above the (1 - contamination) quantile. Strict, so a flat
        // history where every point scores the same never flags anything.
        last > quantile(&scores, 1.0 - CONTAMINATION)
    }
}

enum Node {
    Leaf { size: usize },
    Split { value: f64, left: Box<Node>, right: Box<Node> },
}

struct IsolationForest {
    trees: Vec<Node>,
    subsample: usize,
}

impl IsolationForest {
    fn fit(values: &[f64], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let subsample = values.len().min(MAX_SUBSAMPLE);
        let height_limit = (subsample as f64).log2().ceil() as usize;

        let trees = (0..TREE_COUNT)
            .map(|_| {
                let picked: Vec<f64> = sample(&mut rng, values.len(), subsample)
                    .into_iter()
                    .map(|i| values[i])
                    .collect();
                build_tree(&picked, 0, height_limit, &mut rng)
            })
            .collect();

        Self { trees, subsample }
    }

    /// Anomaly score in (0, 1]; higher means easier to isolate.
    fn score(&self, value: f64) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| path_length(tree, value, 0.0))
            .sum();
        let mean_path = total / self.trees.len() as f64;
        2f64.powf(-mean_path / average_path_length(self.subsample))
    }
}

fn build_tree(values: &[f64], depth: usize, limit: usize, rng: &mut StdRng) -> Node {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if values.len() <= 1 || depth >= limit || min == max {
        return Node::Leaf { size: values.len() };
    }

    let split = rng.gen_range(min..max);
    let left: Vec<f64> = values.iter().cloned().filter(|&v| v < split).collect();
    let right: Vec<f64> = values.iter().cloned().filter(|&v| v >= split).collect();
    Node::Split {
        value: split,
        left: Box::new(build_tree(&left, depth + 1, limit, rng)),
        right: Box::new(build_tree(&right, depth + 1, limit, rng)),
    }
}

fn path_length(node: &Node, value: f64, depth: f64) -> f64 {
    match node {
        Node::Leaf { size } => depth + average_path_length(*size),
        Node::Split { value: split, left, right } => {
            if value < *split {
                path_length(left, value, depth + 1.0)
            } else {
                path_length(right, value, depth + 1.0)
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points,
/// the standard isolation-forest normalizer.
fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    let harmonic = (n - 1.0).ln() + EULER_MASCHERONI;
    2.0 * harmonic - 2.0 * (n - 1.0) / n
}

/// Linear-interpolation quantile, `q` in [0, 1].
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
