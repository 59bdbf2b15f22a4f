//! Amount anomaly detection
//!
//! An isolation forest over the single `amount` feature. Each tree repeatedly splits a
//! random subsample at a uniform random threshold; unusual amounts are isolated after
//! few splits, so a short average path length means a high anomaly score.
//!
//! The fraction of points expected to be outliers (`contamination`) sets the score
//! threshold at the matching percentile. It is an expectation, not a cap: ties and
//! skewed data change the actual count.
//!
//! Randomness comes from one `StdRng` seeded per call, so the same input always
//! produces the same flagged set.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{AnomalyRecord, Transaction};

/// Euler–Mascheroni constant, used by the harmonic number approximation
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation forest parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnomalyConfig {
    /// Expected share of outliers, in (0, 0.5]
    pub contamination: f64,
    /// RNG seed
    pub seed: u64,
    /// Number of trees
    pub trees: usize,
    /// Subsample size per tree (capped at the number of points)
    pub max_samples: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            contamination: 0.05,
            seed: 42,
            trees: 100,
            max_samples: 256,
        }
    }
}

/// Flags transactions whose amounts are easy to isolate
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Return the flagged transactions in their original order
    ///
    /// Degenerate inputs (fewer than 2 points, unusable parameters) yield no anomalies.
    pub fn detect(&self, transactions: &[Transaction]) -> Vec<AnomalyRecord> {
        if transactions.len() < 2 {
            debug!(
                count = transactions.len(),
                "Too few transactions for anomaly detection"
            );
            return vec![];
        }

        let contamination = self.config.contamination;
        if !(contamination > 0.0 && contamination <= 0.5) || self.config.trees == 0 {
            warn!(
                contamination,
                trees = self.config.trees,
                "Unusable anomaly parameters, skipping detection"
            );
            return vec![];
        }

        let amounts: Vec<f64> = transactions.iter().map(|t| t.amount).collect();
        let scores = self.scores(&amounts);
        let threshold = percentile(&scores, 100.0 * (1.0 - contamination));

        let flagged: Vec<AnomalyRecord> = transactions
            .iter()
            .zip(&scores)
            .filter(|(_, score)| **score > threshold)
            .map(|(tx, _)| AnomalyRecord::from(tx))
            .collect();

        debug!(
            points = amounts.len(),
            threshold,
            flagged = flagged.len(),
            seed = self.config.seed,
            "Anomaly detection complete"
        );

        flagged
    }

    /// Anomaly score in (0, 1] for each amount; higher is more anomalous
    pub fn scores(&self, amounts: &[f64]) -> Vec<f64> {
        if amounts.is_empty() {
            return vec![];
        }
        let forest = IsolationForest::fit(amounts, &self.config);
        amounts.iter().map(|&x| forest.score(x)).collect()
    }
}

/// A tree node: either a split on a threshold or a leaf holding a point count
#[derive(Debug)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn grow(values: Vec<f64>, depth: usize, max_depth: usize, rng: &mut StdRng) -> Node {
        if depth >= max_depth || values.len() <= 1 {
            return Node::Leaf { size: values.len() };
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        // All equal (or non-comparable): nothing left to isolate
        if !(min < max) {
            return Node::Leaf { size: values.len() };
        }

        // Interpolate instead of sampling min..max: max - min can overflow for finite extremes
        let t: f64 = rng.gen();
        let threshold = min + t * max - t * min;
        if !threshold.is_finite() {
            return Node::Leaf { size: values.len() };
        }
        let threshold = threshold.clamp(min, max);

        let (left, right): (Vec<f64>, Vec<f64>) =
            values.into_iter().partition(|&v| v < threshold);

        Node::Split {
            threshold,
            left: Box::new(Node::grow(left, depth + 1, max_depth, rng)),
            right: Box::new(Node::grow(right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    threshold,
                    left,
                    right,
                } => {
                    node = if x < *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

#[derive(Debug)]
struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
}

impl IsolationForest {
    fn fit(amounts: &[f64], config: &AnomalyConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let n = amounts.len();
        let sample_size = config.max_samples.max(2).min(n);
        let max_depth = (sample_size as f64).log2().ceil() as usize;

        let trees = (0..config.trees)
            .map(|_| {
                let sample: Vec<f64> = index::sample(&mut rng, n, sample_size)
                    .into_iter()
                    .map(|i| amounts[i])
                    .collect();
                Node::grow(sample, 0, max_depth, &mut rng)
            })
            .collect();

        Self { trees, sample_size }
    }

    fn score(&self, x: f64) -> f64 {
        let normalizer = average_path_length(self.sample_size);
        if self.trees.is_empty() || normalizer <= 0.0 {
            return 0.5;
        }
        let mean_path =
            self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / self.trees.len() as f64;
        2f64.powf(-mean_path / normalizer)
    }
}

/// Average path length of an unsuccessful BST search over `n` points, c(n)
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated percentile (0..=100) of the values
fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
