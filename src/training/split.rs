//! Train/test splitting

use crate::error::{OncoriskError, Result};
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Hold-out split configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of samples held out for evaluation
    pub test_size: f64,
    /// Seed for the shuffles
    pub random_state: u64,
    /// Keep class proportions in both splits when there are several classes
    pub stratify: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
            stratify: true,
        }
    }
}

/// Row indices of the two splits, each in ascending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl SplitConfig {
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_stratify(mut self, stratify: bool) -> Self {
        self.stratify = stratify;
        self
    }

    /// Split row indices for the given labels.
    ///
    /// `n_test = ceil(test_size * n)`. Stratified splits give each class a
    /// share of the test rows proportional to its size, handing leftover rows
    /// to the largest remainders. A single-class target falls back to a plain
    /// shuffled split.
    pub fn split(&self, y: &Array1<f64>) -> Result<TrainTestSplit> {
        let n = y.len();
        let n_test = (self.test_size * n as f64 - 1e-9).ceil().max(0.0) as usize;

        if n_test == 0 || n_test >= n {
            return Err(OncoriskError::TrainingError(format!(
                "cannot split {} samples with test size {}",
                n, self.test_size
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        let groups = class_groups(y);

        let (mut train_indices, mut test_indices) = if self.stratify && groups.len() > 1 {
            let quotas = allocate(&groups, n_test, n);
            let mut train = Vec::with_capacity(n - n_test);
            let mut test = Vec::with_capacity(n_test);
            for ((_, mut indices), quota) in groups.into_iter().zip(quotas) {
                indices.shuffle(&mut rng);
                test.extend_from_slice(&indices[..quota]);
                train.extend_from_slice(&indices[quota..]);
            }
            (train, test)
        } else {
            let mut indices: Vec<usize> = (0..n).collect();
            indices.shuffle(&mut rng);
            let train = indices.split_off(n_test);
            (train, indices)
        };

        train_indices.sort_unstable();
        test_indices.sort_unstable();

        Ok(TrainTestSplit {
            train_indices,
            test_indices,
        })
    }
}

/// Row indices per class, classes in ascending order
fn class_groups(y: &Array1<f64>) -> Vec<(f64, Vec<usize>)> {
    let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
    for (idx, &value) in y.iter().enumerate() {
        match groups.iter_mut().find(|(c, _)| *c == value) {
            Some((_, indices)) => indices.push(idx),
            None => groups.push((value, vec![idx])),
        }
    }
    groups.sort_by(|a, b| a.0.total_cmp(&b.0));
    groups
}

/// Largest-remainder allocation of `n_test` rows across classes
fn allocate(groups: &[(f64, Vec<usize>)], n_test: usize, n: usize) -> Vec<usize> {
    let exact: Vec<f64> = groups
        .iter()
        .map(|(_, indices)| n_test as f64 * indices.len() as f64 / n as f64)
        .collect();

    let mut quotas: Vec<usize> = exact.iter().map(|q| q.floor() as usize).collect();
    let mut leftover = n_test - quotas.iter().sum::<usize>();

    let mut by_remainder: Vec<usize> = (0..groups.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    for &class in by_remainder.iter().cycle() {
        if leftover == 0 {
            break;
        }
        if quotas[class] < groups[class].1.len() {
            quotas[class] += 1;
            leftover -= 1;
        }
    }

    quotas
}
