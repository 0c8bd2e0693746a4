//! Inference configuration

use serde::{Deserialize, Serialize};

/// Configuration for batch prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Rows scored per chunk
    pub batch_size: usize,

    /// Score chunks in parallel with rayon
    pub parallel: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            parallel: true,
        }
    }
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Builder method to toggle parallel chunk scoring
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether a table of `n_rows` is split across rayon workers
    pub(crate) fn should_use_parallel(&self, n_rows: usize) -> bool {
        self.parallel && rayon::current_num_threads() > 1 && n_rows > self.batch_size
    }
}
