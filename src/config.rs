//! Tuning parameters and defaults.
//!
//! The constants are the values the recommender ships with; `VectorizerConfig` and
//! `RecommenderConfig` carry them at runtime and can be overridden per instance.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VectorizerError};

/// Word n-gram range, inclusive on both ends.
pub const DEFAULT_NGRAM_RANGE: (usize, usize) = (1, 3);

/// Number of neighbors on each side considered by the context weighting.
pub const DEFAULT_WINDOW_SIZE: usize = 4;

/// BM25 term frequency saturation parameter.
pub const DEFAULT_K1: f64 = 1.5;

/// BM25 document length normalization parameter.
pub const DEFAULT_B: f64 = 0.75;

/// Shortest character subword taken from a token.
pub const SUBWORD_MIN_LEN: usize = 3;

/// Longest character subword taken from a token, independent of the minimum.
pub const SUBWORD_MAX_LEN: usize = 9;

/// Joins the tokens of a multi-token n-gram.
pub const NGRAM_SEPARATOR: char = '_';

/// Upper bound on nearest documents consulted per query.
pub const NEIGHBOR_COUNT: usize = 5;

/// Number of tags returned by default.
pub const DEFAULT_TOP_N: usize = 3;

/// Leading marker every returned tag carries.
pub const TAG_MARKER: char = '#';

pub const DEFAULT_DATA_DIR: &str = "data/data";
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Parameters of the feature pipeline and the BM25 weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub ngram_range: (usize, usize),
    pub window_size: usize,
    pub k1: f64,
    pub b: f64,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: DEFAULT_NGRAM_RANGE,
            window_size: DEFAULT_WINDOW_SIZE,
            k1: DEFAULT_K1,
            b: DEFAULT_B,
        }
    }
}

impl VectorizerConfig {
    pub fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 {
            return Err(VectorizerError::InvalidConfig("ngram_range min must be >= 1".into()));
        }
        if min_n > max_n {
            return Err(VectorizerError::InvalidConfig(format!(
                "ngram_range min ({min_n}) exceeds max ({max_n})"
            )));
        }
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(VectorizerError::InvalidConfig(format!("k1 must be >= 0, got {}", self.k1)));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(VectorizerError::InvalidConfig(format!("b must be in [0, 1], got {}", self.b)));
        }
        Ok(())
    }
}

/// Parameters of the nearest-neighbor tag ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// nearest documents consulted, capped by the corpus size
    pub neighbors: usize,
    pub default_n: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            neighbors: NEIGHBOR_COUNT,
            default_n: DEFAULT_TOP_N,
        }
    }
}
