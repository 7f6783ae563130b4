//! Scoring weights and ranking thresholds.
//!
//! Every numeric constant the engine uses lives here so the weighting scheme
//! can be audited and tested in isolation instead of being scattered through
//! the scoring logic as bare literals.

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Weight of the name field in the composite score.
pub const NAME_WEIGHT: f64 = 0.4;
/// Weight of the description field in the composite score.
pub const DESCRIPTION_WEIGHT: f64 = 0.3;
/// Weight of the similes field in the composite score.
pub const SIMILE_WEIGHT: f64 = 0.1;
/// Weight of the capabilities field in the composite score.
pub const CAPABILITY_WEIGHT: f64 = 0.2;

/// Description similarity is discounted relative to the name before
/// aggregation; the stored field score is already discounted.
pub const DESCRIPTION_DISCOUNT: f64 = 0.8;
/// Simile similarity discount, applied the same way.
pub const SIMILE_DISCOUNT: f64 = 0.6;

/// A query capability tag counts as matched only when its best prefix
/// similarity against the descriptor's tags is strictly greater than this.
pub const CAPABILITY_THRESHOLD: f64 = 0.7;

/// Tokens of this length or shorter are dropped during normalization.
pub const MIN_TERM_LEN: usize = 2;

/// Default composite-score cutoff for `rank`.
pub const DEFAULT_MIN_SCORE: f64 = 0.3;
/// Default shortlist length for `rank`.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Catalogs at or above this size are scored on the rayon pool; smaller ones
/// sequentially, where thread-pool coordination costs more than it saves.
pub const PARALLEL_THRESHOLD: usize = 100;

/// Upper bound on memoized normalization entries. Lookups past the cap still
/// compute; they are just not inserted.
pub const NORMALIZE_CACHE_CAP: usize = 8192;

/// Ranking parameters for [`rank`](crate::matcher::rank).
///
/// Callers that omit parameters take the defaults; explicitly supplied values
/// are validated, never silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Results scoring below this composite value are discarded.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// The sorted shortlist is truncated to this many results.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl RankOptions {
    /// Validate caller-supplied parameters before ranking.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err(MatchError::InvalidParameter {
                name: "min_score",
                value: self.min_score,
                reason: "must be a finite value in [0.0, 1.0]",
            });
        }
        Ok(())
    }
}
