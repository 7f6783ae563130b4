//! Error taxonomy for the matching engine.

use thiserror::Error;

/// Errors surfaced by the matching engine.
///
/// `InvalidParameter` is a caller precondition violation and propagates out
/// of [`rank`](crate::matcher::rank). `MalformedDescriptor` is a per-item
/// fault: `rank` contains it internally (the item collapses to a zero-score
/// result) and only [`try_score_one`](crate::matcher::try_score_one) lets
/// callers observe it directly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("invalid ranking parameter `{name}`: {reason}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("malformed descriptor `{name}`: {reason}")]
    MalformedDescriptor { name: String, reason: &'static str },
}
