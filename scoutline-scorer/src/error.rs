//! Errors raised while validating shortlist requests.

use thiserror::Error;

use crate::types::{MAX_TOP_N, MIN_TOP_N};

/// Errors produced when a shortlist request or its weights are invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShortlistRequestError {
    /// The requested shortlist length falls outside the accepted range.
    #[error("top_n must be between {MIN_TOP_N} and {MAX_TOP_N}, got {requested}")]
    TopNOutOfRange {
        /// Shortlist length the caller asked for.
        requested: usize,
    },
    /// The requested position group has no ranking bucket.
    #[error("position group '{position}' cannot be shortlisted")]
    UnrankedPosition {
        /// Display name of the rejected position group.
        position: String,
    },
    /// Weights were non-finite, negative, or summed to zero.
    #[error("shortlist weights must be finite, non-negative, and sum to a positive value")]
    InvalidWeights,
}
