//! Archetype synthesis and shortlist scoring for Scoutline.
//!
//! The crate provides the request-time pipeline that turns a birth year and
//! position group into a ranked shortlist of comparable players:
//! - **Archetype synthesis** builds a synthetic "strong player" feature vector
//!   for a position and age window by taking percentile targets from the
//!   original-scale reference distributions, scaling them with the fitted
//!   scaler, and writing the position and gender one-hot indicators.
//! - **Candidate scoring** embeds the archetype with the frozen encoder,
//!   measures cosine similarity against each candidate's pre-computed
//!   embedding, blends it with performance-trend, recent-form, and freshness
//!   sub-scores, and ranks candidates per position group.
//!
//! All sub-scores are clipped into `0.0..=1.0` before weighting, so a final
//! score is always comparable across requests. Scoring never fails a whole
//! request: degraded inputs fall back to neutral values and are logged.
//!
//! # Examples
//!
//! ```no_run
//! use scoutline_scorer::{ShortlistOptions, ShortlistRequest, generate_shortlist};
//! # fn context() -> scoutline_core::ServiceContext { unimplemented!() }
//!
//! let ctx = context();
//! let request = ShortlistRequest::new(2008, "D".parse().expect("position"), 10)
//!     .expect("valid request");
//! let shortlist = generate_shortlist(&ctx, &request, &ShortlistOptions::default());
//! for entry in shortlist {
//!     println!("{} {:.3}", entry.player_id, entry.final_score);
//! }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod archetype;
mod error;
mod scoring;
mod shortlist;
mod stats;
mod types;

pub use archetype::{ArchetypeRequest, synthesise_archetype};
pub use error::ShortlistRequestError;
pub use scoring::{
    RECENT_BLEND_WEIGHT, TREND_BLEND_WEIGHT, archetype_similarity, score_and_rank,
};
pub use shortlist::{
    REFERENCE_YEAR, ShortlistOptions, generate_shortlist, generate_shortlists,
};
pub use types::{
    ARCHETYPE_PERCENTILE, CandidateScore, MAX_TOP_N, MIN_TOP_N, ShortlistEntry, ShortlistRequest,
    ShortlistWeights,
};

#[cfg(test)]
mod tests;
