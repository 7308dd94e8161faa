//! Request, weight, and result records for shortlist generation.

use serde::Serialize;

use scoutline_core::{PlayerId, PositionGroup};

use crate::error::ShortlistRequestError;

/// Percentile targeted when synthesising archetype feature vectors.
///
/// The archetype represents a strong-but-plausible player, so targets sit at
/// the 85th percentile of the contextual distribution rather than the maximum.
pub const ARCHETYPE_PERCENTILE: f64 = 0.85;

/// Smallest shortlist length a request may ask for.
pub const MIN_TOP_N: usize = 1;
/// Largest shortlist length a request may ask for.
pub const MAX_TOP_N: usize = 100;

/// Relative weights applied to the four shortlist sub-scores.
///
/// All sub-scores are clipped into `0.0..=1.0` before weighting, so the
/// weights fully determine each component's influence on the final score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortlistWeights {
    /// Weight on cosine similarity to the position archetype embedding.
    pub similarity: f32,
    /// Weight on the season performance-trend score.
    pub performance: f32,
    /// Weight on the recent-form production rate.
    pub recent: f32,
    /// Weight on game freshness (recency of the last appearance).
    pub freshness: f32,
}

impl Default for ShortlistWeights {
    fn default() -> Self {
        Self {
            similarity: 0.3,
            performance: 0.3,
            recent: 0.3,
            freshness: 0.1,
        }
    }
}

impl ShortlistWeights {
    /// Validate that every weight is finite and non-negative and that the
    /// weights do not all vanish.
    ///
    /// # Errors
    /// Returns [`ShortlistRequestError::InvalidWeights`] when any weight is
    /// non-finite or negative, or when the weights sum to zero.
    pub fn validate(self) -> Result<Self, ShortlistRequestError> {
        let components = [self.similarity, self.performance, self.recent, self.freshness];
        if components.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ShortlistRequestError::InvalidWeights);
        }
        #[expect(
            clippy::float_arithmetic,
            reason = "rejecting an all-zero weight vector requires summing the weights"
        )]
        let total: f32 = components.iter().sum();
        if total <= 0.0 {
            return Err(ShortlistRequestError::InvalidWeights);
        }
        Ok(self)
    }

    /// Combine clipped sub-scores into a final weighted score.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the final score is a weighted sum of the sub-scores"
    )]
    pub fn combine(self, similarity: f32, performance: f32, recent: f32, freshness: f32) -> f32 {
        self.similarity * similarity
            + self.performance * performance
            + self.recent * recent
            + self.freshness * freshness
    }
}

/// A validated shortlist request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortlistRequest {
    birth_year: i32,
    position: PositionGroup,
    top_n: usize,
}

impl ShortlistRequest {
    /// Build a request after validating the shortlist length and position.
    ///
    /// # Errors
    /// Returns [`ShortlistRequestError::TopNOutOfRange`] when `top_n` falls
    /// outside `MIN_TOP_N..=MAX_TOP_N`, and
    /// [`ShortlistRequestError::UnrankedPosition`] when the position group has
    /// no ranking bucket.
    pub fn new(
        birth_year: i32,
        position: PositionGroup,
        top_n: usize,
    ) -> Result<Self, ShortlistRequestError> {
        if !(MIN_TOP_N..=MAX_TOP_N).contains(&top_n) {
            return Err(ShortlistRequestError::TopNOutOfRange { requested: top_n });
        }
        if !PositionGroup::RANKED.contains(&position) {
            return Err(ShortlistRequestError::UnrankedPosition {
                position: position.to_string(),
            });
        }
        Ok(Self {
            birth_year,
            position,
            top_n,
        })
    }

    /// Birth year the shortlist targets.
    #[must_use]
    pub const fn birth_year(&self) -> i32 {
        self.birth_year
    }

    /// Position group whose shortlist the caller wants.
    #[must_use]
    pub const fn position(&self) -> PositionGroup {
        self.position
    }

    /// Requested shortlist length.
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }
}

/// Sub-scores and final score for one ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    /// Stable identifier of the scored player.
    pub player_id: PlayerId,
    /// Cosine similarity to the position archetype, rescaled into `0.0..=1.0`.
    pub archetype_similarity: f32,
    /// Season performance-trend score.
    pub perf_score: f32,
    /// Recent-form production rate.
    pub recent_perf_score: f32,
    /// Game freshness score.
    pub freshness_score: f32,
    /// Weighted combination of the four sub-scores.
    pub final_score: f32,
}

/// One shortlist row enriched with display statistics from the reference
/// table.
///
/// Biographical and statistical fields are optional because the reference
/// table may lack values for a given player; missing display data never
/// removes a candidate from the shortlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistEntry {
    /// Stable identifier of the player.
    pub player_id: PlayerId,
    /// Display name.
    pub name: Option<String>,
    /// Age at the reference snapshot, in whole years.
    pub age: Option<i64>,
    /// Listed position string from the source data.
    pub position: Option<String>,
    /// Nationality.
    pub nationality: Option<String>,
    /// Position group the player was ranked under.
    pub position_group: String,
    /// Gender cohort of the player.
    pub gender: String,
    /// Weighted final score.
    pub final_score: f32,
    /// Cosine similarity to the position archetype.
    pub archetype_similarity: f32,
    /// Season performance-trend score.
    pub perf_score: f32,
    /// Recent-form production rate.
    pub recent_perf_score: f32,
    /// Game freshness score.
    pub freshness_score: f32,
    /// Season games played.
    pub season_games_played: Option<i64>,
    /// Season goals.
    pub season_goals: Option<i64>,
    /// Season assists.
    pub season_assists: Option<i64>,
    /// Season points.
    pub season_points: Option<i64>,
    /// Season points per game.
    pub season_points_per_game: Option<f64>,
    /// Season goals-against average (goaltenders).
    pub season_gaa: Option<f64>,
    /// Season save percentage (goaltenders).
    pub season_svp: Option<f64>,
    /// Season shutouts (goaltenders).
    pub season_shutouts: Option<i64>,
    /// Recent-window games played.
    pub recent_games_played: Option<i64>,
    /// Recent-window goals.
    pub recent_goals: Option<i64>,
    /// Recent-window assists.
    pub recent_assists: Option<i64>,
    /// Recent-window points.
    pub recent_points: Option<i64>,
    /// Recent-window penalty minutes.
    pub recent_penalty_minutes: Option<i64>,
    /// Recent-window plus/minus.
    pub recent_plus_minus: Option<i64>,
    /// Recent-window saves (goaltenders).
    pub recent_saves: Option<i64>,
    /// Recent-window shots against (goaltenders).
    pub recent_shots_against: Option<i64>,
    /// League-adjusted recent points per game.
    pub recent_adj_points_per_game: Option<f64>,
    /// League-adjusted recent save percentage.
    pub recent_adj_save_pct: Option<f64>,
    /// Days since the player's last recorded game.
    pub days_since_last_game: Option<i64>,
}
