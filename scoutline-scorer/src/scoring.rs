//! Candidate scoring and per-position ranking.
//!
//! Each candidate receives four sub-scores: cosine similarity to the
//! position archetype embedding, a blended performance-trend score, a
//! recent-form production rate, and game freshness. Sub-scores are clipped
//! into `0.0..=1.0` before weighting so no component can dominate through
//! scale alone.

use std::collections::HashMap;

use log::{debug, warn};
use scoutline_core::{FeatureCatalogue, FeatureTable, PositionGroup, ServiceContext, columns};

use crate::types::{CandidateScore, ShortlistWeights};

/// Weight of the long-horizon trend average within the performance score.
pub const TREND_BLEND_WEIGHT: f32 = 0.7;
/// Weight of the recent production rate within the performance score.
pub const RECENT_BLEND_WEIGHT: f32 = 0.3;

/// Norms below this threshold make cosine similarity meaningless.
const NORM_EPSILON: f32 = 1e-9;

/// Cosine similarity between a candidate embedding and an archetype
/// embedding, rescaled from `-1.0..=1.0` into `0.0..=1.0`.
///
/// Returns `0.0` when either vector is effectively zero or the vectors
/// disagree in length.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "cosine similarity is dot products and norms"
)]
pub fn archetype_similarity(candidate: &[f32], archetype: &[f32]) -> f32 {
    if candidate.len() != archetype.len() {
        return 0.0;
    }
    let mut dot = 0.0_f32;
    let mut candidate_sq = 0.0_f32;
    let mut archetype_sq = 0.0_f32;
    for (a, b) in candidate.iter().zip(archetype.iter()) {
        dot += a * b;
        candidate_sq += a * a;
        archetype_sq += b * b;
    }
    let candidate_norm = candidate_sq.sqrt();
    let archetype_norm = archetype_sq.sqrt();
    if candidate_norm <= NORM_EPSILON || archetype_norm <= NORM_EPSILON {
        return 0.0;
    }
    let cosine = dot / (candidate_norm * archetype_norm);
    (cosine + 1.0) / 2.0
}

/// Clip a sub-score into the unit interval; non-finite values clip to `0.0`.
fn clip(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "averaging trend features divides a bounded sum by a small count"
)]
fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f32>() / values.len() as f32)
}

#[expect(
    clippy::float_arithmetic,
    reason = "inverse trends flip goals-against so higher is better"
)]
fn inverted(values: Vec<f32>) -> Vec<f32> {
    values.into_iter().map(|t| 1.0 - t).collect()
}

fn column_group(features: &FeatureTable, row: usize, group: &[String]) -> Vec<f32> {
    group
        .iter()
        .map(|column| features.value_or_zero(row, column))
        .collect()
}

/// Average of the position-appropriate trend features.
///
/// Goaltenders blend inverted goals-against trends with save-percentage
/// trends; skaters blend points and goals trends. A row with no trend
/// features scores `0.0`, as does an unknown position.
fn trend_score(
    features: &FeatureTable,
    catalogue: &FeatureCatalogue,
    row: usize,
    position: PositionGroup,
) -> f32 {
    let mut components = Vec::with_capacity(2);
    match position {
        PositionGroup::Goaltender => {
            let gaa = column_group(features, row, catalogue.gaa_trend_columns());
            if let Some(value) = mean(&inverted(gaa)) {
                components.push(value);
            }
            if let Some(value) = mean(&column_group(features, row, catalogue.svp_trend_columns())) {
                components.push(value);
            }
        }
        PositionGroup::Defence | PositionGroup::Forward => {
            if let Some(value) = mean(&column_group(features, row, catalogue.points_trend_columns()))
            {
                components.push(value);
            }
            if let Some(value) = mean(&column_group(features, row, catalogue.goals_trend_columns()))
            {
                components.push(value);
            }
        }
        PositionGroup::Unknown => {}
    }
    mean(&components).unwrap_or(0.0)
}

/// Recent production rate with a season fallback.
///
/// A recent rate of exactly `0.0` reads as "no recent sample" and falls
/// back to the season-long adjusted rate.
fn recent_rate(features: &FeatureTable, row: usize, position: PositionGroup) -> f32 {
    let (recent_column, season_column) = match position {
        PositionGroup::Goaltender => (columns::RECENT_ADJ_SAVE_PCT, columns::ADJ_SEASON_SVP),
        PositionGroup::Defence | PositionGroup::Forward => {
            (columns::RECENT_ADJ_P_PER_GP, columns::ADJ_SEASON_POINTS_PER_GAME)
        }
        PositionGroup::Unknown => return 0.0,
    };
    let recent = features.value_or_zero(row, recent_column);
    let effective_rate = if recent == 0.0 {
        features.value_or_zero(row, season_column)
    } else {
        recent
    };
    if effective_rate.is_finite() {
        effective_rate
    } else {
        0.0
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "the performance score blends trend and recent components"
)]
fn blend_performance(trend: f32, recent: f32) -> f32 {
    TREND_BLEND_WEIGHT * trend + RECENT_BLEND_WEIGHT * recent
}

fn score_candidate(
    ctx: &ServiceContext,
    row: usize,
    player_id: &str,
    archetypes: &HashMap<PositionGroup, Vec<f32>>,
    weights: ShortlistWeights,
) -> (PositionGroup, CandidateScore) {
    let features = ctx.store().features();
    let position = ctx.store().reference().position_group(row);

    let raw_similarity = match (ctx.embeddings().row(row), archetypes.get(&position)) {
        (Some(embedding), Some(archetype)) => archetype_similarity(embedding, archetype),
        (_, None) => {
            debug!("no archetype embedding for position '{position}' of player {player_id}");
            0.0
        }
        (None, _) => 0.0,
    };

    let trend = trend_score(features, ctx.catalogue(), row, position);
    let raw_recent = recent_rate(features, row, position);

    let similarity = clip(raw_similarity);
    let performance = clip(blend_performance(trend, raw_recent));
    let recent = clip(raw_recent);
    let freshness = clip(features.value_or_zero(row, columns::GAME_FRESHNESS));
    let score = CandidateScore {
        player_id: player_id.to_owned(),
        archetype_similarity: similarity,
        perf_score: performance,
        recent_perf_score: recent,
        freshness_score: freshness,
        final_score: weights.combine(similarity, performance, recent, freshness),
    };
    (position, score)
}

/// Score every candidate row and rank the results per position group.
///
/// The returned map always carries all of [`PositionGroup::RANKED`], each
/// list sorted by descending final score. The sort is stable, so candidates
/// with equal scores keep population order. Each list is truncated to
/// `top_n`. Candidates with an unknown position are scored but belong to no
/// ranking bucket.
#[must_use]
pub fn score_and_rank(
    ctx: &ServiceContext,
    candidates: &[usize],
    archetypes: &HashMap<PositionGroup, Vec<f32>>,
    weights: ShortlistWeights,
    top_n: usize,
) -> HashMap<PositionGroup, Vec<CandidateScore>> {
    let mut buckets: HashMap<PositionGroup, Vec<CandidateScore>> = PositionGroup::RANKED
        .iter()
        .map(|&group| (group, Vec::new()))
        .collect();

    for &row in candidates {
        let Some(player_id) = ctx.store().player_id(row) else {
            warn!("candidate row {row} has no player id; skipping");
            continue;
        };
        let (position, score) = score_candidate(ctx, row, player_id, archetypes, weights);
        let Some(bucket) = buckets.get_mut(&position) else {
            debug!(
                "player {} has unranked position '{position}'; excluded from shortlists",
                score.player_id
            );
            continue;
        };
        bucket.push(score);
    }

    for bucket in buckets.values_mut() {
        bucket.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        bucket.truncate(top_n);
    }
    buckets
}
