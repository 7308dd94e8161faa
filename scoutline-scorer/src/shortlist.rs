//! End-to-end shortlist orchestration.
//!
//! A request names a birth year, a position group, and a shortlist length.
//! Generation filters the population down to the men's cohort of the
//! matching age, synthesises and embeds one archetype per ranked position,
//! scores every candidate, and shapes the ranked results into display
//! entries backed by the original-scale reference table.

use std::collections::HashMap;

use log::{error, info, warn};
use scoutline_core::{PositionGroup, ReferenceTable, ServiceContext, TARGET_GENDER, columns};

use crate::archetype::{ArchetypeRequest, synthesise_archetype};
use crate::scoring::score_and_rank;
use crate::types::{
    ARCHETYPE_PERCENTILE, CandidateScore, ShortlistEntry, ShortlistRequest, ShortlistWeights,
};

/// Year of the reference data snapshot; ages in the tables are relative to
/// this year, so request ages must be too.
pub const REFERENCE_YEAR: i32 = 2025;

/// Tunable parameters shared by every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortlistOptions {
    /// Year the population's ages were computed against.
    pub reference_year: i32,
    /// Percentile targeted during archetype synthesis.
    pub percentile: f64,
    /// Sub-score weights.
    pub weights: ShortlistWeights,
}

impl Default for ShortlistOptions {
    fn default() -> Self {
        Self {
            reference_year: REFERENCE_YEAR,
            percentile: ARCHETYPE_PERCENTILE,
            weights: ShortlistWeights::default(),
        }
    }
}

/// Generate ranked shortlists for every ranked position group at once.
///
/// The map always carries all of [`PositionGroup::RANKED`]; positions with
/// no candidates map to empty lists. Degraded data produces empty lists and
/// log records, never panics.
#[must_use]
pub fn generate_shortlists(
    ctx: &ServiceContext,
    birth_year: i32,
    top_n: usize,
    options: &ShortlistOptions,
) -> HashMap<PositionGroup, Vec<ShortlistEntry>> {
    if !ctx.store().has_request_context() {
        error!("reference table lacks the age/gender/position columns; returning empty shortlists");
        return empty_shortlists();
    }

    let target_age = f64::from(options.reference_year - birth_year);
    info!(
        "generating shortlists for birth year {birth_year} (age {target_age}, gender '{TARGET_GENDER}', top {top_n})"
    );
    let candidates = ctx.store().filter_by_age_gender(target_age, TARGET_GENDER);
    if candidates.is_empty() {
        warn!("no players found for age {target_age}, gender '{TARGET_GENDER}'");
        return empty_shortlists();
    }
    info!("found {} candidates for age {target_age}", candidates.len());

    let archetypes = archetype_embeddings(ctx, target_age, options.percentile);
    let scores = score_and_rank(ctx, &candidates, &archetypes, options.weights, top_n);

    let row_of: HashMap<&str, usize> = candidates
        .iter()
        .filter_map(|&row| ctx.store().player_id(row).map(|id| (id, row)))
        .collect();

    let mut shortlists = empty_shortlists();
    for (group, ranked) in scores {
        let entries = ranked
            .into_iter()
            .filter_map(|score| {
                let Some(&row) = row_of.get(score.player_id.as_str()) else {
                    warn!(
                        "could not find reference data for player {}; skipping",
                        score.player_id
                    );
                    return None;
                };
                Some(build_entry(ctx.store().reference(), row, group, &score))
            })
            .collect();
        shortlists.insert(group, entries);
    }
    shortlists
}

/// Generate the shortlist for one validated request.
#[must_use]
pub fn generate_shortlist(
    ctx: &ServiceContext,
    request: &ShortlistRequest,
    options: &ShortlistOptions,
) -> Vec<ShortlistEntry> {
    generate_shortlists(ctx, request.birth_year(), request.top_n(), options)
        .remove(&request.position())
        .unwrap_or_default()
}

fn empty_shortlists() -> HashMap<PositionGroup, Vec<ShortlistEntry>> {
    PositionGroup::RANKED
        .iter()
        .map(|&group| (group, Vec::new()))
        .collect()
}

/// Synthesise and embed one archetype per ranked position.
///
/// The context age window spans one year either side of the target age. A
/// failed embedding drops that position's archetype; its candidates then
/// score `0.0` similarity rather than disappearing.
#[expect(
    clippy::float_arithmetic,
    reason = "the context window is the target age plus or minus one year"
)]
fn archetype_embeddings(
    ctx: &ServiceContext,
    target_age: f64,
    percentile: f64,
) -> HashMap<PositionGroup, Vec<f32>> {
    let mut embeddings = HashMap::with_capacity(PositionGroup::RANKED.len());
    for &position in &PositionGroup::RANKED {
        let request = ArchetypeRequest {
            position,
            age_min: target_age - 1.0,
            age_max: target_age + 1.0,
            percentile,
        };
        info!(
            "generating archetype embedding for position {position}, context age {}..={}",
            request.age_min, request.age_max
        );
        let vector = synthesise_archetype(
            &request,
            ctx.schema(),
            ctx.catalogue(),
            ctx.scaler(),
            ctx.store().reference(),
        );
        match ctx.encoder().embed(&[vector]) {
            Ok(mut rows) => {
                let Some(embedding) = rows.pop() else {
                    error!("encoder returned no embedding for position {position} archetype");
                    continue;
                };
                embeddings.insert(position, embedding);
            }
            Err(err) => {
                error!("failed to embed archetype for position {position}: {err}");
            }
        }
    }
    embeddings
}

/// Integer display cell; truncated toward zero like the source data's
/// integer casts. Non-finite cells read as missing.
#[expect(
    clippy::cast_possible_truncation,
    reason = "display counts are small integers well inside i64 range"
)]
fn integer_cell(reference: &ReferenceTable, row: usize, column: &str) -> Option<i64> {
    reference
        .numeric_value(row, column)
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
}

fn float_cell(reference: &ReferenceTable, row: usize, column: &str) -> Option<f64> {
    reference
        .numeric_value(row, column)
        .filter(|value| value.is_finite())
}

fn text_cell(reference: &ReferenceTable, row: usize, column: &str) -> Option<String> {
    reference.text_value(row, column).map(ToOwned::to_owned)
}

fn build_entry(
    reference: &ReferenceTable,
    row: usize,
    group: PositionGroup,
    score: &CandidateScore,
) -> ShortlistEntry {
    ShortlistEntry {
        player_id: score.player_id.clone(),
        name: text_cell(reference, row, columns::NAME),
        age: integer_cell(reference, row, columns::AGE_ORIG),
        position: text_cell(reference, row, columns::POSITION_ORIG),
        nationality: text_cell(reference, row, columns::NATIONALITY_ORIG),
        position_group: group.as_str().to_owned(),
        gender: reference.gender(row).to_owned(),
        final_score: score.final_score,
        archetype_similarity: score.archetype_similarity,
        perf_score: score.perf_score,
        recent_perf_score: score.recent_perf_score,
        freshness_score: score.freshness_score,
        season_games_played: integer_cell(reference, row, columns::SEASON_GAMES_PLAYED),
        season_goals: integer_cell(reference, row, columns::SEASON_GOALS),
        season_assists: integer_cell(reference, row, columns::SEASON_ASSISTS),
        season_points: integer_cell(reference, row, columns::SEASON_POINTS),
        season_points_per_game: float_cell(reference, row, columns::SEASON_POINTS_PER_GAME),
        season_gaa: float_cell(reference, row, columns::SEASON_GAA),
        season_svp: float_cell(reference, row, columns::SEASON_SVP),
        season_shutouts: integer_cell(reference, row, columns::SEASON_SHUTOUTS),
        recent_games_played: integer_cell(reference, row, columns::RECENT_GP),
        recent_goals: integer_cell(reference, row, columns::RECENT_G),
        recent_assists: integer_cell(reference, row, columns::RECENT_A),
        recent_points: integer_cell(reference, row, columns::RECENT_TP),
        recent_penalty_minutes: integer_cell(reference, row, columns::RECENT_PIM),
        recent_plus_minus: integer_cell(reference, row, columns::RECENT_PLUS_MINUS),
        recent_saves: integer_cell(reference, row, columns::RECENT_SAVES),
        recent_shots_against: integer_cell(reference, row, columns::RECENT_SHOTS_AGAINST),
        recent_adj_points_per_game: float_cell(reference, row, columns::RECENT_ADJ_P_PER_GP_ORIG),
        recent_adj_save_pct: float_cell(reference, row, columns::RECENT_ADJ_SAVE_PCT_ORIG),
        days_since_last_game: integer_cell(reference, row, columns::DAYS_SINCE_LAST_GAME),
    }
}
