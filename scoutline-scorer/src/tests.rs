//! Unit coverage for archetype synthesis and candidate scoring.
#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashMap};

use rstest::rstest;
use scoutline_core::{
    FeatureCatalogue, FeatureSchema, FittedScaler, PositionGroup, ReferenceTable, ServiceContext,
    columns,
    test_support::{ContextFixture, FixturePlayer},
};

use crate::archetype::{ArchetypeRequest, synthesise_archetype};
use crate::error::ShortlistRequestError;
use crate::scoring::{archetype_similarity, score_and_rank};
use crate::shortlist::{ShortlistOptions, generate_shortlist, generate_shortlists};
use crate::types::{ShortlistRequest, ShortlistWeights};
use crate::{ARCHETYPE_PERCENTILE, stats};

#[expect(
    clippy::float_arithmetic,
    reason = "test asserts approximate float equality"
)]
fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected approximately {expected}, got {actual}"
    );
}

#[expect(
    clippy::float_arithmetic,
    reason = "test asserts approximate float equality"
)]
fn assert_close_f32(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected approximately {expected}, got {actual}"
    );
}

// --- order statistics ---

#[rstest]
#[case(&[1.0, 2.0, 3.0, 4.0], 0.5, 2.5)]
#[case(&[0.0, 0.5, 1.0], 0.85, 0.85)]
#[case(&[0.0, 0.5, 1.0], 0.15, 0.15)]
#[case(&[7.0], 0.85, 7.0)]
#[case(&[3.0, 1.0, 2.0], 1.0, 3.0)]
fn quantile_interpolates_between_order_statistics(
    #[case] values: &[f64],
    #[case] q: f64,
    #[case] expected: f64,
) {
    let actual = stats::quantile(values, q).expect("non-empty sample");
    assert_close(actual, expected);
}

#[rstest]
fn quantile_clamps_the_fraction() {
    assert_eq!(stats::quantile(&[1.0, 2.0], 7.0), Some(2.0));
    assert_eq!(stats::quantile(&[1.0, 2.0], -7.0), Some(1.0));
}

#[rstest]
fn quantile_of_empty_sample_is_none() {
    assert_eq!(stats::quantile(&[], 0.5), None);
    assert_eq!(stats::median(&[]), None);
}

#[rstest]
fn median_of_even_sample_averages_the_middle_pair() {
    let actual = stats::median(&[4.0, 1.0, 3.0, 2.0]).expect("non-empty sample");
    assert_close(actual, 2.5);
}

// --- cosine similarity ---

#[rstest]
fn identical_vectors_score_full_similarity() {
    let v = vec![0.3, 0.5, 0.2];
    assert_close_f32(archetype_similarity(&v, &v), 1.0);
}

#[rstest]
fn opposite_vectors_score_zero_similarity() {
    let v = vec![1.0, 2.0];
    let opposite = vec![-1.0, -2.0];
    assert_close_f32(archetype_similarity(&v, &opposite), 0.0);
}

#[rstest]
fn orthogonal_vectors_score_midpoint_similarity() {
    assert_close_f32(archetype_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.5);
}

#[rstest]
#[case(&[0.0, 0.0], &[1.0, 1.0])]
#[case(&[1.0, 1.0], &[0.0, 0.0])]
#[case(&[1.0], &[1.0, 1.0])]
fn degenerate_vectors_score_zero(#[case] a: &[f32], #[case] b: &[f32]) {
    assert_eq!(archetype_similarity(a, b), 0.0);
}

// --- weights and requests ---

#[rstest]
fn default_weights_validate() {
    assert!(ShortlistWeights::default().validate().is_ok());
}

#[rstest]
#[case(ShortlistWeights { similarity: -0.1, performance: 0.3, recent: 0.3, freshness: 0.1 })]
#[case(ShortlistWeights { similarity: f32::NAN, performance: 0.3, recent: 0.3, freshness: 0.1 })]
#[case(ShortlistWeights { similarity: 0.0, performance: 0.0, recent: 0.0, freshness: 0.0 })]
fn bad_weights_are_rejected(#[case] weights: ShortlistWeights) {
    assert_eq!(
        weights.validate(),
        Err(ShortlistRequestError::InvalidWeights)
    );
}

#[rstest]
fn default_weights_combine_sub_scores() {
    let weights = ShortlistWeights::default();
    assert_close_f32(weights.combine(1.0, 0.5, 0.5, 1.0), 0.7);
}

#[rstest]
#[case(1)]
#[case(100)]
fn boundary_shortlist_lengths_are_accepted(#[case] top_n: usize) {
    let request = ShortlistRequest::new(2008, PositionGroup::Forward, top_n);
    assert!(request.is_ok());
}

#[rstest]
#[case(0)]
#[case(101)]
fn out_of_range_shortlist_lengths_are_rejected(#[case] top_n: usize) {
    assert_eq!(
        ShortlistRequest::new(2008, PositionGroup::Forward, top_n),
        Err(ShortlistRequestError::TopNOutOfRange { requested: top_n })
    );
}

#[rstest]
fn unknown_position_cannot_be_requested() {
    assert_eq!(
        ShortlistRequest::new(2008, PositionGroup::Unknown, 10),
        Err(ShortlistRequestError::UnrankedPosition {
            position: "Unknown".into()
        })
    );
}

// --- archetype synthesis ---

fn forward_archetype_request() -> ArchetypeRequest {
    ArchetypeRequest {
        position: PositionGroup::Forward,
        age_min: 16.0,
        age_max: 18.0,
        percentile: ARCHETYPE_PERCENTILE,
    }
}

fn synthesise(ctx: &ServiceContext, request: &ArchetypeRequest) -> Vec<f32> {
    synthesise_archetype(
        request,
        ctx.schema(),
        ctx.catalogue(),
        ctx.scaler(),
        ctx.store().reference(),
    )
}

fn column_value(ctx: &ServiceContext, vector: &[f32], column: &str) -> f32 {
    let position = ctx
        .schema()
        .feature_columns
        .iter()
        .position(|c| c == column)
        .expect("column in schema");
    vector.get(position).copied().expect("value for column")
}

#[rstest]
fn archetype_sets_position_and_gender_indicators() {
    let fixture = ContextFixture::skater_schema();
    let ctx = fixture.build(vec![
        FixturePlayer::forward("p1", 16.0),
        FixturePlayer::forward("p2", 17.0),
    ]);
    let vector = synthesise(&ctx, &forward_archetype_request());
    assert_eq!(vector.len(), ctx.schema().feature_columns.len());
    assert_eq!(column_value(&ctx, &vector, "pos_F"), 1.0);
    assert_eq!(column_value(&ctx, &vector, "pos_D"), 0.0);
    assert_eq!(column_value(&ctx, &vector, "pos_G"), 0.0);
    assert_eq!(column_value(&ctx, &vector, "pos_Unknown"), 0.0);
    assert_eq!(column_value(&ctx, &vector, "gender_MEN"), 1.0);
    assert_eq!(column_value(&ctx, &vector, "gender_WOMEN"), 0.0);
}

#[rstest]
fn archetype_age_is_the_window_midpoint() {
    let fixture = ContextFixture::skater_schema();
    let ctx = fixture.build(vec![
        FixturePlayer::forward("p1", 16.0),
        FixturePlayer::forward("p2", 18.0),
    ]);
    let vector = synthesise(&ctx, &forward_archetype_request());
    assert_close_f32(column_value(&ctx, &vector, columns::AGE), 17.0);
}

#[rstest]
fn archetype_takes_the_requested_percentile() {
    let fixture = ContextFixture::skater_schema();
    let players = vec![
        FixturePlayer::forward("p1", 17.0).with_reference_numeric("game_freshness_orig", 0.0),
        FixturePlayer::forward("p2", 17.0).with_reference_numeric("game_freshness_orig", 0.5),
        FixturePlayer::forward("p3", 17.0).with_reference_numeric("game_freshness_orig", 1.0),
    ];
    let ctx = fixture.build(players);
    let vector = synthesise(&ctx, &forward_archetype_request());
    // 85th percentile of {0, 0.5, 1} with linear interpolation.
    assert_close_f32(column_value(&ctx, &vector, columns::GAME_FRESHNESS), 0.85);
}

#[rstest]
fn goals_against_trends_use_the_inverse_percentile() {
    let fixture = ContextFixture::goalie_schema();
    let players = vec![
        FixturePlayer::goaltender("p1", 17.0).with_reference_numeric("adj_GAA_trend_3yr_orig", 0.0),
        FixturePlayer::goaltender("p2", 17.0).with_reference_numeric("adj_GAA_trend_3yr_orig", 0.5),
        FixturePlayer::goaltender("p3", 17.0).with_reference_numeric("adj_GAA_trend_3yr_orig", 1.0),
    ];
    let ctx = fixture.build(players);
    let request = ArchetypeRequest {
        position: PositionGroup::Goaltender,
        ..forward_archetype_request()
    };
    let vector = synthesise(&ctx, &request);
    // Lower goals-against is better, so the target sits at the 15th percentile.
    assert_close_f32(column_value(&ctx, &vector, "adj_GAA_trend_3yr"), 0.15);
}

#[rstest]
fn empty_segment_falls_back_to_the_gender_population() {
    let fixture = ContextFixture::skater_schema();
    // No goaltenders exist, so a goaltender archetype must borrow the
    // men's population for its statistics.
    let players = vec![
        FixturePlayer::forward("p1", 17.0).with_reference_numeric("game_freshness_orig", 0.4),
        FixturePlayer::forward("p2", 17.0).with_reference_numeric("game_freshness_orig", 0.4),
    ];
    let ctx = fixture.build(players);
    let request = ArchetypeRequest {
        position: PositionGroup::Goaltender,
        ..forward_archetype_request()
    };
    let vector = synthesise(&ctx, &request);
    assert_close_f32(column_value(&ctx, &vector, columns::GAME_FRESHNESS), 0.4);
    // The indicator still names the requested position.
    assert_eq!(column_value(&ctx, &vector, "pos_G"), 1.0);
}

#[rstest]
fn reference_without_context_columns_borrows_the_gender_population() {
    let schema = FeatureSchema {
        feature_columns: vec![
            "game_freshness".to_owned(),
            "pos_G".to_owned(),
            "pos_Unknown".to_owned(),
            "gender_MEN".to_owned(),
        ],
        scaled_numeric_columns: vec!["game_freshness".to_owned()],
        player_id_column: "player_id".to_owned(),
    };
    let catalogue = FeatureCatalogue::from_schema(&schema);
    let scaler = FittedScaler::new(vec!["game_freshness".to_owned()], vec![0.0], vec![1.0])
        .expect("identity scaler");
    // Gender is the only context column; position and age are absent.
    let numeric = BTreeMap::from([(
        "game_freshness_orig".to_owned(),
        vec![Some(0.3), Some(0.9)],
    )]);
    let text = BTreeMap::from([(
        "gender".to_owned(),
        vec![Some("MEN".to_owned()), Some("WOMEN".to_owned())],
    )]);
    let reference = ReferenceTable::new(vec!["p1".into(), "p2".into()], numeric, text)
        .expect("reference table");
    let request = ArchetypeRequest {
        position: PositionGroup::Goaltender,
        ..forward_archetype_request()
    };
    let vector = synthesise_archetype(&request, &schema, &catalogue, &scaler, &reference);
    // Only the men's row feeds the context, so the percentile of {0.3} is 0.3.
    assert_close_f32(vector.first().copied().expect("freshness slot"), 0.3);
    assert_eq!(vector.get(1).copied(), Some(1.0));
    assert_eq!(vector.get(3).copied(), Some(1.0));
}

#[rstest]
fn empty_population_yields_the_neutral_fill() {
    let fixture = ContextFixture::skater_schema();
    let players = vec![
        FixturePlayer::forward("p1", 17.0).with_gender(Some("WOMEN")),
        FixturePlayer::forward("p2", 17.0).with_gender(Some("WOMEN")),
    ];
    let ctx = fixture.build(players);
    let vector = synthesise(&ctx, &forward_archetype_request());
    assert_eq!(vector.len(), ctx.schema().feature_columns.len());
    assert!(vector.iter().all(|&v| v == 0.5));
}

#[rstest]
fn features_without_reference_data_target_zero() {
    let fixture = ContextFixture::skater_schema();
    let ctx = fixture.build(vec![
        FixturePlayer::forward("p1", 17.0),
        FixturePlayer::forward("p2", 17.0),
    ]);
    let vector = synthesise(&ctx, &forward_archetype_request());
    // No original-scale mirror exists for the trend columns.
    assert_eq!(column_value(&ctx, &vector, "adj_P_per_GP_trend_3yr"), 0.0);
}

// --- candidate scoring ---

fn own_embedding_archetypes(
    ctx: &ServiceContext,
    row: usize,
    position: PositionGroup,
) -> HashMap<PositionGroup, Vec<f32>> {
    let embedding = ctx.embeddings().row(row).expect("embedding row").to_vec();
    HashMap::from([(position, embedding)])
}

#[rstest]
fn weighted_sub_scores_combine_into_the_final_score() {
    let fixture = ContextFixture::skater_schema();
    let player = FixturePlayer::forward("p1", 17.0)
        .with_feature("adj_P_per_GP_trend_3yr", 0.4)
        .with_feature("adj_G_per_GP_trend_3yr", 0.6)
        .with_feature(columns::RECENT_ADJ_P_PER_GP, 0.5)
        .with_feature(columns::GAME_FRESHNESS, 1.0);
    let ctx = fixture.build(vec![player]);
    let archetypes = own_embedding_archetypes(&ctx, 0, PositionGroup::Forward);

    let ranked = score_and_rank(&ctx, &[0], &archetypes, ShortlistWeights::default(), 10);
    let scores = ranked.get(&PositionGroup::Forward).expect("forward bucket");
    let score = scores.first().expect("scored candidate");
    assert_close_f32(score.archetype_similarity, 1.0);
    assert_close_f32(score.perf_score, 0.5);
    assert_close_f32(score.recent_perf_score, 0.5);
    assert_close_f32(score.freshness_score, 1.0);
    assert_close_f32(score.final_score, 0.7);
}

#[rstest]
fn zero_recent_rate_falls_back_to_the_season_rate() {
    let fixture = ContextFixture::skater_schema();
    let player = FixturePlayer::forward("p1", 17.0)
        .with_feature(columns::RECENT_ADJ_P_PER_GP, 0.0)
        .with_feature(columns::ADJ_SEASON_POINTS_PER_GAME, 0.6);
    let ctx = fixture.build(vec![player]);

    let ranked = score_and_rank(&ctx, &[0], &HashMap::new(), ShortlistWeights::default(), 10);
    let scores = ranked.get(&PositionGroup::Forward).expect("forward bucket");
    assert_close_f32(scores.first().expect("candidate").recent_perf_score, 0.6);
}

#[rstest]
fn goaltender_trends_invert_goals_against() {
    let fixture = ContextFixture::goalie_schema();
    let player = FixturePlayer::goaltender("p1", 17.0)
        .with_feature("adj_GAA_trend_3yr", 0.2)
        .with_feature("adj_SVP_trend_3yr", 0.8)
        .with_feature(columns::RECENT_ADJ_SAVE_PCT, 0.4);
    let ctx = fixture.build(vec![player]);

    let ranked = score_and_rank(&ctx, &[0], &HashMap::new(), ShortlistWeights::default(), 10);
    let scores = ranked.get(&PositionGroup::Goaltender).expect("goalie bucket");
    let score = scores.first().expect("candidate");
    // trend = mean(1 - 0.2, 0.8) = 0.8; perf = 0.7 * 0.8 + 0.3 * 0.4.
    assert_close_f32(score.perf_score, 0.68);
    assert_close_f32(score.recent_perf_score, 0.4);
}

#[rstest]
fn equal_scores_keep_population_order() {
    let fixture = ContextFixture::skater_schema();
    let ctx = fixture.build(vec![
        FixturePlayer::forward("p1", 17.0),
        FixturePlayer::forward("p2", 17.0),
        FixturePlayer::forward("p3", 17.0),
    ]);

    let ranked = score_and_rank(
        &ctx,
        &[0, 1, 2],
        &HashMap::new(),
        ShortlistWeights::default(),
        10,
    );
    let ids: Vec<&str> = ranked
        .get(&PositionGroup::Forward)
        .expect("forward bucket")
        .iter()
        .map(|score| score.player_id.as_str())
        .collect();
    assert_eq!(ids, ["p1", "p2", "p3"]);
}

#[rstest]
fn ranking_truncates_to_the_requested_length() {
    let fixture = ContextFixture::skater_schema();
    let players: Vec<FixturePlayer> = (0..5)
        .map(|i| FixturePlayer::forward(&format!("p{i}"), 17.0))
        .collect();
    let ctx = fixture.build(players);

    let ranked = score_and_rank(
        &ctx,
        &[0, 1, 2, 3, 4],
        &HashMap::new(),
        ShortlistWeights::default(),
        2,
    );
    assert_eq!(
        ranked.get(&PositionGroup::Forward).map(Vec::len),
        Some(2)
    );
}

#[rstest]
fn every_ranked_position_has_a_bucket() {
    let fixture = ContextFixture::skater_schema();
    let ctx = fixture.build(vec![FixturePlayer::forward("p1", 17.0)]);

    let ranked = score_and_rank(&ctx, &[0], &HashMap::new(), ShortlistWeights::default(), 10);
    for group in PositionGroup::RANKED {
        assert!(ranked.contains_key(&group), "missing bucket for {group}");
    }
    assert!(ranked.get(&PositionGroup::Defence).expect("bucket").is_empty());
}

#[rstest]
fn unranked_positions_belong_to_no_bucket() {
    let fixture = ContextFixture::skater_schema();
    let mystery = FixturePlayer {
        position: PositionGroup::Unknown,
        ..FixturePlayer::forward("mystery", 17.0)
    };
    let ctx = fixture.build(vec![FixturePlayer::forward("p1", 17.0), mystery]);

    let ranked = score_and_rank(
        &ctx,
        &[0, 1],
        &HashMap::new(),
        ShortlistWeights::default(),
        10,
    );
    let total: usize = ranked.values().map(Vec::len).sum();
    assert_eq!(total, 1);
    let forwards = ranked.get(&PositionGroup::Forward).expect("forward bucket");
    assert_eq!(
        forwards.first().map(|score| score.player_id.as_str()),
        Some("p1")
    );
}

#[rstest]
fn higher_scores_rank_first() {
    let fixture = ContextFixture::skater_schema();
    let ctx = fixture.build(vec![
        FixturePlayer::forward("low", 17.0).with_feature(columns::GAME_FRESHNESS, 0.1),
        FixturePlayer::forward("high", 17.0).with_feature(columns::GAME_FRESHNESS, 0.9),
    ]);

    let ranked = score_and_rank(
        &ctx,
        &[0, 1],
        &HashMap::new(),
        ShortlistWeights::default(),
        10,
    );
    let ids: Vec<&str> = ranked
        .get(&PositionGroup::Forward)
        .expect("forward bucket")
        .iter()
        .map(|score| score.player_id.as_str())
        .collect();
    assert_eq!(ids, ["high", "low"]);
}

// --- shortlist orchestration ---

fn cohort() -> Vec<FixturePlayer> {
    vec![
        FixturePlayer::forward("fwd-1", 17.0)
            .with_reference_text("name", "First Forward")
            .with_reference_numeric("season_goals_orig", 12.9),
        FixturePlayer::forward("fwd-2", 17.0),
        FixturePlayer::goaltender("gk-1", 17.0),
        FixturePlayer::forward("too-old", 18.0),
        FixturePlayer::forward("other-cohort", 17.0).with_gender(Some("WOMEN")),
    ]
}

#[rstest]
fn shortlists_cover_the_matching_cohort_only() {
    let fixture = ContextFixture::mixed_schema();
    let ctx = fixture.build(cohort());

    let shortlists = generate_shortlists(&ctx, 2008, 10, &ShortlistOptions::default());
    let forwards = shortlists.get(&PositionGroup::Forward).expect("forwards");
    let goalies = shortlists.get(&PositionGroup::Goaltender).expect("goalies");
    let defenders = shortlists.get(&PositionGroup::Defence).expect("defenders");
    assert_eq!(forwards.len(), 2);
    assert_eq!(goalies.len(), 1);
    assert!(defenders.is_empty());

    let ids: Vec<&str> = forwards.iter().map(|e| e.player_id.as_str()).collect();
    assert!(ids.contains(&"fwd-1") && ids.contains(&"fwd-2"));
}

#[rstest]
fn entries_carry_reference_display_data() {
    let fixture = ContextFixture::mixed_schema();
    let ctx = fixture.build(cohort());

    let shortlists = generate_shortlists(&ctx, 2008, 10, &ShortlistOptions::default());
    let forwards = shortlists.get(&PositionGroup::Forward).expect("forwards");
    let entry = forwards
        .iter()
        .find(|e| e.player_id == "fwd-1")
        .expect("entry for fwd-1");
    assert_eq!(entry.name.as_deref(), Some("First Forward"));
    assert_eq!(entry.age, Some(17));
    assert_eq!(entry.position_group, "F");
    assert_eq!(entry.gender, "MEN");
    // Integer display cells truncate toward zero.
    assert_eq!(entry.season_goals, Some(12));
    assert_eq!(entry.season_assists, None);
}

#[rstest]
fn requested_position_selects_one_shortlist() {
    let fixture = ContextFixture::mixed_schema();
    let ctx = fixture.build(cohort());
    let request =
        ShortlistRequest::new(2008, PositionGroup::Goaltender, 10).expect("valid request");

    let shortlist = generate_shortlist(&ctx, &request, &ShortlistOptions::default());
    assert_eq!(shortlist.len(), 1);
    assert_eq!(
        shortlist.first().map(|e| e.player_id.as_str()),
        Some("gk-1")
    );
}

#[rstest]
fn unmatched_birth_year_produces_empty_shortlists() {
    let fixture = ContextFixture::mixed_schema();
    let ctx = fixture.build(cohort());

    let shortlists = generate_shortlists(&ctx, 1990, 10, &ShortlistOptions::default());
    assert!(shortlists.values().all(Vec::is_empty));
    assert_eq!(shortlists.len(), PositionGroup::RANKED.len());
}

#[rstest]
fn reference_year_offsets_the_target_age() {
    let fixture = ContextFixture::mixed_schema();
    let ctx = fixture.build(cohort());
    let options = ShortlistOptions {
        reference_year: 2024,
        ..ShortlistOptions::default()
    };

    // Against a 2024 snapshot the 2008 cohort is sixteen, which no player
    // matches; 2007 lands on the seventeen-year-olds.
    let none = generate_shortlists(&ctx, 2008, 10, &options);
    assert!(none.values().all(Vec::is_empty));
    let some = generate_shortlists(&ctx, 2007, 10, &options);
    assert_eq!(
        some.get(&PositionGroup::Forward).map(Vec::len),
        Some(2)
    );
}
