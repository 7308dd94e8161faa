//! Test-only stub embedder and in-memory context fixtures used by unit and
//! behaviour tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{
    EmbedError, Embedder, EmbeddingMatrix, FeatureSchema, FeatureStore, FeatureTable, FittedScaler,
    PositionGroup, ReferenceTable, ServiceContext, columns, context::ContextError,
};

/// Deterministic embedder that truncates or zero-pads each feature row to a
/// fixed dimension.
///
/// Each row is embedded independently of the rest of the batch, so batches
/// of one behave identically to larger batches.
#[derive(Debug, Clone, Copy)]
pub struct StubEmbedder {
    dim: usize,
}

impl StubEmbedder {
    /// Create a stub producing embeddings of the given dimension.
    #[must_use]
    pub const fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Embedder for StubEmbedder {
    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if rows.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }
        Ok(rows
            .iter()
            .map(|row| {
                let mut out: Vec<f32> = row.iter().copied().take(self.dim).collect();
                out.resize(self.dim, 0.0);
                out
            })
            .collect())
    }
}

/// One player's worth of fixture data.
#[derive(Debug, Clone)]
pub struct FixturePlayer {
    /// Player identifier.
    pub id: String,
    /// Original-scale age.
    pub age: f64,
    /// Gender label; `None` leaves the reference cell missing.
    pub gender: Option<String>,
    /// Position group.
    pub position: PositionGroup,
    /// Scaled feature overrides applied on top of the one-hot defaults.
    pub features: Vec<(String, f32)>,
    /// Extra original-scale numeric reference cells.
    pub reference_numeric: Vec<(String, f64)>,
    /// Extra text reference cells.
    pub reference_text: Vec<(String, String)>,
}

impl FixturePlayer {
    fn with_position(id: &str, age: f64, position: PositionGroup) -> Self {
        Self {
            id: id.to_owned(),
            age,
            gender: Some(crate::TARGET_GENDER.to_owned()),
            position,
            features: Vec::new(),
            reference_numeric: Vec::new(),
            reference_text: Vec::new(),
        }
    }

    /// A forward in the men's population.
    #[must_use]
    pub fn forward(id: &str, age: f64) -> Self {
        Self::with_position(id, age, PositionGroup::Forward)
    }

    /// A defender in the men's population.
    #[must_use]
    pub fn defender(id: &str, age: f64) -> Self {
        Self::with_position(id, age, PositionGroup::Defence)
    }

    /// A goaltender in the men's population.
    #[must_use]
    pub fn goaltender(id: &str, age: f64) -> Self {
        Self::with_position(id, age, PositionGroup::Goaltender)
    }

    /// Override the gender label.
    #[must_use]
    pub fn with_gender(mut self, gender: Option<&str>) -> Self {
        self.gender = gender.map(ToOwned::to_owned);
        self
    }

    /// Set one scaled feature value.
    #[must_use]
    pub fn with_feature(mut self, column: &str, value: f32) -> Self {
        self.features.push((column.to_owned(), value));
        self
    }

    /// Set one original-scale numeric reference cell.
    #[must_use]
    pub fn with_reference_numeric(mut self, column: &str, value: f64) -> Self {
        self.reference_numeric.push((column.to_owned(), value));
        self
    }

    /// Set one text reference cell.
    #[must_use]
    pub fn with_reference_text(mut self, column: &str, value: &str) -> Self {
        self.reference_text.push((column.to_owned(), value.to_owned()));
        self
    }
}

/// Builds small in-memory [`ServiceContext`] values for tests.
#[derive(Debug, Clone)]
pub struct ContextFixture {
    schema: FeatureSchema,
    embedding_dim: usize,
}

const ONE_HOT_COLUMNS: [&str; 6] = [
    "pos_G",
    "pos_D",
    "pos_F",
    "pos_Unknown",
    "gender_MEN",
    "gender_WOMEN",
];

impl ContextFixture {
    fn with_numeric_columns(numeric: &[&str]) -> Self {
        let feature_columns = numeric
            .iter()
            .chain(ONE_HOT_COLUMNS.iter())
            .map(ToString::to_string)
            .collect();
        Self {
            schema: FeatureSchema {
                feature_columns,
                scaled_numeric_columns: numeric.iter().map(ToString::to_string).collect(),
                player_id_column: "player_id".into(),
            },
            embedding_dim: 4,
        }
    }

    /// Schema carrying the skater scoring features.
    #[must_use]
    pub fn skater_schema() -> Self {
        Self::with_numeric_columns(&[
            columns::AGE,
            "adj_P_per_GP_trend_3yr",
            "adj_G_per_GP_trend_3yr",
            columns::RECENT_ADJ_P_PER_GP,
            columns::ADJ_SEASON_POINTS_PER_GAME,
            columns::GAME_FRESHNESS,
        ])
    }

    /// Schema carrying the goaltender scoring features.
    #[must_use]
    pub fn goalie_schema() -> Self {
        Self::with_numeric_columns(&[
            columns::AGE,
            "adj_GAA_trend_3yr",
            "adj_SVP_trend_3yr",
            columns::RECENT_ADJ_SAVE_PCT,
            columns::ADJ_SEASON_SVP,
            columns::GAME_FRESHNESS,
        ])
    }

    /// Schema carrying both skater and goaltender scoring features.
    #[must_use]
    pub fn mixed_schema() -> Self {
        Self::with_numeric_columns(&[
            columns::AGE,
            "adj_P_per_GP_trend_3yr",
            "adj_G_per_GP_trend_3yr",
            "adj_GAA_trend_3yr",
            "adj_SVP_trend_3yr",
            columns::RECENT_ADJ_P_PER_GP,
            columns::ADJ_SEASON_POINTS_PER_GAME,
            columns::RECENT_ADJ_SAVE_PCT,
            columns::ADJ_SEASON_SVP,
            columns::GAME_FRESHNESS,
        ])
    }

    /// The fixture's feature schema.
    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Build a context for the given players.
    ///
    /// # Panics
    /// Panics when fixture data is internally inconsistent; tests should
    /// fail fast on broken setup.
    #[must_use]
    pub fn build(&self, players: Vec<FixturePlayer>) -> ServiceContext {
        self.try_build(players, false).expect("fixture context")
    }

    /// Build a context whose embedding matrix drops the final row, to
    /// exercise the startup alignment check. Requires at least two players.
    ///
    /// # Errors
    /// Returns the [`ContextError`] the truncation provokes.
    pub fn try_build_with_truncated_embeddings(
        &self,
        players: Vec<FixturePlayer>,
    ) -> Result<ServiceContext, ContextError> {
        self.try_build(players, true)
    }

    fn try_build(
        &self,
        players: Vec<FixturePlayer>,
        truncate_embeddings: bool,
    ) -> Result<ServiceContext, ContextError> {
        let ids: Vec<String> = players.iter().map(|p| p.id.clone()).collect();
        let rows: Vec<Vec<f32>> = players.iter().map(|p| self.feature_row(p)).collect();
        let features = FeatureTable::new(ids.clone(), self.schema.feature_columns.clone(), rows)
            .expect("fixture feature table");

        let reference = build_reference(ids, &players);
        let store = FeatureStore::new(features, reference).expect("fixture store");

        let scaler = identity_scaler(&self.schema);
        let encoder = Arc::new(StubEmbedder::new(self.embedding_dim));
        let embedded: Vec<Vec<f32>> = (0..store.len())
            .map(|row| store.features().row(row).expect("feature row").to_vec())
            .collect();
        let mut embeddings = encoder.embed(&embedded).expect("fixture embeddings");
        if truncate_embeddings {
            assert!(embeddings.len() > 1, "truncation needs at least two players");
            embeddings.pop();
        }
        let matrix = EmbeddingMatrix::new(embeddings, self.embedding_dim)
            .expect("fixture embedding matrix");
        ServiceContext::new(store, self.schema.clone(), scaler, encoder, matrix)
    }

    fn feature_row(&self, player: &FixturePlayer) -> Vec<f32> {
        self.schema
            .feature_columns
            .iter()
            .map(|column| {
                if let Some((_, value)) = player
                    .features
                    .iter()
                    .find(|(name, _)| name == column)
                {
                    *value
                } else if column == player.position.indicator_column() {
                    1.0
                } else if column == columns::GENDER_MEN
                    && player.gender.as_deref() == Some(crate::TARGET_GENDER)
                {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}

fn identity_scaler(schema: &FeatureSchema) -> FittedScaler {
    let numeric: Vec<String> = schema
        .numeric_feature_columns()
        .iter()
        .map(ToString::to_string)
        .collect();
    let count = numeric.len();
    FittedScaler::new(numeric, vec![0.0; count], vec![1.0; count]).expect("identity scaler")
}

fn build_reference(ids: Vec<String>, players: &[FixturePlayer]) -> ReferenceTable {
    let mut numeric: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
    let mut text: BTreeMap<String, Vec<Option<String>>> = BTreeMap::new();

    numeric.insert(
        columns::AGE_ORIG.to_owned(),
        players.iter().map(|p| Some(p.age)).collect(),
    );
    text.insert(
        columns::GENDER.to_owned(),
        players.iter().map(|p| p.gender.clone()).collect(),
    );
    text.insert(
        columns::POSITION_GROUP.to_owned(),
        players
            .iter()
            .map(|p| match p.position {
                PositionGroup::Unknown => None,
                known => Some(known.as_str().to_owned()),
            })
            .collect(),
    );

    for (row, player) in players.iter().enumerate() {
        for (column, value) in &player.reference_numeric {
            let cells = numeric
                .entry(column.clone())
                .or_insert_with(|| vec![None; players.len()]);
            if let Some(cell) = cells.get_mut(row) {
                *cell = Some(*value);
            }
        }
        for (column, value) in &player.reference_text {
            let cells = text
                .entry(column.clone())
                .or_insert_with(|| vec![None; players.len()]);
            if let Some(cell) = cells.get_mut(row) {
                *cell = Some(value.clone());
            }
        }
    }

    ReferenceTable::new(ids, numeric, text).expect("fixture reference table")
}
