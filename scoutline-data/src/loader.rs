//! Startup loading and validation of the exported artifacts.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use scoutline_core::{
    ContextError, EmbedError, Embedder, EmbeddingMatrix, EmbeddingMatrixError, FeatureSchema,
    FeatureStore, FeatureTable, FittedScaler, ReferenceTable, ScalerError, SchemaError,
    ServiceContext, StoreError, TableError,
};
use thiserror::Error;

use crate::artifacts::{
    ArtifactError, EncoderArtifact, FeatureTableArtifact, ReferenceTableArtifact, ScalerArtifact,
    read_bincode_artifact, read_json_artifact,
};
use crate::encoder::{EncoderError, FrozenEncoder};

/// Rows embedded per encoder batch during startup.
pub const EMBEDDING_BATCH_SIZE: usize = 512;

/// Locations of the five exported artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Feature metadata (JSON).
    pub feature_info: Utf8PathBuf,
    /// Scaled feature table (bincode).
    pub features: Utf8PathBuf,
    /// Original-scale reference table (bincode).
    pub reference: Utf8PathBuf,
    /// Fitted scaler parameters (bincode).
    pub scaler: Utf8PathBuf,
    /// Frozen encoder weights (bincode).
    pub encoder: Utf8PathBuf,
}

impl ArtifactPaths {
    /// Conventional artifact file names inside one directory.
    #[must_use]
    pub fn in_dir(dir: &Utf8Path) -> Self {
        Self {
            feature_info: dir.join("feature_info.json"),
            features: dir.join("features.bin"),
            reference: dir.join("reference.bin"),
            scaler: dir.join("scaler.bin"),
            encoder: dir.join("encoder.bin"),
        }
    }
}

/// Errors raised during startup loading.
///
/// Every variant is fatal; the service refuses to start on partial data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An artifact file could not be read or decoded.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    /// The feature metadata violated its invariants.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A table failed construction.
    #[error(transparent)]
    Table(#[from] TableError),
    /// The feature and reference tables could not be paired.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The scaler parameters were unusable.
    #[error(transparent)]
    Scaler(#[from] ScalerError),
    /// The encoder weights were unusable.
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    /// Embedding the population failed.
    #[error(transparent)]
    Embed(#[from] EmbedError),
    /// The embedding matrix could not be assembled.
    #[error(transparent)]
    EmbeddingMatrix(#[from] EmbeddingMatrixError),
    /// The assembled context failed its cross-checks.
    #[error(transparent)]
    Context(#[from] ContextError),
    /// The feature table's columns disagreed with the declared schema.
    #[error("feature table columns do not match the declared feature metadata")]
    ColumnOrderMismatch,
    /// The encoder's input width disagreed with the schema.
    #[error("encoder expects {expected} inputs but the schema declares {actual} feature columns")]
    EncoderInputMismatch {
        /// Encoder input width.
        expected: usize,
        /// Declared feature-column count.
        actual: usize,
    },
}

/// Load all artifacts, embed the population, and assemble the shared
/// service context.
///
/// # Errors
/// Returns [`LoadError`] on the first missing file, malformed payload, or
/// cross-artifact disagreement.
pub fn load_service_context(paths: &ArtifactPaths) -> Result<ServiceContext, LoadError> {
    info!("loading feature metadata from {}", paths.feature_info);
    let schema: FeatureSchema = read_json_artifact(&paths.feature_info)?;
    schema.validate()?;

    info!("loading feature table from {}", paths.features);
    let features_raw: FeatureTableArtifact = read_bincode_artifact(&paths.features)?;
    let features = FeatureTable::new(features_raw.ids, features_raw.columns, features_raw.rows)?;
    if features.columns() != schema.feature_columns.as_slice() {
        return Err(LoadError::ColumnOrderMismatch);
    }

    info!("loading reference table from {}", paths.reference);
    let reference_raw: ReferenceTableArtifact = read_bincode_artifact(&paths.reference)?;
    let reference = ReferenceTable::new(reference_raw.ids, reference_raw.numeric, reference_raw.text)?;

    let store = FeatureStore::new(features, reference)?;
    info!("paired tables cover {} players", store.len());

    info!("loading scaler parameters from {}", paths.scaler);
    let scaler_raw: ScalerArtifact = read_bincode_artifact(&paths.scaler)?;
    let scaler = FittedScaler::new(scaler_raw.columns, scaler_raw.offsets, scaler_raw.scales)?;

    info!("loading encoder weights from {}", paths.encoder);
    let encoder_raw: EncoderArtifact = read_bincode_artifact(&paths.encoder)?;
    let encoder = FrozenEncoder::new(encoder_raw)?;
    if encoder.input_dim() != schema.feature_columns.len() {
        return Err(LoadError::EncoderInputMismatch {
            expected: encoder.input_dim(),
            actual: schema.feature_columns.len(),
        });
    }
    let encoder = Arc::new(encoder);

    let embeddings = embed_population(&store, encoder.as_ref())?;
    let matrix = EmbeddingMatrix::new(embeddings, encoder.embedding_dim())?;
    info!(
        "embedded {} players at dimension {}",
        matrix.len(),
        matrix.dim()
    );

    Ok(ServiceContext::new(
        store,
        schema,
        scaler,
        encoder,
        matrix,
    )?)
}

/// Embed every feature row in fixed-size batches, preserving row order.
fn embed_population(
    store: &FeatureStore,
    encoder: &dyn Embedder,
) -> Result<Vec<Vec<f32>>, EmbedError> {
    let rows: Vec<Vec<f32>> = (0..store.len())
        .filter_map(|row| store.features().row(row).map(<[f32]>::to_vec))
        .collect();
    let mut embeddings = Vec::with_capacity(rows.len());
    for batch in rows.chunks(EMBEDDING_BATCH_SIZE) {
        embeddings.extend(encoder.embed(batch)?);
    }
    Ok(embeddings)
}
