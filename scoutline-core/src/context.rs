//! Immutable bundle of the artefacts a shortlist request reads.
//!
//! The original service kept the loaded tables and model in module-level
//! globals. `ServiceContext` replaces them with an explicit value built
//! once at startup and passed by shared reference into every request-scoped
//! call; nothing here mutates after construction.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    Embedder, EmbeddingMatrix, FeatureCatalogue, FeatureSchema, FeatureStore, FittedScaler,
};

/// Errors raised while assembling the service context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// Declared feature columns were absent from the feature table.
    #[error("feature table is missing declared feature columns: {columns:?}")]
    MissingFeatureColumns {
        /// Columns declared by the schema but absent from the table.
        columns: Vec<String>,
    },
    /// The embedding matrix did not cover every player row.
    #[error("store has {players} players but the embedding matrix has {embeddings} rows")]
    EmbeddingCountMismatch {
        /// Player row count.
        players: usize,
        /// Embedding row count.
        embeddings: usize,
    },
    /// The encoder and the embedding matrix disagreed on dimensionality.
    #[error("encoder produces dimension {encoder} but the embedding matrix holds {matrix}")]
    EmbeddingDimensionMismatch {
        /// Encoder output dimension.
        encoder: usize,
        /// Embedding matrix dimension.
        matrix: usize,
    },
}

/// Shared, read-only startup artefacts.
#[derive(Clone)]
pub struct ServiceContext {
    store: FeatureStore,
    schema: FeatureSchema,
    catalogue: FeatureCatalogue,
    scaler: FittedScaler,
    encoder: Arc<dyn Embedder>,
    embeddings: EmbeddingMatrix,
}

impl ServiceContext {
    /// Assemble and cross-validate the context.
    ///
    /// The feature catalogue is derived from the schema here, once, so
    /// request-time code never re-classifies feature names.
    ///
    /// # Errors
    /// Returns [`ContextError`] when the schema, store, encoder, and
    /// embedding matrix disagree; all such faults are fatal at startup.
    pub fn new(
        store: FeatureStore,
        schema: FeatureSchema,
        scaler: FittedScaler,
        encoder: Arc<dyn Embedder>,
        embeddings: EmbeddingMatrix,
    ) -> Result<Self, ContextError> {
        let missing: Vec<String> = schema
            .feature_columns
            .iter()
            .filter(|col| !store.features().has_column(col))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ContextError::MissingFeatureColumns { columns: missing });
        }
        if embeddings.len() != store.len() {
            return Err(ContextError::EmbeddingCountMismatch {
                players: store.len(),
                embeddings: embeddings.len(),
            });
        }
        if encoder.embedding_dim() != embeddings.dim() {
            return Err(ContextError::EmbeddingDimensionMismatch {
                encoder: encoder.embedding_dim(),
                matrix: embeddings.dim(),
            });
        }
        let catalogue = FeatureCatalogue::from_schema(&schema);
        Ok(Self {
            store,
            schema,
            catalogue,
            scaler,
            encoder,
            embeddings,
        })
    }

    /// The paired feature and reference tables.
    #[must_use]
    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    /// Feature metadata.
    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Static feature classification.
    #[must_use]
    pub fn catalogue(&self) -> &FeatureCatalogue {
        &self.catalogue
    }

    /// Fitted feature scaler.
    #[must_use]
    pub fn scaler(&self) -> &FittedScaler {
        &self.scaler
    }

    /// The frozen embedding provider.
    #[must_use]
    pub fn encoder(&self) -> &dyn Embedder {
        self.encoder.as_ref()
    }

    /// Pre-computed embeddings, row-aligned with the store.
    #[must_use]
    pub fn embeddings(&self) -> &EmbeddingMatrix {
        &self.embeddings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("players", &self.store.len())
            .field("features", &self.schema.feature_columns.len())
            .field("embedding_dim", &self.embeddings.dim())
            .finish_non_exhaustive()
    }
}
