//! Core domain types for the Scoutline shortlist engine.
//!
//! The crate models the read-only artefacts a shortlist service shares
//! between requests: the scaled feature table, the original-scale reference
//! table, the fitted feature scaler, the frozen embedding provider, and the
//! pre-computed embedding matrix. Constructors return `Result` to surface
//! invalid input early; once constructed, every type here is immutable and
//! safe to share across request-handling threads.

#![forbid(unsafe_code)]

mod catalogue;
pub mod columns;
mod context;
mod embedder;
mod position;
mod scaler;
mod schema;
mod store;
mod table;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalogue::{FeatureCatalogue, FeatureClass};
pub use context::{ContextError, ServiceContext};
pub use embedder::{EmbedError, Embedder, EmbeddingMatrix, EmbeddingMatrixError};
pub use position::PositionGroup;
pub use scaler::{FittedScaler, ScalerError};
pub use schema::{FeatureSchema, SchemaError};
pub use store::{FeatureStore, StoreError};
pub use table::{FeatureTable, ReferenceTable, TableError};

/// Stable external identifier for a player.
pub type PlayerId = String;

/// Gender label substituted when the reference table has no value for a row.
pub const UNKNOWN_GENDER: &str = "Unknown";

/// Gender segment served by the shortlist pipeline.
pub const TARGET_GENDER: &str = "MEN";
