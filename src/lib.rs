//! Facade crate for the Scoutline shortlist engine.
//!
//! This crate re-exports the core domain types together with the scoring
//! pipeline and the artifact loading layer, so downstream users depend on a
//! single crate.

#![forbid(unsafe_code)]

pub use scoutline_core::{
    ContextError, EmbedError, Embedder, EmbeddingMatrix, EmbeddingMatrixError, FeatureCatalogue,
    FeatureClass, FeatureSchema, FeatureStore, FeatureTable, FittedScaler, PlayerId, PositionGroup,
    ReferenceTable, ScalerError, SchemaError, ServiceContext, StoreError, TableError,
};

pub use scoutline_scorer::{
    ArchetypeRequest, CandidateScore, MAX_TOP_N, MIN_TOP_N, REFERENCE_YEAR, ShortlistEntry,
    ShortlistOptions, ShortlistRequest, ShortlistRequestError, ShortlistWeights,
    archetype_similarity, generate_shortlist, generate_shortlists, synthesise_archetype,
};

pub use scoutline_data::{
    ArtifactError, ArtifactPaths, EncoderError, FrozenEncoder, LoadError, load_service_context,
};

#[cfg(feature = "test-support")]
pub use scoutline_core::test_support;
