//! Artifact loading for the Scoutline engine.
//!
//! The preprocessing and training pipeline exports five artifacts: feature
//! metadata (`feature_info.json`), the scaled feature table
//! (`features.bin`), the original-scale reference table (`reference.bin`),
//! the fitted scaler (`scaler.bin`), and the frozen encoder weights
//! (`encoder.bin`). This crate deserialises them, validates every
//! cross-artifact invariant, reconstructs the encoder as a pure-Rust
//! inference network, and assembles the shared
//! [`ServiceContext`](scoutline_core::ServiceContext) the rest of the engine
//! reads from.
//!
//! Loading is all-or-nothing: any missing file, malformed payload, or
//! alignment failure aborts startup rather than serving degraded results.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod artifacts;
mod encoder;
mod loader;

pub use artifacts::{
    ArtifactError, BatchNormArtifact, EncoderArtifact, FeatureTableArtifact, HiddenLayerArtifact,
    LinearArtifact, ReferenceTableArtifact, ScalerArtifact, artifact_bincode_options,
    read_bincode_artifact, read_json_artifact, write_bincode_artifact,
};
pub use encoder::{EncoderError, FrozenEncoder};
pub use loader::{ArtifactPaths, EMBEDDING_BATCH_SIZE, LoadError, load_service_context};
