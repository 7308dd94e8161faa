//! Serialised artifact formats and file codecs.
//!
//! Tables and model weights travel as bincode with the default options;
//! feature metadata stays JSON so the pipeline and the service agree on a
//! human-inspectable contract. The structs here mirror the files byte for
//! byte and carry no validation; the loader converts them into the core
//! types through their checked constructors.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};

use bincode::Options;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors raised while reading or writing an artifact file.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The file could not be opened or created.
    #[error("failed to open artifact '{path}'")]
    Open {
        /// Offending file path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A bincode payload could not be decoded or encoded.
    #[error("failed to decode artifact '{path}'")]
    Bincode {
        /// Offending file path.
        path: Utf8PathBuf,
        /// Underlying codec failure.
        #[source]
        source: bincode::Error,
    },
    /// A JSON payload could not be decoded.
    #[error("failed to decode artifact '{path}'")]
    Json {
        /// Offending file path.
        path: Utf8PathBuf,
        /// Underlying codec failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Bincode options used for every binary artifact.
#[must_use]
pub fn artifact_bincode_options() -> impl bincode::Options {
    bincode::DefaultOptions::new()
}

/// Read and decode one bincode artifact.
///
/// # Errors
/// Returns [`ArtifactError`] when the file cannot be opened or the payload
/// does not decode as `T`.
pub fn read_bincode_artifact<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, ArtifactError> {
    let file = File::open(path.as_std_path()).map_err(|source| ArtifactError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    artifact_bincode_options()
        .deserialize_from(BufReader::new(file))
        .map_err(|source| ArtifactError::Bincode {
            path: path.to_path_buf(),
            source,
        })
}

/// Encode and write one bincode artifact.
///
/// Used by the export tooling and by tests seeding loader fixtures.
///
/// # Errors
/// Returns [`ArtifactError`] when the file cannot be created or the value
/// does not serialise.
pub fn write_bincode_artifact<T: Serialize>(
    path: &Utf8Path,
    value: &T,
) -> Result<(), ArtifactError> {
    let file = File::create(path.as_std_path()).map_err(|source| ArtifactError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    artifact_bincode_options()
        .serialize_into(BufWriter::new(file), value)
        .map_err(|source| ArtifactError::Bincode {
            path: path.to_path_buf(),
            source,
        })
}

/// Read and decode one JSON artifact.
///
/// # Errors
/// Returns [`ArtifactError`] when the file cannot be opened or the payload
/// does not decode as `T`.
pub fn read_json_artifact<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, ArtifactError> {
    let file = File::open(path.as_std_path()).map_err(|source| ArtifactError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Scaled feature table as exported by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTableArtifact {
    /// Ordered player identifiers.
    pub ids: Vec<String>,
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Row-major scaled values, one row per identifier.
    pub rows: Vec<Vec<f32>>,
}

/// Original-scale reference table as exported by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTableArtifact {
    /// Ordered player identifiers; must match the feature table.
    pub ids: Vec<String>,
    /// Nullable numeric columns.
    pub numeric: BTreeMap<String, Vec<Option<f64>>>,
    /// Nullable text columns.
    pub text: BTreeMap<String, Vec<Option<String>>>,
}

/// Fitted scaler parameters as exported by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    /// Columns the scaler was fitted on, in parameter order.
    pub columns: Vec<String>,
    /// Per-column offsets subtracted before scaling.
    pub offsets: Vec<f64>,
    /// Per-column divisors.
    pub scales: Vec<f64>,
}

/// One dense linear layer, row-major over output units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearArtifact {
    /// `weights[out]` holds the input weights of one output unit.
    pub weights: Vec<Vec<f32>>,
    /// One bias per output unit.
    pub bias: Vec<f32>,
}

/// Frozen batch-normalisation parameters for one hidden width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchNormArtifact {
    /// Learned scale per unit.
    pub gamma: Vec<f32>,
    /// Learned shift per unit.
    pub beta: Vec<f32>,
    /// Population mean captured during training.
    pub running_mean: Vec<f32>,
    /// Population variance captured during training.
    pub running_var: Vec<f32>,
    /// Numerical stability term added to the variance.
    pub eps: f32,
}

/// One hidden block: linear, rectifier, then frozen normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenLayerArtifact {
    /// Dense projection into the hidden width.
    pub linear: LinearArtifact,
    /// Frozen normalisation over the hidden width.
    pub norm: BatchNormArtifact,
}

/// Complete encoder weights as exported after training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderArtifact {
    /// Hidden blocks applied in order.
    pub hidden: Vec<HiddenLayerArtifact>,
    /// Final projection into the embedding space.
    pub output: LinearArtifact,
}
