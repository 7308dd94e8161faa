//! Embed scaled feature vectors through the frozen encoder.
//!
//! The `Embedder` trait is the seam between the scoring pipeline and the
//! externally trained model artefact. Implementations are opaque to the
//! rest of the engine; only the batch shape contract matters here.

use thiserror::Error;

/// Errors raised while embedding a batch of feature vectors.
#[derive(Debug, Error, PartialEq)]
pub enum EmbedError {
    /// The batch contained no rows.
    #[error("embedding batch must contain at least one row")]
    EmptyBatch,
    /// An input row did not match the encoder's input width.
    #[error("batch row {row} has {actual} features but the encoder expects {expected}")]
    InputWidthMismatch {
        /// Zero-based row index within the batch.
        row: usize,
        /// Expected feature count.
        expected: usize,
        /// Observed feature count.
        actual: usize,
    },
    /// The encoder produced an unusable value.
    #[error("encoder inference failed: {message}")]
    Inference {
        /// Human-readable failure description.
        message: String,
    },
}

/// Produce a fixed-length embedding for each scaled feature row.
///
/// Implementations must be thread-safe (`Send` + `Sync`) and free of
/// interior mutability: the encoder is fixed to inference behaviour at
/// startup and never toggled afterwards, so concurrent read-only calls are
/// safe.
///
/// Batches of one row must work. Encoders with normalisation layers are
/// required to apply running statistics frozen at training time, never
/// statistics recomputed from the batch — a single-sample batch carries no
/// usable batch statistics.
///
/// # Examples
///
/// ```rust
/// use scoutline_core::{EmbedError, Embedder};
///
/// struct MeanEmbedder;
///
/// impl Embedder for MeanEmbedder {
///     fn embedding_dim(&self) -> usize {
///         1
///     }
///
///     fn embed(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, EmbedError> {
///         if rows.is_empty() {
///             return Err(EmbedError::EmptyBatch);
///         }
///         Ok(rows
///             .iter()
///             .map(|row| {
///                 let sum: f32 = row.iter().sum();
///                 vec![sum / row.len().max(1) as f32]
///             })
///             .collect())
///     }
/// }
///
/// let embedder = MeanEmbedder;
/// let out = embedder.embed(&[vec![1.0, 3.0]]).expect("single-row batch");
/// assert_eq!(out, vec![vec![2.0]]);
/// ```
pub trait Embedder: Send + Sync {
    /// Length of every embedding vector the encoder produces.
    fn embedding_dim(&self) -> usize;

    /// Embed a batch of N ≥ 1 scaled feature rows into N embedding vectors.
    ///
    /// # Errors
    /// Returns [`EmbedError`] for empty batches, rows of the wrong width,
    /// or inference failures.
    fn embed(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Errors raised while assembling the embedding matrix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbeddingMatrixError {
    /// The matrix contained no rows.
    #[error("embedding matrix must contain at least one row")]
    Empty,
    /// A row did not match the declared embedding dimension.
    #[error("embedding row {row} has dimension {actual} but {expected} was declared")]
    DimensionMismatch {
        /// Zero-based row index.
        row: usize,
        /// Declared dimension.
        expected: usize,
        /// Observed dimension.
        actual: usize,
    },
}

/// One embedding vector per feature-table row, in the same row order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    dim: usize,
    rows: Vec<Vec<f32>>,
}

impl EmbeddingMatrix {
    /// Validate and construct the matrix.
    ///
    /// # Errors
    /// Returns [`EmbeddingMatrixError`] when the matrix is empty or any row
    /// disagrees with the declared dimension.
    pub fn new(rows: Vec<Vec<f32>>, dim: usize) -> Result<Self, EmbeddingMatrixError> {
        if rows.is_empty() {
            return Err(EmbeddingMatrixError::Empty);
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != dim {
                return Err(EmbeddingMatrixError::DimensionMismatch {
                    row,
                    expected: dim,
                    actual: values.len(),
                });
            }
        }
        Ok(Self { dim, rows })
    }

    /// Number of embedded rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the matrix holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Embedding dimension shared by every row.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embedding vector for a row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        self.rows.get(row).map(Vec::as_slice)
    }
}
