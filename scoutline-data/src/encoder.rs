//! Pure-Rust inference for the trained player encoder.
//!
//! The network is a stack of hidden blocks (dense projection, rectifier,
//! frozen batch normalisation) followed by a final dense projection into the
//! embedding space. Normalisation uses the running statistics captured
//! during training, never batch statistics, so a batch of one embeds
//! identically to the same row inside a larger batch. Dropout exists only
//! during training and has no inference-time counterpart here.

use scoutline_core::{EmbedError, Embedder};
use thiserror::Error;

use crate::artifacts::{BatchNormArtifact, EncoderArtifact, LinearArtifact};

/// Errors raised while validating encoder weights.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncoderError {
    /// A linear layer declared no output units.
    #[error("encoder layer {layer} declares no output units")]
    EmptyLayer {
        /// Zero-based layer index; the output projection is the last.
        layer: usize,
    },
    /// A weight row's width disagreed with the previous layer's width.
    #[error("encoder layer {layer} expects {expected} inputs but a weight row has {actual}")]
    WeightWidthMismatch {
        /// Zero-based layer index.
        layer: usize,
        /// Width produced by the previous layer.
        expected: usize,
        /// Observed weight-row width.
        actual: usize,
    },
    /// A layer's bias count disagreed with its weight rows.
    #[error("encoder layer {layer} has {weights} weight rows but {biases} biases")]
    BiasCountMismatch {
        /// Zero-based layer index.
        layer: usize,
        /// Weight-row count.
        weights: usize,
        /// Bias count.
        biases: usize,
    },
    /// A normalisation parameter vector disagreed with the hidden width.
    #[error("encoder layer {layer} normalises {actual} units but the hidden width is {expected}")]
    NormWidthMismatch {
        /// Zero-based layer index.
        layer: usize,
        /// Hidden width of the layer.
        expected: usize,
        /// Observed parameter count.
        actual: usize,
    },
    /// A parameter was NaN or infinite.
    #[error("encoder layer {layer} contains a non-finite parameter")]
    NonFiniteParameter {
        /// Zero-based layer index.
        layer: usize,
    },
    /// A normalisation divisor was not strictly positive.
    #[error("encoder layer {layer} has a non-positive normalisation variance")]
    NonPositiveVariance {
        /// Zero-based layer index.
        layer: usize,
    },
}

struct Linear {
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl Linear {
    fn apply(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, bias)| {
                row.iter()
                    .zip(input.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f32>()
                    + bias
            })
            .collect()
    }

    fn output_dim(&self) -> usize {
        self.bias.len()
    }
}

struct FrozenNorm {
    gamma: Vec<f32>,
    beta: Vec<f32>,
    mean: Vec<f32>,
    inv_std: Vec<f32>,
}

impl FrozenNorm {
    fn apply_in_place(&self, values: &mut [f32]) {
        for (((value, mean), inv_std), (gamma, beta)) in values
            .iter_mut()
            .zip(self.mean.iter())
            .zip(self.inv_std.iter())
            .zip(self.gamma.iter().zip(self.beta.iter()))
        {
            *value = (*value - mean) * inv_std * gamma + beta;
        }
    }
}

struct HiddenBlock {
    linear: Linear,
    norm: FrozenNorm,
}

/// The trained encoder, fixed to inference behaviour.
///
/// Construction validates the full weight chain; a validated encoder cannot
/// fail structurally at inference time, only produce non-finite outputs,
/// which [`Embedder::embed`] reports as an inference error.
pub struct FrozenEncoder {
    input_dim: usize,
    embedding_dim: usize,
    hidden: Vec<HiddenBlock>,
    output: Linear,
}

impl std::fmt::Debug for FrozenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrozenEncoder")
            .field("input_dim", &self.input_dim)
            .field("embedding_dim", &self.embedding_dim)
            .field("hidden_layers", &self.hidden.len())
            .finish()
    }
}

impl FrozenEncoder {
    /// Validate the weight chain and build the inference network.
    ///
    /// # Errors
    /// Returns [`EncoderError`] when any layer's dimensions disagree with
    /// its neighbours or any parameter is unusable.
    pub fn new(artifact: EncoderArtifact) -> Result<Self, EncoderError> {
        let input_dim = artifact
            .hidden
            .first()
            .map_or_else(|| first_row_width(&artifact.output), |h| first_row_width(&h.linear));

        let mut width = input_dim;
        let mut hidden = Vec::with_capacity(artifact.hidden.len());
        for (layer, block) in artifact.hidden.into_iter().enumerate() {
            let linear = validate_linear(layer, block.linear, width)?;
            width = linear.output_dim();
            let norm = validate_norm(layer, block.norm, width)?;
            hidden.push(HiddenBlock { linear, norm });
        }
        let output_layer = hidden.len();
        let output = validate_linear(output_layer, artifact.output, width)?;
        let embedding_dim = output.output_dim();
        Ok(Self {
            input_dim,
            embedding_dim,
            hidden,
            output,
        })
    }

    /// Width of the feature rows the encoder accepts.
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn forward(&self, row: &[f32]) -> Vec<f32> {
        let mut values = row.to_vec();
        for block in &self.hidden {
            values = block.linear.apply(&values);
            for value in &mut values {
                *value = value.max(0.0);
            }
            block.norm.apply_in_place(&mut values);
        }
        self.output.apply(&values)
    }
}

impl Embedder for FrozenEncoder {
    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    fn embed(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if rows.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }
        let mut embeddings = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != self.input_dim {
                return Err(EmbedError::InputWidthMismatch {
                    row: index,
                    expected: self.input_dim,
                    actual: row.len(),
                });
            }
            let embedding = self.forward(row);
            if embedding.iter().any(|value| !value.is_finite()) {
                return Err(EmbedError::Inference {
                    message: format!("non-finite embedding for batch row {index}"),
                });
            }
            embeddings.push(embedding);
        }
        Ok(embeddings)
    }
}

fn first_row_width(linear: &LinearArtifact) -> usize {
    linear.weights.first().map_or(0, Vec::len)
}

fn validate_linear(
    layer: usize,
    artifact: LinearArtifact,
    input_dim: usize,
) -> Result<Linear, EncoderError> {
    if artifact.weights.is_empty() || input_dim == 0 {
        return Err(EncoderError::EmptyLayer { layer });
    }
    if artifact.weights.len() != artifact.bias.len() {
        return Err(EncoderError::BiasCountMismatch {
            layer,
            weights: artifact.weights.len(),
            biases: artifact.bias.len(),
        });
    }
    for row in &artifact.weights {
        if row.len() != input_dim {
            return Err(EncoderError::WeightWidthMismatch {
                layer,
                expected: input_dim,
                actual: row.len(),
            });
        }
    }
    let finite = artifact
        .weights
        .iter()
        .flatten()
        .chain(artifact.bias.iter())
        .all(|value| value.is_finite());
    if !finite {
        return Err(EncoderError::NonFiniteParameter { layer });
    }
    Ok(Linear {
        weights: artifact.weights,
        bias: artifact.bias,
    })
}

fn validate_norm(
    layer: usize,
    artifact: BatchNormArtifact,
    width: usize,
) -> Result<FrozenNorm, EncoderError> {
    for params in [
        &artifact.gamma,
        &artifact.beta,
        &artifact.running_mean,
        &artifact.running_var,
    ] {
        if params.len() != width {
            return Err(EncoderError::NormWidthMismatch {
                layer,
                expected: width,
                actual: params.len(),
            });
        }
        if params.iter().any(|value| !value.is_finite()) {
            return Err(EncoderError::NonFiniteParameter { layer });
        }
    }
    if !artifact.eps.is_finite() {
        return Err(EncoderError::NonFiniteParameter { layer });
    }
    let inv_std = artifact
        .running_var
        .iter()
        .map(|var| {
            let divisor = var + artifact.eps;
            if divisor > 0.0 {
                Ok(1.0 / divisor.sqrt())
            } else {
                Err(EncoderError::NonPositiveVariance { layer })
            }
        })
        .collect::<Result<Vec<f32>, EncoderError>>()?;
    Ok(FrozenNorm {
        gamma: artifact.gamma,
        beta: artifact.beta,
        mean: artifact.running_mean,
        inv_std,
    })
}
