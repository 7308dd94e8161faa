//! Fitted per-column affine feature scaling.
//!
//! The preprocessing pipeline fits one offset/scale pair per numeric column
//! and the service replays that exact transform at request time. The scaler
//! also owns the column ordering contract: inputs are reordered to the
//! fitted column order, missing columns are filled with `0.0`, and extra
//! columns are dropped.

use std::collections::HashMap;

use log::warn;
use thiserror::Error;

/// Errors raised when scaler parameters or outputs are unusable.
#[derive(Debug, Error, PartialEq)]
pub enum ScalerError {
    /// Parameter vectors disagreed in length.
    #[error("scaler declares {columns} columns but {offsets} offsets and {scales} scales")]
    LengthMismatch {
        /// Declared column count.
        columns: usize,
        /// Offset count.
        offsets: usize,
        /// Scale count.
        scales: usize,
    },
    /// A fitted parameter was not finite.
    #[error("scaler parameter for column '{column}' is not finite")]
    NonFiniteParameter {
        /// Offending column name.
        column: String,
    },
    /// A fitted scale was zero, which would divide by zero at transform time.
    #[error("scaler scale for column '{column}' is zero")]
    ZeroScale {
        /// Offending column name.
        column: String,
    },
    /// A transformed value came out non-finite.
    #[error("scaled value for column '{column}' is not finite")]
    NonFiniteOutput {
        /// Offending column name.
        column: String,
    },
}

/// Per-column affine transform fitted during preprocessing.
///
/// Transforms compute `(value - offset) / scale` for each fitted column.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedScaler {
    columns: Vec<String>,
    offsets: Vec<f64>,
    scales: Vec<f64>,
}

impl FittedScaler {
    /// Validate and construct a scaler.
    ///
    /// # Errors
    /// Returns [`ScalerError`] when parameter lengths disagree, a parameter
    /// is non-finite, or a scale is zero.
    pub fn new(
        columns: Vec<String>,
        offsets: Vec<f64>,
        scales: Vec<f64>,
    ) -> Result<Self, ScalerError> {
        if columns.len() != offsets.len() || columns.len() != scales.len() {
            return Err(ScalerError::LengthMismatch {
                columns: columns.len(),
                offsets: offsets.len(),
                scales: scales.len(),
            });
        }
        for ((column, offset), scale) in columns.iter().zip(&offsets).zip(&scales) {
            if !offset.is_finite() || !scale.is_finite() {
                return Err(ScalerError::NonFiniteParameter {
                    column: column.clone(),
                });
            }
            if *scale == 0.0 {
                return Err(ScalerError::ZeroScale {
                    column: column.clone(),
                });
            }
        }
        Ok(Self {
            columns,
            offsets,
            scales,
        })
    }

    /// Columns the scaler was fitted on, in fitted order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Apply the fitted transform to a named value set.
    ///
    /// Values for columns the scaler does not know are dropped with a
    /// warning; fitted columns absent from the input are filled with `0.0`
    /// before scaling; non-finite inputs are coerced to `0.0`.
    ///
    /// # Errors
    /// Returns [`ScalerError::NonFiniteOutput`] when a transformed value is
    /// not finite. Callers treat this as a degraded-path signal, not a
    /// request failure.
    pub fn transform(
        &self,
        values: &HashMap<String, f64>,
    ) -> Result<HashMap<String, f64>, ScalerError> {
        for column in values.keys() {
            if !self.columns.contains(column) {
                warn!("dropping column '{column}' the scaler was not fitted on");
            }
        }
        let mut scaled = HashMap::with_capacity(self.columns.len());
        for ((column, offset), scale) in self.columns.iter().zip(&self.offsets).zip(&self.scales) {
            let raw = values.get(column).copied().unwrap_or(0.0);
            let raw = if raw.is_finite() { raw } else { 0.0 };
            let value = (raw - offset) / scale;
            if !value.is_finite() {
                return Err(ScalerError::NonFiniteOutput {
                    column: column.clone(),
                });
            }
            scaled.insert(column.clone(), value);
        }
        Ok(scaled)
    }
}
