//! Feature metadata describing the ML-ready table layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata emitted by the preprocessing pipeline alongside the tables.
///
/// `feature_columns` is the full, ordered input schema of the encoder;
/// `scaled_numeric_columns` is the subset that passed through the fitted
/// scaler (the remainder are one-hot indicators); `player_id_column` names
/// the identifier column both tables are keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Ordered encoder input columns.
    pub feature_columns: Vec<String>,
    /// Subset of `feature_columns` holding scaled numeric features.
    pub scaled_numeric_columns: Vec<String>,
    /// Identifier column shared by the feature and reference tables.
    pub player_id_column: String,
}

/// Errors raised when feature metadata is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The metadata declared no feature columns.
    #[error("feature metadata must declare at least one feature column")]
    NoFeatureColumns,
    /// The identifier column name was empty.
    #[error("feature metadata must name the player identifier column")]
    MissingIdColumn,
}

impl FeatureSchema {
    /// Check the invariants the engine relies on.
    ///
    /// Deserialised metadata must be validated before use; the loader treats
    /// any failure here as fatal.
    ///
    /// # Errors
    /// Returns [`SchemaError`] when no feature columns are declared or the
    /// identifier column name is empty.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.feature_columns.is_empty() {
            return Err(SchemaError::NoFeatureColumns);
        }
        if self.player_id_column.trim().is_empty() {
            return Err(SchemaError::MissingIdColumn);
        }
        Ok(())
    }

    /// Scaled numeric columns that are part of the encoder input schema, in
    /// scaled-column order.
    #[must_use]
    pub fn numeric_feature_columns(&self) -> Vec<&str> {
        self.scaled_numeric_columns
            .iter()
            .filter(|col| self.feature_columns.contains(col))
            .map(String::as_str)
            .collect()
    }
}
