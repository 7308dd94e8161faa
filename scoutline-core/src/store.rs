//! Read-only pairing of the scaled feature table and the reference table.

use log::warn;
use thiserror::Error;

use crate::{FeatureTable, PlayerId, ReferenceTable, columns};

/// Errors raised when the two tables cannot be paired.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The tables held different numbers of rows.
    #[error("feature table has {features} rows but reference table has {reference}")]
    RowCountMismatch {
        /// Feature-table row count.
        features: usize,
        /// Reference-table row count.
        reference: usize,
    },
    /// The tables disagreed on a row's identifier.
    #[error("row {row} is '{feature_id}' in the feature table but '{reference_id}' in the reference table")]
    IdMismatch {
        /// Zero-based row index.
        row: usize,
        /// Identifier from the feature table.
        feature_id: PlayerId,
        /// Identifier from the reference table.
        reference_id: PlayerId,
    },
}

/// Immutable view over the row-aligned feature and reference tables.
///
/// Row indices are shared between both tables and the embedding matrix; the
/// constructor enforces the alignment so downstream code can rely on it.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    features: FeatureTable,
    reference: ReferenceTable,
}

impl FeatureStore {
    /// Pair the tables, verifying they describe the same players in the
    /// same order.
    ///
    /// # Errors
    /// Returns [`StoreError`] on any row-count or identifier disagreement.
    pub fn new(features: FeatureTable, reference: ReferenceTable) -> Result<Self, StoreError> {
        if features.len() != reference.len() {
            return Err(StoreError::RowCountMismatch {
                features: features.len(),
                reference: reference.len(),
            });
        }
        for (row, (feature_id, reference_id)) in
            features.ids().iter().zip(reference.ids().iter()).enumerate()
        {
            if feature_id != reference_id {
                return Err(StoreError::IdMismatch {
                    row,
                    feature_id: feature_id.clone(),
                    reference_id: reference_id.clone(),
                });
            }
        }
        Ok(Self {
            features,
            reference,
        })
    }

    /// Number of player rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The scaled feature table.
    #[must_use]
    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    /// The original-scale reference table.
    #[must_use]
    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    /// Identifier for a row.
    #[must_use]
    pub fn player_id(&self, row: usize) -> Option<&str> {
        self.features.ids().get(row).map(String::as_str)
    }

    /// True when the reference table carries the columns a shortlist
    /// request filters and groups by.
    #[must_use]
    pub fn has_request_context(&self) -> bool {
        self.reference.has_numeric_column(columns::AGE_ORIG)
            && self.reference.has_text_column(columns::GENDER)
            && self.reference.has_text_column(columns::POSITION_GROUP)
    }

    /// Select rows whose age equals `target_age` and whose gender equals
    /// `gender`, in population order.
    ///
    /// Rows with a missing age never match; missing gender compares as the
    /// literal `"Unknown"`. When the required columns are absent this logs a
    /// data-availability warning and returns an empty selection rather than
    /// failing; the loader guarantees the columns exist for a healthy
    /// deployment.
    #[must_use]
    pub fn filter_by_age_gender(&self, target_age: f64, gender: &str) -> Vec<usize> {
        if !self.reference.has_numeric_column(columns::AGE_ORIG)
            || !self.reference.has_text_column(columns::GENDER)
        {
            warn!(
                "age/gender filter skipped: reference table lacks '{}' or '{}'",
                columns::AGE_ORIG,
                columns::GENDER
            );
            return Vec::new();
        }
        (0..self.len())
            .filter(|&row| {
                // Ages are whole-valued in the reference data, so exact
                // comparison mirrors the original filter.
                self.reference.age(row) == Some(target_age)
                    && self.reference.gender(row) == gender
            })
            .collect()
    }
}
