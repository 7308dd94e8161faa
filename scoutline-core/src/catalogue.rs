//! Static classification of feature columns.
//!
//! The original service inspected feature names with substring checks on
//! every request. The catalogue performs that classification exactly once,
//! when the service context is assembled, and answers lookups from a fixed
//! table thereafter. Behaviour is unchanged; the classification is merely
//! testable in isolation.

use std::collections::HashMap;

use crate::FeatureSchema;

/// Name fragments marking features whose archetype target is a percentile of
/// the context distribution rather than the median.
const PERCENTILE_MARKERS: [&str; 6] = [
    "_trend_",
    "recent_P",
    "recent_save",
    "game_freshness",
    "season_pointsPerGame",
    "season_svp",
];

/// Marker for inverse metrics where lower raw values are better.
const INVERSE_MARKER: &str = "GAA";

const GAA_TREND_MARKER: &str = "adj_GAA_trend";
const SVP_TREND_MARKER: &str = "adj_SVP_trend";
const POINTS_TREND_MARKER: &str = "adj_P_per_GP_trend";
const GOALS_TREND_MARKER: &str = "adj_G_per_GP_trend";

/// How the archetype synthesiser derives a feature's target value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureClass {
    /// Take the requested percentile of the context distribution.
    Percentile,
    /// Take `1 - percentile`; lower raw values are better.
    InversePercentile,
    /// Use the midpoint of the requested age window.
    AgeMidpoint,
    /// Use the median of the context distribution.
    Median,
}

/// Fixed feature classification built once from the schema.
#[derive(Debug, Clone)]
pub struct FeatureCatalogue {
    classes: HashMap<String, FeatureClass>,
    gaa_trend_columns: Vec<String>,
    svp_trend_columns: Vec<String>,
    points_trend_columns: Vec<String>,
    goals_trend_columns: Vec<String>,
}

impl FeatureCatalogue {
    /// Classify every scaled numeric column and collect the trend column
    /// groups the scoring engine reads.
    #[must_use]
    pub fn from_schema(schema: &FeatureSchema) -> Self {
        let classes = schema
            .scaled_numeric_columns
            .iter()
            .map(|col| (col.clone(), classify(col)))
            .collect();
        Self {
            classes,
            gaa_trend_columns: columns_containing(schema, GAA_TREND_MARKER),
            svp_trend_columns: columns_containing(schema, SVP_TREND_MARKER),
            points_trend_columns: columns_containing(schema, POINTS_TREND_MARKER),
            goals_trend_columns: columns_containing(schema, GOALS_TREND_MARKER),
        }
    }

    /// Return the classification for a scaled numeric column.
    ///
    /// Columns absent from the schema classify as [`FeatureClass::Median`],
    /// matching the original's default branch.
    #[must_use]
    pub fn class_of(&self, column: &str) -> FeatureClass {
        self.classes
            .get(column)
            .copied()
            .unwrap_or(FeatureClass::Median)
    }

    /// Goals-against-average trend columns (goaltenders, inverted).
    #[must_use]
    pub fn gaa_trend_columns(&self) -> &[String] {
        &self.gaa_trend_columns
    }

    /// Save-percentage trend columns (goaltenders).
    #[must_use]
    pub fn svp_trend_columns(&self) -> &[String] {
        &self.svp_trend_columns
    }

    /// Points-per-game trend columns (skaters).
    #[must_use]
    pub fn points_trend_columns(&self) -> &[String] {
        &self.points_trend_columns
    }

    /// Goals-per-game trend columns (skaters).
    #[must_use]
    pub fn goals_trend_columns(&self) -> &[String] {
        &self.goals_trend_columns
    }
}

fn classify(column: &str) -> FeatureClass {
    if PERCENTILE_MARKERS
        .iter()
        .any(|marker| column.contains(marker))
    {
        if column.contains(INVERSE_MARKER) {
            FeatureClass::InversePercentile
        } else {
            FeatureClass::Percentile
        }
    } else if column == crate::columns::AGE {
        FeatureClass::AgeMidpoint
    } else {
        FeatureClass::Median
    }
}

fn columns_containing(schema: &FeatureSchema, marker: &str) -> Vec<String> {
    schema
        .feature_columns
        .iter()
        .filter(|col| col.contains(marker))
        .cloned()
        .collect()
}
