//! Synthesis of archetype input vectors.
//!
//! An archetype is a synthetic "strong player" for one position group and
//! age window. Each scaled numeric feature gets a target drawn from the
//! original-scale reference distribution of a context population, the
//! targets pass through the fitted scaler, and the position and gender
//! one-hot indicators are written last. The context narrows from the exact
//! segment to the gender-filtered population, and finally to a neutral
//! `0.5` fill; synthesis itself never fails.

use std::collections::HashMap;

use log::{debug, error, info, warn};
use scoutline_core::{
    FeatureCatalogue, FeatureClass, FeatureSchema, FittedScaler, PositionGroup, ReferenceTable,
    TARGET_GENDER, columns,
};

use crate::stats;

/// Parameters for synthesising one archetype vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeRequest {
    /// Position group the archetype represents.
    pub position: PositionGroup,
    /// Inclusive lower bound of the context age window.
    pub age_min: f64,
    /// Inclusive upper bound of the context age window.
    pub age_max: f64,
    /// Percentile targeted for percentile-classed features.
    pub percentile: f64,
}

impl ArchetypeRequest {
    /// Midpoint of the age window, used for the scaled age feature.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the age target is the arithmetic midpoint of the window"
    )]
    pub fn age_midpoint(&self) -> f64 {
        (self.age_min + self.age_max) / 2.0
    }
}

/// Build the scaled archetype input vector for the encoder.
///
/// The returned vector is ordered by `schema.feature_columns` and is always
/// that exact length. Degraded data narrows the context or substitutes
/// neutral values; every fallback is logged.
#[must_use]
pub fn synthesise_archetype(
    request: &ArchetypeRequest,
    schema: &FeatureSchema,
    catalogue: &FeatureCatalogue,
    scaler: &FittedScaler,
    reference: &ReferenceTable,
) -> Vec<f32> {
    let width = schema.feature_columns.len();
    let context = select_context(request, reference);
    if context.is_empty() {
        error!(
            "archetype context empty even after fallback for position {}; using 0.5 fill",
            request.position
        );
        return vec![0.5; width];
    }
    info!(
        "archetype context for position {} age {}..={}: {} players",
        request.position,
        request.age_min,
        request.age_max,
        context.len()
    );

    let numeric = schema.numeric_feature_columns();
    let mut originals = HashMap::with_capacity(numeric.len());
    for column in &numeric {
        let target = resolve_target(column, request, catalogue, reference, &context);
        originals.insert((*column).to_owned(), target);
    }

    let scaled = match scaler.transform(&originals) {
        Ok(scaled) => scaled,
        Err(err) => {
            error!(
                "failed to scale archetype targets for position {}: {err}; using 0.5 defaults",
                request.position
            );
            numeric
                .iter()
                .map(|column| ((*column).to_owned(), 0.5))
                .collect()
        }
    };

    let mut vector = assemble(schema, &scaled);
    write_position_indicator(&mut vector, schema, request.position);
    write_gender_indicators(&mut vector, schema);
    scrub_non_finite(&mut vector, request.position);
    vector
}

/// Rows forming the statistical context for target derivation.
fn select_context(request: &ArchetypeRequest, reference: &ReferenceTable) -> Vec<usize> {
    let segmentable = reference.has_text_column(columns::POSITION_GROUP)
        && reference.has_numeric_column(columns::AGE_ORIG)
        && reference.has_text_column(columns::GENDER);
    if !segmentable {
        error!(
            "reference table lacks position/age/gender context columns; using gender-filtered population"
        );
        return gender_rows(reference);
    }
    let segment = segment_rows(request, reference);
    if segment.is_empty() {
        warn!(
            "no context players for position {} age {}..={} gender '{TARGET_GENDER}'; falling back to gender-filtered population",
            request.position, request.age_min, request.age_max
        );
        return gender_rows(reference);
    }
    segment
}

fn segment_rows(request: &ArchetypeRequest, reference: &ReferenceTable) -> Vec<usize> {
    (0..reference.len())
        .filter(|&row| {
            reference.position_group(row) == request.position
                && reference
                    .age(row)
                    .is_some_and(|age| age >= request.age_min && age <= request.age_max)
                && reference.gender(row) == TARGET_GENDER
        })
        .collect()
}

fn gender_rows(reference: &ReferenceTable) -> Vec<usize> {
    if reference.has_text_column(columns::GENDER) {
        (0..reference.len())
            .filter(|&row| reference.gender(row) == TARGET_GENDER)
            .collect()
    } else {
        warn!("gender column missing; archetype context cannot be gender-filtered");
        (0..reference.len()).collect()
    }
}

/// Name of the original-scale source column for a scaled feature, when the
/// reference table carries one.
fn original_column(column: &str, reference: &ReferenceTable) -> Option<String> {
    let mirrored = format!("{column}{}", columns::ORIG_SUFFIX);
    if reference.has_numeric_column(&mirrored) {
        Some(mirrored)
    } else if reference.has_numeric_column(column) {
        Some(column.to_owned())
    } else {
        debug!("no original-scale source for scaled column '{column}'");
        None
    }
}

fn column_values(reference: &ReferenceTable, rows: &[usize], column: &str) -> Vec<f64> {
    rows.iter()
        .filter_map(|&row| reference.numeric_value(row, column))
        .filter(|value| value.is_finite())
        .collect()
}

/// Original-scale target for one scaled numeric feature.
///
/// An empty context sample falls back to the full reference population; a
/// still-empty sample yields `0.0`.
#[expect(
    clippy::float_arithmetic,
    reason = "inverse percentiles flip the requested fraction"
)]
fn resolve_target(
    column: &str,
    request: &ArchetypeRequest,
    catalogue: &FeatureCatalogue,
    reference: &ReferenceTable,
    context: &[usize],
) -> f64 {
    let Some(source) = original_column(column, reference) else {
        warn!("cannot find valid data for archetype column '{column}'; using 0");
        return 0.0;
    };
    let mut values = column_values(reference, context, &source);
    if values.is_empty() {
        debug!("falling back to global reference for archetype column '{column}'");
        let all_rows: Vec<usize> = (0..reference.len()).collect();
        values = column_values(reference, &all_rows, &source);
    }
    if values.is_empty() {
        warn!("cannot find valid data for archetype column '{column}'; using 0");
        return 0.0;
    }
    let target = match catalogue.class_of(column) {
        FeatureClass::Percentile => stats::quantile(&values, request.percentile),
        FeatureClass::InversePercentile => stats::quantile(&values, 1.0 - request.percentile),
        FeatureClass::AgeMidpoint => Some(request.age_midpoint()),
        FeatureClass::Median => stats::median(&values),
    };
    match target {
        Some(value) if value.is_finite() => value,
        _ => {
            warn!("target value for archetype column '{column}' is not finite; using 0");
            0.0
        }
    }
}

/// Lay scaled targets into a full-width vector; non-numeric columns start
/// at `0.0`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "scaled targets are bounded and fit f32 without meaningful loss"
)]
fn assemble(schema: &FeatureSchema, scaled: &HashMap<String, f64>) -> Vec<f32> {
    schema
        .feature_columns
        .iter()
        .map(|column| scaled.get(column).copied().unwrap_or(0.0) as f32)
        .collect()
}

fn set_column(vector: &mut [f32], schema: &FeatureSchema, column: &str, value: f32) {
    if let Some(position) = schema.feature_columns.iter().position(|c| c == column)
        && let Some(slot) = vector.get_mut(position)
    {
        *slot = value;
    }
}

fn write_position_indicator(vector: &mut [f32], schema: &FeatureSchema, position: PositionGroup) {
    let indicator = position.indicator_column();
    let present = schema.feature_columns.iter().any(|c| c == indicator);
    let chosen = if present {
        indicator
    } else {
        warn!("position column '{indicator}' not found; marking the archetype as unknown");
        PositionGroup::Unknown.indicator_column()
    };
    for column in schema
        .feature_columns
        .iter()
        .filter(|c| c.starts_with(columns::POSITION_PREFIX))
        .cloned()
        .collect::<Vec<_>>()
    {
        let value = if column == chosen { 1.0 } else { 0.0 };
        set_column(vector, schema, &column, value);
    }
}

fn write_gender_indicators(vector: &mut [f32], schema: &FeatureSchema) {
    for column in schema
        .feature_columns
        .iter()
        .filter(|c| c.starts_with(columns::GENDER_PREFIX))
        .cloned()
        .collect::<Vec<_>>()
    {
        let value = if column == columns::GENDER_MEN { 1.0 } else { 0.0 };
        set_column(vector, schema, &column, value);
    }
}

fn scrub_non_finite(vector: &mut [f32], position: PositionGroup) {
    let mut scrubbed = false;
    for value in vector.iter_mut() {
        if !value.is_finite() {
            *value = 0.0;
            scrubbed = true;
        }
    }
    if scrubbed {
        warn!("non-finite values in final archetype vector for position {position}; filled with 0");
    }
}
