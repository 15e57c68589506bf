use super::schema::{self, DESCRIPTION, DISH_TYPE, INGREDIENT_COUNT, INGREDIENTS, IngredientSource, VEGETARIAN};
use super::types::{DefectReport, IngredientCountMode, VegetarianFlag, VegetarianPolicy};
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveOptions {
    pub ingredient_count_mode: IngredientCountMode,
    pub vegetarian_policy: VegetarianPolicy,
}

#[derive(Debug, Clone)]
pub struct DerivedTable {
    pub df: DataFrame,
    pub defects: DefectReport,
}

/// Appends `IngredientCount` and `DishType` to a cleaned table.
///
/// `IngredientCount` comes from `Ingredients` when the column exists and from
/// the word count of `Description` otherwise. Rows whose `Vegetarian` flag is
/// neither 0 nor 1 are counted in the defect report; the policy decides
/// whether they stay (as Non-Vegetarian) or go.
///
/// # Errors
///
/// Returns an error if `Vegetarian` is missing or neither ingredient source is
/// present.
pub fn derive_columns(df: &DataFrame, options: &DeriveOptions) -> Result<DerivedTable> {
    schema::require_columns(df, &[VEGETARIAN])?;
    let source = if schema::has_column(df, INGREDIENTS) {
        IngredientSource::Ingredients
    } else {
        schema::require_columns(df, &[DESCRIPTION])?;
        IngredientSource::Description
    };

    let mut out = df.clone();
    out.with_column(ingredient_counts(df, source, options.ingredient_count_mode)?)?;

    let flags = vegetarian_flags(df)?;
    let dish_types: Vec<&str> = flags.iter().map(|flag| flag.dish_type().as_str()).collect();
    out.with_column(Series::new(DISH_TYPE.into(), dish_types))?;

    let invalid = flags.iter().filter(|flag| **flag == VegetarianFlag::Invalid).count();
    let mut defects = DefectReport {
        invalid_vegetarian_flags: invalid,
        rows_removed: 0,
    };

    if invalid > 0 {
        tracing::warn!(
            invalid,
            policy = ?options.vegetarian_policy,
            "Vegetarian flag outside {{0, 1}}"
        );
        if options.vegetarian_policy == VegetarianPolicy::Strict {
            let keep: Vec<bool> = flags.iter().map(|flag| *flag != VegetarianFlag::Invalid).collect();
            let keep = Series::new("keep".into(), keep);
            out = out.filter(keep.bool()?)?;
            defects.rows_removed = invalid;
        }
    }

    Ok(DerivedTable { df: out, defects })
}

/// Counts ingredients per row under `mode`.
///
/// # Errors
///
/// Returns an error if the source column is missing.
pub fn ingredient_counts(
    df: &DataFrame,
    source: IngredientSource,
    mode: IngredientCountMode,
) -> Result<Series> {
    let name = match source {
        IngredientSource::Ingredients => INGREDIENTS,
        IngredientSource::Description => DESCRIPTION,
    };
    let count = |text: &str| match (source, mode) {
        (IngredientSource::Ingredients, IngredientCountMode::NaiveSplit) => comma_segments(text),
        (IngredientSource::Ingredients, IngredientCountMode::NonEmptySegments) => {
            non_blank_comma_segments(text)
        }
        (IngredientSource::Description, _) => words(text),
    };

    let text = df.column(name)?.as_materialized_series().cast(&DataType::String)?;
    let counts: Vec<Option<u32>> = text
        .str()?
        .into_iter()
        .map(|cell| cell.map(|s| u32::try_from(count(s)).unwrap_or(u32::MAX)))
        .collect();

    Ok(Series::new(INGREDIENT_COUNT.into(), counts))
}

/// `"a,b,"` has three segments and `""` has one.
fn comma_segments(text: &str) -> usize {
    text.split(',').count()
}

fn non_blank_comma_segments(text: &str) -> usize {
    text.split(',').filter(|seg| !seg.trim().is_empty()).count()
}

fn words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn vegetarian_flags(df: &DataFrame) -> Result<Vec<VegetarianFlag>> {
    let raw = df.column(VEGETARIAN)?.as_materialized_series().cast(&DataType::String)?;
    Ok(raw
        .str()?
        .into_iter()
        .map(|cell| cell.map_or(VegetarianFlag::Invalid, VegetarianFlag::parse))
        .collect())
}
