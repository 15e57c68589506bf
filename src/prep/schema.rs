//! Column names of the street-food source table and the precondition check
//! that guards every pipeline entry point.

use crate::error::{PrepError, Result};
use polars::prelude::*;

pub const COUNTRY: &str = "Country";
pub const CITY: &str = "Region/City";
pub const DISH_NAME: &str = "DishName";
pub const DESCRIPTION: &str = "Description";
pub const INGREDIENTS: &str = "Ingredients";
pub const PRICE: &str = "TypicalPrice(USD)";
pub const VEGETARIAN: &str = "Vegetarian";
pub const COOKING_METHOD: &str = "CookingMethod";

pub const INGREDIENT_COUNT: &str = "IngredientCount";
pub const DISH_TYPE: &str = "DishType";

/// Columns every source must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [COUNTRY, CITY, DISH_NAME, PRICE, VEGETARIAN, COOKING_METHOD];

/// Where the ingredient count of a dish is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientSource {
    /// Comma-separated `Ingredients` column.
    Ingredients,
    /// Whitespace-separated words of `Description`.
    Description,
}

/// Returns `true` if `df` has a column called `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Fails with [`PrepError::MissingColumns`] naming every column of `names`
/// that `df` lacks.
///
/// # Errors
///
/// Returns an error if any of `names` is absent.
pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    let missing: Vec<String> = names
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| (*name).to_owned())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PrepError::MissingColumns(missing))
    }
}

/// Checks the full source schema and reports which column feeds
/// `IngredientCount`.
///
/// `Ingredients` wins when both it and `Description` are present.
///
/// # Errors
///
/// Returns [`PrepError::MissingColumns`] listing every absent required column,
/// plus both `Ingredients` and `Description` when neither is present.
pub fn validate_source_schema(df: &DataFrame) -> Result<IngredientSource> {
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| (*name).to_owned())
        .collect();

    let source = if has_column(df, INGREDIENTS) {
        Some(IngredientSource::Ingredients)
    } else if has_column(df, DESCRIPTION) {
        Some(IngredientSource::Description)
    } else {
        missing.push(INGREDIENTS.to_owned());
        missing.push(DESCRIPTION.to_owned());
        None
    };

    match source {
        Some(source) if missing.is_empty() => Ok(source),
        _ => Err(PrepError::MissingColumns(missing)),
    }
}
