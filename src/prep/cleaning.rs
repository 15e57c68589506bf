use super::schema::{self, COUNTRY, PRICE};
use super::types::CleanReport;
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// A literal substring substitution applied to every `Country` cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryFix {
    pub find: String,
    pub replace: String,
}

impl CountryFix {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    pub country_fixes: Vec<CountryFix>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            country_fixes: vec![CountryFix::new("Leba0n", "Lebanon")],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub df: DataFrame,
    pub report: CleanReport,
}

/// Repairs a raw source table.
///
/// Steps, in order: trim column names, check the schema, apply country fixes,
/// coerce prices to `Float64` (unparseable cells become null), then drop
/// every row holding a null. Bad cells never fail the call.
///
/// # Errors
///
/// Returns [`crate::error::PrepError::MissingColumns`] when the trimmed
/// header lacks a required column, or a processing error if two headers trim
/// to the same name.
pub fn clean_df(df: DataFrame, options: &CleanOptions) -> Result<CleanedTable> {
    let mut df = trim_column_names(&df)?;
    schema::validate_source_schema(&df)?;

    let rows_in = df.height();
    let country_fixes = fix_countries(&mut df, &options.country_fixes)?;
    let unparseable_prices = coerce_prices(&mut df)?;

    let df = drop_incomplete_rows(&df)?;
    let rows_out = df.height();

    let report = CleanReport {
        rows_in,
        rows_out,
        unparseable_prices,
        rows_with_missing_values: rows_in - rows_out,
        country_fixes,
    };

    if report.rows_with_missing_values > 0 {
        tracing::warn!(
            dropped = report.rows_with_missing_values,
            unparseable_prices,
            "Dropped incomplete rows"
        );
    }
    tracing::info!(rows_in, rows_out, country_fixes, "Cleaned source table");

    Ok(CleanedTable { df, report })
}

/// Strips surrounding whitespace from every column name.
///
/// # Errors
///
/// Returns an error if two names collide after trimming.
pub fn trim_column_names(df: &DataFrame) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|c| {
            let mut c = c.clone();
            let trimmed = c.name().trim().to_owned();
            c.rename(trimmed.into());
            c
        })
        .collect::<Vec<_>>();
    Ok(DataFrame::new(columns)?)
}

/// Rewrites `Country` cells in place, returning how many cells changed.
fn fix_countries(df: &mut DataFrame, fixes: &[CountryFix]) -> Result<usize> {
    let countries = df.column(COUNTRY)?.as_materialized_series().cast(&DataType::String)?;
    let countries = countries.str()?;

    let mut changed = 0;
    let fixed: Vec<Option<String>> = countries
        .into_iter()
        .map(|cell| {
            cell.map(|value| {
                let rewritten = fixes
                    .iter()
                    .filter(|fix| !fix.find.is_empty())
                    .fold(value.to_owned(), |acc, fix| acc.replace(&fix.find, &fix.replace));
                if rewritten != value {
                    changed += 1;
                }
                rewritten
            })
        })
        .collect();

    df.with_column(Series::new(COUNTRY.into(), fixed))?;
    Ok(changed)
}

/// Replaces the price column with its `Float64` coercion, returning the
/// number of non-empty cells that failed to parse.
fn coerce_prices(df: &mut DataFrame) -> Result<usize> {
    let raw = df.column(PRICE)?.as_materialized_series().cast(&DataType::String)?;
    let raw = raw.str()?;

    let mut unparseable = 0;
    let prices: Vec<Option<f64>> = raw
        .into_iter()
        .map(|cell| {
            let cell = cell?;
            let parsed = parse_price(cell);
            if parsed.is_none() {
                unparseable += 1;
            }
            parsed
        })
        .collect();

    df.with_column(Series::new(PRICE.into(), prices))?;
    Ok(unparseable)
}

/// Keeps only the rows with a value in every column.
fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame> {
    let mut keep = BooleanChunked::full("keep".into(), true, df.height());
    for column in df.get_columns() {
        keep = &keep & &column.as_materialized_series().is_not_null();
    }
    Ok(df.filter(&keep)?)
}

/// Lenient numeric parse: surrounding whitespace is ignored and NaN counts as
/// missing.
pub fn parse_price(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
