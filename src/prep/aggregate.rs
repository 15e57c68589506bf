//! Grouping and summarising of prepared tables.
//!
//! Every function here is pure and returns rows in a fixed order that does not
//! depend on the order of rows in the input, so repeated calls over the same
//! data always agree.

use super::schema::{self, COUNTRY, DISH_NAME, DISH_TYPE, INGREDIENT_COUNT, PRICE};
use super::stats::{self, ConfidenceLevel};
use super::types::{CountRow, DishType, IntervalRow, MeanRow, PricePoint, ValueGroup};
use crate::error::Result;
use polars::prelude::*;
use std::collections::BTreeMap;

const KEY: &str = "__key";
const COUNT: &str = "__count";

/// Mean of `value` per distinct `key`, highest mean first.
///
/// Ties on the mean are broken by ascending key. Each group is summed in
/// ascending value order, so the means are bit-identical however the input
/// rows are ordered.
///
/// # Errors
///
/// Returns an error if either column is missing or cannot be cast.
pub fn mean_by_key(df: &DataFrame, key: &str, value: &str) -> Result<Vec<MeanRow>> {
    let mut rows: Vec<MeanRow> = grouped_values(df, key, value)?
        .into_iter()
        .filter_map(|(key, values)| {
            Some(MeanRow {
                mean: stats::mean(&values)?,
                count: values.len(),
                key,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.key.cmp(&b.key)));
    Ok(rows)
}

/// Frequency of each distinct `key`, most frequent first.
///
/// Ties on the count are broken by ascending key.
///
/// # Errors
///
/// Returns an error if the column is missing or the query fails.
pub fn count_by_key(df: &DataFrame, key: &str) -> Result<Vec<CountRow>> {
    schema::require_columns(df, &[key])?;

    let out = df
        .clone()
        .lazy()
        .group_by([col(key).cast(DataType::String).alias(KEY)])
        .agg([len().cast(DataType::UInt64).alias(COUNT)])
        .sort_by_exprs(
            [col(COUNT), col(KEY)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    let keys = out.column(KEY)?.as_materialized_series();
    let counts = out.column(COUNT)?.as_materialized_series();

    Ok(keys
        .str()?
        .into_iter()
        .zip(counts.u64()?)
        .filter_map(|(key, count)| {
            Some(CountRow {
                key: key?.to_owned(),
                count: to_usize(count?),
            })
        })
        .collect())
}

/// Values of `value` grouped by `key`, keys ascending, values in table order.
///
/// Rows with a missing key or value are skipped.
///
/// # Errors
///
/// Returns an error if either column is missing or cannot be cast.
pub fn values_by_key(df: &DataFrame, key: &str, value: &str) -> Result<Vec<ValueGroup>> {
    Ok(grouped_values(df, key, value)?
        .into_iter()
        .map(|(key, values)| ValueGroup { key, values })
        .collect())
}

/// t-interval of the mean of `value` for each distinct `key`, keys ascending.
///
/// Dashboard views pass the unfiltered table here: intervals always describe
/// the whole dataset, whatever country is selected.
///
/// # Errors
///
/// Returns an error if either column is missing or cannot be cast.
pub fn confidence_intervals_by_key(
    df: &DataFrame,
    key: &str,
    value: &str,
    level: ConfidenceLevel,
) -> Result<Vec<IntervalRow>> {
    Ok(grouped_values(df, key, value)?
        .into_iter()
        .map(|(key, values)| {
            let ci = stats::confidence_interval(&values, level);
            IntervalRow {
                key,
                mean: ci.mean,
                lower: ci.lower,
                upper: ci.upper,
                sample_size: ci.sample_size,
            }
        })
        .collect())
}

/// Mean of `value` over the whole table; `None` when it has no values.
///
/// # Errors
///
/// Returns an error if the column is missing or not numeric.
pub fn global_mean(df: &DataFrame, value: &str) -> Result<Option<f64>> {
    schema::require_columns(df, &[value])?;
    let values = df.column(value)?.as_materialized_series().cast(&DataType::Float64)?;
    let values: Vec<f64> = values.f64()?.into_iter().flatten().collect();
    Ok(stats::mean(&values))
}

/// One point per dish for the price-distribution chart, in table order.
///
/// # Errors
///
/// Returns an error if the table has not been through derivation.
pub fn price_points(df: &DataFrame) -> Result<Vec<PricePoint>> {
    schema::require_columns(df, &[INGREDIENT_COUNT, PRICE, DISH_TYPE, DISH_NAME, COUNTRY])?;

    let counts = df.column(INGREDIENT_COUNT)?.as_materialized_series().cast(&DataType::UInt32)?;
    let prices = df.column(PRICE)?.as_materialized_series().cast(&DataType::Float64)?;
    let dish_types = df.column(DISH_TYPE)?.as_materialized_series().cast(&DataType::String)?;
    let names = df.column(DISH_NAME)?.as_materialized_series().cast(&DataType::String)?;
    let countries = df.column(COUNTRY)?.as_materialized_series().cast(&DataType::String)?;

    Ok(counts
        .u32()?
        .into_iter()
        .zip(prices.f64()?)
        .zip(dish_types.str()?)
        .zip(names.str()?)
        .zip(countries.str()?)
        .filter_map(|((((count, price), dish_type), name), country)| {
            let dish_type = match dish_type? {
                "Vegetarian" => DishType::Vegetarian,
                _ => DishType::NonVegetarian,
            };
            Some(PricePoint {
                ingredient_count: count?,
                price: price?,
                dish_type,
                dish_name: name?.to_owned(),
                country: country?.to_owned(),
            })
        })
        .collect())
}

fn grouped_values(df: &DataFrame, key: &str, value: &str) -> Result<BTreeMap<String, Vec<f64>>> {
    schema::require_columns(df, &[key, value])?;

    let keys = df.column(key)?.as_materialized_series().cast(&DataType::String)?;
    let values = df.column(value)?.as_materialized_series().cast(&DataType::Float64)?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (k, v) in keys.str()?.into_iter().zip(values.f64()?) {
        if let (Some(k), Some(v)) = (k, v) {
            groups.entry(k.to_owned()).or_default().push(v);
        }
    }
    Ok(groups)
}

fn to_usize(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}
