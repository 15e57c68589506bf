//! Load, clean, derive, filter and aggregate street-food price records.
//!
//! ```text
//! load_df ──> clean_df ──> derive_columns ──┬──> filter_by_country
//!                                          └──> mean_by_key / count_by_key /
//!                                               confidence_intervals_by_key
//! ```
//!
//! Data flows one way. Each stage takes a `DataFrame` by reference or value
//! and hands back a new one; nothing writes back into an earlier stage.

pub mod aggregate;
pub mod cleaning;
pub mod derive;
pub mod filter;
pub mod io;
pub mod schema;
pub mod stats;
pub mod types;

pub use aggregate::{
    confidence_intervals_by_key, count_by_key, global_mean, mean_by_key, price_points,
    values_by_key,
};
pub use cleaning::{CleanOptions, CleanedTable, CountryFix, clean_df};
pub use derive::{DeriveOptions, DerivedTable, derive_columns};
pub use filter::{CountrySelection, FilterOutcome, country_options, filter_by_country};
pub use io::{load_df, save_df};
pub use stats::{ConfidenceInterval, ConfidenceLevel, confidence_interval};
pub use types::{
    CleanReport, CountRow, DefectReport, DishType, IngredientCountMode, IntervalRow, MeanRow,
    PricePoint, ValueGroup, VegetarianFlag, VegetarianPolicy,
};

use crate::error::Result;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::Path;

/// A cleaned and derived table plus the accounting of how it got there.
#[derive(Debug, Clone)]
pub struct PreparedTable {
    pub df: DataFrame,
    pub clean_report: CleanReport,
    pub defects: DefectReport,
}

/// Row accounting of a full preparation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepSummary {
    pub clean: CleanReport,
    pub defects: DefectReport,
}

impl PreparedTable {
    pub fn summary(&self) -> PrepSummary {
        PrepSummary {
            clean: self.clean_report.clone(),
            defects: self.defects.clone(),
        }
    }
}

/// Runs the cleaner and the derivation engine over a raw table.
///
/// # Errors
///
/// Returns [`crate::error::PrepError::MissingColumns`] on a schema violation,
/// or a processing error if a stage fails.
pub fn prepare(raw: DataFrame, clean: &CleanOptions, derive: &DeriveOptions) -> Result<PreparedTable> {
    let CleanedTable { df, report } = clean_df(raw, clean)?;
    let DerivedTable { df, defects } = derive_columns(&df, derive)?;
    Ok(PreparedTable {
        df,
        clean_report: report,
        defects,
    })
}

/// Loads `path` and prepares it.
///
/// # Errors
///
/// Returns an error if loading or any preparation stage fails.
pub fn load_and_prepare(
    path: &Path,
    clean: &CleanOptions,
    derive: &DeriveOptions,
) -> Result<PreparedTable> {
    let raw = load_df(path)?;
    prepare(raw, clean, derive)
}
