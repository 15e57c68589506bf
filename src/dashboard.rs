//! Per-selection views over a prepared table.
//!
//! A [`Dashboard`] owns the cleaned and derived table for the life of the
//! process. Every [`Dashboard::view`] call re-runs the filter and the
//! country-scoped aggregates; aggregates over the whole table do not depend on
//! the selection, so they are computed once and memoized.

use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::prep::schema::{CITY, COOKING_METHOD, COUNTRY, DISH_TYPE, PRICE};
use crate::prep::{
    self, ConfidenceLevel, CountRow, CountrySelection, FilterOutcome, IntervalRow, MeanRow,
    PrepSummary, PreparedTable, PricePoint, ValueGroup,
};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;
use std::sync::{Arc, Mutex};

type Cache<K, T> = Mutex<HashMap<K, Arc<Vec<T>>>>;

/// Memoized aggregates over the unfiltered table, one map per kind.
#[derive(Default)]
struct GlobalCache {
    /// Keyed by (key column, value column).
    means: Cache<(String, String), MeanRow>,
    counts: Cache<String, CountRow>,
    /// Keyed by (key column, value column, confidence level bits).
    intervals: Cache<(String, String, u64), IntervalRow>,
    values: Cache<(String, String), ValueGroup>,
}

impl GlobalCache {
    #[cfg(test)]
    fn len(&self) -> usize {
        fn entries<K, T>(cache: &Cache<K, T>) -> usize {
            cache.lock().map(|c| c.len()).unwrap_or(0)
        }
        entries(&self.means) + entries(&self.counts) + entries(&self.intervals) + entries(&self.values)
    }
}

/// Everything the presentation layer binds to for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub selection: CountrySelection,
    pub country_options: Vec<String>,
    /// Mean price over the whole table, whatever the selection.
    pub global_average_price: Option<f64>,
    pub global: GlobalPanels,
    pub selected: SelectionPanels,
}

/// Aggregates over the unfiltered table.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalPanels {
    pub price_by_country: Vec<MeanRow>,
    pub price_intervals_by_country: Vec<IntervalRow>,
    pub dishes_by_country: Vec<CountRow>,
    /// Price distribution per city, for the violin chart.
    pub price_by_region: Vec<ValueGroup>,
}

/// Aggregates over the selected rows.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectionPanels {
    Empty { message: String },
    Populated(FilteredPanels),
}

#[derive(Debug, Clone, Serialize)]
pub struct FilteredPanels {
    pub row_count: usize,
    pub price_by_city: Vec<MeanRow>,
    pub price_by_dish_type: Vec<MeanRow>,
    pub cooking_methods: Vec<CountRow>,
    pub price_points: Vec<PricePoint>,
}

pub struct Dashboard {
    table: PreparedTable,
    country_options: Vec<String>,
    level: ConfidenceLevel,
    cache: GlobalCache,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("rows", &self.table.df.height())
            .field("countries", &self.country_options.len())
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// # Errors
    ///
    /// Returns an error if the table has no `Country` column.
    pub fn new(table: PreparedTable, level: ConfidenceLevel) -> Result<Self> {
        let country_options = prep::country_options(&table.df)?;
        Ok(Self {
            table,
            country_options,
            level,
            cache: GlobalCache::default(),
        })
    }

    /// Loads and prepares `path` under `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or violates the schema.
    pub fn from_path(path: &Path, config: &PrepConfig) -> Result<Self> {
        let table = prep::load_and_prepare(path, &config.clean_options(), &config.derive_options())?;
        Self::new(table, config.confidence_level)
    }

    pub fn table(&self) -> &DataFrame {
        &self.table.df
    }

    pub fn summary(&self) -> PrepSummary {
        self.table.summary()
    }

    /// Valid selections other than `All`, sorted ascending.
    pub fn country_options(&self) -> &[String] {
        &self.country_options
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.level
    }

    /// Builds the view for `selection`.
    ///
    /// # Errors
    ///
    /// Returns an error if an aggregation fails.
    pub fn view(&self, selection: &CountrySelection) -> Result<DashboardView> {
        let selected = match prep::filter_by_country(&self.table.df, selection)? {
            FilterOutcome::Rows(df) => SelectionPanels::Populated(filtered_panels(&df)?),
            FilterOutcome::Empty { .. } => SelectionPanels::Empty {
                message: "No data available for the selected country.".to_owned(),
            },
        };

        Ok(DashboardView {
            selection: selection.clone(),
            country_options: self.country_options.clone(),
            global_average_price: prep::global_mean(&self.table.df, PRICE)?,
            global: GlobalPanels {
                price_by_country: self.global_means(COUNTRY, PRICE)?.as_ref().clone(),
                price_intervals_by_country: self.global_intervals(COUNTRY, PRICE)?.as_ref().clone(),
                dishes_by_country: self.global_counts(COUNTRY)?.as_ref().clone(),
                price_by_region: self.global_values(CITY, PRICE)?.as_ref().clone(),
            },
            selected,
        })
    }

    /// Memoized [`prep::mean_by_key`] over the whole table.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregation fails or the cache is poisoned.
    pub fn global_means(&self, key: &str, value: &str) -> Result<Arc<Vec<MeanRow>>> {
        memoized(&self.cache.means, (key.to_owned(), value.to_owned()), || {
            prep::mean_by_key(&self.table.df, key, value)
        })
    }

    /// Memoized [`prep::count_by_key`] over the whole table.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregation fails or the cache is poisoned.
    pub fn global_counts(&self, key: &str) -> Result<Arc<Vec<CountRow>>> {
        memoized(&self.cache.counts, key.to_owned(), || {
            prep::count_by_key(&self.table.df, key)
        })
    }

    /// Memoized [`prep::confidence_intervals_by_key`] over the whole table at
    /// the dashboard's confidence level.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregation fails or the cache is poisoned.
    pub fn global_intervals(&self, key: &str, value: &str) -> Result<Arc<Vec<IntervalRow>>> {
        let level = self.level;
        let cache_key = (key.to_owned(), value.to_owned(), level.to_bits());
        memoized(&self.cache.intervals, cache_key, || {
            prep::confidence_intervals_by_key(&self.table.df, key, value, level)
        })
    }

    /// Memoized [`prep::values_by_key`] over the whole table.
    ///
    /// # Errors
    ///
    /// Returns an error if the grouping fails or the cache is poisoned.
    pub fn global_values(&self, key: &str, value: &str) -> Result<Arc<Vec<ValueGroup>>> {
        memoized(&self.cache.values, (key.to_owned(), value.to_owned()), || {
            prep::values_by_key(&self.table.df, key, value)
        })
    }

    #[cfg(test)]
    fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

fn memoized<K, T, F>(cache: &Cache<K, T>, key: K, compute: F) -> Result<Arc<Vec<T>>>
where
    K: Hash + Eq + std::fmt::Debug,
    F: FnOnce() -> Result<Vec<T>>,
{
    let mut cache = cache.lock().map_err(|_poisoned| PrepError::CachePoisoned)?;
    if let Some(hit) = cache.get(&key) {
        tracing::debug!(?key, "Aggregate cache hit");
        return Ok(Arc::clone(hit));
    }
    let rows = Arc::new(compute()?);
    cache.insert(key, Arc::clone(&rows));
    Ok(rows)
}

fn filtered_panels(df: &DataFrame) -> Result<FilteredPanels> {
    Ok(FilteredPanels {
        row_count: df.height(),
        price_by_city: prep::mean_by_key(df, CITY, PRICE)?,
        price_by_dish_type: prep::mean_by_key(df, DISH_TYPE, PRICE)?,
        cooking_methods: prep::count_by_key(df, COOKING_METHOD)?,
        price_points: prep::price_points(df)?,
    })
}
