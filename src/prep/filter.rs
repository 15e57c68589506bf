use super::schema::{self, COUNTRY};
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel that selects every country.
pub const ALL: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CountrySelection {
    #[default]
    All,
    Country(String),
}

impl CountrySelection {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Country(c) => c,
        }
    }
}

impl From<String> for CountrySelection {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Country(value)
        }
    }
}

impl From<&str> for CountrySelection {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<CountrySelection> for String {
    fn from(value: CountrySelection) -> Self {
        match value {
            CountrySelection::All => ALL.to_owned(),
            CountrySelection::Country(c) => c,
        }
    }
}

impl std::fmt::Display for CountrySelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of narrowing a table to one selection.
#[derive(Debug, Clone)]
pub enum FilterOutcome {
    Rows(DataFrame),
    /// The selection matched no rows; nothing downstream should be computed.
    Empty { selection: CountrySelection },
}

impl FilterOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub fn rows(&self) -> Option<&DataFrame> {
        match self {
            Self::Rows(df) => Some(df),
            Self::Empty { .. } => None,
        }
    }
}

/// Distinct countries of `df`, sorted ascending.
///
/// # Errors
///
/// Returns an error if `Country` is missing.
pub fn country_options(df: &DataFrame) -> Result<Vec<String>> {
    schema::require_columns(df, &[COUNTRY])?;
    let countries = df.column(COUNTRY)?.as_materialized_series().cast(&DataType::String)?;
    let distinct: BTreeSet<&str> = countries.str()?.into_iter().flatten().collect();
    Ok(distinct.into_iter().map(str::to_owned).collect())
}

/// Rows of `df` whose `Country` equals the selection exactly.
///
/// `All` returns a copy of the whole table. Columns are shared copy-on-write,
/// so nothing done to the result reaches `df`.
///
/// # Errors
///
/// Returns an error if `Country` is missing or the filter plan fails.
pub fn filter_by_country(df: &DataFrame, selection: &CountrySelection) -> Result<FilterOutcome> {
    schema::require_columns(df, &[COUNTRY])?;

    let filtered = match selection {
        CountrySelection::All => df.clone(),
        CountrySelection::Country(country) => df
            .clone()
            .lazy()
            .filter(col(COUNTRY).eq(lit(country.as_str())))
            .collect()?,
    };

    if filtered.height() == 0 {
        tracing::warn!(%selection, "No data available for the selected country");
        return Ok(FilterOutcome::Empty {
            selection: selection.clone(),
        });
    }

    tracing::debug!(%selection, rows = filtered.height(), "Filtered table");
    Ok(FilterOutcome::Rows(filtered))
}
