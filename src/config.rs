use crate::error::{PrepError, Result};
use crate::prep::{
    CleanOptions, ConfidenceLevel, CountryFix, DeriveOptions, IngredientCountMode,
    VegetarianPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "global_street_food_cleaned.csv";

/// Overrides the source path.
pub const ENV_DATA_PATH: &str = "STREETFOOD_DATA";
/// Overrides the confidence level.
pub const ENV_CONFIDENCE_LEVEL: &str = "STREETFOOD_CONFIDENCE_LEVEL";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PrepConfig {
    /// CSV source read when no file is given on the command line.
    pub data_path: PathBuf,
    /// Level of the per-country price intervals (default: 0.95).
    pub confidence_level: ConfidenceLevel,
    pub ingredient_count_mode: IngredientCountMode,
    pub vegetarian_policy: VegetarianPolicy,
    /// Literal substitutions applied to `Country` before anything else reads it.
    pub country_fixes: Vec<CountryFix>,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            confidence_level: ConfidenceLevel::DEFAULT,
            ingredient_count_mode: IngredientCountMode::default(),
            vegetarian_policy: VegetarianPolicy::default(),
            country_fixes: CleanOptions::default().country_fixes,
        }
    }
}

impl PrepConfig {
    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            country_fixes: self.country_fixes.clone(),
        }
    }

    pub fn derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            ingredient_count_mode: self.ingredient_count_mode,
            vegetarian_policy: self.vegetarian_policy,
        }
    }

    /// Applies overrides found through `lookup`, keyed by the `ENV_*` names.
    ///
    /// # Errors
    ///
    /// Returns an error if an override holds an invalid confidence level.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA_PATH).filter(|p| !p.trim().is_empty()) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_CONFIDENCE_LEVEL) {
            self.confidence_level = level.parse()?;
        }
        Ok(self)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment override is invalid.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }
}

/// Reads a JSON configuration file. Missing keys take their defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid configuration.
pub fn load_config(path: &Path) -> Result<PrepConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PrepError::Config(format!("failed to read config file {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Configuration from `path` when given, defaults otherwise, then environment
/// overrides.
///
/// # Errors
///
/// Returns an error if the file or an override is invalid.
pub fn resolve_config(path: Option<&Path>) -> Result<PrepConfig> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => PrepConfig::default(),
    };
    config.with_env_overrides()
}
