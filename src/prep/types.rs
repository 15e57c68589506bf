use serde::{Deserialize, Serialize};

/// How `IngredientCount` treats blank comma segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCountMode {
    /// Every comma segment counts, so an empty list still counts as one.
    #[default]
    NaiveSplit,
    /// Only segments holding non-whitespace text count; `""` counts as zero.
    NonEmptySegments,
}

/// What happens to rows whose `Vegetarian` flag is neither 0 nor 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VegetarianPolicy {
    /// Keep the row and label it Non-Vegetarian.
    #[default]
    Permissive,
    /// Remove the row from the prepared table.
    Strict,
}

/// Classification of a raw `Vegetarian` cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VegetarianFlag {
    Vegetarian,
    NonVegetarian,
    Invalid,
}

impl VegetarianFlag {
    /// Reads a flag the way a numeric `0/1` column would be read: booleans
    /// and yes/no map to 1/0, numbers truncate toward zero.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_lowercase();
        let code = match raw.as_str() {
            "true" | "yes" => Some(1.0),
            "false" | "no" => Some(0.0),
            _ => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(f64::trunc),
        };

        match code {
            Some(v) if v == 1.0 => Self::Vegetarian,
            Some(v) if v == 0.0 => Self::NonVegetarian,
            _ => Self::Invalid,
        }
    }

    pub fn dish_type(self) -> DishType {
        match self {
            Self::Vegetarian => DishType::Vegetarian,
            Self::NonVegetarian | Self::Invalid => DishType::NonVegetarian,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DishType {
    #[serde(rename = "Vegetarian")]
    Vegetarian,
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
}

impl DishType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::NonVegetarian => "Non-Vegetarian",
        }
    }
}

impl std::fmt::Display for DishType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mean of a value column for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanRow {
    pub key: String,
    pub mean: f64,
    pub count: usize,
}

/// Frequency of one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub key: String,
    pub count: usize,
}

/// Mean and t-interval of a value column for one key.
///
/// Bounds are `None` when the group has fewer than two values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRow {
    pub key: String,
    pub mean: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub sample_size: usize,
}

/// All values of a column for one key, in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueGroup {
    pub key: String,
    pub values: Vec<f64>,
}

/// One dish as plotted on the price-distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ingredient_count: u32,
    pub price: f64,
    pub dish_type: DishType,
    pub dish_name: String,
    pub country: String,
}

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Non-empty price cells that did not parse as a number.
    pub unparseable_prices: usize,
    /// Rows dropped for holding at least one missing value after coercion.
    pub rows_with_missing_values: usize,
    /// Country cells rewritten by a substitution.
    pub country_fixes: usize,
}

/// Data-quality defects found while deriving columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectReport {
    /// Rows whose `Vegetarian` flag was neither 0 nor 1.
    pub invalid_vegetarian_flags: usize,
    /// Of those, how many were removed from the table.
    pub rows_removed: usize,
}

impl DefectReport {
    pub fn is_clean(&self) -> bool {
        self.invalid_vegetarian_flags == 0
    }
}
