use crate::error::ConfigError;
use core_types::CategoryThresholds;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so an empty (or missing)
/// configuration file yields a working setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub filters: FilterSettings,
    pub categories: CategoryThresholds,
    pub departments: DepartmentSettings,
    pub ranking: RankingSettings,
    pub simulator: SimulatorSettings,
    pub export: ExportSettings,
    pub labels: LabelSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Checks the cross-field rules the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        CategoryThresholds::new(self.categories.low_below, self.categories.high_above)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        let source = &self.source;
        if !source.delimiter.is_ascii() {
            return Err(ConfigError::ValidationError(format!(
                "field delimiter '{}' must be a single-byte character",
                source.delimiter
            )));
        }
        if source.delimiter == source.decimal_separator {
            return Err(ConfigError::ValidationError(
                "field delimiter and decimal separator must differ".to_string(),
            ));
        }
        if source.thousands_separator == Some(source.decimal_separator) {
            return Err(ConfigError::ValidationError(
                "thousands separator and decimal separator must differ".to_string(),
            ));
        }
        if source.thousands_separator == Some(source.delimiter) {
            return Err(ConfigError::ValidationError(
                "thousands separator and field delimiter must differ".to_string(),
            ));
        }

        if self.departments.min_group_size == 0 {
            return Err(ConfigError::ValidationError(
                "departments.min_group_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Where the product table comes from and how it is formatted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub path: PathBuf,
    /// Field separator, `;` in comma-decimal locales.
    pub delimiter: char,
    pub decimal_separator: char,
    /// Digit grouping character. `None` rejects grouped numbers.
    pub thousands_separator: Option<char>,
    pub on_malformed: MalformedRowPolicy,
    pub columns: ColumnNames,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("resultado_analisis.csv"),
            delimiter: ';',
            decimal_separator: ',',
            thousands_separator: None,
            on_malformed: MalformedRowPolicy::default(),
            columns: ColumnNames::default(),
        }
    }
}

/// Header names of the required columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub description: String,
    pub cost: String,
    pub price: String,
    pub profit: String,
    pub margin: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            description: "Desc".to_string(),
            cost: "Costo".to_string(),
            price: "Precio".to_string(),
            profit: "Ganancia_$".to_string(),
            margin: "Margen_%".to_string(),
        }
    }
}

/// What the loader does with a row whose numeric cells cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Drop the row, log a warning and report it to the caller.
    #[default]
    Skip,
    /// Abort the load on the first malformed row.
    Fail,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub lower_bound: LowerBoundPolicy,
}

/// Lower end of the default margin interval when the user gives none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LowerBoundPolicy {
    /// Smallest margin present in the loaded data.
    #[default]
    Observed,
    /// 0%, so loss-making products are hidden until asked for.
    Zero,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DepartmentSettings {
    /// A first word must be longer than this to count as a department.
    pub min_token_len: usize,
    /// Groups with fewer records are dropped as noise.
    pub min_group_size: usize,
    /// Groups shown in the median-margin ranking.
    pub chart_limit: usize,
    /// Groups (by record count) shown in the dispersion view.
    pub dispersion_limit: usize,
}

impl Default for DepartmentSettings {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            min_group_size: 3,
            chart_limit: 15,
            dispersion_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    pub top_products: usize,
    /// Products with a margin strictly below this are critical.
    pub critical_below: Decimal,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            top_products: 10,
            critical_below: dec!(15),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Price increase in percent used when none is given.
    pub default_pct: Decimal,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self { default_pct: dec!(10) }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub filtered_path: PathBuf,
    pub critical_path: PathBuf,
    /// Round exported numbers to this many decimals. `None` keeps them as loaded.
    pub decimal_places: Option<u32>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filtered_path: PathBuf::from("analisis_exportado.csv"),
            critical_path: PathBuf::from("productos_criticos.csv"),
            decimal_places: None,
        }
    }
}

/// Display names for the derived labels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub low: String,
    pub medium: String,
    pub high: String,
    pub economic: String,
    pub mid_tier: String,
    pub premium: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            low: "Low".to_string(),
            medium: "Medium".to_string(),
            high: "High".to_string(),
            economic: "Economic".to_string(),
            mid_tier: "Medium".to_string(),
            premium: "Premium".to_string(),
        }
    }
}

impl LabelSettings {
    pub fn category(&self, category: core_types::MarginCategory) -> &str {
        use core_types::MarginCategory::*;
        match category {
            Low => &self.low,
            Medium => &self.medium,
            High => &self.high,
        }
    }

    pub fn tier(&self, tier: core_types::PriceTier) -> &str {
        use core_types::PriceTier::*;
        match tier {
            Economic => &self.economic,
            Medium => &self.mid_tier,
            Premium => &self.premium,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, logs go to a file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
    pub file_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_name: "margin-monitor.log".to_string(),
        }
    }
}
