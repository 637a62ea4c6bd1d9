use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    ColumnNames, DepartmentSettings, ExportSettings, LabelSettings, LoggingSettings,
    LowerBoundPolicy, MalformedRowPolicy, RankingSettings, Settings, SimulatorSettings,
    SourceSettings, FilterSettings,
};

/// File read when no explicit configuration path is given. It is optional.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment overrides, e.g. `MARGIN__SOURCE__PATH=data.csv`.
pub const ENV_PREFIX: &str = "MARGIN";

/// Loads the application settings.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file, and
/// `MARGIN__*` environment variables. An explicitly given `path` must exist;
/// the default `config.toml` may be absent.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(source = %settings.source.path.display(), "Configuration loaded.");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Path::new("definitely-not-here/margin-monitor.toml");
        assert!(matches!(
            load_config(Some(missing)),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn explicit_file_is_loaded_into_settings() {
        let path = std::env::temp_dir().join(format!("margin-monitor-{}.toml", std::process::id()));
        std::fs::write(&path, "[ranking]\ntop_products = 5\n").unwrap();

        let loaded = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();

        let settings: Settings = loaded.unwrap();
        assert_eq!(settings.ranking.top_products, 5);
        assert_eq!(settings.departments.min_group_size, 3);
    }
}
