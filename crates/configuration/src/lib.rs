use crate::error::ConfigError;
use rust_decimal::Decimal;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Alerts, Config, Export, ExportFormat, Scoring};

/// Prefix for environment overrides, e.g. `ALLFI_ALERTS__SCORE_THRESHOLD=50`.
const ENV_PREFIX: &str = "ALLFI";

/// Loads the application configuration from the given TOML file.
///
/// The file is optional. Values from `ALLFI_*` environment variables take
/// precedence over the file, and anything left unset falls back to its default.
/// The result is validated before it is returned.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config = load_with_environment(path, environment())?;
    tracing::debug!(path, "Configuration loaded.");
    Ok(config)
}

/// `ALLFI_` joins the prefix, `__` separates nested keys.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn load_with_environment(
    path: &str,
    environment: config::Environment,
) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(environment)
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

/// Parses and validates configuration held in memory as TOML.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Rejects settings that would make the scoring formulas meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (currency, rate) in self.currency_rates.iter() {
            if *rate <= Decimal::ZERO {
                return Err(ConfigError::InvalidRate {
                    currency: currency.clone(),
                    rate: *rate,
                });
            }
        }

        let scoring = &self.scoring;
        if scoring.cash_buffer_target <= Decimal::ZERO {
            return Err(ConfigError::InvalidScoring(
                "cash_buffer_target must be greater than 0".to_string(),
            ));
        }
        if scoring.high_cap_target <= Decimal::ZERO {
            return Err(ConfigError::InvalidScoring(
                "high_cap_target must be greater than 0".to_string(),
            ));
        }
        if scoring.concentration_free_ratio < Decimal::ZERO
            || scoring.concentration_free_ratio >= Decimal::ONE
        {
            return Err(ConfigError::InvalidScoring(
                "concentration_free_ratio must be in [0, 1)".to_string(),
            ));
        }
        if scoring.platform_target == 0 {
            return Err(ConfigError::InvalidScoring(
                "platform_target must be at least 1".to_string(),
            ));
        }

        let threshold = self.alerts.score_threshold;
        if threshold < Decimal::ZERO || threshold > Decimal::ONE_HUNDRED {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        Ok(())
    }
}
