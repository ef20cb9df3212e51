use crate::catalog::{RateCard, RateEntry};
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub pricing: PricingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Label printed next to costs; rates are assumed to be in this currency
    pub currency: String,
    #[serde(default)]
    pub rates: Vec<RateEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format when `--output` is not given (text, json)
    pub format: String,
    /// Show metering unit codes in text breakdowns
    pub show_unit_codes: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            show_unit_codes: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pricing: PricingConfig {
                currency: "USD".to_string(),
                rates: Vec::new(),
            },
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .picost.toml in current dir, then ~/.config/picost/config.toml
            let local = PathBuf::from(".picost.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("picost").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".picost.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).with_context(|| {
                let mut err = format!("Failed to parse config: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Missing [pricing] currency");
                err.push_str("\n    - Rate price that is not a number");
                err.push_str("\n  Tip: Run 'picost init' to create a new config file");
                err
            })?;
            config.validate()?;
            Ok(config)
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'picost init' to create a config file.");
            }
            Ok(Config::default())
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.pricing.currency.trim().is_empty() {
            return Err(ConfigError::MissingField("pricing.currency".to_string()));
        }
        if !matches!(self.output.format.as_str(), "text" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "output.format".to_string(),
                reason: format!("expected 'text' or 'json', got '{}'", self.output.format),
            });
        }
        for (i, rate) in self.pricing.rates.iter().enumerate() {
            if rate.unit.is_empty() {
                return Err(ConfigError::MissingField(format!("pricing.rates[{}].unit", i)));
            }
            if rate.price.is_sign_negative() && !rate.price.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field: format!("pricing.rates[{}].price", i),
                    reason: format!("price cannot be negative, got {}", rate.price),
                });
            }
        }
        Ok(())
    }

    pub fn rate_card(&self) -> RateCard {
        RateCard::new(self.pricing.rates.clone())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}

/// Expands a leading `~` in a user supplied path
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}
