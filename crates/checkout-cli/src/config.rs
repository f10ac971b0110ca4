//! # Shell Configuration
//!
//! Settings are read from an optional `config/checkout.toml`, then
//! overridden by environment variables (a `.env` file is loaded if present).

use checkout_core::{Currency, PaymentError, PaymentResult};
use serde::Deserialize;
use std::env;

const CONFIG_PATHS: [&str; 3] = [
    "config/checkout.toml",
    "../config/checkout.toml",
    "../../config/checkout.toml",
];

/// Interactive shell settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Currency for balances and prices
    pub currency: Currency,
    /// Trailing card digits left unmasked in listings
    pub mask_visible_digits: usize,
    /// Print the startup banner
    pub show_banner: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            mask_visible_digits: 4,
            show_banner: true,
        }
    }
}

impl ShellConfig {
    /// Load from the first config file found, then apply env overrides.
    pub fn load() -> PaymentResult<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        for path in CONFIG_PATHS {
            if let Ok(content) = std::fs::read_to_string(path) {
                config = Self::from_toml(&content).map_err(|e| {
                    PaymentError::Configuration(format!("failed to parse {}: {}", path, e))
                })?;
                tracing::info!("Loaded configuration from {}", path);
                break;
            }
        }

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Apply `CHECKOUT_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> PaymentResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(currency) = lookup("CHECKOUT_CURRENCY") {
            self.currency = currency.parse()?;
        }
        if let Some(digits) = lookup("CHECKOUT_MASK_DIGITS") {
            self.mask_visible_digits = digits.trim().parse().map_err(|_| {
                PaymentError::Configuration(format!(
                    "CHECKOUT_MASK_DIGITS must be a whole number, got '{}'",
                    digits
                ))
            })?;
        }
        if let Some(banner) = lookup("CHECKOUT_BANNER") {
            self.show_banner = match banner.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(PaymentError::Configuration(format!(
                        "CHECKOUT_BANNER must be true or false, got '{}'",
                        other
                    )))
                }
            };
        }
        Ok(())
    }
}
