use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::amm::FeeRate;
use crate::types::{DEFAULT_DECIMALS, Result, SwapError};
use crate::utils::math::{MAX_DECIMAL_SCALE, Rounding};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quote precision and pool fee
    pub quote: QuoteConfig,

    /// Router call settings
    pub swap: SwapConfig,

    /// Value codec limits
    pub codec: CodecConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub fee: FeeRate,
    pub decimals: u32,
    pub rounding: Rounding,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            fee: FeeRate::STANDARD,
            decimals: DEFAULT_DECIMALS,
            rounding: Rounding::HalfUp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Slippage tolerance percentage
    pub slippage_tolerance_percent: Decimal,

    /// Seconds until a submitted swap expires
    pub deadline_secs: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            slippage_tolerance_percent: dec!(0.5),
            deadline_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// XDR read/write depth budget; each nested value spends a few levels
    pub max_depth: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { max_depth: 500 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Config {
    pub fn quote_config(&self) -> &QuoteConfig {
        &self.quote
    }

    pub fn swap_config(&self) -> &SwapConfig {
        &self.swap
    }

    pub fn codec_config(&self) -> &CodecConfig {
        &self.codec
    }

    /// Load config from `config.toml`, falling back to defaults plus environment
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let mut config = if Path::new("config.toml").exists() {
            Self::load_from_file("config.toml")?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from `lookup` (the process environment in `load`)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(decimals) = lookup("SWAP_DECIMALS") {
            self.quote.decimals = decimals
                .parse()
                .map_err(|_| SwapError::Config(format!("SWAP_DECIMALS is not a number: {}", decimals)))?;
        }

        if let Some(slippage) = lookup("SWAP_SLIPPAGE_PERCENT") {
            self.swap.slippage_tolerance_percent = slippage.parse().map_err(|_| {
                SwapError::Config(format!("SWAP_SLIPPAGE_PERCENT is not a decimal: {}", slippage))
            })?;
        }

        if let Some(deadline) = lookup("SWAP_DEADLINE_SECS") {
            self.swap.deadline_secs = deadline
                .parse()
                .map_err(|_| SwapError::Config(format!("SWAP_DEADLINE_SECS is not a number: {}", deadline)))?;
        }

        if let Some(level) = lookup("SWAP_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.quote.fee.is_valid() {
            return Err(SwapError::Config(format!(
                "Invalid fee {}/{}",
                self.quote.fee.numerator, self.quote.fee.denominator
            )));
        }

        if self.quote.decimals > MAX_DECIMAL_SCALE {
            return Err(SwapError::Config(format!(
                "Quote decimals {} exceed {}",
                self.quote.decimals, MAX_DECIMAL_SCALE
            )));
        }

        let slippage = self.swap.slippage_tolerance_percent;
        if slippage.is_sign_negative() || slippage >= Decimal::ONE_HUNDRED {
            return Err(SwapError::Config(format!("Slippage {}% out of range", slippage)));
        }

        if self.codec.max_depth == 0 {
            return Err(SwapError::Config("Codec max depth must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quote.decimals, 7);
        assert_eq!(config.quote.fee, FeeRate::STANDARD);
        assert_eq!(config.swap.deadline_secs, 3600);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [quote]
            decimals = 4
            rounding = "truncate"

            [swap]
            slippage_tolerance_percent = "1.5"
            "#,
        )
        .unwrap();
        assert_eq!(config.quote.decimals, 4);
        assert_eq!(config.quote.rounding, Rounding::Truncate);
        assert_eq!(config.quote.fee, FeeRate::STANDARD);
        assert_eq!(config.swap.slippage_tolerance_percent, dec!(1.5));
        assert_eq!(config.codec.max_depth, 500);
    }

    #[test]
    fn test_fee_from_toml() {
        let config = Config::from_toml("[quote.fee]\nnumerator = 995\ndenominator = 1000\n").unwrap();
        assert_eq!(config.quote.fee, FeeRate::new(995, 1000));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SWAP_DECIMALS", "9"),
            ("SWAP_SLIPPAGE_PERCENT", "2"),
            ("SWAP_LOG_LEVEL", "debug"),
        ]);
        let mut config = Config::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.quote.decimals, 9);
        assert_eq!(config.swap.slippage_tolerance_percent, dec!(2));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.swap.deadline_secs, 3600);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = Config::default();
        let result = config.apply_env(|key| (key == "SWAP_DECIMALS").then(|| "seven".to_string()));
        assert!(matches!(result, Err(SwapError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.quote.fee = FeeRate::new(1001, 1000);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.quote.decimals = 29;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.swap.slippage_tolerance_percent = dec!(100);
        assert!(config.validate().is_err());
    }
}
