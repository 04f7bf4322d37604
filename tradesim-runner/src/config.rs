//! Serializable backtest configuration, loaded from and saved to TOML.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use tradesim_core::engine::SimulationConfig;
use tradesim_core::signals::{
    BollingerBands, MaCrossover, RsiStrategy, SignalSource, StrategyError,
};
use tradesim_core::sizers::fraction::DEFAULT_FRACTION;
use tradesim_core::sizers::{FixedFraction, FixedSizer, Sizer};

use crate::metrics::{DEFAULT_PERIODS_PER_YEAR, DEFAULT_RISK_FREE_RATE};

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid strategy parameters: {0}")]
    Strategy(#[from] StrategyError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one backtest run.
///
/// Captures everything needed to reproduce a run: strategy parameters,
/// account settings, data source, and position sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BacktestConfig {
    pub strategy: StrategyConfig,
    pub backtest: BacktestSettings,
    pub data: DataSettings,
    pub sizing: SizingConfig,
}

/// Strategy selection (serializable enum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Short SMA vs long SMA.
    MaCrossover(MaCrossover),

    /// RSI oversold/overbought thresholds.
    Rsi(RsiStrategy),

    /// Bollinger band touches, optionally volume-confirmed.
    BollingerBands(BollingerBands),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::MaCrossover(MaCrossover::default())
    }
}

impl StrategyConfig {
    pub fn source(&self) -> &dyn SignalSource {
        match self {
            Self::MaCrossover(s) => s as &dyn SignalSource,
            Self::Rsi(s) => s as &dyn SignalSource,
            Self::BollingerBands(s) => s as &dyn SignalSource,
        }
    }

    pub fn name(&self) -> &str {
        self.source().name()
    }
}

/// Account and analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestSettings {
    pub initial_capital: f64,
    /// Commission rate on gross notional.
    pub commission: f64,
    pub risk_free_rate: f64,
    pub periods_per_year: u32,
    /// Inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission: 0.001,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            end_date: None,
        }
    }
}

/// Where the price data comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub symbol: String,
    pub file_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            symbol: "AAPL".into(),
            file_path: PathBuf::from("data/raw/stock_data.csv"),
        }
    }
}

/// Position sizer configuration (serializable enum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SizingConfig {
    /// Fraction of available cash per trade.
    FixedFraction { fraction: f64 },

    /// Fixed number of units per trade.
    FixedShares { quantity: f64 },

    /// Fixed cash amount per trade.
    FixedNotional { amount: f64 },
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self::FixedFraction {
            fraction: DEFAULT_FRACTION,
        }
    }
}

impl SizingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = match *self {
            Self::FixedFraction { fraction } => fraction > 0.0 && fraction <= 1.0,
            Self::FixedShares { quantity } => quantity > 0.0 && quantity.is_finite(),
            Self::FixedNotional { amount } => amount > 0.0 && amount.is_finite(),
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!("sizing parameters out of range: {self:?}")))
        }
    }

    /// Build the sizer. Call `validate()` first; out-of-range values panic.
    pub fn build(&self) -> Box<dyn Sizer> {
        match *self {
            Self::FixedFraction { fraction } => Box::new(FixedFraction::new(fraction)),
            Self::FixedShares { quantity } => Box::new(FixedSizer::shares(quantity)),
            Self::FixedNotional { amount } => Box::new(FixedSizer::notional(amount)),
        }
    }
}

impl BacktestConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.source().validate()?;
        self.sizing.validate()?;

        let b = &self.backtest;
        if !(b.initial_capital.is_finite() && b.initial_capital >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "initial_capital must be finite and >= 0, got {}",
                b.initial_capital
            )));
        }
        if !(0.0..1.0).contains(&b.commission) {
            return Err(ConfigError::Invalid(format!(
                "commission must be in [0, 1), got {}",
                b.commission
            )));
        }
        if !b.risk_free_rate.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "risk_free_rate must be finite, got {}",
                b.risk_free_rate
            )));
        }
        if b.periods_per_year == 0 {
            return Err(ConfigError::Invalid("periods_per_year must be > 0".into()));
        }
        if let (Some(start), Some(end)) = (b.start_date, b.end_date) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
        }
        if self.data.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("data.symbol must not be empty".into()));
        }
        Ok(())
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig::new(
            self.data.symbol.clone(),
            self.backtest.initial_capital,
            self.backtest.commission,
        )
    }

    /// Deterministic hash of the full configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }
}
