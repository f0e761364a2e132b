//! # Engine Configuration Module
//!
//! This module defines configuration structures for the recommendation and
//! pricing engine, with defaults and environment variable overrides.

use std::env;
use std::str::FromStr;

use crate::errors::EngineError;
use crate::scoring::RankingWeights;

// Constants for engine configuration
pub const DEFAULT_CACHE_TTL_MS: u64 = 15 * 60 * 1000; // 15 minutes for fetched recipes
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 60 * 1000; // 1 minute between background purges

pub const ENV_CACHE_TTL_MS: &str = "RECIPE_CACHE_TTL_MS";
pub const ENV_SWEEP_INTERVAL_MS: &str = "RECIPE_CACHE_SWEEP_MS";
pub const ENV_OVERLAP_WEIGHT: &str = "RANK_OVERLAP_WEIGHT";
pub const ENV_NUTRITION_WEIGHT: &str = "RANK_NUTRITION_WEIGHT";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Output format of the tracing subscriber installed by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(EngineError::Config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live of fetched recipes in milliseconds
    pub ttl_ms: u64,
    /// Interval of the background purge in milliseconds; 0 disables it
    pub sweep_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_CACHE_TTL_MS,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

/// Configuration structure for the engine
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Recipe cache settings
    pub cache: CacheConfig,
    /// Composite score weights
    pub ranking: RankingWeights,
    /// Log output format
    pub log_format: LogFormat,
}

impl EngineConfig {
    /// Build the configuration from process environment variables
    ///
    /// Unset variables keep their defaults. Call `dotenv::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ttl_ms) = parse_var::<u64, _>(&lookup, ENV_CACHE_TTL_MS)? {
            if ttl_ms == 0 {
                return Err(EngineError::Config(format!("{ENV_CACHE_TTL_MS} must be greater than zero")));
            }
            config.cache.ttl_ms = ttl_ms;
        }
        if let Some(interval) = parse_var::<u64, _>(&lookup, ENV_SWEEP_INTERVAL_MS)? {
            config.cache.sweep_interval_ms = interval;
        }
        if let Some(weight) = parse_var::<f64, _>(&lookup, ENV_OVERLAP_WEIGHT)? {
            config.ranking.overlap = weight;
        }
        if let Some(weight) = parse_var::<f64, _>(&lookup, ENV_NUTRITION_WEIGHT)? {
            config.ranking.nutrition = weight;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = format.parse()?;
        }

        config
            .ranking
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, EngineError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EngineError::Config(format!("{name} has invalid value '{raw}'"))),
    }
}
