//! # Engine Error Types Module
//!
//! This module defines the error type returned by the recommendation and pricing engine.
//! Expected absence (no quote, no cache hit) is never an error: those paths return `None`.
//! Errors here signal misconfiguration detected at construction time.

/// Custom error types for engine construction and configuration
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Cache time-to-live was zero or could not be represented
    InvalidTtl(String),
    /// Ranking weights were negative or not finite
    InvalidWeights(String),
    /// Configuration value could not be parsed or validated
    Config(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidTtl(msg) => write!(f, "Invalid cache TTL: {msg}"),
            EngineError::InvalidWeights(msg) => write!(f, "Invalid ranking weights: {msg}"),
            EngineError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
