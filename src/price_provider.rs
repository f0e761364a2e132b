//! # Price Provider Module
//!
//! This module defines the price quoting capability shared by every price source,
//! along with the input and output data types it works with.
//!
//! ## Core Concepts
//!
//! - **IngredientPriceHint**: a single historical or crowd-sourced price observation
//! - **PriceQuote**: one provider's estimate for an ingredient, with confidence and source
//! - **PriceProvider**: anything that can quote a normalized ingredient key
//!
//! A provider returning `None` has no opinion about the ingredient. That is
//! different from a quote with zero confidence and callers must not conflate them.

use serde::{Deserialize, Serialize};

/// Confidence assumed for a hint that does not carry one
pub const DEFAULT_HINT_CONFIDENCE: f64 = 0.75;

/// Clamp a confidence value into `[0, 1]`, mapping NaN to zero
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Round a price to kopecks (two decimals)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An observed price for an ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientPriceHint {
    /// Free-text ingredient name as the collector saw it
    pub ingredient: String,
    /// Observed price in roubles
    pub price_rub: f64,
    /// How much the collector trusts the observation; absent means the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Where the observation came from (shop, receipt, user report)
    pub source: String,
}

impl IngredientPriceHint {
    /// Create a hint without an explicit confidence
    pub fn new(ingredient: &str, price_rub: f64, source: &str) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            price_rub,
            confidence: None,
            source: source.to_string(),
        }
    }

    /// Set the confidence as reported upstream (clamped on use, not here)
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Confidence used for weighting: defaulted when absent, clamped to `[0, 1]`
    pub fn effective_confidence(&self) -> f64 {
        clamp01(self.confidence.unwrap_or(DEFAULT_HINT_CONFIDENCE))
    }

    /// Price used for weighting: negative (and NaN) prices count as zero
    pub fn effective_price(&self) -> f64 {
        self.price_rub.max(0.0)
    }
}

/// A single provider's price estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Estimated price in roubles, rounded to two decimals
    pub price_rub: f64,
    /// Agreement strength in `[0, 1]`
    pub confidence: f64,
    /// Source label for attribution
    pub source: String,
}

impl PriceQuote {
    /// Build a quote, rounding the price and clamping the confidence
    pub fn new(price_rub: f64, confidence: f64, source: &str) -> Self {
        Self {
            price_rub: round2(price_rub),
            confidence: clamp01(confidence),
            source: source.to_string(),
        }
    }
}

/// A source of ingredient price quotes
///
/// Implementations must be cheap to call and must not block: quoting runs
/// inside request handlers. External API-backed providers are expected to
/// serve from data they have already fetched.
pub trait PriceProvider: Send + Sync {
    /// Stable identifier used for attribution and debugging
    fn id(&self) -> &str;

    /// Quote a normalized ingredient key, or `None` when there is no opinion
    fn quote(&self, ingredient_key: &str) -> Option<PriceQuote>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.4), 0.4);
        assert_eq!(clamp01(7.0), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(10.0), 10.0);
        assert_eq!(round2(0.004), 0.0);
    }

    #[test]
    fn test_effective_confidence_defaults_and_clamps() {
        let hint = IngredientPriceHint::new("молоко", 80.0, "shop");
        assert_eq!(hint.effective_confidence(), DEFAULT_HINT_CONFIDENCE);

        let hint = hint.with_confidence(1.7);
        assert_eq!(hint.effective_confidence(), 1.0);

        let hint = IngredientPriceHint::new("молоко", 80.0, "shop").with_confidence(-3.0);
        assert_eq!(hint.effective_confidence(), 0.0);
    }

    #[test]
    fn test_effective_price_floors_negative() {
        let hint = IngredientPriceHint::new("соль", -15.0, "receipt");
        assert_eq!(hint.effective_price(), 0.0);
    }

    #[test]
    fn test_hint_deserializes_from_camel_case() {
        let json = r#"[
            {"ingredient": "Молоко", "priceRub": 89.9, "confidence": 0.9, "source": "perekrestok"},
            {"ingredient": "Хлеб", "priceRub": 45, "source": "receipt"}
        ]"#;
        let hints: Vec<IngredientPriceHint> = serde_json::from_str(json).unwrap();

        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].price_rub, 89.9);
        assert_eq!(hints[0].confidence, Some(0.9));
        assert_eq!(hints[1].confidence, None);
        assert_eq!(hints[1].source, "receipt");
    }

    #[test]
    fn test_quote_new_rounds_and_clamps() {
        let quote = PriceQuote::new(12.345_6, 1.2, "local");
        assert_eq!(quote.price_rub, 12.35);
        assert_eq!(quote.confidence, 1.0);
    }
}
