//! # Pricing Module
//!
//! Combines quotes from several price providers and estimates the cost of a
//! whole recipe.
//!
//! ## Merge policy
//!
//! Cross-provider merging is pluggable through [`QuoteMerger`]. The default,
//! [`ConfidenceWeightedMerge`], applies the same rule the local hints provider
//! uses inside one bucket, one level up:
//!
//! - `price = Σ p·c / Σ c` over providers that have an opinion
//! - `confidence = Σ c / n`
//! - `source` joins the contributing sources with `+`
//!
//! ## Usage
//!
//! ```rust
//! use recipe_engine::local_hints::LocalHintsProvider;
//! use recipe_engine::price_provider::IngredientPriceHint;
//! use recipe_engine::pricing::PriceBook;
//! use recipe_engine::recipe_model::Recipe;
//!
//! let book = PriceBook::new().with_provider(LocalHintsProvider::new(vec![
//!     IngredientPriceHint::new("яйцо", 12.0, "shop").with_confidence(1.0),
//!     IngredientPriceHint::new("молоко", 80.0, "shop").with_confidence(1.0),
//! ]));
//!
//! let recipe = Recipe::new("omelette", "Омлет").with_ingredients(&["Яйцо", "Молоко", "Соль"]);
//! let estimate = book.estimate_recipe_cost(&recipe);
//!
//! assert_eq!(estimate.total_rub, 92.0);
//! assert_eq!(estimate.unpriced, vec!["Соль".to_string()]);
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::ingredient_normalizer::normalize_key;
use crate::price_provider::{clamp01, round2, PriceProvider, PriceQuote};
use crate::recipe_model::Recipe;

/// A quote attributed to the provider that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderQuote {
    pub provider_id: String,
    pub quote: PriceQuote,
}

/// Result of merging several providers' quotes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedQuote {
    pub quote: PriceQuote,
    /// Providers whose quotes carried weight in the merge
    pub contributors: Vec<String>,
}

/// Policy for combining quotes from several providers
pub trait QuoteMerger: Send + Sync {
    /// Merge the quotes, or return `None` when there is no usable signal
    fn merge(&self, quotes: &[ProviderQuote]) -> Option<MergedQuote>;
}

/// Confidence-weighted average across providers
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceWeightedMerge;

impl QuoteMerger for ConfidenceWeightedMerge {
    fn merge(&self, quotes: &[ProviderQuote]) -> Option<MergedQuote> {
        if quotes.is_empty() {
            return None;
        }

        let mut weighted_price = 0.0;
        let mut weight_sum = 0.0;
        let mut sources: Vec<&str> = Vec::new();
        let mut contributors = Vec::new();

        for provider_quote in quotes {
            let c = clamp01(provider_quote.quote.confidence);
            weighted_price += provider_quote.quote.price_rub.max(0.0) * c;
            weight_sum += c;

            if c > 0.0 {
                contributors.push(provider_quote.provider_id.clone());
                let source = provider_quote.quote.source.as_str();
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }

        if weight_sum <= 0.0 {
            return None;
        }

        Some(MergedQuote {
            quote: PriceQuote::new(
                weighted_price / weight_sum,
                weight_sum / quotes.len() as f64,
                &sources.join("+"),
            ),
            contributors,
        })
    }
}

/// Pick the single most confident quote; the first one wins ties
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestConfidenceMerge;

impl QuoteMerger for HighestConfidenceMerge {
    fn merge(&self, quotes: &[ProviderQuote]) -> Option<MergedQuote> {
        let mut best: Option<&ProviderQuote> = None;
        for candidate in quotes.iter().filter(|q| q.quote.confidence > 0.0) {
            if best.map_or(true, |b| candidate.quote.confidence > b.quote.confidence) {
                best = Some(candidate);
            }
        }

        best.map(|b| MergedQuote {
            quote: b.quote.clone(),
            contributors: vec![b.provider_id.clone()],
        })
    }
}

/// Price of one recipe ingredient line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientCost {
    /// Ingredient line as written in the recipe
    pub ingredient: String,
    pub normalized_key: String,
    pub quote: MergedQuote,
}

/// Estimated cost of a recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    /// Sum of priced ingredients in roubles, rounded to two decimals
    pub total_rub: f64,
    /// Average confidence of the priced ingredients; 0 when nothing was priced
    pub confidence: f64,
    pub priced: Vec<IngredientCost>,
    /// Ingredient lines no provider had an opinion on
    pub unpriced: Vec<String>,
}

impl CostEstimate {
    /// Share of ingredient lines that received a price
    pub fn coverage(&self) -> f64 {
        let total = self.priced.len() + self.unpriced.len();
        if total == 0 {
            return 0.0;
        }
        self.priced.len() as f64 / total as f64
    }
}

/// A set of price providers and the policy that merges their quotes
pub struct PriceBook {
    providers: Vec<Box<dyn PriceProvider>>,
    merger: Box<dyn QuoteMerger>,
}

impl Default for PriceBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceBook {
    /// Empty price book using the confidence-weighted merge
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            merger: Box::new(ConfidenceWeightedMerge),
        }
    }

    /// Add a provider; providers are consulted in insertion order
    pub fn with_provider<P: PriceProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Replace the merge policy
    pub fn with_merger<M: QuoteMerger + 'static>(mut self, merger: M) -> Self {
        self.merger = Box::new(merger);
        self
    }

    /// Identifiers of the registered providers
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Every provider's opinion on a normalized key
    pub fn collect_quotes(&self, ingredient_key: &str) -> Vec<ProviderQuote> {
        self.providers
            .iter()
            .filter_map(|provider| {
                provider.quote(ingredient_key).map(|quote| ProviderQuote {
                    provider_id: provider.id().to_string(),
                    quote,
                })
            })
            .collect()
    }

    /// Normalize a raw ingredient name and merge all providers' quotes for it
    pub fn quote(&self, raw_ingredient: &str) -> Option<MergedQuote> {
        let key = normalize_key(raw_ingredient)?;
        self.merger.merge(&self.collect_quotes(&key))
    }

    /// Price every ingredient line of a recipe
    pub fn estimate_recipe_cost(&self, recipe: &Recipe) -> CostEstimate {
        let mut priced = Vec::new();
        let mut unpriced = Vec::new();

        for line in &recipe.ingredients {
            let merged = normalize_key(line).and_then(|key| {
                self.merger
                    .merge(&self.collect_quotes(&key))
                    .map(|quote| (key, quote))
            });

            match merged {
                Some((normalized_key, quote)) => priced.push(IngredientCost {
                    ingredient: line.clone(),
                    normalized_key,
                    quote,
                }),
                None => {
                    debug!("No price for ingredient '{}' in recipe {}", line, recipe.id);
                    unpriced.push(line.clone());
                }
            }
        }

        let total: f64 = priced.iter().map(|cost| cost.quote.quote.price_rub).sum();
        let confidence = if priced.is_empty() {
            0.0
        } else {
            priced.iter().map(|cost| cost.quote.quote.confidence).sum::<f64>() / priced.len() as f64
        };

        info!(
            "Estimated recipe {} at {:.2} RUB ({} priced, {} unpriced)",
            recipe.id,
            total,
            priced.len(),
            unpriced.len()
        );

        CostEstimate {
            total_rub: round2(total),
            confidence: clamp01(confidence),
            priced,
            unpriced,
        }
    }

    /// Copy of the recipe with `estimated_cost` filled in
    ///
    /// The cost stays `None` when no ingredient could be priced.
    pub fn with_estimated_cost(&self, recipe: &Recipe) -> Recipe {
        let estimate = self.estimate_recipe_cost(recipe);
        let mut priced = recipe.clone();
        priced.estimated_cost = if estimate.priced.is_empty() {
            None
        } else {
            Some(estimate.total_rub)
        };
        priced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_hints::LocalHintsProvider;
    use crate::price_provider::IngredientPriceHint;

    struct FixedProvider {
        id: &'static str,
        price: f64,
        confidence: f64,
    }

    impl PriceProvider for FixedProvider {
        fn id(&self) -> &str {
            self.id
        }

        fn quote(&self, _ingredient_key: &str) -> Option<PriceQuote> {
            Some(PriceQuote::new(self.price, self.confidence, self.id))
        }
    }

    fn provider_quote(id: &str, price: f64, confidence: f64) -> ProviderQuote {
        ProviderQuote {
            provider_id: id.to_string(),
            quote: PriceQuote::new(price, confidence, id),
        }
    }

    #[test]
    fn test_weighted_merge() {
        let merged = ConfidenceWeightedMerge
            .merge(&[provider_quote("a", 60.0, 1.0), provider_quote("b", 80.0, 0.5)])
            .unwrap();

        assert_eq!(merged.quote.price_rub, 66.67);
        assert_eq!(merged.quote.confidence, 0.75);
        assert_eq!(merged.quote.source, "a+b");
        assert_eq!(merged.contributors, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_weighted_merge_without_signal() {
        assert!(ConfidenceWeightedMerge.merge(&[]).is_none());
        assert!(ConfidenceWeightedMerge
            .merge(&[provider_quote("a", 60.0, 0.0)])
            .is_none());
    }

    #[test]
    fn test_weighted_merge_skips_zero_confidence_contributors() {
        let merged = ConfidenceWeightedMerge
            .merge(&[provider_quote("a", 60.0, 0.0), provider_quote("b", 80.0, 1.0)])
            .unwrap();
        assert_eq!(merged.quote.price_rub, 80.0);
        assert_eq!(merged.quote.confidence, 0.5);
        assert_eq!(merged.contributors, vec!["b".to_string()]);
    }

    #[test]
    fn test_highest_confidence_merge() {
        let merged = HighestConfidenceMerge
            .merge(&[
                provider_quote("a", 60.0, 0.4),
                provider_quote("b", 80.0, 0.9),
                provider_quote("c", 90.0, 0.9),
            ])
            .unwrap();
        assert_eq!(merged.quote.price_rub, 80.0);
        assert_eq!(merged.contributors, vec!["b".to_string()]);
        assert!(HighestConfidenceMerge.merge(&[provider_quote("a", 1.0, 0.0)]).is_none());
    }

    #[test]
    fn test_price_book_merges_providers() {
        let book = PriceBook::new()
            .with_provider(FixedProvider { id: "api", price: 100.0, confidence: 1.0 })
            .with_provider(LocalHintsProvider::new(vec![
                IngredientPriceHint::new("сыр", 200.0, "receipt").with_confidence(1.0),
            ]));

        assert_eq!(book.provider_ids(), vec!["api", "local-hints"]);

        let merged = book.quote("Сыр").unwrap();
        assert_eq!(merged.quote.price_rub, 150.0);
        assert_eq!(merged.contributors.len(), 2);

        // Only the fixed provider knows about bread
        let merged = book.quote("хлеб").unwrap();
        assert_eq!(merged.quote.price_rub, 100.0);
        assert!(book.quote("...").is_none());
    }

    #[test]
    fn test_recipe_cost_estimate() {
        let book = PriceBook::new().with_provider(LocalHintsProvider::new(vec![
            IngredientPriceHint::new("свекла", 40.0, "market").with_confidence(1.0),
            IngredientPriceHint::new("капуста", 60.0, "market").with_confidence(0.5),
        ]));
        let recipe = Recipe::new("borscht", "Борщ").with_ingredients(&["Свёкла", "Капуста", "Укроп", "!!"]);

        let estimate = book.estimate_recipe_cost(&recipe);
        assert_eq!(estimate.total_rub, 100.0);
        assert_eq!(estimate.confidence, 0.75);
        assert_eq!(estimate.priced.len(), 2);
        assert_eq!(estimate.priced[0].normalized_key, "свекла");
        assert_eq!(estimate.unpriced, vec!["Укроп".to_string(), "!!".to_string()]);
        assert_eq!(estimate.coverage(), 0.5);
    }

    #[test]
    fn test_with_estimated_cost() {
        let book = PriceBook::new().with_provider(FixedProvider { id: "api", price: 10.0, confidence: 1.0 });
        let recipe = Recipe::new("tea", "Чай").with_ingredients(&["чай", "сахар"]);

        let priced = book.with_estimated_cost(&recipe);
        assert_eq!(priced.estimated_cost, Some(20.0));
        assert!(recipe.estimated_cost.is_none());

        let empty_book = PriceBook::new();
        assert_eq!(empty_book.with_estimated_cost(&recipe).estimated_cost, None);
    }

    #[test]
    fn test_custom_merger() {
        let book = PriceBook::new()
            .with_merger(HighestConfidenceMerge)
            .with_provider(FixedProvider { id: "low", price: 10.0, confidence: 0.2 })
            .with_provider(FixedProvider { id: "high", price: 30.0, confidence: 0.8 });

        assert_eq!(book.quote("мука").unwrap().quote.price_rub, 30.0);
    }
}
