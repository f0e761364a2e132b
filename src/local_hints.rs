//! # Local Hints Price Provider Module
//!
//! This module provides an in-memory price provider that aggregates historical
//! price observations per ingredient.
//!
//! Hints are grouped by normalized ingredient key when the provider is built.
//! Quoting a key computes a confidence-weighted average over its bucket.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, trace};

use crate::ingredient_normalizer::normalize_key;
use crate::price_provider::{clamp01, IngredientPriceHint, PriceProvider, PriceQuote};

/// Identifier reported by the local hints provider
pub const LOCAL_HINTS_PROVIDER_ID: &str = "local-hints";

/// In-memory price provider over a set of price hints
///
/// # Aggregation
///
/// For a bucket of hints with effective confidences `c` and floored prices `p`:
///
/// - `price = Σ p·c / Σ c`, rounded to two decimals
/// - `confidence = Σ c / n`, the average confidence across the bucket
/// - `source` is the source of the first hint in the bucket
///
/// A bucket whose confidences all clamp to zero yields no quote.
///
/// # Thread Safety
///
/// The index sits behind an `RwLock`. Quotes take the read side and only
/// `insert` takes the write side, so concurrent quoting never contends.
#[derive(Debug)]
pub struct LocalHintsProvider {
    id: String,
    buckets: RwLock<HashMap<String, Vec<IngredientPriceHint>>>,
}

impl LocalHintsProvider {
    /// Build the index from a sequence of hints
    ///
    /// Hints whose ingredient normalizes to an empty key are skipped.
    ///
    /// ```rust
    /// use recipe_engine::local_hints::LocalHintsProvider;
    /// use recipe_engine::price_provider::{IngredientPriceHint, PriceProvider};
    ///
    /// let provider = LocalHintsProvider::new(vec![
    ///     IngredientPriceHint::new("Молоко", 60.0, "receipt").with_confidence(1.0),
    ///     IngredientPriceHint::new("молоко", 80.0, "shop").with_confidence(0.5),
    /// ]);
    ///
    /// let quote = provider.quote("молоко").unwrap();
    /// assert_eq!(quote.price_rub, 66.67);
    /// assert_eq!(quote.confidence, 0.75);
    /// assert!(provider.quote("неизвестно").is_none());
    /// ```
    pub fn new<I>(hints: I) -> Self
    where
        I: IntoIterator<Item = IngredientPriceHint>,
    {
        let mut buckets: HashMap<String, Vec<IngredientPriceHint>> = HashMap::new();
        let mut skipped = 0usize;

        for hint in hints {
            match normalize_key(&hint.ingredient) {
                Some(key) => buckets.entry(key).or_default().push(hint),
                None => {
                    skipped += 1;
                    debug!("Skipping price hint with non-indexable ingredient '{}'", hint.ingredient);
                }
            }
        }

        info!(
            "Built local hints index with {} ingredient keys ({} hints skipped)",
            buckets.len(),
            skipped
        );

        Self {
            id: LOCAL_HINTS_PROVIDER_ID.to_string(),
            buckets: RwLock::new(buckets),
        }
    }

    /// Override the provider identifier (useful when several hint sets are loaded)
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Load hints from a JSON array reader
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let hints: Vec<IngredientPriceHint> =
            serde_json::from_reader(reader).context("Failed to parse price hints JSON")?;
        Ok(Self::new(hints))
    }

    /// Load hints from a JSON file containing an array of hints
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open price hints file {}", path.display()))?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Append a hint after construction
    ///
    /// Returns `false` when the hint's ingredient is not indexable.
    pub fn insert(&self, hint: IngredientPriceHint) -> bool {
        let Some(key) = normalize_key(&hint.ingredient) else {
            debug!("Refusing to insert hint with non-indexable ingredient '{}'", hint.ingredient);
            return false;
        };

        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        buckets.entry(key).or_default().push(hint);
        true
    }

    /// Number of distinct ingredient keys in the index
    pub fn len(&self) -> usize {
        self.buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the index holds no ingredient keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of indexed ingredient keys
    pub fn keys(&self) -> Vec<String> {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = buckets.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Confidence-weighted aggregation over one bucket
fn aggregate_bucket(bucket: &[IngredientPriceHint]) -> Option<PriceQuote> {
    let first = bucket.first()?;

    let mut weighted_price = 0.0;
    let mut weight_sum = 0.0;
    for hint in bucket {
        let c = hint.effective_confidence();
        weighted_price += hint.effective_price() * c;
        weight_sum += c;
    }

    if weight_sum <= 0.0 {
        return None;
    }

    Some(PriceQuote::new(
        weighted_price / weight_sum,
        clamp01(weight_sum / bucket.len() as f64),
        &first.source,
    ))
}

impl PriceProvider for LocalHintsProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn quote(&self, ingredient_key: &str) -> Option<PriceQuote> {
        let key = normalize_key(ingredient_key)?;
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);

        let quote = buckets.get(&key).and_then(|bucket| aggregate_bucket(bucket));
        trace!("Local hints quote for '{}': {:?}", key, quote);
        quote
    }
}
