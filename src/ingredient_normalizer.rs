//! # Ingredient Normalizer Module
//!
//! Canonicalizes free-text ingredient names into stable lookup keys so that
//! price hints, recipe ingredient lines and user queries coming from different
//! sources can be compared.
//!
//! ## Rules
//!
//! - Lower-case the input (Cyrillic and Latin alike)
//! - Fold `ё` into `е`
//! - Replace every run of characters that are not letters, marks or digits with one space
//! - Trim the result
//!
//! The output only contains lower-case letters, digits and single inner spaces,
//! so normalizing a key again returns the same key.
//!
//! ```rust
//! use recipe_engine::ingredient_normalizer::normalize;
//!
//! assert_eq!(normalize("  Молоко, 3.2% ").normalized_key, "молоко 3 2");
//! assert_eq!(normalize("Sour-Cream").normalized_key, "sour cream");
//! assert!(!normalize("...").is_indexable());
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

// Anything that is not a letter, a combining mark or a digit separates words
const SEPARATOR_PATTERN: &str = r"[^\p{L}\p{M}\p{N}]+";

lazy_static! {
    static ref SEPARATOR_REGEX: Regex =
        Regex::new(SEPARATOR_PATTERN).expect("Separator pattern should be valid");
}

/// Canonical lookup form of an ingredient name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIngredient {
    /// Normalized key; empty means the input must not be indexed
    pub normalized_key: String,
}

impl NormalizedIngredient {
    /// Whether this key may be used as an index bucket
    pub fn is_indexable(&self) -> bool {
        !self.normalized_key.is_empty()
    }

    /// Consume into the key, or `None` for the empty sentinel
    pub fn into_key(self) -> Option<String> {
        if self.is_indexable() {
            Some(self.normalized_key)
        } else {
            None
        }
    }
}

/// Normalize a raw ingredient string
///
/// Pure and thread-safe. Blank or punctuation-only input yields an empty key.
pub fn normalize(raw: &str) -> NormalizedIngredient {
    let lowered = raw.trim().to_lowercase().replace('ё', "е");
    let normalized_key = SEPARATOR_REGEX
        .replace_all(&lowered, " ")
        .trim()
        .to_string();

    trace!("Normalized ingredient '{}' -> '{}'", raw, normalized_key);

    NormalizedIngredient { normalized_key }
}

/// Normalize and return the key only when it is indexable
pub fn normalize_key(raw: &str) -> Option<String> {
    normalize(raw).into_key()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_lowercases() {
        assert_eq!(normalize("  Молоко  ").normalized_key, "молоко");
        assert_eq!(normalize("FLOUR").normalized_key, "flour");
    }

    #[test]
    fn test_folds_yo() {
        assert_eq!(normalize("Свёкла").normalized_key, "свекла");
        assert_eq!(normalize("ЁЖИК").normalized_key, normalize("ежик").normalized_key);
    }

    #[test]
    fn test_collapses_punctuation_and_whitespace() {
        assert_eq!(normalize("сыр,  твёрдый!!").normalized_key, "сыр твердый");
        assert_eq!(normalize("olive\toil\n").normalized_key, "olive oil");
        assert_eq!(normalize("(яйцо)").normalized_key, "яйцо");
    }

    #[test]
    fn test_blank_and_punctuation_only_are_not_indexable() {
        for raw in ["", "   ", "...", "— , ;", "\t\n"] {
            let normalized = normalize(raw);
            assert!(!normalized.is_indexable(), "'{raw}' should not be indexable");
            assert_eq!(normalize_key(raw), None);
        }
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "  Молоко 3,2% ",
            "Sour-Cream",
            "ёлка",
            "Crème fraîche",
            "İstanbul spice",
            "ß straße",
            "!!!",
            "2 cups all-purpose flour",
        ];
        for raw in samples {
            let once = normalize(raw);
            let twice = normalize(&once.normalized_key);
            assert_eq!(once, twice, "normalization of '{raw}' is not idempotent");
        }
    }

    #[test]
    fn test_keeps_digits() {
        assert_eq!(normalize("Milk 2.5%").normalized_key, "milk 2 5");
    }
}
