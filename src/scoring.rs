//! # Ranking Scorer Module
//!
//! Pure scoring primitives used to rank recipes against a query, and the
//! weighted combination that turns them into one composite score.

use std::collections::HashSet;

use crate::errors::EngineError;
use crate::recipe_model::{Nutrition, NutritionTargets};

/// Decay constant of the nutrition fit curve
pub const NUTRITION_DECAY: f64 = 2.0;

/// Score returned when a nutrition target or value is unknown
pub const NEUTRAL_FIT: f64 = 0.5;

/// Default weight of the ingredient overlap component
pub const DEFAULT_OVERLAP_WEIGHT: f64 = 0.7;

/// Default weight of the nutrition fit component
pub const DEFAULT_NUTRITION_WEIGHT: f64 = 0.3;

/// Fraction of `target` items present in `candidate`
///
/// Items are compared after lower-casing and collapsing whitespace runs. An
/// empty target scores `0`: no stated requirement counts as none met.
///
/// ```rust
/// use recipe_engine::scoring::overlap_score;
///
/// assert_eq!(overlap_score(&["Яйцо", "молоко"], &["яйцо ", "мука"]), 0.5);
/// assert_eq!(overlap_score(&["olive oil"], &["Olive  oil"]), 1.0);
/// assert_eq!(overlap_score::<&str, &str>(&[], &["яйцо"]), 0.0);
/// ```
pub fn overlap_score<T, C>(target: &[T], candidate: &[C]) -> f64
where
    T: AsRef<str>,
    C: AsRef<str>,
{
    if target.is_empty() {
        return 0.0;
    }

    let available: HashSet<String> = candidate.iter().map(|item| fold_item(item.as_ref())).collect();

    let hits = target
        .iter()
        .filter(|item| available.contains(&fold_item(item.as_ref())))
        .count();

    hits as f64 / target.len() as f64
}

fn fold_item(item: &str) -> String {
    item.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// How closely `actual` matches `target`
///
/// Either side missing or not finite scores [`NEUTRAL_FIT`]. Otherwise
/// `exp(-2 * |target - actual| / max(target, 1))`, always within `(0, 1]`.
pub fn nutrition_fit(target: Option<f64>, actual: Option<f64>) -> f64 {
    let (Some(target), Some(actual)) = (
        target.filter(|v| v.is_finite()),
        actual.filter(|v| v.is_finite()),
    ) else {
        return NEUTRAL_FIT;
    };

    let diff = (target - actual).abs() / target.max(1.0);
    (-NUTRITION_DECAY * diff).exp()
}

/// Mean nutrition fit over the macros the query sets, `None` when it sets none
pub fn nutrition_component(targets: &NutritionTargets, nutrition: &Nutrition) -> Option<f64> {
    let pairs = [
        (targets.kcal, nutrition.kcal),
        (targets.protein, nutrition.protein),
        (targets.fat, nutrition.fat),
        (targets.carbs, nutrition.carbs),
    ];

    let fits: Vec<f64> = pairs
        .iter()
        .filter(|(target, _)| target.is_some())
        .map(|(target, actual)| nutrition_fit(*target, *actual))
        .collect();

    if fits.is_empty() {
        None
    } else {
        Some(fits.iter().sum::<f64>() / fits.len() as f64)
    }
}

/// Weights of the composite score components
///
/// Both weights must be finite and non-negative, which keeps the composite
/// monotonic in each component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    /// Weight for ingredient overlap (default: 0.7)
    pub overlap: f64,
    /// Weight for nutrition fit (default: 0.3)
    pub nutrition: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            overlap: DEFAULT_OVERLAP_WEIGHT,
            nutrition: DEFAULT_NUTRITION_WEIGHT,
        }
    }
}

impl RankingWeights {
    /// Create validated weights
    pub fn new(overlap: f64, nutrition: f64) -> Result<Self, EngineError> {
        let weights = Self { overlap, nutrition };
        weights.validate()?;
        Ok(weights)
    }

    /// Check that both weights are finite and non-negative
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [("overlap", self.overlap), ("nutrition", self.nutrition)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidWeights(format!(
                    "{name} weight must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Sub-scores and composite for one recipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub overlap: f64,
    /// `None` when the query sets no nutrition target
    pub nutrition: Option<f64>,
    pub composite: f64,
}

/// Combines sub-scores into the composite ranking value
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    weights: RankingWeights,
}

impl CompositeScorer {
    /// Create a scorer with default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom weights
    pub fn with_weights(weights: RankingWeights) -> Result<Self, EngineError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> RankingWeights {
        self.weights
    }

    /// Weighted sum of the components; an absent nutrition component adds nothing
    pub fn combine(&self, overlap: f64, nutrition: Option<f64>) -> ScoreBreakdown {
        let composite =
            overlap * self.weights.overlap + nutrition.unwrap_or(0.0) * self.weights.nutrition;

        ScoreBreakdown {
            overlap,
            nutrition,
            composite,
        }
    }
}
