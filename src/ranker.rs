//! # Recommendation Ranker Module
//!
//! Orders candidate recipes by how well they match a query. Ingredient lines
//! on both sides are reduced to normalized keys before overlap is measured, so
//! "Яйцо, 2 шт." in a recipe and "яйцо" in a query are compared on equal terms
//! only when their keys agree.

use tracing::debug;

use crate::errors::EngineError;
use crate::ingredient_normalizer::normalize_key;
use crate::recipe_model::{Recipe, RecommendPayload};
use crate::scoring::{nutrition_component, overlap_score, CompositeScorer, RankingWeights, ScoreBreakdown};

/// A recipe together with the scores that placed it
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecipe<'a> {
    pub recipe: &'a Recipe,
    pub score: ScoreBreakdown,
    /// Position of the recipe in the input slice
    pub input_index: usize,
}

/// Ranks recipes with a fixed set of weights
#[derive(Debug, Clone, Default)]
pub struct RecommendationRanker {
    scorer: CompositeScorer,
}

impl RecommendationRanker {
    /// Create a ranker with default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ranker with custom weights
    pub fn with_weights(weights: RankingWeights) -> Result<Self, EngineError> {
        Ok(Self {
            scorer: CompositeScorer::with_weights(weights)?,
        })
    }

    /// Score a single recipe against the query
    pub fn score(&self, recipe: &Recipe, query: &RecommendPayload) -> ScoreBreakdown {
        let wanted = normalized_keys(&query.ingredients);
        self.score_with_keys(recipe, &wanted, query)
    }

    fn score_with_keys(&self, recipe: &Recipe, wanted: &[String], query: &RecommendPayload) -> ScoreBreakdown {
        let available = normalized_keys(&recipe.ingredients);
        let overlap = overlap_score(wanted, &available);
        let nutrition = nutrition_component(&query.targets, &recipe.nutrition);
        self.scorer.combine(overlap, nutrition)
    }

    /// Score every recipe and order by descending composite
    ///
    /// The sort is stable: equal composites keep their input order. The
    /// query's `limit`, when set, truncates the result.
    pub fn rank_scored<'a>(&self, recipes: &'a [Recipe], query: &RecommendPayload) -> Vec<RankedRecipe<'a>> {
        let wanted = normalized_keys(&query.ingredients);

        let mut ranked: Vec<RankedRecipe<'a>> = recipes
            .iter()
            .enumerate()
            .map(|(input_index, recipe)| RankedRecipe {
                recipe,
                score: self.score_with_keys(recipe, &wanted, query),
                input_index,
            })
            .collect();

        ranked.sort_by(|a, b| b.score.composite.total_cmp(&a.score.composite));

        if let Some(limit) = query.limit {
            ranked.truncate(limit);
        }

        debug!(
            "Ranked {} recipes against {} wanted ingredients, returning {}",
            recipes.len(),
            wanted.len(),
            ranked.len()
        );

        ranked
    }

    /// Ordered copies of the recipes, best match first
    pub fn rank(&self, recipes: &[Recipe], query: &RecommendPayload) -> Vec<Recipe> {
        self.rank_scored(recipes, query)
            .into_iter()
            .map(|ranked| ranked.recipe.clone())
            .collect()
    }
}

/// Rank with default weights
///
/// ```rust
/// use recipe_engine::ranker::rank;
/// use recipe_engine::recipe_model::{Recipe, RecommendPayload};
///
/// let recipes = vec![
///     Recipe::new("salad", "Салат").with_ingredients(&["Огурец", "Помидор"]),
///     Recipe::new("omelette", "Омлет").with_ingredients(&["Яйцо", "Молоко"]),
/// ];
/// let ranked = rank(&recipes, &RecommendPayload::new(&["яйцо", "молоко"]));
///
/// assert_eq!(ranked[0].id, "omelette");
/// ```
pub fn rank(recipes: &[Recipe], query: &RecommendPayload) -> Vec<Recipe> {
    RecommendationRanker::new().rank(recipes, query)
}

fn normalized_keys(items: &[String]) -> Vec<String> {
    items.iter().filter_map(|item| normalize_key(item)).collect()
}
