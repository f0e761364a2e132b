//! # Recipe and Query Data Model
//!
//! This module defines the recipe records produced by scraping (or mock data)
//! and the query payload callers send to the ranker.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_engine::recipe_model::{NutritionTargets, Recipe, RecommendPayload};
//!
//! let recipe = Recipe::new("syrniki", "Сырники")
//!     .with_ingredients(&["Творог", "Яйцо", "Мука"])
//!     .with_tag("breakfast");
//!
//! let query = RecommendPayload::new(&["творог", "яйцо"])
//!     .with_targets(NutritionTargets { protein: Some(25.0), ..Default::default() });
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-serving nutrition facts; any value may be unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub kcal: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
}

/// A scraped recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default, rename = "imageURL", alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default, rename = "sourceURL", alias = "sourceUrl")]
    pub source_url: Option<String>,
    /// Ingredient lines in recipe order
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Instruction steps in recipe order
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub nutrition: Nutrition,
    /// Estimated total cost in roubles, when priced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Recipe {
    /// Create a recipe with just an id and a title
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            image_url: None,
            source_name: None,
            source_url: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            nutrition: Nutrition::default(),
            estimated_cost: None,
            tags: BTreeSet::new(),
        }
    }

    /// Set the ingredient lines
    pub fn with_ingredients(mut self, ingredients: &[&str]) -> Self {
        self.ingredients = ingredients.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set the instruction steps
    pub fn with_instructions(mut self, instructions: &[&str]) -> Self {
        self.instructions = instructions.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set the nutrition facts
    pub fn with_nutrition(mut self, nutrition: Nutrition) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Record where the recipe was scraped from
    pub fn with_source(mut self, name: &str, url: &str) -> Self {
        self.source_name = Some(name.to_string());
        self.source_url = Some(url.to_string());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }
}

/// Optional per-macro targets of a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub kcal: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
}

impl NutritionTargets {
    /// Whether the query asks for any macro at all
    pub fn is_empty(&self) -> bool {
        self.kcal.is_none() && self.protein.is_none() && self.fat.is_none() && self.carbs.is_none()
    }
}

/// The query a caller ranks recipes against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendPayload {
    /// Ingredients the user has or wants to use
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Nutrition goals, per macro
    #[serde(default)]
    pub targets: NutritionTargets,
    /// Maximum number of recipes to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl RecommendPayload {
    /// Create a query from desired ingredients
    pub fn new(ingredients: &[&str]) -> Self {
        Self {
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Set nutrition targets
    pub fn with_targets(mut self, targets: NutritionTargets) -> Self {
        self.targets = targets;
        self
    }

    /// Cap the number of results
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
