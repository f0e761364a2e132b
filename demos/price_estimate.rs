//! # Price Estimate Example
//!
//! This example builds a price book from a handful of hints, ranks a few
//! recipes against a query and prints each recipe's estimated cost.

use recipe_engine::local_hints::LocalHintsProvider;
use recipe_engine::price_provider::IngredientPriceHint;
use recipe_engine::pricing::PriceBook;
use recipe_engine::ranker::RecommendationRanker;
use recipe_engine::recipe_model::{Nutrition, NutritionTargets, Recipe, RecommendPayload};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Recipe Price Estimate Example");
    println!("================================\n");

    let hints = vec![
        IngredientPriceHint::new("Молоко", 60.0, "receipt").with_confidence(1.0),
        IngredientPriceHint::new("молоко", 80.0, "perekrestok").with_confidence(0.5),
        IngredientPriceHint::new("Яйцо", 11.5, "receipt"),
        IngredientPriceHint::new("Мука", 55.0, "magnit").with_confidence(0.9),
        IngredientPriceHint::new("Творог", 140.0, "vkusvill").with_confidence(0.8),
        IngredientPriceHint::new("Сахар", 75.0, "magnit"),
    ];
    let book = PriceBook::new().with_provider(LocalHintsProvider::new(hints));

    let recipes = vec![
        Recipe::new("bliny", "Блины")
            .with_ingredients(&["Молоко", "Яйцо", "Мука", "Сахар", "Соль"])
            .with_nutrition(Nutrition { kcal: Some(230.0), protein: Some(7.0), ..Default::default() }),
        Recipe::new("syrniki", "Сырники")
            .with_ingredients(&["Творог", "Яйцо", "Мука", "Сахар"])
            .with_nutrition(Nutrition { kcal: Some(260.0), protein: Some(18.0), ..Default::default() }),
        Recipe::new("omlet", "Омлет")
            .with_ingredients(&["Яйцо", "Молоко"])
            .with_nutrition(Nutrition { kcal: Some(180.0), protein: Some(12.0), ..Default::default() }),
    ];

    let query = RecommendPayload::new(&["яйцо", "творог"]).with_targets(NutritionTargets {
        protein: Some(20.0),
        ..Default::default()
    });

    let ranker = RecommendationRanker::new();
    for (i, ranked) in ranker.rank_scored(&recipes, &query).iter().enumerate() {
        let estimate = book.estimate_recipe_cost(ranked.recipe);
        println!(
            "  {}. {} → score {:.3}, {:.2} RUB (confidence {:.0}%)",
            i + 1,
            ranked.recipe.title,
            ranked.score.composite,
            estimate.total_rub,
            estimate.confidence * 100.0
        );
        if !estimate.unpriced.is_empty() {
            println!("     no price for: {}", estimate.unpriced.join(", "));
        }
    }

    Ok(())
}
