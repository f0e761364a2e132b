use anyhow::{Context, Result};
use recipe_engine::cache_store::{spawn_sweeper, CacheStore};
use recipe_engine::config::{EngineConfig, LogFormat};
use recipe_engine::local_hints::LocalHintsProvider;
use recipe_engine::pricing::PriceBook;
use recipe_engine::ranker::RecommendationRanker;
use recipe_engine::recipe_model::{Recipe, RecommendPayload};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Read recipes from a JSON file, going through the cache first
async fn load_recipes(cache: &CacheStore<Arc<Vec<Recipe>>>, path: &str) -> Result<Arc<Vec<Recipe>>> {
    if let Some(recipes) = cache.get(path) {
        info!("Using cached recipes for {path}");
        return Ok(recipes);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recipes file {path}"))?;
    let recipes: Vec<Recipe> =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse recipes file {path}"))?;
    let recipes = Arc::new(recipes);

    cache.set(path, Arc::clone(&recipes));
    Ok(recipes)
}

fn query_from_env() -> Result<RecommendPayload> {
    if let Ok(path) = env::var("QUERY_FILE") {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read query file {path}"))?;
        return serde_json::from_str(&raw).with_context(|| format!("Failed to parse query file {path}"));
    }

    let ingredients = env::var("QUERY_INGREDIENTS").unwrap_or_default();
    let mut query = RecommendPayload {
        ingredients: ingredients
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        ..Default::default()
    };
    if let Ok(limit) = env::var("QUERY_LIMIT") {
        query.limit = Some(limit.trim().parse().context("QUERY_LIMIT must be a number")?);
    }
    Ok(query)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = EngineConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting recipe recommendation engine");

    let hints_path = env::var("HINTS_FILE").context("HINTS_FILE must be set")?;
    let recipe_paths = env::var("RECIPES_FILES").context("RECIPES_FILES must be set")?;

    let price_book = PriceBook::new().with_provider(LocalHintsProvider::from_json_file(&hints_path)?);
    let ranker = RecommendationRanker::with_weights(config.ranking)?;
    let cache: Arc<CacheStore<Arc<Vec<Recipe>>>> = Arc::new(CacheStore::new(config.cache.ttl_ms)?);

    let sweeper = (config.cache.sweep_interval_ms > 0).then(|| {
        spawn_sweeper(
            &cache,
            Duration::from_millis(config.cache.sweep_interval_ms),
        )
    });

    let mut candidates = Vec::new();
    for path in recipe_paths.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match load_recipes(&cache, path).await {
            Ok(recipes) => candidates.extend(recipes.iter().cloned()),
            Err(e) => warn!("Skipping recipe source {path}: {e:#}"),
        }
    }

    let query = query_from_env()?;
    info!(
        "Ranking {} candidate recipes for {} ingredients",
        candidates.len(),
        query.ingredients.len()
    );

    for (position, ranked) in ranker.rank_scored(&candidates, &query).iter().enumerate() {
        let estimate = price_book.estimate_recipe_cost(ranked.recipe);
        println!(
            "{}. {} (score {:.3}) ~{:.2} RUB, {:.0}% priced",
            position + 1,
            ranked.recipe.title,
            ranked.score.composite,
            estimate.total_rub,
            estimate.coverage() * 100.0
        );
    }

    if let Some(handle) = sweeper {
        handle.abort();
    }

    Ok(())
}
