//! # Recipe Recommendation & Pricing Engine
//!
//! Ranks recipes against a user's ingredients and nutrition goals, and estimates
//! their cost from price hints gathered across several sources.
//!
//! - [`ingredient_normalizer`]: canonical ingredient keys
//! - [`price_provider`] and [`local_hints`]: per-ingredient price quotes
//! - [`pricing`]: cross-provider merging and recipe cost estimates
//! - [`scoring`] and [`ranker`]: recipe ranking
//! - [`cache_store`]: TTL cache in front of recipe fetches

pub mod cache_store;
pub mod clock;
pub mod config;
pub mod errors;
pub mod ingredient_normalizer;
pub mod local_hints;
pub mod price_provider;
pub mod pricing;
pub mod ranker;
pub mod recipe_model;
pub mod scoring;
