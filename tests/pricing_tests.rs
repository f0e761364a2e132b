//! # Pricing Tests Module
//!
//! Test suite for price hint aggregation, multi-provider merging and recipe
//! cost estimation, including loading hints from disk.

#[cfg(test)]
mod tests {
    use recipe_engine::local_hints::LocalHintsProvider;
    use recipe_engine::price_provider::{IngredientPriceHint, PriceProvider, PriceQuote};
    use recipe_engine::pricing::{ConfidenceWeightedMerge, PriceBook};
    use recipe_engine::recipe_model::Recipe;
    use std::io::Write;
    use std::sync::Arc;
    use std::thread;
    use tempfile::NamedTempFile;

    /// Provider standing in for an external price API
    struct CatalogProvider;

    impl PriceProvider for CatalogProvider {
        fn id(&self) -> &str {
            "catalog-api"
        }

        fn quote(&self, ingredient_key: &str) -> Option<PriceQuote> {
            match ingredient_key {
                "молоко" => Some(PriceQuote::new(90.0, 0.5, "catalog")),
                "масло сливочное" => Some(PriceQuote::new(210.0, 0.9, "catalog")),
                _ => None,
            }
        }
    }

    /// Test the reference aggregation example
    #[test]
    fn test_milk_aggregation() {
        let provider = LocalHintsProvider::new(vec![
            IngredientPriceHint::new("молоко", 60.0, "receipt").with_confidence(1.0),
            IngredientPriceHint::new("молоко", 80.0, "shop").with_confidence(0.5),
        ]);

        let quote = provider.quote("молоко").unwrap();
        assert_eq!(quote.price_rub, 66.67);
        assert_eq!(quote.confidence, 0.75);
        assert!(provider.quote("неизвестно").is_none());
    }

    /// Test loading hints from a JSON file
    #[test]
    fn test_hints_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"ingredient": "Масло сливочное", "priceRub": 190, "confidence": 1.0, "source": "receipt"}},
                {{"ingredient": "масло  сливочное!", "priceRub": 230, "confidence": 1.0, "source": "shop"}},
                {{"ingredient": "Кефир", "priceRub": 95, "source": "shop"}}
            ]"#
        )
        .unwrap();

        let provider = LocalHintsProvider::from_json_file(file.path()).unwrap();
        assert_eq!(provider.len(), 2);
        assert_eq!(provider.quote("масло сливочное").unwrap().price_rub, 210.0);
        assert_eq!(provider.quote("кефир").unwrap().confidence, 0.75);
    }

    /// Test that a missing file surfaces an error with context
    #[test]
    fn test_hints_from_missing_file() {
        let err = LocalHintsProvider::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Failed to open price hints file"));
    }

    /// Test merging local hints with an external provider
    #[test]
    fn test_local_and_external_providers() {
        let book = PriceBook::new()
            .with_merger(ConfidenceWeightedMerge)
            .with_provider(LocalHintsProvider::new(vec![
                IngredientPriceHint::new("Молоко", 60.0, "receipt").with_confidence(1.0),
            ]))
            .with_provider(CatalogProvider);

        let merged = book.quote("МОЛОКО").unwrap();
        // (60*1 + 90*0.5) / 1.5
        assert_eq!(merged.quote.price_rub, 70.0);
        assert_eq!(merged.quote.confidence, 0.75);
        assert_eq!(merged.quote.source, "receipt+catalog");
        assert_eq!(merged.contributors, vec!["local-hints".to_string(), "catalog-api".to_string()]);
    }

    /// Test a full recipe estimate across providers
    #[test]
    fn test_recipe_estimate_across_providers() {
        let book = PriceBook::new()
            .with_provider(LocalHintsProvider::new(vec![
                IngredientPriceHint::new("мука", 50.0, "magnit").with_confidence(1.0),
            ]))
            .with_provider(CatalogProvider);
        let recipe = Recipe::new("pirog", "Пирог").with_ingredients(&["Мука", "Масло сливочное", "Шафран"]);

        let estimate = book.estimate_recipe_cost(&recipe);
        assert_eq!(estimate.total_rub, 260.0);
        assert_eq!(estimate.unpriced, vec!["Шафран".to_string()]);
        assert!((estimate.confidence - 0.95).abs() < 1e-9);

        let json = serde_json::to_value(&estimate).unwrap();
        assert_eq!(json["totalRub"], 260.0);
        assert_eq!(json["priced"][1]["normalizedKey"], "масло сливочное");
    }

    /// Test concurrent quoting while hints are being inserted
    #[test]
    fn test_concurrent_quotes_and_inserts() {
        let provider = Arc::new(LocalHintsProvider::new(vec![
            IngredientPriceHint::new("рис", 100.0, "shop").with_confidence(1.0),
        ]));

        let mut handles = Vec::new();
        for i in 0..4 {
            let provider = Arc::clone(&provider);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let quote = provider.quote("рис").unwrap();
                    assert_eq!(quote.price_rub, 100.0);
                }
                provider.insert(IngredientPriceHint::new(&format!("крупа {i}"), 10.0, "shop"));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(provider.len(), 5);
    }
}
