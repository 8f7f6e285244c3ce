// src/services/reranker.rs
// DOCUMENTATION: Reranking driver
// PURPOSE: Orchestrate chain recheck, corpus statistics, scoring, filters
// and the final sort

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::context::CityContext;
use crate::models::{Restaurant, ScoredRestaurant};

use super::features::is_non_food_type;
use super::scoring::{CorpusStats, Scorer};

/// Counters surfaced after a reranking pass
#[derive(Debug, Default, Clone, Copy)]
pub struct RerankStats {
    pub chain_reclassified: u32,
    pub shops_filtered: u32,
    pub non_food_filtered: u32,
}

/// Run the full reranking protocol over a featured corpus
/// DOCUMENTATION: (1) district assignment, (2) monotone chain recheck,
/// (3) corpus statistics, (4) scoring (parallel over records), (5) column
/// materialization, (6) shop filter, (7) non-food filter, (8) sort by
/// composite, stable tie-break on original index.
pub fn rerank(
    mut restaurants: Vec<Restaurant>,
    ctx: &CityContext,
    community: &HashMap<String, u32>,
    hygiene: &HashSet<String>,
) -> (Vec<ScoredRestaurant>, RerankStats) {
    let mut stats = RerankStats::default();

    // (1) District assignment for the statistics pass
    let districts: Vec<String> = restaurants
        .iter()
        .map(|r| ctx.district_of(r.lat, r.lng).to_string())
        .collect();

    // (2) Chain recheck: may only add to the chain set, never declassify
    for r in &mut restaurants {
        if !r.is_chain && ctx.chain_match(&r.name) {
            r.is_chain = true;
            stats.chain_reclassified += 1;
        }
    }
    if stats.chain_reclassified > 0 {
        log::info!(
            "Chain recheck reclassified {} records",
            stats.chain_reclassified
        );
    }

    // (3) District review totals and district x cuisine counts
    let corpus_stats = CorpusStats::compute(&restaurants, &districts);

    // (4) Score every record; inputs are read-only and shared
    let scorer = Scorer::new(ctx, &corpus_stats, community, hygiene);
    let results: Vec<_> = restaurants.par_iter().map(|r| scorer.score(r)).collect();

    // (5) Materialize scored records with their original index
    let mut scored: Vec<ScoredRestaurant> = restaurants
        .into_iter()
        .zip(results)
        .enumerate()
        .map(|(original_index, (restaurant, score))| ScoredRestaurant {
            restaurant,
            score,
            original_index,
        })
        .collect();

    // (6) + (7) Categorical exclusions: shops and non-food types are
    // removed, not merely downweighted
    scored.retain(|s| {
        if ctx.non_restaurant_shop(&s.restaurant.name) {
            stats.shops_filtered += 1;
            return false;
        }
        if s.restaurant
            .primary_type
            .as_deref()
            .map_or(false, is_non_food_type)
        {
            stats.non_food_filtered += 1;
            return false;
        }
        true
    });
    if stats.shops_filtered + stats.non_food_filtered > 0 {
        log::info!(
            "Filtered {} shop-name and {} non-food records from the output",
            stats.shops_filtered,
            stats.non_food_filtered
        );
    }

    // (8) Descending composite, stable tie-break on original index
    scored.sort_by(|a, b| {
        b.score
            .composite
            .partial_cmp(&a.score.composite)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.original_index.cmp(&b.original_index))
    });

    (scored, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{brussels_config, CityContext};
    use crate::models::{HoursSummary, VenueType};
    use h3o::{LatLng, Resolution};

    fn ctx() -> CityContext {
        CityContext::from_config(brussels_config()).unwrap()
    }

    fn restaurant(name: &str, lat: f64, lng: f64, rating: f64, reviews: u32) -> Restaurant {
        Restaurant {
            id: format!("id-{}", name),
            name: name.to_string(),
            address: None,
            lat,
            lng,
            rating,
            review_count: reviews,
            types: vec![],
            primary_type: Some("restaurant".to_string()),
            website: None,
            google_maps_url: None,
            opening_hours: None,
            review_languages: None,
            cuisine: "Other".to_string(),
            venue_type: VenueType::Restaurant,
            price_numeric: 2,
            is_chain: false,
            log_review_count: (f64::from(reviews) + 1.0).ln(),
            hours: HoursSummary::unknown(),
            hex_index: LatLng::new(lat, lng).unwrap().to_cell(Resolution::Eight),
            hex_restaurant_count: 1,
            hex_mean_rating: rating,
            hex_cuisine_entropy: 0.0,
            hex_chain_share: 0.0,
            predicted_rating: None,
            residual: 0.0,
        }
    }

    fn rerank_simple(records: Vec<Restaurant>) -> (Vec<ScoredRestaurant>, RerankStats) {
        let ctx = ctx();
        rerank(records, &ctx, &HashMap::new(), &HashSet::new())
    }

    #[test]
    fn test_chain_recheck_is_monotone() {
        // One record pre-flagged, one flagged only by the recheck, one clean
        let mut pre_flagged = restaurant("Grill Royal", 50.84, 4.36, 4.1, 300);
        pre_flagged.is_chain = true;
        let records = vec![
            pre_flagged,
            restaurant("EXKI Schuman", 50.843, 4.381, 3.9, 400),
            restaurant("Chez Lucie", 50.82, 4.35, 4.4, 120),
        ];
        let before: std::collections::HashSet<String> = records
            .iter()
            .filter(|r| r.is_chain)
            .map(|r| r.id.clone())
            .collect();

        let (scored, stats) = rerank_simple(records);
        let after: std::collections::HashSet<String> = scored
            .iter()
            .filter(|s| s.restaurant.is_chain)
            .map(|s| s.restaurant.id.clone())
            .collect();

        assert!(after.is_superset(&before));
        assert_eq!(stats.chain_reclassified, 1);
        assert!(after.contains("id-EXKI Schuman"));
    }

    #[test]
    fn test_shop_and_non_food_exclusion() {
        let mut store = restaurant("Neuhaus", 50.8467, 4.3525, 4.6, 900);
        store.primary_type = Some("store".to_string());
        let mut hotel = restaurant("Le Grand Lit", 50.84, 4.35, 4.0, 200);
        hotel.primary_type = Some("hotel".to_string());
        let records = vec![
            store,
            hotel,
            restaurant("Fin de Siècle", 50.8503, 4.3430, 4.4, 800),
        ];

        let ctx = ctx();
        let (scored, stats) = rerank(records, &ctx, &HashMap::new(), &HashSet::new());

        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].restaurant.name, "Fin de Siècle");
        assert!(stats.shops_filtered >= 1);
        assert!(stats.non_food_filtered >= 1);
        for s in &scored {
            assert!(!ctx.non_restaurant_shop(&s.restaurant.name));
        }
    }

    #[test]
    fn test_sort_is_descending_with_stable_ties() {
        let records = vec![
            restaurant("Alpha", 50.82, 4.35, 4.2, 150),
            restaurant("Beta", 50.8201, 4.3501, 4.2, 150),
            restaurant("Gamma", 50.81, 4.34, 4.8, 150),
        ];
        let (scored, _) = rerank_simple(records);

        for pair in scored.windows(2) {
            let ordered = pair[0].score.composite > pair[1].score.composite
                || (pair[0].score.composite == pair[1].score.composite
                    && pair[0].original_index < pair[1].original_index);
            assert!(ordered, "output not deterministically sorted");
        }
    }

    #[test]
    fn test_rerank_is_deterministic_under_parallelism() {
        let build = || {
            (0..40)
                .map(|i| {
                    restaurant(
                        &format!("R{}", i),
                        50.80 + (i % 8) as f64 * 0.01,
                        4.31 + (i % 5) as f64 * 0.02,
                        3.8 + (i % 5) as f64 * 0.25,
                        30 + i * 17,
                    )
                })
                .collect::<Vec<_>>()
        };
        let (a, _) = rerank_simple(build());
        let (b, _) = rerank_simple(build());
        let ids_a: Vec<&str> = a.iter().map(|s| s.restaurant.id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|s| s.restaurant.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }
}
