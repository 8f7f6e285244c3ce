// src/models/row.rs
// DOCUMENTATION: Response DTOs for the query surface
// PURPOSE: The authoritative column set a downstream consumer may depend on

use serde::Serialize;

use super::{Restaurant, ScoreResult};

/// A scored restaurant: the unit stored in the corpus snapshot
#[derive(Debug, Clone)]
pub struct ScoredRestaurant {
    pub restaurant: Restaurant,
    pub score: ScoreResult,
    /// Position in the pre-sort corpus, used as the stable tie-break
    pub original_index: usize,
}

/// Flat row schema for API responses and exports
/// DOCUMENTATION: Missing optional fields serialize as null, never NaN.
/// Column names are stable; downstream consumers depend on them.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantRow {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: f64,
    pub review_count: u32,
    pub cuisine: String,
    pub venue_type: String,
    pub price_numeric: u8,
    pub is_chain: bool,
    pub predicted_rating: Option<f64>,
    pub residual: f64,
    pub canonical_provider_url: Option<String>,

    pub district: String,
    pub neighborhood: Option<String>,
    pub diaspora_street: Option<String>,
    pub district_tier: String,
    pub restaurant_tier: String,
    pub composite_score: f64,

    // Named scoring components
    pub score_base_quality: f64,
    pub score_ml_residual: f64,
    pub score_scarcity: f64,
    pub score_independent: f64,
    pub score_guide_recognition: f64,
    pub score_diaspora: f64,
    pub score_reddit_community: f64,
    pub score_bruxellois_local: f64,
    pub score_family_name: f64,
    pub score_specificity: f64,
    pub score_cuisine_rarity: f64,
    pub score_review_adjustment: f64,
    pub score_value_bonus: f64,
    pub score_tourist_trap: f64,
    pub score_chain: f64,
    pub score_low_review: f64,
    pub score_expat_bubble: f64,
    pub score_price_quality: f64,
    pub score_non_restaurant: f64,

    // Scarcity sub-components
    pub scarcity_review_scarcity: f64,
    pub scarcity_horseshoe_bonus: f64,
    pub scarcity_cuisine_rarity: f64,
    pub horseshoe_type: Option<String>,

    // Hours flags
    pub closes_early: bool,
    pub typical_close_hour: Option<f64>,
    pub weekdays_only: bool,
    pub closed_sunday: bool,
    pub days_open_count: Option<u8>,

    pub is_rare_cuisine: bool,
    pub opening_hours: Option<Vec<String>>,

    // Guide and community markers
    pub michelin_stars: u8,
    pub value_guide_flag: bool,
    pub regional_guide_flag: bool,
    pub community_mentions: u32,
    pub hygiene_flag: bool,
}

impl RestaurantRow {
    /// Materialize the flat row from a scored record
    pub fn from_scored(scored: &ScoredRestaurant) -> Self {
        let r = &scored.restaurant;
        let s = &scored.score;
        let b = &s.breakdown;

        RestaurantRow {
            id: r.id.clone(),
            name: r.name.clone(),
            address: r.address.clone(),
            lat: r.lat,
            lng: r.lng,
            rating: r.rating,
            review_count: r.review_count,
            cuisine: r.cuisine.clone(),
            venue_type: r.venue_type.as_str().to_string(),
            price_numeric: r.price_numeric,
            is_chain: r.is_chain,
            predicted_rating: r.predicted_rating,
            residual: r.residual,
            canonical_provider_url: r.google_maps_url.clone(),

            district: s.district.clone(),
            neighborhood: s.neighborhood.clone(),
            diaspora_street: s.diaspora_street.clone(),
            district_tier: s.district_tier.as_str().to_string(),
            restaurant_tier: s.tier.as_str().to_string(),
            composite_score: s.composite,

            score_base_quality: b.base_quality,
            score_ml_residual: b.ml_residual,
            score_scarcity: b.scarcity,
            score_independent: b.independent,
            score_guide_recognition: b.guide_recognition,
            score_diaspora: b.diaspora,
            score_reddit_community: b.reddit_community,
            score_bruxellois_local: b.bruxellois_local,
            score_family_name: b.family_name,
            score_specificity: b.specificity,
            score_cuisine_rarity: b.cuisine_rarity,
            score_review_adjustment: b.review_adjustment,
            score_value_bonus: b.value_bonus,
            score_tourist_trap: b.tourist_trap,
            score_chain: b.chain,
            score_low_review: b.low_review,
            score_expat_bubble: b.expat_bubble,
            score_price_quality: b.price_quality,
            score_non_restaurant: b.non_restaurant,

            scarcity_review_scarcity: s.scarcity.review_scarcity,
            scarcity_horseshoe_bonus: s.scarcity.horseshoe_bonus,
            scarcity_cuisine_rarity: s.scarcity.cuisine_rarity,
            horseshoe_type: s.scarcity.horseshoe_type.map(|t| t.as_str().to_string()),

            closes_early: r.hours.closes_early,
            typical_close_hour: r.hours.typical_close_hour,
            weekdays_only: r.hours.weekdays_only,
            closed_sunday: r.hours.closed_sunday,
            days_open_count: r.hours.days_open_count,

            is_rare_cuisine: s.scarcity.cuisine_rarity > 0.0,
            opening_hours: r.opening_hours.clone(),

            michelin_stars: s.michelin_stars,
            value_guide_flag: s.value_guide,
            regional_guide_flag: s.regional_guide,
            community_mentions: s.community_mentions,
            hygiene_flag: s.hygiene,
        }
    }
}
