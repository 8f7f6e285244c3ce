// src/context/template.rs
// DOCUMENTATION: Template city declaration
// PURPOSE: Documented starting point for configuring a new city
//
// To rank a different city:
// 1. Copy this module next to brussels.rs (e.g. lyon.rs)
// 2. Fill in every field below with your city's data
// 3. Construct the CityContext from your config in main.rs
//
// The scoring engine consumes only the CityContext lookups, so no scoring
// code changes when a city is swapped.

#![allow(dead_code)]

use crate::models::DistrictTier::*;

use super::{AreaSpec, BoundingBox, CityConfig, GuideEntry, StreetSpec};

/// A minimal, fully-documented example city
/// DOCUMENTATION: Every field is required by CityContext::from_config;
/// empty vectors are valid for tables your city does not need (except
/// districts, which must name at least one).
pub fn template_config() -> CityConfig {
    CityConfig {
        // Basic identity and map defaults
        city_name: "Example City".to_string(),
        country: "Nowhere".to_string(),
        center: (45.0000, 5.0000),
        default_zoom: 13,

        // Records outside this box are dropped at feature engineering
        bounding_box: BoundingBox {
            min_lat: 44.9000,
            max_lat: 45.1000,
            min_lng: 4.9000,
            max_lng: 5.1000,
        },

        // Where tourists concentrate; the trap penalty is strongest here
        tourist_epicenter: (45.0000, 5.0000),
        tourist_epicenter_name: "Main Square".to_string(),
        tourist_trap_neighborhood: Some("Main Square".to_string()),

        // The expat/international bubble, if your city has one
        expat_center: (45.0100, 5.0200),
        expat_center_name: "Business District".to_string(),

        // Districts: name, centroid, tier. Every in-city point is assigned
        // to its nearest centroid.
        districts: vec![
            AreaSpec::new("Old Town", 45.0000, 5.0000, TouristHeavy),
            AreaSpec::new("Riverside", 45.0200, 5.0100, LocalFoodie),
            AreaSpec::new("North End", 45.0400, 4.9800, Underexplored),
        ],

        // Optional finer-grained areas. Radii (km, default 0.5) must be
        // tuned so that no two circles overlap.
        neighborhoods: vec![
            AreaSpec::new("Main Square", 45.0000, 5.0000, TouristTrap).with_radius(0.15),
            AreaSpec::new("Market Lane", 45.0210, 5.0120, LocalFoodie)
                .with_affinity(&["Regional"])
                .with_radius(0.2),
        ],

        // Streets with a known immigrant-community food identity
        diaspora_streets: vec![StreetSpec::new(
            "Harbour Road",
            45.0300,
            4.9900,
            0.2,
            &["Vietnamese"],
        )],

        // Fry-shop-equivalent weight per district tier
        tier_weights: vec![
            (TouristHeavy, 0.2),
            (TouristTrap, 0.0),
            (Mixed, 0.5),
            (LocalFoodie, 0.7),
            (DiasporaHub, 0.8),
            (Underexplored, 0.9),
            (ExpatBubble, 0.3),
        ],

        // Cuisine -> district -> authenticity in [0,1]
        diaspora_authenticity: vec![(
            "Vietnamese".to_string(),
            vec![("North End".to_string(), 1.0)],
        )],

        // Same shape for the city's own traditional cooking
        local_authenticity: vec![(
            "Regional".to_string(),
            vec![("Riverside".to_string(), 0.8)],
        )],

        diaspora_cuisines: vec!["Vietnamese".to_string()],
        local_cuisines: vec!["Regional".to_string()],

        // Cuisines rare in your city (weight in [0,1]; keep these honest,
        // rarity is a minor signal by design)
        rare_cuisines: vec![("Georgian".to_string(), 1.0)],

        // Regional specificity over umbrella labels
        cuisine_specificity: vec![("Regional".to_string(), 0.8)],

        // Case-insensitive regex fragments
        chain_patterns: vec![r"mcdonald".to_string(), r"burger king".to_string()],
        non_restaurant_patterns: vec![r"\bhotel\b".to_string(), r"supermarket".to_string()],

        hipster_keywords: vec!["fusion".to_string(), "concept".to_string()],
        non_restaurant_locations: vec!["station".to_string(), "casino".to_string()],

        // Guide tables. Use GuideEntry::exact for short names that would
        // otherwise match inside longer ones.
        michelin_stars: vec![(GuideEntry::word("the pearl"), 1)],
        value_guide: vec![GuideEntry::word("corner kitchen")],
        regional_guides: vec![(
            "regional_guide".to_string(),
            vec![GuideEntry::word("old mill")],
        )],

        // Institutions locals grew up with -> score in [0,1]
        local_institutions: vec![("old mill".to_string(), 0.9)],
        classic_fry_shops: vec![],

        family_name_patterns: vec![r"^chez\s".to_string()],

        // Identifier of the community-endorsement source, if any
        community_source: Some("reddit:examplecity".to_string()),
        timezone: "Europe/Paris".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::CityContext;
    use super::*;

    #[test]
    fn test_template_config_is_valid() {
        let ctx = CityContext::from_config(template_config()).expect("template must compile");
        assert!(ctx.in_city(45.0, 5.0));
        assert_eq!(ctx.district_of(45.0001, 5.0001), "Old Town");
    }
}
