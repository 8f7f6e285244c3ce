// src/services/features.rs
// DOCUMENTATION: Feature engineering pipeline
// PURPOSE: Transform raw provider records into fully-typed restaurants

use std::collections::HashMap;

use h3o::{LatLng, Resolution};

use crate::context::CityContext;
use crate::models::{RawPlace, Restaurant, VenueType};

use super::hours::parse_hours;

/// Hex resolution for spatial features (~0.7 km² cells)
pub const HEX_RESOLUTION: Resolution = Resolution::Eight;

/// Provider type -> cuisine label
const TYPE_CUISINE_MAP: &[(&str, &str)] = &[
    ("italian_restaurant", "Italian"),
    ("pizza_restaurant", "Italian"),
    ("french_restaurant", "French"),
    ("belgian_restaurant", "Belgian"),
    ("japanese_restaurant", "Japanese"),
    ("sushi_restaurant", "Japanese"),
    ("chinese_restaurant", "Chinese"),
    ("thai_restaurant", "Thai"),
    ("vietnamese_restaurant", "Vietnamese"),
    ("indian_restaurant", "Indian"),
    ("mexican_restaurant", "Mexican"),
    ("greek_restaurant", "Greek"),
    ("turkish_restaurant", "Turkish"),
    ("lebanese_restaurant", "Lebanese"),
    ("middle_eastern_restaurant", "Middle Eastern"),
    ("mediterranean_restaurant", "Mediterranean"),
    ("seafood_restaurant", "Seafood"),
    ("steak_house", "Steakhouse"),
    ("vegetarian_restaurant", "Vegetarian"),
    ("vegan_restaurant", "Vegan"),
    ("fast_food_restaurant", "Fast Food"),
    ("hamburger_restaurant", "Burger"),
    ("american_restaurant", "American"),
    ("korean_restaurant", "Korean"),
    ("spanish_restaurant", "Spanish"),
    ("asian_restaurant", "Asian"),
    ("african_restaurant", "African"),
    ("brazilian_restaurant", "Brazilian"),
    ("cafe", "Cafe"),
    ("coffee_shop", "Cafe"),
    ("bakery", "Bakery"),
    ("bar", "Bar"),
    ("brunch_restaurant", "Brunch"),
    ("breakfast_restaurant", "Breakfast"),
];

/// Name-based cuisine rules for everything the provider labels generically.
/// Order is precedence: French before Belgian because "brasserie" is
/// ambiguous; specific Asian cuisines before the generic "Asian" catch-all.
const NAME_CUISINE_RULES: &[(&str, &[&str])] = &[
    (
        "French",
        &["bistro", "brasserie", "french", "paris", "lyon", "provenc"],
    ),
    (
        "Belgian",
        &[
            "belg",
            "frites",
            "gaufre",
            "waffle",
            "moules",
            "stoemp",
            "carbonade",
            "waterzooi",
        ],
    ),
    (
        "Moroccan",
        &[
            "bab ",
            "dar ",
            "riad",
            "marrakech",
            "casablanca",
            "fes ",
            "tajine",
            "tagine",
            "couscous",
            "maroc",
        ],
    ),
    (
        "Congolese",
        &[
            "congo",
            "kinshasa",
            "maman ",
            "mamie ",
            "chez maman",
            "pondu",
            "fufu",
        ],
    ),
    ("Ethiopian", &["ethiopia", "eritrea", "injera", "addis"]),
    ("Syrian", &["syria", "damas", "alep"]),
    (
        "Portuguese",
        &[
            "portugal",
            "portugalia",
            "churrasqueira",
            "pastel de nata",
            "bacalhau",
            "lisboa",
            "lisbonne",
        ],
    ),
    (
        "Spanish",
        &["tapas", "espanol", "española", "bodega", "iberic", "paella"],
    ),
    (
        "Peruvian",
        &["peru", "ceviche", "machu picchu", "lomo saltado", "pisco"],
    ),
    (
        "Brazilian",
        &["brasil", "brazil", "churrasco", "rodizio", "feijoada"],
    ),
    (
        "Mexican",
        &["mexic", "taco", "burrito", "guacamole", "nacho", "enchilada"],
    ),
    ("Venezuelan", &["arepa", "venezuela", "pabellon"]),
    (
        "Japanese",
        &["sushi", "maki", "ramen", "udon", "tempura", "izakaya"],
    ),
    (
        "Korean",
        &["korea", "bibimbap", "kimchi", "seoul", "bulgogi"],
    ),
    (
        "African",
        &[
            "dakar", "senegal", "cameroun", "cameroon", "nigeria", "ghana", "mali ", "burkina",
            "togo ", "benin", "afric",
        ],
    ),
    (
        "Seafood",
        &[
            "seafood",
            "poisson",
            "fruits de mer",
            "crab",
            "lobster",
            "homard",
            "pêcherie",
            "oyster",
            "huitre",
        ],
    ),
    (
        "Steakhouse",
        &[
            "steak", "grill", "bbq", "barbecue", "butcher", "viande", "angus", "wagyu",
        ],
    ),
    (
        "Middle Eastern",
        &["falafel", "hummus", "shawarma", "kosher"],
    ),
    ("Afghan", &["afghan", "kabul", "kabob"]),
    ("Nepali", &["nepal", "tibet", "himalaya", "momo", "kathmandu"]),
    ("Armenian", &["armenia", "yerevan"]),
    ("Georgian", &["georgia", "khachapuri", "tbilisi"]),
    (
        "Eastern European",
        &[
            "russia", "ukraine", "polski", "pierogi", "borscht", "pelmeni",
        ],
    ),
    (
        "Caribbean",
        &["caribbean", "jamaican", "haiti", "cuba", "dominican", "antilles"],
    ),
    (
        "Italian",
        &[
            "pizza",
            "pizzeria",
            "pasta",
            "osteria",
            "trattoria",
            "risotto",
            "italiano",
            "italiana",
        ],
    ),
    ("Burger", &["burger"]),
    (
        "Turkish",
        &["kebab", "kebap", "döner", "doner", "lahmacun", "pide"],
    ),
    (
        "Indian",
        &[
            "tandoori", "masala", "biryani", "tikka", "punjab", "delhi", "mumbai",
        ],
    ),
    ("Thai", &["thai", "thaï", "bangkok", "tom yum"]),
    (
        "Vietnamese",
        &["vietnam", "banh mi", "saigon", "hanoi", " pho ", "pho "],
    ),
    (
        "Chinese",
        &[
            "chinese", "chinois", "dim sum", "dumpling", "peking", "szechuan", "cantonese",
        ],
    ),
    ("Asian", &["wok ", " wok", "asian", "asiatique"]),
    (
        "Belgian",
        &[
            "taverne",
            "frituur",
            "friterie",
            "fritkot",
            "estaminet",
            "snack frit",
        ],
    ),
    ("Brunch", &["brunch", "breakfast", "pancake", "ontbijt"]),
    ("Vegetarian", &["salad bar", "saladbar", "salade bar"]),
    (
        "Greek",
        &["greek", "grec", "gyros", "souvlaki", "tzatziki"],
    ),
    (
        "Lebanese",
        &["liban", "lebanese", "libanais", "mezze", "fattoush", "tabouleh"],
    ),
];

/// Primary types that are never food venues
const NON_FOOD_TYPES: &[&str] = &[
    "supermarket",
    "grocery_store",
    "convenience_store",
    "hotel",
    "motel",
    "hostel",
    "lodging",
    "sauna",
    "spa",
    "gym",
    "fitness_center",
    "beauty_salon",
    "hair_salon",
    "wellness_center",
    "massage",
    "public_bath",
    "furniture_store",
    "home_goods_store",
    "home_improvement_store",
    "clothing_store",
    "shopping_mall",
    "department_store",
    "movie_theater",
    "night_club",
    "casino",
    "store",
];

pub fn is_non_food_type(primary_type: &str) -> bool {
    NON_FOOD_TYPES.contains(&primary_type)
}

/// Counts of records dropped at ingest, logged per build
#[derive(Debug, Default, Clone, Copy)]
pub struct DropStats {
    pub missing_fields: u32,
    pub out_of_city: u32,
    pub shop_name: u32,
    pub non_food_type: u32,
}

impl DropStats {
    pub fn total(&self) -> u32 {
        self.missing_fields + self.out_of_city + self.shop_name + self.non_food_type
    }
}

/// Cuisine inference, in priority order:
/// 1. name-based overrides for provider mislabels (poke bowls are Hawaiian)
/// 2. primary type
/// 3. any type tag
/// 4. name heuristics over the closed rule set
/// 5. "Other"
pub fn infer_cuisine(types: &[String], primary_type: Option<&str>, name: &str) -> String {
    let name_lower = name.to_lowercase();

    // Poke places get filed under "American" by the provider
    let poke_patterns = [
        "poké",
        "poke bowl",
        "poke bar",
        "poke house",
        "hawaiian poke",
        "açaí bowl",
        "acai bowl",
        "pokebowl",
    ];
    if poke_patterns.iter().any(|p| name_lower.contains(p)) {
        return "Hawaiian".to_string();
    }
    let padded = format!(" {} ", name_lower);
    if padded.contains(" poke ") {
        return "Hawaiian".to_string();
    }

    if let Some(primary) = primary_type {
        if let Some((_, cuisine)) = TYPE_CUISINE_MAP.iter().find(|(t, _)| *t == primary) {
            return cuisine.to_string();
        }
    }

    for tag in types {
        if let Some((_, cuisine)) = TYPE_CUISINE_MAP.iter().find(|(t, _)| t == tag) {
            return cuisine.to_string();
        }
    }

    for (cuisine, patterns) in NAME_CUISINE_RULES {
        if patterns.iter().any(|p| name_lower.contains(p)) {
            return cuisine.to_string();
        }
    }

    "Other".to_string()
}

/// Venue type: specific sub-types win over the generic "restaurant";
/// name-based café/bar detection applies only when the name lacks it
pub fn infer_venue_type(types: &[String], primary_type: Option<&str>, name: &str) -> VenueType {
    if let Some(primary) = primary_type {
        match primary {
            "sandwich_shop" => return VenueType::SandwichShop,
            "fast_food_restaurant" => return VenueType::FastFood,
            "brunch_restaurant" | "breakfast_restaurant" => return VenueType::Brunch,
            "seafood_restaurant" => return VenueType::Seafood,
            _ => {}
        }
    }

    let priority = [
        ("restaurant", VenueType::Restaurant),
        ("cafe", VenueType::Cafe),
        ("bar", VenueType::Bar),
        ("bakery", VenueType::Bakery),
        ("meal_takeaway", VenueType::Takeaway),
    ];

    if let Some(primary) = primary_type {
        for (keyword, venue) in &priority {
            if primary.contains(keyword) {
                return *venue;
            }
        }
    }
    for (keyword, venue) in &priority {
        if types.iter().any(|t| t == keyword) {
            return *venue;
        }
    }

    let name_lower = name.to_lowercase();
    let has_restaurant = name_lower.contains("restaurant") || name_lower.contains("resto");
    if !has_restaurant {
        let bar_indicators = ["café", "cafe", " bar ", " bar,", "(bar)", "le bar", "the bar"];
        if bar_indicators.iter().any(|w| name_lower.contains(w)) || name_lower.ends_with(" bar") {
            return VenueType::Bar;
        }
    }

    VenueType::Restaurant
}

/// Provider price enum -> numeric tier, defaulting to moderate
pub fn parse_price_level(price_level: Option<&str>) -> u8 {
    match price_level {
        Some("PRICE_LEVEL_FREE") => 0,
        Some("PRICE_LEVEL_INEXPENSIVE") => 1,
        Some("PRICE_LEVEL_MODERATE") => 2,
        Some("PRICE_LEVEL_EXPENSIVE") => 3,
        Some("PRICE_LEVEL_VERY_EXPENSIVE") => 4,
        _ => 2,
    }
}

/// Ingest, filter, and type raw records
/// DOCUMENTATION: Drops records with missing coordinates or rating, records
/// outside the city bounding box, non-restaurant-shop names, and non-food
/// primary types. Everything else becomes a fully-featured Restaurant.
pub fn build_restaurants(
    raw: Vec<RawPlace>,
    ctx: &CityContext,
) -> (Vec<Restaurant>, DropStats) {
    let mut stats = DropStats::default();
    let mut restaurants = Vec::with_capacity(raw.len());

    for place in raw {
        let (lat, lng, rating) = match (place.lat, place.lng, place.rating) {
            (Some(lat), Some(lng), Some(rating)) => (lat, lng, rating),
            _ => {
                stats.missing_fields += 1;
                continue;
            }
        };

        if !ctx.in_city(lat, lng) {
            stats.out_of_city += 1;
            continue;
        }

        if ctx.non_restaurant_shop(&place.name) {
            stats.shop_name += 1;
            continue;
        }

        if place
            .primary_type
            .as_deref()
            .map_or(false, is_non_food_type)
        {
            stats.non_food_type += 1;
            continue;
        }

        let cell = match LatLng::new(lat, lng) {
            Ok(point) => point.to_cell(HEX_RESOLUTION),
            Err(_) => {
                stats.missing_fields += 1;
                continue;
            }
        };

        let review_count = place.review_count.unwrap_or(0);
        let cuisine = infer_cuisine(&place.types, place.primary_type.as_deref(), &place.name);
        let venue_type =
            infer_venue_type(&place.types, place.primary_type.as_deref(), &place.name);
        let hours = parse_hours(
            place.opening_hours.as_deref(),
            place.closing_times.as_ref(),
            place.days_open.as_deref(),
        );

        restaurants.push(Restaurant {
            id: place.id,
            name: place.name.clone(),
            address: place.address,
            lat,
            lng,
            rating,
            review_count,
            types: place.types,
            primary_type: place.primary_type,
            website: place.website,
            google_maps_url: place.google_maps_url,
            opening_hours: place.opening_hours,
            review_languages: place.review_languages,
            cuisine,
            venue_type,
            price_numeric: parse_price_level(place.price_level.as_deref()),
            is_chain: ctx.chain_match(&place.name),
            log_review_count: (f64::from(review_count) + 1.0).ln(),
            hours,
            hex_index: cell,
            hex_restaurant_count: 0,
            hex_mean_rating: 0.0,
            hex_cuisine_entropy: 0.0,
            hex_chain_share: 0.0,
            predicted_rating: None,
            residual: 0.0,
        });
    }

    if stats.total() > 0 {
        log::info!(
            "Dropped {} raw records (missing fields: {}, out of city: {}, shop names: {}, non-food types: {})",
            stats.total(),
            stats.missing_fields,
            stats.out_of_city,
            stats.shop_name,
            stats.non_food_type
        );
    }

    (restaurants, stats)
}

/// Join per-cell aggregates back onto each record
/// DOCUMENTATION: Mean rating, restaurant count, Shannon cuisine entropy
/// and chain share per hex cell, used as structural predictor features.
pub fn attach_cell_features(restaurants: &mut [Restaurant]) {
    let mut counts: HashMap<u64, u32> = HashMap::new();
    let mut rating_sums: HashMap<u64, f64> = HashMap::new();
    let mut chain_sums: HashMap<u64, u32> = HashMap::new();
    let mut cuisine_counts: HashMap<u64, HashMap<&str, u32>> = HashMap::new();

    for r in restaurants.iter() {
        let key = u64::from(r.hex_index);
        *counts.entry(key).or_insert(0) += 1;
        *rating_sums.entry(key).or_insert(0.0) += r.rating;
        *chain_sums.entry(key).or_insert(0) += u32::from(r.is_chain);
        *cuisine_counts
            .entry(key)
            .or_default()
            .entry(r.cuisine.as_str())
            .or_insert(0) += 1;
    }

    let entropies: HashMap<u64, f64> = cuisine_counts
        .iter()
        .map(|(key, cuisines)| {
            let total: u32 = cuisines.values().sum();
            let entropy = -cuisines
                .values()
                .map(|&c| {
                    let p = f64::from(c) / f64::from(total);
                    p * p.ln()
                })
                .sum::<f64>();
            (*key, entropy)
        })
        .collect();

    for r in restaurants.iter_mut() {
        let key = u64::from(r.hex_index);
        let count = counts[&key];
        r.hex_restaurant_count = count;
        r.hex_mean_rating = rating_sums[&key] / f64::from(count);
        r.hex_chain_share = f64::from(chain_sums[&key]) / f64::from(count);
        r.hex_cuisine_entropy = entropies[&key];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{brussels_config, CityContext};

    fn ctx() -> CityContext {
        CityContext::from_config(brussels_config()).unwrap()
    }

    fn raw(name: &str, lat: f64, lng: f64) -> RawPlace {
        RawPlace {
            id: format!("id-{}", name),
            name: name.to_string(),
            address: None,
            lat: Some(lat),
            lng: Some(lng),
            rating: Some(4.2),
            review_count: Some(120),
            types: vec!["restaurant".to_string()],
            primary_type: Some("restaurant".to_string()),
            price_level: None,
            opening_hours: None,
            closing_times: None,
            days_open: None,
            website: None,
            google_maps_url: None,
            review_languages: None,
        }
    }

    #[test]
    fn test_poke_override_beats_provider_type() {
        let cuisine = infer_cuisine(
            &["american_restaurant".to_string()],
            Some("american_restaurant"),
            "Kameha Poke Bowl",
        );
        assert_eq!(cuisine, "Hawaiian");
    }

    #[test]
    fn test_french_beats_belgian_for_brasserie() {
        let cuisine = infer_cuisine(&[], Some("restaurant"), "Brasserie de la Gare");
        assert_eq!(cuisine, "French");
    }

    #[test]
    fn test_friterie_is_belgian() {
        let cuisine = infer_cuisine(&[], Some("restaurant"), "Friterie du Miroir");
        assert_eq!(cuisine, "Belgian");
    }

    #[test]
    fn test_unknown_cuisine_defaults_to_other() {
        let cuisine = infer_cuisine(&[], Some("restaurant"), "Zinneke");
        assert_eq!(cuisine, "Other");
    }

    #[test]
    fn test_venue_subtype_beats_generic_restaurant() {
        let venue = infer_venue_type(
            &["restaurant".to_string()],
            Some("fast_food_restaurant"),
            "Snack 58",
        );
        assert_eq!(venue, VenueType::FastFood);
    }

    #[test]
    fn test_cafe_name_without_restaurant_is_bar() {
        let venue = infer_venue_type(&[], None, "Café Belga");
        assert_eq!(venue, VenueType::Bar);
        let venue = infer_venue_type(&[], None, "Café Restaurant Lemonnier");
        assert_eq!(venue, VenueType::Restaurant);
    }

    #[test]
    fn test_price_defaults_to_moderate() {
        assert_eq!(parse_price_level(None), 2);
        assert_eq!(parse_price_level(Some("PRICE_LEVEL_VERY_EXPENSIVE")), 4);
    }

    #[test]
    fn test_ingest_drops_by_category() {
        let ctx = ctx();
        let mut records = vec![
            raw("Fin de Siècle", 50.8503, 4.3517),
            raw("Neuhaus Grand Place", 50.8467, 4.3525),
            raw("Somewhere Else", 48.85, 2.35),
        ];
        let mut no_rating = raw("No Rating", 50.84, 4.36);
        no_rating.rating = None;
        records.push(no_rating);
        let mut hotel = raw("Left Bank", 50.84, 4.35);
        hotel.primary_type = Some("hotel".to_string());
        records.push(hotel);

        let (kept, stats) = build_restaurants(records, &ctx);
        assert_eq!(kept.len(), 1);
        assert_eq!(stats.shop_name, 1);
        assert_eq!(stats.out_of_city, 1);
        assert_eq!(stats.missing_fields, 1);
        assert_eq!(stats.non_food_type, 1);
    }

    #[test]
    fn test_cell_features_attached() {
        let ctx = ctx();
        let records = vec![
            raw("A", 50.8400, 4.3600),
            raw("B", 50.8401, 4.3601),
            raw("McDonald's", 50.8401, 4.3602),
        ];
        let (mut kept, _) = build_restaurants(records, &ctx);
        attach_cell_features(&mut kept);
        for r in &kept {
            assert!(r.hex_restaurant_count >= 1);
            assert!(r.hex_mean_rating > 0.0);
        }
        // Same cell => identical aggregates
        if kept[0].hex_index == kept[2].hex_index {
            assert!(kept[0].hex_chain_share > 0.0);
        }
    }
}
