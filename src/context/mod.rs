// src/context/mod.rs
// DOCUMENTATION: City context bundle and lookup operations
// PURPOSE: Immutable, city-specific knowledge behind the scoring engine

pub mod brussels;
pub mod template;

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Context as AnyhowContext};
use regex::RegexSet;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::models::DistrictTier;

pub use brussels::brussels_config;

/// Mean Earth radius in km, used by the Haversine distance
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Stopwords removed before the street-cuisine word-overlap comparison
const OVERLAP_STOPWORDS: [&str; 7] = ["de", "la", "le", "du", "des", "l", "d"];

/// Great-circle distance between two (lat, lng) points in km
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Lowercase, trim, and collapse inner whitespace
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize and strip diacritics (NFKD, combining marks removed)
pub fn fold_accents(name: &str) -> String {
    normalize_name(name)
        .nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// Whether `needle` occurs in `haystack` at non-alphanumeric boundaries.
/// Both inputs must already be normalized.
fn word_boundary_contains(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = begin == 0
            || haystack[..begin]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = end == haystack.len()
            || haystack[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + needle.len().max(1);
        if start >= haystack.len() {
            break;
        }
    }
    false
}

/// Company suffixes and venue words stripped when matching names against
/// external registries (the food-safety agency export carries legal names)
const REGISTRY_NOISE_WORDS: [&str; 15] = [
    "bvba", "sprl", "sa", "nv", "bv", "srl", "restaurant", "resto", "brasserie", "cafe", "café",
    "bistro", "taverne", "snack", "frituur",
];

/// Canonical key for matching against external name registries:
/// accent-folded, noise words removed, whitespace collapsed
pub fn canonical_key(name: &str) -> String {
    fold_accents(name)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !REGISTRY_NOISE_WORDS.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenize, drop stopwords, and test for a non-empty intersection.
/// Used to compare a diaspora street's cuisines with a record's cuisine.
pub fn word_overlap(a: &str, b: &str) -> bool {
    let tokens = |s: &str| -> HashSet<String> {
        fold_accents(s)
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty() && !OVERLAP_STOPWORDS.contains(t))
            .map(|t| t.to_string())
            .collect()
    };
    !tokens(a).is_disjoint(&tokens(b))
}

/// Geographic bounding box for the city
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

/// A district or neighborhood declaration
#[derive(Debug, Clone, Serialize)]
pub struct AreaSpec {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub tier: DistrictTier,
    pub cuisine_affinity: Vec<String>,
    /// Containment radius in km; neighborhoods default to 0.5
    pub radius_km: Option<f64>,
}

impl AreaSpec {
    pub fn new(name: &str, lat: f64, lng: f64, tier: DistrictTier) -> Self {
        AreaSpec {
            name: name.to_string(),
            lat,
            lng,
            tier,
            cuisine_affinity: Vec::new(),
            radius_km: None,
        }
    }

    pub fn with_affinity(mut self, cuisines: &[&str]) -> Self {
        self.cuisine_affinity = cuisines.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }
}

/// A diaspora food street: point + radius + the community's cuisines
#[derive(Debug, Clone)]
pub struct StreetSpec {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub cuisines: Vec<String>,
}

impl StreetSpec {
    pub fn new(name: &str, lat: f64, lng: f64, radius_km: f64, cuisines: &[&str]) -> Self {
        StreetSpec {
            name: name.to_string(),
            lat,
            lng,
            radius_km,
            cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// One entry in a guide table
/// DOCUMENTATION: Boundary entries match at non-alphanumeric boundaries;
/// exact entries require the whole normalized name to match, which keeps
/// "la paix" from claiming "glacier de la paix".
#[derive(Debug, Clone)]
pub struct GuideEntry {
    pub pattern: String,
    pub exact: bool,
}

impl GuideEntry {
    pub fn word(pattern: &str) -> Self {
        GuideEntry {
            pattern: pattern.to_string(),
            exact: false,
        }
    }

    pub fn exact(pattern: &str) -> Self {
        GuideEntry {
            pattern: pattern.to_string(),
            exact: true,
        }
    }

    fn matches(&self, normalized_name: &str) -> bool {
        let pattern = normalize_name(&self.pattern);
        if self.exact {
            normalized_name == pattern
        } else {
            word_boundary_contains(normalized_name, &pattern)
        }
    }
}

/// Structured literal declaration of a city's context (a documented
/// template lives in `template.rs`)
#[derive(Debug, Clone)]
pub struct CityConfig {
    pub city_name: String,
    pub country: String,
    pub center: (f64, f64),
    pub default_zoom: u8,
    pub bounding_box: BoundingBox,
    pub tourist_epicenter: (f64, f64),
    pub tourist_epicenter_name: String,
    /// The one neighborhood treated as the canonical trap zone
    pub tourist_trap_neighborhood: Option<String>,
    pub expat_center: (f64, f64),
    pub expat_center_name: String,
    pub districts: Vec<AreaSpec>,
    pub neighborhoods: Vec<AreaSpec>,
    pub diaspora_streets: Vec<StreetSpec>,
    /// District-tier weight used by the fry-shop branch of the
    /// local-institution signal
    pub tier_weights: Vec<(DistrictTier, f64)>,
    /// Cuisine -> (district -> authenticity weight in [0,1])
    pub diaspora_authenticity: Vec<(String, Vec<(String, f64)>)>,
    /// Same shape for the city's own traditional cuisine
    pub local_authenticity: Vec<(String, Vec<(String, f64)>)>,
    /// Closed set behind the diaspora_only query filter
    pub diaspora_cuisines: Vec<String>,
    pub local_cuisines: Vec<String>,
    pub rare_cuisines: Vec<(String, f64)>,
    pub cuisine_specificity: Vec<(String, f64)>,
    pub chain_patterns: Vec<String>,
    pub non_restaurant_patterns: Vec<String>,
    pub hipster_keywords: Vec<String>,
    pub non_restaurant_locations: Vec<String>,
    pub michelin_stars: Vec<(GuideEntry, u8)>,
    pub value_guide: Vec<GuideEntry>,
    pub regional_guides: Vec<(String, Vec<GuideEntry>)>,
    /// Curated local institutions (accent-folded matching) -> score in [0,1]
    pub local_institutions: Vec<(String, f64)>,
    /// Fry-shop names for which high review volume is authentic
    pub classic_fry_shops: Vec<String>,
    /// Family-naming regex patterns (Chez X, 't X, ...)
    pub family_name_patterns: Vec<String>,
    pub community_source: Option<String>,
    pub timezone: String,
}

/// Immutable, compiled city context
/// DOCUMENTATION: All lookups are O(small constant) over read-only data;
/// the bundle is shared across scoring workers without locking.
pub struct CityContext {
    pub city_name: String,
    pub country: String,
    pub center: (f64, f64),
    pub default_zoom: u8,
    pub bounding_box: BoundingBox,
    pub tourist_epicenter: (f64, f64),
    pub tourist_epicenter_name: String,
    pub tourist_trap_neighborhood: Option<String>,
    pub expat_center: (f64, f64),
    pub expat_center_name: String,
    pub community_source: Option<String>,
    pub timezone: String,

    districts: Vec<AreaSpec>,
    neighborhoods: Vec<AreaSpec>,
    streets: Vec<StreetSpec>,
    tier_weights: HashMap<DistrictTier, f64>,
    diaspora_auth: HashMap<String, HashMap<String, f64>>,
    local_auth: HashMap<String, HashMap<String, f64>>,
    diaspora_cuisines: HashSet<String>,
    local_cuisines: HashSet<String>,
    rare_cuisines: HashMap<String, f64>,
    cuisine_specificity: HashMap<String, f64>,
    chain_set: RegexSet,
    non_restaurant_set: RegexSet,
    family_set: RegexSet,
    hipster_keywords: Vec<String>,
    non_restaurant_locations: Vec<String>,
    michelin: Vec<(GuideEntry, u8)>,
    value_guide: Vec<GuideEntry>,
    regional: Vec<GuideEntry>,
    institutions: Vec<(String, f64)>,
    classic_fry_shops: Vec<String>,
}

impl CityContext {
    /// Compile a config declaration, failing loudly on data errors
    /// DOCUMENTATION: Configuration errors abort process start; nothing in
    /// the pipeline is expected to recover from a bad city declaration.
    pub fn from_config(cfg: CityConfig) -> anyhow::Result<Self> {
        let bb = cfg.bounding_box;
        if bb.min_lat >= bb.max_lat || bb.min_lng >= bb.max_lng {
            bail!(
                "bounding box is inverted: [{}, {}] x [{}, {}]",
                bb.min_lat,
                bb.max_lat,
                bb.min_lng,
                bb.max_lng
            );
        }
        if cfg.districts.is_empty() {
            bail!("city config declares no districts");
        }

        for (cuisine, rows) in cfg.diaspora_authenticity.iter().chain(&cfg.local_authenticity) {
            for (district, weight) in rows {
                if !(0.0..=1.0).contains(weight) {
                    bail!(
                        "authenticity weight out of range for {} in {}: {}",
                        cuisine,
                        district,
                        weight
                    );
                }
            }
        }

        // Duplicate exact-match directives across guide tables are ambiguous
        let mut exact_seen = HashSet::new();
        let all_guide_entries = cfg
            .michelin_stars
            .iter()
            .map(|(e, _)| e)
            .chain(cfg.value_guide.iter())
            .chain(cfg.regional_guides.iter().flat_map(|(_, es)| es.iter()));
        for entry in all_guide_entries {
            if entry.exact && !exact_seen.insert(normalize_name(&entry.pattern)) {
                bail!("overlapping exact-match guide directive: {}", entry.pattern);
            }
        }

        let case_insensitive = |patterns: &[String]| -> anyhow::Result<RegexSet> {
            let wrapped: Vec<String> = patterns.iter().map(|p| format!("(?i){}", p)).collect();
            RegexSet::new(&wrapped).context("invalid pattern in city config")
        };

        let chain_set = case_insensitive(&cfg.chain_patterns)?;
        let non_restaurant_set = case_insensitive(&cfg.non_restaurant_patterns)?;
        let family_set = case_insensitive(&cfg.family_name_patterns)?;

        Ok(CityContext {
            city_name: cfg.city_name,
            country: cfg.country,
            center: cfg.center,
            default_zoom: cfg.default_zoom,
            bounding_box: cfg.bounding_box,
            tourist_epicenter: cfg.tourist_epicenter,
            tourist_epicenter_name: cfg.tourist_epicenter_name,
            tourist_trap_neighborhood: cfg.tourist_trap_neighborhood,
            expat_center: cfg.expat_center,
            expat_center_name: cfg.expat_center_name,
            community_source: cfg.community_source,
            timezone: cfg.timezone,
            districts: cfg.districts,
            neighborhoods: cfg.neighborhoods,
            streets: cfg.diaspora_streets,
            tier_weights: cfg.tier_weights.into_iter().collect(),
            diaspora_auth: cfg
                .diaspora_authenticity
                .into_iter()
                .map(|(c, rows)| (c, rows.into_iter().collect()))
                .collect(),
            local_auth: cfg
                .local_authenticity
                .into_iter()
                .map(|(c, rows)| (c, rows.into_iter().collect()))
                .collect(),
            diaspora_cuisines: cfg.diaspora_cuisines.into_iter().collect(),
            local_cuisines: cfg.local_cuisines.into_iter().collect(),
            rare_cuisines: cfg.rare_cuisines.into_iter().collect(),
            cuisine_specificity: cfg.cuisine_specificity.into_iter().collect(),
            chain_set,
            non_restaurant_set,
            family_set,
            hipster_keywords: cfg
                .hipster_keywords
                .iter()
                .map(|k| normalize_name(k))
                .collect(),
            non_restaurant_locations: cfg
                .non_restaurant_locations
                .iter()
                .map(|k| normalize_name(k))
                .collect(),
            michelin: cfg.michelin_stars,
            value_guide: cfg.value_guide,
            regional: cfg
                .regional_guides
                .into_iter()
                .flat_map(|(_, entries)| entries)
                .collect(),
            institutions: cfg
                .local_institutions
                .into_iter()
                .map(|(name, score)| (fold_accents(&name), score))
                .collect(),
            classic_fry_shops: cfg
                .classic_fry_shops
                .iter()
                .map(|n| fold_accents(n))
                .collect(),
        })
    }

    /// Bounding-box containment test
    pub fn in_city(&self, lat: f64, lng: f64) -> bool {
        self.bounding_box.contains(lat, lng)
    }

    /// Nearest-centroid district assignment (total for in-city points)
    pub fn district_of(&self, lat: f64, lng: f64) -> &str {
        let mut best = &self.districts[0];
        let mut best_dist = f64::INFINITY;
        for district in &self.districts {
            let d = haversine_km(lat, lng, district.lat, district.lng);
            if d < best_dist {
                best_dist = d;
                best = district;
            }
        }
        &best.name
    }

    /// District tier lookup by name
    pub fn district_tier(&self, name: &str) -> Option<DistrictTier> {
        self.districts
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.tier)
    }

    /// The neighborhood whose (point, radius) contains the query, if any.
    /// Overlap is prevented by radius tuning in the context data.
    pub fn neighborhood_of(&self, lat: f64, lng: f64) -> Option<&AreaSpec> {
        self.neighborhoods.iter().find(|n| {
            haversine_km(lat, lng, n.lat, n.lng) <= n.radius_km.unwrap_or(0.5)
        })
    }

    /// First diaspora street whose circle contains the point
    pub fn on_diaspora_street(&self, lat: f64, lng: f64) -> Option<&StreetSpec> {
        self.streets
            .iter()
            .find(|s| haversine_km(lat, lng, s.lat, s.lng) <= s.radius_km)
    }

    pub fn distance_to_tourist_epicenter(&self, lat: f64, lng: f64) -> f64 {
        haversine_km(lat, lng, self.tourist_epicenter.0, self.tourist_epicenter.1)
    }

    pub fn distance_to_expat_center(&self, lat: f64, lng: f64) -> f64 {
        haversine_km(lat, lng, self.expat_center.0, self.expat_center.1)
    }

    /// Effective tier at a point: neighborhood tier overrides the district
    #[allow(dead_code)]
    pub fn effective_tier(&self, lat: f64, lng: f64) -> DistrictTier {
        if let Some(neighborhood) = self.neighborhood_of(lat, lng) {
            return neighborhood.tier;
        }
        self.district_tier(self.district_of(lat, lng))
            .unwrap_or(DistrictTier::Mixed)
    }

    pub fn chain_match(&self, name: &str) -> bool {
        self.chain_set.is_match(name)
    }

    pub fn non_restaurant_shop(&self, name: &str) -> bool {
        self.non_restaurant_set.is_match(name)
    }

    pub fn family_name_match(&self, name: &str) -> bool {
        self.family_set.is_match(name)
    }

    /// 0, 1, or 2 (2 standing for two or more stars)
    pub fn michelin_stars(&self, name: &str) -> u8 {
        let normalized = normalize_name(name);
        self.michelin
            .iter()
            .filter(|(entry, _)| entry.matches(&normalized))
            .map(|(_, stars)| (*stars).min(2))
            .max()
            .unwrap_or(0)
    }

    pub fn has_value_guide(&self, name: &str) -> bool {
        let normalized = normalize_name(name);
        self.value_guide.iter().any(|e| e.matches(&normalized))
    }

    pub fn has_regional_guide(&self, name: &str) -> bool {
        let normalized = normalize_name(name);
        self.regional.iter().any(|e| e.matches(&normalized))
    }

    /// Districts where a diaspora cuisine is historically anchored;
    /// None when the cuisine has no diaspora community here
    pub fn diaspora_districts(&self, cuisine: &str) -> Option<&HashMap<String, f64>> {
        self.diaspora_auth.get(cuisine)
    }

    /// Authenticity weight for (cuisine, district); 0 for a missing pair
    pub fn diaspora_authenticity(&self, cuisine: &str, district: &str) -> f64 {
        self.diaspora_auth
            .get(cuisine)
            .and_then(|rows| rows.get(district))
            .copied()
            .unwrap_or(0.0)
    }

    /// Traditional local-cuisine authenticity for (cuisine, district)
    pub fn local_authenticity(&self, cuisine: &str, district: &str) -> f64 {
        self.local_auth
            .get(cuisine)
            .and_then(|rows| rows.get(district))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_diaspora_cuisine(&self, cuisine: &str) -> bool {
        self.diaspora_cuisines.contains(cuisine)
    }

    pub fn is_local_cuisine(&self, cuisine: &str) -> bool {
        self.local_cuisines.contains(cuisine)
    }

    pub fn rare_cuisine_weight(&self, cuisine: &str) -> f64 {
        self.rare_cuisines.get(cuisine).copied().unwrap_or(0.0)
    }

    pub fn cuisine_specificity(&self, cuisine: &str) -> f64 {
        self.cuisine_specificity.get(cuisine).copied().unwrap_or(0.0)
    }

    /// Whether a diaspora street's community cuisines cover the record's
    /// cuisine (stopword-stripped word overlap)
    pub fn street_serves_cuisine(&self, street: &StreetSpec, cuisine: &str) -> bool {
        street.cuisines.iter().any(|c| word_overlap(c, cuisine))
    }

    /// Any hipster/fusion keyword present in the name
    pub fn has_hipster_keyword(&self, name: &str) -> bool {
        let normalized = normalize_name(name);
        self.hipster_keywords.iter().any(|k| normalized.contains(k))
    }

    /// Any non-restaurant-location keyword in name or address
    pub fn in_non_restaurant_location(&self, name: &str, address: Option<&str>) -> bool {
        let mut haystack = normalize_name(name);
        if let Some(addr) = address {
            haystack.push(' ');
            haystack.push_str(&normalize_name(addr));
        }
        self.non_restaurant_locations
            .iter()
            .any(|k| haystack.contains(k.as_str()))
    }

    /// Curated local-institution score, accent-insensitive; 0 when unknown
    pub fn local_institution_score(&self, name: &str) -> f64 {
        let folded = fold_accents(name);
        self.institutions
            .iter()
            .filter(|(pattern, _)| word_boundary_contains(&folded, pattern))
            .map(|(_, score)| *score)
            .fold(0.0, f64::max)
    }

    /// Fry shops for which high review volume is authentic, not touristic
    pub fn is_classic_fry_shop(&self, name: &str) -> bool {
        let folded = fold_accents(name);
        self.classic_fry_shops
            .iter()
            .any(|p| word_boundary_contains(&folded, p))
    }

    /// District-tier weight used by the fry-shop local signal
    pub fn tier_weight(&self, tier: DistrictTier) -> f64 {
        self.tier_weights.get(&tier).copied().unwrap_or(0.0)
    }

    /// District declarations, for the map front-end
    pub fn districts(&self) -> &[AreaSpec] {
        &self.districts
    }

    /// Neighborhood declarations with their cuisine affinities
    pub fn neighborhoods(&self) -> &[AreaSpec] {
        &self.neighborhoods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CityContext {
        CityContext::from_config(brussels_config()).expect("brussels config is valid")
    }

    #[test]
    fn test_haversine_known_distance() {
        // Grand Place to the European Quarter is roughly 2.1 km
        let d = haversine_km(50.8467, 4.3525, 50.8427, 4.3827);
        assert!(d > 1.8 && d < 2.5, "got {}", d);
    }

    #[test]
    fn test_district_assignment_is_total_in_city() {
        let ctx = context();
        let bb = ctx.bounding_box;
        let mut lat = bb.min_lat;
        while lat <= bb.max_lat {
            let mut lng = bb.min_lng;
            while lng <= bb.max_lng {
                assert!(!ctx.district_of(lat, lng).is_empty());
                lng += 0.02;
            }
            lat += 0.02;
        }
    }

    #[test]
    fn test_neighborhood_radius_override() {
        let ctx = context();
        // Matongé declares its own radius; its centroid must resolve to it
        let matonge = ctx.neighborhood_of(50.8295, 4.3680);
        assert_eq!(matonge.map(|n| n.name.as_str()), Some("Matongé"));
        // No two neighborhood circles may overlap (data-quality invariant)
        let areas = &brussels_config().neighborhoods;
        for (i, a) in areas.iter().enumerate() {
            for b in areas.iter().skip(i + 1) {
                let dist = haversine_km(a.lat, a.lng, b.lat, b.lng);
                assert!(
                    dist > a.radius_km.unwrap_or(0.5) + b.radius_km.unwrap_or(0.5),
                    "{} and {} overlap",
                    a.name,
                    b.name
                );
            }
        }
    }

    #[test]
    fn test_pattern_boundary_matching() {
        let ctx = context();
        // Exact-match directive: the bare name matches, a superstring does not
        assert_eq!(ctx.michelin_stars("La Paix"), 1);
        assert_eq!(ctx.michelin_stars("Glacier de la Paix"), 0);
        // Boundary entries still match inside longer names
        assert_eq!(ctx.michelin_stars("Restaurant Comme Chez Soi"), 2);
    }

    #[test]
    fn test_chain_matching_is_case_insensitive() {
        let ctx = context();
        assert!(ctx.chain_match("McDonald's Bourse"));
        assert!(ctx.chain_match("EXKI Louise"));
        assert!(!ctx.chain_match("Chez Antoinette"));
    }

    #[test]
    fn test_non_restaurant_shop_patterns() {
        let ctx = context();
        assert!(ctx.non_restaurant_shop("Neuhaus Galerie de la Reine"));
        assert!(ctx.non_restaurant_shop("Carrefour Express Flagey"));
        assert!(!ctx.non_restaurant_shop("Fin de Siècle"));
    }

    #[test]
    fn test_word_overlap_strips_stopwords() {
        assert!(word_overlap("Congolese", "Congolese"));
        assert!(word_overlap("Middle Eastern", "Middle Eastern"));
        // Stopword-only strings never overlap
        assert!(!word_overlap("de la", "du des"));
        assert!(!word_overlap("Turkish", "Congolese"));
    }

    #[test]
    fn test_diaspora_authenticity_missing_pair_is_zero() {
        let ctx = context();
        assert!(ctx.diaspora_authenticity("Congolese", "Ixelles") > 0.9);
        assert_eq!(ctx.diaspora_authenticity("Congolese", "Uccle"), 0.0);
        assert_eq!(ctx.diaspora_authenticity("Martian", "Ixelles"), 0.0);
    }

    #[test]
    fn test_local_institution_accent_folding() {
        let ctx = context();
        assert!(ctx.local_institution_score("MAISON ANTOINE") > 0.9);
        // Accented variants fold to the same entry
        assert!(ctx.local_institution_score("Maison Antoîne") > 0.9);
        assert!(ctx.local_institution_score("Friture René") > 0.9);
        assert_eq!(ctx.local_institution_score("Random Bistro"), 0.0);
    }

    #[test]
    fn test_inverted_bounding_box_is_rejected() {
        let mut cfg = brussels_config();
        cfg.bounding_box = BoundingBox {
            min_lat: 51.0,
            max_lat: 50.0,
            min_lng: 4.0,
            max_lng: 5.0,
        };
        assert!(CityContext::from_config(cfg).is_err());
    }

    #[test]
    fn test_duplicate_exact_guide_directive_is_rejected() {
        let mut cfg = brussels_config();
        cfg.value_guide.push(GuideEntry::exact("la paix"));
        assert!(CityContext::from_config(cfg).is_err());
    }

    #[test]
    fn test_effective_tier_neighborhood_override() {
        let ctx = context();
        // Rue des Bouchers sits inside the Bruxelles district but is
        // classified tourist_trap by its neighborhood
        assert_eq!(
            ctx.effective_tier(50.8478, 4.3544),
            DistrictTier::TouristTrap
        );
    }
}
