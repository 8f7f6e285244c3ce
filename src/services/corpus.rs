// src/services/corpus.rs
// DOCUMENTATION: Scored corpus snapshot and query logic
// PURPOSE: Build the immutable corpus, serve filtered views, swap atomically

use std::collections::{HashMap, HashSet};
use std::fs;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use anyhow::Context as AnyhowContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::Config;
use crate::context::{canonical_key, normalize_name, CityContext};
use crate::errors::FoodMapError;
use crate::models::{
    DistrictTier, HexCell, RawPlace, RestaurantRow, ScoredRestaurant, VenueType,
};

use super::baseline::{attach_residuals, fit_predictor};
use super::features::{attach_cell_features, build_restaurants};
use super::reranker::rerank;
use super::spatial::aggregate_cells;

/// Hard ceiling on query page size
pub const MAX_LIMIT: i64 = 500;
const DEFAULT_LIMIT: i64 = 100;

/// Corpus-level summary statistics
#[derive(Debug, Clone, Serialize)]
pub struct CorpusSummary {
    pub total_restaurants: usize,
    pub mean_rating: f64,
    pub mean_predicted: Option<f64>,
    pub mean_residual: f64,
    pub cell_count: usize,
    pub cuisine_counts: HashMap<String, u32>,
    pub tier_counts: HashMap<String, u32>,
    pub built_at: DateTime<Utc>,
}

/// The immutable scored corpus served by the query surface
pub struct ScoredCorpus {
    pub restaurants: Vec<ScoredRestaurant>,
    pub cells: Vec<HexCell>,
    pub summary: CorpusSummary,
}

/// Holder for the current corpus generation
/// DOCUMENTATION: One writer (the build pipeline), many readers. A rebuild
/// prepares a full corpus out-of-band, then swaps the Arc atomically;
/// running queries keep the generation they started with.
pub struct CorpusHandle {
    inner: RwLock<Option<Arc<ScoredCorpus>>>,
}

impl CorpusHandle {
    pub fn empty() -> Self {
        CorpusHandle {
            inner: RwLock::new(None),
        }
    }

    pub fn get(&self) -> Result<Arc<ScoredCorpus>, FoodMapError> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or_else(|| FoodMapError::CorpusUnavailable {
                hint: "run the build pipeline (check DATA_PATH, then POST /admin/rebuild)"
                    .to_string(),
            })
    }

    pub fn swap(&self, corpus: ScoredCorpus) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(Arc::new(corpus));
        }
    }
}

/// Side-sources injected into the scorer at construction (no global caches)
#[derive(Debug, Default, Clone)]
pub struct CorpusSources {
    pub community_mentions: HashMap<String, u32>,
    pub hygiene_certified: HashSet<String>,
}

impl CorpusSources {
    /// Load optional community-mention and hygiene side-files
    pub fn load(config: &Config) -> Self {
        let mut sources = CorpusSources::default();

        if let Some(path) = &config.community_mentions_path {
            match fs::read_to_string(path)
                .map_err(anyhow::Error::from)
                .and_then(|raw| {
                    serde_json::from_str::<HashMap<String, u32>>(&raw).map_err(Into::into)
                }) {
                Ok(mentions) => {
                    sources.community_mentions = mentions
                        .into_iter()
                        .map(|(name, count)| (normalize_name(&name), count))
                        .collect();
                    log::info!(
                        "Loaded {} community mention entries",
                        sources.community_mentions.len()
                    );
                }
                Err(e) => log::warn!("Could not load community mentions from {}: {}", path, e),
            }
        }

        if let Some(path) = &config.hygiene_path {
            match fs::read_to_string(path)
                .map_err(anyhow::Error::from)
                .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).map_err(Into::into))
            {
                Ok(names) => {
                    sources.hygiene_certified =
                        names.iter().map(|n| canonical_key(n)).collect();
                    log::info!(
                        "Loaded {} hygiene certification entries",
                        sources.hygiene_certified.len()
                    );
                }
                Err(e) => log::warn!("Could not load hygiene data from {}: {}", path, e),
            }
        }

        sources
    }
}

/// Run the full build pipeline: ingest, feature engineering, baseline
/// predictor, spatial aggregation, reranking, summary
pub fn build_corpus(
    config: &Config,
    ctx: &CityContext,
    sources: &CorpusSources,
) -> anyhow::Result<ScoredCorpus> {
    let started = std::time::Instant::now();

    let raw = fs::read_to_string(&config.data_path)
        .with_context(|| format!("reading raw records from {}", config.data_path))?;
    let places: Vec<RawPlace> =
        serde_json::from_str(&raw).context("parsing raw records JSON")?;
    log::info!("Loaded {} raw records", places.len());

    let (mut restaurants, _) = build_restaurants(places, ctx);
    attach_cell_features(&mut restaurants);

    let predictor = fit_predictor(&restaurants);
    attach_residuals(&mut restaurants, predictor.as_deref());

    let cells = aggregate_cells(&restaurants);
    log::info!("Aggregated {} hex cells", cells.len());

    let (scored, _) = rerank(
        restaurants,
        ctx,
        &sources.community_mentions,
        &sources.hygiene_certified,
    );

    let summary = summarize(&scored, cells.len());
    log::info!(
        "Built scored corpus: {} restaurants in {:.1}s",
        scored.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(ScoredCorpus {
        restaurants: scored,
        cells,
        summary,
    })
}

fn summarize(scored: &[ScoredRestaurant], cell_count: usize) -> CorpusSummary {
    let n = scored.len().max(1) as f64;
    let mean_rating = scored.iter().map(|s| s.restaurant.rating).sum::<f64>() / n;
    let mean_residual = scored.iter().map(|s| s.restaurant.residual).sum::<f64>() / n;
    let predicted: Vec<f64> = scored
        .iter()
        .filter_map(|s| s.restaurant.predicted_rating)
        .collect();
    let mean_predicted = if predicted.is_empty() {
        None
    } else {
        Some(predicted.iter().sum::<f64>() / predicted.len() as f64)
    };

    let mut cuisine_counts: HashMap<String, u32> = HashMap::new();
    let mut tier_counts: HashMap<String, u32> = HashMap::new();
    for s in scored {
        *cuisine_counts
            .entry(s.restaurant.cuisine.clone())
            .or_insert(0) += 1;
        *tier_counts
            .entry(s.score.tier.as_str().to_string())
            .or_insert(0) += 1;
    }

    CorpusSummary {
        total_restaurants: scored.len(),
        mean_rating,
        mean_predicted,
        mean_residual,
        cell_count,
        cuisine_counts,
        tier_counts,
        built_at: Utc::now(),
    }
}

/// Recognized filter options for the restaurant view
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RestaurantQuery {
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub cuisine: Option<String>,
    pub min_reviews: Option<u32>,
    pub district: Option<String>,
    pub district_tier: Option<String>,
    pub venue_type: Option<String>,
    pub diaspora_only: Option<bool>,
    pub price_tier: Option<u8>,
    pub guide: Option<String>,
    pub open_day: Option<String>,
    pub name_contains: Option<String>,
    pub sort_by: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

fn parse_open_day(value: &str) -> Option<u8> {
    match value.to_lowercase().as_str() {
        "sunday" | "sun" | "0" => Some(0),
        "monday" | "mon" | "1" => Some(1),
        "tuesday" | "tue" | "2" => Some(2),
        "wednesday" | "wed" | "3" => Some(3),
        "thursday" | "thu" | "4" => Some(4),
        "friday" | "fri" | "5" => Some(5),
        "saturday" | "sat" | "6" => Some(6),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuideFilter {
    MultiStar,
    ValueGuide,
    RegionalGuide,
    Community,
    Hygiene,
    AnyGuide,
}

impl GuideFilter {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "multi_star" => Some(GuideFilter::MultiStar),
            "value_guide" => Some(GuideFilter::ValueGuide),
            "regional_guide" => Some(GuideFilter::RegionalGuide),
            "community" => Some(GuideFilter::Community),
            "hygiene" => Some(GuideFilter::Hygiene),
            "any_guide" => Some(GuideFilter::AnyGuide),
            _ => None,
        }
    }

    fn matches(self, s: &ScoredRestaurant) -> bool {
        match self {
            GuideFilter::MultiStar => s.score.michelin_stars > 0,
            GuideFilter::ValueGuide => s.score.value_guide,
            GuideFilter::RegionalGuide => s.score.regional_guide,
            GuideFilter::Community => s.score.community_mentions > 0,
            GuideFilter::Hygiene => s.score.hygiene,
            GuideFilter::AnyGuide => {
                s.score.michelin_stars > 0 || s.score.value_guide || s.score.regional_guide
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    CompositeScore,
    Rating,
    Residual,
}

impl ScoredCorpus {
    /// Filter, sort and paginate the corpus (deterministic ordering)
    pub fn query(&self, q: &RestaurantQuery) -> Result<Vec<RestaurantRow>, FoodMapError> {
        q.validate()
            .map_err(|e| FoodMapError::ValidationError(e.to_string()))?;

        // Parse enum-valued filters up front so bad values 400 cleanly
        let tier_filter = match q.district_tier.as_deref().filter(|t| *t != "all") {
            Some(raw) => Some(DistrictTier::from_str(raw).map_err(|_| {
                FoodMapError::invalid_filter("district_tier", format!("unknown tier '{}'", raw))
            })?),
            None => None,
        };
        let venue_filter = match q.venue_type.as_deref().filter(|v| *v != "all") {
            Some(raw) => {
                let known = [
                    VenueType::Restaurant,
                    VenueType::Cafe,
                    VenueType::Bar,
                    VenueType::Bakery,
                    VenueType::FastFood,
                    VenueType::SandwichShop,
                    VenueType::Takeaway,
                    VenueType::Brunch,
                    VenueType::Seafood,
                ];
                Some(
                    known
                        .into_iter()
                        .find(|v| v.as_str() == raw)
                        .ok_or_else(|| {
                            FoodMapError::invalid_filter(
                                "venue_type",
                                format!("unknown venue type '{}'", raw),
                            )
                        })?,
                )
            }
            None => None,
        };
        let guide_filter = match q.guide.as_deref() {
            Some(raw) => Some(GuideFilter::parse(raw).ok_or_else(|| {
                FoodMapError::invalid_filter("guide", format!("unknown guide '{}'", raw))
            })?),
            None => None,
        };
        let open_day = match q.open_day.as_deref() {
            Some(raw) => Some(parse_open_day(raw).ok_or_else(|| {
                FoodMapError::invalid_filter("open_day", format!("unknown weekday '{}'", raw))
            })?),
            None => None,
        };
        let sort_key = match q.sort_by.as_deref() {
            None | Some("composite_score") => SortKey::CompositeScore,
            Some("rating") => SortKey::Rating,
            Some("residual") => SortKey::Residual,
            Some(raw) => {
                return Err(FoodMapError::invalid_filter(
                    "sort_by",
                    format!("unknown sort key '{}'", raw),
                ))
            }
        };
        if let Some(price) = q.price_tier {
            if price > 4 {
                return Err(FoodMapError::invalid_filter(
                    "price_tier",
                    "price tier must be 0-4",
                ));
            }
        }

        let name_needle = q.name_contains.as_deref().map(str::to_lowercase);

        let mut matches: Vec<&ScoredRestaurant> = self
            .restaurants
            .iter()
            .filter(|s| {
                let r = &s.restaurant;
                if q.min_rating.map_or(false, |min| r.rating < min) {
                    return false;
                }
                if q.max_rating.map_or(false, |max| r.rating > max) {
                    return false;
                }
                if let Some(cuisine) = q.cuisine.as_deref().filter(|c| *c != "all") {
                    if r.cuisine != cuisine {
                        return false;
                    }
                }
                if q.min_reviews.map_or(false, |min| r.review_count < min) {
                    return false;
                }
                if let Some(district) = q.district.as_deref().filter(|d| *d != "all") {
                    if s.score.district != district {
                        return false;
                    }
                }
                if tier_filter.map_or(false, |t| s.score.district_tier != t) {
                    return false;
                }
                if venue_filter.map_or(false, |v| r.venue_type != v) {
                    return false;
                }
                if q.diaspora_only.unwrap_or(false) && !s.score.diaspora_cuisine {
                    return false;
                }
                if q.price_tier.map_or(false, |p| r.price_numeric != p) {
                    return false;
                }
                if guide_filter.map_or(false, |g| !g.matches(s)) {
                    return false;
                }
                if let Some(day) = open_day {
                    if !r.hours.is_open_on(day) {
                        return false;
                    }
                }
                if let Some(needle) = &name_needle {
                    if !r.name.to_lowercase().contains(needle) {
                        return false;
                    }
                }
                true
            })
            .collect();

        match sort_key {
            // The corpus is already in composite order
            SortKey::CompositeScore => {}
            SortKey::Rating => matches.sort_by(|a, b| {
                b.restaurant
                    .rating
                    .partial_cmp(&a.restaurant.rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.original_index.cmp(&b.original_index))
            }),
            SortKey::Residual => matches.sort_by(|a, b| {
                b.restaurant
                    .residual
                    .partial_cmp(&a.restaurant.residual)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.original_index.cmp(&b.original_index))
            }),
        }

        let limit = q.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT).max(1) as usize;
        Ok(matches
            .into_iter()
            .take(limit)
            .map(RestaurantRow::from_scored)
            .collect())
    }

    /// Top undervalued records by residual
    pub fn gems(&self, limit: i64) -> Vec<GemRow> {
        let limit = limit.clamp(1, MAX_LIMIT) as usize;
        let mut ordered: Vec<&ScoredRestaurant> = self.restaurants.iter().collect();
        ordered.sort_by(|a, b| {
            b.restaurant
                .residual
                .partial_cmp(&a.restaurant.residual)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.original_index.cmp(&b.original_index))
        });
        ordered
            .into_iter()
            .take(limit)
            .map(|s| GemRow {
                name: s.restaurant.name.clone(),
                address: s.restaurant.address.clone(),
                cuisine: s.restaurant.cuisine.clone(),
                rating: s.restaurant.rating,
                review_count: s.restaurant.review_count,
                predicted_rating: s.restaurant.predicted_rating,
                residual: s.restaurant.residual,
                lat: s.restaurant.lat,
                lng: s.restaurant.lng,
                canonical_provider_url: s.restaurant.google_maps_url.clone(),
                undervaluation_pct: (s.restaurant.residual * 1000.0).round() / 10.0,
            })
            .collect()
    }

    /// Per-district aggregates for the districts endpoint
    pub fn district_stats(&self) -> Vec<DistrictStatsRow> {
        let mut grouped: HashMap<&str, (f64, u64, f64, u32)> = HashMap::new();
        for s in &self.restaurants {
            let entry = grouped.entry(s.score.district.as_str()).or_insert((
                0.0, 0, 0.0, 0,
            ));
            entry.0 += s.restaurant.rating;
            entry.1 += u64::from(s.restaurant.review_count);
            entry.2 += s.score.composite;
            entry.3 += 1;
        }
        let mut rows: Vec<DistrictStatsRow> = grouped
            .into_iter()
            .map(|(district, (rating_sum, reviews, composite_sum, count))| {
                let n = f64::from(count);
                DistrictStatsRow {
                    district: district.to_string(),
                    avg_rating: (rating_sum / n * 100.0).round() / 100.0,
                    total_reviews: reviews,
                    avg_composite_score: (composite_sum / n * 1000.0).round() / 1000.0,
                    restaurant_count: count,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.district.cmp(&b.district));
        rows
    }
}

/// Row for the gems endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GemRow {
    pub name: String,
    pub address: Option<String>,
    pub cuisine: String,
    pub rating: f64,
    pub review_count: u32,
    pub predicted_rating: Option<f64>,
    pub residual: f64,
    pub lat: f64,
    pub lng: f64,
    pub canonical_provider_url: Option<String>,
    pub undervaluation_pct: f64,
}

/// Row for the districts endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DistrictStatsRow {
    pub district: String,
    pub avg_rating: f64,
    pub total_reviews: u64,
    pub avg_composite_score: f64,
    pub restaurant_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{brussels_config, CityContext};
    use crate::models::{HoursSummary, Restaurant};
    use h3o::{LatLng, Resolution};

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
            predicted_rating: Some(rating - 0.1),
            residual: 0.1,
        }
    }

    fn corpus() -> ScoredCorpus {
        let ctx = CityContext::from_config(brussels_config()).unwrap();

        let mut congolese = restaurant("Inzia", 50.8300, 4.3690, 4.6, 150);
        congolese.cuisine = "Congolese".to_string();
        congolese.residual = 0.4;

        let mut starred = restaurant("Comme Chez Soi", 50.8399, 4.3449, 4.7, 1800);
        starred.cuisine = "French".to_string();
        starred.price_numeric = 4;

        let mut cheap = restaurant("Snack Milano", 50.8600, 4.3300, 4.1, 90);
        cheap.cuisine = "Italian".to_string();
        cheap.price_numeric = 1;

        let mut sunday_spot = restaurant("De Zondag", 50.8200, 4.3500, 4.3, 250);
        let mut hours = HoursSummary::unknown();
        hours.known = true;
        hours.open_days = [true, false, false, false, false, true, true];
        hours.days_open_count = Some(3);
        sunday_spot.hours = hours;

        let (scored, _) = rerank(
            vec![congolese, starred, cheap, sunday_spot],
            &ctx,
            &HashMap::new(),
            &HashSet::new(),
        );
        let summary = summarize(&scored, 0);
        ScoredCorpus {
            restaurants: scored,
            cells: Vec::new(),
            summary,
        }
    }

    #[test]
    fn test_query_defaults_return_corpus_order() {
        let corpus = corpus();
        let rows = corpus.query(&RestaurantQuery::default()).unwrap();
        assert_eq!(rows.len(), 4);
        for pair in rows.windows(2) {
            assert!(pair[0].composite_score >= pair[1].composite_score);
        }
    }

    #[test]
    fn test_cuisine_and_price_filters() {
        let corpus = corpus();
        let q = RestaurantQuery {
            cuisine: Some("Congolese".to_string()),
            ..RestaurantQuery::default()
        };
        let rows = corpus.query(&q).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Inzia");

        let q = RestaurantQuery {
            price_tier: Some(1),
            ..RestaurantQuery::default()
        };
        let rows = corpus.query(&q).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Snack Milano");
    }

    #[test]
    fn test_diaspora_only_uses_the_closed_set() {
        let corpus = corpus();
        let q = RestaurantQuery {
            diaspora_only: Some(true),
            ..RestaurantQuery::default()
        };
        let rows = corpus.query(&q).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cuisine, "Congolese");
    }

    #[test]
    fn test_guide_filter_and_flags() {
        let corpus = corpus();
        let q = RestaurantQuery {
            guide: Some("multi_star".to_string()),
            ..RestaurantQuery::default()
        };
        let rows = corpus.query(&q).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Comme Chez Soi");
        assert_eq!(rows[0].michelin_stars, 2);

        let q = RestaurantQuery {
            guide: Some("any_guide".to_string()),
            ..RestaurantQuery::default()
        };
        assert_eq!(corpus.query(&q).unwrap().len(), 1);
    }

    #[test]
    fn test_open_day_filter_requires_confirmation() {
        let corpus = corpus();
        let q = RestaurantQuery {
            open_day: Some("sunday".to_string()),
            ..RestaurantQuery::default()
        };
        let rows = corpus.query(&q).unwrap();
        // Only the record whose parsed hours confirm Sunday service
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "De Zondag");
    }

    #[test]
    fn test_sort_by_residual() {
        let corpus = corpus();
        let q = RestaurantQuery {
            sort_by: Some("residual".to_string()),
            ..RestaurantQuery::default()
        };
        let rows = corpus.query(&q).unwrap();
        assert_eq!(rows[0].name, "Inzia");
    }

    #[test]
    fn test_invalid_filter_values_name_the_field() {
        let corpus = corpus();
        let q = RestaurantQuery {
            sort_by: Some("karma".to_string()),
            ..RestaurantQuery::default()
        };
        match corpus.query(&q) {
            Err(FoodMapError::InvalidFilter { field, .. }) => assert_eq!(field, "sort_by"),
            other => panic!("expected invalid filter, got {:?}", other.map(|r| r.len())),
        }

        let q = RestaurantQuery {
            district_tier: Some("bohemian".to_string()),
            ..RestaurantQuery::default()
        };
        match corpus.query(&q) {
            Err(FoodMapError::InvalidFilter { field, .. }) => {
                assert_eq!(field, "district_tier")
            }
            other => panic!("expected invalid filter, got {:?}", other.map(|r| r.len())),
        }

        let q = RestaurantQuery {
            guide: Some("zagat".to_string()),
            ..RestaurantQuery::default()
        };
        assert!(corpus.query(&q).is_err());
    }

    #[test]
    fn test_limit_ceiling_is_enforced() {
        let corpus = corpus();
        let q = RestaurantQuery {
            limit: Some(900),
            ..RestaurantQuery::default()
        };
        assert!(matches!(
            corpus.query(&q),
            Err(FoodMapError::ValidationError(_))
        ));

        let q = RestaurantQuery {
            limit: Some(2),
            ..RestaurantQuery::default()
        };
        assert_eq!(corpus.query(&q).unwrap().len(), 2);
    }

    #[test]
    fn test_gems_rank_by_residual() {
        let corpus = corpus();
        let gems = corpus.gems(10);
        assert_eq!(gems.len(), 4);
        assert_eq!(gems[0].name, "Inzia");
        assert!((gems[0].undervaluation_pct - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_district_stats_cover_all_emitted_records() {
        let corpus = corpus();
        let stats = corpus.district_stats();
        let total: u32 = stats.iter().map(|s| s.restaurant_count).sum();
        assert_eq!(total as usize, corpus.restaurants.len());
        // Sorted by district name for a deterministic response
        for pair in stats.windows(2) {
            assert!(pair[0].district < pair[1].district);
        }
    }

    #[test]
    fn test_empty_handle_reports_unavailable_with_hint() {
        let handle = CorpusHandle::empty();
        match handle.get() {
            Err(FoodMapError::CorpusUnavailable { hint }) => {
                assert!(hint.contains("DATA_PATH"));
            }
            _ => panic!("expected unavailable"),
        }
    }

    #[test]
    fn test_rows_serialize_missing_fields_as_null() {
        let corpus = corpus();
        let rows = corpus.query(&RestaurantQuery::default()).unwrap();
        let json = serde_json::to_value(&rows[0]).unwrap();
        // Optional columns are null, never NaN
        assert!(json.get("neighborhood").is_some());
        let text = serde_json::to_string(&rows).unwrap();
        assert!(!text.contains("NaN"));
    }
}
