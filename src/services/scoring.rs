// src/services/scoring.rs
// DOCUMENTATION: The scoring engine
// PURPOSE: One record + city context + corpus statistics -> composite score

use std::collections::{HashMap, HashSet};

use anyhow::bail;

use crate::context::{canonical_key, normalize_name, AreaSpec, CityContext, StreetSpec};
use crate::models::{
    DistrictTier, HorseshoeType, HoursSummary, Restaurant, RestaurantTier, ScarcityBreakdown,
    ScoreBreakdown, ScoreResult,
};

// Positive-component weights; they sum to 1.0 exactly (validated at start)
pub const W_BASE_QUALITY: f64 = 0.32;
pub const W_ML_RESIDUAL: f64 = 0.18;
pub const W_SCARCITY: f64 = 0.12;
pub const W_INDEPENDENT: f64 = 0.10;
pub const W_GUIDE: f64 = 0.08;
pub const W_DIASPORA: f64 = 0.07;
pub const W_REDDIT: f64 = 0.05;
pub const W_BRUXELLOIS: f64 = 0.04;
pub const W_FAMILY_NAME: f64 = 0.02;
pub const W_SPECIFICITY: f64 = 0.01;
pub const W_CUISINE_RARITY: f64 = 0.01;

pub const POSITIVE_WEIGHTS: [f64; 11] = [
    W_BASE_QUALITY,
    W_ML_RESIDUAL,
    W_SCARCITY,
    W_INDEPENDENT,
    W_GUIDE,
    W_DIASPORA,
    W_REDDIT,
    W_BRUXELLOIS,
    W_FAMILY_NAME,
    W_SPECIFICITY,
    W_CUISINE_RARITY,
];

// Penalty caps (subtractive)
pub const CAP_TOURIST_TRAP: f64 = 0.15;
pub const CAP_CHAIN: f64 = 0.10;
pub const CAP_LOW_REVIEW: f64 = 0.15;
pub const CAP_EXPAT_BUBBLE: f64 = 0.03;
pub const CAP_PRICE_QUALITY: f64 = 0.10;
pub const CAP_NON_RESTAURANT: f64 = 0.80;

/// Structural invariant check, run at process start
pub fn validate_weights() -> anyhow::Result<()> {
    let sum: f64 = POSITIVE_WEIGHTS.iter().sum();
    if (sum - 1.0).abs() > 1e-12 {
        bail!("positive-component weights sum to {}, expected 1.0", sum);
    }
    Ok(())
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sample-size confidence in [0,1): 1 - 1/sqrt(1 + n/50), linearly damped
/// below 10 reviews
pub fn confidence(review_count: u32) -> f64 {
    let base = 1.0 - 1.0 / (1.0 + f64::from(review_count) / 50.0).sqrt();
    if review_count < 10 {
        base * f64::from(review_count) / 10.0
    } else {
        base
    }
}

/// Smooth review-volume adjustment: a low-count penalty, two mid-band
/// bells, and a tier-dependent high-volume penalty. Classic fry shops
/// skip the high-volume term: their queues are authentic.
pub fn review_adjustment(review_count: u32, tier: DistrictTier, fry_exception: bool) -> f64 {
    let x = f64::from(review_count);
    let low = -0.12 * sigmoid((15.0 - x) / 4.0);
    let bell_75 = 0.05 * (-((x - 75.0) / 40.0).powi(2)).exp();
    let bell_300 = 0.03 * (-((x - 300.0) / 150.0).powi(2)).exp();
    let high_volume = if fry_exception {
        0.0
    } else if tier.is_local_leaning() {
        -0.10 * sigmoid((x - 2500.0) / 500.0)
    } else {
        -0.20 * sigmoid((x - 2000.0) / 300.0)
    };
    low + bell_75 + bell_300 + high_volume
}

/// Middle-band review scarcity: peaks at 50-200, tapers above, ramps in
/// from 35, fades out linearly past 500
pub fn review_scarcity(review_count: u32) -> f64 {
    let n = review_count;
    match n {
        50..=200 => 1.0,
        201..=500 => 0.7,
        35..=49 => 0.3 + (f64::from(n) - 35.0) / 14.0 * 0.56,
        501..=600 => 0.7 * (1.0 - (f64::from(n) - 500.0) / 100.0),
        _ => 0.0,
    }
}

/// The operating-hours U-curve: Lark (artisan-limited) or Owl (late-night
/// anchor), never both; no bonus below rating 4.0 or with unknown hours
pub fn horseshoe(hours: &HoursSummary, rating: f64) -> (f64, Option<HorseshoeType>) {
    if rating < 4.0 || !hours.known {
        return (0.0, None);
    }
    let days = hours.days_open_count.unwrap_or(7);
    let short_week = hours.total_weekly_hours.map_or(false, |h| h < 30.0);

    if hours.service_coupe || hours.lunch_only || short_week || days <= 4 {
        let mut score: f64 = 0.6;
        if hours.service_coupe {
            score += 0.1;
        }
        if hours.lunch_only {
            score += 0.15;
        }
        if short_week || days <= 3 {
            score += 0.15;
        }
        return (score.min(1.0), Some(HorseshoeType::Lark));
    }
    if hours.closes_late {
        return (0.8, Some(HorseshoeType::Owl));
    }
    (0.0, None)
}

/// Corpus-level statistics consumed by the scoring engine
#[derive(Debug, Default, Clone)]
pub struct CorpusStats {
    pub district_review_totals: HashMap<String, u64>,
    pub district_cuisine_counts: HashMap<String, HashMap<String, u32>>,
}

impl CorpusStats {
    /// Compute per-district totals from the featured corpus and its
    /// district assignment (same order)
    pub fn compute(restaurants: &[Restaurant], districts: &[String]) -> Self {
        let mut stats = CorpusStats::default();
        for (r, district) in restaurants.iter().zip(districts) {
            *stats
                .district_review_totals
                .entry(district.clone())
                .or_insert(0) += u64::from(r.review_count);
            *stats
                .district_cuisine_counts
                .entry(district.clone())
                .or_default()
                .entry(r.cuisine.clone())
                .or_insert(0) += 1;
        }
        stats
    }

    /// The cuisine's share within its district; 0 when unknown
    pub fn cuisine_share(&self, district: &str, cuisine: &str) -> f64 {
        let Some(counts) = self.district_cuisine_counts.get(district) else {
            return 0.0;
        };
        let total: u32 = counts.values().sum();
        if total == 0 {
            return 0.0;
        }
        f64::from(counts.get(cuisine).copied().unwrap_or(0)) / f64::from(total)
    }
}

/// The scoring engine
/// DOCUMENTATION: Constructed from context, corpus statistics, community
/// mentions and hygiene certification; holds no mutable state. For a fixed
/// input the output is bit-identical across invocations.
pub struct Scorer<'a> {
    ctx: &'a CityContext,
    stats: &'a CorpusStats,
    community: &'a HashMap<String, u32>,
    hygiene: &'a HashSet<String>,
}

impl<'a> Scorer<'a> {
    pub fn new(
        ctx: &'a CityContext,
        stats: &'a CorpusStats,
        community: &'a HashMap<String, u32>,
        hygiene: &'a HashSet<String>,
    ) -> Self {
        Scorer {
            ctx,
            stats,
            community,
            hygiene,
        }
    }

    /// Score one record; never fails, missing optional inputs zero out
    /// only their dependent terms
    pub fn score(&self, r: &Restaurant) -> ScoreResult {
        let district = self.ctx.district_of(r.lat, r.lng).to_string();
        let district_tier = self
            .ctx
            .district_tier(&district)
            .unwrap_or(DistrictTier::Mixed);
        let neighborhood = self.ctx.neighborhood_of(r.lat, r.lng);
        let effective_tier = neighborhood.map_or(district_tier, |n| n.tier);
        let street = self.ctx.on_diaspora_street(r.lat, r.lng);

        let conf = confidence(r.review_count);
        let fry_exception = self.ctx.is_classic_fry_shop(&r.name)
            && (self.ctx.is_local_cuisine(&r.cuisine) || r.cuisine == "Fast Food");

        let mut b = ScoreBreakdown::default();

        b.base_quality = W_BASE_QUALITY * (r.rating / 5.0) * (0.5 + 0.5 * conf);
        b.ml_residual = W_ML_RESIDUAL * (r.residual * 2.0).clamp(-1.0, 1.0) * conf;
        b.review_adjustment = review_adjustment(r.review_count, effective_tier, fry_exception);

        // Tourist trap: raw severity in [0, 0.7], then cap and the
        // collinearity guard against double-counting volume
        let tourist_raw = self.tourist_trap_raw(r, neighborhood);
        let mut tourist_penalty = -2.0 * CAP_TOURIST_TRAP * tourist_raw;
        if b.review_adjustment < 0.0 {
            tourist_penalty *= 0.5;
        }
        b.tourist_trap = tourist_penalty.max(-CAP_TOURIST_TRAP);

        b.diaspora = self.diaspora_score(r, &district, street, tourist_raw);

        b.independent = W_INDEPENDENT * if r.is_chain { 0.0 } else { 1.0 };
        b.chain = if r.is_chain { -CAP_CHAIN } else { 0.0 };

        // Scarcity composite
        let rs = review_scarcity(r.review_count);
        let (horseshoe_bonus, horseshoe_type) = horseshoe(&r.hours, r.rating);
        let rare = self.ctx.rare_cuisine_weight(&r.cuisine);
        let scarcity = ScarcityBreakdown {
            review_scarcity: rs,
            horseshoe_bonus,
            cuisine_rarity: rare,
            horseshoe_type,
        };
        b.scarcity = W_SCARCITY * (0.70 * rs + 0.20 * horseshoe_bonus + 0.10 * rare);

        // Guide recognition: highest applicable only, no stacking
        let michelin_stars = self.ctx.michelin_stars(&r.name);
        let value_guide = self.ctx.has_value_guide(&r.name);
        let regional_guide = self.ctx.has_regional_guide(&r.name);
        let guide_inner = if michelin_stars >= 2 {
            1.0
        } else if michelin_stars == 1 {
            0.75
        } else if value_guide {
            0.5
        } else if regional_guide {
            0.375
        } else {
            0.0
        };
        b.guide_recognition = W_GUIDE * guide_inner;

        // Community endorsements: exact-normalized matching, never fuzzy
        let mentions = self
            .community
            .get(&normalize_name(&r.name))
            .copied()
            .unwrap_or(0);
        let mention_base = match mentions {
            0 => 0.0,
            1 => 0.2,
            2 => 0.4,
            3 | 4 => 0.6,
            5..=9 => 0.8,
            _ => 1.0,
        };
        let size_multiplier = if r.review_count < 200 {
            1.2
        } else if r.review_count > 2000 {
            0.7
        } else {
            1.0
        };
        b.reddit_community = W_REDDIT * mention_base * size_multiplier;

        b.low_review = low_review_penalty(r.rating, r.review_count);

        b.family_name = if !r.is_chain && self.ctx.family_name_match(&r.name) {
            W_FAMILY_NAME
        } else {
            0.0
        };

        b.specificity = W_SPECIFICITY * self.ctx.cuisine_specificity(&r.cuisine);

        // Curated institutions plus the authentic-district fry-shop path
        let mut institution = self.ctx.local_institution_score(&r.name);
        let looks_like_fry_shop =
            self.ctx.is_local_cuisine(&r.cuisine) && normalize_name(&r.name).contains("frit");
        if (looks_like_fry_shop || self.ctx.is_classic_fry_shop(&r.name))
            && self.ctx.tier_weight(district_tier) > 0.0
        {
            institution = institution.max(self.ctx.tier_weight(district_tier));
        }
        b.bruxellois_local = W_BRUXELLOIS * institution;

        // Rarity within the district
        let share = self.stats.cuisine_share(&district, &r.cuisine);
        let rarity_inner = if share > 0.0 {
            (1.0 / (10.0 * share)).min(1.0)
        } else {
            1.0
        };
        b.cuisine_rarity = W_CUISINE_RARITY * rarity_inner;

        b.expat_bubble = self.expat_bubble_penalty(r);
        b.price_quality = price_quality_penalty(r.price_numeric, r.rating);
        b.value_bonus = value_bonus(r.price_numeric, r.rating);

        // Reproducible even though such records are filtered upstream
        b.non_restaurant = if self.ctx.non_restaurant_shop(&r.name) {
            -CAP_NON_RESTAURANT
        } else {
            0.0
        };

        let composite = b.total().clamp(0.0, 1.0);

        ScoreResult {
            composite,
            tier: RestaurantTier::from_score(composite),
            breakdown: b,
            scarcity,
            tourist_trap_raw: tourist_raw,
            district,
            district_tier: effective_tier,
            neighborhood: neighborhood.map(|n| n.name.clone()),
            diaspora_street: street.map(|s| s.name.clone()),
            michelin_stars,
            value_guide,
            regional_guide,
            community_mentions: mentions,
            hygiene: self.hygiene.contains(&canonical_key(&r.name)),
            diaspora_cuisine: self.ctx.is_diaspora_cuisine(&r.cuisine),
        }
    }

    /// Raw tourist-trap severity. Zero outside the trap zone; inside it,
    /// volume and rating deficits scale the severity up to 0.7.
    fn tourist_trap_raw(&self, r: &Restaurant, neighborhood: Option<&AreaSpec>) -> f64 {
        let dist = self.ctx.distance_to_tourist_epicenter(r.lat, r.lng);
        let in_trap_neighborhood = neighborhood.map_or(false, |n| {
            n.tier == DistrictTier::TouristTrap
                || self
                    .ctx
                    .tourist_trap_neighborhood
                    .as_deref()
                    .map_or(false, |configured| configured == n.name)
        });
        let in_zone = in_trap_neighborhood || dist < 0.15;
        if !in_zone {
            return 0.0;
        }

        if r.review_count > 1500 && r.rating < 4.3 {
            0.4 + 0.3 * ((4.3 - r.rating) / 0.4).clamp(0.0, 1.0)
        } else if r.review_count > 1500 {
            0.15
        } else if r.rating < 4.3 && dist < 0.1 {
            0.2
        } else {
            0.0
        }
    }

    /// Diaspora authenticity bonus with its gate and filters
    fn diaspora_score(
        &self,
        r: &Restaurant,
        district: &str,
        street: Option<&StreetSpec>,
        tourist_raw: f64,
    ) -> f64 {
        if tourist_raw > 0.3 {
            return 0.0;
        }
        if r.rating < 3.5 {
            return 0.0;
        }
        if self
            .ctx
            .in_non_restaurant_location(&r.name, r.address.as_deref())
        {
            return 0.0;
        }

        // Authenticity: the community's districts, with a small floor for
        // the cuisine outside its typical areas
        let mut base = match self.ctx.diaspora_districts(&r.cuisine) {
            Some(districts) => districts.get(district).copied().unwrap_or(0.2),
            None => 0.0,
        };
        base = base.max(self.ctx.local_authenticity(&r.cuisine, district));
        if base <= 0.0 {
            return 0.0;
        }

        if let Some(street) = street {
            if self.ctx.street_serves_cuisine(street, &r.cuisine) {
                base = (base + 0.3).min(1.0);
            }
        }

        if self.ctx.has_hipster_keyword(&r.name) {
            base *= 0.3;
        }
        if r.price_numeric == 4 {
            base *= 0.2;
        }

        W_DIASPORA * base
    }

    /// Expat-bubble penalty within 1 km of the expat-district center
    fn expat_bubble_penalty(&self, r: &Restaurant) -> f64 {
        let dist = self.ctx.distance_to_expat_center(r.lat, r.lng);
        if dist > 1.0 {
            return 0.0;
        }
        let proximity = 1.0 - dist;
        let price_signal = if r.price_numeric >= 3 {
            f64::from(r.price_numeric - 2) / 2.0
        } else {
            0.0
        };
        let language_signal = english_share(r).map_or(0.0, |share| {
            if share > 0.7 {
                0.5
            } else {
                0.0
            }
        });
        -CAP_EXPAT_BUBBLE * proximity * (0.4 * price_signal + 0.3 * language_signal + 0.3)
    }
}

/// Share of English among available review languages, if any
fn english_share(r: &Restaurant) -> Option<f64> {
    let languages = r.review_languages.as_ref()?;
    let total: u32 = languages.values().sum();
    if total == 0 {
        return None;
    }
    Some(f64::from(languages.get("en").copied().unwrap_or(0)) / f64::from(total))
}

/// Implausibly perfect small-sample ratings are discounted; the penalty
/// tapers out over 150-200 reviews so ranking has no cliff at 200
pub fn low_review_penalty(rating: f64, review_count: u32) -> f64 {
    if review_count >= 200 {
        return 0.0;
    }
    let extremity = (rating - 4.0).clamp(0.0, 1.0);
    let taper = ((200.0 - f64::from(review_count)) / 50.0).clamp(0.0, 1.0);
    -CAP_LOW_REVIEW * (1.0 - confidence(review_count)) * extremity * taper
}

/// Expensive places owe a rating premium
pub fn price_quality_penalty(price_numeric: u8, rating: f64) -> f64 {
    let penalty = match price_numeric {
        4 if rating < 4.5 => -0.10 * (4.5 - rating),
        3 if rating < 4.3 => -0.06 * (4.3 - rating),
        _ => 0.0,
    };
    penalty.max(-CAP_PRICE_QUALITY)
}

/// Cheap places with outstanding ratings earn a small additive bonus
pub fn value_bonus(price_numeric: u8, rating: f64) -> f64 {
    match price_numeric {
        1 if rating >= 4.5 => 0.04,
        1 if rating >= 4.2 => 0.02,
        2 if rating >= 4.6 => 0.02,
        2 if rating >= 4.4 => 0.01,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{brussels_config, CityContext};
    use crate::models::VenueType;
    use h3o::{LatLng, Resolution};

    fn ctx() -> CityContext {
        CityContext::from_config(brussels_config()).unwrap()
    }

    fn restaurant(name: &str, lat: f64, lng: f64) -> Restaurant {
        Restaurant {
            id: format!("id-{}", name),
            name: name.to_string(),
            address: None,
            lat,
            lng,
            rating: 4.3,
            review_count: 150,
            types: vec![],
            primary_type: None,
            website: None,
            google_maps_url: None,
            opening_hours: None,
            review_languages: None,
            cuisine: "Other".to_string(),
            venue_type: VenueType::Restaurant,
            price_numeric: 2,
            is_chain: false,
            log_review_count: 151f64.ln(),
            hours: HoursSummary::unknown(),
            hex_index: LatLng::new(lat, lng).unwrap().to_cell(Resolution::Eight),
            hex_restaurant_count: 5,
            hex_mean_rating: 4.2,
            hex_cuisine_entropy: 1.0,
            hex_chain_share: 0.0,
            predicted_rating: None,
            residual: 0.0,
        }
    }

    fn score_with(r: &Restaurant) -> ScoreResult {
        let ctx = ctx();
        let stats = CorpusStats::default();
        let community = HashMap::new();
        let hygiene = HashSet::new();
        let scorer = Scorer::new(&ctx, &stats, &community, &hygiene);
        scorer.score(r)
    }

    #[test]
    fn test_positive_weights_sum_to_one() {
        assert!(validate_weights().is_ok());
        let sum: f64 = POSITIVE_WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_composite_is_bounded() {
        let mut r = restaurant("Bound Check", 50.8467, 4.3525);
        for rating in [1.0, 3.0, 5.0] {
            for reviews in [0u32, 5, 80, 900, 20000] {
                r.rating = rating;
                r.review_count = reviews;
                let result = score_with(&r);
                assert!(
                    (0.0..=1.0).contains(&result.composite),
                    "composite {} out of bounds",
                    result.composite
                );
            }
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let r = restaurant("Determinism", 50.8300, 4.3690);
        let a = score_with(&r);
        let b = score_with(&r);
        assert_eq!(a.composite.to_bits(), b.composite.to_bits());
        assert_eq!(a.breakdown, b.breakdown);
        assert_eq!(a.scarcity, b.scarcity);
    }

    #[test]
    fn test_confidence_monotone_in_review_count() {
        let mut previous = -1.0;
        for n in 0..3000 {
            let c = confidence(n);
            assert!(c >= previous, "confidence dipped at {}", n);
            previous = c;
        }
    }

    #[test]
    fn test_base_quality_and_residual_monotone_in_review_count() {
        let ctx = ctx();
        let stats = CorpusStats::default();
        let community = HashMap::new();
        let hygiene = HashSet::new();
        let scorer = Scorer::new(&ctx, &stats, &community, &hygiene);

        let mut r = restaurant("Monotone", 50.8200, 4.3500);
        r.rating = 4.4;
        r.residual = 0.3;
        let mut last_base = -1.0;
        let mut last_residual = -1.0;
        for n in (0..3000).step_by(7) {
            r.review_count = n;
            let result = scorer.score(&r);
            assert!(result.breakdown.base_quality >= last_base);
            assert!(result.breakdown.ml_residual >= last_residual);
            last_base = result.breakdown.base_quality;
            last_residual = result.breakdown.ml_residual;
        }
    }

    #[test]
    fn test_no_review_count_cliffs() {
        let ctx = ctx();
        let stats = CorpusStats::default();
        let community = HashMap::new();
        let hygiene = HashSet::new();
        let scorer = Scorer::new(&ctx, &stats, &community, &hygiene);

        // Composite moves smoothly across every integer review-count
        // increment for a record outside the categorical trap zone
        let mut r = restaurant("Smooth", 50.8275, 4.3697);
        r.rating = 5.0;
        let mut previous: Option<f64> = None;
        for n in 10..=3000u32 {
            r.review_count = n;
            let composite = scorer.score(&r).composite;
            if let Some(prev) = previous {
                assert!(
                    (composite - prev).abs() <= 0.05,
                    "cliff of {} at review_count {}",
                    (composite - prev).abs(),
                    n
                );
            }
            previous = Some(composite);
        }
    }

    #[test]
    fn test_guide_recognition_no_stacking() {
        let ctx = ctx();
        let stats = CorpusStats::default();
        let community = HashMap::new();
        let hygiene = HashSet::new();
        let scorer = Scorer::new(&ctx, &stats, &community, &hygiene);

        // Comme Chez Soi is both 2-star and Gault&Millau: only the
        // highest applies
        let r = restaurant("Comme Chez Soi", 50.8399, 4.3449);
        let result = scorer.score(&r);
        assert!(result.michelin_stars >= 2);
        assert!(result.regional_guide);
        assert!((result.breakdown.guide_recognition - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_horseshoe_exclusivity() {
        let mut r = restaurant("Hours", 50.8200, 4.3500);
        r.rating = 4.5;

        // Lark: lunch-only short week
        let mut lark_hours = HoursSummary::unknown();
        lark_hours.known = true;
        lark_hours.days_open_count = Some(5);
        lark_hours.lunch_only = true;
        lark_hours.total_weekly_hours = Some(20.0);
        lark_hours.closes_late = true; // contradictory data: lark still wins alone
        r.hours = lark_hours;
        let result = score_with(&r);
        assert_eq!(result.scarcity.horseshoe_type, Some(HorseshoeType::Lark));

        // Owl: late closes only
        let mut owl_hours = HoursSummary::unknown();
        owl_hours.known = true;
        owl_hours.days_open_count = Some(7);
        owl_hours.closes_late = true;
        owl_hours.total_weekly_hours = Some(70.0);
        r.hours = owl_hours;
        let result = score_with(&r);
        assert_eq!(result.scarcity.horseshoe_type, Some(HorseshoeType::Owl));
        assert!((result.scarcity.horseshoe_bonus - 0.8).abs() < 1e-12);

        // No bonus below rating 4.0
        r.rating = 3.9;
        let result = score_with(&r);
        assert_eq!(result.scarcity.horseshoe_type, None);
        assert_eq!(result.scarcity.horseshoe_bonus, 0.0);
    }

    #[test]
    fn test_diaspora_gate_on_tourist_raw() {
        // Inside Rue des Bouchers with trap-grade volume and rating
        let mut r = restaurant("Chez Fatou", 50.8478, 4.3544);
        r.cuisine = "Congolese".to_string();
        r.rating = 3.9;
        r.review_count = 3000;
        let result = score_with(&r);
        assert!(result.tourist_trap_raw > 0.3);
        assert_eq!(result.breakdown.diaspora, 0.0);
    }

    #[test]
    fn test_scenario_classic_two_star() {
        let mut r = restaurant("Comme Chez Soi", 50.8399, 4.3449);
        r.cuisine = "French".to_string();
        r.rating = 4.7;
        r.review_count = 1800;
        r.price_numeric = 4;

        let result = score_with(&r);
        assert!((result.breakdown.guide_recognition - 0.08).abs() < 1e-12);
        assert_eq!(result.breakdown.chain, 0.0);

        let expected_base = 0.32 * (4.7 / 5.0) * (0.5 + 0.5 * confidence(1800));
        assert!((result.breakdown.base_quality - expected_base).abs() < 1e-12);
        // Depending on the residual the tier is Chef's Kiss or Kitchen
        // Approved; with a zero residual it must already clear Workable
        assert!(result.tier.rank() >= RestaurantTier::KitchenApproved.rank());

        let mut undervalued = r.clone();
        undervalued.residual = 0.5;
        let lifted = score_with(&undervalued);
        assert_eq!(lifted.tier, RestaurantTier::ChefsKiss);
    }

    #[test]
    fn test_scenario_classic_fry_shop_skips_volume_penalty() {
        let mut r = restaurant("Maison Antoine", 50.8360, 4.3870);
        r.cuisine = "Belgian".to_string();
        r.rating = 4.2;
        r.review_count = 3500;
        let result = score_with(&r);
        assert!(
            result.breakdown.review_adjustment.abs() < 1e-6,
            "exception must zero the adjustment, got {}",
            result.breakdown.review_adjustment
        );
        assert_eq!(result.district, "Etterbeek");
    }

    #[test]
    fn test_scenario_tourist_trap_pattern() {
        let mut r = restaurant("Aux Mille Moules", 50.8478, 4.3544);
        r.rating = 3.9;
        r.review_count = 3000;
        let result = score_with(&r);
        assert!(
            result.breakdown.tourist_trap <= -0.10 && result.breakdown.tourist_trap >= -0.15,
            "tourist penalty {} outside [-0.15, -0.10]",
            result.breakdown.tourist_trap
        );
        assert_eq!(result.breakdown.diaspora, 0.0);
        assert!(result.tier.rank() <= RestaurantTier::Workable.rank());
    }

    #[test]
    fn test_scenario_family_diaspora_restaurant() {
        // On the Matongé diaspora street in Ixelles
        let mut r = restaurant("Chez Mamie Kinshasa", 50.8300, 4.3690);
        r.cuisine = "Congolese".to_string();
        r.rating = 4.6;
        r.review_count = 120;
        let result = score_with(&r);

        assert_eq!(result.diaspora_street.as_deref(), Some("Chaussée de Wavre (Matongé)"));
        assert!((result.breakdown.family_name - 0.02).abs() < 1e-12);
        // Full authenticity plus the street boost clamps the inner score at
        // 1.0, so the component equals its weight
        assert!((result.breakdown.diaspora - 0.07).abs() < 1e-12);
        assert!((result.breakdown.independent - 0.10).abs() < 1e-12);
        assert!(result.tier.rank() >= RestaurantTier::KitchenApproved.rank());
    }

    #[test]
    fn test_scenario_perfect_rating_trap() {
        let mut r = restaurant("Hidden Perfect", 50.8200, 4.3600);
        r.rating = 5.0;
        r.review_count = 8;
        let result = score_with(&r);
        assert!(
            result.breakdown.low_review < -0.12,
            "low-review penalty too soft: {}",
            result.breakdown.low_review
        );
        assert!(result.breakdown.base_quality < 0.20);
        assert!(result.composite < 0.48);
    }

    #[test]
    fn test_chain_loses_bonus_and_takes_penalty() {
        let mut r = restaurant("McDonald's Bourse", 50.8480, 4.3490);
        r.is_chain = true;
        let result = score_with(&r);
        assert_eq!(result.breakdown.independent, 0.0);
        assert!((result.breakdown.chain + 0.10).abs() < 1e-12);
        // Chains never earn the family-name bonus either
        assert_eq!(result.breakdown.family_name, 0.0);
    }

    #[test]
    fn test_expat_bubble_needs_proximity_and_price() {
        let mut r = restaurant("Euro Bistro", 50.8427, 4.3827);
        r.price_numeric = 4;
        r.rating = 4.6; // avoid mixing in the price-quality penalty
        let near = score_with(&r);
        assert!(near.breakdown.expat_bubble < 0.0);
        assert!(near.breakdown.expat_bubble >= -CAP_EXPAT_BUBBLE);

        // Same place far from the quarter: no penalty
        let mut far = r.clone();
        far.lat = 50.8000;
        far.lng = 4.3333;
        let far_result = score_with(&far);
        assert_eq!(far_result.breakdown.expat_bubble, 0.0);
    }

    #[test]
    fn test_language_signal_degrades_to_zero_when_absent() {
        let mut r = restaurant("Quiet Corner", 50.8427, 4.3827);
        r.price_numeric = 3;
        r.rating = 4.5;
        let without = score_with(&r);

        let mut languages = HashMap::new();
        languages.insert("en".to_string(), 90u32);
        languages.insert("fr".to_string(), 10u32);
        r.review_languages = Some(languages);
        let with = score_with(&r);
        // English-heavy reviews deepen the penalty; absence never crashes
        assert!(with.breakdown.expat_bubble < without.breakdown.expat_bubble);
    }

    #[test]
    fn test_price_quality_and_value_bonus() {
        assert_eq!(price_quality_penalty(4, 4.5), 0.0);
        assert!((price_quality_penalty(4, 4.0) + 0.05).abs() < 1e-12);
        assert!((price_quality_penalty(3, 4.0) + 0.018).abs() < 1e-12);
        assert_eq!(price_quality_penalty(2, 3.0), 0.0);

        assert_eq!(value_bonus(1, 4.6), 0.04);
        assert_eq!(value_bonus(1, 4.3), 0.02);
        assert_eq!(value_bonus(2, 4.65), 0.02);
        assert_eq!(value_bonus(2, 4.45), 0.01);
        assert_eq!(value_bonus(2, 4.2), 0.0);
        assert_eq!(value_bonus(4, 5.0), 0.0);
    }

    #[test]
    fn test_review_scarcity_bands() {
        assert_eq!(review_scarcity(10), 0.0);
        assert_eq!(review_scarcity(20), 0.0);
        assert!((review_scarcity(35) - 0.3).abs() < 1e-12);
        assert!((review_scarcity(49) - 0.86).abs() < 1e-12);
        assert_eq!(review_scarcity(50), 1.0);
        assert_eq!(review_scarcity(200), 1.0);
        assert!((review_scarcity(350) - 0.7).abs() < 1e-12);
        assert!(review_scarcity(550) > 0.0 && review_scarcity(550) < 0.7);
        assert_eq!(review_scarcity(700), 0.0);
    }

    #[test]
    fn test_community_mentions_step_and_size() {
        let ctx = ctx();
        let stats = CorpusStats::default();
        let mut community = HashMap::new();
        community.insert("le petit pont".to_string(), 5u32);
        let hygiene = HashSet::new();
        let scorer = Scorer::new(&ctx, &stats, &community, &hygiene);

        let mut r = restaurant("Le Petit Pont", 50.8200, 4.3500);
        r.review_count = 150; // small place: 1.2x multiplier
        let result = scorer.score(&r);
        assert!((result.breakdown.reddit_community - 0.05 * 0.8 * 1.2).abs() < 1e-12);
        assert_eq!(result.community_mentions, 5);

        // Exact-normalized matching only: a different name earns nothing
        let other = restaurant("Le Petit Pont d'Or", 50.8200, 4.3500);
        let result = scorer.score(&other);
        assert_eq!(result.breakdown.reddit_community, 0.0);
    }

    #[test]
    fn test_hygiene_flag_matches_canonical_key() {
        let ctx = ctx();
        let stats = CorpusStats::default();
        let community = HashMap::new();
        let mut hygiene = HashSet::new();
        // The registry carries the legal name with a company suffix
        hygiene.insert(canonical_key("Chez Lucie BVBA"));
        let scorer = Scorer::new(&ctx, &stats, &community, &hygiene);

        let flagged = scorer.score(&restaurant("Restaurant Chez Lucie", 50.82, 4.35));
        assert!(flagged.hygiene);
        let unflagged = scorer.score(&restaurant("Chez Luc", 50.82, 4.35));
        assert!(!unflagged.hygiene);
        // Hygiene is a marker, not a scoring signal
        assert_eq!(flagged.composite.to_bits(), {
            let no_hygiene = HashSet::new();
            let bare = Scorer::new(&ctx, &stats, &community, &no_hygiene);
            bare.score(&restaurant("Restaurant Chez Lucie", 50.82, 4.35))
                .composite
                .to_bits()
        });
    }

    #[test]
    fn test_non_restaurant_penalty_is_reproducible() {
        let r = restaurant("Neuhaus Grand Place", 50.8467, 4.3525);
        let result = score_with(&r);
        assert!((result.breakdown.non_restaurant + 0.80).abs() < 1e-12);
    }
}
