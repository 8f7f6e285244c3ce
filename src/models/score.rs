// src/models/score.rs
// DOCUMENTATION: Scoring output structures
// PURPOSE: Named per-signal breakdowns emitted alongside the composite score

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DistrictTier, RestaurantTier};

/// Which tail of the operating-hours U-curve a record sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorseshoeType {
    /// Artisan-limited: service coupé, very short weeks, lunch-only
    Lark,
    /// Late-night community anchor: regularly closes past 01:00
    Owl,
}

impl HorseshoeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            HorseshoeType::Lark => "lark",
            HorseshoeType::Owl => "owl",
        }
    }
}

impl fmt::Display for HorseshoeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scarcity sub-components, emitted for transparency
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScarcityBreakdown {
    /// Middle-band review-count signal in [0,1]
    pub review_scarcity: f64,
    /// Horseshoe (Lark/Owl) hours signal in [0,1]
    pub horseshoe_bonus: f64,
    /// Rare-cuisine table lookup in [0,1]
    pub cuisine_rarity: f64,
    /// Which tail earned the horseshoe bonus, if any
    pub horseshoe_type: Option<HorseshoeType>,
}

/// Every contributing signal, already weighted/capped
/// DOCUMENTATION: The composite score is exactly the sum of these fields
/// before clamping to [0,1]. Positive components carry their weight; the
/// penalties are negative or zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_quality: f64,
    pub ml_residual: f64,
    pub scarcity: f64,
    pub independent: f64,
    pub guide_recognition: f64,
    pub diaspora: f64,
    pub reddit_community: f64,
    pub bruxellois_local: f64,
    pub family_name: f64,
    pub specificity: f64,
    pub cuisine_rarity: f64,

    // Unweighted additive terms
    pub review_adjustment: f64,
    pub value_bonus: f64,

    // Penalties (each bounded by its cap)
    pub tourist_trap: f64,
    pub chain: f64,
    pub low_review: f64,
    pub expat_bubble: f64,
    pub price_quality: f64,
    pub non_restaurant: f64,
}

impl ScoreBreakdown {
    /// Sum of every additive term; the composite before clamping
    pub fn total(&self) -> f64 {
        self.base_quality
            + self.ml_residual
            + self.scarcity
            + self.independent
            + self.guide_recognition
            + self.diaspora
            + self.reddit_community
            + self.bruxellois_local
            + self.family_name
            + self.specificity
            + self.cuisine_rarity
            + self.review_adjustment
            + self.value_bonus
            + self.tourist_trap
            + self.chain
            + self.low_review
            + self.expat_bubble
            + self.price_quality
            + self.non_restaurant
    }
}

/// Full scoring output for one record
#[derive(Debug, Clone)]
pub struct ScoreResult {
    /// Composite score, clamped to [0,1]
    pub composite: f64,
    pub tier: RestaurantTier,
    pub breakdown: ScoreBreakdown,
    pub scarcity: ScarcityBreakdown,

    /// Raw tourist-trap severity in [0,0.7] before cap/guard, used by the
    /// diaspora gate and emitted for debugging
    pub tourist_trap_raw: f64,

    // Geographic assignment
    pub district: String,
    pub district_tier: DistrictTier,
    pub neighborhood: Option<String>,
    pub diaspora_street: Option<String>,

    // Guide and community markers
    pub michelin_stars: u8,
    pub value_guide: bool,
    pub regional_guide: bool,
    pub community_mentions: u32,
    pub hygiene: bool,

    /// Whether the cuisine belongs to the configured diaspora closed set
    pub diaspora_cuisine: bool,
}
