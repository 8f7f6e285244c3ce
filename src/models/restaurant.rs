// src/models/restaurant.rs
// DOCUMENTATION: Core data structures for restaurant records
// PURPOSE: Raw provider records, the featured record, and its derived enums

use std::collections::HashMap;
use std::fmt;

use h3o::CellIndex;
use serde::{Deserialize, Serialize};

/// A raw restaurant record as merged from the places provider
/// DOCUMENTATION: This struct maps directly to the raw-record JSON file.
/// Everything beyond the identity fields is optional; feature engineering
/// decides what is usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPlace {
    /// Stable provider identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Street address
    #[serde(default)]
    pub address: Option<String>,

    /// Latitude (records without coordinates are dropped)
    #[serde(default)]
    pub lat: Option<f64>,

    /// Longitude
    #[serde(default)]
    pub lng: Option<f64>,

    /// Aggregate rating in [1.0, 5.0]
    #[serde(default)]
    pub rating: Option<f64>,

    /// Number of ratings behind the aggregate
    #[serde(default)]
    pub review_count: Option<u32>,

    /// Provider type tags
    #[serde(default)]
    pub types: Vec<String>,

    /// Primary type tag
    #[serde(default)]
    pub primary_type: Option<String>,

    /// Provider price enum (e.g. "PRICE_LEVEL_MODERATE")
    #[serde(default)]
    pub price_level: Option<String>,

    /// Weekday descriptions, e.g. "Monday: 12:00 – 2:30 PM, 7:00 – 10:00 PM"
    #[serde(default)]
    pub opening_hours: Option<Vec<String>>,

    /// Structured closing time by day ("0"=Sunday .. "6"=Saturday -> "HH:MM")
    #[serde(default)]
    pub closing_times: Option<HashMap<String, String>>,

    /// Days open (0=Sunday .. 6=Saturday)
    #[serde(default)]
    pub days_open: Option<Vec<u8>>,

    /// Website URI
    #[serde(default)]
    pub website: Option<String>,

    /// Canonical provider URI
    #[serde(default)]
    pub google_maps_url: Option<String>,

    /// Review language distribution (lang -> count), absent in most records
    #[serde(default)]
    pub review_languages: Option<HashMap<String, u32>>,
}

/// Venue type derived at feature engineering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueType {
    Restaurant,
    Cafe,
    Bar,
    Bakery,
    FastFood,
    SandwichShop,
    Takeaway,
    Brunch,
    Seafood,
}

impl VenueType {
    pub const fn as_str(self) -> &'static str {
        match self {
            VenueType::Restaurant => "restaurant",
            VenueType::Cafe => "cafe",
            VenueType::Bar => "bar",
            VenueType::Bakery => "bakery",
            VenueType::FastFood => "fast_food",
            VenueType::SandwichShop => "sandwich_shop",
            VenueType::Takeaway => "takeaway",
            VenueType::Brunch => "brunch",
            VenueType::Seafood => "seafood",
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// District tier labels
/// DOCUMENTATION: Assigned to districts and neighborhoods in the city
/// context; neighborhoods override their surrounding district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistrictTier {
    TouristHeavy,
    TouristTrap,
    Mixed,
    LocalFoodie,
    DiasporaHub,
    Underexplored,
    ExpatBubble,
}

impl DistrictTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            DistrictTier::TouristHeavy => "tourist_heavy",
            DistrictTier::TouristTrap => "tourist_trap",
            DistrictTier::Mixed => "mixed",
            DistrictTier::LocalFoodie => "local_foodie",
            DistrictTier::DiasporaHub => "diaspora_hub",
            DistrictTier::Underexplored => "underexplored",
            DistrictTier::ExpatBubble => "expat_bubble",
        }
    }

    /// Tiers where high review volume reads as local-institution traffic
    /// rather than tourist exposure
    pub const fn is_local_leaning(self) -> bool {
        matches!(
            self,
            DistrictTier::LocalFoodie | DistrictTier::DiasporaHub | DistrictTier::Underexplored
        )
    }
}

impl fmt::Display for DistrictTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistrictTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tourist_heavy" => Ok(DistrictTier::TouristHeavy),
            "tourist_trap" => Ok(DistrictTier::TouristTrap),
            "mixed" => Ok(DistrictTier::Mixed),
            "local_foodie" => Ok(DistrictTier::LocalFoodie),
            "diaspora_hub" => Ok(DistrictTier::DiasporaHub),
            "underexplored" => Ok(DistrictTier::Underexplored),
            "expat_bubble" => Ok(DistrictTier::ExpatBubble),
            _ => Err(format!("unknown district tier: {}", s)),
        }
    }
}

/// Categorical quality tier derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestaurantTier {
    #[serde(rename = "Chef's Kiss")]
    ChefsKiss,
    #[serde(rename = "Kitchen Approved")]
    KitchenApproved,
    #[serde(rename = "Workable")]
    Workable,
    #[serde(rename = "Line Cook Shrug")]
    LineCookShrug,
}

impl RestaurantTier {
    /// Map a clamped composite score to its tier
    pub fn from_score(score: f64) -> Self {
        if score >= 0.55 {
            RestaurantTier::ChefsKiss
        } else if score >= 0.48 {
            RestaurantTier::KitchenApproved
        } else if score >= 0.30 {
            RestaurantTier::Workable
        } else {
            RestaurantTier::LineCookShrug
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RestaurantTier::ChefsKiss => "Chef's Kiss",
            RestaurantTier::KitchenApproved => "Kitchen Approved",
            RestaurantTier::Workable => "Workable",
            RestaurantTier::LineCookShrug => "Line Cook Shrug",
        }
    }

    /// Ordering rank, highest tier first
    #[allow(dead_code)]
    pub const fn rank(self) -> u8 {
        match self {
            RestaurantTier::ChefsKiss => 3,
            RestaurantTier::KitchenApproved => 2,
            RestaurantTier::Workable => 1,
            RestaurantTier::LineCookShrug => 0,
        }
    }
}

impl fmt::Display for RestaurantTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed opening-hours summary
/// DOCUMENTATION: Everything hours-dependent scoring needs, in one place.
/// `known == false` is the "unknown" sentinel: all flags are false and all
/// numeric fields are None, which zeroes out hours-dependent bonuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HoursSummary {
    /// Whether parsing produced a usable schedule
    pub known: bool,

    /// Which weekdays have at least one shift (0=Sunday .. 6=Saturday)
    pub open_days: [bool; 7],

    /// Number of days open per week
    pub days_open_count: Option<u8>,

    /// Median weekday (Mon-Fri) closing hour; values past 24.0 mean
    /// past-midnight closes (25.0 = 01:00 next day)
    pub typical_close_hour: Option<f64>,

    /// Latest closing hour across the week
    pub latest_close_hour: Option<f64>,

    /// Total open hours per week
    pub total_weekly_hours: Option<f64>,

    /// At least 3 days with a lunch shift closing in [13,16] and a dinner
    /// shift opening in [17,20]
    pub service_coupe: bool,

    /// At least 3 days closing at or after 01:00 next-day
    pub closes_late: bool,

    /// At least 4 open days all closing by 17:00
    pub lunch_only: bool,

    /// Open Monday-Friday only
    pub weekdays_only: bool,

    /// Closed on Sunday (but open Saturday)
    pub closed_sunday: bool,

    /// Closed Saturday and Sunday
    pub closed_weekends: bool,

    /// Typically closes before 22:00 (and after lunch)
    pub closes_early: bool,
}

impl HoursSummary {
    /// The sentinel for unparseable or absent hours
    pub fn unknown() -> Self {
        HoursSummary::default()
    }

    pub fn is_open_on(&self, day: u8) -> bool {
        self.known && usize::from(day) < 7 && self.open_days[usize::from(day)]
    }
}

/// A fully-featured restaurant record
/// DOCUMENTATION: Produced by feature engineering from a RawPlace; mutated
/// only by adding derived columns (residuals, cell aggregates) on the way
/// to scoring.
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: f64,
    pub review_count: u32,
    pub types: Vec<String>,
    pub primary_type: Option<String>,
    pub website: Option<String>,
    pub google_maps_url: Option<String>,
    pub opening_hours: Option<Vec<String>>,
    pub review_languages: Option<HashMap<String, u32>>,

    // Derived at feature engineering
    pub cuisine: String,
    pub venue_type: VenueType,
    pub price_numeric: u8,
    pub is_chain: bool,
    pub log_review_count: f64,
    pub hours: HoursSummary,
    pub hex_index: CellIndex,

    // Joined per-cell aggregates (attached after the full corpus is built)
    pub hex_restaurant_count: u32,
    pub hex_mean_rating: f64,
    pub hex_cuisine_entropy: f64,
    pub hex_chain_share: f64,

    // Baseline predictor outputs
    pub predicted_rating: Option<f64>,
    pub residual: f64,
}
