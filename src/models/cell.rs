// src/models/cell.rs
// DOCUMENTATION: Spatial cell aggregates
// PURPOSE: Per-hexagon statistics for map rendering

use std::fmt;

use h3o::CellIndex;
use serde::{Deserialize, Serialize};

/// Coarse per-cell cluster label, assigned by descending mean rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterLabel {
    Elite,
    Strong,
    Everyday,
    Emerging,
}

impl ClusterLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            ClusterLabel::Elite => "Elite",
            ClusterLabel::Strong => "Strong",
            ClusterLabel::Everyday => "Everyday",
            ClusterLabel::Emerging => "Emerging",
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated statistics for one hex cell
/// DOCUMENTATION: Built once per corpus; feeds the GeoJSON export and is
/// never fed back into per-record scoring.
#[derive(Debug, Clone)]
pub struct HexCell {
    pub index: CellIndex,
    pub center_lat: f64,
    pub center_lng: f64,
    pub restaurant_count: u32,
    pub mean_rating: f64,
    pub mean_residual: f64,
    pub total_reviews: u64,
    pub mean_reviews: f64,
    pub chain_share: f64,
    pub mean_price: f64,
    pub cuisine_entropy: f64,
    /// First principal component of the standardized aggregates
    pub hub_score: f64,
    pub cluster: ClusterLabel,
}
