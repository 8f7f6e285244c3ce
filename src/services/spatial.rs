// src/services/spatial.rs
// DOCUMENTATION: Hexagonal spatial aggregation
// PURPOSE: Per-cell statistics, cluster labels and the GeoJSON export

use std::collections::HashMap;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use h3o::{CellIndex, LatLng};
use serde_json::{json, Map};

use crate::models::{ClusterLabel, HexCell, Restaurant};

/// Features used for clustering and the hub score, in order
const CLUSTER_FEATURES: usize = 7;

/// Aggregate the corpus into hex cells
/// DOCUMENTATION: Runs after residuals are attached; output feeds the map
/// export only and is never fed back into per-record scoring.
pub fn aggregate_cells(restaurants: &[Restaurant]) -> Vec<HexCell> {
    let mut groups: HashMap<CellIndex, Vec<&Restaurant>> = HashMap::new();
    for r in restaurants {
        groups.entry(r.hex_index).or_default().push(r);
    }

    let mut cells: Vec<HexCell> = groups
        .into_iter()
        .map(|(index, members)| {
            let n = members.len() as f64;
            let mean_rating = members.iter().map(|r| r.rating).sum::<f64>() / n;
            let mean_residual = members.iter().map(|r| r.residual).sum::<f64>() / n;
            let total_reviews: u64 = members.iter().map(|r| u64::from(r.review_count)).sum();
            let chain_share =
                members.iter().filter(|r| r.is_chain).count() as f64 / n;
            let mean_price =
                members.iter().map(|r| f64::from(r.price_numeric)).sum::<f64>() / n;

            let mut cuisine_counts: HashMap<&str, u32> = HashMap::new();
            for r in &members {
                *cuisine_counts.entry(r.cuisine.as_str()).or_insert(0) += 1;
            }
            let total: u32 = cuisine_counts.values().sum();
            let entropy = -cuisine_counts
                .values()
                .map(|&c| {
                    let p = f64::from(c) / f64::from(total);
                    p * p.ln()
                })
                .sum::<f64>();

            let center = LatLng::from(index);

            HexCell {
                index,
                center_lat: center.lat(),
                center_lng: center.lng(),
                restaurant_count: members.len() as u32,
                mean_rating,
                mean_residual,
                total_reviews,
                mean_reviews: total_reviews as f64 / n,
                chain_share,
                mean_price,
                cuisine_entropy: entropy,
                hub_score: 0.0,
                cluster: ClusterLabel::Everyday,
            }
        })
        .collect();

    // Deterministic ordering before clustering
    cells.sort_by_key(|c| u64::from(c.index));

    assign_hub_scores(&mut cells);
    assign_clusters(&mut cells);

    cells
}

fn feature_row(cell: &HexCell) -> [f64; CLUSTER_FEATURES] {
    [
        cell.mean_rating,
        cell.mean_residual,
        cell.mean_reviews,
        cell.chain_share,
        cell.mean_price,
        cell.cuisine_entropy,
        f64::from(cell.restaurant_count),
    ]
}

/// Standardize columns to zero mean and unit variance
fn standardized(cells: &[HexCell]) -> Vec<[f64; CLUSTER_FEATURES]> {
    let n = cells.len() as f64;
    let mut means = [0.0; CLUSTER_FEATURES];
    let mut stds = [0.0; CLUSTER_FEATURES];

    for cell in cells {
        let row = feature_row(cell);
        for (m, v) in means.iter_mut().zip(row) {
            *m += v / n;
        }
    }
    for cell in cells {
        let row = feature_row(cell);
        for ((s, v), m) in stds.iter_mut().zip(row).zip(means) {
            *s += (v - m).powi(2) / n;
        }
    }
    for s in &mut stds {
        *s = s.sqrt().max(1e-9);
    }

    cells
        .iter()
        .map(|cell| {
            let row = feature_row(cell);
            let mut out = [0.0; CLUSTER_FEATURES];
            for i in 0..CLUSTER_FEATURES {
                out[i] = (row[i] - means[i]) / stds[i];
            }
            out
        })
        .collect()
}

/// Hub score: first principal component by power iteration (deterministic)
fn assign_hub_scores(cells: &mut [HexCell]) {
    if cells.len() < 2 {
        return;
    }
    let rows = standardized(cells);
    let n = rows.len() as f64;

    let mut cov = [[0.0; CLUSTER_FEATURES]; CLUSTER_FEATURES];
    for row in &rows {
        for i in 0..CLUSTER_FEATURES {
            for j in 0..CLUSTER_FEATURES {
                cov[i][j] += row[i] * row[j] / n;
            }
        }
    }

    let mut v = [1.0 / (CLUSTER_FEATURES as f64).sqrt(); CLUSTER_FEATURES];
    for _ in 0..64 {
        let mut next = [0.0; CLUSTER_FEATURES];
        for i in 0..CLUSTER_FEATURES {
            for j in 0..CLUSTER_FEATURES {
                next[i] += cov[i][j] * v[j];
            }
        }
        let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm < 1e-12 {
            return;
        }
        for (vi, ni) in v.iter_mut().zip(next) {
            *vi = ni / norm;
        }
    }

    // Fix the sign so that higher mean rating means higher hub score
    if v[0] < 0.0 {
        for vi in &mut v {
            *vi = -*vi;
        }
    }

    for (cell, row) in cells.iter_mut().zip(rows) {
        cell.hub_score = row.iter().zip(v).map(|(r, w)| r * w).sum();
    }
}

/// K-means over standardized aggregates with deterministic quantile seeding;
/// cluster labels are assigned by descending mean rating
fn assign_clusters(cells: &mut [HexCell]) {
    let labels = [
        ClusterLabel::Elite,
        ClusterLabel::Strong,
        ClusterLabel::Everyday,
        ClusterLabel::Emerging,
    ];
    let k = labels.len().min(cells.len());
    if k == 0 {
        return;
    }
    if cells.len() <= k {
        // Tiny corpora: rank the cells directly
        let mut order: Vec<usize> = (0..cells.len()).collect();
        order.sort_by(|&a, &b| cells[b].mean_rating.total_cmp(&cells[a].mean_rating));
        for (rank, idx) in order.into_iter().enumerate() {
            cells[idx].cluster = labels[rank.min(labels.len() - 1)];
        }
        return;
    }

    let rows = standardized(cells);

    // Seed centroids at rating quantiles for a deterministic start
    let mut order: Vec<usize> = (0..cells.len()).collect();
    order.sort_by(|&a, &b| cells[a].mean_rating.total_cmp(&cells[b].mean_rating));
    let mut centroids: Vec<[f64; CLUSTER_FEATURES]> = (0..k)
        .map(|c| rows[order[(2 * c + 1) * (cells.len() - 1) / (2 * k)]])
        .collect();

    let mut assignment = vec![0usize; cells.len()];
    for _ in 0..50 {
        let mut changed = false;
        for (i, row) in rows.iter().enumerate() {
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let dist: f64 = row
                    .iter()
                    .zip(centroid)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum();
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            if assignment[i] != best {
                assignment[i] = best;
                changed = true;
            }
        }
        if !changed {
            break;
        }
        for (c, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<usize> = (0..rows.len()).filter(|&i| assignment[i] == c).collect();
            if members.is_empty() {
                continue;
            }
            let mut mean = [0.0; CLUSTER_FEATURES];
            for &i in &members {
                for (m, v) in mean.iter_mut().zip(rows[i]) {
                    *m += v / members.len() as f64;
                }
            }
            *centroid = mean;
        }
    }

    // Rank clusters by mean rating to attach meaningful labels
    let mut cluster_ratings: Vec<(usize, f64, u32)> = (0..k).map(|c| (c, 0.0, 0)).collect();
    for (i, &c) in assignment.iter().enumerate() {
        cluster_ratings[c].1 += cells[i].mean_rating;
        cluster_ratings[c].2 += 1;
    }
    for entry in &mut cluster_ratings {
        if entry.2 > 0 {
            entry.1 /= f64::from(entry.2);
        } else {
            entry.1 = f64::NEG_INFINITY;
        }
    }
    cluster_ratings.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut label_of = vec![ClusterLabel::Emerging; k];
    for (rank, (cluster, _, _)) in cluster_ratings.into_iter().enumerate() {
        label_of[cluster] = labels[rank.min(labels.len() - 1)];
    }
    for (cell, &c) in cells.iter_mut().zip(assignment.iter()) {
        cell.cluster = label_of[c];
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Serialize cells as a feature collection of closed hex polygon rings
/// DOCUMENTATION: Coordinates are (lng, lat) pairs and every ring repeats
/// its first vertex, per the GeoJSON polygon convention.
pub fn cells_to_geojson(cells: &[HexCell]) -> FeatureCollection {
    let features = cells
        .iter()
        .map(|cell| {
            let boundary = cell.index.boundary();
            let mut ring: Vec<Vec<f64>> = boundary
                .iter()
                .map(|vertex| vec![vertex.lng(), vertex.lat()])
                .collect();
            if let Some(first) = ring.first().cloned() {
                ring.push(first);
            }

            let mut properties = Map::new();
            properties.insert("h3_index".to_string(), json!(cell.index.to_string()));
            properties.insert(
                "mean_rating".to_string(),
                json!(round_to(cell.mean_rating, 2)),
            );
            properties.insert(
                "mean_residual".to_string(),
                json!(round_to(cell.mean_residual, 3)),
            );
            properties.insert(
                "restaurant_count".to_string(),
                json!(cell.restaurant_count),
            );
            properties.insert("cluster_label".to_string(), json!(cell.cluster.as_str()));
            properties.insert("hub_score".to_string(), json!(round_to(cell.hub_score, 2)));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoursSummary, VenueType};
    use h3o::Resolution;

    fn restaurant(i: usize, lat: f64, lng: f64, rating: f64) -> Restaurant {
        Restaurant {
            id: format!("r{}", i),
            name: format!("Resto {}", i),
            address: None,
            lat,
            lng,
            rating,
            review_count: 100 + i as u32,
            types: vec![],
            primary_type: None,
            website: None,
            google_maps_url: None,
            opening_hours: None,
            review_languages: None,
            cuisine: ["Belgian", "Italian", "Thai", "Moroccan"][i % 4].to_string(),
            venue_type: VenueType::Restaurant,
            price_numeric: 2,
            is_chain: i % 5 == 0,
            log_review_count: (101.0 + i as f64).ln(),
            hours: HoursSummary::unknown(),
            hex_index: LatLng::new(lat, lng).unwrap().to_cell(Resolution::Eight),
            hex_restaurant_count: 0,
            hex_mean_rating: 0.0,
            hex_cuisine_entropy: 0.0,
            hex_chain_share: 0.0,
            predicted_rating: Some(rating),
            residual: 0.0,
        }
    }

    fn spread_corpus() -> Vec<Restaurant> {
        let mut out = Vec::new();
        for i in 0..60 {
            let lat = 50.80 + (i % 10) as f64 * 0.012;
            let lng = 4.30 + (i / 10) as f64 * 0.015;
            let rating = 3.5 + (i % 6) as f64 * 0.25;
            out.push(restaurant(i, lat, lng, rating));
        }
        out
    }

    #[test]
    fn test_cells_aggregate_their_members() {
        let cells = aggregate_cells(&spread_corpus());
        assert!(!cells.is_empty());
        let total: u32 = cells.iter().map(|c| c.restaurant_count).sum();
        assert_eq!(total, 60);
        for cell in &cells {
            assert!(cell.mean_rating >= 3.5 && cell.mean_rating <= 5.0);
            assert!(cell.chain_share >= 0.0 && cell.chain_share <= 1.0);
            assert!(cell.cuisine_entropy >= 0.0);
        }
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let a = aggregate_cells(&spread_corpus());
        let b = aggregate_cells(&spread_corpus());
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.index, y.index);
            assert_eq!(x.cluster, y.cluster);
            assert_eq!(x.hub_score.to_bits(), y.hub_score.to_bits());
        }
    }

    #[test]
    fn test_every_cluster_label_is_valid() {
        let cells = aggregate_cells(&spread_corpus());
        for cell in &cells {
            assert!(matches!(
                cell.cluster,
                ClusterLabel::Elite
                    | ClusterLabel::Strong
                    | ClusterLabel::Everyday
                    | ClusterLabel::Emerging
            ));
        }
    }

    #[test]
    fn test_geojson_rings_are_closed_lng_lat() {
        let cells = aggregate_cells(&spread_corpus());
        let collection = cells_to_geojson(&cells);
        assert_eq!(collection.features.len(), cells.len());
        for feature in &collection.features {
            let Some(geometry) = &feature.geometry else {
                panic!("missing geometry");
            };
            let Value::Polygon(rings) = &geometry.value else {
                panic!("expected polygon");
            };
            let ring = &rings[0];
            assert!(ring.len() >= 7);
            assert_eq!(ring.first(), ring.last());
            // (lng, lat) order: Brussels longitudes are ~4.3, latitudes ~50.8
            assert!(ring[0][0] > 3.0 && ring[0][0] < 5.0);
            assert!(ring[0][1] > 50.0 && ring[0][1] < 51.0);
        }
    }
}
