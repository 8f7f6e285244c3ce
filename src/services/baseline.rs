// src/services/baseline.rs
// DOCUMENTATION: Baseline rating predictor
// PURPOSE: Expected-rating model whose residual flags undervalued places

use crate::models::Restaurant;

/// Minimum corpus size worth fitting; below this residuals stay zero
pub const MIN_FIT_ROWS: usize = 150;

/// Structural feature matrix fed to the predictor
/// DOCUMENTATION: Only structural features are allowed here: review volume,
/// price, chain flag, per-cell aggregates, one-hot cuisine and venue.
/// Names, guide lists and scoring signals must never leak in.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

/// The pluggable residual source: one operation
pub trait RatingPredictor: Send + Sync {
    fn predict_batch(&self, features: &FeatureMatrix) -> Vec<f64>;
}

/// Trivial fallback learner returning the corpus mean
#[allow(dead_code)]
pub struct MeanPredictor {
    pub mean: f64,
}

impl RatingPredictor for MeanPredictor {
    fn predict_batch(&self, features: &FeatureMatrix) -> Vec<f64> {
        vec![self.mean; features.rows.len()]
    }
}

/// Build the structural feature matrix and the rating targets
pub fn prepare_features(restaurants: &[Restaurant]) -> (FeatureMatrix, Vec<f64>) {
    // Deterministic one-hot column order
    let mut cuisines: Vec<&str> = restaurants.iter().map(|r| r.cuisine.as_str()).collect();
    cuisines.sort_unstable();
    cuisines.dedup();
    let mut venues: Vec<&str> = restaurants
        .iter()
        .map(|r| r.venue_type.as_str())
        .collect();
    venues.sort_unstable();
    venues.dedup();

    let mut names = vec![
        "log_review_count".to_string(),
        "price_numeric".to_string(),
        "is_chain".to_string(),
        "hex_restaurant_count".to_string(),
        "hex_mean_rating".to_string(),
        "hex_cuisine_entropy".to_string(),
        "hex_chain_share".to_string(),
    ];
    names.extend(cuisines.iter().map(|c| format!("cuisine_{}", c)));
    names.extend(venues.iter().map(|v| format!("venue_{}", v)));

    let rows = restaurants
        .iter()
        .map(|r| {
            let mut row = vec![
                r.log_review_count,
                f64::from(r.price_numeric),
                f64::from(u8::from(r.is_chain)),
                f64::from(r.hex_restaurant_count),
                r.hex_mean_rating,
                r.hex_cuisine_entropy,
                r.hex_chain_share,
            ];
            row.extend(
                cuisines
                    .iter()
                    .map(|c| f64::from(u8::from(r.cuisine == *c))),
            );
            row.extend(
                venues
                    .iter()
                    .map(|v| f64::from(u8::from(r.venue_type.as_str() == *v))),
            );
            row
        })
        .collect();

    let targets = restaurants.iter().map(|r| r.rating).collect();

    (FeatureMatrix { names, rows }, targets)
}

/// Boosting hyperparameters; the stated caps are design limits
#[derive(Debug, Clone, Copy)]
pub struct BoostParams {
    pub rounds: usize,
    pub max_depth: usize,
    pub learning_rate: f64,
    pub min_leaf: usize,
}

impl Default for BoostParams {
    fn default() -> Self {
        BoostParams {
            rounds: 200,
            max_depth: 8,
            learning_rate: 0.1,
            min_leaf: 20,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A depth-limited least-squares regression tree
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn fit(matrix: &FeatureMatrix, targets: &[f64], params: &BoostParams) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        let indices: Vec<usize> = (0..targets.len()).collect();
        tree.grow(matrix, targets, &indices, 0, params);
        tree
    }

    fn grow(
        &mut self,
        matrix: &FeatureMatrix,
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        params: &BoostParams,
    ) -> usize {
        let sum: f64 = indices.iter().map(|&i| targets[i]).sum();
        let mean = sum / indices.len() as f64;

        if depth >= params.max_depth || indices.len() < 2 * params.min_leaf {
            self.nodes.push(Node::Leaf { value: mean });
            return self.nodes.len() - 1;
        }

        let n_features = matrix.names.len();
        let parent_score = sum * sum / indices.len() as f64;
        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, gain)

        for feature in 0..n_features {
            let mut values: Vec<f64> = indices.iter().map(|&i| matrix.rows[i][feature]).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup();
            if values.len() < 2 {
                continue;
            }

            // Up to 16 quantile cut points per feature keeps splits cheap
            let cuts = 16.min(values.len() - 1);
            for k in 1..=cuts {
                let idx = k * (values.len() - 1) / cuts;
                let threshold = (values[idx - 1] + values[idx]) / 2.0;

                let mut left_sum = 0.0;
                let mut left_n = 0usize;
                for &i in indices {
                    if matrix.rows[i][feature] <= threshold {
                        left_sum += targets[i];
                        left_n += 1;
                    }
                }
                let right_n = indices.len() - left_n;
                if left_n < params.min_leaf || right_n < params.min_leaf {
                    continue;
                }
                let right_sum = sum - left_sum;
                let score = left_sum * left_sum / left_n as f64
                    + right_sum * right_sum / right_n as f64;
                let gain = score - parent_score;
                if gain > 1e-12 && best.map_or(true, |(_, _, g)| gain > g) {
                    best = Some((feature, threshold, gain));
                }
            }
        }

        let Some((feature, threshold, _)) = best else {
            self.nodes.push(Node::Leaf { value: mean });
            return self.nodes.len() - 1;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| matrix.rows[i][feature] <= threshold);

        // Reserve the split slot before growing children
        self.nodes.push(Node::Leaf { value: mean });
        let slot = self.nodes.len() - 1;
        let left = self.grow(matrix, targets, &left_idx, depth + 1, params);
        let right = self.grow(matrix, targets, &right_idx, depth + 1, params);
        self.nodes[slot] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        slot
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            match &self.nodes[node] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Additive tree ensemble fitted by least-squares gradient boosting
pub struct GradientBoostedTrees {
    base: f64,
    shrinkage: f64,
    trees: Vec<Tree>,
}

impl GradientBoostedTrees {
    pub fn fit(matrix: &FeatureMatrix, targets: &[f64], params: BoostParams) -> Self {
        let base = targets.iter().sum::<f64>() / targets.len() as f64;
        let mut residuals: Vec<f64> = targets.iter().map(|t| t - base).collect();
        let mut trees = Vec::with_capacity(params.rounds);

        for _ in 0..params.rounds {
            let tree = Tree::fit(matrix, &residuals, &params);
            let mut improved = false;
            for (i, row) in matrix.rows.iter().enumerate() {
                let step = params.learning_rate * tree.predict_row(row);
                if step.abs() > 1e-12 {
                    improved = true;
                }
                residuals[i] -= step;
            }
            trees.push(tree);
            if !improved {
                break;
            }
        }

        GradientBoostedTrees {
            base,
            shrinkage: params.learning_rate,
            trees,
        }
    }
}

impl RatingPredictor for GradientBoostedTrees {
    fn predict_batch(&self, features: &FeatureMatrix) -> Vec<f64> {
        features
            .rows
            .iter()
            .map(|row| {
                self.base
                    + self.shrinkage
                        * self
                            .trees
                            .iter()
                            .map(|t| t.predict_row(row))
                            .sum::<f64>()
            })
            .collect()
    }
}

/// K-fold cross-validated R² over contiguous folds (deterministic)
pub fn cross_val_r2(
    matrix: &FeatureMatrix,
    targets: &[f64],
    params: BoostParams,
    folds: usize,
) -> f64 {
    let n = targets.len();
    let fold_size = n / folds;
    if fold_size == 0 {
        return 0.0;
    }

    let mean_all = targets.iter().sum::<f64>() / n as f64;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;

    for fold in 0..folds {
        let start = fold * fold_size;
        let end = if fold == folds - 1 {
            n
        } else {
            start + fold_size
        };

        let mut train_rows = Vec::with_capacity(n - (end - start));
        let mut train_targets = Vec::with_capacity(n - (end - start));
        for i in (0..n).filter(|i| *i < start || *i >= end) {
            train_rows.push(matrix.rows[i].clone());
            train_targets.push(targets[i]);
        }
        let train_matrix = FeatureMatrix {
            names: matrix.names.clone(),
            rows: train_rows,
        };
        let model = GradientBoostedTrees::fit(&train_matrix, &train_targets, params);

        let test_matrix = FeatureMatrix {
            names: matrix.names.clone(),
            rows: matrix.rows[start..end].to_vec(),
        };
        let predictions = model.predict_batch(&test_matrix);
        for (i, pred) in (start..end).zip(predictions) {
            ss_res += (targets[i] - pred).powi(2);
            ss_tot += (targets[i] - mean_all).powi(2);
        }
    }

    if ss_tot <= f64::EPSILON {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Fit the baseline predictor for a corpus, or decline when it is too small
pub fn fit_predictor(restaurants: &[Restaurant]) -> Option<Box<dyn RatingPredictor>> {
    if restaurants.len() < MIN_FIT_ROWS {
        log::warn!(
            "Corpus too small to fit the baseline predictor ({} < {}); residuals fall back to zero",
            restaurants.len(),
            MIN_FIT_ROWS
        );
        return None;
    }

    let (matrix, targets) = prepare_features(restaurants);
    let params = BoostParams::default();

    let cv_params = BoostParams {
        rounds: 60,
        ..params
    };
    let r2 = cross_val_r2(&matrix, &targets, cv_params, 5);
    log::info!("Baseline predictor cross-validated R²: {:.3}", r2);

    Some(Box::new(GradientBoostedTrees::fit(
        &matrix, &targets, params,
    )))
}

/// Attach predicted rating and residual columns
/// DOCUMENTATION: With no predictor, residuals are zero and dependent
/// scoring signals contribute nothing.
pub fn attach_residuals(restaurants: &mut [Restaurant], predictor: Option<&dyn RatingPredictor>) {
    let Some(predictor) = predictor else {
        for r in restaurants.iter_mut() {
            r.predicted_rating = None;
            r.residual = 0.0;
        }
        return;
    };

    let (matrix, _) = prepare_features(restaurants);
    let predictions = predictor.predict_batch(&matrix);
    for (r, pred) in restaurants.iter_mut().zip(predictions) {
        r.predicted_rating = Some(pred);
        r.residual = r.rating - pred;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoursSummary, VenueType};
    use h3o::{LatLng, Resolution};

    fn synthetic(n: usize) -> Vec<Restaurant> {
        (0..n)
            .map(|i| {
                let price = (i % 4 + 1) as u8;
                let reviews = 20 + (i * 37) % 900;
                let chain = i % 7 == 0;
                // A structural rule for the model to learn
                let rating = 3.4 + 0.25 * f64::from(price) - 0.4 * f64::from(u8::from(chain))
                    + ((reviews as f64 + 1.0).ln() / 20.0);
                Restaurant {
                    id: format!("r{}", i),
                    name: format!("Resto {}", i),
                    address: None,
                    lat: 50.83 + (i as f64 % 10.0) * 0.004,
                    lng: 4.35 + (i as f64 % 13.0) * 0.003,
                    rating: rating.min(5.0),
                    review_count: reviews as u32,
                    types: vec![],
                    primary_type: None,
                    website: None,
                    google_maps_url: None,
                    opening_hours: None,
                    review_languages: None,
                    cuisine: ["Italian", "Belgian", "Thai"][i % 3].to_string(),
                    venue_type: VenueType::Restaurant,
                    price_numeric: price,
                    is_chain: chain,
                    log_review_count: (reviews as f64 + 1.0).ln(),
                    hours: HoursSummary::unknown(),
                    hex_index: LatLng::new(50.83, 4.35)
                        .unwrap()
                        .to_cell(Resolution::Eight),
                    hex_restaurant_count: 10,
                    hex_mean_rating: 4.1,
                    hex_cuisine_entropy: 1.0,
                    hex_chain_share: 0.1,
                    predicted_rating: None,
                    residual: 0.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_residual_mean_is_near_zero() {
        let mut restaurants = synthetic(300);
        let predictor = fit_predictor(&restaurants).expect("large enough to fit");
        attach_residuals(&mut restaurants, Some(predictor.as_ref()));
        let mean_residual: f64 =
            restaurants.iter().map(|r| r.residual).sum::<f64>() / restaurants.len() as f64;
        assert!(mean_residual.abs() < 0.05, "got {}", mean_residual);
    }

    #[test]
    fn test_small_corpus_declines_to_fit() {
        let mut restaurants = synthetic(20);
        let predictor = fit_predictor(&restaurants);
        assert!(predictor.is_none());
        attach_residuals(&mut restaurants, None);
        assert!(restaurants.iter().all(|r| r.residual == 0.0));
        assert!(restaurants.iter().all(|r| r.predicted_rating.is_none()));
    }

    #[test]
    fn test_boosting_learns_structural_rule() {
        let restaurants = synthetic(400);
        let (matrix, targets) = prepare_features(&restaurants);
        let model = GradientBoostedTrees::fit(
            &matrix,
            &targets,
            BoostParams {
                rounds: 80,
                ..BoostParams::default()
            },
        );
        let predictions = model.predict_batch(&matrix);
        let sse: f64 = predictions
            .iter()
            .zip(&targets)
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        let mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let sst: f64 = targets.iter().map(|t| (t - mean).powi(2)).sum();
        assert!(sse < sst * 0.5, "model failed to beat the mean");
    }

    #[test]
    fn test_mean_predictor_is_flat() {
        let restaurants = synthetic(160);
        let (matrix, _) = prepare_features(&restaurants);
        let predictor = MeanPredictor { mean: 4.2 };
        let predictions = predictor.predict_batch(&matrix);
        assert!(predictions.iter().all(|p| (p - 4.2).abs() < f64::EPSILON));
    }

    #[test]
    fn test_features_are_structural_only() {
        let restaurants = synthetic(160);
        let (matrix, _) = prepare_features(&restaurants);
        for name in &matrix.names {
            assert!(
                !name.contains("guide") && !name.contains("score") && !name.contains("name"),
                "non-structural feature leaked: {}",
                name
            );
        }
    }
}
