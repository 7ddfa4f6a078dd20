//! Bagged regression-tree ensemble
//!
//! Each tree is a CART regressor grown on a bootstrap resample of the
//! training rows. Splits minimise the summed squared error of the two
//! children; leaves predict the mean target of their rows. Bootstrap draws
//! come from a seeded `StdRng`, so a given (data, config) pair always yields
//! the same forest.

use super::features::{DrainFeatures, NUM_FEATURES};
use super::{PredictorConfig, Regressor};
use crate::error::FitError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Minimum SSE reduction for a split to be kept
const MIN_IMPURITY_DECREASE: f64 = 1e-12;

/// Hard depth bound applied even when `max_depth` is unset
pub const MAX_TREE_DEPTH: usize = 32;

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Single CART regression tree stored as a flat node arena
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct TreeBuilder<'a> {
    x: &'a [[f64; NUM_FEATURES]],
    y: &'a [f64],
    min_samples_split: usize,
    max_depth: Option<usize>,
    nodes: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn build(mut self, rows: Vec<usize>) -> RegressionTree {
        self.grow(rows, 0);
        RegressionTree { nodes: self.nodes }
    }

    /// Grow the subtree for `rows` and return its node index
    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let mean = rows.iter().map(|&r| self.y[r]).sum::<f64>() / rows.len() as f64;

        let depth_cap = self.max_depth.map_or(MAX_TREE_DEPTH, |d| d.min(MAX_TREE_DEPTH));
        if rows.len() < self.min_samples_split || depth >= depth_cap {
            return self.push(Node::Leaf(mean));
        }

        let Some((feature, threshold)) = self.best_split(&rows) else {
            return self.push(Node::Leaf(mean));
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.x[r][feature] <= threshold);
        if left_rows.is_empty() || right_rows.is_empty() {
            return self.push(Node::Leaf(mean));
        }

        // Reserve the parent slot so children land after it
        let idx = self.push(Node::Leaf(mean));
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[idx] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        idx
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn best_split(&self, rows: &[usize]) -> Option<(usize, f64)> {
        let n = rows.len() as f64;
        let total_sum: f64 = rows.iter().map(|&r| self.y[r]).sum();
        let total_sq: f64 = rows.iter().map(|&r| self.y[r].powi(2)).sum();
        let parent_sse = total_sq - total_sum * total_sum / n;

        let mut best: Option<(usize, f64, f64)> = None;

        for feature in 0..NUM_FEATURES {
            let mut sorted: Vec<usize> = rows.to_vec();
            sorted.sort_by(|&a, &b| {
                self.x[a][feature]
                    .partial_cmp(&self.x[b][feature])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for i in 0..sorted.len() - 1 {
                let y = self.y[sorted[i]];
                left_sum += y;
                left_sq += y * y;

                let here = self.x[sorted[i]][feature];
                let next = self.x[sorted[i + 1]][feature];
                if next <= here {
                    continue;
                }

                let left_n = (i + 1) as f64;
                let right_n = n - left_n;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);

                if best.map(|(_, _, b)| sse < b).unwrap_or(true) {
                    best = Some((feature, split_threshold(here, next), sse));
                }
            }
        }

        best.filter(|(_, _, sse)| parent_sse - sse > MIN_IMPURITY_DECREASE)
            .map(|(feature, threshold, _)| (feature, threshold))
    }
}

/// Midpoint of two distinct sorted values that still separates them
///
/// Between adjacent floats the midpoint can round up to `next`, which would
/// send every row left.
fn split_threshold(here: f64, next: f64) -> f64 {
    let mid = here / 2.0 + next / 2.0;
    if mid >= next || mid < here {
        here
    } else {
        mid
    }
}

impl RegressionTree {
    pub fn predict(&self, row: &[f64; NUM_FEATURES]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, d)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf(_) => deepest = deepest.max(d),
                Node::Split { left, right, .. } => {
                    stack.push((*left, d + 1));
                    stack.push((*right, d + 1));
                }
            }
        }
        deepest
    }
}

/// Tree-ensemble drain regressor
#[derive(Debug, Clone)]
pub struct ForestRegressor {
    trees: Vec<RegressionTree>,
}

impl ForestRegressor {
    /// Fit the ensemble, refusing inputs it cannot model
    pub fn fit(
        x: &[[f64; NUM_FEATURES]],
        y: &[f64],
        config: &PredictorConfig,
    ) -> Result<Self, FitError> {
        if x.is_empty() || y.is_empty() {
            return Err(FitError::EmptyTrainingSet);
        }
        if config.n_estimators == 0 {
            return Err(FitError::NoEstimators);
        }
        if let Some(row) = x
            .iter()
            .zip(y.iter())
            .position(|(features, target)| {
                !target.is_finite() || features.iter().any(|v| !v.is_finite())
            })
        {
            return Err(FitError::NonFiniteInput { row });
        }

        let n = x.len().min(y.len());
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators)
            .map(|_| {
                let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                TreeBuilder {
                    x,
                    y,
                    min_samples_split: config.min_samples_split.max(2),
                    max_depth: config.max_depth,
                    nodes: Vec::new(),
                }
                .build(rows)
            })
            .collect();

        Ok(Self { trees })
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn predict_row(&self, row: &[f64; NUM_FEATURES]) -> f64 {
        self.trees.iter().map(|t| t.predict(row)).sum::<f64>() / self.trees.len() as f64
    }
}

impl Regressor for ForestRegressor {
    fn predict_features(&self, features: &DrainFeatures) -> f64 {
        self.predict_row(&features.to_array())
    }

    fn kind(&self) -> &'static str {
        "forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(v: f64) -> [f64; NUM_FEATURES] {
        [v, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    }

    #[test]
    fn test_empty_training_set_rejected() {
        let err = ForestRegressor::fit(&[], &[], &PredictorConfig::default()).unwrap_err();
        assert_eq!(err, FitError::EmptyTrainingSet);
    }

    #[test]
    fn test_zero_estimators_rejected() {
        let config = PredictorConfig {
            n_estimators: 0,
            ..Default::default()
        };
        let err = ForestRegressor::fit(&[row(1.0)], &[1.0], &config).unwrap_err();
        assert_eq!(err, FitError::NoEstimators);
    }

    #[test]
    fn test_non_finite_rejected() {
        let x = vec![row(1.0), row(f64::INFINITY)];
        let err = ForestRegressor::fit(&x, &[1.0, 2.0], &PredictorConfig::default()).unwrap_err();
        assert_eq!(err, FitError::NonFiniteInput { row: 1 });
    }

    #[test]
    fn test_single_row_predicts_its_target() {
        let forest = ForestRegressor::fit(&[row(3.0)], &[4.2], &PredictorConfig::default()).unwrap();
        assert_eq!(forest.n_estimators(), 150);
        assert!((forest.predict_row(&row(100.0)) - 4.2).abs() < 1e-12);
    }

    #[test]
    fn test_step_function_is_learned() {
        let x: Vec<_> = (0..20).map(|i| row(i as f64)).collect();
        let y: Vec<_> = (0..20).map(|i| if i < 10 { 1.0 } else { 5.0 }).collect();
        let forest = ForestRegressor::fit(&x, &y, &PredictorConfig::default()).unwrap();

        assert!(forest.predict_row(&row(2.0)) < 2.0);
        assert!(forest.predict_row(&row(17.0)) > 4.0);
    }

    #[test]
    fn test_predictions_stay_within_target_range() {
        let x: Vec<_> = (0..12).map(|i| row(i as f64 * 3.0)).collect();
        let y: Vec<_> = (0..12).map(|i| 2.0 + (i as f64).sqrt()).collect();
        let forest = ForestRegressor::fit(&x, &y, &PredictorConfig::default()).unwrap();

        let lo = y.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for probe in [-10.0, 0.0, 7.5, 20.0, 1000.0] {
            let p = forest.predict_row(&row(probe));
            assert!(p >= lo - 1e-9 && p <= hi + 1e-9, "prediction {} out of range", p);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let x: Vec<_> = (0..15).map(|i| row((i * 7 % 11) as f64)).collect();
        let y: Vec<_> = (0..15).map(|i| (i * 3 % 5) as f64).collect();
        let config = PredictorConfig::default();
        let a = ForestRegressor::fit(&x, &y, &config).unwrap();
        let b = ForestRegressor::fit(&x, &y, &config).unwrap();
        for probe in 0..12 {
            assert_eq!(a.predict_row(&row(probe as f64)), b.predict_row(&row(probe as f64)));
        }
    }

    #[test]
    fn test_split_threshold_between_adjacent_floats() {
        let here = f64::from_bits(30.0_f64.to_bits() + 1);
        let next = f64::from_bits(here.to_bits() + 1);
        let t = split_threshold(here, next);
        assert!(t >= here && t < next);
        assert_eq!(split_threshold(1.0, 3.0), 2.0);
    }

    #[test]
    fn test_adjacent_float_features_terminate() {
        let a = f64::from_bits(30.0_f64.to_bits() + 1);
        let b = f64::from_bits(a.to_bits() + 1);
        let x = vec![row(a), row(b)];
        let y = [1.0, 5.0];
        let forest = ForestRegressor::fit(&x, &y, &PredictorConfig::default()).unwrap();

        for tree in &forest.trees {
            assert!(tree.node_count() <= 3);
        }
        let (pa, pb) = (forest.predict_row(&row(a)), forest.predict_row(&row(b)));
        assert!(pa.is_finite() && pb.is_finite());
        assert!(pa <= pb);
        assert!((1.0..=5.0).contains(&pa) && (1.0..=5.0).contains(&pb));
    }

    #[test]
    fn test_unbounded_config_still_capped() {
        let x: Vec<_> = (0..200).map(|i| row(i as f64)).collect();
        let y: Vec<_> = (0..200).map(|i| ((i * 37) % 101) as f64).collect();
        let config = PredictorConfig {
            n_estimators: 1,
            ..Default::default()
        };
        let forest = ForestRegressor::fit(&x, &y, &config).unwrap();
        assert!(forest.trees[0].depth() <= MAX_TREE_DEPTH);
    }

    #[test]
    fn test_max_depth_limits_tree() {
        let x: Vec<_> = (0..16).map(|i| row(i as f64)).collect();
        let y: Vec<_> = (0..16).map(|i| i as f64).collect();
        let config = PredictorConfig {
            n_estimators: 1,
            max_depth: Some(1),
            ..Default::default()
        };
        let forest = ForestRegressor::fit(&x, &y, &config).unwrap();
        assert!(forest.trees[0].node_count() <= 3);
    }
}
