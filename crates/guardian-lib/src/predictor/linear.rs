//! Ordinary least-squares fallback regressor
//!
//! Columns are centred and scaled before solving the normal equations, and
//! a vanishing ridge term keeps rank-deficient inputs (a single row, a
//! constant intent column) solvable. Fitting never fails.

use super::features::{DrainFeatures, NUM_FEATURES};
use super::Regressor;

/// Ridge term added to the standardised normal equations
const RIDGE: f64 = 1e-10;

/// Columns with a smaller spread are treated as constant
const MIN_COLUMN_STD: f64 = 1e-12;

/// Linear drain regressor: `intercept + coefficients · features`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: [f64; NUM_FEATURES],
}

impl LinearRegressor {
    /// Fit by least squares, skipping rows with non-finite values
    pub fn fit(x: &[[f64; NUM_FEATURES]], y: &[f64]) -> Self {
        let rows: Vec<(&[f64; NUM_FEATURES], f64)> = x
            .iter()
            .zip(y.iter().copied())
            .filter(|(features, target)| {
                target.is_finite() && features.iter().all(|v| v.is_finite())
            })
            .collect();

        if rows.is_empty() {
            return Self {
                intercept: 0.0,
                coefficients: [0.0; NUM_FEATURES],
            };
        }

        let n = rows.len() as f64;
        let y_mean = rows.iter().map(|(_, t)| t).sum::<f64>() / n;

        let mut x_mean = [0.0; NUM_FEATURES];
        for (features, _) in &rows {
            for j in 0..NUM_FEATURES {
                x_mean[j] += features[j] / n;
            }
        }

        let mut x_std = [0.0; NUM_FEATURES];
        for (features, _) in &rows {
            for j in 0..NUM_FEATURES {
                x_std[j] += (features[j] - x_mean[j]).powi(2) / n;
            }
        }
        for s in x_std.iter_mut() {
            *s = s.sqrt();
        }

        // Standardised design; constant columns contribute nothing
        let z: Vec<[f64; NUM_FEATURES]> = rows
            .iter()
            .map(|(features, _)| {
                let mut zr = [0.0; NUM_FEATURES];
                for j in 0..NUM_FEATURES {
                    if x_std[j] > MIN_COLUMN_STD {
                        zr[j] = (features[j] - x_mean[j]) / x_std[j];
                    }
                }
                zr
            })
            .collect();

        let mut gram = [[0.0; NUM_FEATURES]; NUM_FEATURES];
        let mut rhs = [0.0; NUM_FEATURES];
        for (zr, (_, target)) in z.iter().zip(rows.iter()) {
            let yc = target - y_mean;
            for i in 0..NUM_FEATURES {
                rhs[i] += zr[i] * yc;
                for j in 0..NUM_FEATURES {
                    gram[i][j] += zr[i] * zr[j];
                }
            }
        }
        for (i, row) in gram.iter_mut().enumerate() {
            row[i] += RIDGE;
        }

        let beta = solve(gram, rhs);

        let mut coefficients = [0.0; NUM_FEATURES];
        for j in 0..NUM_FEATURES {
            if x_std[j] > MIN_COLUMN_STD {
                coefficients[j] = beta[j] / x_std[j];
            }
        }
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(x_mean.iter())
                .map(|(c, m)| c * m)
                .sum::<f64>();

        Self {
            intercept,
            coefficients,
        }
    }

    pub fn predict_row(&self, row: &[f64; NUM_FEATURES]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

impl Regressor for LinearRegressor {
    fn predict_features(&self, features: &DrainFeatures) -> f64 {
        self.predict_row(&features.to_array())
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// Gaussian elimination with partial pivoting
///
/// Pivots that collapse to zero leave their unknown at zero.
fn solve(
    mut a: [[f64; NUM_FEATURES]; NUM_FEATURES],
    mut b: [f64; NUM_FEATURES],
) -> [f64; NUM_FEATURES] {
    let n = NUM_FEATURES;
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        a.swap(col, pivot);
        b.swap(col, pivot);

        if a[col][col].abs() < f64::MIN_POSITIVE {
            continue;
        }
        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; NUM_FEATURES];
    for row in (0..n).rev() {
        if a[row][row].abs() < f64::MIN_POSITIVE {
            continue;
        }
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x
}
