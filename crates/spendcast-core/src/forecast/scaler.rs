//! Zero-mean, unit-variance feature standardization
//!
//! Fit on the training split only, then applied to both splits and to
//! prediction-time vectors. Serialized into the model artifact.

use serde::{Deserialize, Serialize};

/// Per-column standardization transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit column means and standard deviations over the given rows.
    ///
    /// Constant columns get a scale of 1 so transforming never divides by
    /// zero.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let n = rows.len() as f64;

        let mut means = vec![0.0; n_cols];
        let mut stds = vec![1.0; n_cols];

        if rows.is_empty() {
            return Self { means, stds };
        }

        for (j, mean) in means.iter_mut().enumerate() {
            *mean = rows.iter().map(|r| r[j]).sum::<f64>() / n;
        }

        for (j, std) in stds.iter_mut().enumerate() {
            let variance = rows.iter().map(|r| (r[j] - means[j]).powi(2)).sum::<f64>() / n;
            let s = variance.sqrt();
            *std = if s > 1e-12 { s } else { 1.0 };
        }

        Self { means, stds }
    }

    /// Standardize a single row
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.stds.iter()))
            .map(|(&v, (&mean, &std))| (v - mean) / std)
            .collect()
    }

    /// Standardize a batch of rows
    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform_zero_mean_unit_variance() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform_all(&rows);

        for j in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[j]).sum::<f64>() / 3.0;
            let var: f64 = scaled.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_does_not_divide_by_zero() {
        let rows = vec![vec![5.0], vec![5.0], vec![5.0]];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform(&[5.0]);
        assert_eq!(scaled[0], 0.0);
        assert!(scaled[0].is_finite());
    }

    #[test]
    fn test_transform_uses_fitted_statistics() {
        let train = vec![vec![0.0], vec![2.0]];
        let scaler = StandardScaler::fit(&train);
        // mean 1, std 1
        assert_eq!(scaler.transform(&[3.0]), vec![2.0]);
    }
}
