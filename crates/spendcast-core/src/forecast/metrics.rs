//! Regression evaluation metrics for the held-out split

use crate::models::TrainingMetrics;

/// Mean absolute error
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / y_true.len() as f64
}

/// Mean squared error
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / y_true.len() as f64
}

/// Coefficient of determination. Can go negative when the model is worse
/// than predicting the mean; 0 when the targets have no variance.
pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }

    let y_mean = y_true.iter().sum::<f64>() / y_true.len() as f64;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot < 1e-10 {
        return 0.0;
    }

    1.0 - ss_res / ss_tot
}

/// Evaluate a test split into the metrics bundle returned from training
pub fn evaluate(
    y_true: &[f64],
    y_pred: &[f64],
    training_samples: usize,
) -> TrainingMetrics {
    let mse = mean_squared_error(y_true, y_pred);
    TrainingMetrics {
        mae: mean_absolute_error(y_true, y_pred),
        mse,
        rmse: mse.sqrt(),
        r2: r_squared(y_true, y_pred),
        training_samples,
        test_samples: y_true.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let metrics = evaluate(&y, &y, 16);

        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.r2, 1.0);
        assert_eq!(metrics.training_samples, 16);
        assert_eq!(metrics.test_samples, 4);
    }

    #[test]
    fn test_error_metrics_are_non_negative() {
        let y_true = vec![10.0, 0.0, 5.0];
        let y_pred = vec![0.0, 10.0, 5.0];
        let metrics = evaluate(&y_true, &y_pred, 0);

        assert!(metrics.mae >= 0.0);
        assert!(metrics.mse >= 0.0);
        assert!(metrics.rmse >= 0.0);
        assert!((metrics.rmse - metrics.mse.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_r2_can_be_negative() {
        let y_true = vec![1.0, 2.0, 3.0];
        let y_pred = vec![30.0, -10.0, 50.0];
        assert!(r_squared(&y_true, &y_pred) < 0.0);
    }

    #[test]
    fn test_r2_zero_for_constant_targets() {
        let y_true = vec![5.0, 5.0, 5.0];
        let y_pred = vec![4.0, 5.0, 6.0];
        assert_eq!(r_squared(&y_true, &y_pred), 0.0);
    }
}
