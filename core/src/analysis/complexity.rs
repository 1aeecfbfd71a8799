//! Asymptotic complexity verification
//!
//! Fits an empirical time series T(N) against candidate complexity models
//! with numerically plain zero-intercept least squares: for each candidate
//! transformation f, the scale constant is `c = Σ(f·t) / Σ(f²)` and the
//! goodness of fit is R² against the mean of the observed times. Negative
//! R² (a model arbitrarily worse than the flat mean) is clamped to zero;
//! the clamped zero is a defined floor, not a perfect-fit signal.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;
use crate::measurement::statistics::mean;

/// One candidate model's fit quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityFit {
    pub model: String,
    /// Zero-intercept least-squares scale constant.
    pub scale_constant: f64,
    /// Coefficient of determination, clamped to [0, 1].
    pub r_squared: f64,
    pub residuals: Vec<f64>,
}

const CANDIDATE_MODELS: [(&str, fn(f64) -> f64); 4] = [
    ("O(N)", |n| n),
    ("O(N log N)", |n| n * n.log2()),
    ("O(N^2)", |n| n * n),
    ("O(N^3)", |n| n * n * n),
];

/// Ranks candidate complexity models against the measured series,
/// best fit (highest R²) first. Requires at least 3 paired points.
pub fn verify_bounds(
    sizes: &[usize],
    times_ms: &[f64],
) -> Result<Vec<ComplexityFit>, AnalysisError> {
    if sizes.len() != times_ms.len() {
        return Err(AnalysisError::LengthMismatch {
            sizes: sizes.len(),
            times: times_ms.len(),
        });
    }
    if sizes.len() < 3 {
        return Err(AnalysisError::InsufficientData(sizes.len()));
    }

    let mut fits: Vec<ComplexityFit> = CANDIDATE_MODELS
        .iter()
        .map(|&(model, transform)| fit_model(sizes, times_ms, model, transform))
        .collect();
    fits.sort_by(|a, b| b.r_squared.total_cmp(&a.r_squared));
    Ok(fits)
}

fn fit_model(
    sizes: &[usize],
    times_ms: &[f64],
    model: &str,
    transform: fn(f64) -> f64,
) -> ComplexityFit {
    let transformed: Vec<f64> = sizes.iter().map(|&n| transform(n as f64)).collect();

    let sum_products: f64 = transformed
        .iter()
        .zip(times_ms)
        .map(|(f, t)| f * t)
        .sum();
    let sum_squares: f64 = transformed.iter().map(|f| f * f).sum();
    let scale_constant = if sum_squares > 0.0 {
        sum_products / sum_squares
    } else {
        0.0
    };

    let mean_time = mean(times_ms);
    let mut ss_total = 0.0;
    let mut ss_residual = 0.0;
    let residuals: Vec<f64> = transformed
        .iter()
        .zip(times_ms)
        .map(|(f, &t)| {
            let deviation = t - mean_time;
            ss_total += deviation * deviation;
            let residual = t - scale_constant * f;
            ss_residual += residual * residual;
            residual
        })
        .collect();

    let r_squared = if ss_total > 0.0 {
        (1.0 - ss_residual / ss_total).max(0.0)
    } else {
        1.0
    };

    ComplexityFit {
        model: model.to_owned(),
        scale_constant,
        r_squared,
        residuals,
    }
}
