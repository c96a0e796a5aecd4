//! Descriptive statistics primitives shared by the analyzers.
//!
//! All functions take plain slices of present values; missing cells are
//! filtered out by the caller.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort a copy of `values` ascending.
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Quantile of already sorted data using linear interpolation between the
/// two closest ranks (`h = (n - 1) * p`).
pub(crate) fn quantile_linear(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    let fraction = h - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Bias-adjusted sample skewness (adjusted Fisher-Pearson coefficient).
///
/// Returns 0 for fewer than three values or a constant sample.
pub(crate) fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 || is_constant(values) {
        return 0.0;
    }

    let n_f = n as f64;
    let mean = values.iter().sum::<f64>() / n_f;
    let m2 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n_f;
    let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n_f;

    if m2 == 0.0 {
        return 0.0;
    }

    let g1 = m3 / m2.powf(1.5);
    g1 * (n_f * (n_f - 1.0)).sqrt() / (n_f - 2.0)
}

/// Pearson correlation over rows where both sides are present.
///
/// Undefined correlations (fewer than two paired rows, or a side with zero
/// variance) are NaN.
pub(crate) fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();

    if xs.len() < 2 || is_constant(&xs) || is_constant(&ys) {
        return f64::NAN;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in xs.iter().zip(ys.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Box-plot style summary of a group of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

pub(crate) fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let sorted = sorted(values);
    Some(BoxSummary {
        count: sorted.len(),
        min: *sorted.first()?,
        q1: quantile_linear(&sorted, 0.25)?,
        median: quantile_linear(&sorted, 0.5)?,
        q3: quantile_linear(&sorted, 0.75)?,
        max: *sorted.last()?,
        mean: mean(&sorted)?,
    })
}

/// Number of histogram bins by Sturges' rule.
pub(crate) fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    ((n as f64).log2().ceil() as usize) + 1
}
