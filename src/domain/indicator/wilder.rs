//! Wilder smoothing (alpha = 1/n), seeded with the mean of the first n values.

use crate::domain::indicator::mean;

/// Smoothed[i] = x[i]/n + Smoothed[i-1]*(1 - 1/n); the first n entries carry the seed.
pub fn wilder_smooth(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() || window == 0 {
        return Vec::new();
    }

    let seed_len = window.min(values.len());
    let seed = mean(&values[..seed_len]);
    let alpha = 1.0 / window as f64;

    let mut out = Vec::with_capacity(values.len());
    out.resize(seed_len, seed);

    let mut smoothed = seed;
    for &x in &values[seed_len..] {
        smoothed = alpha * x + (1.0 - alpha) * smoothed;
        out.push(smoothed);
    }
    out
}
