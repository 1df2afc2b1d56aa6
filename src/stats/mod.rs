//! Statistical primitives shared by the backtest engine.
//!
//! All routines operate on plain `f64` slices and guard degenerate inputs
//! explicitly (zero variance, singular regressions, short samples) instead of
//! letting NaN leak through silently.

pub mod adf;
pub mod ols;
pub mod rolling;

pub use adf::{adf_test, AdfResult};
pub use ols::ols_no_intercept;
pub use rolling::rolling_mean_std;

/// Arithmetic mean. Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator).
///
/// Returns `None` for fewer than two values, mirroring pandas' NaN for a
/// single-observation window.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.max(0.0).sqrt())
}
