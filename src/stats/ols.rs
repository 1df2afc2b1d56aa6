//! No-intercept ordinary least squares.
//!
//! The hedge-ratio and half-life regressions both fit a single coefficient
//! through the origin. Regressing raw price on raw price without a constant
//! is a deliberate modelling choice here, not an omission: adding an
//! intercept changes the hedge ratio materially.

/// Fit `y = beta * x` by least squares, no intercept.
///
/// `beta = Σ(x·y) / Σ(x²)`. Returns `None` when the slices differ in length,
/// are empty, or the regressor has zero sum of squares (degenerate fit).
pub fn ols_no_intercept(y: &[f64], x: &[f64]) -> Option<f64> {
    if y.len() != x.len() || x.is_empty() {
        return None;
    }

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        sxy += xi * yi;
        sxx += xi * xi;
    }

    if sxx == 0.0 {
        return None;
    }

    let beta = sxy / sxx;
    if beta.is_finite() {
        Some(beta)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_linear_relationship() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.5 * v).collect();
        let beta = ols_no_intercept(&y, &x).unwrap();
        assert!((beta - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_regressor_degenerate() {
        let x = vec![0.0, 0.0, 0.0];
        let y = vec![1.0, 2.0, 3.0];
        assert!(ols_no_intercept(&y, &x).is_none());
    }

    #[test]
    fn test_length_mismatch() {
        assert!(ols_no_intercept(&[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn test_empty() {
        assert!(ols_no_intercept(&[], &[]).is_none());
    }

    #[test]
    fn test_noise_pulls_slope_through_origin() {
        // y = 3x with alternating noise; the fitted slope stays near 3.
        let x: Vec<f64> = (1..=50).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 3.0 * v + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let beta = ols_no_intercept(&y, &x).unwrap();
        assert!((beta - 3.0).abs() < 0.01);
    }
}
