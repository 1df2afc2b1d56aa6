//! Augmented Dickey-Fuller unit-root test.
//!
//! Left-tailed test of H0 "the series has a unit root" against H1 "the
//! series is stationary". The regression includes a constant and lagged
//! difference terms:
//!
//! ```text
//! Δy[t] = α + γ·y[t-1] + Σ φ_i·Δy[t-i] + ε
//! ```
//!
//! The reported statistic is the t-ratio of γ; a value below the critical
//! value at a given significance level rejects the unit root. Critical
//! values use the MacKinnon response-surface approximation for the
//! constant-only regression, adjusted for the effective sample size.

use nalgebra::{DMatrix, DVector};

/// Minimum observations for a meaningful regression.
const MIN_OBSERVATIONS: usize = 10;

/// MacKinnon (2010) response-surface coefficients, constant, no trend:
/// `cv = tau_inf + b1/T + b2/T^2 + b3/T^3`.
const MACKINNON_SURFACE: [(&str, f64, f64, f64, f64); 3] = [
    ("1%", -3.43035, -6.5393, -16.786, -83.284),
    ("5%", -2.86154, -2.8903, -4.234, -40.040),
    ("10%", -2.56677, -1.5384, -2.809, 0.0),
];

/// Outcome of an ADF run.
#[derive(Debug, Clone)]
pub struct AdfResult {
    /// t-ratio of the level coefficient (more negative = more stationary).
    pub statistic: f64,
    /// Number of lagged difference terms included.
    pub lag_order: usize,
    /// Finite-sample critical values keyed by significance label.
    pub critical_values: Vec<(&'static str, f64)>,
}

impl AdfResult {
    /// Look up the critical value for a significance label ("1%", "5%", "10%").
    pub fn critical_value(&self, label: &str) -> Option<f64> {
        self.critical_values
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| *v)
    }
}

/// Run the ADF test on `series`.
///
/// The lag order follows the deterministic rule `2·n^(1/3)` capped at `n/4`
/// (no information-criterion search). Returns `None` when the sample is too
/// short or the regression is degenerate (singular design matrix, zero
/// residual variance); callers treat that as a non-stationary verdict.
pub fn adf_test(series: &[f64]) -> Option<AdfResult> {
    let n = series.len();
    if n < MIN_OBSERVATIONS {
        return None;
    }

    // First differences: diff[t] = y[t+1] - y[t], length n-1.
    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let lag = (((n as f64).powf(1.0 / 3.0) * 2.0) as usize)
        .min(n / 4)
        .max(1);

    // Rows of the regression start once `lag` lagged differences exist.
    let rows = diff.len().checked_sub(lag)?;
    let cols = 2 + lag;
    if rows < cols + 2 {
        return None;
    }

    // Design matrix [1, y[t-1], Δy[t-1] .. Δy[t-lag]], response Δy[t].
    let mut x_data = Vec::with_capacity(rows * cols);
    let mut y_data = Vec::with_capacity(rows);

    for t in lag..diff.len() {
        x_data.push(1.0);
        x_data.push(series[t]);
        for i in 1..=lag {
            x_data.push(diff[t - i]);
        }
        y_data.push(diff[t]);
    }

    let x = DMatrix::from_row_slice(rows, cols, &x_data);
    let y = DVector::from_vec(y_data);

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;
    let xtx_inv = xtx.try_inverse()?;
    let beta = &xtx_inv * xty;

    let residuals = &y - &x * &beta;
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let dof = rows.checked_sub(cols)?;
    if dof == 0 {
        return None;
    }
    let mse = sse / dof as f64;

    // Standard error of the level coefficient (column 1).
    let se = (mse * xtx_inv[(1, 1)]).sqrt();
    if !se.is_finite() || se == 0.0 {
        return None;
    }

    let statistic = beta[1] / se;
    if !statistic.is_finite() {
        return None;
    }

    let t = rows as f64;
    let critical_values = MACKINNON_SURFACE
        .iter()
        .map(|(label, tau, b1, b2, b3)| {
            (*label, tau + b1 / t + b2 / (t * t) + b3 / (t * t * t))
        })
        .collect();

    Some(AdfResult {
        statistic,
        lag_order: lag,
        critical_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcg_noise(seed: u64, len: usize) -> Vec<f64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 33) as f64) / (u32::MAX as f64) - 0.5
            })
            .collect()
    }

    #[test]
    fn test_too_short_series() {
        let series = vec![1.0; 5];
        assert!(adf_test(&series).is_none());
    }

    #[test]
    fn test_constant_series_degenerate() {
        let series = vec![5.0; 100];
        assert!(adf_test(&series).is_none());
    }

    #[test]
    fn test_mean_reverting_series_rejects_unit_root() {
        // AR(1) with phi = 0.3: strongly mean reverting.
        let noise = lcg_noise(42, 400);
        let mut series = Vec::with_capacity(400);
        let mut current = 0.0;
        for w in &noise {
            current = 0.3 * current + w;
            series.push(current);
        }

        let result = adf_test(&series).unwrap();
        let cv_5 = result.critical_value("5%").unwrap();
        assert!(
            result.statistic < cv_5,
            "stationary AR(1) should reject the unit root: stat {:.2} vs cv {:.2}",
            result.statistic,
            cv_5
        );
    }

    #[test]
    fn test_random_walk_fails_to_reject() {
        let noise = lcg_noise(7, 400);
        let mut series = Vec::with_capacity(400);
        let mut level = 0.0;
        for w in &noise {
            level += w;
            series.push(level);
        }

        let result = adf_test(&series).unwrap();
        let cv_1 = result.critical_value("1%").unwrap();
        assert!(
            result.statistic > cv_1,
            "random walk should not reject at 1%: stat {:.2} vs cv {:.2}",
            result.statistic,
            cv_1
        );
    }

    #[test]
    fn test_critical_values_ordered() {
        let noise = lcg_noise(3, 200);
        let mut series = Vec::new();
        let mut current = 0.0;
        for w in &noise {
            current = 0.5 * current + w;
            series.push(current);
        }

        let result = adf_test(&series).unwrap();
        let cv_1 = result.critical_value("1%").unwrap();
        let cv_5 = result.critical_value("5%").unwrap();
        let cv_10 = result.critical_value("10%").unwrap();
        assert!(cv_1 < cv_5 && cv_5 < cv_10);
    }
}
