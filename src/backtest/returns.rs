//! Strategy return computation and performance metrics.
//!
//! Converts the position series and spread changes into per-period returns,
//! compounds them, and derives CAGR, annualized volatility, win ratio and
//! maximum drawdown. A position entered at `t` earns the change realized
//! from `t` to `t+1`: every per-period return is the PRIOR period's position
//! times the current change.

use crate::stats::sample_std;

/// Trading days per year used for annualization.
const TRADING_DAYS: f64 = 252.0;

/// Return columns plus the scalar performance metrics.
#[derive(Debug, Clone)]
pub struct ReturnsSeries {
    pub perc_change: Vec<Option<f64>>,
    pub strat_returns: Vec<Option<f64>>,
    pub cum_returns: Vec<Option<f64>>,
    pub drawdown: Vec<Option<f64>>,
    /// Final value of the compounded multiplier (starts at 1).
    pub final_return: f64,
    pub cagr: f64,
    pub annualized_volatility: f64,
    pub win_ratio: f64,
    /// Deepest drawdown: the most negative value of the drawdown column,
    /// or 0 when the curve never falls below its running peak.
    pub max_drawdown: f64,
}

/// Compute per-period and compounded returns for a finished signal run.
///
/// `positions` is the combined long+short column; `spread`, `close_a` and
/// `close_b` are the cleaned full-sample columns. The percent change at `t`
/// normalizes the spread change by the current-period cost of carrying both
/// legs, `a[t] + h·b[t]`, scaled by `leverage`. Undefined cells (row 0, rows
/// with an undefined prior position, non-finite quotients) stay undefined
/// and are skipped by every aggregate.
pub fn compute_returns(
    positions: &[Option<i8>],
    spread: &[f64],
    close_a: &[f64],
    close_b: &[f64],
    hedge_ratio: f64,
    leverage: f64,
) -> ReturnsSeries {
    let n = spread.len();
    debug_assert_eq!(positions.len(), n);
    debug_assert_eq!(close_a.len(), n);
    debug_assert_eq!(close_b.len(), n);

    let mut perc_change: Vec<Option<f64>> = vec![None; n];
    for t in 1..n {
        let denom = close_a[t] + hedge_ratio * close_b[t];
        let change = (spread[t] - spread[t - 1]) / denom * leverage;
        if change.is_finite() {
            perc_change[t] = Some(change);
        }
    }

    let mut strat_returns: Vec<Option<f64>> = vec![None; n];
    for t in 1..n {
        if let (Some(position), Some(change)) = (positions[t - 1], perc_change[t]) {
            strat_returns[t] = Some(position as f64 * change);
        }
    }

    // Compounding skips undefined rows: the multiplier only advances on
    // defined returns, and the curve cell stays undefined on the others.
    let mut cum_returns: Vec<Option<f64>> = vec![None; n];
    let mut multiplier = 1.0;
    for t in 0..n {
        if let Some(r) = strat_returns[t] {
            multiplier *= 1.0 + r;
            cum_returns[t] = Some(multiplier);
        }
    }
    let final_return = multiplier;

    // Drawdown against the running peak, with the peak floored at the
    // initial capital baseline of 1.
    let mut drawdown: Vec<Option<f64>> = vec![None; n];
    let mut running_max = 1.0_f64;
    let mut max_drawdown = 0.0_f64;
    for t in 0..n {
        if let Some(cum) = cum_returns[t] {
            running_max = running_max.max(cum);
            let dd = cum / running_max - 1.0;
            drawdown[t] = Some(dd);
            max_drawdown = max_drawdown.min(dd);
        }
    }

    let cagr = if n > 0 {
        final_return.powf(TRADING_DAYS / n as f64) - 1.0
    } else {
        f64::NAN
    };

    let defined: Vec<f64> = strat_returns.iter().filter_map(|r| *r).collect();
    let annualized_volatility = match sample_std(&defined) {
        Some(std) => std * TRADING_DAYS.sqrt(),
        None => f64::NAN,
    };

    let win_ratio = if n > 0 {
        defined.iter().filter(|r| **r > 0.0).count() as f64 / n as f64
    } else {
        f64::NAN
    };

    ReturnsSeries {
        perc_change,
        strat_returns,
        cum_returns,
        drawdown,
        final_return,
        cagr,
        annualized_volatility,
        win_ratio,
        max_drawdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_flat_curve_stays_at_one() {
        let n = 20;
        let positions = vec![Some(0i8); n];
        let spread: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).sin()).collect();
        let close_a = vec![100.0; n];
        let close_b = vec![50.0; n];

        let returns = compute_returns(&positions, &spread, &close_a, &close_b, 1.0, 1.0);

        for cum in returns.cum_returns.iter().skip(1) {
            assert_eq!(cum.unwrap(), 1.0);
        }
        assert_eq!(returns.max_drawdown, 0.0);
        assert_eq!(returns.final_return, 1.0);
    }

    #[test]
    fn test_constant_delta_matches_closed_form() {
        // Always-long position over a spread climbing by a constant delta
        // with constant prices: every period earns delta / (a + h*b).
        let n = 40;
        let delta = 1.5;
        let positions = vec![Some(1i8); n];
        let spread: Vec<f64> = (0..n).map(|i| i as f64 * delta).collect();
        let close_a = vec![100.0; n];
        let close_b = vec![50.0; n];
        let hedge = 1.0;

        let returns = compute_returns(&positions, &spread, &close_a, &close_b, hedge, 1.0);

        let per_step = delta / (100.0 + hedge * 50.0);
        let expected_final = (1.0 + per_step).powi((n - 1) as i32);
        assert!((returns.final_return - expected_final).abs() < 1e-9);

        let expected_cagr = expected_final.powf(252.0 / n as f64) - 1.0;
        assert!((returns.cagr - expected_cagr).abs() < 1e-9);

        // Monotonically rising curve never draws down.
        assert_eq!(returns.max_drawdown, 0.0);
        // Every defined return is a win, but the denominator counts all rows.
        assert!((returns.win_ratio - (n - 1) as f64 / n as f64).abs() < 1e-12);
    }

    #[test]
    fn test_prior_period_position_earns_the_return() {
        // Position turns long at t=1; the t=1 change must NOT be earned,
        // the t=2 change must be.
        let positions = vec![Some(0i8), Some(1), Some(1), Some(0)];
        let spread = vec![0.0, 10.0, 20.0, 20.0];
        let close_a = vec![100.0; 4];
        let close_b = vec![100.0; 4];

        let returns = compute_returns(&positions, &spread, &close_a, &close_b, 1.0, 1.0);

        assert_eq!(returns.strat_returns[1], Some(0.0)); // flat during move
        let earned = returns.strat_returns[2].unwrap();
        assert!((earned - 10.0 / 200.0).abs() < 1e-12);
        assert_eq!(returns.strat_returns[3], Some(0.0)); // long but no move
    }

    #[test]
    fn test_undefined_positions_propagate() {
        let positions = vec![None, None, Some(1), Some(1)];
        let spread = vec![0.0, 1.0, 2.0, 3.0];
        let close_a = vec![10.0; 4];
        let close_b = vec![10.0; 4];

        let returns = compute_returns(&positions, &spread, &close_a, &close_b, 1.0, 1.0);

        assert!(returns.strat_returns[1].is_none());
        assert!(returns.strat_returns[2].is_none()); // prior position undefined
        assert!(returns.strat_returns[3].is_some());
        assert!(returns.cum_returns[2].is_none());
    }

    #[test]
    fn test_drawdown_reports_deepest_value() {
        // Short position against a rising spread loses every period.
        let n = 10;
        let positions = vec![Some(-1i8); n];
        let spread: Vec<f64> = (0..n).map(|i| i as f64 * 2.0).collect();
        let close_a = vec![50.0; n];
        let close_b = vec![50.0; n];

        let returns = compute_returns(&positions, &spread, &close_a, &close_b, 1.0, 1.0);

        assert!(returns.max_drawdown < 0.0);
        // Deepest equals the final drawdown of a monotonically losing curve.
        let last_dd = returns.drawdown[n - 1].unwrap();
        assert!((returns.max_drawdown - last_dd).abs() < 1e-12);
    }

    #[test]
    fn test_leverage_scales_returns() {
        let positions = vec![Some(1i8); 3];
        let spread = vec![0.0, 1.0, 2.0];
        let close_a = vec![10.0; 3];
        let close_b = vec![10.0; 3];

        let base = compute_returns(&positions, &spread, &close_a, &close_b, 1.0, 1.0);
        let levered = compute_returns(&positions, &spread, &close_a, &close_b, 1.0, 3.0);

        let r1 = base.strat_returns[1].unwrap();
        let r1_lev = levered.strat_returns[1].unwrap();
        assert!((r1_lev - 3.0 * r1).abs() < 1e-12);
    }
}
