//! Mean-reversion signal generation.
//!
//! Builds rolling bands around the spread and runs two independent position
//! state machines over it. The state machines are explicit forward scans
//! carrying an accumulator: position at `t` is a function of the position at
//! `t-1` and the spread/band values at `t` only. Rows with undefined bands
//! carry the previous state; state is `None` until the first transition.

use crate::stats::rolling_mean_std;

/// Band columns plus the three position columns, all aligned with the spread.
#[derive(Debug, Clone)]
pub struct SignalSeries {
    pub moving_average: Vec<Option<f64>>,
    pub moving_std_dev: Vec<Option<f64>>,
    pub upper_band: Vec<Option<f64>>,
    pub lower_band: Vec<Option<f64>>,
    pub positions_long: Vec<Option<i8>>,
    pub positions_short: Vec<Option<i8>>,
    /// Combined position per row: long + short when both sides are defined.
    /// Values land in {-1, 0, 1}; a simultaneous long and short entry sums
    /// to 0 rather than being treated as a fault.
    pub positions: Vec<Option<i8>>,
}

/// Generate long/flat/short positions from band deviations of the spread.
///
/// Long side: enter (1) when the spread drops below the lower band, exit (0)
/// once it recovers to the moving average. Short side mirrors against the
/// upper band. Exits are tested before entries; with a non-negative band
/// width the two conditions cannot hold at once, so the ordering is a
/// tie-break that never fires.
///
/// # Panics
/// Panics on a zero lookback; the engine validates the half-life first.
pub fn generate_signals(spread: &[f64], lookback: usize) -> SignalSeries {
    assert!(lookback >= 1, "lookback must be at least 1");

    let (moving_average, moving_std_dev) = rolling_mean_std(spread, lookback);

    let upper_band: Vec<Option<f64>> = moving_average
        .iter()
        .zip(moving_std_dev.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m + 2.0 * s),
            _ => None,
        })
        .collect();
    let lower_band: Vec<Option<f64>> = moving_average
        .iter()
        .zip(moving_std_dev.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - 2.0 * s),
            _ => None,
        })
        .collect();

    let mut positions_long = Vec::with_capacity(spread.len());
    let mut state: Option<i8> = None;
    for t in 0..spread.len() {
        state = match moving_average[t] {
            Some(ma) if spread[t] >= ma => Some(0),
            Some(_) => match lower_band[t] {
                Some(lower) if spread[t] < lower => Some(1),
                _ => state,
            },
            None => state,
        };
        positions_long.push(state);
    }

    let mut positions_short = Vec::with_capacity(spread.len());
    let mut state: Option<i8> = None;
    for t in 0..spread.len() {
        state = match moving_average[t] {
            Some(ma) if spread[t] <= ma => Some(0),
            Some(_) => match upper_band[t] {
                Some(upper) if spread[t] > upper => Some(-1),
                _ => state,
            },
            None => state,
        };
        positions_short.push(state);
    }

    let positions = positions_long
        .iter()
        .zip(positions_short.iter())
        .map(|(l, s)| match (l, s) {
            (Some(l), Some(s)) => Some(l + s),
            _ => None,
        })
        .collect();

    SignalSeries {
        moving_average,
        moving_std_dev,
        upper_band,
        lower_band,
        positions_long,
        positions_short,
        positions,
    }
}
