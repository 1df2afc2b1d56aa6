//! Date alignment of two price series.

use std::collections::HashMap;

use tracing::debug;

use super::PriceSeries;
use crate::backtest::AlignedPriceSeries;

/// Intersect two series on their common dates.
///
/// Rows present in only one series are dropped; the result is ordered by
/// date. Returns `None` when no dates overlap.
pub fn align_pair(a: &PriceSeries, b: &PriceSeries) -> Option<AlignedPriceSeries> {
    let b_by_date: HashMap<_, _> = b.dates.iter().zip(b.closes.iter()).collect();

    let mut dates = Vec::new();
    let mut close_a = Vec::new();
    let mut close_b = Vec::new();

    for (date, close) in a.dates.iter().zip(a.closes.iter()) {
        if let Some(other) = b_by_date.get(date) {
            dates.push(*date);
            close_a.push(*close);
            close_b.push(**other);
        }
    }

    if dates.is_empty() {
        debug!(a = %a.symbol, b = %b.symbol, "No overlapping dates between series");
        return None;
    }

    if dates.len() < a.len().max(b.len()) {
        debug!(
            a = %a.symbol,
            b = %b.symbol,
            common = dates.len(),
            len_a = a.len(),
            len_b = b.len(),
            "Dropped non-overlapping rows during alignment"
        );
    }

    Some(AlignedPriceSeries::new(dates, close_a, close_b))
}
