//! Price-series and annotated-series containers for one backtest run.

use chrono::NaiveDate;

/// Two date-aligned close series, the sole input of a pair backtest.
///
/// Rows are ordered by strictly increasing date. The series is owned by one
/// backtest run and never mutated after construction; cleaning produces a
/// new instance.
#[derive(Debug, Clone)]
pub struct AlignedPriceSeries {
    pub dates: Vec<NaiveDate>,
    pub close_a: Vec<f64>,
    pub close_b: Vec<f64>,
}

impl AlignedPriceSeries {
    /// Build a series from parallel columns.
    ///
    /// # Panics
    /// Panics if the columns differ in length or dates are not strictly
    /// increasing; both indicate a bug in the alignment layer.
    pub fn new(dates: Vec<NaiveDate>, close_a: Vec<f64>, close_b: Vec<f64>) -> Self {
        assert_eq!(dates.len(), close_a.len(), "column length mismatch");
        assert_eq!(dates.len(), close_b.len(), "column length mismatch");
        assert!(
            dates.windows(2).all(|w| w[0] < w[1]),
            "dates must be strictly increasing"
        );
        Self {
            dates,
            close_a,
            close_b,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Drop rows where either close is non-finite.
    pub fn cleaned(&self) -> AlignedPriceSeries {
        let mut dates = Vec::with_capacity(self.len());
        let mut close_a = Vec::with_capacity(self.len());
        let mut close_b = Vec::with_capacity(self.len());

        for i in 0..self.len() {
            if self.close_a[i].is_finite() && self.close_b[i].is_finite() {
                dates.push(self.dates[i]);
                close_a.push(self.close_a[i]);
                close_b.push(self.close_b[i]);
            }
        }

        AlignedPriceSeries {
            dates,
            close_a,
            close_b,
        }
    }
}

/// Every intermediate column of a completed backtest, aligned row-for-row
/// with the cleaned input series. Undefined cells (warm-up rows, rows before
/// the first signal) are `None`, never a default value.
#[derive(Debug, Clone)]
pub struct AnnotatedSeries {
    pub dates: Vec<NaiveDate>,
    pub close_a: Vec<f64>,
    pub close_b: Vec<f64>,
    pub spread: Vec<f64>,
    pub moving_average: Vec<Option<f64>>,
    pub moving_std_dev: Vec<Option<f64>>,
    pub upper_band: Vec<Option<f64>>,
    pub lower_band: Vec<Option<f64>>,
    pub positions_long: Vec<Option<i8>>,
    pub positions_short: Vec<Option<i8>>,
    pub positions: Vec<Option<i8>>,
    pub perc_change: Vec<Option<f64>>,
    pub strat_returns: Vec<Option<f64>>,
    pub cum_returns: Vec<Option<f64>>,
    pub drawdown: Vec<Option<f64>>,
}

impl AnnotatedSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn test_cleaned_drops_non_finite_rows() {
        let series = AlignedPriceSeries::new(
            vec![day(1), day(2), day(3), day(4)],
            vec![10.0, f64::NAN, 12.0, 13.0],
            vec![5.0, 5.5, f64::INFINITY, 6.5],
        );
        let clean = series.cleaned();
        assert_eq!(clean.len(), 2);
        assert_eq!(clean.dates, vec![day(1), day(4)]);
        assert_eq!(clean.close_a, vec![10.0, 13.0]);
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn test_unordered_dates_rejected() {
        AlignedPriceSeries::new(
            vec![day(2), day(1)],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
        );
    }
}
