//! Deterministic synthetic price provider.
//!
//! Generates seeded pseudo-random walks so scans can run in CI without any
//! CSV fixtures. The generator is an LCG keyed on the symbol name: the same
//! symbol always produces the same path, different symbols diverge.

use chrono::{Days, NaiveDate};

use super::{DataError, PriceSeries, PriceSeriesProvider};

/// Per-step drift and volatility of the generated walks.
const DRIFT: f64 = 0.0001;
const VOLATILITY: f64 = 0.02;

pub struct SyntheticPriceProvider {
    /// Extra seed mixed into every symbol, so tests can vary whole universes.
    seed_offset: u64,
}

impl SyntheticPriceProvider {
    pub fn new() -> Self {
        Self { seed_offset: 0 }
    }

    pub fn with_seed(seed_offset: u64) -> Self {
        Self { seed_offset }
    }
}

impl Default for SyntheticPriceProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance the LCG and return a uniform draw in [-0.5, 0.5).
fn lcg_step(state: &mut u64) -> f64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    ((*state >> 33) as f64) / (u32::MAX as f64) - 0.5
}

impl PriceSeriesProvider for SyntheticPriceProvider {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        if end < start {
            return Err(DataError::NoDataAvailable {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        let seed: u64 = symbol
            .bytes()
            .map(|b| b as u64)
            .sum::<u64>()
            .wrapping_add(self.seed_offset);
        let mut state = seed;

        let mut dates = Vec::new();
        let mut closes = Vec::new();
        let mut price = 100.0_f64;

        let mut date = start;
        while date <= end {
            let change = DRIFT + VOLATILITY * lcg_step(&mut state);
            price *= 1.0 + change;
            price = price.max(1.0);

            dates.push(date);
            closes.push(price);
            date = date
                .checked_add_days(Days::new(1))
                .ok_or_else(|| DataError::Malformed {
                    symbol: symbol.to_string(),
                    reason: "date overflow".to_string(),
                })?;
        }

        Ok(PriceSeries {
            symbol: symbol.to_string(),
            dates,
            closes,
        })
    }
}
