//! pairscan: statistical pairs-trading backtester.
//!
//! For a pair of securities the engine tests for a cointegrating
//! relationship, estimates the mean-reversion half-life of the spread,
//! derives a band-based long/flat/short signal, and compounds the strategy
//! returns into performance metrics. The scan layer sweeps sector universes,
//! evaluating every candidate pair in both directions, and renders the
//! findings into report artifacts.

pub mod backtest;
pub mod cli;
pub mod commands;
pub mod data;
pub mod scan;
pub mod stats;
