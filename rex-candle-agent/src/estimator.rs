//! Action-value estimator backed by a candle network.
mod base;
mod config;
pub use base::CandleEstimator;
pub use config::CandleEstimatorConfig;
