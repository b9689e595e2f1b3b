//! Technical indicators over daily price bars.
//!
//! [`engine`] holds the pure SMA / EMA / RSI computations over an ascending
//! bar slice. [`series`] aligns a fetched price series with the requested
//! date window: lookback extension, sorting, window filtering and output
//! trimming.

pub mod engine;
pub mod error;
pub mod series;

pub use engine::{compute, ema, rsi, sma};
pub use error::IndicatorError;
pub use series::{compute_for_request, filter_window, lookback_start, trim_to_window};
