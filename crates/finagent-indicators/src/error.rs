use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Indicator period must be at least 1")]
    InvalidPeriod,

    #[error("No price bars available for {0}")]
    EmptySeries(String),

    #[error("Lookback of {0} periods falls outside the supported date range")]
    LookbackOutOfRange(usize),
}
