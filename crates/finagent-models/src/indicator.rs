use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::price::provider_time;

/// Lookback period used when the caller does not supply one.
pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
}

impl IndicatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = InvalidRequest;

    /// Case-insensitive: "SMA", "sma" and "Sma" all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            "rsi" => Ok(IndicatorKind::Rsi),
            _ => Err(InvalidRequest::UnknownIndicator(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("unsupported indicator '{0}' (expected sma, ema or rsi)")]
    UnknownIndicator(String),

    #[error("period must be at least 1")]
    ZeroPeriod,

    #[error("start_date {start} is after end_date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// A validated indicator computation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndicatorRequest {
    pub ticker: String,
    pub indicator: IndicatorKind,
    pub period: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl IndicatorRequest {
    pub fn new(
        ticker: impl Into<String>,
        indicator: IndicatorKind,
        period: usize,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, InvalidRequest> {
        if period == 0 {
            return Err(InvalidRequest::ZeroPeriod);
        }
        if start_date > end_date {
            return Err(InvalidRequest::InvertedRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            ticker: ticker.into(),
            indicator,
            period,
            start_date,
            end_date,
        })
    }
}

/// One output value, aligned to the bar it was computed at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorPoint {
    #[serde(with = "provider_time")]
    pub time: NaiveDateTime,
    /// Bar time read as UTC, in milliseconds since the epoch.
    pub time_milliseconds: i64,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn new(time: NaiveDateTime, value: f64) -> Self {
        Self {
            time,
            time_milliseconds: time.and_utc().timestamp_millis(),
            value,
        }
    }
}

/// Result body of an indicator computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorSeries {
    pub ticker: String,
    pub indicator: IndicatorKind,
    pub period: usize,
    pub data: Vec<IndicatorPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("SMA".parse::<IndicatorKind>().unwrap(), IndicatorKind::Sma);
        assert_eq!("ema".parse::<IndicatorKind>().unwrap(), IndicatorKind::Ema);
        assert_eq!(" Rsi ".parse::<IndicatorKind>().unwrap(), IndicatorKind::Rsi);
        assert_eq!(
            "macd".parse::<IndicatorKind>(),
            Err(InvalidRequest::UnknownIndicator("macd".to_string()))
        );
    }

    #[test]
    fn request_rejects_zero_period() {
        let err = IndicatorRequest::new(
            "AAPL",
            IndicatorKind::Sma,
            0,
            date("2024-01-01"),
            date("2024-02-01"),
        )
        .unwrap_err();
        assert_eq!(err, InvalidRequest::ZeroPeriod);
    }

    #[test]
    fn request_rejects_inverted_range() {
        let err = IndicatorRequest::new(
            "AAPL",
            IndicatorKind::Rsi,
            14,
            date("2024-03-01"),
            date("2024-02-01"),
        )
        .unwrap_err();
        assert!(matches!(err, InvalidRequest::InvertedRange { .. }));
    }

    #[test]
    fn single_day_range_is_valid() {
        let req = IndicatorRequest::new(
            "AAPL",
            IndicatorKind::Ema,
            1,
            date("2024-03-01"),
            date("2024-03-01"),
        );
        assert!(req.is_ok());
    }

    #[test]
    fn point_carries_utc_millis() {
        let time = date("2024-01-02").and_hms_opt(0, 0, 0).unwrap();
        let point = IndicatorPoint::new(time, 12.5);
        assert_eq!(point.time_milliseconds, 1_704_153_600_000);

        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["time"], "2024-01-02 00:00:00");
        assert_eq!(value["value"], 12.5);
    }

    #[test]
    fn series_serializes_kind_lowercase() {
        let series = IndicatorSeries {
            ticker: "NVDA".to_string(),
            indicator: IndicatorKind::Rsi,
            period: 14,
            data: vec![],
        };
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["indicator"], "rsi");
        assert_eq!(value["data"], serde_json::json!([]));
    }
}
