use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Format the provider uses for bar times, minus its zone suffix.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone suffixes the provider appends to bar times. Dropped on parse.
const ZONE_SUFFIXES: [&str; 2] = [" EDT", " EST"];

/// Parse a provider bar time such as `"2024-03-01 00:00:00 EST"` into naive local time.
///
/// A bare `"YYYY-MM-DD"` is accepted as midnight.
pub fn parse_provider_time(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let cut = ZONE_SUFFIXES
        .iter()
        .filter_map(|zone| raw.find(zone))
        .min()
        .unwrap_or(raw.len());
    let local = raw[..cut].trim();

    NaiveDateTime::parse_from_str(local, TIME_FORMAT).or_else(|err| {
        NaiveDate::parse_from_str(local, "%Y-%m-%d")
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| err)
    })
}

/// Serde adapter for provider-formatted timestamps.
pub mod provider_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(super::TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_provider_time(&raw).map_err(serde::de::Error::custom)
    }
}

/// One daily OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    #[serde(rename = "time", with = "provider_time")]
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Absent or `null` volume reads as zero.
    #[serde(default, deserialize_with = "zero_if_null")]
    pub volume: f64,
}

fn zero_if_null<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl PriceBar {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Bars for one ticker as returned by the price endpoint.
///
/// The provider does not promise ordering; call [`PriceSeries::sort_ascending`]
/// before computing anything over the bars.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceSeries {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub prices: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn empty(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            prices: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn sort_ascending(&mut self) {
        self.prices.sort_by_key(|bar| bar.timestamp);
    }
}
