use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use finagent_models::invocation::InvocationEnvelope;
use thiserror::Error;

use crate::error::HandlerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parameter not found: {0}")]
pub struct NotFound(pub String);

/// Value of the first parameter named exactly `name`. No trimming, no coercion.
pub fn get<'a>(invocation: &'a InvocationEnvelope, name: &str) -> Result<&'a str, NotFound> {
    invocation
        .parameters
        .iter()
        .find(|param| param.name == name)
        .map(|param| param.value.as_str())
        .ok_or_else(|| NotFound(name.to_string()))
}

/// Like [`get`], but an absent or blank value is `None`.
pub fn optional<'a>(invocation: &'a InvocationEnvelope, name: &str) -> Option<&'a str> {
    get(invocation, name)
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// All of `names`, present and non-blank, in order.
///
/// Reports every missing name at once rather than the first one.
pub fn require<'a, const N: usize>(
    invocation: &'a InvocationEnvelope,
    names: [&str; N],
) -> Result<[&'a str; N], HandlerError> {
    let values = names.map(|name| optional(invocation, name));

    let missing: Vec<String> = names
        .iter()
        .zip(values.iter())
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(HandlerError::MissingParameters(missing));
    }

    Ok(values.map(Option::unwrap_or_default))
}

pub fn parse<T>(name: &str, raw: &str) -> Result<T, HandlerError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| HandlerError::invalid(name, e))
}

/// A strictly positive integer (limits, periods, result counts).
pub fn parse_positive<T>(name: &str, raw: &str) -> Result<T, HandlerError>
where
    T: FromStr + Default + PartialOrd,
    T::Err: Display,
{
    let value: T = parse(name, raw)?;
    if value <= T::default() {
        return Err(HandlerError::invalid(name, "must be at least 1"));
    }
    Ok(value)
}

pub fn parse_date(name: &str, raw: &str) -> Result<NaiveDate, HandlerError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| HandlerError::invalid(name, format!("expected YYYY-MM-DD ({e})")))
}

/// Parse an optional parameter, falling back to `default` when absent or blank.
pub fn positive_or<T>(invocation: &InvocationEnvelope, name: &str, default: T) -> Result<T, HandlerError>
where
    T: FromStr + Default + PartialOrd,
    T::Err: Display,
{
    match optional(invocation, name) {
        Some(raw) => parse_positive(name, raw),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> InvocationEnvelope {
        InvocationEnvelope::new("ag", "get_stock_prices")
            .with_parameter("ticker", "AAPL")
            .with_parameter("limit", "25")
            .with_parameter("empty", "   ")
            .with_parameter("ticker", "MSFT")
    }

    #[test]
    fn get_returns_first_match() {
        assert_eq!(get(&invocation(), "ticker"), Ok("AAPL"));
    }

    #[test]
    fn get_is_case_sensitive() {
        assert_eq!(
            get(&invocation(), "Ticker"),
            Err(NotFound("Ticker".to_string()))
        );
    }

    #[test]
    fn get_does_not_trim() {
        assert_eq!(get(&invocation(), "empty"), Ok("   "));
    }

    #[test]
    fn optional_treats_blank_as_absent() {
        assert_eq!(optional(&invocation(), "empty"), None);
        assert_eq!(optional(&invocation(), "nope"), None);
        assert_eq!(optional(&invocation(), "limit"), Some("25"));
    }

    #[test]
    fn require_reports_all_missing() {
        let err = require(&invocation(), ["ticker", "start_date", "empty"]).unwrap_err();
        match err {
            HandlerError::MissingParameters(names) => {
                assert_eq!(names, vec!["start_date", "empty"]);
            }
            other => panic!("expected MissingParameters, got {other:?}"),
        }
    }

    #[test]
    fn require_returns_values_in_order() {
        let invocation = invocation();
        let [limit, ticker] = require(&invocation, ["limit", "ticker"]).unwrap();
        assert_eq!(limit, "25");
        assert_eq!(ticker, "AAPL");
    }

    #[test]
    fn parse_positive_rejects_zero_and_garbage() {
        assert_eq!(parse_positive::<u32>("limit", "10").unwrap(), 10);
        assert!(matches!(
            parse_positive::<u32>("limit", "0"),
            Err(HandlerError::InvalidParameter { .. })
        ));
        assert!(matches!(
            parse_positive::<u32>("limit", "ten"),
            Err(HandlerError::InvalidParameter { ref name, .. }) if name == "limit"
        ));
    }

    #[test]
    fn parse_date_names_the_parameter() {
        assert_eq!(
            parse_date("start_date", "2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        let err = parse_date("end_date", "02/29/2024").unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for parameter end_date"));
    }

    #[test]
    fn positive_or_uses_default_when_absent() {
        assert_eq!(positive_or(&invocation(), "max_results", 5u32).unwrap(), 5);
        assert_eq!(positive_or(&invocation(), "empty", 7u32).unwrap(), 7);
        assert_eq!(positive_or(&invocation(), "limit", 5u32).unwrap(), 25);
    }
}
