use chrono::{Duration, NaiveDate};
use finagent_models::indicator::{IndicatorKind, IndicatorPoint, IndicatorRequest, IndicatorSeries};
use finagent_models::price::{PriceBar, PriceSeries};
use tracing::debug;

use crate::engine;
use crate::error::IndicatorError;

/// First calendar day to fetch so that warm-up bars exist before `start`.
///
/// The window is extended back by `2 * period` calendar days, which leaves room
/// for weekends and holidays.
pub fn lookback_start(start: NaiveDate, period: usize) -> Result<NaiveDate, IndicatorError> {
    i64::try_from(period)
        .ok()
        .and_then(|p| p.checked_mul(2))
        .and_then(Duration::try_days)
        .and_then(|span| start.checked_sub_signed(span))
        .ok_or(IndicatorError::LookbackOutOfRange(period))
}

/// Bars whose calendar date lies in `[start, end]`, inclusive on both ends.
pub fn filter_window(bars: &[PriceBar], start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
    bars.iter()
        .filter(|bar| (start..=end).contains(&bar.date()))
        .cloned()
        .collect()
}

/// Drop output points whose calendar date lies outside `[start, end]`.
pub fn trim_to_window(
    points: Vec<IndicatorPoint>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<IndicatorPoint> {
    points
        .into_iter()
        .filter(|point| (start..=end).contains(&point.time.date()))
        .collect()
}

/// Compute the requested indicator over a series fetched from
/// [`lookback_start`] through `request.end_date`.
///
/// Alignment differs per kind:
/// - SMA is computed over the bars inside the requested window only.
/// - RSI is computed over the whole lookback series, then points before
///   `start_date` are trimmed.
/// - EMA is computed over the whole lookback series and every point is kept,
///   warm-up bars included.
pub fn compute_for_request(
    request: &IndicatorRequest,
    mut series: PriceSeries,
) -> Result<IndicatorSeries, IndicatorError> {
    series.sort_ascending();

    let fetch_start = lookback_start(request.start_date, request.period)?;
    let extended = filter_window(&series.prices, fetch_start, request.end_date);

    let data = match request.indicator {
        IndicatorKind::Sma => {
            let window = filter_window(&extended, request.start_date, request.end_date);
            non_empty(&window, &request.ticker)?;
            engine::sma(&window, request.period)?
        }
        IndicatorKind::Ema => {
            non_empty(&extended, &request.ticker)?;
            engine::ema(&extended, request.period)?
        }
        IndicatorKind::Rsi => {
            non_empty(&extended, &request.ticker)?;
            let points = engine::rsi(&extended, request.period)?;
            trim_to_window(points, request.start_date, request.end_date)
        }
    };

    debug!(
        ticker = %request.ticker,
        indicator = %request.indicator,
        period = request.period,
        bars = extended.len(),
        points = data.len(),
        "Computed indicator"
    );

    Ok(IndicatorSeries {
        ticker: request.ticker.clone(),
        indicator: request.indicator,
        period: request.period,
        data,
    })
}

fn non_empty(bars: &[PriceBar], ticker: &str) -> Result<(), IndicatorError> {
    if bars.is_empty() {
        return Err(IndicatorError::EmptySeries(ticker.to_string()));
    }
    Ok(())
}
