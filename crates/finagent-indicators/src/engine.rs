use finagent_models::indicator::{IndicatorKind, IndicatorPoint};
use finagent_models::price::PriceBar;

use crate::error::IndicatorError;

/// Compute `kind` over ascending `bars`.
///
/// Fails on a zero period or an empty slice; otherwise returns however many
/// points the indicator naturally produces, possibly none.
pub fn compute(
    kind: IndicatorKind,
    bars: &[PriceBar],
    period: usize,
) -> Result<Vec<IndicatorPoint>, IndicatorError> {
    match kind {
        IndicatorKind::Sma => sma(bars, period),
        IndicatorKind::Ema => ema(bars, period),
        IndicatorKind::Rsi => rsi(bars, period),
    }
}

fn check_input(bars: &[PriceBar], period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod);
    }
    if bars.is_empty() {
        return Err(IndicatorError::EmptySeries("input bars".to_string()));
    }
    Ok(())
}

/// Trailing simple moving average of closes.
///
/// One point per bar from index `period - 1` on: `n - period + 1` points, or
/// none when there are fewer than `period` bars.
pub fn sma(bars: &[PriceBar], period: usize) -> Result<Vec<IndicatorPoint>, IndicatorError> {
    check_input(bars, period)?;

    let points = bars
        .windows(period)
        .map(|window| {
            let sum: f64 = window.iter().map(|bar| bar.close).sum();
            let last = &window[period - 1];
            IndicatorPoint::new(last.timestamp, sum / period as f64)
        })
        .collect();

    Ok(points)
}

/// Exponential moving average seeded with the first close.
///
/// Emits a point for every bar, the first one included, so the output has
/// exactly `n` points and the first value equals the first close.
pub fn ema(bars: &[PriceBar], period: usize) -> Result<Vec<IndicatorPoint>, IndicatorError> {
    check_input(bars, period)?;

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut current = bars[0].close;

    let points = bars
        .iter()
        .map(|bar| {
            current = (bar.close - current) * multiplier + current;
            IndicatorPoint::new(bar.timestamp, current)
        })
        .collect();

    Ok(points)
}

/// Relative strength index using plain (unsmoothed) averages over each window
/// of `period` close-to-close changes.
///
/// The window over changes `d[j..j + period]` is reported at bar `j + period`,
/// giving `n - period` points when `n > period`. A window without losses
/// reports 100.
pub fn rsi(bars: &[PriceBar], period: usize) -> Result<Vec<IndicatorPoint>, IndicatorError> {
    check_input(bars, period)?;

    let changes: Vec<f64> = bars
        .windows(2)
        .map(|pair| pair[1].close - pair[0].close)
        .collect();

    let points = changes
        .windows(period)
        .enumerate()
        .map(|(start, window)| {
            let gains: f64 = window.iter().map(|change| change.max(0.0)).sum();
            let losses: f64 = window.iter().map(|change| change.min(0.0).abs()).sum();

            let avg_gain = gains / period as f64;
            let avg_loss = losses / period as f64;

            let value = if avg_loss == 0.0 {
                100.0
            } else {
                let rs = avg_gain / avg_loss;
                100.0 - 100.0 / (1.0 + rs)
            };

            IndicatorPoint::new(bars[start + period].timestamp, value)
        })
        .collect();

    Ok(points)
}
