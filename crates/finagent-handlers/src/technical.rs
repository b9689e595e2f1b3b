use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use finagent_indicators::{compute_for_request, lookback_start};
use finagent_models::indicator::{IndicatorKind, IndicatorRequest, IndicatorSeries, InvalidRequest};
use finagent_models::invocation::{BodyStyle, InvocationEnvelope};
use finagent_sources::{FinancialDatasetsClient, PriceSeriesSource};
use tracing::info;

use crate::dispatch::ToolHandler;
use crate::error::HandlerError;
use crate::params;

/// Functions served by the technical handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechnicalFunction {
    CurrentStockPrice,
    StockPrices,
    TechnicalIndicators,
}

impl TechnicalFunction {
    pub const ALL: [TechnicalFunction; 3] = [
        TechnicalFunction::CurrentStockPrice,
        TechnicalFunction::StockPrices,
        TechnicalFunction::TechnicalIndicators,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TechnicalFunction::CurrentStockPrice => "get_current_stock_price",
            TechnicalFunction::StockPrices => "get_stock_prices",
            TechnicalFunction::TechnicalIndicators => "get_technical_indicators",
        }
    }
}

impl FromStr for TechnicalFunction {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| HandlerError::UnknownFunction(s.to_string()))
    }
}

pub struct TechnicalHandler {
    client: Arc<FinancialDatasetsClient>,
    body_style: BodyStyle,
    default_period: usize,
    price_fetch_limit: u32,
}

impl TechnicalHandler {
    pub fn new(
        client: Arc<FinancialDatasetsClient>,
        body_style: BodyStyle,
        default_period: usize,
        price_fetch_limit: u32,
    ) -> Self {
        Self {
            client,
            body_style,
            default_period,
            price_fetch_limit,
        }
    }

    async fn current_price(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        let [ticker] = params::require(invocation, ["ticker"])?;
        Ok(self.client.snapshot(ticker).await?)
    }

    async fn stock_prices(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        let [ticker, start, end, limit] =
            params::require(invocation, ["ticker", "start_date", "end_date", "limit"])?;
        let start = params::parse_date("start_date", start)?;
        let end = params::parse_date("end_date", end)?;
        let limit: u32 = params::parse_positive("limit", limit)?;
        if start > end {
            return Err(HandlerError::invalid(
                "start_date",
                format!("{start} is after end_date {end}"),
            ));
        }

        Ok(self.client.prices_json(ticker, start, end, limit).await?)
    }

    async fn indicators(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        let request = indicator_request(invocation, self.default_period)?;
        let series =
            technical_indicators(self.client.as_ref(), &request, self.price_fetch_limit).await?;
        serde_json::to_value(&series).map_err(|e| HandlerError::Internal(e.to_string()))
    }
}

#[async_trait]
impl ToolHandler for TechnicalHandler {
    fn family(&self) -> &str {
        "technical"
    }

    fn body_style(&self) -> BodyStyle {
        self.body_style
    }

    async fn handle(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        match invocation.function.parse::<TechnicalFunction>()? {
            TechnicalFunction::CurrentStockPrice => self.current_price(invocation).await,
            TechnicalFunction::StockPrices => self.stock_prices(invocation).await,
            TechnicalFunction::TechnicalIndicators => self.indicators(invocation).await,
        }
    }
}

/// Validate the indicator parameters of `invocation`.
pub fn indicator_request(
    invocation: &InvocationEnvelope,
    default_period: usize,
) -> Result<IndicatorRequest, HandlerError> {
    let [ticker, indicator, start, end] =
        params::require(invocation, ["ticker", "indicator", "start_date", "end_date"])?;
    let indicator: IndicatorKind = indicator.parse().map_err(invalid_request)?;
    let start = params::parse_date("start_date", start)?;
    let end = params::parse_date("end_date", end)?;
    let period = params::positive_or(invocation, "period", default_period)?;

    IndicatorRequest::new(ticker, indicator, period, start, end).map_err(invalid_request)
}

/// Fetch bars from the lookback start through `end_date` and compute the
/// indicator. Fetch failures are returned as they are.
pub async fn technical_indicators(
    source: &dyn PriceSeriesSource,
    request: &IndicatorRequest,
    fetch_limit: u32,
) -> Result<IndicatorSeries, HandlerError> {
    let fetch_start = lookback_start(request.start_date, request.period)?;
    info!(
        ticker = %request.ticker,
        indicator = %request.indicator,
        period = request.period,
        %fetch_start,
        "Fetching bars for indicator"
    );

    let series = source
        .fetch(&request.ticker, fetch_start, request.end_date, fetch_limit)
        .await?;
    Ok(compute_for_request(request, series)?)
}

fn invalid_request(e: InvalidRequest) -> HandlerError {
    let name = match e {
        InvalidRequest::UnknownIndicator(_) => "indicator",
        InvalidRequest::ZeroPeriod => "period",
        InvalidRequest::InvertedRange { .. } => "start_date",
    };
    HandlerError::invalid(name, e)
}
