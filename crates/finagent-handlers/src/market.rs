use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use finagent_models::invocation::{BodyStyle, InvocationEnvelope};
use finagent_sources::{FinancialDatasetsClient, NewsClient, OptionsChainQuery};

use crate::dispatch::ToolHandler;
use crate::error::HandlerError;
use crate::params;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_NEWS_RESULTS: u32 = 5;

/// Functions served by the market handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketFunction {
    OptionsChain,
    InsiderTrades,
    News,
}

impl MarketFunction {
    pub const ALL: [MarketFunction; 3] = [
        MarketFunction::OptionsChain,
        MarketFunction::InsiderTrades,
        MarketFunction::News,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MarketFunction::OptionsChain => "get_options_chain",
            MarketFunction::InsiderTrades => "get_insider_trades",
            MarketFunction::News => "get_news",
        }
    }
}

impl FromStr for MarketFunction {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| HandlerError::UnknownFunction(s.to_string()))
    }
}

pub struct MarketHandler {
    client: Arc<FinancialDatasetsClient>,
    news: Arc<NewsClient>,
    body_style: BodyStyle,
}

impl MarketHandler {
    pub fn new(
        client: Arc<FinancialDatasetsClient>,
        news: Arc<NewsClient>,
        body_style: BodyStyle,
    ) -> Self {
        Self {
            client,
            news,
            body_style,
        }
    }

    async fn options_chain(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        let query = options_query(invocation)?;
        Ok(self.client.options_chain(&query).await?)
    }

    async fn insider_trades(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        let [ticker] = params::require(invocation, ["ticker"])?;
        let limit = params::positive_or(invocation, "limit", DEFAULT_LIMIT)?;
        Ok(self.client.insider_trades(ticker, limit).await?)
    }

    async fn news(&self, invocation: &InvocationEnvelope) -> Result<serde_json::Value, HandlerError> {
        let [query] = params::require(invocation, ["query"])?;
        let max_results = params::positive_or(invocation, "max_results", DEFAULT_NEWS_RESULTS)?;
        Ok(self.news.search(query, max_results).await?)
    }
}

#[async_trait]
impl ToolHandler for MarketHandler {
    fn family(&self) -> &str {
        "market"
    }

    fn body_style(&self) -> BodyStyle {
        self.body_style
    }

    async fn handle(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        match invocation.function.parse::<MarketFunction>()? {
            MarketFunction::OptionsChain => self.options_chain(invocation).await,
            MarketFunction::InsiderTrades => self.insider_trades(invocation).await,
            MarketFunction::News => self.news(invocation).await,
        }
    }
}

/// Options chain filters from `invocation`. Blank filters are left out.
pub fn options_query(invocation: &InvocationEnvelope) -> Result<OptionsChainQuery, HandlerError> {
    let [ticker] = params::require(invocation, ["ticker"])?;
    let limit = params::positive_or(invocation, "limit", DEFAULT_LIMIT)?;
    let strike_price = params::optional(invocation, "strike_price")
        .map(|raw| params::parse::<f64>("strike_price", raw))
        .transpose()?;
    let option_type = params::optional(invocation, "option_type").map(str::to_string);

    Ok(OptionsChainQuery {
        ticker: ticker.to_string(),
        limit,
        strike_price,
        option_type,
    })
}
