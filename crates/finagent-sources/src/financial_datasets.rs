use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use finagent_models::config::FinancialDatasetsConfig;
use finagent_models::price::PriceSeries;
use secrecy::SecretString;
use tracing::{error, info, warn};

use crate::error::{FetchContext, SourceError};
use crate::transport::{HttpRequest, HttpTransport};

const API_KEY_HEADER: &str = "X-API-Key";

/// Fetches daily price bars for one ticker.
#[async_trait]
pub trait PriceSeriesSource: Send + Sync {
    /// Bars in `[start, end]`, at most `limit` of them. Truncation by the
    /// provider is passed through; there is no pagination.
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: u32,
    ) -> Result<PriceSeries, SourceError>;
}

/// The three financial statement endpoints share one request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Income,
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    fn path(&self) -> &'static str {
        match self {
            StatementKind::Income => "/financials/income-statements",
            StatementKind::BalanceSheet => "/financials/balance-sheets",
            StatementKind::CashFlow => "/financials/cash-flow-statements",
        }
    }

    /// Field holding the statements in the provider response.
    pub fn collection(&self) -> &'static str {
        match self {
            StatementKind::Income => "income_statements",
            StatementKind::BalanceSheet => "balance_sheets",
            StatementKind::CashFlow => "cash_flow_statements",
        }
    }
}

/// Options chain lookup. Filters left as `None` are not sent at all.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsChainQuery {
    pub ticker: String,
    pub limit: u32,
    pub strike_price: Option<f64>,
    pub option_type: Option<String>,
}

/// Client for the financial data REST API.
pub struct FinancialDatasetsClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: Option<SecretString>,
    api_key_env: String,
}

impl FinancialDatasetsClient {
    pub fn new(
        config: &FinancialDatasetsConfig,
        api_key: Option<SecretString>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            api_key_env: config.api_key_env.clone(),
        }
    }

    /// Daily bars for `ticker` in `[start, end]`, exactly as the provider
    /// returned them (`next_page_url` included when the result was truncated).
    pub async fn prices_json(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: u32,
    ) -> Result<serde_json::Value, SourceError> {
        let request = HttpRequest::get(self.url("/prices"))
            .query("ticker", ticker)
            .query("start_date", start.format("%Y-%m-%d"))
            .query("end_date", end.format("%Y-%m-%d"))
            .query("interval", "day")
            .query("interval_multiplier", 1)
            .query("limit", limit);

        self.get_json(request, FetchContext::collection("ticker", ticker, "prices"))
            .await
    }

    /// Daily bars for `ticker` in `[start, end]`, decoded for computation.
    pub async fn prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: u32,
    ) -> Result<PriceSeries, SourceError> {
        let body = self.prices_json(ticker, start, end, limit).await?;

        let mut series: PriceSeries = serde_json::from_value(body)
            .map_err(|e| SourceError::Decode(format!("prices for {ticker}: {e}")))?;
        if series.ticker.is_empty() {
            series.ticker = ticker.to_string();
        }

        info!(ticker, bars = series.len(), "Fetched price bars");
        Ok(series)
    }

    /// Latest price snapshot, passed through as returned.
    pub async fn snapshot(&self, ticker: &str) -> Result<serde_json::Value, SourceError> {
        let request = HttpRequest::get(self.url("/prices/snapshot")).query("ticker", ticker);
        self.get_json(request, FetchContext::scalar("ticker", ticker, "price"))
            .await
    }

    pub async fn statements(
        &self,
        kind: StatementKind,
        ticker: &str,
        period: &str,
        limit: u32,
    ) -> Result<serde_json::Value, SourceError> {
        let request = HttpRequest::get(self.url(kind.path()))
            .query("ticker", ticker)
            .query("period", period)
            .query("limit", limit);
        self.get_json(
            request,
            FetchContext::collection("ticker", ticker, kind.collection()),
        )
        .await
    }

    pub async fn options_chain(
        &self,
        query: &OptionsChainQuery,
    ) -> Result<serde_json::Value, SourceError> {
        let mut request = HttpRequest::get(self.url("/options/chain"))
            .query("ticker", &query.ticker)
            .query("limit", query.limit);
        if let Some(strike) = query.strike_price {
            request = request.query("strike_price", strike);
        }
        if let Some(option_type) = &query.option_type {
            request = request.query("option_type", option_type);
        }

        self.get_json(
            request,
            FetchContext::collection("ticker", &query.ticker, "options_chain"),
        )
        .await
    }

    pub async fn insider_trades(
        &self,
        ticker: &str,
        limit: u32,
    ) -> Result<serde_json::Value, SourceError> {
        let request = HttpRequest::get(self.url("/insider-transactions"))
            .query("ticker", ticker)
            .query("limit", limit);
        self.get_json(
            request,
            FetchContext::collection("ticker", ticker, "insider_transactions"),
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticate, send, check the status and decode the JSON body.
    ///
    /// Without an API key nothing is sent.
    async fn get_json(
        &self,
        request: HttpRequest,
        context: FetchContext,
    ) -> Result<serde_json::Value, SourceError> {
        let Some(api_key) = &self.api_key else {
            error!(key = %self.api_key_env, "Financial data API key is not configured");
            return Err(SourceError::MissingCredential {
                key: self.api_key_env.clone(),
            });
        };

        let request = request.api_key(API_KEY_HEADER, api_key.clone());
        info!(url = %request.url, subject = %context.subject, "Requesting financial data");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(subject = %context.subject, error = %e, "Financial data request failed");
                return Err(SourceError::Transport {
                    context,
                    message: e.to_string(),
                });
            }
        };

        info!(status = response.status, "Financial data response");
        if !response.is_success() {
            warn!(status = response.status, body = %response.body, "Financial data API error");
            return Err(SourceError::Status {
                status: response.status,
                body: response.body,
            });
        }

        response
            .json()
            .map_err(|e| SourceError::Decode(format!("{}: {e}", context.subject)))
    }
}

#[async_trait]
impl PriceSeriesSource for FinancialDatasetsClient {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: u32,
    ) -> Result<PriceSeries, SourceError> {
        self.prices(ticker, start, end, limit).await
    }
}
