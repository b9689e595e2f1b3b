//! finagent - tool handlers for a multi-agent financial assistant
//!
//! Each handler family answers one agent action group: it reads the
//! invocation envelope, calls the external data API, optionally computes
//! technical indicators, and wraps the result in a response envelope.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use finagent::{build_dispatcher, Family};
//! use finagent::models::config::FinagentConfig;
//! use finagent::models::invocation::InvocationEnvelope;
//! use finagent::sources::{Credentials, ReqwestTransport};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = FinagentConfig::default();
//! let credentials = Credentials::from_env(&config);
//! let transport = Arc::new(ReqwestTransport::new()?);
//! let dispatcher = build_dispatcher(Family::Technical, &config, credentials, transport);
//!
//! let invocation = InvocationEnvelope::new("stock-analysis", "get_current_stock_price")
//!     .with_parameter("ticker", "AAPL");
//! let response = dispatcher.dispatch(&invocation).await;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```

pub use finagent_handlers as handlers;
pub use finagent_indicators as indicators;
pub use finagent_models as models;
pub use finagent_sources as sources;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use finagent_handlers::{
    Dispatcher, FundamentalHandler, HandlerError, MarketHandler, TechnicalHandler, ToolHandler,
};
use finagent_models::config::FinagentConfig;
use finagent_models::invocation::{InvocationEnvelope, ResponseEnvelope};
use finagent_sources::{Credentials, FinancialDatasetsClient, HttpTransport, NewsClient};

/// The handler families, one per agent action group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Technical,
    Fundamental,
    Market,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Technical => "technical",
            Family::Fundamental => "fundamental",
            Family::Market => "market",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "technical" => Ok(Family::Technical),
            "fundamental" => Ok(Family::Fundamental),
            "market" => Ok(Family::Market),
            other => Err(format!(
                "unknown handler family '{other}' (expected technical, fundamental or market)"
            )),
        }
    }
}

/// Read a TOML config file, or use defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FinagentConfig, anyhow::Error> {
    let Some(path) = path else {
        return Ok(FinagentConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Build the dispatcher for one handler family from configuration.
pub fn build_dispatcher(
    family: Family,
    config: &FinagentConfig,
    credentials: Credentials,
    transport: Arc<dyn HttpTransport>,
) -> Dispatcher {
    let client = Arc::new(FinancialDatasetsClient::new(
        &config.financial_datasets,
        credentials.financial_datasets,
        Arc::clone(&transport),
    ));

    let handler: Arc<dyn ToolHandler> = match family {
        Family::Technical => Arc::new(TechnicalHandler::new(
            client,
            config.handlers.technical_body,
            config.handlers.default_indicator_period,
            config.financial_datasets.price_fetch_limit,
        )),
        Family::Fundamental => Arc::new(FundamentalHandler::new(
            client,
            config.handlers.fundamental_body,
        )),
        Family::Market => {
            let news = Arc::new(NewsClient::new(&config.news, credentials.news, transport));
            Arc::new(MarketHandler::new(client, news, config.handlers.market_body))
        }
    };

    Dispatcher::new(handler)
}

/// Decode one invocation event and dispatch it.
///
/// Only input that is not JSON at all is an error. An event that is JSON but
/// does not decode as an invocation is answered with an error envelope,
/// correlated by whatever `actionGroup` and `function` it carries.
pub async fn invoke(dispatcher: &Dispatcher, event: &str) -> Result<ResponseEnvelope, anyhow::Error> {
    let raw: serde_json::Value =
        serde_json::from_str(event).context("Failed to parse invocation JSON")?;

    match serde_json::from_value::<InvocationEnvelope>(raw.clone()) {
        Ok(invocation) => Ok(dispatcher.dispatch(&invocation).await),
        Err(e) => {
            let field = |name: &str| raw.get(name).and_then(|v| v.as_str()).unwrap_or_default().to_string();
            let invocation = InvocationEnvelope::new(field("actionGroup"), field("function"));
            Ok(dispatcher.reject(
                &invocation,
                HandlerError::Internal(format!("Malformed invocation: {e}")),
            ))
        }
    }
}
