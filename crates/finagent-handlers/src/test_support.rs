//! Test doubles for the dispatcher and the indicator pipeline.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use finagent_models::config::FinagentConfig;
use finagent_models::invocation::{BodyStyle, InvocationEnvelope};
use finagent_models::price::{PriceBar, PriceSeries};
use finagent_sources::{
    Credentials, FinancialDatasetsClient, HttpTransport, NewsClient, PriceSeriesSource,
    SourceError,
};

use crate::dispatch::ToolHandler;
use crate::error::HandlerError;
use crate::fundamental::FundamentalHandler;
use crate::market::MarketHandler;
use crate::technical::TechnicalHandler;

type ErrorFactory = Box<dyn Fn() -> HandlerError + Send + Sync>;

enum Script {
    Ok(serde_json::Value),
    Err(ErrorFactory),
    Panic,
}

/// A handler that returns a canned outcome for every invocation.
pub struct ScriptedHandler {
    script: Script,
    body_style: BodyStyle,
}

impl ScriptedHandler {
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            script: Script::Ok(body),
            body_style: BodyStyle::Plain,
        }
    }

    pub fn err(make: impl Fn() -> HandlerError + Send + Sync + 'static) -> Self {
        Self {
            script: Script::Err(Box::new(make)),
            body_style: BodyStyle::Plain,
        }
    }

    pub fn panicking() -> Self {
        Self {
            script: Script::Panic,
            body_style: BodyStyle::Plain,
        }
    }

    pub fn with_style(mut self, body_style: BodyStyle) -> Self {
        self.body_style = body_style;
        self
    }
}

#[async_trait]
impl ToolHandler for ScriptedHandler {
    fn family(&self) -> &str {
        "scripted"
    }

    fn body_style(&self) -> BodyStyle {
        self.body_style
    }

    async fn handle(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        match &self.script {
            Script::Ok(body) => Ok(body.clone()),
            Script::Err(make) => Err(make()),
            Script::Panic => panic!("scripted panic in {}", invocation.function),
        }
    }
}

/// Price source serving a fixed set of bars and recording each fetch window.
pub struct StubPriceSource {
    bars: Vec<PriceBar>,
    fetches: Mutex<Vec<(String, NaiveDate, NaiveDate, u32)>>,
}

impl StubPriceSource {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self {
            bars,
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// One bar per weekday in `[first, last]`, closes rising by 1 from 100.
    /// Returned newest first, the way the provider sometimes orders them.
    pub fn weekdays(first: NaiveDate, last: NaiveDate) -> Self {
        let mut bars: Vec<PriceBar> = first
            .iter_days()
            .take_while(|day| *day <= last)
            .filter(|day| chrono::Datelike::weekday(day).number_from_monday() <= 5)
            .enumerate()
            .map(|(i, day)| {
                let close = 100.0 + i as f64;
                PriceBar {
                    timestamp: day.and_hms_opt(0, 0, 0).unwrap_or_default(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1_000.0,
                }
            })
            .collect();
        bars.reverse();
        Self::new(bars)
    }

    /// `(ticker, start, end, limit)` of every fetch so far.
    pub fn fetches(&self) -> Vec<(String, NaiveDate, NaiveDate, u32)> {
        self.fetches.lock().expect("stub fetches lock").clone()
    }
}

#[async_trait]
impl PriceSeriesSource for StubPriceSource {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: u32,
    ) -> Result<PriceSeries, SourceError> {
        self.fetches
            .lock()
            .expect("stub fetches lock")
            .push((ticker.to_string(), start, end, limit));
        Ok(PriceSeries {
            ticker: ticker.to_string(),
            prices: self.bars.clone(),
        })
    }
}

/// The three handler families over one transport, with default config.
pub struct Handlers {
    pub technical: TechnicalHandler,
    pub fundamental: FundamentalHandler,
    pub market: MarketHandler,
}

impl Handlers {
    pub fn new(credentials: Credentials, transport: Arc<dyn HttpTransport>) -> Self {
        let config = FinagentConfig::default();
        let client = Arc::new(FinancialDatasetsClient::new(
            &config.financial_datasets,
            credentials.financial_datasets,
            Arc::clone(&transport),
        ));
        let news = Arc::new(NewsClient::new(&config.news, credentials.news, transport));

        Self {
            technical: TechnicalHandler::new(
                Arc::clone(&client),
                config.handlers.technical_body,
                config.handlers.default_indicator_period,
                config.financial_datasets.price_fetch_limit,
            ),
            fundamental: FundamentalHandler::new(
                Arc::clone(&client),
                config.handlers.fundamental_body,
            ),
            market: MarketHandler::new(client, news, config.handlers.market_body),
        }
    }
}
