use serde::{Deserialize, Serialize};

use crate::indicator::DEFAULT_PERIOD;
use crate::invocation::BodyStyle;

/// Top-level configuration for the finagent tool handlers.
///
/// Holds no credentials, only the names of the environment variables that
/// carry them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FinagentConfig {
    #[serde(default)]
    pub financial_datasets: FinancialDatasetsConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub handlers: HandlersConfig,
}

/// Configuration for the financial data provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialDatasetsConfig {
    /// Base URL without a trailing slash.
    #[serde(default = "default_financial_datasets_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_financial_datasets_key_env")]
    pub api_key_env: String,
    /// Maximum bars requested when fetching the indicator lookback window.
    #[serde(default = "default_price_fetch_limit")]
    pub price_fetch_limit: u32,
}

impl Default for FinancialDatasetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_financial_datasets_url(),
            api_key_env: default_financial_datasets_key_env(),
            price_fetch_limit: default_price_fetch_limit(),
        }
    }
}

/// Configuration for the web-search news source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsConfig {
    #[serde(default = "default_news_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_news_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_search_depth")]
    pub search_depth: String,
    /// Results are restricted to these sites.
    #[serde(default = "default_include_domains")]
    pub include_domains: Vec<String>,
    #[serde(default)]
    pub include_answer: bool,
    #[serde(default)]
    pub include_images: bool,
    #[serde(default)]
    pub include_raw_content: bool,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_news_endpoint(),
            api_key_env: default_news_key_env(),
            search_depth: default_search_depth(),
            include_domains: default_include_domains(),
            include_answer: false,
            include_images: false,
            include_raw_content: false,
        }
    }
}

/// Per-family response wrapping and technical defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandlersConfig {
    #[serde(default = "default_plain")]
    pub technical_body: BodyStyle,
    #[serde(default = "default_text")]
    pub fundamental_body: BodyStyle,
    #[serde(default = "default_text")]
    pub market_body: BodyStyle,
    /// Indicator period applied when the invocation has no `period` parameter.
    #[serde(default = "default_indicator_period")]
    pub default_indicator_period: usize,
}

impl Default for HandlersConfig {
    fn default() -> Self {
        Self {
            technical_body: default_plain(),
            fundamental_body: default_text(),
            market_body: default_text(),
            default_indicator_period: default_indicator_period(),
        }
    }
}

fn default_financial_datasets_url() -> String {
    "https://api.financialdatasets.ai".to_string()
}
fn default_financial_datasets_key_env() -> String {
    "FINANCIAL_DATASETS_API_KEY".to_string()
}
fn default_price_fetch_limit() -> u32 {
    5000
}
fn default_news_endpoint() -> String {
    "https://api.tavily.com/search".to_string()
}
fn default_news_key_env() -> String {
    "TAVILY_API_KEY".to_string()
}
fn default_search_depth() -> String {
    "advanced".to_string()
}
fn default_include_domains() -> Vec<String> {
    vec!["google.com".to_string(), "bloomberg.com".to_string()]
}
fn default_plain() -> BodyStyle {
    BodyStyle::Plain
}
fn default_text() -> BodyStyle {
    BodyStyle::Text
}
fn default_indicator_period() -> usize {
    DEFAULT_PERIOD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_finagent_config() {
        let config = FinagentConfig::default();

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: FinagentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn default_body_styles_match_handler_families() {
        let handlers = HandlersConfig::default();
        assert_eq!(handlers.technical_body, BodyStyle::Plain);
        assert_eq!(handlers.fundamental_body, BodyStyle::Text);
        assert_eq!(handlers.market_body, BodyStyle::Text);
        assert_eq!(handlers.default_indicator_period, 14);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: FinagentConfig = toml::from_str("").unwrap();
        assert_eq!(config, FinagentConfig::default());
        assert_eq!(config.news.include_domains, vec!["google.com", "bloomberg.com"]);
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[financial_datasets]
base_url = "http://localhost:8080"
price_fetch_limit = 250

[news]
search_depth = "basic"
include_domains = ["reuters.com"]
include_answer = true

[handlers]
technical_body = "text"
default_indicator_period = 20
"#;

        let config: FinagentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.financial_datasets.base_url, "http://localhost:8080");
        assert_eq!(config.financial_datasets.price_fetch_limit, 250);
        assert_eq!(
            config.financial_datasets.api_key_env,
            "FINANCIAL_DATASETS_API_KEY"
        );
        assert_eq!(config.news.search_depth, "basic");
        assert!(config.news.include_answer);
        assert!(!config.news.include_images);
        assert_eq!(config.handlers.technical_body, BodyStyle::Text);
        assert_eq!(config.handlers.market_body, BodyStyle::Text);
        assert_eq!(config.handlers.default_indicator_period, 20);
    }
}
