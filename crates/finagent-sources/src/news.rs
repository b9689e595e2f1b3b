use std::sync::Arc;

use finagent_models::config::NewsConfig;
use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info};

use crate::error::{FetchContext, SourceError};
use crate::transport::{HttpRequest, HttpTransport};

/// Market news via the web-search API, restricted to the configured sites.
pub struct NewsClient {
    transport: Arc<dyn HttpTransport>,
    api_key: Option<SecretString>,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(
        config: &NewsConfig,
        api_key: Option<SecretString>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            api_key,
            config: config.clone(),
        }
    }

    /// Search for `query`. Returns `{"query": ..., "results": <search response>}`.
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<serde_json::Value, SourceError> {
        let Some(api_key) = &self.api_key else {
            error!(key = %self.config.api_key_env, "News API key is not configured");
            return Err(SourceError::MissingCredential {
                key: self.config.api_key_env.clone(),
            });
        };

        // The search API takes its key in the payload rather than a header.
        let payload = serde_json::json!({
            "api_key": api_key.expose_secret(),
            "query": query,
            "max_results": max_results,
            "search_depth": self.config.search_depth,
            "include_domains": self.config.include_domains,
            "include_answer": self.config.include_answer,
            "include_images": self.config.include_images,
            "include_raw_content": self.config.include_raw_content,
        });

        info!(query, max_results, "Searching news");
        let request = HttpRequest::post_json(&self.config.endpoint, payload);

        let response = self.transport.send(request).await.map_err(|e| {
            error!(query, error = %e, "News search failed");
            SourceError::Transport {
                context: FetchContext::collection("query", query, "results"),
                message: e.to_string(),
            }
        })?;

        if !response.is_success() {
            return Err(SourceError::Status {
                status: response.status,
                body: response.body,
            });
        }

        let results: serde_json::Value = response
            .json()
            .map_err(|e| SourceError::Decode(format!("news for '{query}': {e}")))?;

        Ok(serde_json::json!({
            "query": query,
            "results": results,
        }))
    }
}
