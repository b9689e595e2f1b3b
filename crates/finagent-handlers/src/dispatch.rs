use std::sync::Arc;

use async_trait::async_trait;
use finagent_models::invocation::{BodyStyle, InvocationEnvelope, ResponseEnvelope};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::HandlerError;
use crate::response::build_response;

/// One handler family (technical, fundamental, market). Mockable for testing.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Family name used in logs.
    fn family(&self) -> &str;

    fn body_style(&self) -> BodyStyle;

    /// Execute `invocation.function` and produce the response body.
    async fn handle(&self, invocation: &InvocationEnvelope)
        -> Result<serde_json::Value, HandlerError>;
}

/// Entry point for one invocation: runs the handler, renders failures as
/// bodies and wraps everything in a response envelope.
pub struct Dispatcher {
    handler: Arc<dyn ToolHandler>,
}

impl Dispatcher {
    pub fn new(handler: Arc<dyn ToolHandler>) -> Self {
        Self { handler }
    }

    pub fn family(&self) -> &str {
        self.handler.family()
    }

    /// Answer `invocation` with `error` without running the handler.
    pub fn reject(&self, invocation: &InvocationEnvelope, error: HandlerError) -> ResponseEnvelope {
        warn!(
            family = %self.handler.family(),
            function = %invocation.function,
            error = %error,
            "Invocation rejected"
        );
        build_response(
            invocation,
            &error.to_body(&invocation.function),
            self.handler.body_style(),
        )
    }

    /// Always yields an envelope carrying the invocation's action group and
    /// function, whatever happens inside the handler.
    pub async fn dispatch(&self, invocation: &InvocationEnvelope) -> ResponseEnvelope {
        let invocation_id = Uuid::new_v4();
        let span = info_span!(
            "invocation",
            id = %invocation_id,
            family = %self.handler.family(),
            action_group = %invocation.action_group,
            function = %invocation.function,
        );

        async {
            info!(parameters = invocation.parameters.len(), "Received invocation");

            let handler = Arc::clone(&self.handler);
            let request = invocation.clone();
            let outcome = tokio::spawn(
                async move { handler.handle(&request).await }.in_current_span(),
            )
            .await;

            let body = match outcome {
                Ok(Ok(body)) => {
                    info!("Invocation succeeded");
                    body
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "Invocation failed");
                    e.to_body(&invocation.function)
                }
                Err(e) => {
                    error!(error = %e, "Handler task panicked");
                    HandlerError::Internal(e.to_string()).to_body(&invocation.function)
                }
            };

            build_response(invocation, &body, self.handler.body_style())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedHandler;
    use serde_json::json;

    fn invocation(function: &str) -> InvocationEnvelope {
        InvocationEnvelope::new("stock-analysis", function).with_parameter("ticker", "AAPL")
    }

    #[tokio::test]
    async fn success_body_is_wrapped() {
        let dispatcher = Dispatcher::new(Arc::new(ScriptedHandler::ok(json!({"price": 1.0}))));
        let envelope = dispatcher.dispatch(&invocation("get_current_stock_price")).await;

        assert_eq!(envelope.action_group(), "stock-analysis");
        assert_eq!(envelope.function(), "get_current_stock_price");
        assert_eq!(envelope.body_json(), json!({"price": 1.0}));
    }

    #[tokio::test]
    async fn handler_error_becomes_body() {
        let dispatcher = Dispatcher::new(Arc::new(ScriptedHandler::err(|| {
            HandlerError::UnknownFunction("get_weather".to_string())
        })));
        let envelope = dispatcher.dispatch(&invocation("get_weather")).await;

        assert_eq!(envelope.function(), "get_weather");
        assert_eq!(
            envelope.body_json(),
            json!({"error": "Invalid function", "message": "Function get_weather is not supported"})
        );
    }

    #[tokio::test]
    async fn panic_still_yields_envelope() {
        let dispatcher = Dispatcher::new(Arc::new(ScriptedHandler::panicking()));
        let envelope = dispatcher.dispatch(&invocation("get_stock_prices")).await;

        assert_eq!(envelope.action_group(), "stock-analysis");
        assert_eq!(envelope.function(), "get_stock_prices");
        let body = envelope.body_json();
        assert_eq!(body["message"], "Failed to execute get_stock_prices");
        assert!(body["error"].as_str().unwrap().starts_with("Internal error"));
    }

    #[test]
    fn reject_answers_without_running_the_handler() {
        let dispatcher = Dispatcher::new(Arc::new(ScriptedHandler::panicking()));
        let envelope = dispatcher.reject(
            &invocation("get_stock_prices"),
            HandlerError::Internal("bad event".to_string()),
        );

        assert_eq!(envelope.function(), "get_stock_prices");
        assert_eq!(
            envelope.body_json(),
            json!({"error": "Internal error: bad event", "message": "Failed to execute get_stock_prices"})
        );
    }

    #[tokio::test]
    async fn body_style_follows_handler() {
        let dispatcher = Dispatcher::new(Arc::new(
            ScriptedHandler::ok(json!({"a": 1})).with_style(BodyStyle::Text),
        ));
        let envelope = dispatcher.dispatch(&invocation("get_news")).await;
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            wire["response"]["functionResponse"]["responseBody"]["TEXT"]["body"],
            json!("{\"a\":1}")
        );
    }
}
