//! Market and fundamental families: defaults, optional filters and text bodies.

use std::sync::Arc;

use finagent_handlers::test_support::Handlers;
use finagent_handlers::Dispatcher;
use finagent_models::invocation::InvocationEnvelope;
use finagent_sources::test_support::MockTransport;
use finagent_sources::Credentials;
use secrecy::SecretString;
use serde_json::json;

fn credentials() -> Credentials {
    Credentials {
        financial_datasets: Some(SecretString::from("fd-key".to_string())),
        news: Some(SecretString::from("news-key".to_string())),
    }
}

fn market(credentials: Credentials, transport: Arc<MockTransport>) -> Dispatcher {
    Dispatcher::new(Arc::new(Handlers::new(credentials, transport).market))
}

fn fundamental(credentials: Credentials, transport: Arc<MockTransport>) -> Dispatcher {
    Dispatcher::new(Arc::new(Handlers::new(credentials, transport).fundamental))
}

#[tokio::test]
async fn options_chain_applies_default_limit_and_omits_filters() {
    let transport = Arc::new(MockTransport::new().respond_json(200, json!({"options_chain": []})));
    let invocation =
        InvocationEnvelope::new("market-data", "get_options_chain").with_parameter("ticker", "TSLA");

    let envelope = market(credentials(), transport.clone()).dispatch(&invocation).await;

    let request = transport.last_request().unwrap();
    assert!(request.url.ends_with("/options/chain"));
    assert_eq!(request.query_value("limit"), Some("10"));
    assert_eq!(request.query_value("strike_price"), None);
    assert_eq!(request.query_value("option_type"), None);
    assert_eq!(envelope.body_json(), json!({"options_chain": []}));
}

#[tokio::test]
async fn options_chain_forwards_supplied_filters() {
    let transport = Arc::new(MockTransport::new());
    let invocation = InvocationEnvelope::new("market-data", "get_options_chain")
        .with_parameter("ticker", "TSLA")
        .with_parameter("strike_price", "250")
        .with_parameter("option_type", "put");

    market(credentials(), transport.clone()).dispatch(&invocation).await;

    let request = transport.last_request().unwrap();
    assert_eq!(request.query_value("strike_price"), Some("250"));
    assert_eq!(request.query_value("option_type"), Some("put"));
}

#[tokio::test]
async fn insider_trades_default_limit() {
    let transport = Arc::new(MockTransport::new());
    let invocation =
        InvocationEnvelope::new("market-data", "get_insider_trades").with_parameter("ticker", "NVDA");

    market(credentials(), transport.clone()).dispatch(&invocation).await;

    let request = transport.last_request().unwrap();
    assert!(request.url.ends_with("/insider-transactions"));
    assert_eq!(request.query_value("ticker"), Some("NVDA"));
    assert_eq!(request.query_value("limit"), Some("10"));
}

#[tokio::test]
async fn news_defaults_to_five_results_in_a_text_body() {
    let transport = Arc::new(
        MockTransport::new().respond_json(200, json!({"results": [{"title": "Fed holds"}]})),
    );
    let invocation =
        InvocationEnvelope::new("market-data", "get_news").with_parameter("query", "fed rates");

    let envelope = market(credentials(), transport.clone()).dispatch(&invocation).await;

    let payload = transport.last_request().unwrap().json.unwrap();
    assert_eq!(payload["max_results"], 5);
    assert_eq!(payload["query"], "fed rates");

    let wire = serde_json::to_value(&envelope).unwrap();
    assert!(wire["response"]["functionResponse"]["responseBody"]["TEXT"]["body"].is_string());
    assert_eq!(
        envelope.body_json(),
        json!({"query": "fed rates", "results": {"results": [{"title": "Fed holds"}]}})
    );
}

#[tokio::test]
async fn news_without_key_names_the_news_variable() {
    let transport = Arc::new(MockTransport::new());
    let credentials = Credentials {
        news: None,
        ..credentials()
    };
    let invocation =
        InvocationEnvelope::new("market-data", "get_news").with_parameter("query", "earnings");

    let envelope = market(credentials, transport.clone()).dispatch(&invocation).await;

    assert_eq!(envelope.body_json()["missing_config"], "TAVILY_API_KEY");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn news_transport_failure_keeps_query() {
    let transport = Arc::new(MockTransport::new().fail("timed out"));
    let invocation =
        InvocationEnvelope::new("market-data", "get_news").with_parameter("query", "earnings");

    let envelope = market(credentials(), transport).dispatch(&invocation).await;

    assert_eq!(
        envelope.body_json(),
        json!({"query": "earnings", "results": [], "error": "timed out"})
    );
}

#[tokio::test]
async fn statements_use_the_matching_endpoint() {
    let cases = [
        ("get_income_statements", "/financials/income-statements"),
        ("get_balance_sheets", "/financials/balance-sheets"),
        ("get_cash_flow_statements", "/financials/cash-flow-statements"),
    ];

    for (function, path) in cases {
        let transport = Arc::new(MockTransport::new().respond_json(200, json!({"ok": function})));
        let invocation = InvocationEnvelope::new("fundamentals", function)
            .with_parameter("ticker", "AAPL")
            .with_parameter("period", "annual")
            .with_parameter("limit", "4");

        let envelope = fundamental(credentials(), transport.clone())
            .dispatch(&invocation)
            .await;

        let request = transport.last_request().unwrap();
        assert!(request.url.ends_with(path), "{function} -> {}", request.url);
        assert_eq!(request.query_value("period"), Some("annual"));
        assert_eq!(request.query_value("limit"), Some("4"));
        assert_eq!(envelope.function(), function);
        assert_eq!(envelope.body_json(), json!({"ok": function}));
    }
}

#[tokio::test]
async fn statements_require_all_parameters() {
    let transport = Arc::new(MockTransport::new());
    let invocation = InvocationEnvelope::new("fundamentals", "get_balance_sheets")
        .with_parameter("ticker", "AAPL")
        .with_parameter("period", "");

    let envelope = fundamental(credentials(), transport.clone())
        .dispatch(&invocation)
        .await;

    assert_eq!(
        envelope.body_json(),
        json!("Missing required parameters: period, limit")
    );
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn unknown_fundamental_function_has_the_shared_shape() {
    let transport = Arc::new(MockTransport::new());
    let invocation = InvocationEnvelope::new("fundamentals", "get_dividends");

    let envelope = fundamental(credentials(), transport).dispatch(&invocation).await;

    assert_eq!(envelope.action_group(), "fundamentals");
    assert_eq!(
        envelope.body_json(),
        json!({"error": "Invalid function", "message": "Function get_dividends is not supported"})
    );
}
