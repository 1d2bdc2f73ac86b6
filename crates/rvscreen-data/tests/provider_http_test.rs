//! HTTP-level tests for the metric fetcher and symbol source.

use rvscreen_data::{
    DataError, IexBatchClient, MetricFetcher, ProviderConfig, RetryPolicy, SymbolSource,
    WikipediaSymbolSource, fetch_all,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new("Tpk_test")
        .with_base_url(format!("{}/stable", server.uri()))
        .with_retry(RetryPolicy::fixed(Duration::from_millis(10), 2))
}

fn tickers(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_batch_request_shape_and_absent_symbols() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stable/stock/market/batch"))
        .and(query_param("symbols", "AAA,BBB,CCC"))
        .and(query_param("types", "price,quote,advanced-stats"))
        .and(query_param("token", "Tpk_test"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "AAA": {"price": 10.0, "quote": {"peRatio": 10.0}},
                "BBB": {"price": 20.0, "advanced-stats": {"enterpriseValue": 100.0, "EBITDA": 10.0}}
            }"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = IexBatchClient::new(config_for(&server)).unwrap();
    let metrics = client
        .fetch_batch(&tickers(&["AAA", "BBB", "CCC"]))
        .await
        .unwrap();

    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics["AAA"].pe_ratio, Some(10.0));
    assert_eq!(metrics["BBB"].ebitda, Some(10.0));
    assert!(!metrics.contains_key("CCC"));
}

#[tokio::test]
async fn test_retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stable/stock/market/batch"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stable/stock/market/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"AAA": {"price": 1.5}}"#))
        .mount(&server)
        .await;

    let client = IexBatchClient::new(config_for(&server)).unwrap();
    let metrics = client.fetch_batch(&tickers(&["AAA"])).await.unwrap();
    assert_eq!(metrics["AAA"].price, Some(1.5));
}

#[tokio::test]
async fn test_gives_up_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = IexBatchClient::new(config_for(&server)).unwrap();
    let result = client.fetch_batch(&tickers(&["AAA"])).await;
    assert!(matches!(result, Err(DataError::Provider(_))));
}

#[tokio::test]
async fn test_auth_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = IexBatchClient::new(config_for(&server)).unwrap();
    let result = client.fetch_batch(&tickers(&["AAA"])).await;
    assert!(matches!(result, Err(DataError::Provider(_))));
}

#[tokio::test]
async fn test_fetch_all_splits_into_provider_batches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("symbols", "A,B"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"A": {"price": 1.0}, "B": {"price": 2.0}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("symbols", "C"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"C": {"price": 3.0}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = IexBatchClient::new(config_for(&server)).unwrap();
    let mut sizes = Vec::new();
    let metrics = fetch_all(&client, &tickers(&["A", "B", "C"]), 2, 2, |n| sizes.push(n))
        .await
        .unwrap();

    assert_eq!(metrics.len(), 3);
    assert_eq!(metrics["C"].price, Some(3.0));
    assert_eq!(sizes, vec![2, 1]);
}

#[tokio::test]
async fn test_wikipedia_source_fetches_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/List_of_SP_500_companies"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<table id="constituents">
                 <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr>
                 <tr><td>AAPL</td><td>Apple Inc.</td><td>Information Technology</td></tr>
                 <tr><td>XOM</td><td>ExxonMobil</td><td>Energy</td></tr>
               </table>"#,
        ))
        .mount(&server)
        .await;

    let source =
        WikipediaSymbolSource::with_url(format!("{}/wiki/List_of_SP_500_companies", server.uri()))
            .unwrap();
    let records = source.fetch_universe().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].ticker, "XOM");
}

#[tokio::test]
async fn test_wikipedia_source_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = WikipediaSymbolSource::with_url(server.uri()).unwrap();
    let result = source.fetch_universe().await;
    assert!(matches!(result, Err(DataError::SourceUnavailable(_))));
}
