//! Integration tests for the candle history REST client

use std::time::Duration;

use brickcloud::error::MarketDataError;
use brickcloud::services::{DeltaRestClient, MarketDataProvider};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CANDLES_PATH: &str = "/v2/history/candles";

fn client(server: &MockServer) -> DeltaRestClient {
    DeltaRestClient::with_client(server.uri(), reqwest::Client::new())
        .with_limit(2)
        .with_window_pause(Duration::ZERO)
}

#[tokio::test]
async fn windows_are_fetched_and_merged() {
    let server = MockServer::start().await;

    // limit 2 x 60s: [0, 119] and [120, 239]
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .and(query_param("symbol", "ETHUSDT"))
        .and(query_param("resolution", "1m"))
        .and(query_param("start", "0"))
        .and(query_param("end", "119"))
        .and(query_param("limit", "2"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [
                [60, 2, 3, 1, 2.5, 4],
                [0, 1, 2, 0.5, 1.5, 3]
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .and(query_param("start", "120"))
        .and(query_param("end", "239"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "time": 120, "open": "3", "high": "4", "low": "2", "close": "3.5", "volume": "1" },
                { "time": 60, "open": 9, "high": 9, "low": 9, "close": 9 },
                { "time": 180, "open": 0, "high": 0, "low": 0, "close": 0 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bars = client(&server)
        .get_candles("ETHUSDT", "1m", 0, 239)
        .await
        .unwrap();

    assert_eq!(bars.iter().map(|b| b.time).collect::<Vec<_>>(), vec![0, 60, 120]);
    // The first window's 60 wins over the duplicate from the second.
    assert_eq!(bars[1].close, 2.5);
    assert_eq!(bars[2].close, 3.5);
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [[0, 1, 2, 0.5, 1.5, 3]]
        })))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let bars = client(&server)
        .get_candles("ETHUSDT", "1m", 0, 100)
        .await
        .unwrap();
    assert_eq!(bars.len(), 1);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown symbol"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .get_candles("NOPE", "1m", 0, 100)
        .await
        .unwrap_err();
    match err {
        MarketDataError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "unknown symbol");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_results_are_no_candles() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_candles("ETHUSDT", "1m", 0, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::NoCandles { .. }));
}

#[tokio::test]
async fn undecodable_payload_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .get_candles("ETHUSDT", "1m", 0, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Decode(_)));
}

#[tokio::test]
async fn bad_resolution_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .get_candles("ETHUSDT", "tick", 0, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Config(_)));
}

#[tokio::test]
async fn window_span_overflow_is_a_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // Each resolution is valid alone but limit * seconds overflows.
    let err = client(&server)
        .with_limit(i64::MAX)
        .get_candles("ETHUSDT", "1d", 0, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Config(_)));
}
