//! Tests for HttpProber against wiremock servers.
//!
//! Verifies that every outcome, success or not, is normalized into a
//! ProbeResult: statuses pass through untouched, JSON bodies are parsed,
//! and transport failures become `status: None`.

use std::time::Duration;

use chainreg_probe::{HttpProber, ProbeConfig, Prober};
use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_prober(timeout_secs: u64) -> HttpProber {
    HttpProber::new(ProbeConfig {
        timeout_secs,
        user_agent: "chainreg-test".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn probe_returns_status_and_parsed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"node_info": {"network": "cosmoshub-4"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let prober = test_prober(5);
    let url = format!("{}/status", server.uri());
    let result = prober.get(&url).await;

    assert_eq!(result.status, Some(200));
    assert_eq!(result.url, url);
    assert_eq!(result.body_str("/result/node_info/network"), Some("cosmoshub-4"));
    assert!(result.failure.is_none());
}

#[tokio::test]
async fn probe_does_not_fail_on_client_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cosmwasm/wasm/v1/contract/test/smart/test"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 3,
            "message": "decoding bech32 failed"
        })))
        .mount(&server)
        .await;

    let result = test_prober(5)
        .get(&format!(
            "{}/cosmwasm/wasm/v1/contract/test/smart/test",
            server.uri()
        ))
        .await;

    assert!(result.status_is(400));
    assert!(!result.is_success());
    assert_eq!(result.body["code"], 3);
}

#[tokio::test]
async fn probe_keeps_non_json_body_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = test_prober(5).get(&format!("{}/status", server.uri())).await;

    assert_eq!(result.status, Some(502));
    assert_eq!(result.body, json!("Bad Gateway"));
}

#[tokio::test]
async fn probe_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_prober(5).get(&server.uri()).await;
    assert_eq!(result.status, Some(200));
}

#[tokio::test]
async fn probe_reports_unreachable_host() {
    // Port 1 is closed: connection refused.
    let result = test_prober(5).get("http://127.0.0.1:1/status").await;

    assert_eq!(result.status, None);
    assert!(result.failure.is_some());
}

#[tokio::test]
async fn probe_reports_timeout_as_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let result = test_prober(1).get(&format!("{}/status", server.uri())).await;

    assert_eq!(result.status, None);
    let reason = result.failure.unwrap();
    assert!(reason.contains("timed out"), "unexpected reason: {reason}");
}
