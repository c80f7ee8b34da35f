//! Failure injection tests for the news proxy.

use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use news_proxy::config::validation::validate_config;
use news_proxy::proxy::Provider;
use news_proxy_sdk::NewsProxyClient;

mod common;

use common::{start_mock_upstream, start_programmable_upstream, start_proxy, test_config, test_key};

fn assert_generic_500(res: &news_proxy_sdk::NewsResponse, provider: Provider) {
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({"error": "Failed to fetch news"}));
    assert!(!res.body.to_string().contains(&test_key(provider)));
}

#[tokio::test]
async fn test_upstream_timeout_returns_generic_500() {
    let upstream = start_programmable_upstream(|_| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, r#"{"late":true}"#.to_string())
    })
    .await;

    let mut config = test_config(&upstream);
    config.timeouts.upstream_ms = 200;
    let (url, shutdown) = start_proxy(config).await;

    let start = Instant::now();
    let res = NewsProxyClient::new(&url)
        .headlines("newsdata", &[])
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_secs(2), "timeout not enforced");
    assert_generic_500(&res, Provider::NewsData);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_returns_generic_500() {
    let upstream = start_mock_upstream(200, "{}").await;
    let mut config = test_config(&upstream);

    // Reserve a port, then free it so nothing listens there.
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_addr = closed.local_addr().unwrap();
    drop(closed);
    config.providers.currents.base_url = Some(format!("http://{}/latest", closed_addr));

    let (url, shutdown) = start_proxy(config).await;
    let res = NewsProxyClient::new(&url)
        .headlines("currents", &[])
        .await
        .unwrap();
    assert_generic_500(&res, Provider::Currents);

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_upstream_bodies_return_generic_500() {
    for body in ["not json at all", "[1,2,3]", r#""just a string""#, ""] {
        let upstream = start_mock_upstream(200, body).await;
        let (url, shutdown) = start_proxy(test_config(&upstream)).await;

        let res = NewsProxyClient::new(&url)
            .headlines("gnews", &[])
            .await
            .unwrap();
        assert_generic_500(&res, Provider::GNews);

        shutdown.trigger();
    }
}

#[tokio::test]
async fn test_upstream_server_error_returns_generic_500() {
    let upstream = start_mock_upstream(
        503,
        r#"{"status":"error","message":"maintenance for key secret-newsapi-key"}"#,
    )
    .await;
    let (url, shutdown) = start_proxy(test_config(&upstream)).await;

    let res = NewsProxyClient::new(&url)
        .headlines("newsapi", &[])
        .await
        .unwrap();
    assert_generic_500(&res, Provider::NewsApi);

    shutdown.trigger();
}

#[tokio::test]
async fn test_no_retry_on_failure() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let upstream = start_programmable_upstream(move |_| {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (502, "Bad Gateway".to_string())
        }
    })
    .await;
    let (url, shutdown) = start_proxy(test_config(&upstream)).await;

    let res = NewsProxyClient::new(&url)
        .headlines("currents", &[])
        .await
        .unwrap();
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(call_count.load(Ordering::SeqCst), 1, "exactly one upstream call");

    shutdown.trigger();
}

#[tokio::test]
async fn test_failing_provider_does_not_affect_others() {
    let upstream = start_programmable_upstream(|target| async move {
        if target.starts_with("/gnews") {
            (500, "{}".to_string())
        } else {
            (200, r#"{"ok":true}"#.to_string())
        }
    })
    .await;
    let (url, shutdown) = start_proxy(test_config(&upstream)).await;
    let client = NewsProxyClient::new(&url);

    let failing = client.headlines("gnews", &[]).await.unwrap();
    assert_generic_500(&failing, Provider::GNews);

    let healthy = client.headlines("newsdata", &[]).await.unwrap();
    assert_eq!(healthy.status, StatusCode::OK);
    assert_eq!(healthy.body, json!({"ok": true}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_deadline_before_upstream_deadline_is_rejected_and_json() {
    let upstream = start_programmable_upstream(|_| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, r#"{"late":true}"#.to_string())
    })
    .await;

    let mut config = test_config(&upstream);
    config.timeouts.request_secs = 1;
    config.timeouts.upstream_ms = 2_500;
    assert!(validate_config(&config).is_err());

    // Even when started without validation, the deadline answers in JSON.
    let (url, shutdown) = start_proxy(config).await;
    let start = Instant::now();
    let res = NewsProxyClient::new(&url)
        .headlines("gnews", &[])
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_secs(2), "request deadline not enforced");
    assert_generic_500(&res, Provider::GNews);

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_upstream_body_returns_generic_500() {
    let upstream = start_programmable_upstream(|target| async move {
        if target.starts_with("/newsapi") {
            (200, format!(r#"{{"articles":"{}"}}"#, "x".repeat(4096)))
        } else {
            (200, r#"{"articles":[]}"#.to_string())
        }
    })
    .await;

    let mut config = test_config(&upstream);
    config.security.max_upstream_body_size = 1024;
    let (url, shutdown) = start_proxy(config).await;
    let client = NewsProxyClient::new(&url);

    let res = client.headlines("newsapi", &[]).await.unwrap();
    assert_generic_500(&res, Provider::NewsApi);

    let res = client.headlines("currents", &[]).await.unwrap();
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"articles": []}));

    shutdown.trigger();
}
