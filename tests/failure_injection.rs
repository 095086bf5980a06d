//! Failure injection tests for the gateway.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::MockReply;

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let gateway = common::start_gateway(common::gateway_config(&common::dead_upstream_url())).await;

    let response = gateway.client().fetch("/api/summaries").await.unwrap();
    assert_eq!(response.status, 502);
    assert_eq!(response.error_message().as_deref(), Some("Bad gateway"));
    assert!(response.cache.is_none());
}

#[tokio::test]
async fn test_silent_upstream_times_out_as_bad_gateway() {
    // Accepts the request and never answers.
    let upstream = common::start_programmable_upstream(|_| async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        None
    })
    .await;
    let mut config = common::gateway_config(&upstream.base_url());
    config.upstream.timeout_ms = 200;
    let gateway = common::start_gateway(config).await;
    let client = gateway.client();

    for _ in 0..2 {
        let response = tokio::time::timeout(Duration::from_secs(5), client.fetch("/health"))
            .await
            .expect("gateway should answer once the upstream timeout fires")
            .unwrap();
        assert_eq!(response.status, 502);
        assert_eq!(response.error_message().as_deref(), Some("Bad gateway"));
        assert!(response.cache.is_none());
    }

    // Nothing was cached: both requests went upstream.
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_failed_forward_is_not_cached() {
    // First call drops the connection, second succeeds.
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let upstream = common::start_programmable_upstream(move |_| {
        let cc = cc.clone();
        async move {
            if cc.fetch_add(1, Ordering::SeqCst) == 0 {
                None
            } else {
                MockReply::ok("application/json", "{\"ok\":true}")
            }
        }
    })
    .await;
    let gateway = common::start_gateway(common::gateway_config(&upstream.base_url())).await;
    let client = gateway.client();

    let failed = client.fetch("/health").await.unwrap();
    assert_eq!(failed.status, 502);

    // Nothing was stored, so the next request goes upstream again.
    let recovered = client.fetch("/health").await.unwrap();
    assert_eq!(recovered.status, 200);
    assert!(recovered.is_miss());
    assert_eq!(recovered.body, "{\"ok\":true}");
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_failure_leaves_fresh_entry_in_place() {
    // /report succeeds once, everything after fails.
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let upstream = common::start_programmable_upstream(move |_| {
        let cc = cc.clone();
        async move {
            if cc.fetch_add(1, Ordering::SeqCst) == 0 {
                MockReply::ok("text/markdown", "# Weekly report")
            } else {
                None
            }
        }
    })
    .await;
    let gateway = common::start_gateway(common::gateway_config(&upstream.base_url())).await;
    let client = gateway.client();

    assert!(client.fetch("/report").await.unwrap().is_miss());

    // A different route fails upstream.
    let failed = client.fetch("/manifest").await.unwrap();
    assert_eq!(failed.status, 502);

    // The earlier entry is untouched.
    let cached = client.fetch("/report").await.unwrap();
    assert_eq!(cached.status, 200);
    assert!(cached.is_hit());
    assert_eq!(cached.body, "# Weekly report");
}

#[tokio::test]
async fn test_upstream_error_status_passes_through_and_is_cached() {
    let upstream = common::start_programmable_upstream(|_| async move {
        Some(MockReply {
            status: 500,
            content_type: Some("application/json"),
            body: "{\"detail\":\"boom\"}".into(),
        })
    })
    .await;
    let gateway = common::start_gateway(common::gateway_config(&upstream.base_url())).await;
    let client = gateway.client();

    let first = client.fetch("/api/must-reads").await.unwrap();
    assert_eq!(first.status, 500);
    assert!(first.is_miss());
    assert_eq!(first.body, "{\"detail\":\"boom\"}");

    let second = client.fetch("/api/must-reads").await.unwrap();
    assert_eq!(second.status, 500);
    assert!(second.is_hit());
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_upstream_not_found_passes_through() {
    let upstream = common::start_programmable_upstream(|_| async move {
        Some(MockReply {
            status: 404,
            content_type: Some("text/plain"),
            body: "no report yet".into(),
        })
    })
    .await;
    let gateway = common::start_gateway(common::gateway_config(&upstream.base_url())).await;

    let response = gateway.client().fetch("/report").await.unwrap();
    assert_eq!(response.status, 404);
    assert!(response.is_miss());
    assert_eq!(response.content_type.as_deref(), Some("text/plain"));
    assert_eq!(response.body, "no report yet");
}
