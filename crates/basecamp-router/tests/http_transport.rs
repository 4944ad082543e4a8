//! HTTP transport tests against a stubbed chat-completion endpoint
//!
//! Covers:
//! - Request body shape and identity headers
//! - Cost computed from reported usage
//! - Missing usage metadata
//! - Non-2xx, unparseable bodies, timeouts and refused connections

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use basecamp_router::models::{GEMINI_FLASH, GPT_4O_MINI};
use basecamp_router::{
    Complexity, Priority, Provider, RouterError, RouterSettings, TaskContext, TaskRouter,
    TaskType, TransportError,
};

fn settings_for(server: &MockServer) -> RouterSettings {
    RouterSettings::default()
        .with_api_key("test-key")
        .with_base_url(server.uri())
        .with_request_timeout(Duration::from_secs(5))
}

fn completion_body(content: &str, prompt_tokens: u32, completion_tokens: u32) -> serde_json::Value {
    json!({
        "id": "gen-123",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

fn email_speed() -> TaskContext {
    TaskContext::new(TaskType::EmailCopy, Priority::Speed, Complexity::Simple)
}

#[tokio::test]
async fn test_request_carries_fixed_shape_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("HTTP-Referer", "https://basecamp.travel"))
        .and(header("X-Title", "Basecamp Adventures"))
        .and(body_partial_json(json!({
            "model": GEMINI_FLASH,
            "messages": [
                {"role": "system", "content": "You write punchy subject lines."},
                {"role": "user", "content": "Subject line for the Annapurna circuit"}
            ],
            "max_tokens": 2000,
            "temperature": 0.7,
            "top_p": 0.9
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "Your Himalayan adventure awaits",
            40,
            8,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let router = TaskRouter::new(settings_for(&server)).unwrap();
    let result = router
        .execute_task(
            "Subject line for the Annapurna circuit",
            &email_speed(),
            Some("You write punchy subject lines."),
        )
        .await
        .unwrap();

    assert_eq!(result.content, "Your Himalayan adventure awaits");
    assert_eq!(result.model_id, GEMINI_FLASH);
    assert_eq!(result.provider, Provider::Google);
    assert_eq!(result.total_tokens, 48);
}

#[tokio::test]
async fn test_cost_and_metrics_from_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok", 100, 50)))
        .mount(&server)
        .await;

    let router = TaskRouter::new(settings_for(&server)).unwrap();
    let ctx = TaskContext::new(TaskType::Chat, Priority::Balanced, Complexity::Simple);

    let mut costs = Vec::new();
    for _ in 0..3 {
        costs.push(router.execute_task("hello", &ctx, None).await.unwrap().cost);
    }

    // gpt-4o-mini: 0.00015 in / 0.0006 out per 1K
    let expected_each = 100.0 / 1000.0 * 0.00015 + 50.0 / 1000.0 * 0.0006;
    for cost in &costs {
        assert!((cost - expected_each).abs() < 1e-12);
    }

    let breakdown = router.cost_breakdown();
    let sum: f64 = costs.iter().sum();
    assert!((breakdown[&Provider::OpenAi] - sum).abs() < 1e-12);
    assert_eq!(breakdown.len(), 1);

    let summary = router.performance_summary();
    assert_eq!(summary[GPT_4O_MINI].requests, 3);
}

#[tokio::test]
async fn test_missing_usage_does_not_fail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{\"tier\": \"gold\"}"}}]
        })))
        .mount(&server)
        .await;

    let router = TaskRouter::new(settings_for(&server)).unwrap();
    let result = router.execute_task("tier?", &email_speed(), None).await.unwrap();

    assert_eq!(result.content, "{\"tier\": \"gold\"}");
    assert_eq!(result.input_tokens, 0);
    assert_eq!(result.output_tokens, 0);
    assert_eq!(result.cost, 0.0);
    assert_eq!(router.observability().request_count(), 1);
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(
            json!({"error": {"message": "Rate limit reached"}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let router = TaskRouter::new(settings_for(&server)).unwrap();
    let err = router
        .execute_task("hi", &email_speed(), None)
        .await
        .unwrap_err();

    match err {
        RouterError::Transport {
            model_id,
            provider,
            source: TransportError::RequestFailed { status, body },
        } => {
            assert_eq!(model_id, GEMINI_FLASH);
            assert_eq!(provider, Provider::Google);
            assert_eq!(status, 429);
            assert!(body.contains("Rate limit"));
        }
        other => panic!("Expected RequestFailed transport error, got: {other:?}"),
    }

    // No retry happened and nothing was recorded
    assert!(router.cost_breakdown().is_empty());
    assert_eq!(router.observability().request_count(), 0);
}

#[tokio::test]
async fn test_missing_content_is_response_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [],
            "usage": {"prompt_tokens": 10, "completion_tokens": 0}
        })))
        .mount(&server)
        .await;

    let router = TaskRouter::new(settings_for(&server)).unwrap();
    let err = router
        .execute_task("hi", &email_speed(), None)
        .await
        .unwrap_err();

    assert!(
        matches!(err, RouterError::ResponseParse { ref model_id, .. } if model_id == GEMINI_FLASH),
        "got {err:?}"
    );
    assert_eq!(router.observability().request_count(), 0);
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("late", 1, 1))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let settings = settings_for(&server).with_request_timeout(Duration::from_millis(200));
    let router = TaskRouter::new(settings).unwrap();
    let err = router
        .execute_task("hi", &email_speed(), None)
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            RouterError::Transport {
                source: TransportError::Timeout(_),
                ..
            }
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let settings = RouterSettings::default()
        .with_api_key("test-key")
        .with_base_url("http://127.0.0.1:1")
        .with_request_timeout(Duration::from_secs(2));
    let router = TaskRouter::new(settings).unwrap();

    let err = router
        .execute_task("hi", &email_speed(), None)
        .await
        .unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}
