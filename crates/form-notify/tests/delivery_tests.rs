//! Integration tests for webhook delivery.
//!
//! These tests render real events and deliver them to an in-process mock of
//! the event-ingest service.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use form_notify::{
    DeliveryError, EventPayload, EventRecord, FormNode, IntegrationType, NotificationInput,
    Notifier, NotifyConfig, NotifyError, RatingElement, RatingInfo, Registry,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

// =============================================================================
// Mock Event Service
// =============================================================================

/// A request captured by the mock service.
#[derive(Debug, Clone)]
struct Captured {
    project: String,
    authorization: Option<String>,
    content_type: Option<String>,
    title: Option<String>,
    body: Value,
}

/// Shared state for the mock service.
struct MockState {
    /// Status code to answer with.
    status: StatusCode,
    /// Requests received so far.
    requests: RwLock<Vec<Captured>>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

async fn mock_events(
    State(state): State<Arc<MockState>>,
    Path(project): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.requests.write().await.push(Captured {
        project,
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        title: header(&headers, "x-title"),
        body,
    });

    let mut response_headers = HeaderMap::new();
    if state.status == StatusCode::TOO_MANY_REQUESTS {
        response_headers.insert("retry-after", "30".parse().unwrap());
    }
    (state.status, response_headers, "ack")
}

/// Start a mock event service on a random port.
async fn start_mock_service(status: StatusCode) -> (SocketAddr, Arc<MockState>) {
    let state = Arc::new(MockState {
        status,
        requests: RwLock::new(Vec::new()),
    });

    let app = Router::new()
        .route("/api/v1/projects/{project}/events", post(mock_events))
        .with_state(Arc::clone(&state));

    // Bind to random port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Start server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Wait for server to be ready
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, state)
}

fn notifier_for(addr: SocketAddr) -> Notifier {
    let config =
        NotifyConfig::new(format!("http://{addr}"), "test-key").with_default_project("forms");
    Notifier::from_config(Arc::new(Registry::builtin()), &config)
}

fn survey() -> EventPayload {
    EventPayload::from(EventRecord {
        title: "Survey".to_string(),
        link_text: "view".to_string(),
        link_url: "http://x".to_string(),
        form_translation: "Answers".to_string(),
        contact: None,
        nodes: vec![FormNode::Rating {
            label: "Satisfaction".to_string(),
            rating: RatingInfo {
                label: "Satisfaction".to_string(),
                elements: vec![RatingElement {
                    label: "Speed".to_string(),
                    value: 8,
                }],
            },
        }],
    })
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_slack_delivery() {
    let (addr, state) = start_mock_service(StatusCode::OK).await;
    let notifier = notifier_for(addr);
    assert!(notifier.enabled());

    let input = NotificationInput::form_finished(survey(), "endpoint-7");
    notifier
        .send_webhook(&input, IntegrationType::Slack)
        .await
        .unwrap();

    let requests = state.requests.read().await;
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(request.project, "forms");
    assert_eq!(request.authorization.as_deref(), Some("Bearer test-key"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(request.body["event_type"], "form.finished");
    assert_eq!(request.body["endpoint_id"], "endpoint-7");
    assert_eq!(request.body["data"]["blocks"][0]["type"], "section");
}

#[tokio::test]
async fn test_ntfy_headers_are_forwarded() {
    let (addr, state) = start_mock_service(StatusCode::OK).await;
    let notifier = notifier_for(addr);

    let input = NotificationInput::form_finished(survey(), "endpoint-7").with_project("alerts");
    notifier
        .send_webhook(&input, IntegrationType::Ntfy)
        .await
        .unwrap();

    let requests = state.requests.read().await;
    let request = &requests[0];
    assert_eq!(request.project, "alerts");
    assert_eq!(request.title.as_deref(), Some("Survey"));
    assert!(request.body["data"]
        .as_str()
        .unwrap()
        .contains("| Speed | 8/10 ★ |"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (addr, _state) = start_mock_service(StatusCode::BAD_REQUEST).await;
    let notifier = notifier_for(addr);

    let input = NotificationInput::form_finished(survey(), "endpoint-7");
    let err = notifier
        .send_webhook(&input, IntegrationType::Mattermost)
        .await
        .unwrap_err();

    match err {
        NotifyError::Delivery(DeliveryError::Status { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "ack");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let (addr, _state) = start_mock_service(StatusCode::TOO_MANY_REQUESTS).await;
    let notifier = notifier_for(addr);

    let input = NotificationInput::form_finished(survey(), "endpoint-7");
    let err = notifier
        .send_webhook(&input, IntegrationType::Generic)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NotifyError::Delivery(DeliveryError::RateLimited {
            retry_after_secs: 30
        })
    ));
}

#[tokio::test]
async fn test_render_failure_sends_nothing() {
    let (addr, state) = start_mock_service(StatusCode::OK).await;
    let notifier = notifier_for(addr);

    let mut input = NotificationInput::form_finished(survey(), "endpoint-7");
    input.event_kind = "form.deleted".to_string();
    let err = notifier
        .send_webhook(&input, IntegrationType::Slack)
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Render(_)));
    assert!(state.requests.read().await.is_empty());
}

#[tokio::test]
async fn test_fire_and_forget_delivery() {
    let (addr, state) = start_mock_service(StatusCode::OK).await;
    let notifier = Arc::new(notifier_for(addr));

    notifier.notify(
        NotificationInput::form_finished(survey(), "endpoint-7"),
        IntegrationType::Mattermost,
    );

    // Wait for the spawned delivery
    for _ in 0..50 {
        if !state.requests.read().await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let requests = state.requests.read().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body["data"]["attachments"][0]["color"], "#1B5495");
}
