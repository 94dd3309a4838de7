//! HTTP API integration tests
//!
//! The router is exercised in-process with `tower::ServiceExt::oneshot`;
//! no listener is bound.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ara_trigger_engine::config::{ApiConfig, ProviderConfig, ProviderKind, Settings};
use ara_trigger_engine::server::{create_app, AppState, API_KEY_HEADER};
use ara_trigger_engine::template::{Activation, ChannelType, Message, Template};

fn provider(id: &str, channel: ChannelType) -> ProviderConfig {
    ProviderConfig {
        id: id.to_string(),
        channel,
        kind: ProviderKind::Log,
        url: None,
        timeout_seconds: 10,
        from: None,
    }
}

fn welcome_template() -> Template {
    Template::new(
        "welcome",
        vec![
            Message::new(ChannelType::Email, "<p>Hello {{name}}</p>").with_subject("Welcome"),
            Message::new(ChannelType::Sms, "Hi {{name}}").with_activation(Activation::Present {
                field: "$phone".to_string(),
            }),
        ],
    )
}

fn test_settings() -> Settings {
    Settings {
        templates: vec![welcome_template()],
        providers: vec![
            provider("mail-log", ChannelType::Email),
            provider("sms-log", ChannelType::Sms),
        ],
        ..Default::default()
    }
}

fn app(settings: Settings) -> Router {
    create_app(AppState::new(settings).unwrap())
}

fn trigger_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/trigger")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(test_settings())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_trigger_success() {
    let response = app(test_settings())
        .oneshot(trigger_request(json!({
            "event_id": "welcome",
            "payload": { "$email": "ada@example.com", "$phone": "+15550100", "name": "Ada" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["trigger_event"], "welcome");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_trigger_updates_stats() {
    let state = AppState::new(test_settings()).unwrap();
    let router = create_app(state.clone());

    let response = router
        .clone()
        .oneshot(trigger_request(json!({
            "event_id": "welcome",
            "payload": { "$email": "ada@example.com" }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["triggers"]["triggers_total"], 1);
    assert_eq!(body["triggers"]["messages_dispatched"], 1);
    assert_eq!(body["templates"]["total"], 1);
    assert_eq!(body["providers"]["channels"], json!(["email", "sms"]));
}

#[tokio::test]
async fn test_unknown_template_returns_404() {
    let response = app(test_settings())
        .oneshot(trigger_request(json!({ "event_id": "signup" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "TEMPLATE_NOT_FOUND");
    assert_eq!(
        body["error"]["message"],
        "Template on event: signup was not found in the template store"
    );
}

#[tokio::test]
async fn test_missing_provider_returns_422() {
    let settings = Settings {
        providers: vec![provider("mail-log", ChannelType::Email)],
        ..test_settings()
    };

    let response = app(settings)
        .oneshot(trigger_request(json!({
            "event_id": "welcome",
            "payload": { "$email": "ada@example.com", "$phone": "+15550100" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "PROVIDER_NOT_FOUND");
}

#[tokio::test]
async fn test_empty_event_id_returns_400() {
    let response = app(test_settings())
        .oneshot(trigger_request(json!({ "event_id": "  " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let settings = Settings {
        api: ApiConfig {
            key: Some("secret".to_string()),
        },
        ..test_settings()
    };
    let router = app(settings);
    let body = json!({
        "event_id": "welcome",
        "payload": { "$email": "ada@example.com" }
    });

    let response = router
        .clone()
        .oneshot(trigger_request(body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = trigger_request(body.clone());
    request
        .headers_mut()
        .insert(API_KEY_HEADER, "wrong".parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = trigger_request(body);
    request
        .headers_mut()
        .insert(API_KEY_HEADER, "secret".parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Health stays open
    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_provider_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .and(body_partial_json(json!({
            "provider": "mailer",
            "channel": "email",
            "to": "ada@example.com",
            "subject": "Welcome",
            "html": "<p>Hello Ada</p>"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let settings = Settings {
        providers: vec![ProviderConfig {
            kind: ProviderKind::Webhook,
            url: Some(format!("{}/email", mock_server.uri())),
            ..provider("mailer", ChannelType::Email)
        }],
        ..test_settings()
    };

    let response = app(settings)
        .oneshot(trigger_request(json!({
            "event_id": "welcome",
            "payload": { "$email": "ada@example.com", "name": "Ada" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_rejection_returns_502() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(500).set_body_string("relay down"))
        .mount(&mock_server)
        .await;

    let settings = Settings {
        providers: vec![ProviderConfig {
            kind: ProviderKind::Webhook,
            url: Some(format!("{}/email", mock_server.uri())),
            ..provider("mailer", ChannelType::Email)
        }],
        ..test_settings()
    };

    let response = app(settings)
        .oneshot(trigger_request(json!({
            "event_id": "welcome",
            "payload": { "$email": "ada@example.com" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "SEND_FAILED");
    assert_eq!(
        body["error"]["message"],
        "Send failed on email channel: Provider rejected message with status 500: relay down"
    );
}

#[tokio::test]
async fn test_prometheus_metrics() {
    let router = app(test_settings());

    let response = router
        .clone()
        .oneshot(trigger_request(json!({
            "event_id": "welcome",
            "payload": { "$email": "ada@example.com" }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("ara_trigger_triggers_total"));
    assert!(text.contains("ara_trigger_templates_registered"));
}
