use super::*;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::AppendHeaders;
use axum::routing::{get, post};
use serde_json::{Value, json};

use crate::types::{FeedbackKind, LastGeneration};

// =========================================================================
// Fake backend
// =========================================================================

async fn serve(app: Router) -> HttpBackend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let config = ConsoleConfig { base_url: format!("http://{addr}/"), ..ConsoleConfig::default() };
    HttpBackend::new(&config).unwrap()
}

fn goal(text: &str) -> GenerationRequest {
    GenerationRequest::from_input(text).unwrap()
}

// =========================================================================
// generate
// =========================================================================

#[tokio::test]
async fn generate_posts_goal_and_decodes_success() {
    let app = Router::new().route(
        GENERATE_PATH,
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "success": true,
                "attribute_name": format!("Audience: {}", body["attribute_goal"].as_str().unwrap_or("")),
                "filter_clause": "country = 'DE'",
                "columns_used": ["country"],
                "matching_users": 17
            }))
        }),
    );
    let backend = serve(app).await;

    let result = backend.generate(&goal("  german users ")).await.unwrap();
    assert!(result.success);
    assert_eq!(result.attribute_name.as_deref(), Some("Audience: german users"));
    assert_eq!(result.columns(), ["country"]);
}

#[tokio::test]
async fn generate_decodes_declared_failure_on_error_status() {
    let app = Router::new().route(
        GENERATE_PATH,
        post(|| async {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false, "error": "schema missing" })))
        }),
    );
    let backend = serve(app).await;

    let result = backend.generate(&goal("anything")).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("schema missing"));
}

#[tokio::test]
async fn generate_non_json_error_status_is_api_response() {
    let app = Router::new().route(GENERATE_PATH, post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }));
    let backend = serve(app).await;

    let err = backend.generate(&goal("anything")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::ApiResponse { status: 502, ref body } if body == "upstream down"));
}

#[tokio::test]
async fn generate_non_json_success_is_parse_error() {
    let app = Router::new().route(GENERATE_PATH, post(|| async { "<html>login</html>" }));
    let backend = serve(app).await;

    let err = backend.generate(&goal("anything")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Parse(_)));
}

#[tokio::test]
async fn generate_connection_refused_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = ConsoleConfig { base_url: format!("http://{addr}"), ..ConsoleConfig::default() };
    let backend = HttpBackend::new(&config).unwrap();

    let err = backend.generate(&goal("anything")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Request(_)));
}

// =========================================================================
// submit_feedback
// =========================================================================

#[tokio::test]
async fn feedback_sends_csrf_header_and_body() {
    let seen: Arc<Mutex<Option<(Option<String>, Value)>>> = Arc::new(Mutex::new(None));
    let captured = seen.clone();
    let app = Router::new().route(
        FEEDBACK_PATH,
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                let token = headers
                    .get(CSRF_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                *captured.lock().unwrap() = Some((token, body));
                Json(json!({ "success": true, "message": "Feedback recorded successfully" }))
            }
        }),
    );
    let backend = serve(app).await;
    let last = LastGeneration {
        attribute_goal: "g".into(),
        filter_clause: "a = 1".into(),
        columns_used: vec!["a".into()],
    };
    let event = FeedbackEvent::new(FeedbackKind::Positive, "nice".into(), &last);

    let receipt = backend.submit_feedback(&event, Some("tok-1")).await.unwrap();
    assert_eq!(receipt.message.as_deref(), Some("Feedback recorded successfully"));

    let (token, body) = seen.lock().unwrap().take().unwrap();
    assert_eq!(token.as_deref(), Some("tok-1"));
    assert_eq!(body["feedback"], "thumbs_up");
    assert_eq!(body["feedback_text"], "nice");
    assert_eq!(body["columns_used"], json!(["a"]));
}

#[tokio::test]
async fn feedback_without_token_omits_header() {
    let seen = Arc::new(Mutex::new(true));
    let captured = seen.clone();
    let app = Router::new().route(
        FEEDBACK_PATH,
        post(move |headers: HeaderMap| {
            let captured = captured.clone();
            async move {
                *captured.lock().unwrap() = headers.contains_key(CSRF_HEADER);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": "Missing required fields" })))
            }
        }),
    );
    let backend = serve(app).await;
    let event = FeedbackEvent::new(FeedbackKind::Negative, String::new(), &LastGeneration::default());

    let receipt = backend.submit_feedback(&event, None).await.unwrap();
    assert_eq!(receipt.error.as_deref(), Some("Missing required fields"));
    assert!(!*seen.lock().unwrap());
}

// =========================================================================
// fetch_csrf_cookie
// =========================================================================

#[tokio::test]
async fn fetch_csrf_cookie_reads_set_cookie() {
    let app = Router::new().route(
        INDEX_PATH,
        get(|| async {
            (
                AppendHeaders([
                    (header::SET_COOKIE, "sessionid=s1; Path=/"),
                    (header::SET_COOKIE, "csrftoken=primed123; Path=/; SameSite=Lax"),
                ]),
                "<html></html>",
            )
        }),
    );
    let backend = serve(app).await;

    let token = backend.fetch_csrf_cookie().await.unwrap();
    assert_eq!(token.as_deref(), Some("primed123"));
}

#[tokio::test]
async fn fetch_csrf_cookie_absent_is_none() {
    let app = Router::new().route(INDEX_PATH, get(|| async { "<html></html>" }));
    let backend = serve(app).await;

    assert!(backend.fetch_csrf_cookie().await.unwrap().is_none());
}
