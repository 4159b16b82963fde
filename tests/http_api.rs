//! HTTP API Tests
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront::assistant::{AssistantError, AssistantResult, CompletionProvider};
use storefront::auth::{AuthError, AuthResult, TokenVerifier};
use storefront::catalog::Catalog;
use storefront::http_server::{build_router, AppState, HttpServerConfig};

// =============================================================================
// Fakes
// =============================================================================

/// Replies with a fixed text and records the prompts it saw
struct Scripted {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

impl CompletionProvider for Scripted {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = AssistantResult<String>> + Send + 'a>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Box::pin(async move { Ok(self.reply.clone()) })
    }
}

struct Failing;

impl CompletionProvider for Failing {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = AssistantResult<String>> + Send + 'a>> {
        Box::pin(async {
            Err(AssistantError::Upstream {
                status: 503,
                message: "model overloaded".to_string(),
            })
        })
    }
}

/// Accepts exactly one token and counts every call
struct OneToken {
    calls: AtomicUsize,
}

impl TokenVerifier for OneToken {
    fn verify<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = AuthResult<String>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = if token == "good-token" {
            Ok("user-42".to_string())
        } else {
            Err(AuthError::MalformedToken)
        };
        Box::pin(async move { result })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

const CATALOG_JSON: &str = r#"[
    {"id": 1, "name": "Red Runner", "category": "shoes", "price": 50, "rating": 4.5,
     "sizes": ["M"], "colors": ["red"], "image": "runner.png"},
    {"id": 2, "name": "Blue Hat", "category": "hats", "price": 15, "rating": 3.0,
     "sizes": ["L"], "colors": ["blue"]},
    {"id": 3, "name": "Mystery Box"}
]"#;

fn catalog() -> Catalog {
    Catalog::from_json_str(CATALOG_JSON).unwrap()
}

fn router_with(assistant: Arc<dyn CompletionProvider>) -> Router {
    let state = AppState::new(catalog(), assistant);
    build_router(&HttpServerConfig::default(), Arc::new(state))
}

fn router() -> Router {
    router_with(Scripted::new("unused"))
}

async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn post_chat(router: Router, body: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/api/chat_with_gemini")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = router
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn product_ids(uri: &str) -> Vec<i64> {
    let (status, body) = get(router(), uri).await;
    assert_eq!(status, StatusCode::OK);

    let value: Value = serde_json::from_slice(&body).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

// =============================================================================
// Liveness
// =============================================================================

#[tokio::test]
async fn test_root_banner() {
    let (status, body) = get(router(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Storefront backend is running!");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(router(), "/health").await;
    let value: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "ok");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_products_without_filters_returns_catalog() {
    assert_eq!(product_ids("/api/products").await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_products_keep_extra_fields() {
    let (_, body) = get(router(), "/api/products?q=runner").await;
    let value: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(value[0]["image"], "runner.png");
    assert_eq!(value[0]["price"], json!(50.0));
}

#[tokio::test]
async fn test_products_category_and_rating() {
    assert_eq!(
        product_ids("/api/products?category=Shoes&min_rating=4").await,
        vec![1]
    );
}

#[tokio::test]
async fn test_products_repeated_sizes() {
    assert_eq!(product_ids("/api/products?sizes=S&sizes=L").await, vec![2]);
    assert_eq!(product_ids("/api/products?sizes=M&sizes=L").await, vec![1, 2]);
}

#[tokio::test]
async fn test_products_colors_or() {
    assert_eq!(
        product_ids("/api/products?colors=red&colors=green").await,
        vec![1]
    );
}

#[tokio::test]
async fn test_products_unparsable_number_is_ignored() {
    assert_eq!(
        product_ids("/api/products?min_price=abc").await,
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_products_missing_price_asymmetry() {
    assert_eq!(product_ids("/api/products?max_price=20").await, vec![2, 3]);
    assert_eq!(product_ids("/api/products?min_price=10").await, vec![1, 2]);
}

#[tokio::test]
async fn test_products_empty_values_are_absent() {
    assert_eq!(
        product_ids("/api/products?q=&category=&sizes=").await,
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_products_no_match_is_empty_array() {
    let (status, body) = get(router(), "/api/products?q=zebra").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
}

#[tokio::test]
async fn test_products_on_empty_catalog() {
    let state = AppState::new(Catalog::empty(), Scripted::new("unused"));
    let router = build_router(&HttpServerConfig::default(), Arc::new(state));

    let (status, body) = get(router, "/api/products?q=anything").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_forwards_message() {
    let assistant = Scripted::new("We have boots in sizes 7 to 12.");
    let router = router_with(assistant.clone());

    let (status, body) = post_chat(router, r#"{"message": "Do you sell boots?"}"#, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "We have boots in sizes 7 to 12."}));
    assert_eq!(
        *assistant.prompts.lock().unwrap(),
        vec!["Do you sell boots?".to_string()]
    );
}

#[tokio::test]
async fn test_chat_missing_message() {
    let assistant = Scripted::new("unused");

    for body in [r#"{}"#, r#"{"message": ""}"#, r#"{"message": 7}"#, "not json"] {
        let (status, value) = post_chat(router_with(assistant.clone()), body, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(value, json!({"error": "No message provided"}));
    }

    assert!(assistant.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_upstream_failure() {
    let (status, body) = post_chat(router_with(Arc::new(Failing)), r#"{"message": "hi"}"#, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to get response from AI: "));
}

#[tokio::test]
async fn test_chat_token_is_observed_not_enforced() {
    let verifier = Arc::new(OneToken {
        calls: AtomicUsize::new(0),
    });
    let state = AppState::new(catalog(), Scripted::new("hello"))
        .with_verifier(verifier.clone());
    let router = build_router(&HttpServerConfig::default(), Arc::new(state));

    let (status, _) = post_chat(router.clone(), r#"{"message": "hi"}"#, Some("good-token")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_chat(router.clone(), r#"{"message": "hi"}"#, Some("forged")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "hello");

    let (status, _) = post_chat(router, r#"{"message": "hi"}"#, None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(verifier.calls.load(Ordering::SeqCst), 2);
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/api/products")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
