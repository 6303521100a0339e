use super::*;
use crate::error::LlmError;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Mutex;
use tower::ServiceExt;

/// Replays fixed fragments and records every prompt it receives.
struct CannedGenerator {
    fragments: Vec<Result<String, String>>,
    prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    fn new(fragments: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            fragments: fragments.iter().map(|f| Ok(f.to_string())).collect(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fragments: vec![Ok("partial".to_string()), Err(message.to_string())],
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for CannedGenerator {
    fn stream_text(&self, prompt: String) -> BoxStream<'static, Result<String, LlmError>> {
        self.prompts.lock().unwrap().push(prompt);
        let items: Vec<Result<String, LlmError>> = self
            .fragments
            .iter()
            .cloned()
            .map(|fragment| fragment.map_err(LlmError::Api))
            .collect();
        stream::iter(items).boxed()
    }
}

fn app(generator: Arc<CannedGenerator>) -> Router {
    app_with(generator, AuthPolicy::open(), ThreadShape::Keyed)
}

fn app_with(generator: Arc<CannedGenerator>, auth: AuthPolicy, thread_shape: ThreadShape) -> Router {
    let state = AppState {
        generator,
        auth,
        thread_shape,
    };
    router(state, 1024)
}

fn post_json(body: Value) -> Request<Body> {
    post_raw(body.to_string())
}

fn post_raw(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(SUMMARIZE_PATH)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

#[tokio::test]
async fn test_abstract_defaults_and_strips_label() {
    let generator = CannedGenerator::new(&["**Summary:** Revenue ", "grew 10%."]);
    let (status, body) = send(
        app(generator.clone()),
        post_json(json!({ "content": "Quarterly report text" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summaries": { "abstract": "Revenue grew 10%." } }));

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\"\"\"Quarterly report text\"\"\""));
}

#[tokio::test]
async fn test_linkedin_post_keeps_paragraphs() {
    let generator = CannedGenerator::new(&["Headline\n\nBody text.\n\n#AI"]);
    let (status, body) = send(
        app(generator),
        post_json(json!({ "content": "text", "format": "linkedin_post" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "summaries": { "linkedin_post": "Headline\n\nBody text.\n\n#AI" } })
    );
}

#[tokio::test]
async fn test_thread_from_fenced_json_across_fragments() {
    let generator = CannedGenerator::new(&[
        "```json\n{\"twitter_thread\": [\"1/2 Rev",
        "enue up 📈\", \"2/2 Costs down\"]}\n```",
    ]);
    let (status, body) = send(
        app(generator.clone()),
        post_json(json!({ "content": "text", "format": "twitter_thread" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "summaries": { "twitter_thread": ["1/2 Revenue up 📈", "2/2 Costs down"] } })
    );
    assert!(generator.prompts()[0].contains("Twitter thread"));
}

#[tokio::test]
async fn test_legacy_thread_shape() {
    let generator = CannedGenerator::new(&["1/2 Hello world 🎉\n2/2 Goodbye 🙌"]);
    let (status, body) = send(
        app_with(generator, AuthPolicy::open(), ThreadShape::Legacy),
        post_json(json!({ "content": "text", "format": "twitter_thread" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "summaries": ["1/2 Hello world 🎉", "2/2 Goodbye 🙌"] })
    );
}

#[tokio::test]
async fn test_unknown_format_lists_allowed_formats() {
    let generator = CannedGenerator::new(&["unused"]);
    let (status, body) = send(
        app(generator.clone()),
        post_json(json!({ "content": "text", "format": "haiku" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["allowed_formats"],
        json!(["abstract", "linkedin_post", "twitter_thread"])
    );
    assert_eq!(
        body["error"],
        "content and format (abstract, linkedin_post, twitter_thread) are required"
    );
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn test_missing_or_blank_content_is_rejected() {
    for payload in [
        json!({ "format": "abstract" }),
        json!({ "content": "   ", "format": "abstract" }),
        json!({ "content": 42 }),
    ] {
        let (status, body) = send(app(CannedGenerator::new(&["unused"])), post_json(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["allowed_formats"].is_array());
    }
}

#[tokio::test]
async fn test_unparseable_body_is_rejected() {
    let (status, body) = send(
        app(CannedGenerator::new(&["unused"])),
        post_raw("{not json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let content = "x".repeat(4096);
    let (status, body) = send(
        app(CannedGenerator::new(&["unused"])),
        post_json(json!({ "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": "Payload too large" }));
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() {
    let request = Request::builder()
        .method("GET")
        .uri(SUMMARIZE_PATH)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(CannedGenerator::new(&["unused"])), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "error": "Method not allowed" }));
}

#[tokio::test]
async fn test_upstream_failure_is_generic() {
    let (status, body) = send(
        app(CannedGenerator::failing("quota exceeded")),
        post_json(json!({ "content": "text" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Something went wrong" }));
}

#[tokio::test]
async fn test_unusable_thread_reports_raw_output() {
    let (status, body) = send(
        app(CannedGenerator::new(&["```json\n", "```"])),
        post_json(json!({ "content": "text", "format": "twitter_thread" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Invalid thread output from model", "raw": "" })
    );
}

#[tokio::test]
async fn test_strict_auth_blocks_before_generation() {
    let generator = CannedGenerator::new(&["unused"]);
    let auth = AuthPolicy::new(AuthMode::Strict, Some("client-key".to_string()), None);
    let (status, body) = send(
        app_with(generator.clone(), auth.clone(), ThreadShape::Keyed),
        post_json(json!({ "content": "text" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Unauthorized" }));
    assert!(generator.prompts().is_empty());

    let mut request = post_json(json!({ "content": "text" }));
    request
        .headers_mut()
        .insert("x-api-key", "client-key".parse().unwrap());
    let (status, _) = send(app_with(generator.clone(), auth, ThreadShape::Keyed), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(generator.prompts().len(), 1);
}

#[tokio::test]
async fn test_status_check() {
    let request = Request::builder()
        .method("GET")
        .uri(STATUS_PATH)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(CannedGenerator::new(&[])), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}
