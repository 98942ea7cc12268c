use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wink_core::{Repository, Sequencer};
use wink_gateway::model::CreateUrlResponse;
use wink_gateway::{App, AppState};
use wink_redirector::{CachedRepository, MokaUrlCache, RedirectorService};
use wink_sequencer::{AtomicSequencer, BlockSequencer, BlockSequencerSettings, InMemorySequenceStore};
use wink_shortener::ShortenerService;
use wink_storage::{InMemoryRepository, SqliteRepository};

fn router_with<R: Repository, S: Sequencer>(repository: R, sequencer: S) -> Router {
    let repository = Arc::new(CachedRepository::new(repository, MokaUrlCache::new()));
    let shortener = ShortenerService::new(Arc::clone(&repository), Arc::new(sequencer));
    let redirector = RedirectorService::new(repository);
    App::router(AppState::new(Arc::new(shortener), Arc::new(redirector)))
}

/// A router whose first id is 2301, which encodes to `b7`.
fn router() -> Router {
    router_with(InMemoryRepository::new(), AtomicSequencer::with_offset(2301))
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

fn create_request(body: Value) -> Request<Body> {
    Request::post("/wink")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, url: &str) -> String {
    let response = send(app, create_request(json!({ "url": url }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: CreateUrlResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    created.id
}

#[tokio::test]
async fn create_then_resolve() {
    let app = router();

    let response = send(
        &app,
        create_request(json!({ "url": "https://example.com/a/b?c=1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({ "id": "b7" }));

    let response = send(&app, get("/wink/b7")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(body_text(response).await, "https://example.com/a/b?c=1");

    let response = send(&app, get("/wink?id=b7")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "https://example.com/a/b?c=1");
}

#[tokio::test]
async fn create_is_idempotent() {
    let app = router();

    let first = create(&app, "https://example.com").await;
    let second = create(&app, "  https://example.com  ").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn create_with_ttl_gets_a_fresh_code() {
    let app = router();

    let permanent = create(&app, "https://example.com").await;
    let response = send(
        &app,
        create_request(json!({ "url": "https://example.com", "ttl_secs": 3600 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let temporary: CreateUrlResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();

    assert_ne!(permanent, temporary.id);
    let response = send(&app, get(&format!("/wink/{}", temporary.id))).await;
    assert_eq!(body_text(response).await, "https://example.com/");
}

#[tokio::test]
async fn create_rejects_invalid_url() {
    let app = router();

    let response = send(&app, create_request(json!({ "url": "not a url" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body["error"].is_string());

    let response = send(&app, create_request(json!({ "url": "ftp://example.com" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_missing_url() {
    let app = router();

    let response = send(&app, create_request(json!({}))).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn resolve_unknown_code_is_empty_not_found() {
    let app = router();

    let response = send(&app, get("/wink/zz9")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn resolve_malformed_code_is_empty_bad_request() {
    let app = router();

    for uri in ["/wink/%21%21%21not-an-alphabet-code%21%21%21", "/wink/007", "/wink?id=a-b"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert!(body_bytes(response).await.is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn redirect_sends_temporary_redirect() {
    let app = router();
    let code = create(&app, "https://example.com/a/b?c=1").await;

    let response = send(&app, get(&format!("/{code}"))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/a/b?c=1"
    );

    let response = send(&app, get("/zz9")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_makes_code_gone() {
    let app = router();
    let code = create(&app, "https://example.com").await;

    // Warm the cache so the delete has something to evict.
    let response = send(&app, get(&format!("/wink/{code}"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let delete = |code: &str| {
        Request::delete(format!("/wink/{code}"))
            .body(Body::empty())
            .unwrap()
    };

    let response = send(&app, delete(&code)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, get(&format!("/wink/{code}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, delete(&code)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, delete("0x")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Recreating the URL never brings the old code back.
    let recreated = create(&app, "https://example.com").await;
    assert_ne!(recreated, code);
}

#[tokio::test]
async fn exhausted_sequencer_is_unavailable_but_resolve_works() {
    let repository = Arc::new(InMemoryRepository::new());
    let working = router_with(Arc::clone(&repository), AtomicSequencer::with_offset(2301));
    assert_eq!(create(&working, "https://example.com").await, "b7");

    let store = InMemorySequenceStore::with_offset(u64::MAX - 1);
    let sequencer = BlockSequencer::new(store, BlockSequencerSettings::default()).unwrap();
    let app = router_with(repository, sequencer);

    let response = send(&app, create_request(json!({ "url": "https://other.example" }))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = send(&app, get("/wink/b7")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "https://example.com/");
}

#[tokio::test]
async fn sqlite_backend_round_trip() {
    let repository = SqliteRepository::connect("sqlite::memory:").await.unwrap();
    repository.migrate().await.unwrap();
    let app = router_with(repository, AtomicSequencer::with_offset(2301));

    assert_eq!(create(&app, "https://example.com/a/b?c=1").await, "b7");
    assert_eq!(create(&app, "https://example.com/a/b?c=1").await, "b7");

    let response = send(&app, get("/wink/b7")).await;
    assert_eq!(body_text(response).await, "https://example.com/a/b?c=1");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = router();

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}
