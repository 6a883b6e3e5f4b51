//! End-to-end HTTP tests for the design API: register, login, then drive
//! the `/api/v1/designs` endpoints through the full router and middleware
//! stack with an in-memory object store.

use std::sync::Arc;

use atelier_api::auth::jwt::JwtConfig;
use atelier_core::design::MAX_IMAGE_BYTES;
use atelier_api::config::ServerConfig;
use atelier_api::router::build_app_router;
use atelier_api::state::AppState;
use atelier_storage::memory::MemoryObjectStore;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test app setup
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "test-boundary-7f3a";

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router backed by the given pool and a fresh
/// in-memory object store. Mirrors the construction in `main.rs` so these
/// tests exercise the same middleware stack production uses.
fn build_test_app(pool: PgPool) -> (Router, Arc<MemoryObjectStore>) {
    let config = test_config();
    let store = Arc::new(MemoryObjectStore::new());

    let state = AppState {
        pool,
        storage: store.clone(),
        config: Arc::new(config.clone()),
    };

    (build_app_router(state, &config), store)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Register a user and return a bearer token for them.
async fn register(app: &Router, username: &str) -> String {
    let payload = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "correct-horse-battery",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["access_token"]
        .as_str()
        .expect("register must return a token")
        .to_string()
}

/// Build a multipart body with the design text fields and, optionally, a
/// png image part.
fn design_form(name: &str, number: &str, price: &str, image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (field, value) in [("name", name), ("number", number), ("price", price)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: Method, uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

// ---------------------------------------------------------------------------
// Auth boundary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn designs_require_authentication(pool: PgPool) {
    let (app, _store) = build_test_app(pool);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/designs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_token_for_valid_credentials(pool: PgPool) {
    let (app, _store) = build_test_app(pool);
    register(&app, "alice").await;

    let payload = serde_json::json!({
        "username": "alice",
        "password": "correct-horse-battery",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].as_str().is_some());
    assert_eq!(json["user"]["username"], "alice");

    // Wrong password is rejected without detail.
    let payload = serde_json::json!({
        "username": "alice",
        "password": "wrong",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Design CRUD over HTTP
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_get_update_delete_roundtrip(pool: PgPool) {
    let (app, store) = build_test_app(pool);
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    // Create.
    let body = design_form("Logo A", "N100", "12.50", Some(("logo.png", &[9u8; 1024])));
    let response = app
        .clone()
        .oneshot(multipart_request(Method::POST, "/api/v1/designs", &alice, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().expect("created id");
    let image_key = json["data"]["image"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["name"], "Logo A");
    assert_eq!(json["data"]["price"], 12.5);
    assert_eq!(
        json["data"]["image_url"],
        format!("memory://{image_key}"),
        "payload must carry the resolved blob URL"
    );
    assert!(store.get(&image_key).is_some(), "blob must be in the store");

    // Show: owner sees it.
    let response = app
        .clone()
        .oneshot(get_request(Method::GET, &format!("/api/v1/designs/{id}"), &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Show: another caller gets 403.
    let response = app
        .clone()
        .oneshot(get_request(Method::GET, &format!("/api/v1/designs/{id}"), &bob))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Update without image: fields change, image key does not.
    let body = design_form("Logo B", "N100", "15.00", None);
    let response = app
        .clone()
        .oneshot(multipart_request(
            Method::PUT,
            &format!("/api/v1/designs/{id}"),
            &alice,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Logo B");
    assert_eq!(json["data"]["price"], 15.0);
    assert_eq!(json["data"]["image"], image_key.as_str());
    assert_eq!(json["data"]["image_url"], format!("memory://{image_key}"));

    // PATCH drives the same update path as PUT.
    let body = design_form("Logo B", "N200", "15.00", None);
    let response = app
        .clone()
        .oneshot(multipart_request(
            Method::PATCH,
            &format!("/api/v1/designs/{id}"),
            &alice,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["number"], "N200");
    assert_eq!(json["data"]["image"], image_key.as_str());

    // Delete, then the design is gone.
    let response = app
        .clone()
        .oneshot(get_request(
            Method::DELETE,
            &format!("/api/v1/designs/{id}"),
            &alice,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request(Method::GET, &format!("/api/v1/designs/{id}"), &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_invalid_fields_returns_field_errors(pool: PgPool) {
    let (app, store) = build_test_app(pool);
    let alice = register(&app, "alice").await;

    let body = design_form("", "N100", "not-a-price", Some(("logo.png", &[9u8; 64])));
    let response = app
        .clone()
        .oneshot(multipart_request(Method::POST, "/api/v1/designs", &alice, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "price"]);

    assert!(store.is_empty(), "invalid input must not reach the store");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_oversized_image_returns_field_error(pool: PgPool) {
    let (app, store) = build_test_app(pool);
    let alice = register(&app, "alice").await;

    // 3 MiB: over the accepted image size, under the request body ceiling.
    let oversized = vec![9u8; 3 * 1024 * 1024];
    assert!(oversized.len() > MAX_IMAGE_BYTES);
    let body = design_form("Logo A", "N100", "12.50", Some(("big.png", &oversized)));
    let response = app
        .clone()
        .oneshot(multipart_request(Method::POST, "/api/v1/designs", &alice, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"][0]["field"], "image");

    assert!(store.is_empty(), "oversized upload must not reach the store");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_without_image_returns_validation_error(pool: PgPool) {
    let (app, _store) = build_test_app(pool);
    let alice = register(&app, "alice").await;

    let body = design_form("Logo A", "N100", "12.50", None);
    let response = app
        .clone()
        .oneshot(multipart_request(Method::POST, "/api/v1/designs", &alice, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"][0]["field"], "image");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_returns_only_callers_designs(pool: PgPool) {
    let (app, _store) = build_test_app(pool);
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let body = design_form("Alice Design", "A1", "10", Some(("a.png", &[1u8; 32])));
    app.clone()
        .oneshot(multipart_request(Method::POST, "/api/v1/designs", &alice, body))
        .await
        .unwrap();
    let body = design_form("Bob Design", "B1", "20", Some(("b.png", &[2u8; 32])));
    app.clone()
        .oneshot(multipart_request(Method::POST, "/api/v1/designs", &bob, body))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request(Method::GET, "/api/v1/designs", &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let designs = json["data"].as_array().unwrap();
    assert_eq!(designs.len(), 1);
    assert_eq!(designs[0]["name"], "Alice Design");
}
