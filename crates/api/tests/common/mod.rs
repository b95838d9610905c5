//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use itam_api::auth::jwt::{generate_access_token, JwtConfig};
use itam_api::config::ServerConfig;
use itam_api::router::build_app_router;
use itam_api::state::AppState;
use itam_api::uploads::DiskUploadStore;
use itam_db::models::asset_model::{AssetModel, CreateAssetModel};
use itam_db::models::category::{Category, CreateCategory};
use itam_db::models::manufacturer::{CreateManufacturer, Manufacturer};
use itam_db::repositories::{AssetModelRepo, CategoryRepo, ManufacturerRepo};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

const TEST_JWT_SECRET: &str = "test-secret-not-for-production";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        upload_dir,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// A router wired exactly like production, plus the temp directory backing
/// its upload store. Keep the directory alive for the test's duration.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router using the given database pool.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = test_config(upload_dir.path().to_path_buf());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        upload_store: Arc::new(DiskUploadStore::new(upload_dir.path())),
    };
    TestApp {
        router: build_app_router(state, &config),
        upload_dir,
    }
}

/// Sign an access token for `role` with the test secret.
pub fn token_for(role: &str) -> String {
    let config = test_config(PathBuf::from("unused"));
    generate_access_token(1, role, &config.jwt).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn authed(method: Method, uri: &str, role: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token_for(role)))
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, role: &str) -> Response<Body> {
    let request = authed(Method::GET, uri, role).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn json_auth(
    app: Router,
    method: Method,
    uri: &str,
    role: &str,
    body: Value,
) -> Response<Body> {
    let request = authed(method, uri, role)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(app: Router, uri: &str, role: &str, body: Value) -> Response<Body> {
    json_auth(app, Method::POST, uri, role, body).await
}

pub async fn put_json_auth(app: Router, uri: &str, role: &str, body: Value) -> Response<Body> {
    json_auth(app, Method::PUT, uri, role, body).await
}

pub async fn patch_json_auth(app: Router, uri: &str, role: &str, body: Value) -> Response<Body> {
    json_auth(app, Method::PATCH, uri, role, body).await
}

pub async fn delete_auth(app: Router, uri: &str, role: &str) -> Response<Body> {
    let request = authed(Method::DELETE, uri, role)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a single-file `multipart/form-data` body.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    role: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Response<Body> {
    let boundary = "itam-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = authed(Method::POST, uri, role)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures (created through the repository layer)
// ---------------------------------------------------------------------------

pub async fn manufacturer(pool: &PgPool, name: &str) -> Manufacturer {
    ManufacturerRepo::create(
        pool,
        &CreateManufacturer {
            name: name.to_string(),
            contact_email: None,
            contact_phone: None,
            contact_address: None,
            is_active: None,
        },
    )
    .await
    .unwrap()
}

pub async fn category(pool: &PgPool, name: &str) -> Category {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            description: None,
            image_path: None,
            is_active: None,
        },
    )
    .await
    .unwrap()
}

pub async fn model(pool: &PgPool, name: &str, manufacturer_id: i64, category_id: i64) -> AssetModel {
    AssetModelRepo::create(
        pool,
        &CreateAssetModel {
            name: name.to_string(),
            model_number: format!("{name}-MN"),
            description: None,
            manufacturer_id,
            category_id,
            image_path: None,
            is_active: None,
            notes: None,
        },
    )
    .await
    .unwrap()
}

/// Dell / Laptop / XPS-15.
pub async fn dell_laptop(pool: &PgPool) -> (Manufacturer, Category, AssetModel) {
    let dell = manufacturer(pool, "Dell").await;
    let laptop = category(pool, "Laptop").await;
    let xps = model(pool, "XPS-15", dell.id, laptop.id).await;
    (dell, laptop, xps)
}
