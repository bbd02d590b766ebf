//! Shared test helpers for integration tests.
//!
//! Tests run the full router over the in-memory store, so no external
//! database or storage is needed.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use archivio_api::state::{AppState, Stores};
use archivio_auth::password::PasswordHasher;
use archivio_core::config::auth::AuthConfig;
use archivio_core::config::logging::LoggingConfig;
use archivio_core::config::server::ServerConfig;
use archivio_core::config::storage::StorageConfig;
use archivio_core::config::{AppConfig, DatabaseConfig};
use archivio_database::memory::MemoryStore;
use archivio_entity::user::{User, UserRole};
use archivio_storage::LocalBlobStore;

/// Boundary used when hand-building multipart bodies.
pub const BOUNDARY: &str = "X-ARCHIVIO-TEST-BOUNDARY";

/// A router plus direct access to the backing store.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// The in-memory store behind the router.
    pub store: MemoryStore,
}

/// Status and parsed JSON body of a test response.
pub struct TestResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Parsed JSON body (null for empty/non-JSON bodies).
    pub body: Value,
}

fn test_config(upload_dir: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused-in-tests".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        storage: StorageConfig {
            upload_dir: upload_dir.to_string(),
            ..StorageConfig::default()
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_ttl_hours: 1,
            password_min_length: 8,
        },
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    /// Build a fresh application over empty in-memory state.
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let upload_dir =
            std::env::temp_dir().join(format!("archivio-integration-{}", Uuid::new_v4()));
        let blobs = LocalBlobStore::new(upload_dir.to_str().unwrap())
            .await
            .expect("blob store");

        let stores = Stores {
            users: Arc::new(store.clone()),
            departments: Arc::new(store.clone()),
            files: Arc::new(store.clone()),
            activity: Arc::new(store.clone()),
        };
        let state = AppState::new(test_config(upload_dir.to_str().unwrap()), stores, blobs);

        Self {
            router: archivio_api::build_router(state),
            store,
        }
    }

    /// Insert a user directly into the store and return their ID.
    pub async fn create_test_user(
        &self,
        username: &str,
        password: &str,
        role: &str,
        department: Option<&str>,
    ) -> Uuid {
        let role: UserRole = role.parse().expect("valid role");
        let id = Uuid::new_v4();
        self.store
            .insert_user_raw(User {
                id,
                username: username.to_string(),
                email: format!("{username}@example.org"),
                password_hash: PasswordHasher::new()
                    .hash_password(password)
                    .expect("hash password"),
                role,
                department: department.map(String::from),
                first_name: "Test".to_string(),
                last_name: username.to_string(),
                is_active: true,
                created_at: chrono::Utc::now(),
                last_login: None,
            })
            .await;
        id
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "username": username,
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.body["token"].as_str().expect("token").to_string()
    }

    /// Issue a JSON request against the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        Self::into_response(self.router.clone().oneshot(request).await.expect("response")).await
    }

    /// Upload one file through the multipart endpoint.
    pub async fn upload(
        &self,
        token: &str,
        file_name: &str,
        content: &[u8],
        department: Option<&str>,
    ) -> TestResponse {
        let mut body = Vec::new();
        if let Some(department) = department {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"department\"\r\n\r\n{department}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/files")
            .header("authorization", format!("Bearer {token}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("build request");

        Self::into_response(self.router.clone().oneshot(request).await.expect("response")).await
    }

    async fn into_response(response: axum::response::Response) -> TestResponse {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }
}
