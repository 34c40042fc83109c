//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use carehub_api::AppState;
use carehub_auth::Authority;
use carehub_core::config::AppConfig;
use carehub_core::result::AppResult;
use carehub_database::Repositories;
use carehub_service::account::CreateAccountRequest;
use carehub_service::{MailMessage, Mailer};

/// Password shared by every seeded account.
pub const PASSWORD: &str = "Gl4cier-Harbour-Violet";

/// Username of the seeded super admin.
pub const ADMIN: &str = "root";

/// Mailer that keeps every message instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn messages(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The full application router, ambient layers included
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
    /// Every message the services tried to send
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Create a new in-memory application with a super admin seeded.
    pub async fn new() -> Self {
        Self::with_config(AppConfig::for_testing()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::build(
            config,
            Repositories::in_memory(),
            None,
            Arc::clone(&mailer) as Arc<dyn Mailer>,
        );

        state
            .account_service
            .ensure_account(CreateAccountRequest {
                username: ADMIN.to_string(),
                email: "root@carehub.test".to_string(),
                display_name: None,
                password: PASSWORD.to_string(),
                authorities: vec![Authority::SuperAdmin],
                assignments: Vec::new(),
            })
            .await
            .expect("Failed to seed super admin");

        let router = carehub_api::build_app(state.clone());
        Self {
            router,
            state,
            mailer,
        }
    }

    /// Access token of the seeded super admin.
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN, PASSWORD).await
    }

    /// Create a hospital through the API and return its ID.
    pub async fn create_hospital(&self, code: &str) -> Uuid {
        let token = self.admin_token().await;
        let response = self
            .request(
                "POST",
                "/api/hospitals",
                Some(json!({ "code": code, "name": format!("{code} General") })),
                Some(&token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Hospital creation failed: {:?}",
            response.body
        );
        response.id()
    }

    /// Provision a staff account assigned to `hospitals` (first one
    /// primary) and return its ID.
    pub async fn create_staff(
        &self,
        username: &str,
        authorities: &[&str],
        hospitals: &[Uuid],
    ) -> Uuid {
        let token = self.admin_token().await;
        let assignments: Vec<Value> = hospitals
            .iter()
            .enumerate()
            .map(|(i, id)| json!({ "hospital_id": id, "role": authorities[0], "primary": i == 0 }))
            .collect();
        let response = self
            .request(
                "POST",
                "/api/accounts",
                Some(json!({
                    "username": username,
                    "email": format!("{username}@carehub.test"),
                    "password": PASSWORD,
                    "authorities": authorities,
                    "assignments": assignments,
                })),
                Some(&token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Account creation failed: {:?}",
            response.body
        );
        response.id()
    }

    /// Provision a staff account and log it in.
    pub async fn staff_token(&self, username: &str, authorities: &[&str], hospitals: &[Uuid]) -> String {
        self.create_staff(username, authorities, hospitals).await;
        self.login(username, PASSWORD).await
    }

    /// Login and return JWT access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, token, &[]).await
    }

    /// Make an HTTP request carrying extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            content_type,
            raw: body_bytes.to_vec(),
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// `Content-Type` header value
    pub content_type: String,
    /// Raw body bytes
    pub raw: Vec<u8>,
}

impl TestResponse {
    /// `data.id` of an `ApiResponse` envelope.
    pub fn id(&self) -> Uuid {
        self.body["data"]["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("No data.id in response")
    }

    /// `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
