//! Integration tests for authentication and account recovery.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{ADMIN, PASSWORD, TestApp};

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": ADMIN, "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert!(response.body["data"]["access_token"].is_string());
    assert!(response.body["data"]["refresh_token"].is_string());
    assert_eq!(response.body["data"]["token_type"], "Bearer");
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": ADMIN, "password": "wrong-password" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "nobody", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_malformed_login_body_is_validation_error() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/auth/login", Some(json!({ "user": ADMIN })), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_me_authenticated() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let token = app.staff_token("dr.house", &["DOCTOR"], &[hospital]).await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let profile = &response.body["data"];
    assert_eq!(profile["username"], "dr.house");
    assert_eq!(profile["authorities"], json!(["DOCTOR"]));
    assert_eq!(profile["assignments"][0]["hospital_id"], hospital.to_string());
    assert_eq!(profile["assignments"][0]["primary"], true);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/auth/me", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = TestApp::new().await;
    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": ADMIN, "password": PASSWORD })),
            None,
        )
        .await;
    let refresh_token = login.body["data"]["refresh_token"].as_str().unwrap().to_string();
    let access_token = login.body["data"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let new_access = response.body["data"]["access_token"].as_str().unwrap();

    let me = app.request("GET", "/api/auth/me", None, Some(new_access)).await;
    assert_eq!(me.status, StatusCode::OK);

    // An access token is not accepted as a refresh token.
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": access_token })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_round_trip() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/password-reset/request",
            Some(json!({ "email": "root@carehub.test" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let messages = app.mailer.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "root@carehub.test");
    let token = messages[0]
        .body
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("reset link in mail body")
        .to_string();

    let new_password = "Copper-Lantern-Orchid-42";
    let response = app
        .request(
            "POST",
            "/api/auth/password-reset/confirm",
            Some(json!({ "token": token, "new_password": new_password })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    app.login(ADMIN, new_password).await;
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": ADMIN, "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // The token is single use.
    let response = app
        .request(
            "POST",
            "/api/auth/password-reset/confirm",
            Some(json!({ "token": token, "new_password": "Another-Quiet-Meadow-7" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    app.login(ADMIN, new_password).await;
}

#[tokio::test]
async fn test_recovery_does_not_reveal_unknown_addresses() {
    let app = TestApp::new().await;

    for path in ["/api/auth/password-reset/request", "/api/auth/username-reminder"] {
        let response = app
            .request("POST", path, Some(json!({ "email": "ghost@carehub.test" })), None)
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT, "{path}");
    }
    assert!(app.mailer.messages().is_empty());
}

#[tokio::test]
async fn test_username_reminder_mails_username() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/username-reminder",
            Some(json!({ "email": "ROOT@carehub.test" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let messages = app.mailer.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].body.contains(ADMIN));
}

#[tokio::test]
async fn test_only_super_admin_creates_accounts() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let token = app.staff_token("admin.gen", &["HOSPITAL_ADMIN"], &[hospital]).await;

    let response = app
        .request(
            "POST",
            "/api/accounts",
            Some(json!({
                "username": "intruder",
                "email": "intruder@carehub.test",
                "password": PASSWORD,
                "authorities": ["SUPER_ADMIN"],
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
