//! Integration tests for invoices and mailing them out.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use helpers::TestApp;

async fn setup() -> (TestApp, String, Uuid) {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let billing = app
        .staff_token("billing.bob", &["BILLING_SPECIALIST"], &[hospital])
        .await;

    let response = app
        .request(
            "POST",
            "/api/invoices",
            Some(json!({
                "patient_id": Uuid::new_v4(),
                "amount_cents": 125_050,
                "currency": "usd",
            })),
            Some(&billing),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "DRAFT");
    let id = response.id();
    (app, billing, id)
}

#[tokio::test]
async fn test_invalid_email_never_reaches_mailer() {
    let (app, billing, id) = setup().await;

    for query in ["", "?email=", "?email=not-an-address"] {
        let response = app
            .request(
                "POST",
                &format!("/api/invoices/{id}/send-to{query}"),
                None,
                Some(&billing),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(response.error_code(), "VALIDATION_ERROR");
    }

    assert!(app.mailer.messages().is_empty());
}

#[tokio::test]
async fn test_send_issues_draft_and_mails() {
    let (app, billing, id) = setup().await;

    let response = app
        .request(
            "POST",
            &format!("/api/invoices/{id}/send-to?email=payer@example.com"),
            None,
            Some(&billing),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "ISSUED");
    assert_eq!(response.body["data"]["last_sent_to"], "payer@example.com");

    let messages = app.mailer.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, "payer@example.com");
    assert!(messages[0].subject.starts_with("Invoice "));
}

#[tokio::test]
async fn test_unknown_invoice_is_not_found() {
    let (app, billing, _) = setup().await;

    let response = app
        .request(
            "POST",
            &format!("/api/invoices/{}/send-to?email=payer@example.com", Uuid::new_v4()),
            None,
            Some(&billing),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.mailer.messages().is_empty());
}

#[tokio::test]
async fn test_invoice_policies() {
    let (app, _, id) = setup().await;
    let hospital = app
        .request("GET", "/api/hospitals", None, Some(&app.admin_token().await))
        .await
        .body["data"]["items"][0]["id"]
        .as_str()
        .and_then(|s| s.parse::<Uuid>().ok())
        .expect("seeded hospital");
    let admin = app.staff_token("admin.gen", &["HOSPITAL_ADMIN"], &[hospital]).await;
    let doctor = app.staff_token("dr.grey", &["DOCTOR"], &[hospital]).await;

    let response = app.request("GET", &format!("/api/invoices/{id}"), None, Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/invoices", None, Some(&doctor)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            "/api/invoices",
            Some(json!({ "patient_id": Uuid::new_v4(), "amount_cents": 100, "currency": "USD" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
