//! Integration tests for route policies and hospital context resolution.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use helpers::TestApp;

fn lab_order() -> serde_json::Value {
    json!({
        "patient_id": Uuid::new_v4(),
        "test_code": "cbc",
        "test_name": "Complete blood count",
    })
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/lab-orders", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_disjoint_authorities_are_forbidden() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let nurse = app.staff_token("nurse.joy", &["NURSE"], &[hospital]).await;

    let response = app
        .request("POST", "/api/lab-orders", Some(lab_order()), Some(&nurse))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");

    // The same caller passes the read policy.
    let response = app.request("GET", "/api/lab-orders", None, Some(&nurse)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_hospital_resolution_precedence() {
    let app = TestApp::new().await;
    let primary = app.create_hospital("GEN-01").await;
    let secondary = app.create_hospital("GEN-02").await;
    let doctor = app
        .staff_token("dr.grey", &["DOCTOR"], &[primary, secondary])
        .await;

    // Token claim (primary assignment) when nothing explicit is sent.
    let response = app
        .request("POST", "/api/lab-orders", Some(lab_order()), Some(&doctor))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["hospital_id"], primary.to_string());

    // Header beats the claim.
    let secondary_str = secondary.to_string();
    let response = app
        .request_with_headers(
            "POST",
            "/api/lab-orders",
            Some(lab_order()),
            Some(&doctor),
            &[("X-Hospital-Id", &secondary_str)],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["hospital_id"], secondary_str);

    // Query parameter beats the header.
    let response = app
        .request_with_headers(
            "POST",
            &format!("/api/lab-orders?hospitalId={primary}"),
            Some(lab_order()),
            Some(&doctor),
            &[("X-Hospital-Id", &secondary_str)],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["hospital_id"], primary.to_string());

    // A blank query value falls through to the header.
    let response = app
        .request_with_headers(
            "POST",
            "/api/lab-orders?hospitalId=",
            Some(lab_order()),
            Some(&doctor),
            &[("X-Hospital-Id", &secondary_str)],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["hospital_id"], secondary_str);
}

#[tokio::test]
async fn test_malformed_hospital_id_is_rejected() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let doctor = app.staff_token("dr.grey", &["DOCTOR"], &[hospital]).await;

    let response = app
        .request("GET", "/api/lab-orders?hospitalId=not-a-uuid", None, Some(&doctor))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_foreign_hospital_is_forbidden() {
    let app = TestApp::new().await;
    let own = app.create_hospital("GEN-01").await;
    let other = app.create_hospital("GEN-02").await;
    let doctor = app.staff_token("dr.grey", &["DOCTOR"], &[own]).await;

    let response = app
        .request(
            "GET",
            &format!("/api/lab-orders?hospitalId={other}"),
            None,
            Some(&doctor),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_super_admin_needs_explicit_hospital() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let root = app.admin_token().await;

    let response = app.request("GET", "/api/announcements", None, Some(&root)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "GET",
            &format!("/api/announcements?hospitalId={hospital}"),
            None,
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 0);
}

#[tokio::test]
async fn test_patient_books_for_themself() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let patient_id = app.create_staff("pat.smith", &["PATIENT"], &[hospital]).await;
    let patient = app.login("pat.smith", helpers::PASSWORD).await;
    let body = json!({
        "scheduled_at": Utc::now() + Duration::days(2),
        "reason": "Follow-up",
    });

    let response = app
        .request_with_headers(
            "POST",
            "/api/appointments",
            Some(body.clone()),
            Some(&patient),
            &[("X-Act-As", "PATIENT")],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["patient_id"], patient_id.to_string());
    assert_eq!(response.body["data"]["hospital_id"], hospital.to_string());

    // Patients cannot pick the hospital themselves.
    let response = app
        .request_with_headers(
            "POST",
            &format!("/api/appointments?hospitalId={hospital}"),
            Some(body),
            Some(&patient),
            &[("X-Act-As", "PATIENT")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patient_without_act_as_header_is_still_a_patient() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let patient_id = app.create_staff("pat.smith", &["PATIENT"], &[hospital]).await;
    let patient = app.login("pat.smith", helpers::PASSWORD).await;
    let someone_else = Uuid::new_v4();
    let body = json!({
        "patient_id": someone_else,
        "scheduled_at": Utc::now() + Duration::days(2),
        "reason": "Follow-up",
    });

    let response = app
        .request(
            "POST",
            &format!("/api/appointments?hospitalId={hospital}"),
            Some(body.clone()),
            Some(&patient),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request_with_headers(
            "POST",
            "/api/appointments",
            Some(body.clone()),
            Some(&patient),
            &[("X-Act-As", "STAFF")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // The hospital comes from the caller's own record; the patient is the caller.
    let response = app
        .request("POST", "/api/appointments", Some(body), Some(&patient))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            "/api/appointments",
            Some(json!({ "scheduled_at": Utc::now() + Duration::days(2) })),
            Some(&patient),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["patient_id"], patient_id.to_string());
    assert_ne!(response.body["data"]["patient_id"], someone_else.to_string());
}

#[tokio::test]
async fn test_acting_as_patient_requires_patient_authority() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let doctor = app.staff_token("dr.grey", &["DOCTOR"], &[hospital]).await;

    let response = app
        .request_with_headers(
            "POST",
            "/api/appointments",
            Some(json!({ "scheduled_at": Utc::now() + Duration::days(1) })),
            Some(&doctor),
            &[("X-Act-As", "PATIENT")],
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_code_header() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let doctor = app.staff_token("dr.grey", &["DOCTOR"], &[hospital]).await;

    let cases = [
        ("DOCTOR", StatusCode::OK),
        ("NURSE", StatusCode::FORBIDDEN),
        ("WIZARD", StatusCode::BAD_REQUEST),
    ];
    for (role, expected) in cases {
        let response = app
            .request_with_headers(
                "GET",
                "/api/lab-orders",
                None,
                Some(&doctor),
                &[("X-Role-Code", role)],
            )
            .await;
        assert_eq!(response.status, expected, "{role}");
    }
}
