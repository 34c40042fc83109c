//! Integration tests for the clinical workflows: lab orders, prescriptions,
//! treatment plans and discharge approvals, plus the audit trail and
//! notifications they leave behind.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use helpers::TestApp;

struct Ward {
    app: TestApp,
    hospital: Uuid,
    doctor: String,
    colleague: String,
    nurse: String,
    lab: String,
    admin: String,
}

async fn ward() -> Ward {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let doctor = app.staff_token("dr.grey", &["DOCTOR"], &[hospital]).await;
    let colleague = app.staff_token("dr.shepherd", &["DOCTOR"], &[hospital]).await;
    let nurse = app.staff_token("nurse.joy", &["NURSE"], &[hospital]).await;
    let lab = app.staff_token("lab.lee", &["LAB_TECHNICIAN"], &[hospital]).await;
    let admin = app.staff_token("admin.gen", &["HOSPITAL_ADMIN"], &[hospital]).await;
    Ward {
        app,
        hospital,
        doctor,
        colleague,
        nurse,
        lab,
        admin,
    }
}

#[tokio::test]
async fn test_lab_order_workflow() {
    let w = ward().await;
    let app = &w.app;

    let order = app
        .request(
            "POST",
            "/api/lab-orders",
            Some(json!({
                "patient_id": Uuid::new_v4(),
                "test_code": "hba1c",
                "test_name": "Glycated haemoglobin",
            })),
            Some(&w.doctor),
        )
        .await;
    assert_eq!(order.status, StatusCode::CREATED);
    assert_eq!(order.body["data"]["test_code"], "HBA1C");
    assert_eq!(order.body["data"]["status"], "PENDING");
    let id = order.id();

    // Default listing only shows final results.
    let response = app.request("GET", "/api/lab-orders", None, Some(&w.nurse)).await;
    assert_eq!(response.body["data"]["total_items"], 0);
    let response = app
        .request("GET", "/api/lab-orders?status=PENDING", None, Some(&w.nurse))
        .await;
    assert_eq!(response.body["data"]["total_items"], 1);

    // Doctors order, technicians record.
    let result = json!({ "value": "6.1", "unit": "%" });
    let response = app
        .request("PUT", &format!("/api/lab-orders/{id}/result"), Some(result.clone()), Some(&w.doctor))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let response = app
        .request("PUT", &format!("/api/lab-orders/{id}/result"), Some(result), Some(&w.lab))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "FINAL");
    assert_eq!(response.body["data"]["result_value"], "6.1");

    let response = app.request("GET", "/api/lab-orders", None, Some(&w.nurse)).await;
    assert_eq!(response.body["data"]["total_items"], 1);

    // Final orders cannot be cancelled.
    let response = app
        .request("POST", &format!("/api/lab-orders/{id}/cancel"), None, Some(&w.doctor))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    // The ordering doctor was told.
    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&w.doctor))
        .await;
    assert_eq!(response.body["data"]["count"], 1);
    let response = app
        .request("PUT", "/api/notifications/read-all", None, Some(&w.doctor))
        .await;
    assert_eq!(response.body["data"]["count"], 1);
    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&w.doctor))
        .await;
    assert_eq!(response.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_lab_order_export() {
    let w = ward().await;
    let app = &w.app;
    app.request(
        "POST",
        "/api/lab-orders",
        Some(json!({ "patient_id": Uuid::new_v4(), "test_code": "k", "test_name": "Potassium" })),
        Some(&w.doctor),
    )
    .await;

    let response = app
        .request("GET", "/api/lab-orders/export", None, Some(&w.admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("GET", "/api/lab-orders/export?format=csv", None, Some(&w.admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.starts_with("text/csv"));
    let csv = String::from_utf8(response.raw).unwrap();
    assert!(csv.contains("Potassium"));

    let response = app
        .request("GET", "/api/lab-orders/export?format=pdf", None, Some(&w.doctor))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/pdf");
    assert!(response.raw.starts_with(b"%PDF"));

    let response = app
        .request("GET", "/api/lab-orders/export?format=xlsx", None, Some(&w.doctor))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("GET", "/api/lab-orders/export?format=csv", None, Some(&w.nurse))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_prescription_discontinue() {
    let w = ward().await;
    let app = &w.app;

    let id = app
        .request(
            "POST",
            "/api/prescriptions",
            Some(json!({
                "patient_id": Uuid::new_v4(),
                "medication": "Amoxicillin",
                "dosage": "500 mg",
                "frequency": "TID",
            })),
            Some(&w.doctor),
        )
        .await
        .id();

    let path = format!("/api/prescriptions/{id}/discontinue");
    let response = app
        .request("POST", &path, Some(json!({ "reason": "Rash" })), Some(&w.nurse))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("POST", &path, Some(json!({ "reason": "Rash" })), Some(&w.doctor))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "DISCONTINUED");

    let response = app.request("POST", &path, Some(json!({})), Some(&w.doctor)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request("GET", &format!("/api/prescriptions/{id}"), None, Some(&w.nurse))
        .await;
    assert_eq!(response.body["data"]["discontinued_reason"], "Rash");
}

#[tokio::test]
async fn test_treatment_plan_crud() {
    let w = ward().await;
    let app = &w.app;
    let patient = Uuid::new_v4();

    let response = app
        .request(
            "POST",
            "/api/treatment-plans",
            Some(json!({
                "patient_id": patient,
                "title": "Post-operative physiotherapy",
                "start_date": "2026-11-02",
                "end_date": "2026-10-01",
            })),
            Some(&w.doctor),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let id = app
        .request(
            "POST",
            "/api/treatment-plans",
            Some(json!({
                "patient_id": patient,
                "title": "Post-operative physiotherapy",
                "start_date": "2026-11-02",
                "end_date": "2026-12-14",
            })),
            Some(&w.doctor),
        )
        .await
        .id();

    let response = app
        .request(
            "GET",
            &format!("/api/treatment-plans?patientId={patient}"),
            None,
            Some(&w.nurse),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);

    let response = app
        .request("DELETE", &format!("/api/treatment-plans/{id}"), None, Some(&w.nurse))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let response = app
        .request("DELETE", &format!("/api/treatment-plans/{id}"), None, Some(&w.admin))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_discharge_needs_second_signature() {
    let w = ward().await;
    let app = &w.app;
    let patient = Uuid::new_v4();

    let response = app
        .request(
            "POST",
            "/api/discharge-approvals",
            Some(json!({ "patient_id": patient, "reason": "Stable for 48h" })),
            Some(&w.doctor),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.id();

    // One pending request per patient.
    let response = app
        .request(
            "POST",
            "/api/discharge-approvals",
            Some(json!({ "patient_id": patient })),
            Some(&w.nurse),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let approve = format!("/api/discharge-approvals/{id}/approve");
    let response = app
        .request("POST", &approve, Some(json!({})), Some(&w.doctor))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", "/api/discharge-approvals", None, Some(&w.admin))
        .await;
    assert_eq!(response.body["data"]["total_items"], 1);

    let response = app
        .request("POST", &approve, Some(json!({ "note": "Agreed" })), Some(&w.colleague))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "APPROVED");

    let response = app
        .request(
            "POST",
            &format!("/api/discharge-approvals/{id}/reject"),
            Some(json!({})),
            Some(&w.admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    // Default listing shows pending requests only.
    let response = app
        .request("GET", "/api/discharge-approvals", None, Some(&w.admin))
        .await;
    assert_eq!(response.body["data"]["total_items"], 0);

    let response = app
        .request("GET", "/api/notifications", None, Some(&w.doctor))
        .await;
    assert_eq!(response.body["data"]["total_items"], 1);
}

#[tokio::test]
async fn test_audit_trail_is_hospital_scoped() {
    let w = ward().await;
    let app = &w.app;
    app.request(
        "POST",
        "/api/lab-orders",
        Some(json!({ "patient_id": Uuid::new_v4(), "test_code": "na", "test_name": "Sodium" })),
        Some(&w.doctor),
    )
    .await;

    let response = app
        .request("GET", "/api/audit-logs?action=lab_order.create", None, Some(&w.admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);
    assert_eq!(
        response.body["data"]["items"][0]["hospital_id"],
        w.hospital.to_string()
    );

    let other = app.create_hospital("GEN-02").await;
    let other_admin = app.staff_token("admin.other", &["HOSPITAL_ADMIN"], &[other]).await;
    let response = app
        .request("GET", "/api/audit-logs?action=lab_order.create", None, Some(&other_admin))
        .await;
    assert_eq!(response.body["data"]["total_items"], 0);

    let response = app
        .request("GET", "/api/audit-logs", None, Some(&w.nurse))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

/// Page of audit entries for `action`, waiting for entries recorded in the
/// background to land.
async fn audit_entries(app: &TestApp, token: &str, action: &str, expected: u64) -> Value {
    let path = format!("/api/audit-logs?action={action}");
    for _ in 0..50 {
        let response = app.request("GET", &path, None, Some(token)).await;
        assert_eq!(response.status, StatusCode::OK);
        if response.body["data"]["total_items"] == expected {
            return response.body["data"].clone();
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("expected {expected} audit entries for {action}");
}

#[tokio::test]
async fn test_client_events_are_accepted_and_recorded() {
    let w = ward().await;
    let app = &w.app;

    let response = app
        .request_with_headers(
            "POST",
            "/api/audit-logs/events",
            Some(json!({
                "action": "chart.viewed",
                "target_type": "patient_chart",
                "target_id": Uuid::new_v4(),
            })),
            Some(&w.nurse),
            &[("X-Forwarded-For", "203.0.113.9, 10.0.0.1")],
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);

    let page = audit_entries(app, &w.admin, "chart.viewed", 1).await;
    let entry = &page["items"][0];
    assert_eq!(entry["ip_address"], "203.0.113.9");
    assert_eq!(entry["hospital_id"], w.hospital.to_string());
    assert_eq!(entry["target_type"], "patient_chart");

    // A relaying system may name the end user's address explicitly.
    let response = app
        .request_with_headers(
            "POST",
            "/api/audit-logs/events",
            Some(json!({
                "action": "chart.printed",
                "target_type": "patient_chart",
                "client_ip": " 198.51.100.4 ",
            })),
            Some(&w.doctor),
            &[("X-Forwarded-For", "203.0.113.9")],
        )
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    let page = audit_entries(app, &w.admin, "chart.printed", 1).await;
    assert_eq!(page["items"][0]["ip_address"], "198.51.100.4");

    let response = app
        .request(
            "POST",
            "/api/audit-logs/events",
            Some(json!({ "action": "", "target_type": "patient_chart" })),
            Some(&w.doctor),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_titles_follow_accept_language() {
    let w = ward().await;
    let app = &w.app;

    let response = app
        .request_with_headers(
            "GET",
            "/api/audit-logs",
            None,
            Some(&w.nurse),
            &[("Accept-Language", "fr-CA;q=0.9, en;q=0.8")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
    assert_eq!(response.body["title"], "Accès refusé");

    let response = app
        .request_with_headers("GET", "/api/audit-logs", None, None, &[("Accept-Language", "fr")])
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["title"], "Authentification requise");

    let response = app
        .request_with_headers(
            "GET",
            "/api/audit-logs",
            None,
            Some(&w.nurse),
            &[("Accept-Language", "xx")],
        )
        .await;
    assert_eq!(response.body["title"], "Access denied");
}

#[tokio::test]
async fn test_feature_flag_override() {
    let w = ward().await;
    let app = &w.app;
    let root = app.admin_token().await;

    let response = app
        .request(
            "PUT",
            "/api/feature-flags/e-prescribing",
            Some(json!({ "enabled": true })),
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    app.request(
        "PUT",
        "/api/feature-flags/e-prescribing",
        Some(json!({ "enabled": false, "hospital_id": w.hospital })),
        Some(&root),
    )
    .await;

    let response = app
        .request("GET", "/api/feature-flags/e-prescribing/evaluate", None, Some(&w.nurse))
        .await;
    assert_eq!(response.body["data"]["enabled"], false);
    assert_eq!(response.body["data"]["source"], "hospital");

    let response = app
        .request("GET", "/api/feature-flags/e-prescribing/evaluate", None, Some(&root))
        .await;
    assert_eq!(response.body["data"]["enabled"], true);
    assert_eq!(response.body["data"]["source"], "global");

    let response = app
        .request(
            "PUT",
            "/api/feature-flags/e-prescribing",
            Some(json!({ "enabled": true })),
            Some(&w.admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
