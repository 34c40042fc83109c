//! Integration tests for the hospital announcement board.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_announcement_lifecycle() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let admin = app.staff_token("admin.gen", &["HOSPITAL_ADMIN"], &[hospital]).await;
    let nurse = app.staff_token("nurse.joy", &["NURSE"], &[hospital]).await;

    let response = app
        .request(
            "POST",
            "/api/announcements",
            Some(json!({ "title": "Flu clinic", "body": "Vaccines on ward 3 all week." })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.id();

    let response = app
        .request("GET", "/api/announcements?search=flu", None, Some(&nurse))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total_items"], 1);

    let response = app
        .request(
            "PUT",
            &format!("/api/announcements/{id}"),
            Some(json!({ "title": "Flu clinic (extended)", "body": "Now also on ward 4." })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["title"], "Flu clinic (extended)");

    let response = app
        .request("DELETE", &format!("/api/announcements/{id}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("DELETE", &format!("/api/announcements/{id}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_staff_cannot_post_announcements() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let nurse = app.staff_token("nurse.joy", &["NURSE"], &[hospital]).await;

    let response = app
        .request(
            "POST",
            "/api/announcements",
            Some(json!({ "title": "Party", "body": "Cake in the break room." })),
            Some(&nurse),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_announcements_stay_in_their_hospital() {
    let app = TestApp::new().await;
    let north = app.create_hospital("NORTH").await;
    let south = app.create_hospital("SOUTH").await;
    let north_admin = app.staff_token("admin.north", &["HOSPITAL_ADMIN"], &[north]).await;
    let south_admin = app.staff_token("admin.south", &["HOSPITAL_ADMIN"], &[south]).await;

    let response = app
        .request(
            "POST",
            "/api/announcements",
            Some(json!({ "title": "Parking", "body": "Lot B closed Monday." })),
            Some(&north_admin),
        )
        .await;
    let id = response.id();

    let response = app
        .request("GET", &format!("/api/announcements/{id}"), None, Some(&south_admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", "/api/announcements", None, Some(&south_admin))
        .await;
    assert_eq!(response.body["data"]["total_items"], 0);
}

#[tokio::test]
async fn test_only_author_edits() {
    let app = TestApp::new().await;
    let hospital = app.create_hospital("GEN-01").await;
    let author = app.staff_token("admin.one", &["HOSPITAL_ADMIN"], &[hospital]).await;
    let colleague = app.staff_token("admin.two", &["HOSPITAL_ADMIN"], &[hospital]).await;

    let id = app
        .request(
            "POST",
            "/api/announcements",
            Some(json!({ "title": "Rota", "body": "Published on Friday." })),
            Some(&author),
        )
        .await
        .id();

    let response = app
        .request(
            "PUT",
            &format!("/api/announcements/{id}"),
            Some(json!({ "title": "Rota", "body": "Published on Monday." })),
            Some(&colleague),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            "/api/announcements",
            Some(json!({ "title": "", "body": "Untitled" })),
            Some(&author),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
