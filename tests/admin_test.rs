//! Integration tests for the administrative surface: users, departments,
//! file review.

mod common;

use http::StatusCode;

const PASSWORD: &str = "Vermilion-Quartz-91";

#[tokio::test]
async fn test_user_management_is_admin_gated() {
    let app = common::TestApp::new().await;
    app.create_test_user("admin", PASSWORD, "admin", None).await;
    app.create_test_user("jdoe", PASSWORD, "user", Some("HR"))
        .await;

    let admin_token = app.login("admin", PASSWORD).await;
    let user_token = app.login("jdoe", PASSWORD).await;

    let denied = app.request("GET", "/api/users", None, Some(&user_token)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let listed = app.request("GET", "/api/users", None, Some(&admin_token)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["total"], 2);
    // Sanitized: no password material in the listing.
    assert!(listed.body["data"][0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_user_then_login_as_them() {
    let app = common::TestApp::new().await;
    app.create_test_user("admin", PASSWORD, "admin", None).await;
    let admin_token = app.login("admin", PASSWORD).await;

    let created = app
        .request(
            "POST",
            "/api/users",
            Some(serde_json::json!({
                "username": "newbie",
                "email": "newbie@example.org",
                "password": PASSWORD,
                "role": "USER",
                "department": "HR",
                "firstName": "New",
                "lastName": "Bie",
            })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    // Role strings are normalized at the boundary.
    assert_eq!(created.body["role"], "user");

    app.login("newbie", PASSWORD).await;
}

#[tokio::test]
async fn test_self_deletion_is_refused() {
    let app = common::TestApp::new().await;
    let admin_id = app.create_test_user("admin", PASSWORD, "admin", None).await;
    let admin_token = app.login("admin", PASSWORD).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/users/{admin_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_department_lifecycle_with_counts_and_strict_delete() {
    let app = common::TestApp::new().await;
    app.create_test_user("admin", PASSWORD, "superuser", None).await;
    app.create_test_user("hr-user", PASSWORD, "user", Some("HR"))
        .await;
    let admin_token = app.login("admin", PASSWORD).await;
    let hr_token = app.login("hr-user", PASSWORD).await;

    let created = app
        .request(
            "POST",
            "/api/departments",
            Some(serde_json::json!({ "name": "HR", "description": "People" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let dept_id = created.body["id"].as_str().unwrap().to_string();

    // Duplicate name conflicts.
    let duplicate = app
        .request(
            "POST",
            "/api/departments",
            Some(serde_json::json!({ "name": "HR" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    // Counts reflect members and live files.
    app.upload(&hr_token, "doc.pdf", b"a", None).await;
    let listed = app
        .request("GET", "/api/departments", None, Some(&hr_token))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let hr = &listed.body.as_array().unwrap()[0];
    assert_eq!(hr["userCount"], 1);
    assert_eq!(hr["fileCount"], 1);

    // Deletion is refused while referenced.
    let refused = app
        .request(
            "DELETE",
            &format!("/api/departments/{dept_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(refused.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_file_review_transitions() {
    let app = common::TestApp::new().await;
    app.create_test_user("admin", PASSWORD, "admin", None).await;
    app.create_test_user("jdoe", PASSWORD, "user", Some("HR"))
        .await;
    let admin_token = app.login("admin", PASSWORD).await;
    let user_token = app.login("jdoe", PASSWORD).await;

    let uploaded = app.upload(&user_token, "doc.pdf", b"a", None).await;
    let id = uploaded.body["id"].as_str().unwrap().to_string();

    // Regular users may not review.
    let denied = app
        .request(
            "PATCH",
            &format!("/api/files/{id}/approve"),
            None,
            Some(&user_token),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let approved = app
        .request(
            "PATCH",
            &format!("/api/files/{id}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.body["status"], "approved");

    let rejected = app
        .request(
            "PATCH",
            &format!("/api/files/{id}/reject"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(rejected.body["status"], "rejected");
}
