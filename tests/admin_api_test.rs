// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

mod common;

use axum::http::StatusCode;
use common::{authed, get, json_body, TestApp, HELPER_EMAIL, MEMBER_EMAIL, PASSWORD, STAFF_EMAIL};
use project_em::models::project::{Project, ProjectListResponse};
use project_em::models::user::{UserDetailResponse, UserFields, UserListResponse};
use project_em::services::auth_middleware::basic_authorization;
use project_em::services::store::Store;
use serde_json::json;

#[tokio::test]
async fn test_admin_requires_credentials() {
    let app = TestApp::new();
    app.add_staff().await;

    let response = app.send(get("/admin/users")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));
}

#[tokio::test]
async fn test_admin_rejects_wrong_password() {
    let app = TestApp::new();
    app.add_staff().await;

    let request = axum::http::Request::builder()
        .uri("/admin/users")
        .header("authorization", basic_authorization(STAFF_EMAIL, "wrong"))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_forbidden_for_non_staff() {
    let app = TestApp::new();
    app.add_member().await;

    let response = app
        .send(authed("GET", "/admin/users", MEMBER_EMAIL, None))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_list_ordered_by_email() {
    let app = TestApp::new();
    app.add_staff().await;
    app.add_member().await;
    app.users
        .create_user("aaron@example.com", Some(PASSWORD), None, UserFields::default())
        .await
        .unwrap();

    let response = app
        .send(authed("GET", "/admin/users", STAFF_EMAIL, None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let list: UserListResponse = json_body(response).await;
    let emails: Vec<&str> = list.users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(
        emails,
        vec!["aaron@example.com", MEMBER_EMAIL, STAFF_EMAIL]
    );
    assert_eq!(list.count, 3);
}

#[tokio::test]
async fn test_user_list_filters_and_search() {
    let app = TestApp::new();
    app.add_staff().await;
    app.add_member().await;

    let response = app
        .send(authed("GET", "/admin/users?is_staff=false", STAFF_EMAIL, None))
        .await;
    let list: UserListResponse = json_body(response).await;
    assert_eq!(list.count, 1);
    assert_eq!(list.users[0].email, MEMBER_EMAIL);

    let response = app
        .send(authed("GET", "/admin/users?q=STAFF", STAFF_EMAIL, None))
        .await;
    let list: UserListResponse = json_body(response).await;
    assert_eq!(list.count, 1);
    assert_eq!(list.users[0].email, STAFF_EMAIL);

    let response = app
        .send(authed(
            "GET",
            "/admin/users?first_name=Member&is_active=true",
            STAFF_EMAIL,
            None,
        ))
        .await;
    let list: UserListResponse = json_body(response).await;
    assert_eq!(list.count, 1);
}

#[tokio::test]
async fn test_add_user_through_admin() {
    let app = TestApp::new();
    app.add_staff().await;

    let payload = json!({
        "first_name": "New",
        "last_name": "Person",
        "email": "New.Person@EXAMPLE.org",
        "password1": "pw-123",
        "password2": "pw-123",
        "date_of_birth": "1995-07-14",
        "is_staff": false
    });
    let response = app
        .send(authed("POST", "/admin/users", STAFF_EMAIL, Some(payload)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let detail: UserDetailResponse = json_body(response).await;
    assert_eq!(detail.identity.email, "New.Person@example.org");
    assert!(detail.identity.password.starts_with("algorithm: argon2"));
    assert!(!detail.permissions.is_staff);
    assert!(detail.permissions.is_active);

    let user = app
        .users
        .authenticate("New.Person@example.org", "pw-123")
        .await
        .unwrap();
    assert!(user.is_some());
}

#[tokio::test]
async fn test_add_user_password_mismatch() {
    let app = TestApp::new();
    app.add_staff().await;

    let payload = json!({
        "first_name": "New",
        "last_name": "Person",
        "email": "new@example.org",
        "password1": "one",
        "password2": "two"
    });
    let response = app
        .send(authed("POST", "/admin/users", STAFF_EMAIL, Some(payload)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_user_empty_email() {
    let app = TestApp::new();
    app.add_staff().await;

    let payload = json!({
        "first_name": "New",
        "last_name": "Person",
        "email": "",
        "password1": "pw",
        "password2": "pw"
    });
    let response = app
        .send(authed("POST", "/admin/users", STAFF_EMAIL, Some(payload)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_user_duplicate_email() {
    let app = TestApp::new();
    app.add_staff().await;

    let payload = json!({
        "first_name": "Again",
        "last_name": "Staff",
        "email": "staff@EXAMPLE.COM",
        "password1": "pw",
        "password2": "pw"
    });
    let response = app
        .send(authed("POST", "/admin/users", STAFF_EMAIL, Some(payload)))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_edit_view_groups_fields() {
    let app = TestApp::new();
    app.add_staff().await;
    let member = app.add_member().await;

    let response = app
        .send(authed(
            "GET",
            &format!("/admin/users/{}", member.id),
            STAFF_EMAIL,
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = json_body(response).await;
    assert_eq!(body["identity"]["email"], MEMBER_EMAIL);
    assert_eq!(body["identity"]["first_name"], "Member");
    assert_eq!(body["permissions"]["is_staff"], false);
    assert_eq!(body["permissions"]["is_active"], true);
    assert!(!body.to_string().contains("$argon2"));
}

#[tokio::test]
async fn test_change_user_permissions_and_email() {
    let app = TestApp::new();
    app.add_staff().await;
    let member = app.add_member().await;

    let payload = json!({
        "email": "renamed@EXAMPLE.net",
        "is_staff": true,
        "date_of_birth": "2000-01-01"
    });
    let response = app
        .send(authed(
            "PATCH",
            &format!("/admin/users/{}", member.id),
            STAFF_EMAIL,
            Some(payload),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail: UserDetailResponse = json_body(response).await;
    assert_eq!(detail.identity.email, "renamed@example.net");
    assert!(detail.permissions.is_staff);
    assert_eq!(
        detail.identity.date_of_birth,
        chrono::NaiveDate::from_ymd_opt(2000, 1, 1)
    );
    assert_eq!(detail.identity.first_name, "Member");
}

#[tokio::test]
async fn test_change_missing_user() {
    let app = TestApp::new();
    app.add_staff().await;

    let response = app
        .send(authed(
            "PATCH",
            "/admin/users/999",
            STAFF_EMAIL,
            Some(json!({ "first_name": "Ghost" })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_change_user_rejects_blank_name() {
    let app = TestApp::new();
    let staff = app.add_staff().await;

    let response = app
        .send(authed(
            "PATCH",
            &format!("/admin/users/{}", staff.id),
            STAFF_EMAIL,
            Some(json!({ "last_name": "  " })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_missing_user_with_taken_email() {
    let app = TestApp::new();
    app.add_staff().await;

    let response = app
        .send(authed(
            "PATCH",
            "/admin/users/999",
            STAFF_EMAIL,
            Some(json!({ "email": STAFF_EMAIL })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_user_rejects_malformed_email() {
    let app = TestApp::new();
    app.add_staff().await;

    for email in ["not an email", "a@"] {
        let payload = json!({
            "first_name": "New",
            "last_name": "Person",
            "email": email,
            "password1": "pw",
            "password2": "pw"
        });
        let response = app
            .send(authed("POST", "/admin/users", STAFF_EMAIL, Some(payload)))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", email);
    }

    let response = app
        .send(authed("GET", "/admin/users", STAFF_EMAIL, None))
        .await;
    let list: UserListResponse = json_body(response).await;
    assert_eq!(list.count, 1);
}

#[tokio::test]
async fn test_change_user_rejects_malformed_email() {
    let app = TestApp::new();
    app.add_staff().await;
    let member = app.add_member().await;

    for email in ["not an email", "a@"] {
        let response = app
            .send(authed(
                "PATCH",
                &format!("/admin/users/{}", member.id),
                STAFF_EMAIL,
                Some(json!({ "email": email })),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", email);
    }

    let unchanged = app.store.get_user(member.id).await.unwrap();
    assert_eq!(unchanged.email, MEMBER_EMAIL);
}

#[tokio::test]
async fn test_plain_staff_cannot_change_superuser() {
    let app = TestApp::new();
    let root = app.add_staff().await;
    app.add_helper().await;

    let response = app
        .send(authed(
            "PATCH",
            &format!("/admin/users/{}", root.id),
            HELPER_EMAIL,
            Some(json!({ "password": "owned" })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let hijacked = app.users.authenticate(STAFF_EMAIL, "owned").await.unwrap();
    assert!(hijacked.is_none());
    let intact = app.users.authenticate(STAFF_EMAIL, PASSWORD).await.unwrap();
    assert!(intact.is_some());
}

#[tokio::test]
async fn test_plain_staff_cannot_add_or_promote_users() {
    let app = TestApp::new();
    app.add_helper().await;
    let member = app.add_member().await;

    let payload = json!({
        "first_name": "New",
        "last_name": "Admin",
        "email": "new@example.org",
        "password1": "pw",
        "password2": "pw",
        "is_staff": true
    });
    let response = app
        .send(authed("POST", "/admin/users", HELPER_EMAIL, Some(payload)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(authed(
            "PATCH",
            &format!("/admin/users/{}", member.id),
            HELPER_EMAIL,
            Some(json!({ "is_staff": true })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let member = app.store.get_user(member.id).await.unwrap();
    assert!(!member.is_staff);
}

#[tokio::test]
async fn test_plain_staff_keeps_read_and_project_access() {
    let app = TestApp::new();
    app.add_helper().await;

    let response = app
        .send(authed("GET", "/admin/users", HELPER_EMAIL, None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let create = json!({
        "title": "Docs",
        "description": "Handbook",
        "category": "misc"
    });
    let response = app
        .send(authed("POST", "/admin/projects", HELPER_EMAIL, Some(create)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_superuser_changes_plain_staff() {
    let app = TestApp::new();
    app.add_staff().await;
    let helper = app.add_helper().await;

    let response = app
        .send(authed(
            "PATCH",
            &format!("/admin/users/{}", helper.id),
            STAFF_EMAIL,
            Some(json!({ "password": "rotated", "is_active": false })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail: UserDetailResponse = json_body(response).await;
    assert!(!detail.permissions.is_active);
    assert!(detail.permissions.is_staff);
}

#[tokio::test]
async fn test_project_admin_lifecycle() {
    let app = TestApp::new();
    app.add_staff().await;

    let create = json!({
        "title": "Search engine",
        "description": "Crawls and indexes pages",
        "category": "rust"
    });
    let response = app
        .send(authed("POST", "/admin/projects", STAFF_EMAIL, Some(create)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project: Project = json_body(response).await;

    let update = json!({
        "title": "Search engine v2",
        "description": "Crawls and indexes pages",
        "category": "rust"
    });
    let response = app
        .send(authed(
            "PUT",
            &format!("/admin/projects/{}", project.id),
            STAFF_EMAIL,
            Some(update),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Project = json_body(response).await;
    assert_eq!(updated.title, "Search engine v2");

    let response = app
        .send(authed("GET", "/admin/projects", STAFF_EMAIL, None))
        .await;
    let list: ProjectListResponse = json_body(response).await;
    assert_eq!(list.projects, vec![updated]);

    let response = app
        .send(authed(
            "DELETE",
            &format!("/admin/projects/{}", project.id),
            STAFF_EMAIL,
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(get(&format!("/projects/{}", project.id)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_admin_validation() {
    let app = TestApp::new();
    app.add_staff().await;

    let too_long_category = json!({
        "title": "Title",
        "description": "Description",
        "category": "c".repeat(65)
    });
    let response = app
        .send(authed(
            "POST",
            "/admin/projects",
            STAFF_EMAIL,
            Some(too_long_category),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.send(get("/projects/")).await;
    let list: ProjectListResponse = json_body(response).await;
    assert_eq!(list.count, 0);
}

#[tokio::test]
async fn test_project_admin_forbidden_for_non_staff() {
    let app = TestApp::new();
    app.add_member().await;

    let create = json!({
        "title": "Sneaky",
        "description": "Should not be created",
        "category": "misc"
    });
    let response = app
        .send(authed("POST", "/admin/projects", MEMBER_EMAIL, Some(create)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
