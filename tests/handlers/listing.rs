//! GET /api/authorizations

#[path = "../common/mod.rs"]
mod common;

use common::*;

use axum::http::StatusCode;

#[tokio::test]
async fn test_list_is_empty_for_user_with_no_grants() {
    let (app, state) = test_app();
    let token = {
        let conn = state.db.get().unwrap();
        let user = create_test_user(&conn, "user@example.com");
        login(&conn, &user)
    };

    let response = get_authorizations(&app, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_returns_only_callers_grants() {
    let (app, state) = test_app();
    let conn = state.db.get().unwrap();

    let user = create_test_user(&conn, "user@example.com");
    let other = create_test_user(&conn, "example@example.com");
    let application = create_test_application(&conn, &user, "test", false);

    let auth = create_test_authorization(&conn, &user, &application, None);
    create_test_authorization(&conn, &other, &application, None);

    let token = login(&conn, &user);
    drop(conn);

    let response = get_authorizations(&app, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let records = json.as_array().expect("array body");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], auth.id);
    assert!(records[0]["organization"].is_null());
    assert_eq!(records[0]["application"]["name"], "test");
}

#[tokio::test]
async fn test_list_includes_org_slug_for_org_level_grant() {
    let (app, state) = test_app();
    let conn = state.db.get().unwrap();

    let user = create_test_user(&conn, "user@example.com");
    let org = create_test_org(&conn, &user, "test-org-slug");
    let application = create_test_application(&conn, &user, "test", true);
    create_test_authorization(&conn, &user, &application, Some(&org));

    let token = login(&conn, &user);
    drop(conn);

    let response = get_authorizations(&app, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let records = json.as_array().expect("array body");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["organization"]["slug"], "test-org-slug");
}
