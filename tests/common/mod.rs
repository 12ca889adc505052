//! Shared test helpers: in-memory app state, entity factories, and
//! request plumbing for exercising the router with tower's oneshot.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tower::ServiceExt;

pub use grantbox::db::{AppState, DbPool, queries};
pub use grantbox::models::*;

pub fn test_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    // In-memory SQLite is per-connection; a single-connection pool keeps
    // every checkout looking at the same database.
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        grantbox::db::init_db(&conn).unwrap();
    }
    pool
}

pub fn test_state() -> AppState {
    AppState {
        db: test_pool(),
        dev_mode: true,
        session_ttl_secs: 3600,
    }
}

/// Build the full router (with session middleware) over a fresh in-memory db.
pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    let app = grantbox::handlers::router(state.clone()).with_state(state.clone());
    (app, state)
}

// ============ Entity factories ============

pub fn create_test_user(conn: &Connection, email: &str) -> User {
    queries::create_user(
        conn,
        &CreateUser {
            email: email.to_string(),
            name: None,
        },
    )
    .expect("create user")
}

pub fn create_test_org(conn: &Connection, owner: &User, slug: &str) -> Organization {
    queries::create_organization(
        conn,
        &CreateOrganization {
            slug: slug.to_string(),
            name: slug.to_string(),
            owner_user_id: owner.id.clone(),
        },
    )
    .expect("create organization")
}

pub fn create_test_application(
    conn: &Connection,
    owner: &User,
    name: &str,
    requires_org_level_access: bool,
) -> Application {
    queries::create_application(
        conn,
        &CreateApplication {
            owner_user_id: owner.id.clone(),
            name: name.to_string(),
            requires_org_level_access,
        },
    )
    .expect("create application")
}

pub fn create_test_authorization(
    conn: &Connection,
    user: &User,
    application: &Application,
    organization: Option<&Organization>,
) -> Authorization {
    queries::create_authorization(
        conn,
        &CreateAuthorization {
            user_id: user.id.clone(),
            application_id: application.id.clone(),
            organization_id: organization.map(|o| o.id.clone()),
            scopes: vec!["org:read".to_string()],
        },
    )
    .expect("create authorization")
}

pub fn create_test_token(
    conn: &Connection,
    user: &User,
    application: &Application,
    organization: Option<&Organization>,
) -> Token {
    let (token, _secret) = queries::create_token(
        conn,
        &CreateToken {
            user_id: user.id.clone(),
            application_id: application.id.clone(),
            scoping_organization_id: organization.map(|o| o.id.clone()),
            scopes: vec!["org:read".to_string()],
            expires_at: None,
        },
    )
    .expect("create token");
    token
}

/// Mint a session for a user and return the bearer token.
pub fn login(conn: &Connection, user: &User) -> String {
    let (_session, token) = queries::create_session(conn, &user.id, 3600).expect("create session");
    token
}

// ============ Request plumbing ============

pub async fn get_authorizations(app: &Router, session_token: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/authorizations")
                .header("Authorization", format!("Bearer {}", session_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn delete_authorization(
    app: &Router,
    session_token: &str,
    authorization_id: &str,
) -> Response<Body> {
    let body = serde_json::json!({ "authorization": authorization_id });
    app.clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/authorizations")
                .header("Authorization", format!("Bearer {}", session_token))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response should be valid JSON")
}
