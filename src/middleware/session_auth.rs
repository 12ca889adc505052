use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::db::{AppState, queries};
use crate::models::User;
use crate::util::extract_bearer_token;

/// Identity of the authenticated caller, resolved from the session token
/// and passed to handlers via request extensions.
#[derive(Clone)]
pub struct SessionContext {
    pub user: User,
}

pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer_token(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let conn = state
        .db
        .get()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let user = queries::get_user_by_session_token(&conn, token)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Release the connection before the handler takes one from the pool
    drop(conn);

    request.extensions_mut().insert(SessionContext { user });

    Ok(next.run(request).await)
}
