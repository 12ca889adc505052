use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;

#[derive(Debug, Deserialize)]
pub struct DevCreateSession {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct DevSessionCreated {
    pub user_id: String,
    /// Bearer token for the session - shown only once
    pub token: String,
    pub expires_at: i64,
}

/// Mint a session for an existing user by email. Dev mode only; the real
/// login flow lives outside this service.
pub async fn create_dev_session(
    State(state): State<AppState>,
    Json(input): Json<DevCreateSession>,
) -> Result<Json<DevSessionCreated>> {
    let conn = state.db.get()?;

    let user = queries::get_user_by_email(&conn, &input.email)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let (session, token) = queries::create_session(&conn, &user.id, state.session_ttl_secs)?;

    tracing::info!("DEV: Created session {} for user {}", session.id, user.id);

    Ok(Json(DevSessionCreated {
        user_id: user.id,
        token,
        expires_at: session.expires_at,
    }))
}
