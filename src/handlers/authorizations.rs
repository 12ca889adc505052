use axum::{
    extract::{Extension, State},
    http::StatusCode,
};

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::Json;
use crate::middleware::SessionContext;
use crate::models::{AuthorizationInfo, RevokeAuthorization};

/// List every authorization the caller has granted, in grant order.
/// Org-scoped grants carry the organization's id and slug; account-level
/// grants carry null.
pub async fn list_authorizations(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<Vec<AuthorizationInfo>>> {
    let conn = state.db.get()?;

    let authorizations = queries::list_authorizations_for_user(&conn, &ctx.user.id)?;

    Ok(Json(authorizations))
}

/// Revoke one of the caller's authorizations.
///
/// Deletes the grant and every token minted under the same
/// (user, application, organization) scope in a single transaction.
/// Grants the caller does not own are indistinguishable from missing ones:
/// both are 404, and nothing is deleted.
pub async fn revoke_authorization(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(input): Json<RevokeAuthorization>,
) -> Result<StatusCode> {
    let mut conn = state.db.get()?;

    let outcome = queries::revoke_authorization(&mut conn, &ctx.user.id, &input.authorization)?;

    tracing::info!(
        authorization_id = %outcome.authorization.id,
        application_id = %outcome.authorization.application_id,
        tokens_deleted = outcome.tokens_deleted,
        "revoked authorization"
    );

    Ok(StatusCode::NO_CONTENT)
}
