mod authorizations;
mod dev;

pub use authorizations::*;
pub use dev::*;

use axum::{
    Json, Router, middleware,
    routing::{delete, get, post},
};
use serde::Serialize;

use crate::db::AppState;
use crate::middleware::session_auth;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router(state: AppState) -> Router<AppState> {
    let api_routes = Router::new()
        .route("/api/authorizations", get(list_authorizations))
        .route("/api/authorizations", delete(revoke_authorization))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_auth));

    let mut router = Router::new().route("/health", get(health)).merge(api_routes);

    if state.dev_mode {
        router = router.route("/dev/sessions", post(create_dev_session));
    }

    router
}
