use serde::{Deserialize, Serialize};

/// A browser/CLI session resolving a bearer token to a user.
///
/// Sessions carry the caller identity for the authorization-management
/// endpoints; login itself happens elsewhere (dev mode can mint one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub created_at: i64,
    pub expires_at: i64,
}
