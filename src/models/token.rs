use serde::{Deserialize, Serialize};

/// An API credential minted under an authorization.
///
/// Only the hash of the secret is stored; the prefix is kept so users can
/// recognize a token in listings without exposing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub user_id: String,
    pub application_id: String,
    /// Organization the token is scoped to, mirroring its grant.
    /// None for tokens minted under an account-level grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoping_organization_id: Option<String>,
    pub prefix: String,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub scopes: Vec<String>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Input for minting a token
#[derive(Debug, Deserialize)]
pub struct CreateToken {
    pub user_id: String,
    pub application_id: String,
    #[serde(default)]
    pub scoping_organization_id: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}
