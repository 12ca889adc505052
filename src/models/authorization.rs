use serde::{Deserialize, Serialize};

use super::{ApplicationRef, OrganizationRef};

/// A grant linking a user to an application, optionally scoped to one
/// organization. Tokens are minted under a grant and die with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authorization {
    pub id: String,
    pub user_id: String,
    pub application_id: String,
    /// None for applications granted at the account level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub scopes: Vec<String>,
    pub created_at: i64,
}

/// Input for creating an authorization
#[derive(Debug, Deserialize)]
pub struct CreateAuthorization {
    pub user_id: String,
    pub application_id: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Response record when listing a user's authorizations.
/// `organization` is null for account-level grants.
#[derive(Debug, Serialize)]
pub struct AuthorizationInfo {
    pub id: String,
    pub application: ApplicationRef,
    pub scopes: Vec<String>,
    pub organization: Option<OrganizationRef>,
    pub created_at: i64,
}

/// Request body for revoking an authorization
#[derive(Debug, Deserialize)]
pub struct RevokeAuthorization {
    /// Id of the authorization to revoke
    pub authorization: String,
}
