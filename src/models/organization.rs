use serde::{Deserialize, Serialize};

/// An organization that org-level applications are scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    /// URL-safe identifier, unique across the instance
    pub slug: String,
    pub name: String,
    pub owner_user_id: String,
    pub created_at: i64,
}

/// Input for creating an organization
#[derive(Debug, Deserialize)]
pub struct CreateOrganization {
    pub slug: String,
    pub name: String,
    pub owner_user_id: String,
}

/// Projection of an organization as it appears inside an authorization
/// listing (only identity fields, never ownership).
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationRef {
    pub id: String,
    pub slug: String,
}
