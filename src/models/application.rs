use serde::{Deserialize, Serialize};

/// A third-party application users can grant access to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    /// If true, every grant to this application must name an organization
    pub requires_org_level_access: bool,
    pub created_at: i64,
}

/// Input for creating an application
#[derive(Debug, Deserialize)]
pub struct CreateApplication {
    pub owner_user_id: String,
    pub name: String,
    #[serde(default)]
    pub requires_org_level_access: bool,
}

/// Projection of an application as it appears inside an authorization listing
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationRef {
    pub name: String,
}
