use chrono::Utc;
use rusqlite::{Connection, params};
use rand::RngCore;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{
    APPLICATION_COLS, AUTHORIZATION_COLS, ORGANIZATION_COLS, SESSION_COLS, TOKEN_COLS, USER_COLS,
    query_all, query_one, scopes_from_json,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

fn gen_secret(prefix: &str) -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", prefix, hex::encode(bytes))
}

/// Hash a bearer secret (token or session) for storage/lookup.
/// Plaintext secrets are never persisted.
pub fn hash_secret(secret: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(b"grantbox-secret-v1:");
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

// ============ Users ============

/// Create a user.
pub fn create_user(conn: &Connection, input: &CreateUser) -> Result<User> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO users (id, email, name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, &input.email, &input.name, now, now],
    )?;

    Ok(User {
        id,
        email: input.email.clone(),
        name: input.name.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        &[&id],
    )
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
        &[&email],
    )
}

// ============ Organizations ============

pub fn create_organization(conn: &Connection, input: &CreateOrganization) -> Result<Organization> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO organizations (id, slug, name, owner_user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, &input.slug, &input.name, &input.owner_user_id, now],
    )?;

    Ok(Organization {
        id,
        slug: input.slug.clone(),
        name: input.name.clone(),
        owner_user_id: input.owner_user_id.clone(),
        created_at: now,
    })
}

pub fn get_organization_by_id(conn: &Connection, id: &str) -> Result<Option<Organization>> {
    query_one(
        conn,
        &format!("SELECT {} FROM organizations WHERE id = ?1", ORGANIZATION_COLS),
        &[&id],
    )
}

pub fn get_organization_by_slug(conn: &Connection, slug: &str) -> Result<Option<Organization>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM organizations WHERE slug = ?1",
            ORGANIZATION_COLS
        ),
        &[&slug],
    )
}

// ============ Applications ============

pub fn create_application(conn: &Connection, input: &CreateApplication) -> Result<Application> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO applications (id, owner_user_id, name, requires_org_level_access, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            &id,
            &input.owner_user_id,
            &input.name,
            input.requires_org_level_access as i32,
            now
        ],
    )?;

    Ok(Application {
        id,
        owner_user_id: input.owner_user_id.clone(),
        name: input.name.clone(),
        requires_org_level_access: input.requires_org_level_access,
        created_at: now,
    })
}

pub fn get_application_by_id(conn: &Connection, id: &str) -> Result<Option<Application>> {
    query_one(
        conn,
        &format!("SELECT {} FROM applications WHERE id = ?1", APPLICATION_COLS),
        &[&id],
    )
}

// ============ Authorizations ============

/// Create an authorization (grant).
///
/// Enforces the one-grant-per-scope invariant: the schema's unique indexes
/// reject a second grant for the same (user, application, organization) or a
/// second unscoped grant for the same (user, application), surfaced here as
/// `Conflict`. Applications flagged `requires_org_level_access` must be
/// granted under an organization.
pub fn create_authorization(
    conn: &Connection,
    input: &CreateAuthorization,
) -> Result<Authorization> {
    let application = get_application_by_id(conn, &input.application_id)?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

    if application.requires_org_level_access && input.organization_id.is_none() {
        return Err(AppError::BadRequest(
            "Application requires an organization-scoped grant".into(),
        ));
    }

    let id = gen_id();
    let now = now();
    let scopes_json = serde_json::to_string(&input.scopes)?;

    let inserted = conn.execute(
        "INSERT INTO authorizations (id, user_id, application_id, organization_id, scopes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &id,
            &input.user_id,
            &input.application_id,
            &input.organization_id,
            &scopes_json,
            now
        ],
    );

    match inserted {
        Ok(_) => Ok(Authorization {
            id,
            user_id: input.user_id.clone(),
            application_id: input.application_id.clone(),
            organization_id: input.organization_id.clone(),
            scopes: input.scopes.clone(),
            created_at: now,
        }),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(AppError::Conflict(
                "Authorization already exists for this scope".into(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_authorization_by_id(conn: &Connection, id: &str) -> Result<Option<Authorization>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM authorizations WHERE id = ?1",
            AUTHORIZATION_COLS
        ),
        &[&id],
    )
}

/// List a user's authorizations in grant order, each joined with its
/// application name and (when org-scoped) the organization's identity.
pub fn list_authorizations_for_user(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<AuthorizationInfo>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, ap.name, a.scopes, o.id, o.slug, a.created_at
         FROM authorizations a
         JOIN applications ap ON ap.id = a.application_id
         LEFT JOIN organizations o ON o.id = a.organization_id
         WHERE a.user_id = ?1
         ORDER BY a.created_at, a.rowid",
    )?;

    let rows = stmt.query_map([user_id], |row| {
        let org_id: Option<String> = row.get(3)?;
        let org_slug: Option<String> = row.get(4)?;
        Ok(AuthorizationInfo {
            id: row.get(0)?,
            application: ApplicationRef { name: row.get(1)? },
            scopes: scopes_from_json(2, row.get(2)?)?,
            organization: org_id
                .zip(org_slug)
                .map(|(id, slug)| OrganizationRef { id, slug }),
            created_at: row.get(5)?,
        })
    })?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Into::into)
}

/// Outcome of a successful revocation
#[derive(Debug)]
pub struct RevocationOutcome {
    /// The authorization that was deleted
    pub authorization: Authorization,
    /// How many tokens fell with it
    pub tokens_deleted: usize,
}

/// Revoke an authorization owned by `user_id`, cascading to its tokens.
///
/// Runs as one transaction: the grant lookup is scoped to the owning user
/// (anyone else's grant id is `NotFound`), then every token matching the
/// grant's (user, application, organization) triple is deleted, then the
/// grant itself. An unscoped grant matches only tokens with no scoping
/// organization; tokens under a different organization are never touched.
/// Any failure drops the transaction and rolls back both deletes.
pub fn revoke_authorization(
    conn: &mut Connection,
    user_id: &str,
    authorization_id: &str,
) -> Result<RevocationOutcome> {
    let tx = conn.transaction()?;

    let authorization: Option<Authorization> = query_one(
        &tx,
        &format!(
            "SELECT {} FROM authorizations WHERE id = ?1 AND user_id = ?2",
            AUTHORIZATION_COLS
        ),
        &[&authorization_id, &user_id],
    )?;

    let Some(authorization) = authorization else {
        return Err(AppError::NotFound("Authorization not found".into()));
    };

    let tokens_deleted = match &authorization.organization_id {
        Some(org_id) => tx.execute(
            "DELETE FROM tokens
             WHERE user_id = ?1 AND application_id = ?2 AND scoping_organization_id = ?3",
            params![&authorization.user_id, &authorization.application_id, org_id],
        )?,
        None => tx.execute(
            "DELETE FROM tokens
             WHERE user_id = ?1 AND application_id = ?2 AND scoping_organization_id IS NULL",
            params![&authorization.user_id, &authorization.application_id],
        )?,
    };

    tx.execute(
        "DELETE FROM authorizations WHERE id = ?1",
        params![&authorization.id],
    )?;

    tx.commit()?;

    Ok(RevocationOutcome {
        authorization,
        tokens_deleted,
    })
}

// ============ Tokens ============

/// Generate a token secret with gbt_ prefix
pub fn generate_token() -> String {
    gen_secret("gbt_")
}

/// Mint a token. Returns the record and the plaintext secret, which is
/// shown only once and stored hashed.
pub fn create_token(conn: &Connection, input: &CreateToken) -> Result<(Token, String)> {
    let id = gen_id();
    let now = now();
    let secret = generate_token();
    let prefix = secret[..8].to_string();
    let token_hash = hash_secret(&secret);
    let scopes_json = serde_json::to_string(&input.scopes)?;

    conn.execute(
        "INSERT INTO tokens (id, user_id, application_id, scoping_organization_id,
                             prefix, token_hash, scopes, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &id,
            &input.user_id,
            &input.application_id,
            &input.scoping_organization_id,
            &prefix,
            &token_hash,
            &scopes_json,
            now,
            input.expires_at
        ],
    )?;

    Ok((
        Token {
            id,
            user_id: input.user_id.clone(),
            application_id: input.application_id.clone(),
            scoping_organization_id: input.scoping_organization_id.clone(),
            prefix,
            token_hash,
            scopes: input.scopes.clone(),
            created_at: now,
            expires_at: input.expires_at,
        },
        secret,
    ))
}

pub fn get_token_by_id(conn: &Connection, id: &str) -> Result<Option<Token>> {
    query_one(
        conn,
        &format!("SELECT {} FROM tokens WHERE id = ?1", TOKEN_COLS),
        &[&id],
    )
}

pub fn list_tokens_for_user(conn: &Connection, user_id: &str) -> Result<Vec<Token>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM tokens WHERE user_id = ?1 ORDER BY created_at, rowid",
            TOKEN_COLS
        ),
        &[&user_id],
    )
}

// ============ Sessions ============

/// Generate a session token with gbs_ prefix
pub fn generate_session_token() -> String {
    gen_secret("gbs_")
}

/// Create a session for a user. Returns the record and the plaintext
/// bearer token, stored hashed.
pub fn create_session(
    conn: &Connection,
    user_id: &str,
    ttl_secs: i64,
) -> Result<(Session, String)> {
    let id = gen_id();
    let now = now();
    let token = generate_session_token();
    let token_hash = hash_secret(&token);
    let expires_at = now + ttl_secs;

    conn.execute(
        "INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, user_id, &token_hash, now, expires_at],
    )?;

    Ok((
        Session {
            id,
            user_id: user_id.to_string(),
            token_hash,
            created_at: now,
            expires_at,
        },
        token,
    ))
}

/// Resolve a bearer session token to its user. Expired or unknown tokens
/// resolve to None.
pub fn get_user_by_session_token(conn: &Connection, token: &str) -> Result<Option<User>> {
    let hash = hash_secret(token);

    let session: Option<Session> = query_one(
        conn,
        &format!(
            "SELECT {} FROM sessions WHERE token_hash = ?1 AND expires_at > unixepoch()",
            SESSION_COLS
        ),
        &[&hash],
    )?;

    match session {
        Some(session) => get_user_by_id(conn, &session.user_id),
        None => Ok(None),
    }
}

/// Purge expired sessions. Returns how many were removed.
pub fn delete_expired_sessions(conn: &Connection) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= unixepoch()",
        [],
    )?;
    Ok(deleted)
}
