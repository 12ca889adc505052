pub mod from_row;
pub mod queries;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::error::Result;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Enables the /dev routes (session minting). Never set in production.
    pub dev_mode: bool,
    /// Lifetime of newly minted sessions, in seconds
    pub session_ttl_secs: i64,
}

/// Create the schema. Idempotent; safe to run on every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            name        TEXT,
            created_at  INTEGER NOT NULL,
            updated_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS organizations (
            id             TEXT PRIMARY KEY,
            slug           TEXT NOT NULL UNIQUE,
            name           TEXT NOT NULL,
            owner_user_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at     INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS applications (
            id                         TEXT PRIMARY KEY,
            owner_user_id              TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name                       TEXT NOT NULL,
            requires_org_level_access  INTEGER NOT NULL DEFAULT 0,
            created_at                 INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS authorizations (
            id               TEXT PRIMARY KEY,
            user_id          TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            application_id   TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
            organization_id  TEXT REFERENCES organizations(id) ON DELETE CASCADE,
            scopes           TEXT NOT NULL DEFAULT '[]',
            created_at       INTEGER NOT NULL
        );

        -- One grant per (user, application, organization); SQLite unique
        -- indexes treat NULLs as distinct, so the unscoped case needs its
        -- own partial index.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_authorizations_org_scope
            ON authorizations (user_id, application_id, organization_id)
            WHERE organization_id IS NOT NULL;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_authorizations_unscoped
            ON authorizations (user_id, application_id)
            WHERE organization_id IS NULL;

        CREATE TABLE IF NOT EXISTS tokens (
            id                       TEXT PRIMARY KEY,
            user_id                  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            application_id           TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
            scoping_organization_id  TEXT REFERENCES organizations(id) ON DELETE CASCADE,
            prefix                   TEXT NOT NULL,
            token_hash               TEXT NOT NULL UNIQUE,
            scopes                   TEXT NOT NULL DEFAULT '[]',
            created_at               INTEGER NOT NULL,
            expires_at               INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_tokens_grant_scope
            ON tokens (user_id, application_id, scoping_organization_id);

        CREATE TABLE IF NOT EXISTS sessions (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            token_hash  TEXT NOT NULL UNIQUE,
            created_at  INTEGER NOT NULL,
            expires_at  INTEGER NOT NULL
        );
        ",
    )?;
    Ok(())
}
