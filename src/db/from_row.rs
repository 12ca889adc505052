//! Row-mapping helpers: a `FromRow` trait per model, the column lists the
//! SELECTs use, and generic `query_one`/`query_all` wrappers.
//!
//! Column lists and `from_row` implementations must stay in the same order;
//! queries interpolate the `*_COLS` consts so every call site reads columns
//! in one canonical layout.

use rusqlite::{Connection, Row, types::Type};

use crate::error::Result;
use crate::models::*;

pub const USER_COLS: &str = "id, email, name, created_at, updated_at";

pub const ORGANIZATION_COLS: &str = "id, slug, name, owner_user_id, created_at";

pub const APPLICATION_COLS: &str =
    "id, owner_user_id, name, requires_org_level_access, created_at";

pub const AUTHORIZATION_COLS: &str =
    "id, user_id, application_id, organization_id, scopes, created_at";

pub const TOKEN_COLS: &str = "id, user_id, application_id, scoping_organization_id, \
     prefix, token_hash, scopes, created_at, expires_at";

pub const SESSION_COLS: &str = "id, user_id, token_hash, created_at, expires_at";

pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Parse a JSON-array scope column, surfacing bad data as a conversion error.
pub(crate) fn scopes_from_json(idx: usize, raw: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl FromRow for User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl FromRow for Organization {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Organization {
            id: row.get(0)?,
            slug: row.get(1)?,
            name: row.get(2)?,
            owner_user_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl FromRow for Application {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Application {
            id: row.get(0)?,
            owner_user_id: row.get(1)?,
            name: row.get(2)?,
            requires_org_level_access: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl FromRow for Authorization {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Authorization {
            id: row.get(0)?,
            user_id: row.get(1)?,
            application_id: row.get(2)?,
            organization_id: row.get(3)?,
            scopes: scopes_from_json(4, row.get(4)?)?,
            created_at: row.get(5)?,
        })
    }
}

impl FromRow for Token {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Token {
            id: row.get(0)?,
            user_id: row.get(1)?,
            application_id: row.get(2)?,
            scoping_organization_id: row.get(3)?,
            prefix: row.get(4)?,
            token_hash: row.get(5)?,
            scopes: scopes_from_json(6, row.get(6)?)?,
            created_at: row.get(7)?,
            expires_at: row.get(8)?,
        })
    }
}

impl FromRow for Session {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Session {
            id: row.get(0)?,
            user_id: row.get(1)?,
            token_hash: row.get(2)?,
            created_at: row.get(3)?,
            expires_at: row.get(4)?,
        })
    }
}

pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query_map(params, |row| T::from_row(row))?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| T::from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Into::into)
}
