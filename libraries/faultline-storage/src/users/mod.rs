//! User account and credential queries

use chrono::{DateTime, Utc};
use faultline_core::types::User;
use sqlx::SqlitePool;

use crate::error::{map_insert_error, Result};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A user together with the stored password hash.
///
/// Only the login path ever sees this; the hash stops here and never reaches
/// a serializable type.
#[derive(Debug)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    id: i64,
    email: String,
    password_hash: String,
    name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Insert a new user.
///
/// `password_hash` must already be hashed by the caller. Returns
/// [`crate::StorageError::Duplicate`] when the email is already registered.
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: Option<&str>,
) -> Result<User> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, name, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| map_insert_error(e, &format!("email already registered: {email}")))?;

    Ok(User {
        id: result.last_insert_rowid(),
        email: email.to_string(),
        name: name.map(str::to_string),
        created_at: now,
        updated_at: now,
    })
}

/// Look up a user and their password hash by login email (exact match).
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Credentials>> {
    let row = sqlx::query_as::<_, CredentialsRow>(
        "SELECT id, email, password_hash, name, created_at, updated_at
         FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| Credentials {
        user: User {
            id: r.id,
            email: r.email,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        },
        password_hash: r.password_hash,
    }))
}

/// Get a user by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, name, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

/// Get all users
pub async fn list(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, name, created_at, updated_at FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(User::from).collect())
}
