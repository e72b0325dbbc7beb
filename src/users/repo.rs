use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account status, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
}

impl UserStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(UserStatus::Active),
            "blocked" => Some(UserStatus::Blocked),
            _ => None,
        }
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub status: UserStatus,
    pub registration_time: OffsetDateTime,
    pub last_login: Option<OffsetDateTime>,
}

pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, status, registration_time, last_login
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, status, registration_time, last_login
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Insert a new account. New accounts always start out active; the UNIQUE
/// constraint on email is the only duplicate check.
pub async fn create(
    db: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password_hash, status, registration_time, last_login
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(UserStatus::Active)
    .fetch_one(db)
    .await?;
    Ok(user)
}

pub async fn touch_last_login(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// All users, most recently logged in first; accounts that never logged in
/// sort last, tie-broken by registration time.
pub async fn list(db: &PgPool) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, status, registration_time, last_login
        FROM users
        ORDER BY last_login DESC NULLS LAST, registration_time ASC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(users)
}

/// Set-based status update; ids with no matching row are ignored.
/// Returns the number of rows actually changed.
pub async fn set_status(db: &PgPool, ids: &[Uuid], status: UserStatus) -> anyhow::Result<u64> {
    let result = sqlx::query("UPDATE users SET status = $1 WHERE id = ANY($2)")
        .bind(status)
        .bind(ids)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Set-based delete. Returns the number of rows removed.
pub async fn delete(db: &PgPool, ids: &[Uuid]) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(ids)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
