//! User repository — login identities.

use skyferry_common::models::user::{Profile, User};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::profiles;

/// Create a login identity together with its profile, in one transaction.
///
/// Either both rows exist afterwards or neither does.
pub async fn create_with_profile(
    pool: &PgPool,
    id: Uuid,
    email: &str,
    password_hash: &str,
    full_name: &str,
) -> Result<(User, Profile), sqlx::Error> {
    let mut tx = pool.begin().await?;
    let user = create_user(&mut *tx, id, email, password_hash).await?;
    let profile = profiles::create_profile(&mut *tx, user.id, full_name).await?;
    tx.commit().await?;
    Ok((user, profile))
}

/// Create a new user account.
pub async fn create_user<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, created_at)
        VALUES ($1, $2, $3, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .fetch_one(executor)
    .await
}

/// Find a user by their unique ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a user by email (case-insensitive).
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}
