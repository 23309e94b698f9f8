//! Profile repository — display names and organization membership.

use skyferry_common::models::{organization::MemberResponse, user::Profile};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Create the profile for a freshly registered user (no organization yet).
pub async fn create_profile<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    full_name: &str,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (user_id, full_name, organization_id, role, created_at, updated_at)
        VALUES ($1, $2, NULL, 'viewer', NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(full_name)
    .fetch_one(executor)
    .await
}

pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn update_full_name(
    pool: &PgPool,
    user_id: Uuid,
    full_name: &str,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles SET full_name = $2, updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(full_name)
    .fetch_one(pool)
    .await
}

/// Attach a profile to an organization with the given role.
///
/// Only profiles without an organization are updated; returns `None` when the
/// profile already belongs somewhere.
pub async fn join_organization(
    pool: &PgPool,
    user_id: Uuid,
    organization_id: Uuid,
    role: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles SET organization_id = $2, role = $3, updated_at = NOW()
        WHERE user_id = $1 AND organization_id IS NULL
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(organization_id)
    .bind(role)
    .fetch_optional(pool)
    .await
}

/// List the members of an organization with their login email.
pub async fn list_members(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Vec<MemberResponse>, sqlx::Error> {
    sqlx::query_as::<_, MemberResponse>(
        r#"
        SELECT p.user_id, u.email, p.full_name, p.role, p.created_at
        FROM profiles p
        INNER JOIN users u ON u.id = p.user_id
        WHERE p.organization_id = $1
        ORDER BY p.full_name
        "#,
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

/// True when `user_id` belongs to `organization_id`.
pub async fn is_member(
    pool: &PgPool,
    user_id: Uuid,
    organization_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        "SELECT user_id FROM profiles WHERE user_id = $1 AND organization_id = $2",
    )
    .bind(user_id)
    .bind(organization_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}
