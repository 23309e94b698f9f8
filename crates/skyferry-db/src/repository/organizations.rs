//! Organization repository.

use skyferry_common::models::organization::Organization;
use sqlx::PgPool;
use uuid::Uuid;

/// Create an organization and make `owner_id` its owner, in one transaction.
///
/// Returns `None` (and creates nothing) when the owner already belongs to an
/// organization, including one joined by a concurrent request.
pub async fn create_with_owner(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    owner_id: Uuid,
) -> Result<Option<Organization>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let org = sqlx::query_as::<_, Organization>(
        r#"
        INSERT INTO organizations (id, name, owner_id, created_at, updated_at)
        VALUES ($1, $2, $3, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(owner_id)
    .fetch_one(&mut *tx)
    .await?;

    let claimed = sqlx::query(
        r#"
        UPDATE profiles SET organization_id = $2, role = 'owner', updated_at = NOW()
        WHERE user_id = $1 AND organization_id IS NULL
        "#,
    )
    .bind(owner_id)
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed != 1 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    Ok(Some(org))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
