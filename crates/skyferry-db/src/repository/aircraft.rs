//! Aircraft repository.

use skyferry_common::models::aircraft::Aircraft;
use sqlx::PgPool;
use uuid::Uuid;

/// Fields for a new aircraft.
pub struct NewAircraft<'a> {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub tail_number: &'a str,
    pub make: &'a str,
    pub model: &'a str,
    pub serial_number: Option<&'a str>,
    pub year: Option<i32>,
}

/// Register an aircraft unless the organization already holds `limit`.
///
/// The organization row is locked for the count and the insert, so concurrent
/// registrations cannot overshoot the limit. Returns `None` when it is reached.
pub async fn create_aircraft(
    pool: &PgPool,
    new: NewAircraft<'_>,
    limit: i64,
) -> Result<Option<Aircraft>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT id FROM organizations WHERE id = $1 FOR NO KEY UPDATE")
        .bind(new.organization_id)
        .execute(&mut *tx)
        .await?;

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM aircraft WHERE organization_id = $1")
            .bind(new.organization_id)
            .fetch_one(&mut *tx)
            .await?;
    if count >= limit {
        tx.rollback().await?;
        return Ok(None);
    }

    let aircraft = sqlx::query_as::<_, Aircraft>(
        r#"
        INSERT INTO aircraft (
            id, organization_id, tail_number, make, model,
            serial_number, year, is_example, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(new.id)
    .bind(new.organization_id)
    .bind(new.tail_number)
    .bind(new.make)
    .bind(new.model)
    .bind(new.serial_number)
    .bind(new.year)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(aircraft))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Aircraft>, sqlx::Error> {
    sqlx::query_as::<_, Aircraft>("SELECT * FROM aircraft WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_organization(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Vec<Aircraft>, sqlx::Error> {
    sqlx::query_as::<_, Aircraft>(
        "SELECT * FROM aircraft WHERE organization_id = $1 ORDER BY tail_number",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

/// Update aircraft details. `None` leaves a column untouched.
pub async fn update_aircraft(
    pool: &PgPool,
    id: Uuid,
    make: Option<&str>,
    model: Option<&str>,
    serial_number: Option<&str>,
    year: Option<i32>,
) -> Result<Aircraft, sqlx::Error> {
    sqlx::query_as::<_, Aircraft>(
        r#"
        UPDATE aircraft SET
            make = COALESCE($2, make),
            model = COALESCE($3, model),
            serial_number = COALESCE($4, serial_number),
            year = COALESCE($5, year),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(make)
    .bind(model)
    .bind(serial_number)
    .bind(year)
    .fetch_one(pool)
    .await
}

/// Delete an aircraft. Its ferry flights cascade.
pub async fn delete_aircraft(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM aircraft WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
