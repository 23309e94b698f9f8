//! Discrepancy repository.

use skyferry_common::models::inspection::Discrepancy;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_discrepancy(
    pool: &PgPool,
    id: Uuid,
    ferry_flight_id: Uuid,
    reported_by: Uuid,
    description: &str,
    severity: &str,
) -> Result<Discrepancy, sqlx::Error> {
    sqlx::query_as::<_, Discrepancy>(
        r#"
        INSERT INTO discrepancies (id, ferry_flight_id, reported_by, description, severity, resolved, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(ferry_flight_id)
    .bind(reported_by)
    .bind(description)
    .bind(severity)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Discrepancy>, sqlx::Error> {
    sqlx::query_as::<_, Discrepancy>("SELECT * FROM discrepancies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Open discrepancies first, then newest first.
pub async fn list_for_flight(
    pool: &PgPool,
    ferry_flight_id: Uuid,
) -> Result<Vec<Discrepancy>, sqlx::Error> {
    sqlx::query_as::<_, Discrepancy>(
        r#"
        SELECT * FROM discrepancies
        WHERE ferry_flight_id = $1
        ORDER BY resolved, created_at DESC
        "#,
    )
    .bind(ferry_flight_id)
    .fetch_all(pool)
    .await
}

/// Mark a discrepancy resolved. Already-resolved rows are left untouched and
/// `None` is returned.
pub async fn resolve(
    pool: &PgPool,
    id: Uuid,
    resolved_by: Uuid,
) -> Result<Option<Discrepancy>, sqlx::Error> {
    sqlx::query_as::<_, Discrepancy>(
        r#"
        UPDATE discrepancies
        SET resolved = TRUE, resolved_by = $2, resolved_at = NOW()
        WHERE id = $1 AND resolved = FALSE
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(resolved_by)
    .fetch_optional(pool)
    .await
}
