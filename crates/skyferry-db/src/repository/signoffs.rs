//! Mechanic signoff repository.

use skyferry_common::models::inspection::MechanicSignoff;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_signoff(
    pool: &PgPool,
    id: Uuid,
    ferry_flight_id: Uuid,
    mechanic_id: Uuid,
    certificate_number: &str,
    signoff_type: &str,
    notes: Option<&str>,
) -> Result<MechanicSignoff, sqlx::Error> {
    sqlx::query_as::<_, MechanicSignoff>(
        r#"
        INSERT INTO mechanic_signoffs (id, ferry_flight_id, mechanic_id, certificate_number, signoff_type, notes, signed_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(ferry_flight_id)
    .bind(mechanic_id)
    .bind(certificate_number)
    .bind(signoff_type)
    .bind(notes)
    .fetch_one(pool)
    .await
}

pub async fn list_for_flight(
    pool: &PgPool,
    ferry_flight_id: Uuid,
) -> Result<Vec<MechanicSignoff>, sqlx::Error> {
    sqlx::query_as::<_, MechanicSignoff>(
        "SELECT * FROM mechanic_signoffs WHERE ferry_flight_id = $1 ORDER BY signed_at",
    )
    .bind(ferry_flight_id)
    .fetch_all(pool)
    .await
}
