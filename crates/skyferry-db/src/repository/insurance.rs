//! Insurance policy repository.

use chrono::NaiveDate;
use skyferry_common::models::insurance::InsurancePolicy;
use sqlx::PgPool;
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn create_policy(
    pool: &PgPool,
    id: Uuid,
    ferry_flight_id: Uuid,
    carrier: &str,
    policy_number: &str,
    coverage_amount_cents: Option<i64>,
    effective_on: NaiveDate,
    expires_on: NaiveDate,
) -> Result<InsurancePolicy, sqlx::Error> {
    sqlx::query_as::<_, InsurancePolicy>(
        r#"
        INSERT INTO insurance_policies (
            id, ferry_flight_id, carrier, policy_number,
            coverage_amount_cents, effective_on, expires_on, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(ferry_flight_id)
    .bind(carrier)
    .bind(policy_number)
    .bind(coverage_amount_cents)
    .bind(effective_on)
    .bind(expires_on)
    .fetch_one(pool)
    .await
}

pub async fn list_for_flight(
    pool: &PgPool,
    ferry_flight_id: Uuid,
) -> Result<Vec<InsurancePolicy>, sqlx::Error> {
    sqlx::query_as::<_, InsurancePolicy>(
        "SELECT * FROM insurance_policies WHERE ferry_flight_id = $1 ORDER BY effective_on",
    )
    .bind(ferry_flight_id)
    .fetch_all(pool)
    .await
}
