//! Pilot qualification repository.

use chrono::NaiveDate;
use skyferry_common::models::qualification::PilotQualification;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_qualification(
    pool: &PgPool,
    id: Uuid,
    profile_id: Uuid,
    certificate_type: &str,
    certificate_number: &str,
    medical_class: Option<i16>,
    expires_on: Option<NaiveDate>,
) -> Result<PilotQualification, sqlx::Error> {
    sqlx::query_as::<_, PilotQualification>(
        r#"
        INSERT INTO pilot_qualifications (
            id, profile_id, certificate_type, certificate_number,
            medical_class, expires_on, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(profile_id)
    .bind(certificate_type)
    .bind(certificate_number)
    .bind(medical_class)
    .bind(expires_on)
    .fetch_one(pool)
    .await
}

pub async fn list_for_profile(
    pool: &PgPool,
    profile_id: Uuid,
) -> Result<Vec<PilotQualification>, sqlx::Error> {
    sqlx::query_as::<_, PilotQualification>(
        "SELECT * FROM pilot_qualifications WHERE profile_id = $1 ORDER BY created_at",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}
