//! Document repository — flight document metadata.
//!
//! File bytes live in object storage; this table tracks the metadata
//! (filename, size, content type, storage key, checksum).

use chrono::NaiveDate;
use skyferry_common::models::document::Document;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a document record after its bytes have been stored.
#[allow(clippy::too_many_arguments)]
pub async fn create_document(
    pool: &PgPool,
    id: Uuid,
    ferry_flight_id: Uuid,
    uploaded_by: Uuid,
    document_type: &str,
    filename: &str,
    content_type: &str,
    size: i64,
    storage_key: &str,
    sha256: &str,
    expires_on: Option<NaiveDate>,
) -> Result<Document, sqlx::Error> {
    sqlx::query_as::<_, Document>(
        r#"
        INSERT INTO documents (
            id, ferry_flight_id, uploaded_by, document_type,
            filename, content_type, size, storage_key,
            sha256, expires_on, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(ferry_flight_id)
    .bind(uploaded_by)
    .bind(document_type)
    .bind(filename)
    .bind(content_type)
    .bind(size)
    .bind(storage_key)
    .bind(sha256)
    .bind(expires_on)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Document>, sqlx::Error> {
    sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_flight(
    pool: &PgPool,
    ferry_flight_id: Uuid,
) -> Result<Vec<Document>, sqlx::Error> {
    sqlx::query_as::<_, Document>(
        "SELECT * FROM documents WHERE ferry_flight_id = $1 ORDER BY created_at",
    )
    .bind(ferry_flight_id)
    .fetch_all(pool)
    .await
}

/// Storage keys of every document attached to a flight.
pub async fn storage_keys_for_flight(
    pool: &PgPool,
    ferry_flight_id: Uuid,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT storage_key FROM documents WHERE ferry_flight_id = $1")
            .bind(ferry_flight_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(k,)| k).collect())
}

/// Delete a document record. Caller is responsible for deleting from storage.
pub async fn delete_document(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Storage keys of every document on any flight of an aircraft.
pub async fn storage_keys_for_aircraft(
    pool: &PgPool,
    aircraft_id: Uuid,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT d.storage_key FROM documents d
        INNER JOIN ferry_flights f ON f.id = d.ferry_flight_id
        WHERE f.aircraft_id = $1
        "#,
    )
    .bind(aircraft_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(k,)| k).collect())
}
