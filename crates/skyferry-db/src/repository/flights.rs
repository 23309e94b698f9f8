//! Ferry flight repository.

use chrono::{DateTime, Utc};
use skyferry_common::models::flight::FerryFlight;
use sqlx::PgPool;
use uuid::Uuid;

/// Fields for a new ferry flight.
pub struct NewFlight<'a> {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub aircraft_id: Uuid,
    pub created_by: Uuid,
    pub origin: &'a str,
    pub destination: &'a str,
    pub reason: &'a str,
    pub status: &'a str,
    pub planned_departure: Option<DateTime<Utc>>,
    pub pilot_id: Option<Uuid>,
    pub notes: Option<&'a str>,
    pub is_example: bool,
}

pub async fn create_flight(pool: &PgPool, new: NewFlight<'_>) -> Result<FerryFlight, sqlx::Error> {
    sqlx::query_as::<_, FerryFlight>(
        r#"
        INSERT INTO ferry_flights (
            id, organization_id, aircraft_id, created_by,
            origin, destination, reason, status,
            planned_departure, pilot_id, notes, is_example,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(new.id)
    .bind(new.organization_id)
    .bind(new.aircraft_id)
    .bind(new.created_by)
    .bind(new.origin)
    .bind(new.destination)
    .bind(new.reason)
    .bind(new.status)
    .bind(new.planned_departure)
    .bind(new.pilot_id)
    .bind(new.notes)
    .bind(new.is_example)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<FerryFlight>, sqlx::Error> {
    sqlx::query_as::<_, FerryFlight>("SELECT * FROM ferry_flights WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List an organization's flights, newest first.
///
/// When `statuses` is given only flights holding one of them are returned.
pub async fn list_for_organization(
    pool: &PgPool,
    organization_id: Uuid,
    statuses: Option<&[String]>,
) -> Result<Vec<FerryFlight>, sqlx::Error> {
    if let Some(statuses) = statuses {
        sqlx::query_as::<_, FerryFlight>(
            r#"
            SELECT * FROM ferry_flights
            WHERE organization_id = $1 AND status = ANY($2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(organization_id)
        .bind(statuses)
        .fetch_all(pool)
        .await
    } else {
        sqlx::query_as::<_, FerryFlight>(
            "SELECT * FROM ferry_flights WHERE organization_id = $1 ORDER BY created_at DESC",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }
}

/// Changes to an existing flight. `None` leaves a column untouched;
/// `Some(None)` clears a nullable column.
#[derive(Default)]
pub struct FlightChanges<'a> {
    pub origin: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub reason: Option<&'a str>,
    pub planned_departure: Option<Option<DateTime<Utc>>>,
    pub pilot_id: Option<Option<Uuid>>,
    pub notes: Option<Option<&'a str>>,
}

/// Update route, schedule and notes. Returns `None` if the flight is gone.
pub async fn update_flight(
    pool: &PgPool,
    id: Uuid,
    changes: FlightChanges<'_>,
) -> Result<Option<FerryFlight>, sqlx::Error> {
    sqlx::query_as::<_, FerryFlight>(
        r#"
        UPDATE ferry_flights SET
            origin = COALESCE($2, origin),
            destination = COALESCE($3, destination),
            reason = COALESCE($4, reason),
            planned_departure = CASE WHEN $5 THEN $6 ELSE planned_departure END,
            pilot_id = CASE WHEN $7 THEN $8 ELSE pilot_id END,
            notes = CASE WHEN $9 THEN $10 ELSE notes END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.origin)
    .bind(changes.destination)
    .bind(changes.reason)
    .bind(changes.planned_departure.is_some())
    .bind(changes.planned_departure.flatten())
    .bind(changes.pilot_id.is_some())
    .bind(changes.pilot_id.flatten())
    .bind(changes.notes.is_some())
    .bind(changes.notes.flatten())
    .fetch_optional(pool)
    .await
}

/// Set a new workflow status.
///
/// The update only applies if the row still holds `expected`, so two
/// concurrent transitions cannot both succeed. Returns `None` on a lost race.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    expected: &str,
    status: &str,
) -> Result<Option<FerryFlight>, sqlx::Error> {
    sqlx::query_as::<_, FerryFlight>(
        r#"
        UPDATE ferry_flights SET status = $3, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(expected)
    .bind(status)
    .fetch_optional(pool)
    .await
}

/// Delete a flight. Documents, discrepancies, signoffs and insurance cascade.
pub async fn delete_flight(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ferry_flights WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
