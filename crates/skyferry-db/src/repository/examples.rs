//! Example data — a small, clearly flagged fleet that new organizations can
//! load to explore the workflow, and remove again in one call.

use serde::Serialize;
use skyferry_common::{ids::generate_id, phases::FlightStatus};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ExampleCounts {
    pub aircraft: u64,
    pub flights: u64,
    pub discrepancies: u64,
    /// Example aircraft left in place because real flights still use them.
    #[serde(skip_serializing_if = "is_zero")]
    pub retained_aircraft: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

struct ExampleAircraft {
    tail_number: &'static str,
    make: &'static str,
    model: &'static str,
    year: i32,
}

struct ExampleFlight {
    aircraft: usize,
    origin: &'static str,
    destination: &'static str,
    reason: &'static str,
    status: FlightStatus,
    discrepancy: Option<(&'static str, &'static str)>,
}

const AIRCRAFT: [ExampleAircraft; 2] = [
    ExampleAircraft {
        tail_number: "N172EX",
        make: "Cessna",
        model: "172S Skyhawk",
        year: 2004,
    },
    ExampleAircraft {
        tail_number: "N58EX",
        make: "Beechcraft",
        model: "Baron 58",
        year: 1998,
    },
];

const FLIGHTS: [ExampleFlight; 3] = [
    ExampleFlight {
        aircraft: 0,
        origin: "KSEA",
        destination: "KBFI",
        reason: "Annual inspection overdue; ferry to maintenance base",
        status: FlightStatus::Draft,
        discrepancy: None,
    },
    ExampleFlight {
        aircraft: 1,
        origin: "KPAE",
        destination: "KBOI",
        reason: "Landing gear repair at approved repair station",
        status: FlightStatus::FaaSubmitted,
        discrepancy: Some(("Left main gear tire worn beyond limits", "major")),
    },
    ExampleFlight {
        aircraft: 1,
        origin: "KBOI",
        destination: "KPAE",
        reason: "Return after completed repair",
        status: FlightStatus::Completed,
        discrepancy: None,
    },
];

/// True when the organization already holds example aircraft.
pub async fn has_examples(pool: &PgPool, organization_id: Uuid) -> Result<bool, sqlx::Error> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM aircraft WHERE organization_id = $1 AND is_example = TRUE LIMIT 1",
    )
    .bind(organization_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

/// Insert the example fleet in a single transaction.
pub async fn seed(
    pool: &PgPool,
    organization_id: Uuid,
    actor_id: Uuid,
) -> Result<ExampleCounts, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut counts = ExampleCounts::default();
    let mut aircraft_ids = Vec::with_capacity(AIRCRAFT.len());

    for ac in &AIRCRAFT {
        let id = generate_id();
        sqlx::query(
            r#"
            INSERT INTO aircraft (id, organization_id, tail_number, make, model, year, is_example, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .bind(ac.tail_number)
        .bind(ac.make)
        .bind(ac.model)
        .bind(ac.year)
        .execute(&mut *tx)
        .await?;
        aircraft_ids.push(id);
        counts.aircraft += 1;
    }

    for flight in &FLIGHTS {
        let id = generate_id();
        sqlx::query(
            r#"
            INSERT INTO ferry_flights (
                id, organization_id, aircraft_id, created_by,
                origin, destination, reason, status, is_example,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .bind(aircraft_ids[flight.aircraft])
        .bind(actor_id)
        .bind(flight.origin)
        .bind(flight.destination)
        .bind(flight.reason)
        .bind(flight.status.as_str())
        .execute(&mut *tx)
        .await?;
        counts.flights += 1;

        if let Some((description, severity)) = flight.discrepancy {
            sqlx::query(
                r#"
                INSERT INTO discrepancies (id, ferry_flight_id, reported_by, description, severity, resolved, created_at)
                VALUES ($1, $2, $3, $4, $5, FALSE, NOW())
                "#,
            )
            .bind(generate_id())
            .bind(id)
            .bind(actor_id)
            .bind(description)
            .bind(severity)
            .execute(&mut *tx)
            .await?;
            counts.discrepancies += 1;
        }

        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, organization_id, ferry_flight_id, actor_id, action, entity_type, entity_id, details, created_at)
            VALUES ($1, $2, $3, $4, 'flight.created', 'ferry_flight', $3, $5, NOW())
            "#,
        )
        .bind(generate_id())
        .bind(organization_id)
        .bind(id)
        .bind(actor_id)
        .bind(serde_json::json!({ "example": true, "status": flight.status.as_str() }))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(counts)
}

/// Storage keys of documents attached to example flights.
pub async fn example_storage_keys(
    pool: &PgPool,
    organization_id: Uuid,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT d.storage_key FROM documents d
        INNER JOIN ferry_flights f ON f.id = d.ferry_flight_id
        WHERE f.organization_id = $1 AND f.is_example = TRUE
        "#,
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(k,)| k).collect())
}

/// Delete every example row of an organization.
///
/// Example flights go first, then example aircraft that no flight references
/// any more. An example aircraft carrying a real flight is kept so the
/// cascade never reaches real data. Child rows of deleted flights cascade.
pub async fn delete_all(pool: &PgPool, organization_id: Uuid) -> Result<ExampleCounts, sqlx::Error> {
    let mut tx = pool.begin().await?;

    // Blocks concurrent flight inserts against these aircraft until commit.
    let example_aircraft: Vec<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM aircraft WHERE organization_id = $1 AND is_example = TRUE FOR UPDATE",
    )
    .bind(organization_id)
    .fetch_all(&mut *tx)
    .await?;

    let (discrepancies,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM discrepancies d
        INNER JOIN ferry_flights f ON f.id = d.ferry_flight_id
        WHERE f.organization_id = $1 AND f.is_example = TRUE
        "#,
    )
    .bind(organization_id)
    .fetch_one(&mut *tx)
    .await?;

    let flights = sqlx::query(
        "DELETE FROM ferry_flights WHERE organization_id = $1 AND is_example = TRUE",
    )
    .bind(organization_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let aircraft = sqlx::query(
        r#"
        DELETE FROM aircraft a
        WHERE a.organization_id = $1 AND a.is_example = TRUE
          AND NOT EXISTS (SELECT 1 FROM ferry_flights f WHERE f.aircraft_id = a.id)
        "#,
    )
    .bind(organization_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    Ok(ExampleCounts {
        aircraft,
        flights,
        discrepancies: discrepancies as u64,
        retained_aircraft: (example_aircraft.len() as u64).saturating_sub(aircraft),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyferry_common::validation::normalize_tail_number;

    #[test]
    fn example_tail_numbers_are_valid() {
        for ac in &AIRCRAFT {
            assert_eq!(normalize_tail_number(ac.tail_number).unwrap(), ac.tail_number);
        }
    }

    #[test]
    fn example_flights_reference_example_aircraft() {
        for flight in &FLIGHTS {
            assert!(flight.aircraft < AIRCRAFT.len());
        }
    }

    #[test]
    fn retained_aircraft_is_omitted_when_zero() {
        let counts = ExampleCounts { aircraft: 2, flights: 3, discrepancies: 1, ..Default::default() };
        let json = serde_json::to_value(counts).unwrap();
        assert!(json.get("retained_aircraft").is_none());

        let kept = ExampleCounts { retained_aircraft: 1, ..counts };
        assert_eq!(serde_json::to_value(kept).unwrap()["retained_aircraft"], 1);
    }

    #[test]
    fn example_flights_span_several_phases() {
        let phases: std::collections::HashSet<_> =
            FLIGHTS.iter().map(|f| f.status.phase()).collect();
        assert!(phases.len() >= 3);
    }
}
