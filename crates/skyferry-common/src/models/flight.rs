//! Ferry flight model — a one-time repositioning of an aircraft under a
//! special flight permit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::phases::{self, PhaseProgress};

/// A ferry flight record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FerryFlight {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub aircraft_id: Uuid,
    pub created_by: Uuid,

    /// Departure airport identifier
    pub origin: String,

    /// Arrival airport identifier
    pub destination: String,

    /// Why the aircraft needs a ferry permit (e.g. "Annual inspection overdue")
    pub reason: String,

    /// Workflow status; always a member of one phase's status set
    pub status: String,

    pub planned_departure: Option<DateTime<Utc>>,
    pub pilot_id: Option<Uuid>,
    pub notes: Option<String>,

    /// Created by the example-data seeder
    pub is_example: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFlightRequest {
    pub aircraft_id: Uuid,

    pub origin: String,

    pub destination: String,

    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,

    pub planned_departure: Option<DateTime<Utc>>,

    pub pilot_id: Option<Uuid>,

    #[validate(length(max = 4000))]
    pub notes: Option<String>,
}

/// Partial flight update.
///
/// Nullable columns use `Option<Option<T>>`: an absent key leaves the column
/// alone, an explicit `null` clears it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFlightRequest {
    pub origin: Option<String>,

    pub destination: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub planned_departure: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "nullable")]
    pub pilot_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 4000))]
    pub notes: Option<Option<String>>,
}

/// Present keys become `Some`, so `null` survives as `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: String,

    /// Free-text note recorded in the audit trail
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlightListQuery {
    /// Only flights currently in this phase (e.g. `faa_review`)
    pub phase: Option<String>,
}

/// A flight together with its position in the workflow.
#[derive(Debug, Serialize)]
pub struct FlightResponse {
    #[serde(flatten)]
    pub flight: FerryFlight,
    pub progress: Option<PhaseProgress>,
}

impl From<FerryFlight> for FlightResponse {
    fn from(flight: FerryFlight) -> Self {
        let progress = phases::progress(&flight.status);
        Self { flight, progress }
    }
}
