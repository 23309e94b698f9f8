//! Inspection records: discrepancies found on the aircraft and mechanic signoffs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::error::FerryError;

/// A defect noted against the aircraft for a ferry flight.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Discrepancy {
    pub id: Uuid,
    pub ferry_flight_id: Uuid,
    pub reported_by: Uuid,
    pub description: String,
    /// `minor`, `major` or `grounding`
    pub severity: String,
    pub resolved: bool,
    pub resolved_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Major,
    Grounding,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Grounding => "grounding",
        }
    }
}

impl FromStr for Severity {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minor" => Ok(Severity::Minor),
            "major" => Ok(Severity::Major),
            "grounding" => Ok(Severity::Grounding),
            other => Err(FerryError::Validation {
                message: format!("Unknown severity '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDiscrepancyRequest {
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,

    pub severity: String,
}

/// A mechanic's signature on an inspection or repair.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MechanicSignoff {
    pub id: Uuid,
    pub ferry_flight_id: Uuid,
    pub mechanic_id: Uuid,
    /// A&P or IA certificate number
    pub certificate_number: String,
    pub signoff_type: String,
    pub notes: Option<String>,
    pub signed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignoffType {
    PreFerryInspection,
    AirworthinessStatement,
    DiscrepancyRepair,
}

impl SignoffType {
    pub fn as_str(self) -> &'static str {
        match self {
            SignoffType::PreFerryInspection => "pre_ferry_inspection",
            SignoffType::AirworthinessStatement => "airworthiness_statement",
            SignoffType::DiscrepancyRepair => "discrepancy_repair",
        }
    }
}

impl FromStr for SignoffType {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre_ferry_inspection" => Ok(SignoffType::PreFerryInspection),
            "airworthiness_statement" => Ok(SignoffType::AirworthinessStatement),
            "discrepancy_repair" => Ok(SignoffType::DiscrepancyRepair),
            other => Err(FerryError::Validation {
                message: format!("Unknown signoff type '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSignoffRequest {
    #[validate(length(min = 4, max = 32, message = "Certificate number must be 4-32 characters"))]
    pub certificate_number: String,

    pub signoff_type: String,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
