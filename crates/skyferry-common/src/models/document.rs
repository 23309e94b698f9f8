//! Documents attached to a ferry flight (registration, airworthiness, permits).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::FerryError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub ferry_flight_id: Uuid,
    pub uploaded_by: Uuid,
    pub document_type: String,
    pub filename: String,
    pub content_type: String,
    pub size: i64,

    /// Object storage key; never handed to clients directly
    #[serde(skip_serializing)]
    pub storage_key: String,

    /// Hex SHA-256 of the uploaded bytes
    pub sha256: String,

    pub expires_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Registration,
    Airworthiness,
    Permit,
    Insurance,
    Maintenance,
    Other,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Registration => "registration",
            DocumentType::Airworthiness => "airworthiness",
            DocumentType::Permit => "permit",
            DocumentType::Insurance => "insurance",
            DocumentType::Maintenance => "maintenance",
            DocumentType::Other => "other",
        }
    }
}

impl FromStr for DocumentType {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "registration" => Ok(DocumentType::Registration),
            "airworthiness" => Ok(DocumentType::Airworthiness),
            "permit" => Ok(DocumentType::Permit),
            "insurance" => Ok(DocumentType::Insurance),
            "maintenance" => Ok(DocumentType::Maintenance),
            "other" => Ok(DocumentType::Other),
            other => Err(FerryError::Validation {
                message: format!("Unknown document type '{other}'"),
            }),
        }
    }
}

/// Response for `GET /documents/{id}/download`.
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub url: String,
    pub filename: String,
    pub expires_in: u64,
}
