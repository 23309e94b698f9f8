//! Organization roles and the permissions they grant.
//!
//! Permissions are a bitfield. Each member of an organization holds one role,
//! and a role maps to a fixed permission set.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FerryError;

bitflags! {
    /// Organization-level permissions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Permissions: i64 {
        /// Read flights, aircraft, documents
        const VIEW                  = 1 << 0;
        /// Rename the organization, add members
        const MANAGE_MEMBERS        = 1 << 1;
        /// Register, edit and remove aircraft
        const MANAGE_AIRCRAFT       = 1 << 2;
        /// Create and edit ferry flights
        const MANAGE_FLIGHTS        = 1 << 3;
        /// Upload and remove documents
        const UPLOAD_DOCUMENTS      = 1 << 4;
        /// Record mechanic signoffs
        const SIGN_OFF              = 1 << 5;
        /// Move a flight through the workflow
        const ADVANCE_STATUS        = 1 << 6;
        /// Delete ferry flights
        const DELETE_FLIGHTS        = 1 << 7;
        /// Report discrepancies against a flight
        const REPORT_DISCREPANCIES  = 1 << 8;
        /// Read the audit trail
        const VIEW_AUDIT_LOG        = 1 << 9;
        /// Seed and remove example data
        const MANAGE_EXAMPLES       = 1 << 10;
    }
}

impl Permissions {
    /// Check if a holder of these permissions can perform an action.
    pub fn has(&self, required: Permissions) -> bool {
        self.contains(required)
    }

    /// Fail with `MissingPermission` unless `required` is held.
    pub fn require(&self, required: Permissions) -> Result<(), FerryError> {
        if self.has(required) {
            Ok(())
        } else {
            Err(FerryError::MissingPermission {
                permission: required
                    .iter_names()
                    .map(|(name, _)| name)
                    .collect::<Vec<_>>()
                    .join(" | "),
            })
        }
    }
}

/// Role a profile holds within its organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Dispatcher,
    Mechanic,
    Pilot,
    Viewer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Dispatcher => "dispatcher",
            Role::Mechanic => "mechanic",
            Role::Pilot => "pilot",
            Role::Viewer => "viewer",
        }
    }

    pub fn permissions(self) -> Permissions {
        match self {
            Role::Owner | Role::Admin => Permissions::all(),
            Role::Dispatcher => {
                Permissions::VIEW
                    | Permissions::MANAGE_AIRCRAFT
                    | Permissions::MANAGE_FLIGHTS
                    | Permissions::UPLOAD_DOCUMENTS
                    | Permissions::ADVANCE_STATUS
                    | Permissions::REPORT_DISCREPANCIES
                    | Permissions::VIEW_AUDIT_LOG
            }
            Role::Mechanic => {
                Permissions::VIEW
                    | Permissions::UPLOAD_DOCUMENTS
                    | Permissions::SIGN_OFF
                    | Permissions::REPORT_DISCREPANCIES
            }
            Role::Pilot => {
                Permissions::VIEW
                    | Permissions::UPLOAD_DOCUMENTS
                    | Permissions::REPORT_DISCREPANCIES
            }
            Role::Viewer => Permissions::VIEW,
        }
    }
}

impl FromStr for Role {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "dispatcher" => Ok(Role::Dispatcher),
            "mechanic" => Ok(Role::Mechanic),
            "pilot" => Ok(Role::Pilot),
            "viewer" => Ok(Role::Viewer),
            other => Err(FerryError::Validation {
                message: format!("Unknown role '{other}'"),
            }),
        }
    }
}
