//! Organization scoping for handlers.
//!
//! Every flight-scoped route resolves the caller's profile, then the flight,
//! and refuses rows belonging to another organization.

use skyferry_common::{
    error::{FerryError, FerryResult},
    ids,
    models::{flight::FerryFlight, user::Profile},
    permissions::Permissions,
};
use skyferry_db::repository::{audit, flights, profiles};
use uuid::Uuid;

use crate::{middleware::AuthContext, AppState};

/// The authenticated user resolved against their organization.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub permissions: Permissions,
    pub profile: Profile,
}

impl Caller {
    pub fn require(&self, required: Permissions) -> FerryResult<()> {
        self.permissions.require(required)
    }
}

/// Load the caller's profile. A token for a deleted user is treated as invalid.
pub async fn profile(state: &AppState, auth: &AuthContext) -> FerryResult<Profile> {
    profiles::find_by_user(&state.db.pool, auth.user_id)
        .await?
        .ok_or(FerryError::InvalidToken)
}

/// Resolve the caller and require organization membership.
pub async fn caller(state: &AppState, auth: &AuthContext) -> FerryResult<Caller> {
    let profile = profile(state, auth).await?;
    let organization_id = profile.organization()?;
    Ok(Caller {
        user_id: auth.user_id,
        organization_id,
        permissions: profile.permissions(),
        profile,
    })
}

/// Check that a row owned by `organization_id` is visible to the caller.
pub fn ensure_same_organization(caller: &Caller, organization_id: Uuid) -> FerryResult<()> {
    if caller.organization_id == organization_id {
        Ok(())
    } else {
        Err(FerryError::Forbidden)
    }
}

/// Load a flight the caller may see: 404 when absent, 403 when foreign.
pub async fn flight(state: &AppState, caller: &Caller, flight_id: Uuid) -> FerryResult<FerryFlight> {
    let flight = flights::find_by_id(&state.db.pool, flight_id)
        .await?
        .ok_or_else(|| FerryError::not_found("Ferry flight"))?;
    ensure_same_organization(caller, flight.organization_id)?;
    Ok(flight)
}

/// Append an audit entry. Failures are logged, not surfaced: the mutation
/// being audited has already been committed.
pub async fn record(
    state: &AppState,
    caller: &Caller,
    flight_id: Option<Uuid>,
    action: &str,
    entity_type: &str,
    entity_id: Uuid,
    details: serde_json::Value,
) {
    let entry = audit::AuditEntry {
        organization_id: caller.organization_id,
        ferry_flight_id: flight_id,
        actor_id: caller.user_id,
        action,
        entity_type,
        entity_id,
        details,
    };
    if let Err(e) = audit::record(&state.db.pool, ids::generate_id(), entry).await {
        tracing::warn!(action, entity_id = %entity_id, error = %e, "Failed to write audit entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skyferry_common::permissions::Role;

    fn caller_in(org: Uuid, role: Role) -> Caller {
        let user_id = Uuid::now_v7();
        Caller {
            user_id,
            organization_id: org,
            permissions: role.permissions(),
            profile: Profile {
                user_id,
                full_name: "Pat Pilot".into(),
                organization_id: Some(org),
                role: role.as_str().into(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn foreign_rows_are_forbidden() {
        let org = Uuid::now_v7();
        let caller = caller_in(org, Role::Owner);
        assert!(ensure_same_organization(&caller, org).is_ok());
        assert!(matches!(
            ensure_same_organization(&caller, Uuid::now_v7()),
            Err(FerryError::Forbidden)
        ));
    }

    #[test]
    fn caller_permissions_follow_role() {
        let caller = caller_in(Uuid::now_v7(), Role::Pilot);
        assert!(caller.require(Permissions::UPLOAD_DOCUMENTS).is_ok());
        assert!(caller.require(Permissions::DELETE_FLIGHTS).is_err());
    }
}
