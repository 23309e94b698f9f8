//! Organization routes — create, inspect, manage members.

use axum::{
    extract::{Extension, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use skyferry_common::{
    error::{FerryError, FerryResult},
    ids,
    models::organization::{
        AddMemberRequest, CreateOrganizationRequest, MemberResponse, Organization,
    },
    permissions::{Permissions, Role},
    validation::{require_text, validate_request},
};
use skyferry_db::repository::{organizations, profiles, users};
use std::sync::Arc;

use crate::{access, middleware::AuthContext, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/organizations", post(create_organization))
        .route("/organizations/current", get(current_organization))
        .route(
            "/organizations/current/members",
            get(list_members).post(add_member),
        )
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// POST /api/organizations — the caller becomes owner of a new organization.
async fn create_organization(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateOrganizationRequest>,
) -> FerryResult<Json<Organization>> {
    validate_request(&body)?;
    require_text("Organization name", &body.name)?;

    let already_member = || FerryError::AlreadyExists {
        resource: "Organization membership".into(),
    };

    let profile = access::profile(&state, &auth).await?;
    if profile.organization_id.is_some() {
        return Err(already_member());
    }

    // The membership check above is advisory; the conditional claim is final.
    let org = organizations::create_with_owner(
        &state.db.pool,
        ids::generate_id(),
        body.name.trim(),
        auth.user_id,
    )
    .await?
    .ok_or_else(already_member)?;

    tracing::info!(organization_id = %org.id, owner = %auth.user_id, "Organization created");

    Ok(Json(org))
}

/// GET /api/organizations/current
async fn current_organization(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> FerryResult<Json<Organization>> {
    let caller = access::caller(&state, &auth).await?;
    let org = organizations::find_by_id(&state.db.pool, caller.organization_id)
        .await?
        .ok_or_else(|| FerryError::not_found("Organization"))?;
    Ok(Json(org))
}

/// GET /api/organizations/current/members
async fn list_members(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> FerryResult<Json<Vec<MemberResponse>>> {
    let caller = access::caller(&state, &auth).await?;
    let members = profiles::list_members(&state.db.pool, caller.organization_id).await?;
    Ok(Json(members))
}

/// POST /api/organizations/current/members — attach an existing account.
async fn add_member(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddMemberRequest>,
) -> FerryResult<Json<MemberResponse>> {
    validate_request(&body)?;
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_MEMBERS)?;

    let role: Role = body.role.parse()?;
    if role == Role::Owner {
        return Err(FerryError::Validation {
            message: "An organization has exactly one owner".into(),
        });
    }

    let user = users::find_by_email(&state.db.pool, body.email.trim())
        .await?
        .ok_or_else(|| FerryError::not_found("Account"))?;

    let profile = profiles::join_organization(
        &state.db.pool,
        user.id,
        caller.organization_id,
        role.as_str(),
    )
    .await?
    .ok_or_else(|| FerryError::AlreadyExists {
        resource: "Organization membership".into(),
    })?;

    tracing::info!(
        organization_id = %caller.organization_id,
        member = %user.id,
        role = role.as_str(),
        "Member added"
    );

    Ok(Json(MemberResponse {
        user_id: user.id,
        email: user.email,
        full_name: profile.full_name,
        role: profile.role,
        created_at: profile.created_at,
    }))
}
