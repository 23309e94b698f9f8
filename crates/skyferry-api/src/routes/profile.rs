//! Profile routes — the caller's own profile and pilot qualifications.

use axum::{
    extract::{Extension, State},
    middleware,
    routing::get,
    Json, Router,
};
use skyferry_common::{
    error::FerryResult,
    ids,
    models::{
        qualification::{CreateQualificationRequest, PilotQualification},
        user::{ProfileResponse, UpdateProfileRequest},
    },
    validation::{require_text, validate_request},
};
use skyferry_db::repository::{profiles, qualifications};
use std::sync::Arc;

use crate::{access, middleware::AuthContext, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(get_profile).patch(update_profile))
        .route(
            "/profile/qualifications",
            get(list_qualifications).post(add_qualification),
        )
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// GET /api/profile
async fn get_profile(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> FerryResult<Json<ProfileResponse>> {
    let profile = access::profile(&state, &auth).await?;
    Ok(Json(ProfileResponse::new(auth.email, profile)))
}

/// PATCH /api/profile
async fn update_profile(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateProfileRequest>,
) -> FerryResult<Json<ProfileResponse>> {
    validate_request(&body)?;
    require_text("Full name", &body.full_name)?;

    let profile =
        profiles::update_full_name(&state.db.pool, auth.user_id, body.full_name.trim()).await?;
    Ok(Json(ProfileResponse::new(auth.email, profile)))
}

/// GET /api/profile/qualifications
async fn list_qualifications(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> FerryResult<Json<Vec<PilotQualification>>> {
    let rows = qualifications::list_for_profile(&state.db.pool, auth.user_id).await?;
    Ok(Json(rows))
}

/// POST /api/profile/qualifications
async fn add_qualification(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateQualificationRequest>,
) -> FerryResult<Json<PilotQualification>> {
    validate_request(&body)?;

    // The profile row is the foreign key target
    access::profile(&state, &auth).await?;

    let row = qualifications::create_qualification(
        &state.db.pool,
        ids::generate_id(),
        auth.user_id,
        body.certificate_type.trim(),
        body.certificate_number.trim(),
        body.medical_class,
        body.expires_on,
    )
    .await?;

    tracing::info!(user_id = %auth.user_id, qualification_id = %row.id, "Pilot qualification added");

    Ok(Json(row))
}
