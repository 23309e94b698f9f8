//! Example data — seed and remove a demonstration fleet.
//!
//! POST /api/seed/example-data — Insert example aircraft, flights and a discrepancy
//! POST /api/delete-example    — Remove every example row of the organization

use axum::{
    extract::{Extension, State},
    middleware,
    routing::post,
    Json, Router,
};
use skyferry_common::{
    error::{FerryError, FerryResult},
    permissions::Permissions,
};
use skyferry_db::{
    postgres::is_unique_violation,
    repository::examples::{self, ExampleCounts},
};
use std::sync::Arc;

use crate::{access, middleware::AuthContext, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seed/example-data", post(seed_examples))
        .route("/delete-example", post(delete_examples))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// POST /api/seed/example-data
async fn seed_examples(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> FerryResult<Json<ExampleCounts>> {
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_EXAMPLES)?;

    if examples::has_examples(&state.db.pool, caller.organization_id).await? {
        return Err(FerryError::AlreadyExists {
            resource: "Example data".into(),
        });
    }

    // A real aircraft may already use one of the example tail numbers
    let counts = examples::seed(&state.db.pool, caller.organization_id, caller.user_id)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                FerryError::AlreadyExists {
                    resource: "Aircraft with an example tail number".into(),
                }
            } else {
                e.into()
            }
        })?;

    tracing::info!(
        organization_id = %caller.organization_id,
        aircraft = counts.aircraft,
        flights = counts.flights,
        "Example data seeded"
    );

    Ok(Json(counts))
}

/// POST /api/delete-example
async fn delete_examples(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> FerryResult<Json<ExampleCounts>> {
    let caller = access::caller(&state, &auth).await?;
    caller.require(Permissions::MANAGE_EXAMPLES)?;

    let keys = examples::example_storage_keys(&state.db.pool, caller.organization_id).await?;
    let counts = examples::delete_all(&state.db.pool, caller.organization_id).await?;
    let orphaned = state.storage.delete_objects_best_effort(&keys).await;

    tracing::info!(
        organization_id = %caller.organization_id,
        aircraft = counts.aircraft,
        flights = counts.flights,
        documents = keys.len(),
        orphaned,
        "Example data deleted"
    );

    Ok(Json(counts))
}
