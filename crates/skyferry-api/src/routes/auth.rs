//! Authentication routes — register, login, refresh.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use skyferry_common::{
    auth::{validate_token, REFRESH_TOKEN},
    error::{FerryError, FerryResult},
    ids,
    models::user::{LoginRequest, ProfileResponse, RegisterRequest},
    validation::validate_request,
};
use skyferry_db::{
    postgres::is_unique_violation,
    repository::{profiles, users},
};
use std::sync::Arc;

use crate::{
    auth::{self, TokenPair},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
}

#[derive(Serialize)]
struct AuthResponse {
    profile: ProfileResponse,
    #[serde(flatten)]
    tokens: TokenPair,
}

#[derive(Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

fn issue_tokens(user_id: uuid::Uuid, email: &str) -> FerryResult<TokenPair> {
    let config = skyferry_common::config::get();
    auth::generate_token_pair(
        user_id,
        email,
        &config.auth.jwt_secret,
        config.auth.access_token_ttl_secs,
        config.auth.refresh_token_ttl_secs,
    )
    .map_err(|e| FerryError::Internal(e.into()))
}

/// POST /api/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> FerryResult<Json<AuthResponse>> {
    validate_request(&body)?;
    let email = body.email.trim().to_lowercase();

    if users::find_by_email(&state.db.pool, &email).await?.is_some() {
        return Err(FerryError::AlreadyExists {
            resource: "Account".into(),
        });
    }

    let password_hash = auth::hash_password(&body.password)
        .map_err(|e| FerryError::Internal(anyhow::anyhow!("{e}")))?;

    let user_id = ids::generate_id();
    let (user, profile) = users::create_with_profile(
        &state.db.pool,
        user_id,
        &email,
        &password_hash,
        body.full_name.trim(),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            FerryError::AlreadyExists {
                resource: "Account".into(),
            }
        } else {
            e.into()
        }
    })?;

    let tokens = issue_tokens(user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "New user registered");

    Ok(Json(AuthResponse {
        profile: ProfileResponse::new(user.email, profile),
        tokens,
    }))
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> FerryResult<Json<AuthResponse>> {
    validate_request(&body)?;

    let user = users::find_by_email(&state.db.pool, body.email.trim())
        .await?
        .ok_or(FerryError::InvalidCredentials)?;

    let valid = auth::verify_password(&body.password, &user.password_hash)
        .map_err(|_| FerryError::InvalidCredentials)?;
    if !valid {
        return Err(FerryError::InvalidCredentials);
    }

    let profile = profiles::find_by_user(&state.db.pool, user.id)
        .await?
        .ok_or_else(|| FerryError::not_found("Profile"))?;

    let tokens = issue_tokens(user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        profile: ProfileResponse::new(user.email, profile),
        tokens,
    }))
}

/// POST /api/auth/refresh — exchange a refresh token for a new pair.
async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> FerryResult<Json<TokenPair>> {
    let config = skyferry_common::config::get();

    let claims = validate_token(&body.refresh_token, &config.auth.jwt_secret)?;
    if claims.token_type != REFRESH_TOKEN {
        return Err(FerryError::InvalidToken);
    }

    let user_id: uuid::Uuid = claims.sub.parse().map_err(|_| FerryError::InvalidToken)?;

    // The account may have been removed since the token was issued
    let user = users::find_by_id(&state.db.pool, user_id)
        .await?
        .ok_or(FerryError::InvalidToken)?;

    Ok(Json(issue_tokens(user.id, &user.email)?))
}
