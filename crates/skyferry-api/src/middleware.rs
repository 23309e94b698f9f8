//! Middleware — bearer authentication and security headers.

use axum::{extract::Request, http::header, middleware::Next, response::Response};
use skyferry_common::{
    auth::{validate_token, ACCESS_TOKEN},
    error::FerryError,
};

/// Authentication context extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: uuid::Uuid,
    pub email: String,
}

/// Extract and validate the JWT from the `Authorization: Bearer <token>` header.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, FerryError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(FerryError::Unauthorized)?;

    let config = skyferry_common::config::get();
    let claims = validate_token(token, &config.auth.jwt_secret)?;

    // Refresh tokens only work against /auth/refresh
    if claims.token_type != ACCESS_TOKEN {
        return Err(FerryError::InvalidToken);
    }

    let user_id = claims
        .sub
        .parse::<uuid::Uuid>()
        .map_err(|_| FerryError::InvalidToken)?;

    request.extensions_mut().insert(AuthContext {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Add security headers to every HTTP response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let h = response.headers_mut();

    h.insert(header::X_CONTENT_TYPE_OPTIONS, header::HeaderValue::from_static("nosniff"));
    h.insert(header::X_FRAME_OPTIONS, header::HeaderValue::from_static("DENY"));
    h.insert(
        header::REFERRER_POLICY,
        header::HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    h.insert(
        header::STRICT_TRANSPORT_SECURITY,
        header::HeaderValue::from_static("max-age=63072000; includeSubDomains"),
    );
    h.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );

    response
}
