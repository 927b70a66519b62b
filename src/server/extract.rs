use crate::auth::TokenOutcome;
use crate::models::user::Claims;
use crate::server::AppState;
use crate::server::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, StatusCode, header, request::Parts};

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

/// Extractor for routes any logged-in user may call.
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            ApiError::new(StatusCode::UNAUTHORIZED, "Authentication required")
        })?;

        let outcome = state.auth.verify_token(&token).await.map_err(|e| {
            tracing::error!("token verification failed: {e}");
            ApiError::internal("Authentication failed")
        })?;

        match outcome {
            TokenOutcome::Valid(claims) => Ok(AuthUser(claims)),
            TokenOutcome::Expired => Err(ApiError::with_code(
                StatusCode::UNAUTHORIZED,
                "Token expired",
                "token_expired",
            )),
            TokenOutcome::Invalid => Err(ApiError::with_code(
                StatusCode::FORBIDDEN,
                "Invalid token",
                "invalid_token",
            )),
        }
    }
}

/// Extractor for admin-only routes.
pub struct AdminUser(pub Claims);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.role.is_admin() {
            return Err(ApiError::with_code(
                StatusCode::FORBIDDEN,
                "Admin access required",
                "admin_required",
            ));
        }
        Ok(AdminUser(claims))
    }
}
