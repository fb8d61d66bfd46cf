//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use realty_core::error::CoreError;
use realty_core::types::DbId;
use realty_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, TokenError};
use crate::error::AppError;
use crate::state::AppState;

/// The user named by a valid Bearer token.
///
/// The row is re-read on every request, so a deleted account stops working
/// immediately and the role is the current one rather than the one in the
/// token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Role name as stored (`"admin"` or `"user"`).
    pub role: String,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = bearer_token(header)
            .ok_or_else(|| unauthorized("No token provided or invalid format"))?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| match e {
            TokenError::Expired => unauthorized("Token expired. Please log in again."),
            TokenError::Invalid => unauthorized("Invalid token"),
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = claims.sub, "Token names a user that no longer exists");
                unauthorized("User not found")
            })?;

        Ok(AuthUser {
            user_id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
        })
    }
}
