use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use super::verifier::{AuthError, Claims};
use crate::web::error::ApiError;
use crate::web::AppState;

/// Gate on the post-creation endpoint.
///
/// When a token verifier is configured, requires a bearer token whose
/// verified claims carry the configured scope: missing or invalid
/// tokens reject with 401, a valid token without the scope with 403.
/// When no verifier is configured the gate is open and no claims are
/// attached.
#[derive(Debug, Clone)]
pub struct RequirePostScope(pub Option<Claims>);

#[async_trait]
impl FromRequestParts<AppState> for RequirePostScope {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(verifier) = state.verifier.as_deref() else {
            return Ok(Self(None));
        };

        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let claims = verifier.verify(token).await?;
        verifier.authorize(&claims)?;

        Ok(Self(Some(claims)))
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
