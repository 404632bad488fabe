use axum::{extract::FromRequestParts, http::request::Parts};
use directory_api::endpoints::admin::AdminClaims;

use crate::server::{error::ServerError, AppState};

/// Verified admin identity taken from the `Authorization: Bearer` header.
///
/// A missing token is 401; a token that fails verification is 403.
#[derive(Debug, Clone)]
pub struct Admin(pub AdminClaims);

impl FromRequestParts<AppState> for Admin {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ServerError::Unauthorized("No token provided".to_string()))?;

        let claims = state.token_signer.verify(token).map_err(|e| {
            tracing::warn!(error = %e, "Rejected admin token");
            ServerError::from(e)
        })?;

        Ok(Admin(claims))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
