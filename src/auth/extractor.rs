//! JWT Extractor
//!
//! Lets protected handlers take [`CurrentUser`] as an argument. The
//! auth middleware normally runs first and caches the user in request
//! extensions; handlers mounted without it still validate the bearer
//! token here through the same [`middleware::authenticate`] path.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, middleware};
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already validated by the middleware
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let user = middleware::authenticate(
            auth_header,
            &state.get_jwt_service(),
            &format!("{:?}", parts.uri),
        )?;

        // Cache for later extractions in the same request
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
