use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use crate::error::ApiError;
use crate::models::{AppState, SessionUser};

/// Verified caller identity, decoded from the Bearer token locally. The
/// credential store is not consulted here; expiry is the only thing that
/// ends a session.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: SessionUser,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::session_expired())?;

            let user = state
                .signer
                .verify(authz.token())
                .map_err(|_| ApiError::session_expired())?;

            Ok(AuthContext { user })
        }
    }
}
