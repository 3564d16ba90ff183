use axum::{extract::State, routing::get, routing::post, Json, Router};

use crate::{
    auth::authenticate,
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, LoginRequest, LoginResponse, SessionUser},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

/// POST /api/login: resolve {email, password, role} and issue a signed
/// session token. The role in the token comes from the matched credential
/// record, not from the request payload.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("email and password are required"));
    }

    let user = authenticate(state.store.as_ref(), &req.email, &req.password, &req.role).await?;

    let (token, expires_at) = state
        .signer
        .sign(&user)
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;

    tracing::info!(role = user.role.as_str(), "login success");

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user,
    }))
}

/// GET /api/me: session probe, echoes the verified claims.
pub async fn me(auth: AuthContext) -> Json<SessionUser> {
    Json(auth.user)
}
