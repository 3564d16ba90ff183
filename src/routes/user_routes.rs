// src/routes/user_routes.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::hash_password,
    error::ApiError,
    models::{AppState, DoctorProfile, MessageResponse, Role},
    store::{NewAdmin, NewDoctor},
    validate::{validate_member, MemberForm},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", post(create_admin))
        .route("/doctor", post(create_doctor).get(search_doctors))
}

/* ============================================================
   POST /api/admin
   ============================================================ */

pub async fn create_admin(
    State(state): State<AppState>,
    Json(form): Json<MemberForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_member(Role::Admin, &form).map_err(ApiError::Validation)?;

    let password_hash = hash_password(&form.password).map_err(ApiError::Internal)?;
    let id = state
        .store
        .create_admin(NewAdmin {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            password_hash,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Admin added successfully".to_string(),
            id,
        }),
    ))
}

/* ============================================================
   POST /api/doctor
   ============================================================ */

pub async fn create_doctor(
    State(state): State<AppState>,
    Json(form): Json<MemberForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_member(Role::Doctor, &form).map_err(ApiError::Validation)?;

    let password_hash = hash_password(&form.password).map_err(ApiError::Internal)?;
    let specialization = form
        .specialization
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let id = state
        .store
        .create_doctor(NewDoctor {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            password_hash,
            specialization,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Doctor added successfully".to_string(),
            id,
        }),
    ))
}

/* ============================================================
   GET /api/doctor?search=
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<DoctorProfile>,
}

/// Case-insensitive substring match against doctor name or specialization;
/// no term returns everyone. Only public profile fields go out.
pub async fn search_doctors(
    State(state): State<AppState>,
    Query(q): Query<DoctorSearchQuery>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    let doctors = state.store.search_doctors(q.search.as_deref()).await?;
    Ok(Json(DoctorsResponse { doctors }))
}
