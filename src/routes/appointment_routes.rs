// src/routes/appointment_routes.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, AppointmentView, MessageResponse, NewAppointment},
    query::{FilterCriteria, Scope, StatusFilter},
    validate::validate_appointment,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/appointments",
        get(list_appointments)
            .post(create_appointment)
            .put(update_appointment)
            .delete(delete_appointment),
    )
}

/* ============================================================
   Query params
   ============================================================ */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    // YYYY-MM-DD, inclusive day bounds
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<Uuid>,
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("{field} must be YYYY-MM-DD")))
}

impl ListQuery {
    fn into_filter(self) -> Result<FilterCriteria, ApiError> {
        let status = StatusFilter::parse(self.status.as_deref()).map_err(ApiError::Validation)?;
        let start_date = self
            .start_date
            .as_deref()
            .map(|s| parse_date(s, "startDate"))
            .transpose()?;
        let end_date = self
            .end_date
            .as_deref()
            .map(|s| parse_date(s, "endDate"))
            .transpose()?;

        Ok(FilterCriteria {
            search: self.search.filter(|s| !s.is_empty()),
            status,
            start_date,
            end_date,
        })
    }
}

/* ============================================================
   GET /api/appointments
   ============================================================ */

/// Filtered (never paginated) list, role-scoped: a doctor only ever sees
/// their own appointments regardless of the other filters.
pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<AppointmentView>>, ApiError> {
    let filter = q.into_filter()?;
    let scope = Scope::of(&auth.user);

    let rows = state.store.list_appointments(&filter, &scope).await?;
    Ok(Json(rows))
}

/* ============================================================
   POST /api/appointments
   ============================================================ */

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<NewAppointment>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_appointment(&req).map_err(ApiError::Validation)?;

    let id = state.store.create_appointment(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Appointment created successfully".to_string(),
            id,
        }),
    ))
}

/* ============================================================
   PUT /api/appointments?id=
   ============================================================ */

/// Full replace of all mutable fields; last write wins, there is no
/// version check.
pub async fn update_appointment(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
    Json(req): Json<NewAppointment>,
) -> Result<Json<AppointmentView>, ApiError> {
    let Some(id) = q.id else {
        return Err(ApiError::validation("Appointment ID is required"));
    };
    validate_appointment(&req).map_err(ApiError::Validation)?;

    let updated = state.store.update_appointment(id, req).await?;
    Ok(Json(updated))
}

/* ============================================================
   DELETE /api/appointments?id=
   ============================================================ */

pub async fn delete_appointment(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(id) = q.id else {
        return Err(ApiError::validation("Appointment ID is required"));
    };

    state.store.delete_appointment(id).await?;

    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully".to_string(),
        id,
    }))
}
