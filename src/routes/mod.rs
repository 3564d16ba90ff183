use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod auth_routes;
pub mod user_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", auth_routes::router())
        .nest("/api", appointment_routes::router())
        .nest("/api", user_routes::router())
        .with_state(state)
}
