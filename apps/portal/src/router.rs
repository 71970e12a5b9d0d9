use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use appointment_cell::{appointment_routes, booking_routes, dashboard_routes, AppointmentState};
use auth_cell::{auth_routes, SessionStore};
use doctor_cell::doctor_routes;
use medical_records_cell::records_routes;
use shared_config::AppConfig;
use shared_utils::clock::Clock;

pub fn create_router(config: Arc<AppConfig>, session: Arc<SessionStore>, clock: Arc<dyn Clock>) -> Router {
    let appointments = AppointmentState::new(config.clone(), clock.clone());

    Router::new()
        .route("/", get(|| async { "Patient portal is running!" }))
        .nest("/auth", auth_routes(session.clone(), clock))
        .nest("/doctors", doctor_routes(config.clone(), session.clone()))
        .nest("/appointments", appointment_routes(appointments.clone(), session.clone()))
        .nest("/booking", booking_routes(appointments.clone(), session.clone()))
        .nest("/dashboard", dashboard_routes(appointments, session.clone()))
        .nest("/records", records_routes(config, session))
        .fallback(page_not_found)
}

async fn page_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Page Not Found",
            "message": "The page you are looking for does not exist.",
            "redirect": "/dashboard"
        })),
    )
}
