use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use auth_cell::{require_session, SessionStore};

use crate::handlers::{self, AppointmentState};

pub fn appointment_routes(state: Arc<AppointmentState>, session: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .layer(middleware::from_fn_with_state(session, require_session))
        .with_state(state)
}

pub fn booking_routes(state: Arc<AppointmentState>, session: Arc<SessionStore>) -> Router {
    Router::new()
        .route(
            "/",
            post(handlers::start_booking)
                .get(handlers::get_booking)
                .delete(handlers::abandon_booking),
        )
        .route("/draft", patch(handlers::update_draft))
        .route(
            "/doctor",
            post(handlers::select_doctor).delete(handlers::change_doctor),
        )
        .route("/time", post(handlers::select_time))
        .route("/next", post(handlers::next_step))
        .route("/prev", post(handlers::prev_step))
        .route("/submit", post(handlers::submit_booking))
        .layer(middleware::from_fn_with_state(session, require_session))
        .with_state(state)
}

pub fn dashboard_routes(state: Arc<AppointmentState>, session: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .layer(middleware::from_fn_with_state(session, require_session))
        .with_state(state)
}
