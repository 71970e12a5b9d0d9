use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use auth_cell::{require_session, SessionStore};
use shared_config::AppConfig;

use crate::handlers;

pub fn records_routes(config: Arc<AppConfig>, session: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/overview", get(handlers::get_overview))
        .route("/vitals", get(handlers::list_vitals).post(handlers::add_vital))
        .route("/labs", get(handlers::list_lab_tests).post(handlers::add_lab_test))
        .route(
            "/prescriptions",
            get(handlers::list_prescriptions).post(handlers::add_prescription),
        )
        .layer(middleware::from_fn_with_state(session, require_session))
        .with_state(config)
}
