use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use auth_cell::{require_session, SessionStore};
use shared_config::AppConfig;

use crate::handlers;

pub fn doctor_routes(config: Arc<AppConfig>, session: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/", get(handlers::search_doctors))
        .route("/facets", get(handlers::get_facets))
        .route("/top", get(handlers::get_top_rated))
        .route("/available", get(handlers::get_available_today))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .layer(middleware::from_fn_with_state(session, require_session))
        .with_state(config)
}
