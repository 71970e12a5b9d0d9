use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::clock::Clock;

use crate::guard::require_session;
use crate::handlers::{self, AuthState};
use crate::services::SessionStore;

pub fn auth_routes(session: Arc<SessionStore>, clock: Arc<dyn Clock>) -> Router {
    let state = Arc::new(AuthState {
        session: session.clone(),
        clock,
    });

    let public_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route("/session", get(handlers::session_status))
        .route("/password-strength", post(handlers::password_strength));

    let protected_routes = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile)
                .put(handlers::save_profile_form)
                .patch(handlers::patch_profile),
        )
        .layer(middleware::from_fn_with_state(session, require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
