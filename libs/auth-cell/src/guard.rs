use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_models::error::AppError;

use crate::services::SessionStore;

/// Rejects requests when nobody is signed in; otherwise hands the session
/// user to handlers through request extensions.
pub async fn require_session(
    State(session): State<Arc<SessionStore>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = session
        .current_user()
        .await
        .ok_or_else(|| AppError::Auth("Please sign in to continue".to_string()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
