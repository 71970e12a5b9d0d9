use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::clock::Clock;
use shared_utils::validation::{check_password, PasswordCheck};

use crate::models::{LoginRequest, ProfileForm, ProfileUpdate, ProfileView, RegistrationForm, SessionView};
use crate::services::SessionStore;

pub struct AuthState {
    pub session: Arc<SessionStore>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordStrengthRequest {
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state.session.login(&request.email, &request.password).await?;

    Ok(Json(json!({
        "success": true,
        "user": user,
        "redirect": "/dashboard"
    })))
}

pub async fn register(
    State(state): State<Arc<AuthState>>,
    Json(form): Json<RegistrationForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    form.validate().map_err(AppError::BadRequest)?;

    let user = state.session.register(form.into_registration()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "user": user,
            "redirect": "/dashboard"
        })),
    ))
}

pub async fn logout(State(state): State<Arc<AuthState>>) -> Json<Value> {
    state.session.logout().await;
    Json(json!({ "success": true, "redirect": "/login" }))
}

pub async fn session_status(State(state): State<Arc<AuthState>>) -> Json<SessionView> {
    let user = state.session.current_user().await;
    Json(SessionView {
        authenticated: user.is_some(),
        user,
    })
}

pub async fn password_strength(Json(request): Json<PasswordStrengthRequest>) -> Json<PasswordCheck> {
    Json(check_password(&request.password))
}

pub async fn get_profile(
    State(state): State<Arc<AuthState>>,
    Extension(user): Extension<User>,
) -> Json<ProfileView> {
    debug!("Getting profile for user: {}", user.id);
    Json(ProfileView::new(user, state.clock.today()))
}

/// Saves the flat profile form as edited on screen.
pub async fn save_profile_form(
    State(state): State<Arc<AuthState>>,
    Extension(user): Extension<User>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<ProfileView>, AppError> {
    let updated = state.session.update_profile(form.into_update(&user)).await?;
    Ok(Json(ProfileView::new(updated, state.clock.today())))
}

/// Applies a partial, already-structured profile update.
pub async fn patch_profile(
    State(state): State<Arc<AuthState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileView>, AppError> {
    let updated = state.session.update_profile(update).await?;
    Ok(Json(ProfileView::new(updated, state.clock.today())))
}
