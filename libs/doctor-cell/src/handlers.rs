use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{Doctor, DoctorFacets, DoctorFilters, DoctorSearchResponse};
use crate::services::DoctorService;

const DEFAULT_TOP_RATED: usize = 3;

#[derive(Debug, Deserialize)]
pub struct TopRatedQuery {
    pub limit: Option<usize>,
}

pub async fn search_doctors(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Query(filters): Query<DoctorFilters>,
) -> Json<DoctorSearchResponse> {
    debug!("Doctor search: {:?}", filters);
    let doctor_service = DoctorService::new(&config);

    let doctors = doctor_service.search_doctors(&filters, user.token.as_deref()).await;
    Json(DoctorSearchResponse::from(doctors))
}

pub async fn get_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Doctor>, AppError> {
    let doctor_service = DoctorService::new(&config);

    let doctor = doctor_service.get_doctor(&doctor_id, user.token.as_deref()).await?;
    Ok(Json(doctor))
}

pub async fn get_facets(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Json<DoctorFacets> {
    let doctor_service = DoctorService::new(&config);
    Json(doctor_service.facets(user.token.as_deref()).await)
}

pub async fn get_top_rated(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Query(query): Query<TopRatedQuery>,
) -> Json<DoctorSearchResponse> {
    let doctor_service = DoctorService::new(&config);

    let limit = query.limit.unwrap_or(DEFAULT_TOP_RATED);
    let doctors = doctor_service.top_rated(limit, user.token.as_deref()).await;
    Json(DoctorSearchResponse::from(doctors))
}

pub async fn get_available_today(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Json<DoctorSearchResponse> {
    let doctor_service = DoctorService::new(&config);
    Json(DoctorSearchResponse::from(doctor_service.available_today(user.token.as_deref()).await))
}
