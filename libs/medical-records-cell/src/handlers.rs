use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{LabTest, NewLabTest, NewPrescription, NewVital, Prescription, Vital};
use crate::services::views::{self, LabsView, PrescriptionsView, RecordsOverview, VitalsView};
use crate::services::RecordsService;

#[derive(Debug, Deserialize)]
pub struct LabsQuery {
    pub category: Option<String>,
}

pub async fn get_overview(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Json<RecordsOverview> {
    let records_service = RecordsService::new(&config);
    let token = user.token.as_deref();

    let (vitals, labs, prescriptions) = tokio::join!(
        records_service.list_vitals(&user.id, token),
        records_service.list_lab_tests(&user.id, token),
        records_service.list_prescriptions(&user.id, token),
    );

    Json(views::overview(&vitals, &labs, &prescriptions))
}

pub async fn list_vitals(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Json<VitalsView> {
    let records_service = RecordsService::new(&config);

    let vitals = records_service.list_vitals(&user.id, user.token.as_deref()).await;
    Json(views::vitals_view(vitals))
}

pub async fn add_vital(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(input): Json<NewVital>,
) -> Result<(StatusCode, Json<Vital>), AppError> {
    input.validate().map_err(AppError::ValidationError)?;
    let records_service = RecordsService::new(&config);

    let vital = records_service.add_vital(&user.id, input, user.token.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(vital)))
}

pub async fn list_lab_tests(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Query(query): Query<LabsQuery>,
) -> Json<LabsView> {
    debug!("Lab tests requested for category {:?}", query.category);
    let records_service = RecordsService::new(&config);

    let labs = records_service.list_lab_tests(&user.id, user.token.as_deref()).await;
    Json(views::labs_view(labs, query.category.as_deref()))
}

pub async fn add_lab_test(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(input): Json<NewLabTest>,
) -> Result<(StatusCode, Json<LabTest>), AppError> {
    input.validate().map_err(AppError::ValidationError)?;
    let records_service = RecordsService::new(&config);

    let lab_test = records_service.add_lab_test(&user.id, input, user.token.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(lab_test)))
}

pub async fn list_prescriptions(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Json<PrescriptionsView> {
    let records_service = RecordsService::new(&config);

    let prescriptions = records_service.list_prescriptions(&user.id, user.token.as_deref()).await;
    Json(views::prescriptions_view(prescriptions))
}

pub async fn add_prescription(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(input): Json<NewPrescription>,
) -> Result<(StatusCode, Json<Prescription>), AppError> {
    input.validate().map_err(AppError::ValidationError)?;
    let records_service = RecordsService::new(&config);

    let prescription = records_service.add_prescription(&user.id, input, user.token.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(prescription)))
}
