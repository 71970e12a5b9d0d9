use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use doctor_cell::DoctorService;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::clock::Clock;

use crate::models::{ActionResult, Appointment, AppointmentLists, BOOKING_SUCCEEDED, CANCEL_SUCCEEDED};
use crate::services::booking::DraftUpdate;
use crate::services::dashboard::{self, DashboardSummary};
use crate::services::{partition, AppointmentService, BookingError, BookingStep, BookingWizard, WizardView};

/// Shared by the appointment, booking and dashboard routes. At most one
/// booking is in progress per portal session.
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
    pub booking: Mutex<Option<BookingWizard>>,
}

impl AppointmentState {
    pub fn new(config: Arc<AppConfig>, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            config,
            clock,
            booking: Mutex::new(None),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StartBookingQuery {
    pub doctor_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectDoctorRequest {
    pub doctor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectTimeRequest {
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    pub redirect: String,
    pub appointment: Appointment,
}

// ==============================================================================
// APPOINTMENT LIST AND DASHBOARD
// ==============================================================================

pub async fn list_appointments(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Json<AppointmentLists> {
    let appointment_service = AppointmentService::new(&state.config);

    let appointments = appointment_service.list_for_user(&user.id, user.token.as_deref()).await;
    Json(partition::partition(&appointments, state.clock.today()))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
) -> Result<Json<ActionResult>, AppError> {
    let appointment_service = AppointmentService::new(&state.config);

    appointment_service
        .cancel(&appointment_id, state.clock.now_utc(), user.token.as_deref())
        .await?;

    Ok(Json(ActionResult {
        success: true,
        message: CANCEL_SUCCEEDED.to_string(),
        redirect: None,
    }))
}

pub async fn get_dashboard(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Json<DashboardSummary> {
    let appointment_service = AppointmentService::new(&state.config);

    let appointments = appointment_service.list_for_user(&user.id, user.token.as_deref()).await;
    Json(dashboard::build_summary(&user, &appointments, state.clock.now()))
}

// ==============================================================================
// BOOKING WIZARD
// ==============================================================================

async fn render(state: &AppointmentState, wizard: &BookingWizard, user: &User) -> WizardView {
    let needs_choices = wizard.step() == BookingStep::SelectDoctor && wizard.draft().doctor.id.is_empty();
    let doctors = if needs_choices {
        DoctorService::new(&state.config)
            .list_doctors(user.token.as_deref())
            .await
    } else {
        Vec::new()
    };
    wizard.view(state.clock.today(), &doctors)
}

pub async fn start_booking(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Query(query): Query<StartBookingQuery>,
) -> Json<WizardView> {
    let preselected = match query.doctor_id.as_deref().filter(|id| !id.is_empty()) {
        Some(doctor_id) => {
            match DoctorService::new(&state.config)
                .get_doctor(doctor_id, user.token.as_deref())
                .await
            {
                Ok(doctor) => Some(doctor),
                Err(e) => {
                    warn!("Preselected doctor {} unavailable: {}", doctor_id, e);
                    None
                }
            }
        }
        None => None,
    };

    let wizard = BookingWizard::new(Some(&user), preselected.as_ref());
    let view = render(&state, &wizard, &user).await;

    *state.booking.lock().await = Some(wizard);
    debug!("Booking started for {}", user.id);
    Json(view)
}

pub async fn get_booking(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Result<Json<WizardView>, AppError> {
    let booking = state.booking.lock().await;
    let wizard = booking.as_ref().ok_or(BookingError::NoActiveBooking)?;
    Ok(Json(render(&state, wizard, &user).await))
}

pub async fn abandon_booking(State(state): State<Arc<AppointmentState>>) -> Json<Value> {
    let abandoned = state.booking.lock().await.take().is_some();
    if abandoned {
        info!("Booking abandoned");
    }
    Json(json!({ "success": true }))
}

pub async fn update_draft(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Json(update): Json<DraftUpdate>,
) -> Result<Json<WizardView>, AppError> {
    let mut booking = state.booking.lock().await;
    let wizard = booking.as_mut().ok_or(BookingError::NoActiveBooking)?;

    wizard.update(update);
    Ok(Json(render(&state, wizard, &user).await))
}

pub async fn select_doctor(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Json(request): Json<SelectDoctorRequest>,
) -> Result<Json<WizardView>, AppError> {
    let mut booking = state.booking.lock().await;
    let wizard = booking.as_mut().ok_or(BookingError::NoActiveBooking)?;

    let doctor = DoctorService::new(&state.config)
        .get_doctor(&request.doctor_id, user.token.as_deref())
        .await?;

    wizard.select_doctor(&doctor);
    Ok(Json(render(&state, wizard, &user).await))
}

pub async fn change_doctor(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Result<Json<WizardView>, AppError> {
    let mut booking = state.booking.lock().await;
    let wizard = booking.as_mut().ok_or(BookingError::NoActiveBooking)?;

    wizard.change_doctor();
    Ok(Json(render(&state, wizard, &user).await))
}

pub async fn select_time(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Json(request): Json<SelectTimeRequest>,
) -> Result<Json<WizardView>, AppError> {
    let mut booking = state.booking.lock().await;
    let wizard = booking.as_mut().ok_or(BookingError::NoActiveBooking)?;

    wizard.select_time(&request.time);
    Ok(Json(render(&state, wizard, &user).await))
}

pub async fn next_step(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Result<Json<WizardView>, AppError> {
    let mut booking = state.booking.lock().await;
    let wizard = booking.as_mut().ok_or(BookingError::NoActiveBooking)?;

    wizard.next(state.clock.today());
    Ok(Json(render(&state, wizard, &user).await))
}

pub async fn prev_step(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Result<Json<WizardView>, AppError> {
    let mut booking = state.booking.lock().await;
    let wizard = booking.as_mut().ok_or(BookingError::NoActiveBooking)?;

    wizard.prev();
    Ok(Json(render(&state, wizard, &user).await))
}

pub async fn submit_booking(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Result<Json<SubmitResponse>, AppError> {
    let mut booking = state.booking.lock().await;
    let wizard = booking.as_mut().ok_or(BookingError::NoActiveBooking)?;

    let request = wizard.prepare_submission(state.clock.today(), &user.id, state.clock.now_utc())?;

    let appointment_service = AppointmentService::new(&state.config);
    match appointment_service.book(&request, user.token.as_deref()).await {
        Ok(appointment) => {
            *booking = None;
            Ok(Json(SubmitResponse {
                success: true,
                message: BOOKING_SUCCEEDED.to_string(),
                redirect: "/appointments".to_string(),
                appointment,
            }))
        }
        Err(_) => {
            wizard.record_submit_failure();
            Err(BookingError::SubmitFailed.into())
        }
    }
}
