use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;
use shared_database::rest::RestClient;
use shared_utils::clock::iso_timestamp;

use crate::models::{Appointment, AppointmentError, BookingRequest};

pub struct AppointmentService {
    api: RestClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: RestClient::new(config),
        }
    }

    pub async fn fetch_appointments(&self, user_id: Option<&str>, auth_token: Option<&str>) -> Result<Vec<Appointment>> {
        let path = match user_id {
            Some(id) if !id.is_empty() => format!("/appointments?userId={}", id),
            _ => "/appointments".to_string(),
        };
        debug!("Fetching appointments from {}", path);
        self.api.get(&path, auth_token).await
    }

    /// The patient's appointments, or an empty list when the backend cannot be reached.
    pub async fn list_for_user(&self, user_id: &str, auth_token: Option<&str>) -> Vec<Appointment> {
        match self.fetch_appointments(Some(user_id), auth_token).await {
            Ok(appointments) => appointments,
            Err(e) => {
                warn!("Appointments unavailable for {}, showing none: {}", user_id, e);
                Vec::new()
            }
        }
    }

    pub async fn book(&self, request: &BookingRequest, auth_token: Option<&str>) -> Result<Appointment, AppointmentError> {
        debug!("Booking appointment with doctor {} on {} {}", request.doctor_id, request.date, request.time);

        let body = serde_json::to_value(request).map_err(|e| {
            error!("Failed to encode booking: {}", e);
            AppointmentError::BookingFailed
        })?;

        let created: Appointment = self.api.post("/appointments", auth_token, body).await.map_err(|e| {
            error!("Error booking appointment: {}", e);
            AppointmentError::BookingFailed
        })?;

        info!("Appointment {} booked", created.id);
        Ok(created)
    }

    pub async fn cancel(
        &self,
        appointment_id: &str,
        now: DateTime<Utc>,
        auth_token: Option<&str>,
    ) -> Result<Value, AppointmentError> {
        debug!("Cancelling appointment {}", appointment_id);

        let path = format!("/appointments/{}", appointment_id);
        let body = json!({
            "status": "cancelled",
            "cancelledAt": iso_timestamp(now),
        });

        let updated: Value = self.api.patch(&path, auth_token, body).await.map_err(|e| {
            error!("Error cancelling appointment {}: {}", appointment_id, e);
            AppointmentError::CancelFailed
        })?;

        info!("Appointment {} cancelled", appointment_id);
        Ok(updated)
    }
}
