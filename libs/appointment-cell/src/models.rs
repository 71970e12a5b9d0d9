use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use shared_models::error::AppError;
use shared_models::ids::{optional_string_or_number, string_or_number};
use shared_utils::validation::parse_date;

pub const BOOKING_SUCCEEDED: &str = "Appointment booked successfully!";
pub const BOOKING_FAILED: &str = "Failed to book appointment. Please try again.";
pub const CANCEL_SUCCEEDED: &str = "Appointment cancelled successfully";
pub const CANCEL_FAILED: &str = "Failed to cancel appointment";

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appointment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub doctor_id: Option<String>,
    pub doctor_name: String,
    pub specialty: String,
    pub hospital: String,
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub visit_type: VisitType,
    pub status: AppointmentStatus,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub reason: String,
    pub symptoms: String,
    pub medications: String,
    pub insurance_provider: String,
    pub insurance_id: String,
    pub consultation_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
}

impl Appointment {
    /// Calendar day of the visit; `None` when the backend sent something unparseable.
    pub fn day(&self) -> Option<NaiveDate> {
        let date = self.date.get(..10).unwrap_or(&self.date);
        parse_date(date)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Upcoming,
    Completed,
    Cancelled,
    Other,
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let status = Option::<String>::deserialize(deserializer)?;
        Ok(match status.as_deref().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("upcoming") => AppointmentStatus::Upcoming,
            Some("completed") => AppointmentStatus::Completed,
            Some("cancelled") | Some("canceled") => AppointmentStatus::Cancelled,
            Some(_) => AppointmentStatus::Other,
        })
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Upcoming => write!(f, "upcoming"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitType {
    #[default]
    InPerson,
    Telemedicine,
}

impl VisitType {
    /// Lenient reading of the labels the backend has used over time
    /// ("in-person", "In-person", "telemedicine", "Video Call", ...).
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        if label.contains("video") || label.contains("tele") || label.contains("virtual") {
            VisitType::Telemedicine
        } else {
            VisitType::InPerson
        }
    }
}

impl<'de> Deserialize<'de> for VisitType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map(|l| VisitType::from_label(&l)).unwrap_or_default())
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitType::InPerson => write!(f, "in-person"),
            VisitType::Telemedicine => write!(f, "telemedicine"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// The record sent to `POST /appointments` when a booking is confirmed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub id: String,
    pub user_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub specialty: String,
    pub hospital: String,
    pub location: String,
    pub consultation_fee: Option<f64>,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub visit_type: VisitType,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub reason: String,
    pub symptoms: String,
    pub medications: String,
    pub insurance_provider: String,
    pub insurance_id: String,
    pub status: AppointmentStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentLists {
    pub upcoming: Vec<Appointment>,
    pub past: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentError {
    #[error("{}", CANCEL_FAILED)]
    CancelFailed,

    #[error("{}", BOOKING_FAILED)]
    BookingFailed,
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_appointment_from_backend_row() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": 1700000000000u64,
            "userId": 1,
            "doctorId": "2",
            "doctorName": "Dr. John Davis",
            "date": "2026-03-01",
            "time": "02:00 PM",
            "type": "telemedicine",
            "status": "completed",
            "consultationFee": 120
        }))
        .unwrap();

        assert_eq!(appointment.id, "1700000000000");
        assert_eq!(appointment.user_id.as_deref(), Some("1"));
        assert_eq!(appointment.visit_type, VisitType::Telemedicine);
        assert_eq!(appointment.status, AppointmentStatus::Completed);
        assert_eq!(appointment.day(), NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_unknown_status_and_timestamp_dates() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": "a",
            "date": "2026-03-01T00:00:00.000Z",
            "status": "rescheduled"
        }))
        .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Other);
        assert_eq!(appointment.visit_type, VisitType::InPerson);
        assert_eq!(appointment.day(), NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_visit_type_wire_names() {
        assert_eq!(serde_json::to_value(VisitType::InPerson).unwrap(), json!("in-person"));
        assert_eq!(VisitType::Telemedicine.to_string(), "telemedicine");
    }

    #[test]
    fn test_legacy_labels_do_not_sink_the_list() {
        let appointments: Vec<Appointment> = serde_json::from_value(json!([
            { "id": 1, "date": "2026-02-10", "type": "In-person", "status": "upcoming" },
            { "id": 2, "date": "2026-02-15", "type": "Video Call", "status": "Upcoming" },
            { "id": 3, "date": "2026-01-28", "type": null, "status": "Canceled" }
        ]))
        .unwrap();

        assert_eq!(appointments.len(), 3);
        assert_eq!(appointments[0].visit_type, VisitType::InPerson);
        assert_eq!(appointments[1].visit_type, VisitType::Telemedicine);
        assert_eq!(appointments[1].status, AppointmentStatus::Upcoming);
        assert_eq!(appointments[2].visit_type, VisitType::InPerson);
        assert_eq!(appointments[2].status, AppointmentStatus::Cancelled);
    }
}
