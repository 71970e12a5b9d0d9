use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::ids::string_or_number;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub hospital: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
    #[serde(default, alias = "availability")]
    pub available_today: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_available: Option<String>,
}

impl Doctor {
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    pub fn experience_or_zero(&self) -> u32 {
        self.experience.unwrap_or(0)
    }

    pub fn fee_or_zero(&self) -> f64 {
        self.consultation_fee.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Rating,
    Experience,
    Fee,
}

/// Every populated field narrows the result; empty strings count as unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorFilters {
    pub search: Option<String>,
    pub specialty: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub available_today: bool,
    pub sort_by: Option<SortKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorSearchResponse {
    pub doctors: Vec<Doctor>,
    pub total: usize,
}

impl From<Vec<Doctor>> for DoctorSearchResponse {
    fn from(doctors: Vec<Doctor>) -> Self {
        Self {
            total: doctors.len(),
            doctors,
        }
    }
}

/// Choices for the specialty and location dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DoctorFacets {
    pub specialties: Vec<String>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor information is unavailable right now")]
    Unavailable,
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::Unavailable => AppError::ExternalService(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_doctor_accepts_numeric_id_and_availability_alias() {
        let doctor: Doctor = serde_json::from_value(json!({
            "id": 4,
            "name": "Dr. Ana Lee",
            "specialty": "Dermatology",
            "availability": true
        }))
        .unwrap();

        assert_eq!(doctor.id, "4");
        assert!(doctor.available_today);
        assert_eq!(doctor.rating_or_zero(), 0.0);
        assert_eq!(doctor.experience_or_zero(), 0);
    }

    #[test]
    fn test_sort_key_parses_lowercase() {
        let filters: DoctorFilters = serde_json::from_value(json!({ "sort_by": "fee" })).unwrap();
        assert_eq!(filters.sort_by, Some(SortKey::Fee));
        assert!(!filters.available_today);
    }

    #[test]
    fn test_doctor_errors_map_to_responses() {
        let missing: AppError = DoctorError::NotFound.into();
        assert_eq!(missing.message(), "Doctor not found");
        assert_eq!(missing.status(), axum::http::StatusCode::NOT_FOUND);

        let down: AppError = DoctorError::Unavailable.into();
        assert_eq!(down.status(), axum::http::StatusCode::BAD_GATEWAY);
    }
}
