use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::ids::{optional_string_or_number, string_or_number};
use shared_utils::validation::{is_blank, parse_date};

// ==============================================================================
// RECORD MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloodPressure {
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vital {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    pub date: String,
    pub blood_pressure: BloodPressure,
    pub heart_rate: Option<f64>,
    pub blood_sugar: Option<f64>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub recorded_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabResult {
    pub parameter: String,
    pub value: String,
    pub unit: String,
    #[serde(rename = "range")]
    pub reference_range: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabTest {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    pub date: String,
    pub test_name: String,
    pub category: String,
    pub status: String,
    pub results: Vec<LabResult>,
    pub ordered_by: String,
    pub lab: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Prescription {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub user_id: Option<String>,
    pub date: String,
    pub medication: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub prescribed_by: String,
    pub status: String,
    pub purpose: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Prescription {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Calendar day of a record, tolerating full timestamps.
pub fn record_day(date: &str) -> Option<NaiveDate> {
    parse_date(date.get(..10).unwrap_or(date))
}

// ==============================================================================
// NEW RECORD INPUTS
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewVital {
    pub date: String,
    pub blood_pressure: BloodPressure,
    pub heart_rate: Option<f64>,
    pub blood_sugar: Option<f64>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub recorded_by: String,
}

impl NewVital {
    pub fn validate(&self) -> Result<(), String> {
        validate_date(&self.date)
    }

    pub fn into_vital(self, id: String, user_id: &str, created_at: String) -> Vital {
        Vital {
            id,
            user_id: Some(user_id.to_string()),
            date: self.date,
            blood_pressure: self.blood_pressure,
            heart_rate: self.heart_rate,
            blood_sugar: self.blood_sugar,
            temperature: self.temperature,
            weight: self.weight,
            recorded_by: self.recorded_by,
            created_at: Some(created_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewLabTest {
    pub date: String,
    pub test_name: String,
    pub category: String,
    pub status: String,
    pub results: Vec<LabResult>,
    pub ordered_by: String,
    pub lab: String,
}

impl NewLabTest {
    pub fn validate(&self) -> Result<(), String> {
        validate_date(&self.date)?;
        if is_blank(&self.test_name) {
            return Err("Test name is required".to_string());
        }
        Ok(())
    }

    pub fn into_lab_test(self, id: String, user_id: &str, created_at: String) -> LabTest {
        LabTest {
            id,
            user_id: Some(user_id.to_string()),
            date: self.date,
            test_name: self.test_name,
            category: self.category,
            status: self.status,
            results: self.results,
            ordered_by: self.ordered_by,
            lab: self.lab,
            created_at: Some(created_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPrescription {
    pub date: String,
    pub medication: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub prescribed_by: String,
    pub status: String,
    pub purpose: String,
}

impl NewPrescription {
    pub fn validate(&self) -> Result<(), String> {
        validate_date(&self.date)?;
        if is_blank(&self.medication) {
            return Err("Medication is required".to_string());
        }
        Ok(())
    }

    pub fn into_prescription(self, id: String, user_id: &str, created_at: String) -> Prescription {
        Prescription {
            id,
            user_id: Some(user_id.to_string()),
            date: self.date,
            medication: self.medication,
            dosage: self.dosage,
            frequency: self.frequency,
            duration: self.duration,
            prescribed_by: self.prescribed_by,
            status: if is_blank(&self.status) { "active".to_string() } else { self.status },
            purpose: self.purpose,
            created_at: Some(created_at),
        }
    }
}

fn validate_date(date: &str) -> Result<(), String> {
    if is_blank(date) {
        return Err("Date is required".to_string());
    }
    record_day(date).map(|_| ()).ok_or_else(|| "Please select a valid date".to_string())
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Vital,
    LabTest,
    Prescription,
}

impl RecordKind {
    /// Backend collection holding this kind of record.
    pub fn collection(self) -> &'static str {
        match self {
            RecordKind::Vital => "/vitals",
            RecordKind::LabTest => "/labTests",
            RecordKind::Prescription => "/prescriptions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Vital => "vital signs",
            RecordKind::LabTest => "lab test",
            RecordKind::Prescription => "prescription",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordsError {
    #[error("Failed to save {}", .0.label())]
    SaveFailed(RecordKind),
}

impl From<RecordsError> for AppError {
    fn from(err: RecordsError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vital_accepts_numeric_id() {
        let vital: Vital = serde_json::from_value(json!({
            "id": 7,
            "date": "2026-02-01",
            "bloodPressure": { "systolic": 120, "diastolic": 80 },
            "heartRate": 72
        }))
        .unwrap();

        assert_eq!(vital.id, "7");
        assert_eq!(vital.blood_pressure.systolic, Some(120.0));
        assert_eq!(vital.weight, None);
    }

    #[test]
    fn test_lab_result_keeps_range_key() {
        let result = LabResult {
            parameter: "TSH".to_string(),
            reference_range: "0.4-4.0".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["range"], "0.4-4.0");
    }

    #[test]
    fn test_new_record_validation() {
        let vital = NewVital { date: "yesterday".to_string(), ..Default::default() };
        assert_eq!(vital.validate(), Err("Please select a valid date".to_string()));

        let lab = NewLabTest { date: "2026-02-01".to_string(), ..Default::default() };
        assert_eq!(lab.validate(), Err("Test name is required".to_string()));

        let prescription = NewPrescription {
            date: "2026-02-01".to_string(),
            medication: "Lisinopril".to_string(),
            ..Default::default()
        };
        assert!(prescription.validate().is_ok());
        let stored = prescription.into_prescription("9".to_string(), "1", "now".to_string());
        assert!(stored.is_active());
    }

    #[test]
    fn test_save_failure_message() {
        let err: AppError = RecordsError::SaveFailed(RecordKind::LabTest).into();
        assert_eq!(err.message(), "Failed to save lab test");
    }
}
