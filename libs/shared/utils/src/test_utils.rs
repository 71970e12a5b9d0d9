use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;

pub const DEMO_EMAIL: &str = "demo@healthcare.com";
pub const DEMO_PASSWORD: &str = "Demo123!";

pub struct TestConfig {
    pub api_base_url: String,
    pub session_store_path: String,
    pub generic_credential_errors: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            session_store_path: ".test_session.json".to_string(),
            generic_credential_errors: false,
        }
    }
}

impl TestConfig {
    pub fn with_backend(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            session_store_path: self.session_store_path.clone(),
            port: 0,
            generic_credential_errors: self.generic_credential_errors,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser;

impl TestUser {
    pub fn patient() -> User {
        User {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "555-0123".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            role: Some("patient".to_string()),
            ..User::default()
        }
    }
}

/// Canned backend payloads shaped like the portal's REST backend.
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn user_record(id: &str, name: &str, email: &str, password: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "email": email,
            "password": password,
            "phone": "555-0100",
            "dateOfBirth": "1990-05-15",
            "gender": "",
            "address": { "street": "", "city": "", "state": "", "zipCode": "" },
            "bloodGroup": "",
            "emergencyContact": { "name": "", "relationship": "", "phone": "" },
            "role": "patient",
            "createdAt": "2025-01-15T00:00:00.000Z"
        })
    }

    pub fn users() -> Value {
        json!([
            Self::user_record("1", "Demo User", DEMO_EMAIL, DEMO_PASSWORD),
            Self::user_record("2", "Jane Roe", "jane@example.com", "secret1"),
        ])
    }

    #[allow(clippy::too_many_arguments)]
    pub fn doctor(
        id: &str,
        name: &str,
        specialty: &str,
        hospital: &str,
        location: &str,
        rating: f64,
        experience: u32,
        fee: u32,
        available_today: bool,
    ) -> Value {
        json!({
            "id": id,
            "name": name,
            "specialty": specialty,
            "hospital": hospital,
            "location": location,
            "rating": rating,
            "experience": experience,
            "consultationFee": fee,
            "availableToday": available_today
        })
    }

    pub fn doctors() -> Value {
        json!([
            Self::doctor("1", "Dr. Sarah Smith", "Cardiology", "City Hospital", "New York, NY", 4.8, 15, 150, true),
            Self::doctor("2", "Dr. John Davis", "Orthopedics", "General Hospital", "Los Angeles, CA", 4.6, 10, 120, false),
            Self::doctor("3", "Dr. Emily Johnson", "Pediatrics", "Children's Hospital", "New York, NY", 4.9, 12, 100, true),
        ])
    }

    pub fn appointment(id: &str, doctor_name: &str, date: &str, status: &str) -> Value {
        json!({
            "id": id,
            "userId": "1",
            "doctorId": "1",
            "doctorName": doctor_name,
            "specialty": "Cardiology",
            "date": date,
            "time": "10:00 AM",
            "type": "in-person",
            "status": status,
            "patientName": "John Doe",
            "reason": "Regular checkup",
            "consultationFee": 150
        })
    }

    pub fn vital(id: &str, date: &str, systolic: u32, diastolic: u32, heart_rate: u32) -> Value {
        json!({
            "id": id,
            "userId": "1",
            "date": date,
            "bloodPressure": { "systolic": systolic, "diastolic": diastolic },
            "heartRate": heart_rate,
            "bloodSugar": 95,
            "temperature": 98.6,
            "weight": 165,
            "recordedBy": "Dr. Sarah Johnson"
        })
    }

    pub fn lab_test(id: &str, date: &str, test_name: &str, category: &str) -> Value {
        json!({
            "id": id,
            "userId": "1",
            "date": date,
            "testName": test_name,
            "category": category,
            "status": "completed",
            "results": [
                { "parameter": "Hemoglobin", "value": "14.2", "unit": "g/dL", "range": "13.5-17.5", "status": "normal" }
            ],
            "orderedBy": "Dr. Sarah Johnson",
            "lab": "City Lab"
        })
    }

    pub fn prescription(id: &str, date: &str, medication: &str, status: &str) -> Value {
        json!({
            "id": id,
            "userId": "1",
            "date": date,
            "medication": medication,
            "dosage": "10mg",
            "frequency": "Once daily",
            "duration": "90 days",
            "prescribedBy": "Dr. Sarah Johnson",
            "status": status,
            "purpose": "Blood pressure management"
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({ "message": message })
    }
}
