use anyhow::Result;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::rest::RestClient;

use crate::models::{Doctor, DoctorError, DoctorFacets, DoctorFilters};
use crate::services::search;

pub struct DoctorService {
    api: RestClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: RestClient::new(config),
        }
    }

    pub async fn fetch_doctors(&self, auth_token: Option<&str>) -> Result<Vec<Doctor>> {
        debug!("Fetching doctor catalog");
        self.api.get("/doctors", auth_token).await
    }

    /// The full catalog, or an empty list when the backend cannot be reached.
    pub async fn list_doctors(&self, auth_token: Option<&str>) -> Vec<Doctor> {
        match self.fetch_doctors(auth_token).await {
            Ok(doctors) => doctors,
            Err(e) => {
                warn!("Doctor catalog unavailable, showing none: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn search_doctors(&self, filters: &DoctorFilters, auth_token: Option<&str>) -> Vec<Doctor> {
        let doctors = self.list_doctors(auth_token).await;
        let result = search::filter_doctors(&doctors, filters);
        debug!("Doctor search matched {} of {}", result.len(), doctors.len());
        result
    }

    pub async fn get_doctor(&self, doctor_id: &str, auth_token: Option<&str>) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        let path = format!("/doctors/{}", doctor_id);
        self.api.get(&path, auth_token).await.map_err(|e| {
            let message = e.to_string();
            if message.starts_with("Resource not found") {
                DoctorError::NotFound
            } else {
                warn!("Failed to fetch doctor {}: {}", doctor_id, message);
                DoctorError::Unavailable
            }
        })
    }

    pub async fn facets(&self, auth_token: Option<&str>) -> DoctorFacets {
        search::facets(&self.list_doctors(auth_token).await)
    }

    pub async fn top_rated(&self, limit: usize, auth_token: Option<&str>) -> Vec<Doctor> {
        search::top_rated(&self.list_doctors(auth_token).await, limit)
    }

    pub async fn available_today(&self, auth_token: Option<&str>) -> Vec<Doctor> {
        search::available_today(&self.list_doctors(auth_token).await)
    }
}
