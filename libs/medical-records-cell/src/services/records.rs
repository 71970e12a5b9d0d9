use anyhow::Result;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::rest::RestClient;
use shared_utils::clock::iso_timestamp;

use crate::models::{
    LabTest, NewLabTest, NewPrescription, NewVital, Prescription, RecordKind, RecordsError, Vital,
};

pub struct RecordsService {
    api: RestClient,
}

impl RecordsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: RestClient::new(config),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, kind: RecordKind, user_id: &str, auth_token: Option<&str>) -> Result<Vec<T>> {
        let path = format!("{}?userId={}", kind.collection(), user_id);
        debug!("Fetching {} from {}", kind.label(), path);
        self.api.get(&path, auth_token).await
    }

    async fn list<T: DeserializeOwned>(&self, kind: RecordKind, user_id: &str, auth_token: Option<&str>) -> Vec<T> {
        match self.fetch(kind, user_id, auth_token).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Error fetching {} for {}, showing none: {}", kind.label(), user_id, e);
                Vec::new()
            }
        }
    }

    async fn add<T>(&self, kind: RecordKind, record: &T, auth_token: Option<&str>) -> Result<T, RecordsError>
    where
        T: Serialize + DeserializeOwned,
    {
        let body = serde_json::to_value(record).map_err(|e| {
            error!("Failed to encode {}: {}", kind.label(), e);
            RecordsError::SaveFailed(kind)
        })?;

        let created: T = self.api.post(kind.collection(), auth_token, body).await.map_err(|e| {
            error!("Error saving {}: {}", kind.label(), e);
            RecordsError::SaveFailed(kind)
        })?;

        info!("Saved new {}", kind.label());
        Ok(created)
    }

    pub async fn list_vitals(&self, user_id: &str, auth_token: Option<&str>) -> Vec<Vital> {
        self.list(RecordKind::Vital, user_id, auth_token).await
    }

    pub async fn list_lab_tests(&self, user_id: &str, auth_token: Option<&str>) -> Vec<LabTest> {
        self.list(RecordKind::LabTest, user_id, auth_token).await
    }

    pub async fn list_prescriptions(&self, user_id: &str, auth_token: Option<&str>) -> Vec<Prescription> {
        self.list(RecordKind::Prescription, user_id, auth_token).await
    }

    pub async fn add_vital(&self, user_id: &str, input: NewVital, auth_token: Option<&str>) -> Result<Vital, RecordsError> {
        let vital = input.into_vital(new_id(), user_id, timestamp());
        self.add(RecordKind::Vital, &vital, auth_token).await
    }

    pub async fn add_lab_test(&self, user_id: &str, input: NewLabTest, auth_token: Option<&str>) -> Result<LabTest, RecordsError> {
        let lab_test = input.into_lab_test(new_id(), user_id, timestamp());
        self.add(RecordKind::LabTest, &lab_test, auth_token).await
    }

    pub async fn add_prescription(
        &self,
        user_id: &str,
        input: NewPrescription,
        auth_token: Option<&str>,
    ) -> Result<Prescription, RecordsError> {
        let prescription = input.into_prescription(new_id(), user_id, timestamp());
        self.add(RecordKind::Prescription, &prescription, auth_token).await
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn timestamp() -> String {
    iso_timestamp(Utc::now())
}
