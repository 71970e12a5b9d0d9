use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::rest::RestClient;
use shared_database::storage::KeyValueStorage;
use shared_models::auth::{Address, EmergencyContact, User, UserRecord};
use shared_utils::clock::iso_timestamp;

use crate::models::{
    AuthError, NewRegistration, ProfileUpdate, LOGIN_FAILED, PROFILE_UPDATE_FAILED, REGISTRATION_FAILED,
};

/// Storage key under which the signed-in user is persisted.
pub const SESSION_KEY: &str = "healthcare_user";

/// The portal's single source of truth for who is signed in.
///
/// Lifecycle: [`SessionStore::restore`] is the init step (reads any persisted
/// session), [`SessionStore::logout`] is the teardown step (clears memory and
/// storage). Every other read goes through [`SessionStore::current_user`].
pub struct SessionStore {
    api: RestClient,
    storage: Arc<dyn KeyValueStorage>,
    user: RwLock<Option<User>>,
    generic_credential_errors: bool,
}

impl SessionStore {
    pub async fn restore(config: &AppConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let user = match storage.get(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!("Restored session for {}", user.email);
                    Some(user)
                }
                Err(e) => {
                    warn!("Discarding unreadable stored session: {}", e);
                    if let Err(e) = storage.remove(SESSION_KEY).await {
                        error!("Failed to clear stored session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("Failed to read stored session: {}", e);
                None
            }
        };

        Self {
            api: RestClient::new(config),
            storage,
            user: RwLock::new(user),
            generic_credential_errors: config.generic_credential_errors,
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let normalized_email = email.trim().to_lowercase();
        let normalized_password = password.trim();
        debug!("Attempting login for {}", normalized_email);

        let users = self.fetch_users().await.map_err(|e| {
            error!("Login lookup failed: {}", e);
            AuthError::Backend(LOGIN_FAILED.to_string())
        })?;

        let record = users
            .into_iter()
            .find(|u| u.user.email.to_lowercase() == normalized_email)
            .ok_or_else(|| {
                debug!("Email not found: {}", normalized_email);
                self.credential_error(AuthError::EmailNotFound)
            })?;

        if record.password != normalized_password {
            debug!("Password mismatch for {}", normalized_email);
            return Err(self.credential_error(AuthError::InvalidPassword));
        }

        let user = record.without_password();
        self.establish(user.clone()).await;
        info!("Login successful for {}", user.email);
        Ok(user)
    }

    pub async fn register(&self, registration: NewRegistration) -> Result<User, AuthError> {
        debug!("Starting registration for {}", registration.email);

        let users = self.fetch_users().await.map_err(|e| {
            error!("Registration lookup failed: {}", e);
            AuthError::Backend(REGISTRATION_FAILED.to_string())
        })?;

        // Exact match: differs from login, which ignores case.
        if users.iter().any(|u| u.user.email == registration.email) {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let new_user = json!({
            "id": Uuid::new_v4().to_string(),
            "email": registration.email,
            "password": registration.password,
            "name": registration.name,
            "phone": registration.phone,
            "dateOfBirth": registration.date_of_birth,
            "gender": registration.gender,
            "address": Address::default(),
            "bloodGroup": "",
            "emergencyContact": EmergencyContact::default(),
            "createdAt": iso_timestamp(Utc::now()),
        });

        let created: UserRecord = self.api.post("/users", None, new_user).await.map_err(|e| {
            error!("Failed to create user: {}", e);
            AuthError::Backend(REGISTRATION_FAILED.to_string())
        })?;

        let user = created.without_password();
        self.establish(user.clone()).await;
        info!("Registration complete, {} signed in", user.email);
        Ok(user)
    }

    pub async fn logout(&self) {
        let previous = self.user.write().await.take();
        if let Err(e) = self.storage.remove(SESSION_KEY).await {
            error!("Failed to clear stored session: {}", e);
        }
        if let Some(user) = previous {
            info!("Logged out {}", user.email);
        }
    }

    /// Memory and storage change only after the backend accepts the update.
    /// The row is written back whole, so the stored password is read first
    /// and sent along unchanged.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, AuthError> {
        let current = self.current_user().await.ok_or(AuthError::NotAuthenticated)?;
        let merged = update.apply_to(&current);

        let path = format!("/users/{}", current.id);
        let stored: UserRecord = self.api.get(&path, current.token.as_deref()).await.map_err(|e| {
            error!("Failed to load user {} for update: {}", current.id, e);
            AuthError::Backend(PROFILE_UPDATE_FAILED.to_string())
        })?;

        let record = UserRecord {
            user: User {
                token: None,
                ..merged.clone()
            },
            password: stored.password,
        };
        let body = serde_json::to_value(&record).map_err(|e| {
            error!("Failed to encode profile: {}", e);
            AuthError::Backend(PROFILE_UPDATE_FAILED.to_string())
        })?;

        let _: Value = self
            .api
            .put(&path, current.token.as_deref(), body)
            .await
            .map_err(|e| {
                error!("Update profile error: {}", e);
                AuthError::Backend(PROFILE_UPDATE_FAILED.to_string())
            })?;

        self.establish(merged.clone()).await;
        debug!("Profile updated for {}", merged.id);
        Ok(merged)
    }

    async fn fetch_users(&self) -> anyhow::Result<Vec<UserRecord>> {
        self.api.get("/users", None).await
    }

    async fn establish(&self, user: User) {
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(SESSION_KEY, &raw).await {
                    error!("Failed to persist session: {}", e);
                }
            }
            Err(e) => error!("Failed to encode session: {}", e),
        }
        *self.user.write().await = Some(user);
    }

    fn credential_error(&self, err: AuthError) -> AuthError {
        if self.generic_credential_errors {
            AuthError::InvalidCredentials
        } else {
            err
        }
    }
}
