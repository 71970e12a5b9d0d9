use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::auth::{parse_address, parse_emergency_contact, Address, EmergencyContact, User};
use shared_models::error::AppError;
use shared_utils::validation::{age_on, is_valid_email, parse_date, MIN_PASSWORD_LENGTH};

pub const EMAIL_NOT_FOUND: &str = "Email not found. Please check your email or register.";
pub const INVALID_PASSWORD: &str = "Invalid password. Please try again.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials and try again.";
pub const EMAIL_TAKEN: &str = "Email already registered";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub date_of_birth: String,
}

impl RegistrationForm {
    /// First failing rule wins, in the order the form presents them.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err("Please fill in all required fields".to_string());
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
        }

        if self.password != self.confirm_password {
            return Err("Passwords do not match".to_string());
        }

        if !is_valid_email(&self.email) {
            return Err("Please enter a valid email address".to_string());
        }

        Ok(())
    }

    pub fn into_registration(self) -> NewRegistration {
        NewRegistration {
            name: self.name,
            email: self.email,
            password: self.password,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            gender: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
}

/// Partial profile changes; `None` leaves the current value in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<Address>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub insurance: Option<String>,
    pub insurance_id: Option<String>,
}

impl ProfileUpdate {
    pub fn apply_to(self, user: &User) -> User {
        let mut merged = user.clone();
        if let Some(name) = self.name {
            merged.name = name;
        }
        if let Some(email) = self.email {
            merged.email = email;
        }
        if let Some(phone) = self.phone {
            merged.phone = phone;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            merged.date_of_birth = date_of_birth;
        }
        if let Some(gender) = self.gender {
            merged.gender = gender;
        }
        if let Some(address) = self.address {
            merged.address = address;
        }
        if let Some(blood_group) = self.blood_group {
            merged.blood_group = blood_group;
        }
        if let Some(contact) = self.emergency_contact {
            merged.emergency_contact = contact;
        }
        if self.insurance.is_some() {
            merged.insurance = self.insurance;
        }
        if self.insurance_id.is_some() {
            merged.insurance_id = self.insurance_id;
        }
        merged
    }
}

/// The flat, human-edited profile form: address as "street, city, STATE ZIP"
/// and emergency contact as "name - phone".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub address: String,
    pub emergency_contact: String,
    pub blood_type: String,
    pub insurance: String,
    pub insurance_id: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        let address = if user.address.street.is_empty() {
            String::new()
        } else {
            format!(
                "{}, {}, {} {}",
                user.address.street, user.address.city, user.address.state, user.address.zip_code
            )
        };

        let emergency_contact = if user.emergency_contact.name.is_empty() {
            String::new()
        } else {
            format!("{} - {}", user.emergency_contact.name, user.emergency_contact.phone)
        };

        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            date_of_birth: user.date_of_birth.clone(),
            address,
            emergency_contact,
            blood_type: user.blood_group.clone(),
            insurance: user.insurance.clone().unwrap_or_default(),
            insurance_id: user.insurance_id.clone().unwrap_or_default(),
        }
    }

    /// Unparseable address or contact strings keep the user's current structured values.
    pub fn into_update(self, current: &User) -> ProfileUpdate {
        ProfileUpdate {
            name: Some(self.name),
            email: Some(self.email),
            phone: Some(self.phone),
            date_of_birth: Some(self.date_of_birth),
            gender: None,
            address: Some(parse_address(&self.address).unwrap_or_else(|| current.address.clone())),
            blood_group: Some(self.blood_type),
            emergency_contact: Some(
                parse_emergency_contact(&self.emergency_contact, &current.emergency_contact)
                    .unwrap_or_else(|| current.emergency_contact.clone()),
            ),
            insurance: Some(self.insurance),
            insurance_id: Some(self.insurance_id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: User,
    pub form: ProfileForm,
    pub age: Option<i32>,
}

impl ProfileView {
    pub fn new(user: User, today: NaiveDate) -> Self {
        let age = parse_date(&user.date_of_birth)
            .map(|dob| age_on(dob, today))
            .filter(|age| *age >= 0);
        Self {
            form: ProfileForm::from_user(&user),
            user,
            age,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{}", EMAIL_NOT_FOUND)]
    EmailNotFound,

    #[error("{}", INVALID_PASSWORD)]
    InvalidPassword,

    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("{}", EMAIL_TAKEN)]
    EmailAlreadyRegistered,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("{0}")]
    Backend(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailNotFound
            | AuthError::InvalidPassword
            | AuthError::InvalidCredentials
            | AuthError::NotAuthenticated => AppError::Auth(err.to_string()),
            AuthError::EmailAlreadyRegistered => AppError::Conflict(err.to_string()),
            AuthError::Backend(msg) => AppError::ExternalService(msg),
        }
    }
}
