use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::clock::iso_timestamp;
use shared_utils::validation::{is_blank, is_plausible_email, parse_date};

use crate::models::{AppointmentStatus, BookingRequest, VisitType, BOOKING_FAILED};

pub const TOTAL_STEPS: u8 = 4;

/// Bookable half-hour slots, morning then afternoon.
pub const TIME_SLOTS: [&str; 12] = [
    "09:00 AM", "09:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM",
    "02:00 PM", "02:30 PM", "03:00 PM", "03:30 PM", "04:00 PM", "04:30 PM",
];

const DOCTOR_CHOICES: usize = 6;

/// Field key → message. Keys use the backend's camelCase field names.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

type StepValidator = fn(&BookingDraft, NaiveDate) -> FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    SelectDoctor,
    SelectDateTime,
    PatientInfo,
    Confirm,
}

impl BookingStep {
    pub fn number(self) -> u8 {
        match self {
            BookingStep::SelectDoctor => 1,
            BookingStep::SelectDateTime => 2,
            BookingStep::PatientInfo => 3,
            BookingStep::Confirm => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BookingStep::SelectDoctor => "Select a Doctor",
            BookingStep::SelectDateTime => "Select Date & Time",
            BookingStep::PatientInfo => "Patient Information",
            BookingStep::Confirm => "Confirm Your Appointment",
        }
    }

    /// Saturates at the confirmation step.
    pub fn next(self) -> Self {
        match self {
            BookingStep::SelectDoctor => BookingStep::SelectDateTime,
            BookingStep::SelectDateTime => BookingStep::PatientInfo,
            BookingStep::PatientInfo | BookingStep::Confirm => BookingStep::Confirm,
        }
    }

    /// Saturates at the first step.
    pub fn prev(self) -> Self {
        match self {
            BookingStep::SelectDoctor | BookingStep::SelectDateTime => BookingStep::SelectDoctor,
            BookingStep::PatientInfo => BookingStep::SelectDateTime,
            BookingStep::Confirm => BookingStep::PatientInfo,
        }
    }

    fn validator(self) -> Option<StepValidator> {
        match self {
            BookingStep::SelectDoctor => Some(validate_doctor),
            BookingStep::SelectDateTime => Some(validate_schedule),
            BookingStep::PatientInfo => Some(validate_patient),
            BookingStep::Confirm => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRef {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub location: String,
    pub hospital: String,
    pub consultation_fee: Option<f64>,
}

impl From<&Doctor> for DoctorRef {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            specialty: doctor.specialty.clone(),
            location: doctor.location.clone(),
            hospital: doctor.hospital.clone(),
            consultation_fee: doctor.consultation_fee,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub doctor: DoctorRef,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub visit_type: VisitType,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub date_of_birth: String,
    pub insurance_provider: String,
    pub insurance_id: String,
    pub reason: String,
    pub symptoms: String,
    pub medications: String,
}

/// Field edits from the form. Each present field replaces the draft value
/// and clears that field's error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftUpdate {
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub visit_type: Option<VisitType>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_id: Option<String>,
    pub reason: Option<String>,
    pub symptoms: Option<String>,
    pub medications: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    Polite,
    Assertive,
}

/// Message for assistive technology describing the latest wizard change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
}

impl Announcement {
    fn polite(message: String) -> Self {
        Self {
            message,
            politeness: Politeness::Polite,
        }
    }

    fn assertive(message: &str) -> Self {
        Self {
            message: message.to_string(),
            politeness: Politeness::Assertive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("No booking in progress")]
    NoActiveBooking,

    #[error("Appointments can only be submitted from the confirmation step")]
    NotAtConfirmation,

    #[error("Please fix errors before continuing")]
    Invalid(FieldErrors),

    #[error("{}", BOOKING_FAILED)]
    SubmitFailed,
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NoActiveBooking => AppError::NotFound(err.to_string()),
            BookingError::NotAtConfirmation => AppError::BadRequest(err.to_string()),
            BookingError::Invalid(_) => AppError::ValidationError(err.to_string()),
            BookingError::SubmitFailed => AppError::ExternalService(err.to_string()),
        }
    }
}

fn validate_doctor(draft: &BookingDraft, _today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.doctor.id.is_empty() {
        errors.insert("doctorId", "Please select a doctor");
    }
    errors
}

fn validate_schedule(draft: &BookingDraft, today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.date.is_empty() {
        errors.insert("date", "Please select a date");
    } else {
        match parse_date(&draft.date) {
            None => {
                errors.insert("date", "Please select a valid date");
            }
            Some(date) if date < today => {
                errors.insert("date", "Date cannot be in the past");
            }
            Some(_) => {}
        }
    }

    if draft.time.is_empty() {
        errors.insert("time", "Please select a time");
    } else if !TIME_SLOTS.contains(&draft.time.as_str()) {
        errors.insert("time", "Please select an available time slot");
    }

    errors
}

fn validate_patient(draft: &BookingDraft, _today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&draft.patient_name) {
        errors.insert("patientName", "Name is required");
    }

    if is_blank(&draft.patient_email) {
        errors.insert("patientEmail", "Email is required");
    } else if !is_plausible_email(&draft.patient_email) {
        errors.insert("patientEmail", "Invalid email format");
    }

    if is_blank(&draft.patient_phone) {
        errors.insert("patientPhone", "Phone is required");
    }

    if is_blank(&draft.reason) {
        errors.insert("reason", "Please provide reason for visit");
    }

    errors
}

/// A linear four-step booking form. Advancing requires the current step to
/// validate; going back never validates and never discards data.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: BookingStep,
    draft: BookingDraft,
    errors: FieldErrors,
    announcement: Option<Announcement>,
    submit_error: Option<String>,
}

impl BookingWizard {
    pub fn new(user: Option<&User>, preselected: Option<&Doctor>) -> Self {
        let mut draft = BookingDraft::default();

        if let Some(doctor) = preselected {
            draft.doctor = DoctorRef::from(doctor);
        }

        if let Some(user) = user {
            draft.patient_name = user.name.clone();
            draft.patient_email = user.email.clone();
            draft.patient_phone = user.phone.clone();
            draft.date_of_birth = user.date_of_birth.clone();
        }

        Self {
            step: BookingStep::SelectDoctor,
            draft,
            errors: FieldErrors::new(),
            announcement: None,
            submit_error: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn announcement(&self) -> Option<&Announcement> {
        self.announcement.as_ref()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn select_doctor(&mut self, doctor: &Doctor) {
        debug!("Doctor selected for booking: {}", doctor.id);
        self.draft.doctor = DoctorRef::from(doctor);
        self.errors.remove("doctorId");
    }

    /// Returns step one to the doctor list; everything else in the draft stays.
    pub fn change_doctor(&mut self) {
        self.draft.doctor.id.clear();
    }

    pub fn select_time(&mut self, slot: &str) {
        self.draft.time = slot.to_string();
        self.errors.remove("time");
        self.announcement = Some(Announcement::polite(format!("Selected time {}", slot)));
    }

    pub fn update(&mut self, update: DraftUpdate) {
        let draft = &mut self.draft;
        let errors = &mut self.errors;

        let mut set = |key: &'static str, target: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *target = value;
                errors.remove(key);
            }
        };

        set("date", &mut draft.date, update.date);
        set("time", &mut draft.time, update.time);
        set("patientName", &mut draft.patient_name, update.patient_name);
        set("patientEmail", &mut draft.patient_email, update.patient_email);
        set("patientPhone", &mut draft.patient_phone, update.patient_phone);
        set("dateOfBirth", &mut draft.date_of_birth, update.date_of_birth);
        set("insuranceProvider", &mut draft.insurance_provider, update.insurance_provider);
        set("insuranceId", &mut draft.insurance_id, update.insurance_id);
        set("reason", &mut draft.reason, update.reason);
        set("symptoms", &mut draft.symptoms, update.symptoms);
        set("medications", &mut draft.medications, update.medications);

        if let Some(visit_type) = update.visit_type {
            draft.visit_type = visit_type;
        }
    }

    /// Runs the current step's validator and stores the outcome.
    pub fn validate_current(&mut self, today: NaiveDate) -> bool {
        self.errors = self
            .step
            .validator()
            .map(|validate| validate(&self.draft, today))
            .unwrap_or_default();
        self.errors.is_empty()
    }

    pub fn next(&mut self, today: NaiveDate) -> bool {
        if !self.validate_current(today) {
            debug!("Booking step {} blocked by {} error(s)", self.step.number(), self.errors.len());
            self.announcement = Some(Announcement::assertive("Please fix errors before continuing"));
            return false;
        }

        self.step = self.step.next();
        self.announcement = Some(Announcement::polite(format!(
            "Moving to step {} of {}",
            self.step.number(),
            TOTAL_STEPS
        )));
        true
    }

    pub fn prev(&mut self) {
        self.step = self.step.prev();
        self.announcement = Some(Announcement::polite(format!(
            "Returned to step {} of {}",
            self.step.number(),
            TOTAL_STEPS
        )));
    }

    /// Builds the backend record for a confirmed booking. Nothing is sent here.
    pub fn prepare_submission(
        &mut self,
        today: NaiveDate,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<BookingRequest, BookingError> {
        if self.step != BookingStep::Confirm {
            warn!("Submit attempted from booking step {}", self.step.number());
            return Err(BookingError::NotAtConfirmation);
        }

        if !self.validate_current(today) {
            return Err(BookingError::Invalid(self.errors.clone()));
        }

        let draft = &self.draft;
        Ok(BookingRequest {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            doctor_id: draft.doctor.id.clone(),
            doctor_name: draft.doctor.name.clone(),
            specialty: draft.doctor.specialty.clone(),
            hospital: draft.doctor.hospital.clone(),
            location: draft.doctor.location.clone(),
            consultation_fee: draft.doctor.consultation_fee,
            date: draft.date.clone(),
            time: draft.time.clone(),
            visit_type: draft.visit_type,
            patient_name: draft.patient_name.clone(),
            patient_email: draft.patient_email.clone(),
            patient_phone: draft.patient_phone.clone(),
            reason: draft.reason.clone(),
            symptoms: draft.symptoms.clone(),
            medications: draft.medications.clone(),
            insurance_provider: draft.insurance_provider.clone(),
            insurance_id: draft.insurance_id.clone(),
            status: AppointmentStatus::Upcoming,
            created_at: iso_timestamp(now),
        })
    }

    pub fn record_submit_failure(&mut self) {
        info!("Booking submission failed, staying on confirmation");
        self.submit_error = Some(BOOKING_FAILED.to_string());
        self.announcement = Some(Announcement::assertive(BOOKING_FAILED));
    }

    pub fn view(&self, today: NaiveDate, doctors: &[Doctor]) -> WizardView {
        let doctor_choices = if self.step == BookingStep::SelectDoctor && self.draft.doctor.id.is_empty() {
            doctors.iter().take(DOCTOR_CHOICES).cloned().collect()
        } else {
            Vec::new()
        };

        WizardView {
            step: self.step,
            step_number: self.step.number(),
            total_steps: TOTAL_STEPS,
            title: self.step.title(),
            draft: self.draft.clone(),
            errors: self.errors.clone(),
            announcement: self.announcement.clone(),
            time_slots: TIME_SLOTS.to_vec(),
            min_date: today.format("%Y-%m-%d").to_string(),
            can_go_back: self.step != BookingStep::SelectDoctor,
            has_next: self.step != BookingStep::Confirm,
            can_submit: self.step == BookingStep::Confirm,
            confirmation: (self.step == BookingStep::Confirm).then(|| ConfirmationSummary::from(&self.draft)),
            doctor_choices,
            submit_error: self.submit_error.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub step: BookingStep,
    pub step_number: u8,
    pub total_steps: u8,
    pub title: &'static str,
    pub draft: BookingDraft,
    pub errors: FieldErrors,
    pub announcement: Option<Announcement>,
    pub time_slots: Vec<&'static str>,
    pub min_date: String,
    pub can_go_back: bool,
    pub has_next: bool,
    pub can_submit: bool,
    pub confirmation: Option<ConfirmationSummary>,
    pub doctor_choices: Vec<Doctor>,
    pub submit_error: Option<String>,
}

/// Read-only review of the draft shown before submitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmationSummary {
    pub doctor_name: String,
    pub specialty: String,
    pub hospital: String,
    pub location: String,
    pub date: String,
    pub date_label: Option<String>,
    pub time: String,
    pub visit_type: &'static str,
    pub consultation_fee: Option<f64>,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub reason: String,
    pub symptoms: String,
    pub medications: String,
    pub insurance_provider: String,
    pub insurance_id: String,
}

impl From<&BookingDraft> for ConfirmationSummary {
    fn from(draft: &BookingDraft) -> Self {
        Self {
            doctor_name: draft.doctor.name.clone(),
            specialty: draft.doctor.specialty.clone(),
            hospital: draft.doctor.hospital.clone(),
            location: draft.doctor.location.clone(),
            date: draft.date.clone(),
            date_label: parse_date(&draft.date).map(|d| d.format("%A, %B %-d, %Y").to_string()),
            time: draft.time.clone(),
            visit_type: match draft.visit_type {
                VisitType::InPerson => "In-Person Visit",
                VisitType::Telemedicine => "Telemedicine",
            },
            consultation_fee: draft.doctor.consultation_fee,
            patient_name: draft.patient_name.clone(),
            patient_email: draft.patient_email.clone(),
            patient_phone: draft.patient_phone.clone(),
            reason: draft.reason.clone(),
            symptoms: draft.symptoms.clone(),
            medications: draft.medications.clone(),
            insurance_provider: draft.insurance_provider.clone(),
            insurance_id: draft.insurance_id.clone(),
        }
    }
}
