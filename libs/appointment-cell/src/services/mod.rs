pub mod appointment;
pub mod booking;
pub mod dashboard;
pub mod partition;

pub use appointment::AppointmentService;
pub use booking::{BookingError, BookingStep, BookingWizard, WizardView};
