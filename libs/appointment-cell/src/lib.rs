pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use handlers::AppointmentState;
pub use models::{Appointment, AppointmentStatus, VisitType};
pub use router::{appointment_routes, booking_routes, dashboard_routes};
pub use services::{AppointmentService, BookingWizard};
