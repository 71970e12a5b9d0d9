pub mod doctor;
pub mod search;

pub use doctor::DoctorService;
