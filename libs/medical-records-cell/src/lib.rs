pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{LabResult, LabTest, Prescription, RecordKind, Vital};
pub use router::records_routes;
pub use services::RecordsService;
