pub mod guard;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use guard::require_session;
pub use router::auth_routes;
pub use services::{SessionStore, SESSION_KEY};
