pub mod session;

pub use session::{SessionStore, SESSION_KEY};
