//! Business logic: registration and session (login, whoami, refresh).

pub mod registration;
pub mod session;

pub use registration::RegistrationService;
pub use session::{LoginSession, SessionService};
