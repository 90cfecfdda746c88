// Web layer - HTTP adapters for content intake and the admin alert dashboard.
// Thin translation only: extract primitives, call the core services, map errors.

#[path = "api_error.rs"]
pub mod errors;

#[path = "session.rs"]
pub mod session;

pub mod state;

#[path = "alert_handlers.rs"]
pub mod handlers;

pub mod routes;

pub use errors::ApiError;
pub use routes::build_router;
pub use session::SessionActor;
pub use state::{AppState, SharedAlertStore};
