// Core safety module - keyword scanning, alert issuing and moderation.
// Following the same pattern as the other core modules: models, port, services.

pub mod alert_issuer;
pub mod alert_store;
pub mod keyword_scanner;
pub mod moderation_service;
pub mod safety_models;

pub use alert_issuer::*;
pub use alert_store::*;
pub use keyword_scanner::*;
pub use moderation_service::*;
pub use safety_models::*;
