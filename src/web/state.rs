use crate::core::safety::{AlertIssuer, AlertStore, KeywordScanner, ModerationService};
use std::sync::Arc;

/// One store shared by the issuer and the moderation service.
pub type SharedAlertStore = Arc<dyn AlertStore>;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<AlertIssuer<SharedAlertStore>>,
    pub moderation: Arc<ModerationService<SharedAlertStore>>,
    /// Page size for the alert listing when the request gives none
    pub default_page_size: usize,
}

impl AppState {
    pub fn new(
        store: SharedAlertStore,
        scanner: Arc<KeywordScanner>,
        default_page_size: usize,
    ) -> Self {
        Self {
            issuer: Arc::new(AlertIssuer::new(scanner, Arc::clone(&store))),
            moderation: Arc::new(ModerationService::new(store)),
            default_page_size,
        }
    }
}
