// Storage port for safety alerts.
//
// The core defines WHAT it needs from persistence; `infra::safety` provides the
// in-memory and SQLite implementations.

use super::safety_models::{Alert, NewAlert, Resolution};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SafetyError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Alert not found: {0}")]
    NotFound(String),

    #[error("Admin capability required")]
    Unauthorized,

    #[error("Alert already resolved: {0}")]
    AlreadyResolved(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Which alerts to return from [`AlertStore::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertFilter {
    /// Only alerts that have not been resolved yet
    pub pending_only: bool,
    /// `None` returns every matching alert
    pub limit: Option<usize>,
}

/// Trait for persisting safety alerts.
///
/// Listing order is always: open before resolved, then risk level (highest
/// first), then creation time (newest first).
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Persist a new alert and return it with its assigned id.
    async fn insert(&self, alert: NewAlert) -> Result<Alert, SafetyError>;

    async fn get(&self, alert_id: &str) -> Result<Option<Alert>, SafetyError>;

    async fn list(&self, filter: AlertFilter) -> Result<Vec<Alert>, SafetyError>;

    /// Attach a resolution to an open alert.
    ///
    /// Must be a single atomic check-and-write: `NotFound` for an unknown id,
    /// `AlreadyResolved` when the alert already carries a resolution.
    async fn resolve(&self, alert_id: &str, resolution: Resolution)
        -> Result<Alert, SafetyError>;

    async fn count(&self, pending_only: bool) -> Result<u64, SafetyError>;
}

/// Moderator listing order: open first, then highest risk, then newest.
pub fn listing_order(a: &Alert, b: &Alert) -> Ordering {
    b.is_open()
        .cmp(&a.is_open())
        .then_with(|| b.risk_level.cmp(&a.risk_level))
        .then_with(|| b.created_at.cmp(&a.created_at))
}

// Lets the issuer and the moderation service share one store.
#[async_trait]
impl<T: AlertStore + ?Sized> AlertStore for Arc<T> {
    async fn insert(&self, alert: NewAlert) -> Result<Alert, SafetyError> {
        (**self).insert(alert).await
    }

    async fn get(&self, alert_id: &str) -> Result<Option<Alert>, SafetyError> {
        (**self).get(alert_id).await
    }

    async fn list(&self, filter: AlertFilter) -> Result<Vec<Alert>, SafetyError> {
        (**self).list(filter).await
    }

    async fn resolve(
        &self,
        alert_id: &str,
        resolution: Resolution,
    ) -> Result<Alert, SafetyError> {
        (**self).resolve(alert_id, resolution).await
    }

    async fn count(&self, pending_only: bool) -> Result<u64, SafetyError> {
        (**self).count(pending_only).await
    }
}
