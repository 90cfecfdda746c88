// Alert issuer - bridges content creation to alert persistence.
//
// Content handlers call `issue` right after they committed a topic, reply or
// private message. The text is scanned inline; only MEDIUM and HIGH results
// are written. Storage errors go back to the caller untouched, the issuer
// never retries.

use super::alert_store::{AlertStore, SafetyError};
use super::keyword_scanner::KeywordScanner;
use super::safety_models::{Alert, ContentType, NewAlert, RiskLevel};
use chrono::Utc;
use std::sync::Arc;

pub struct AlertIssuer<S: AlertStore> {
    scanner: Arc<KeywordScanner>,
    store: S,
}

impl<S: AlertStore> AlertIssuer<S> {
    pub fn new(scanner: Arc<KeywordScanner>, store: S) -> Self {
        Self { scanner, store }
    }

    /// Scan freshly created content and raise an alert when it is MEDIUM or HIGH risk.
    ///
    /// # Arguments
    /// * `content_type` - What kind of content was created
    /// * `ref_id` - Id of the content, already committed to storage
    /// * `text` - The exact text that was persisted
    ///
    /// # Returns
    /// `Ok(None)` for LOW risk (no write happened), `Ok(Some(alert))` otherwise.
    pub async fn issue(
        &self,
        content_type: ContentType,
        ref_id: &str,
        text: &str,
    ) -> Result<Option<Alert>, SafetyError> {
        if ref_id.trim().is_empty() {
            return Err(SafetyError::Validation(
                "Content reference id is required".to_string(),
            ));
        }

        let scan = self.scanner.scan(text);

        if !scan.requires_alert() {
            if scan.has_signal() {
                tracing::debug!(
                    content_type = %content_type,
                    ref_id,
                    keywords = ?scan.matched_keywords,
                    "Low risk keywords found, no alert raised"
                );
            }
            return Ok(None);
        }

        let new_alert = NewAlert::from_scan(content_type, ref_id, &scan, text, Utc::now());
        let alert = self.store.insert(new_alert).await?;

        if alert.risk_level == RiskLevel::High {
            tracing::warn!(
                alert_id = %alert.id,
                content_type = %content_type,
                ref_id,
                keywords = ?scan.matched_keywords,
                "High risk safety alert raised"
            );
        } else {
            tracing::info!(
                alert_id = %alert.id,
                content_type = %content_type,
                ref_id,
                keywords = ?scan.matched_keywords,
                "Safety alert raised"
            );
        }

        Ok(Some(alert))
    }
}

// ============================================================================
// TESTS
// ============================================================================
