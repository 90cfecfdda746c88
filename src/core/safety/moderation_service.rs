// Moderation workflow - admins list, filter and resolve safety alerts.
//
// Every entry point checks the caller's capability before it touches storage.
// Who the caller is comes from the session layer; this service only looks at
// the role it was handed.

use super::alert_store::{AlertFilter, AlertStore, SafetyError};
use super::safety_models::{Alert, AlertStats, Resolution};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Hard cap on how many alerts a single listing returns.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
    /// No session at all
    Anonymous,
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            "MEMBER" => Role::Member,
            _ => Role::Anonymous,
        }
    }
}

/// The identity performing a moderation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn anonymous() -> Self {
        Self::new("", Role::Anonymous)
    }

    /// Any signed-in caller, whatever the role.
    pub fn is_authenticated(&self) -> bool {
        self.role != Role::Anonymous && !self.id.trim().is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin && self.is_authenticated()
    }
}

/// Parameters for the full (paged) alert listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertQuery {
    pub pending_only: bool,
    pub limit: usize,
}

impl Default for AlertQuery {
    fn default() -> Self {
        Self {
            pending_only: false,
            limit: MAX_PAGE_SIZE,
        }
    }
}

pub struct ModerationService<S: AlertStore> {
    store: S,
}

impl<S: AlertStore> ModerationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn authorize(&self, actor: &Actor) -> Result<(), SafetyError> {
        if actor.is_admin() {
            Ok(())
        } else {
            tracing::warn!(actor_id = %actor.id, role = ?actor.role, "Moderation access denied");
            Err(SafetyError::Unauthorized)
        }
    }

    /// Open alerts, most urgent and most recent first.
    pub async fn list_pending(&self, actor: &Actor) -> Result<Vec<Alert>, SafetyError> {
        self.authorize(actor)?;
        self.store
            .list(AlertFilter {
                pending_only: true,
                limit: None,
            })
            .await
    }

    /// One page of alerts: open before resolved, then risk, then newest.
    ///
    /// `limit` is capped at [`MAX_PAGE_SIZE`]; zero is rejected.
    pub async fn list_all(
        &self,
        actor: &Actor,
        query: AlertQuery,
    ) -> Result<Vec<Alert>, SafetyError> {
        self.authorize(actor)?;
        if query.limit == 0 {
            return Err(SafetyError::Validation(
                "Limit must be at least 1".to_string(),
            ));
        }

        self.store
            .list(AlertFilter {
                pending_only: query.pending_only,
                limit: Some(query.limit.min(MAX_PAGE_SIZE)),
            })
            .await
    }

    /// Close an open alert on behalf of `actor`.
    ///
    /// Resolved alerts stay resolved: a second attempt fails with
    /// `AlreadyResolved` instead of overwriting the first moderator's record.
    pub async fn resolve(
        &self,
        actor: &Actor,
        alert_id: &str,
        notes: Option<String>,
    ) -> Result<Alert, SafetyError> {
        self.authorize(actor)?;

        let alert_id = alert_id.trim();
        if alert_id.is_empty() {
            return Err(SafetyError::Validation("Alert ID is verplicht".to_string()));
        }

        let resolution = Resolution {
            resolved_at: Utc::now(),
            resolved_by: actor.id.clone(),
            notes: notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        let alert = self.store.resolve(alert_id, resolution).await?;

        tracing::info!(
            alert_id = %alert.id,
            resolved_by = %actor.id,
            risk = %alert.risk_level,
            "Safety alert resolved"
        );

        Ok(alert)
    }

    /// Counters for the admin dashboard.
    pub async fn stats(&self, actor: &Actor) -> Result<AlertStats, SafetyError> {
        self.authorize(actor)?;
        let total = self.store.count(false).await?;
        let pending = self.store.count(true).await?;
        Ok(AlertStats {
            pending,
            resolved: total.saturating_sub(pending),
            total,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::safety::safety_models::{AlertState, ContentType, NewAlert, RiskLevel};
    use crate::infra::safety::InMemoryAlertStore;
    use chrono::{DateTime, Duration};
    use std::sync::Arc;

    fn admin() -> Actor {
        Actor::new("mod1", Role::Admin)
    }

    fn new_alert(ref_id: &str, risk: RiskLevel, created_at: DateTime<Utc>) -> NewAlert {
        NewAlert {
            content_type: ContentType::Topic,
            ref_id: ref_id.to_string(),
            risk_level: risk,
            reason: "test".to_string(),
            content: "inhoud".to_string(),
            created_at,
        }
    }

    fn service() -> (Arc<InMemoryAlertStore>, ModerationService<Arc<InMemoryAlertStore>>) {
        let store = Arc::new(InMemoryAlertStore::new());
        let service = ModerationService::new(Arc::clone(&store));
        (store, service)
    }

    #[tokio::test]
    async fn test_pending_ordered_by_risk_then_newest() {
        let (store, service) = service();
        let base = Utc::now();

        store.insert(new_alert("low", RiskLevel::Low, base)).await.unwrap();
        store
            .insert(new_alert("high", RiskLevel::High, base + Duration::seconds(1)))
            .await
            .unwrap();
        store
            .insert(new_alert("medium", RiskLevel::Medium, base + Duration::seconds(2)))
            .await
            .unwrap();

        let pending = service.list_pending(&admin()).await.unwrap();
        let refs: Vec<&str> = pending.iter().map(|a| a.ref_id.as_str()).collect();
        assert_eq!(refs, vec!["high", "medium", "low"]);
    }

    #[tokio::test]
    async fn test_same_risk_newest_first() {
        let (store, service) = service();
        let base = Utc::now();

        store.insert(new_alert("old", RiskLevel::High, base)).await.unwrap();
        store
            .insert(new_alert("new", RiskLevel::High, base + Duration::minutes(5)))
            .await
            .unwrap();

        let pending = service.list_pending(&admin()).await.unwrap();
        assert_eq!(pending[0].ref_id, "new");
        assert_eq!(pending[1].ref_id, "old");
    }

    #[tokio::test]
    async fn test_resolve_moves_alert_out_of_pending() {
        let (store, service) = service();
        let alert = store
            .insert(new_alert("t1", RiskLevel::High, Utc::now()))
            .await
            .unwrap();

        let resolved = service
            .resolve(&admin(), &alert.id, Some("checked, false alarm".to_string()))
            .await
            .unwrap();

        let resolution = resolved.resolution.as_ref().unwrap();
        assert_eq!(resolution.resolved_by, "mod1");
        assert_eq!(resolution.notes.as_deref(), Some("checked, false alarm"));
        assert_eq!(resolved.state(), AlertState::Resolved);
        assert!(service.list_pending(&admin()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_is_not_found() {
        let (store, service) = service();

        let err = service
            .resolve(&admin(), "nonexistent-id", None)
            .await
            .unwrap_err();

        assert!(matches!(err, SafetyError::NotFound(_)));
        assert_eq!(store.count(false).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resolve_requires_alert_id() {
        let (_store, service) = service();

        let err = service.resolve(&admin(), " ", None).await.unwrap_err();
        assert!(matches!(err, SafetyError::Validation(_)));
    }

    #[tokio::test]
    async fn test_second_resolution_is_rejected() {
        let (store, service) = service();
        let alert = store
            .insert(new_alert("t1", RiskLevel::Medium, Utc::now()))
            .await
            .unwrap();

        service
            .resolve(&admin(), &alert.id, Some("eerste".to_string()))
            .await
            .unwrap();
        let err = service
            .resolve(&Actor::new("mod2", Role::Admin), &alert.id, None)
            .await
            .unwrap_err();

        assert!(matches!(err, SafetyError::AlreadyResolved(_)));
        let stored = store.get(&alert.id).await.unwrap().unwrap();
        assert_eq!(stored.resolution.unwrap().resolved_by, "mod1");
    }

    #[tokio::test]
    async fn test_blank_notes_are_not_stored() {
        let (store, service) = service();
        let alert = store
            .insert(new_alert("t1", RiskLevel::High, Utc::now()))
            .await
            .unwrap();

        let resolved = service
            .resolve(&admin(), &alert.id, Some("   ".to_string()))
            .await
            .unwrap();

        assert_eq!(resolved.resolution.unwrap().notes, None);
    }

    #[tokio::test]
    async fn test_non_admins_are_denied() {
        let (store, service) = service();
        let alert = store
            .insert(new_alert("t1", RiskLevel::High, Utc::now()))
            .await
            .unwrap();
        let member = Actor::new("user1", Role::Member);

        assert_eq!(
            service.list_pending(&member).await.unwrap_err(),
            SafetyError::Unauthorized
        );
        assert_eq!(
            service
                .list_all(&Actor::anonymous(), AlertQuery::default())
                .await
                .unwrap_err(),
            SafetyError::Unauthorized
        );
        assert_eq!(
            service.resolve(&member, &alert.id, None).await.unwrap_err(),
            SafetyError::Unauthorized
        );
        assert_eq!(service.stats(&member).await.unwrap_err(), SafetyError::Unauthorized);

        // Nothing was touched
        assert!(store.get(&alert.id).await.unwrap().unwrap().is_open());
    }

    #[tokio::test]
    async fn test_admin_role_without_id_is_denied() {
        let (_store, service) = service();
        let err = service
            .list_pending(&Actor::new("", Role::Admin))
            .await
            .unwrap_err();
        assert_eq!(err, SafetyError::Unauthorized);
    }

    #[tokio::test]
    async fn test_list_all_puts_open_alerts_first_and_caps_limit() {
        let (store, service) = service();
        let base = Utc::now();

        let resolved_high = store
            .insert(new_alert("resolved-high", RiskLevel::High, base))
            .await
            .unwrap();
        store
            .insert(new_alert("open-medium", RiskLevel::Medium, base))
            .await
            .unwrap();
        for i in 0..110 {
            store
                .insert(new_alert(
                    &format!("bulk-{i}"),
                    RiskLevel::Medium,
                    base - Duration::hours(1),
                ))
                .await
                .unwrap();
        }
        service
            .resolve(&admin(), &resolved_high.id, None)
            .await
            .unwrap();

        let page = service
            .list_all(
                &admin(),
                AlertQuery {
                    pending_only: false,
                    limit: 500,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.len(), MAX_PAGE_SIZE);
        assert_eq!(page[0].ref_id, "open-medium");
        assert!(page.iter().all(|a| a.is_open()));

        let small = service
            .list_all(
                &admin(),
                AlertQuery {
                    pending_only: false,
                    limit: 3,
                },
            )
            .await
            .unwrap();
        assert_eq!(small.len(), 3);
    }

    #[tokio::test]
    async fn test_list_all_shows_resolved_after_open() {
        let (store, service) = service();
        let base = Utc::now();

        let high = store
            .insert(new_alert("high", RiskLevel::High, base))
            .await
            .unwrap();
        store
            .insert(new_alert("low", RiskLevel::Low, base))
            .await
            .unwrap();
        service.resolve(&admin(), &high.id, None).await.unwrap();

        let all = service
            .list_all(&admin(), AlertQuery::default())
            .await
            .unwrap();
        let refs: Vec<&str> = all.iter().map(|a| a.ref_id.as_str()).collect();
        assert_eq!(refs, vec!["low", "high"]);

        let pending_only = service
            .list_all(
                &admin(),
                AlertQuery {
                    pending_only: true,
                    limit: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(pending_only.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let (_store, service) = service();
        let err = service
            .list_all(
                &admin(),
                AlertQuery {
                    pending_only: false,
                    limit: 0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SafetyError::Validation(_)));
    }

    #[tokio::test]
    async fn test_stats() {
        let (store, service) = service();
        let a = store
            .insert(new_alert("a", RiskLevel::High, Utc::now()))
            .await
            .unwrap();
        store
            .insert(new_alert("b", RiskLevel::Medium, Utc::now()))
            .await
            .unwrap();
        service.resolve(&admin(), &a.id, None).await.unwrap();

        let stats = service.stats(&admin()).await.unwrap();
        assert_eq!(
            stats,
            AlertStats {
                pending: 1,
                resolved: 1,
                total: 2
            }
        );
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("MEMBER"), Role::Member);
        assert_eq!(Role::parse("root"), Role::Anonymous);
    }

    #[test]
    fn test_authenticated_needs_id_and_known_role() {
        assert!(Actor::new("u1", Role::Member).is_authenticated());
        assert!(Actor::new("mod1", Role::Admin).is_authenticated());
        assert!(!Actor::new("  ", Role::Member).is_authenticated());
        assert!(!Actor::new("u1", Role::Anonymous).is_authenticated());
        assert!(!Actor::anonymous().is_authenticated());
    }
}
