// In-memory implementation of AlertStore.
//
// Used by tests and by `ALERT_STORE=memory` deployments (alerts are lost on
// restart). The SQLite store implements the same contract.

use crate::core::safety::{
    listing_order, Alert, AlertFilter, AlertStore, NewAlert, Resolution, SafetyError,
};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// DashMap keyed by alert id.
///
/// Resolution goes through the entry API, which holds the shard lock while
/// checking and writing, so concurrent resolves of the same alert cannot both win.
pub struct InMemoryAlertStore {
    alerts: DashMap<String, Alert>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self {
            alerts: DashMap::new(),
        }
    }
}

impl Default for InMemoryAlertStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn insert(&self, alert: NewAlert) -> Result<Alert, SafetyError> {
        let id = uuid::Uuid::new_v4().to_string();
        let alert = alert.into_alert(id.clone());
        self.alerts.insert(id, alert.clone());
        Ok(alert)
    }

    async fn get(&self, alert_id: &str) -> Result<Option<Alert>, SafetyError> {
        Ok(self.alerts.get(alert_id).map(|entry| entry.clone()))
    }

    async fn list(&self, filter: AlertFilter) -> Result<Vec<Alert>, SafetyError> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|entry| !filter.pending_only || entry.is_open())
            .map(|entry| entry.value().clone())
            .collect();

        alerts.sort_by(listing_order);
        if let Some(limit) = filter.limit {
            alerts.truncate(limit);
        }

        Ok(alerts)
    }

    async fn resolve(
        &self,
        alert_id: &str,
        resolution: Resolution,
    ) -> Result<Alert, SafetyError> {
        match self.alerts.entry(alert_id.to_string()) {
            Entry::Vacant(_) => Err(SafetyError::NotFound(alert_id.to_string())),
            Entry::Occupied(mut entry) => {
                let alert = entry.get_mut();
                if alert.resolution.is_some() {
                    return Err(SafetyError::AlreadyResolved(alert_id.to_string()));
                }
                alert.resolution = Some(resolution);
                Ok(alert.clone())
            }
        }
    }

    async fn count(&self, pending_only: bool) -> Result<u64, SafetyError> {
        let count = self
            .alerts
            .iter()
            .filter(|entry| !pending_only || entry.is_open())
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::safety::{ContentType, RiskLevel};
    use chrono::Utc;
    use std::sync::Arc;

    fn new_alert(ref_id: &str) -> NewAlert {
        NewAlert {
            content_type: ContentType::Private,
            ref_id: ref_id.to_string(),
            risk_level: RiskLevel::High,
            reason: "test".to_string(),
            content: "inhoud".to_string(),
            created_at: Utc::now(),
        }
    }

    fn resolution(by: &str) -> Resolution {
        Resolution {
            resolved_at: Utc::now(),
            resolved_by: by.to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryAlertStore::new();

        let alert = store.insert(new_alert("m1")).await.unwrap();
        let fetched = store.get(&alert.id).await.unwrap().unwrap();

        assert_eq!(fetched, alert);
        assert!(fetched.is_open());
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_missing_does_not_insert() {
        let store = InMemoryAlertStore::new();

        let err = store.resolve("missing", resolution("mod1")).await.unwrap_err();

        assert_eq!(err, SafetyError::NotFound("missing".to_string()));
        assert_eq!(store.count(false).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_resolves_have_one_winner() {
        let store = Arc::new(InMemoryAlertStore::new());
        let alert = store.insert(new_alert("m1")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            let id = alert.id.clone();
            handles.push(tokio::spawn(async move {
                store.resolve(&id, resolution(&format!("mod{i}"))).await
            }));
        }

        let mut winners = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(SafetyError::AlreadyResolved(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn test_counts() {
        let store = InMemoryAlertStore::new();
        let a = store.insert(new_alert("a")).await.unwrap();
        store.insert(new_alert("b")).await.unwrap();
        store.resolve(&a.id, resolution("mod1")).await.unwrap();

        assert_eq!(store.count(false).await.unwrap(), 2);
        assert_eq!(store.count(true).await.unwrap(), 1);
    }
}
