// SQLite-backed alert store.
//
// Tables:
// - safety_alerts: one row per alert; resolved_at / resolved_by are NULL while open
//
// Timestamps are fixed-width RFC 3339 strings (microseconds, `Z`), so text
// ordering matches time ordering.

use crate::core::safety::{
    Alert, AlertFilter, AlertStore, ContentType, NewAlert, Resolution, RiskLevel, SafetyError,
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

const LISTING_ORDER: &str = r#"
    ORDER BY
        CASE WHEN resolved_at IS NULL THEN 0 ELSE 1 END ASC,
        CASE risk_level WHEN 'HIGH' THEN 3 WHEN 'MEDIUM' THEN 2 ELSE 1 END DESC,
        created_at DESC
"#;

pub struct SqliteAlertStore {
    pool: Pool<Sqlite>,
}

impl SqliteAlertStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database file and run migrations.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        // Ensure the file exists if it's a file path
        let path_str = database_url.trim_start_matches("sqlite://");
        if !database_url.contains(":memory:") && !Path::new(path_str).exists() {
            if let Some(parent) = Path::new(path_str).parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(path_str)?;
        }

        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        let pool = SqlitePoolOptions::new().connect(&conn_str).await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), SafetyError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS safety_alerts (
                id TEXT PRIMARY KEY,
                alert_type TEXT NOT NULL,
                ref_id TEXT NOT NULL,
                risk_level TEXT NOT NULL,
                reason TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                resolved_at TEXT,
                resolved_by TEXT,
                notes TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_safety_alerts_status
                ON safety_alerts(resolved_at, created_at);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| SafetyError::StorageError(e.to_string()))?;

        Ok(())
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, SafetyError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SafetyError::StorageError(format!("Bad timestamp '{value}': {e}")))
}

fn alert_from_row(row: &SqliteRow) -> Result<Alert, SafetyError> {
    let alert_type: String = row.get("alert_type");
    let risk_level: String = row.get("risk_level");
    let created_at: String = row.get("created_at");
    let resolved_at: Option<String> = row.get("resolved_at");
    let resolved_by: Option<String> = row.get("resolved_by");

    let content_type = ContentType::parse(&alert_type)
        .ok_or_else(|| SafetyError::StorageError(format!("Unknown alert type '{alert_type}'")))?;
    let risk_level = RiskLevel::parse(&risk_level)
        .ok_or_else(|| SafetyError::StorageError(format!("Unknown risk level '{risk_level}'")))?;

    let resolution = match (resolved_at, resolved_by) {
        (Some(at), Some(by)) => Some(Resolution {
            resolved_at: parse_timestamp(&at)?,
            resolved_by: by,
            notes: row.get("notes"),
        }),
        (None, None) => None,
        _ => {
            return Err(SafetyError::StorageError(
                "resolved_at and resolved_by must be set together".to_string(),
            ))
        }
    };

    Ok(Alert {
        id: row.get("id"),
        content_type,
        ref_id: row.get("ref_id"),
        risk_level,
        reason: row.get("reason"),
        content: row.get("content"),
        created_at: parse_timestamp(&created_at)?,
        resolution,
    })
}

#[async_trait]
impl AlertStore for SqliteAlertStore {
    async fn insert(&self, alert: NewAlert) -> Result<Alert, SafetyError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO safety_alerts (id, alert_type, ref_id, risk_level, reason, content, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(alert.content_type.as_str())
        .bind(&alert.ref_id)
        .bind(alert.risk_level.as_str())
        .bind(&alert.reason)
        .bind(&alert.content)
        .bind(format_timestamp(&alert.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| SafetyError::StorageError(e.to_string()))?;

        Ok(alert.into_alert(id))
    }

    async fn get(&self, alert_id: &str) -> Result<Option<Alert>, SafetyError> {
        let row = sqlx::query("SELECT * FROM safety_alerts WHERE id = ?")
            .bind(alert_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SafetyError::StorageError(e.to_string()))?;

        row.as_ref().map(alert_from_row).transpose()
    }

    async fn list(&self, filter: AlertFilter) -> Result<Vec<Alert>, SafetyError> {
        let where_clause = if filter.pending_only {
            "WHERE resolved_at IS NULL"
        } else {
            ""
        };
        let sql = format!("SELECT * FROM safety_alerts {where_clause} {LISTING_ORDER} LIMIT ?");

        let rows = sqlx::query(&sql)
            // SQLite treats a negative LIMIT as no limit
            .bind(filter.limit.map(|l| l as i64).unwrap_or(-1))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SafetyError::StorageError(e.to_string()))?;

        rows.iter().map(alert_from_row).collect()
    }

    async fn resolve(
        &self,
        alert_id: &str,
        resolution: Resolution,
    ) -> Result<Alert, SafetyError> {
        // Conditional update: only an open alert can be resolved, in one statement.
        let result = sqlx::query(
            r#"
            UPDATE safety_alerts
            SET resolved_at = ?, resolved_by = ?, notes = ?
            WHERE id = ? AND resolved_at IS NULL
            "#,
        )
        .bind(format_timestamp(&resolution.resolved_at))
        .bind(&resolution.resolved_by)
        .bind(&resolution.notes)
        .bind(alert_id)
        .execute(&self.pool)
        .await
        .map_err(|e| SafetyError::StorageError(e.to_string()))?;

        let alert = self.get(alert_id).await?;

        match (result.rows_affected(), alert) {
            (_, None) => Err(SafetyError::NotFound(alert_id.to_string())),
            (0, Some(_)) => Err(SafetyError::AlreadyResolved(alert_id.to_string())),
            (_, Some(alert)) => Ok(alert),
        }
    }

    async fn count(&self, pending_only: bool) -> Result<u64, SafetyError> {
        let sql = if pending_only {
            "SELECT COUNT(*) AS total FROM safety_alerts WHERE resolved_at IS NULL"
        } else {
            "SELECT COUNT(*) AS total FROM safety_alerts"
        };

        let row = sqlx::query(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SafetyError::StorageError(e.to_string()))?;

        Ok(row.get::<i64, _>("total") as u64)
    }
}
